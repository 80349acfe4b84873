use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infrastructure::runtime_assets::{DEFAULT_CONFIG_JSON, DEFAULT_ENV_EXAMPLE};

const DEFAULT_WORKSPACE_DIR: &str = ".chat-relay";
const DEFAULT_CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:12346";
const DEFAULT_PARTICIPANT: &str = "copilot";
const DEFAULT_FOCUS_COMMAND: &str = "workbench.panel.chat.view.copilot.focus";

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HostBackend {
    CommandBridge,
    Detached,
}

impl HostBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CommandBridge => "command_bridge",
            Self::Detached => "detached",
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClipboardMode {
    System,
    Bridge,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub workspace: PathBuf,
    pub config_path: PathBuf,
    pub log_level: String,
    pub log_retention_days: u16,
    pub log_dir: PathBuf,
    pub host_backend: HostBackend,
    pub bridge_url: String,
    pub bridge_token: Option<String>,
    pub chat_participant: String,
    pub focus_command: String,
    pub clipboard: ClipboardMode,
    pub focus_settle_ms: u64,
    pub paste_settle_ms: u64,
    /// Per host call; 0 disables the bound.
    pub step_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::defaults_for_workspace_base(workspace_base_for(&cwd))
    }
}

impl AppConfig {
    /// Bound for one host call or bridge request; `None` when disabled.
    pub fn step_timeout(&self) -> Option<Duration> {
        (self.step_timeout_ms > 0).then(|| Duration::from_millis(self.step_timeout_ms))
    }

    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let workspace = default_workspace_path(&workspace_base_for(&cwd));
        let config_path = env::var("CHAT_RELAY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path_for_workspace(&workspace));
        Self::from_config_file_path(&config_path, EnvSecrets::from_env(), cwd)
    }

    pub fn from_config_file_path(
        path: &Path,
        env_secrets: EnvSecrets,
        cwd: PathBuf,
    ) -> Result<Self> {
        let config_path = resolve_against(&cwd, path.to_path_buf());
        ensure_runtime_config_files(&config_path)?;
        let file_config = read_config_file(&config_path)?;
        let mut app = Self::from_inputs(file_config, env_secrets, workspace_base_for(&cwd));
        app.config_path = config_path;
        Ok(app)
    }

    pub fn from_inputs(
        file_config: RelayFileConfig,
        env_secrets: EnvSecrets,
        workspace_base: PathBuf,
    ) -> Self {
        let mut config = Self::defaults_for_workspace_base(workspace_base.clone());
        // Priority: defaults < env secrets < config secrets
        config.bridge_token = env_secrets.bridge_token;

        if let Some(workspace) = file_config.workspace {
            config.workspace = resolve_against(&workspace_base, workspace);
            config.log_dir = config.workspace.join("logs");
        }

        if let Some(host) = file_config.server.host {
            config.host = host;
        }
        if let Some(port) = file_config.server.port {
            config.port = port;
        }

        if let Some(level) = file_config.logging.level {
            config.log_level = normalize_log_level(&level);
        }
        if let Some(retention_days) = file_config.logging.retention_days {
            config.log_retention_days = retention_days.max(1);
        }
        if let Some(directory) = file_config.logging.directory {
            config.log_dir = resolve_against(&config.workspace, directory);
        }

        if let Some(backend) = file_config.host.backend {
            config.host_backend = backend;
        }
        if let Some(bridge_url) = file_config.host.bridge_url {
            config.bridge_url = normalize_bridge_url(&bridge_url);
        }
        if let Some(participant) = file_config.host.participant {
            config.chat_participant = participant;
        }
        if let Some(focus_command) = file_config.host.focus_command {
            config.focus_command = focus_command;
        }
        if let Some(clipboard) = file_config.host.clipboard {
            config.clipboard = clipboard;
        }

        if let Some(ms) = file_config.delivery.focus_settle_ms {
            config.focus_settle_ms = ms;
        }
        if let Some(ms) = file_config.delivery.paste_settle_ms {
            config.paste_settle_ms = ms;
        }
        if let Some(ms) = file_config.delivery.step_timeout_ms {
            config.step_timeout_ms = ms;
        }

        if let Some(token) = file_config.secrets.bridge_token.filter(|t| !t.is_empty()) {
            config.bridge_token = Some(token);
        }

        config
    }

    fn defaults_for_workspace_base(workspace_base: PathBuf) -> Self {
        let workspace = default_workspace_path(&workspace_base);
        Self {
            host: "127.0.0.1".to_string(),
            port: 12345,
            config_path: default_config_path_for_workspace(&workspace),
            log_level: "info".to_string(),
            log_retention_days: 7,
            log_dir: workspace.join("logs"),
            host_backend: HostBackend::CommandBridge,
            bridge_url: DEFAULT_BRIDGE_URL.to_string(),
            bridge_token: None,
            chat_participant: DEFAULT_PARTICIPANT.to_string(),
            focus_command: DEFAULT_FOCUS_COMMAND.to_string(),
            clipboard: ClipboardMode::System,
            focus_settle_ms: 300,
            paste_settle_ms: 200,
            step_timeout_ms: 10_000,
            workspace,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvSecrets {
    pub bridge_token: Option<String>,
}

impl EnvSecrets {
    pub fn from_env() -> Self {
        Self {
            bridge_token: env::var("RELAY_BRIDGE_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayFileConfig {
    pub workspace: Option<PathBuf>,
    pub server: RelayServerConfig,
    pub logging: RelayLoggingConfig,
    pub host: RelayHostConfig,
    pub delivery: RelayDeliveryConfig,
    pub secrets: RelaySecretsConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayLoggingConfig {
    pub level: Option<String>,
    pub retention_days: Option<u16>,
    pub directory: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayHostConfig {
    pub backend: Option<HostBackend>,
    pub bridge_url: Option<String>,
    pub participant: Option<String>,
    pub focus_command: Option<String>,
    pub clipboard: Option<ClipboardMode>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayDeliveryConfig {
    pub focus_settle_ms: Option<u64>,
    pub paste_settle_ms: Option<u64>,
    pub step_timeout_ms: Option<u64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelaySecretsConfig {
    pub bridge_token: Option<String>,
}

pub fn workspace_base_for(cwd: &Path) -> PathBuf {
    home_dir().unwrap_or_else(|| cwd.to_path_buf())
}

pub fn default_workspace_path(base: &Path) -> PathBuf {
    base.join(DEFAULT_WORKSPACE_DIR)
}

pub fn default_config_path_for_workspace(workspace: &Path) -> PathBuf {
    workspace.join(DEFAULT_CONFIG_FILE_NAME)
}

pub fn read_config_file(path: &Path) -> Result<RelayFileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    serde_json::from_str::<RelayFileConfig>(&raw)
        .with_context(|| format!("invalid config json: {}", path.display()))
}

pub fn normalize_bridge_url(value: &str) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BRIDGE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

fn resolve_against(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

fn normalize_log_level(level: &str) -> String {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warning" | "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
    .to_string()
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
}

fn ensure_runtime_config_files(config_path: &Path) -> Result<()> {
    write_if_missing(config_path, DEFAULT_CONFIG_JSON)?;
    let env_example_path = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(".env.example");
    write_if_missing(&env_example_path, DEFAULT_ENV_EXAMPLE)
}

fn write_if_missing(path: &Path, default_content: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config dir: {}", parent.display()))?;
    }
    let content = if default_content.ends_with('\n') {
        default_content.to_string()
    } else {
        format!("{default_content}\n")
    };
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
