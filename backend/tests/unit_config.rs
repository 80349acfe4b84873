use chat_relay_backend::infrastructure::config::{
    default_config_path_for_workspace, default_workspace_path, AppConfig, ClipboardMode,
    EnvSecrets, HostBackend, RelayDeliveryConfig, RelayFileConfig, RelayHostConfig,
    RelayLoggingConfig, RelaySecretsConfig, RelayServerConfig,
};
use chat_relay_backend::application::PipelineTimings;
use serial_test::serial;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;

struct EnvVarGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvVarGuard {
    fn set(key: &'static str, value: &str) -> Self {
        let original = std::env::var(key).ok();
        std::env::set_var(key, value);
        Self { key, original }
    }

    fn unset(key: &'static str) -> Self {
        let original = std::env::var(key).ok();
        std::env::remove_var(key);
        Self { key, original }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(value) = &self.original {
            std::env::set_var(self.key, value);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

fn setup_home(root: &Path) -> EnvVarGuard {
    std::fs::create_dir_all(root).expect("create home");
    EnvVarGuard::set("HOME", root.to_str().expect("utf8 home"))
}

#[test]
#[serial]
fn defaults_target_local_bridge_with_observed_settling() {
    let temp = tempdir().expect("tempdir");
    let config = AppConfig::from_inputs(
        RelayFileConfig::default(),
        EnvSecrets::default(),
        temp.path().to_path_buf(),
    );

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 12345);
    assert_eq!(config.workspace, temp.path().join(".chat-relay"));
    assert_eq!(config.log_dir, temp.path().join(".chat-relay/logs"));
    assert_eq!(config.host_backend, HostBackend::CommandBridge);
    assert_eq!(config.clipboard, ClipboardMode::System);

    let timings = PipelineTimings::from(&config);
    assert_eq!(timings.focus_settle, Duration::from_millis(300));
    assert_eq!(timings.paste_settle, Duration::from_millis(200));
    assert_eq!(timings.step_timeout, Some(Duration::from_secs(10)));
}

#[test]
#[serial]
fn file_values_override_defaults_and_env_secrets() {
    let temp = tempdir().expect("tempdir");
    let config = AppConfig::from_inputs(
        RelayFileConfig {
            workspace: Some(PathBuf::from("relay")),
            server: RelayServerConfig {
                host: Some("0.0.0.0".to_string()),
                port: Some(23456),
            },
            logging: RelayLoggingConfig {
                level: Some("WARNING".to_string()),
                retention_days: Some(0),
                directory: Some(PathBuf::from("my-logs")),
            },
            host: RelayHostConfig {
                backend: Some(HostBackend::Detached),
                bridge_url: Some("http://localhost:9000/".to_string()),
                participant: Some("workspace".to_string()),
                focus_command: Some("chat.focus".to_string()),
                clipboard: Some(ClipboardMode::Bridge),
            },
            delivery: RelayDeliveryConfig {
                focus_settle_ms: Some(0),
                paste_settle_ms: Some(50),
                step_timeout_ms: Some(0),
            },
            secrets: RelaySecretsConfig {
                bridge_token: Some("file-token".to_string()),
            },
        },
        EnvSecrets {
            bridge_token: Some("env-token".to_string()),
        },
        temp.path().to_path_buf(),
    );

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 23456);
    assert_eq!(config.workspace, temp.path().join("relay"));
    assert_eq!(config.log_dir, temp.path().join("relay/my-logs"));
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.log_retention_days, 1);
    assert_eq!(config.host_backend, HostBackend::Detached);
    assert_eq!(config.bridge_url, "http://localhost:9000");
    assert_eq!(config.chat_participant, "workspace");
    assert_eq!(config.focus_command, "chat.focus");
    assert_eq!(config.clipboard, ClipboardMode::Bridge);
    assert_eq!(config.bridge_token.as_deref(), Some("file-token"));

    let timings = PipelineTimings::from(&config);
    assert_eq!(timings.focus_settle, Duration::ZERO);
    assert_eq!(timings.paste_settle, Duration::from_millis(50));
    assert_eq!(timings.step_timeout, None);
}

#[test]
#[serial]
fn env_token_applies_when_file_has_none() {
    let temp = tempdir().expect("tempdir");
    let config = AppConfig::from_inputs(
        RelayFileConfig::default(),
        EnvSecrets {
            bridge_token: Some("env-token".to_string()),
        },
        temp.path().to_path_buf(),
    );

    assert_eq!(config.bridge_token.as_deref(), Some("env-token"));
}

#[test]
#[serial]
fn load_bootstraps_config_template_in_home_workspace() {
    let temp = tempdir().expect("tempdir");
    let home = temp.path().join("home");
    let _home = setup_home(&home);
    let _config_override = EnvVarGuard::unset("CHAT_RELAY_CONFIG");
    let _token = EnvVarGuard::unset("RELAY_BRIDGE_TOKEN");

    let config = AppConfig::load().expect("load config");

    let workspace = default_workspace_path(&home);
    assert_eq!(config.config_path, default_config_path_for_workspace(&workspace));
    assert!(config.config_path.exists());
    assert!(workspace.join(".env.example").exists());
    assert_eq!(config.port, 12345);
    assert_eq!(config.bridge_token, None);
}

#[test]
#[serial]
fn load_honors_explicit_config_path_and_env_token() {
    let temp = tempdir().expect("tempdir");
    let _home = setup_home(&temp.path().join("home"));
    let config_path = temp.path().join("custom/relay.json");
    std::fs::create_dir_all(config_path.parent().expect("parent")).expect("create dir");
    std::fs::write(
        &config_path,
        r#"{"server": {"port": 40001}, "host": {"backend": "detached"}}"#,
    )
    .expect("write config");
    let _config_override = EnvVarGuard::set("CHAT_RELAY_CONFIG", config_path.to_str().expect("utf8"));
    let _token = EnvVarGuard::set("RELAY_BRIDGE_TOKEN", "from-env");

    let config = AppConfig::load().expect("load config");

    assert_eq!(config.config_path, config_path);
    assert_eq!(config.port, 40001);
    assert_eq!(config.host_backend, HostBackend::Detached);
    assert_eq!(config.bridge_token.as_deref(), Some("from-env"));
    assert!(temp.path().join("custom/.env.example").exists());
}

#[test]
#[serial]
fn invalid_config_json_is_reported_with_path() {
    let temp = tempdir().expect("tempdir");
    let config_path = temp.path().join("config.json");
    std::fs::write(&config_path, "{ nope").expect("write config");

    let error = AppConfig::from_config_file_path(
        &config_path,
        EnvSecrets::default(),
        temp.path().to_path_buf(),
    )
    .expect_err("invalid json");

    assert!(error.to_string().contains("invalid config json"));
}
