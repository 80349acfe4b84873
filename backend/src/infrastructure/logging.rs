use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::AppConfig;

const LOG_FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Keeps the file writer alive; dropping it flushes pending lines.
pub struct LoggingRuntime {
    _guard: WorkerGuard,
    pub log_file: PathBuf,
}

/// Dated log files (`YYYY-MM-DD.log`) in one directory.
#[derive(Clone, Debug)]
pub struct LogLayout {
    dir: PathBuf,
    retention_days: u16,
}

impl LogLayout {
    pub fn new(dir: impl Into<PathBuf>, retention_days: u16) -> Self {
        Self {
            dir: dir.into(),
            retention_days: retention_days.max(1),
        }
    }

    pub fn file_name_for(date: NaiveDate) -> String {
        format!("{}.log", date.format(LOG_FILE_DATE_FORMAT))
    }

    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(Self::file_name_for(date))
    }

    /// Removes dated log files older than the retention window ending at `today`.
    pub fn prune(&self, today: NaiveDate) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }
        let cutoff = today - ChronoDuration::days(i64::from(self.retention_days) - 1);
        let mut removed = 0usize;

        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("failed to read log dir: {}", self.dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            match log_file_date(&path) {
                Some(date) if date < cutoff => {
                    std::fs::remove_file(&path).with_context(|| {
                        format!("failed to remove old log file: {}", path.display())
                    })?;
                    removed += 1;
                }
                _ => {}
            }
        }
        Ok(removed)
    }

    fn writer_for(&self, date: NaiveDate) -> (NonBlocking, WorkerGuard, PathBuf) {
        let file_name = Self::file_name_for(date);
        let appender = tracing_appender::rolling::never(&self.dir, &file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (writer, guard, self.dir.join(file_name))
    }
}

pub fn init_logging(config: &AppConfig) -> Result<LoggingRuntime> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("failed to create log dir: {}", config.log_dir.display()))?;

    let layout = LogLayout::new(&config.log_dir, config.log_retention_days);
    let today = Utc::now().date_naive();
    let removed = layout.prune(today)?;
    if removed > 0 {
        eprintln!("cleaned {removed} old log files under {}", config.log_dir.display());
    }

    let (file_writer, guard, log_file) = layout.writer_for(today);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    Ok(LoggingRuntime {
        _guard: guard,
        log_file,
    })
}

fn log_file_date(path: &Path) -> Option<NaiveDate> {
    let file_name = path.file_name()?.to_string_lossy();
    let stem = file_name.strip_suffix(".log")?;
    NaiveDate::parse_from_str(stem, LOG_FILE_DATE_FORMAT).ok()
}
