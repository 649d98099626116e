use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logger configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// JSON console output instead of the colored development format
    pub production: bool,
    /// Raise the default level of `targets` to DEBUG
    pub verbose: bool,
    /// Crates whose events are enabled when `RUST_LOG` is not set
    pub targets: Vec<String>,
    /// Rolling file output; disabled when `None`
    pub file: Option<FileLogConfig>,
}

/// Hourly rolling file output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLogConfig {
    pub dir: PathBuf,
    pub prefix: String,
    pub retention_hours: u64,
}

impl FileLogConfig {
    pub fn new(dir: impl Into<PathBuf>, retention_hours: u64) -> Self {
        Self {
            dir: dir.into(),
            prefix: "api".to_string(),
            retention_hours,
        }
    }
}

impl LoggerConfig {
    /// Filter directives used when `RUST_LOG` is not set.
    pub fn default_directives(&self) -> String {
        let level = if self.verbose { "debug" } else { "info" };
        let mut directives: Vec<String> = self
            .targets
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect();
        directives.push("tower_http=info".to_string());
        directives.push("sqlx=warn".to_string());
        directives.join(",")
    }
}
