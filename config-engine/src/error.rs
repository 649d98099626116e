use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid duration '{0}'")]
    InvalidDuration(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
