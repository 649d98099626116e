use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Failed to create log directory {path}: {source}")]
    LogDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to initialize file appender: {0}")]
    Appender(String),

    #[error("Failed to install tracing subscriber: {0}")]
    Init(String),
}

pub type LoggerResult<T> = Result<T, LoggerError>;
