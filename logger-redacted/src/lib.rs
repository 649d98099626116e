//! Logging for the aggregator backend.
//!
//! - `tracing` subscriber setup (colored console in development, JSON in
//!   production)
//! - hourly rolling JSON log files with retention pruning
//! - PII redaction for values that end up in log lines, such as phone
//!   numbers and emails in request URIs
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_logging, FileLogConfig, LoggerConfig};
//!
//! let _guard = init_logging(&LoggerConfig {
//!     targets: vec!["aggregator_server".to_string()],
//!     file: Some(FileLogConfig::new("logs", 24)),
//!     ..Default::default()
//! })
//! .unwrap();
//! tracing::info!("ready");
//! ```

pub mod config;
pub mod error;
pub mod formatter;
pub mod redactor;
pub mod rotation;
pub mod subscriber;

pub use config::*;
pub use error::*;
pub use redactor::*;
pub use subscriber::{init_logging, LoggingGuard};
