//! Configuration for the aggregator backend.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file found in the working directory or up to two parents.
//! Every setting has a default so the server can boot with an empty
//! environment in development.
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::AppConfig;
//!
//! let config = AppConfig::load().unwrap();
//! println!("listening on port {}", config.server.port);
//! ```

pub mod duration;
pub mod error;
pub mod providers;
pub mod settings;
pub mod validation;

pub use duration::parse_duration;
pub use error::*;
pub use settings::*;
