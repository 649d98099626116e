use crate::error::{ConfigError, Result};
use crate::settings::AppConfig;
use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "aggreator@123456@";

/// Reject configurations the server cannot run with and warn about weak ones.
pub fn validate(config: &AppConfig) -> Result<()> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError("PORT must be non-zero".to_string()));
    }

    if config.database.pool_max == 0 {
        return Err(ConfigError::ValidationError(
            "DB_POOL_MAX must be at least 1".to_string(),
        ));
    }

    if config.database.pool_min > config.database.pool_max {
        return Err(ConfigError::ValidationError(format!(
            "DB_POOL_MIN ({}) exceeds DB_POOL_MAX ({})",
            config.database.pool_min, config.database.pool_max
        )));
    }

    if config.logging.retention_hours == 0 {
        return Err(ConfigError::ValidationError(
            "LOG_RETENTION_HOURS must be at least 1".to_string(),
        ));
    }

    if config.jwt.secret.is_empty() {
        return Err(ConfigError::ValidationError("JWT_SECRET must not be empty".to_string()));
    }

    if config.jwt.secret == DEFAULT_JWT_SECRET && config.server.is_production() {
        warn!("JWT_SECRET is using the built-in default in production");
    }

    if !config.cipher.is_configured() {
        warn!("LOGIN_ENC_KEY/LOGIN_ENC_SALT not set; login endpoints will fail");
    }

    Ok(())
}
