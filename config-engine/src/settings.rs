use crate::duration::parse_duration;
use crate::error::Result;
use crate::{providers, validation};
use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(24 * 3_600);
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 3_600);

/// Flat view of the environment, one field per variable.
#[derive(Debug, Deserialize)]
struct EnvSettings {
    environment: String,
    port: u16,
    domain: String,

    #[serde(default)]
    database_url: Option<String>,
    db_server: String,
    db_user: String,
    db_password: String,
    db_database_name: String,
    db_pool_max: u32,
    db_pool_min: u32,
    db_idle_timeout: u64,
    db_encrypt: bool,
    db_trust_server_cert: bool,

    jwt_secret: String,
    jwt_expires_in: String,
    jwt_refresh_expires_in: String,

    login_enc_key: String,
    login_enc_salt: String,

    client_domain_url: String,
    employee_domain_url: String,
    lab_domain_url: String,

    log_dir: String,
    log_retention_hours: u64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub cipher: CipherSettings,
    pub domains: DomainSettings,
    pub logging: LogSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// `development` or `production`
    pub environment: String,
    pub port: u16,
    pub domain: String,
}

impl ServerSettings {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

#[derive(Clone)]
pub struct DatabaseSettings {
    /// Full connection URL; takes precedence over the individual parts
    pub url: Option<String>,
    /// Host, optionally followed by `:port` or `,port`
    pub server: String,
    pub user: String,
    pub password: String,
    pub database_name: String,
    pub pool_max: u32,
    pub pool_min: u32,
    pub idle_timeout: Duration,
    pub encrypt: bool,
    pub trust_server_cert: bool,
}

impl DatabaseSettings {
    /// Split `server` into host and optional port.
    pub fn host_and_port(&self) -> (String, Option<u16>) {
        let server = self.server.trim();
        match server.rsplit_once(&[':', ','][..]) {
            Some((host, port)) => match port.trim().parse::<u16>() {
                Ok(port) => (host.trim().to_string(), Some(port)),
                Err(_) => (server.to_string(), None),
            },
            None => (server.to_string(), None),
        }
    }
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("server", &self.server)
            .field("user", &self.user)
            .field("database_name", &self.database_name)
            .field("pool_max", &self.pool_max)
            .field("pool_min", &self.pool_min)
            .field("idle_timeout", &self.idle_timeout)
            .field("encrypt", &self.encrypt)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub expires_in: String,
    pub refresh_expires_in: String,
}

impl JwtSettings {
    /// Access token lifetime, falling back to 24 hours when unparsable.
    pub fn access_ttl(&self) -> Duration {
        parse_duration(&self.expires_in).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid JWT_EXPIRES_IN, using default");
            DEFAULT_ACCESS_TTL
        })
    }

    /// Refresh token lifetime, falling back to 7 days when unparsable.
    pub fn refresh_ttl(&self) -> Duration {
        parse_duration(&self.refresh_expires_in).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid JWT_REFRESH_EXPIRES_IN, using default");
            DEFAULT_REFRESH_TTL
        })
    }
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("expires_in", &self.expires_in)
            .field("refresh_expires_in", &self.refresh_expires_in)
            .finish_non_exhaustive()
    }
}

/// Key and salt for the legacy login cipher
#[derive(Clone)]
pub struct CipherSettings {
    pub login_enc_key: String,
    pub login_enc_salt: String,
}

impl CipherSettings {
    pub fn is_configured(&self) -> bool {
        !self.login_enc_key.is_empty() && !self.login_enc_salt.is_empty()
    }
}

impl std::fmt::Debug for CipherSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherSettings")
            .field("configured", &self.is_configured())
            .finish()
    }
}

/// Deployment hostnames mapped to user types by the `X-Domain` header
#[derive(Debug, Clone, Default)]
pub struct DomainSettings {
    pub client_domain_url: String,
    pub employee_domain_url: String,
    pub lab_domain_url: String,
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub dir: PathBuf,
    pub retention_hours: u64,
}

impl AppConfig {
    /// Load `.env` (if any) and read the process environment.
    pub fn load() -> Result<Self> {
        providers::load_dotenv();
        Self::from_environment(providers::environment_source())
    }

    /// Build configuration from an explicit environment source.
    pub fn from_environment(source: Environment) -> Result<Self> {
        let raw: EnvSettings = Config::builder()
            .set_default("environment", "development")?
            .set_default("port", 5000)?
            .set_default("domain", "")?
            .set_default("db_server", "localhost")?
            .set_default("db_user", "postgres")?
            .set_default("db_password", "")?
            .set_default("db_database_name", "aggregator")?
            .set_default("db_pool_max", 10)?
            .set_default("db_pool_min", 0)?
            .set_default("db_idle_timeout", 30_000)?
            .set_default("db_encrypt", false)?
            .set_default("db_trust_server_cert", true)?
            .set_default("jwt_secret", "aggreator@123456@")?
            .set_default("jwt_expires_in", "24h")?
            .set_default("jwt_refresh_expires_in", "7d")?
            .set_default("login_enc_key", "")?
            .set_default("login_enc_salt", "")?
            .set_default("client_domain_url", "")?
            .set_default("employee_domain_url", "")?
            .set_default("lab_domain_url", "")?
            .set_default("log_dir", "logs")?
            .set_default("log_retention_hours", 24)?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        let config = Self::from(raw);
        validation::validate(&config)?;
        Ok(config)
    }
}

impl From<EnvSettings> for AppConfig {
    fn from(raw: EnvSettings) -> Self {
        Self {
            server: ServerSettings {
                environment: raw.environment,
                port: raw.port,
                domain: raw.domain,
            },
            database: DatabaseSettings {
                url: raw.database_url.filter(|url| !url.trim().is_empty()),
                server: raw.db_server,
                user: raw.db_user,
                password: raw.db_password,
                database_name: raw.db_database_name,
                pool_max: raw.db_pool_max,
                pool_min: raw.db_pool_min,
                idle_timeout: Duration::from_millis(raw.db_idle_timeout),
                encrypt: raw.db_encrypt,
                trust_server_cert: raw.db_trust_server_cert,
            },
            jwt: JwtSettings {
                secret: raw.jwt_secret,
                expires_in: raw.jwt_expires_in,
                refresh_expires_in: raw.jwt_refresh_expires_in,
            },
            cipher: CipherSettings {
                login_enc_key: raw.login_enc_key,
                login_enc_salt: raw.login_enc_salt,
            },
            domains: DomainSettings {
                client_domain_url: raw.client_domain_url,
                employee_domain_url: raw.employee_domain_url,
                lab_domain_url: raw.lab_domain_url,
            },
            logging: LogSettings {
                dir: PathBuf::from(raw.log_dir),
                retention_hours: raw.log_retention_hours,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::default().source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_environment(env(&[])).unwrap();

        assert_eq!(config.server.environment, "development");
        assert_eq!(config.server.port, 5000);
        assert!(!config.server.is_production());
        assert_eq!(config.database.pool_max, 10);
        assert_eq!(config.database.pool_min, 0);
        assert_eq!(config.database.idle_timeout, Duration::from_secs(30));
        assert!(config.database.url.is_none());
        assert_eq!(config.jwt.access_ttl(), DEFAULT_ACCESS_TTL);
        assert_eq!(config.jwt.refresh_ttl(), DEFAULT_REFRESH_TTL);
        assert!(!config.cipher.is_configured());
        assert_eq!(config.logging.dir, PathBuf::from("logs"));
        assert_eq!(config.logging.retention_hours, 24);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_environment(env(&[
            ("ENVIRONMENT", "production"),
            ("PORT", "8081"),
            ("DB_SERVER", "db.internal:6543"),
            ("DB_PASSWORD", "1.50"),
            ("DB_POOL_MAX", "25"),
            ("DB_IDLE_TIMEOUT", "5000"),
            ("DB_ENCRYPT", "true"),
            ("JWT_EXPIRES_IN", "90m"),
            ("LOGIN_ENC_KEY", "k"),
            ("LOGIN_ENC_SALT", "s"),
            ("LAB_DOMAIN_URL", "labs.example.com"),
        ]))
        .unwrap();

        assert!(config.server.is_production());
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.database.password, "1.50");
        assert_eq!(config.database.pool_max, 25);
        assert_eq!(config.database.idle_timeout, Duration::from_secs(5));
        assert!(config.database.encrypt);
        assert_eq!(
            config.database.host_and_port(),
            ("db.internal".to_string(), Some(6543))
        );
        assert_eq!(config.jwt.access_ttl(), Duration::from_secs(5_400));
        assert!(config.cipher.is_configured());
        assert_eq!(config.domains.lab_domain_url, "labs.example.com");
    }

    #[test]
    fn test_unparsable_ttl_falls_back() {
        let config = AppConfig::from_environment(env(&[
            ("JWT_EXPIRES_IN", "forever"),
            ("JWT_REFRESH_EXPIRES_IN", "1 week"),
        ]))
        .unwrap();

        assert_eq!(config.jwt.access_ttl(), DEFAULT_ACCESS_TTL);
        assert_eq!(config.jwt.refresh_ttl(), DEFAULT_REFRESH_TTL);
    }

    #[test]
    fn test_server_with_comma_port() {
        let config =
            AppConfig::from_environment(env(&[("DB_SERVER", "10.0.0.4,1433")])).unwrap();
        assert_eq!(
            config.database.host_and_port(),
            ("10.0.0.4".to_string(), Some(1433))
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AppConfig::from_environment(env(&[
            ("DB_PASSWORD", "hunter2"),
            ("JWT_SECRET", "jwt-secret-value"),
            ("LOGIN_ENC_KEY", "cipher-key"),
            ("LOGIN_ENC_SALT", "cipher-salt"),
        ]))
        .unwrap();
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("jwt-secret-value"));
        assert!(!rendered.contains("cipher-key"));
    }

    #[test]
    fn test_invalid_pool_bounds_rejected() {
        let result = AppConfig::from_environment(env(&[
            ("DB_POOL_MAX", "2"),
            ("DB_POOL_MIN", "5"),
        ]));
        assert!(result.is_err());
    }
}
