//! Shared application state.
//!
//! One `AppState` is built at startup and cloned into every handler. It owns
//! the configuration, the token signer, the domain table and one service per
//! resource, all of which share the same connection pool.

use crate::auth::{DomainResolver, TokenService};
use crate::services::{
    ClientLocationService, ClientService, EmployeeService, LabService, LeadService, LoginService,
    PackageService, TestService,
};
use config_engine::{AppConfig, DatabaseSettings};
use crypto::LegacyCipher;
use database_layer::{DatabaseConfig, PgPool};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// False while the pool could not reach the database at startup
    db_ready: Arc<AtomicBool>,
    pub tokens: TokenService,
    pub domains: DomainResolver,
    pub leads: LeadService,
    pub packages: PackageService,
    pub logins: LoginService,
    pub clients: ClientService,
    pub labs: LabService,
    pub employees: EmployeeService,
    pub tests: TestService,
    pub client_locations: ClientLocationService,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool, db_ready: bool) -> Self {
        let tokens = TokenService::from_settings(&config.jwt);
        let domains = DomainResolver::new(&config.domains);

        let cipher = if config.cipher.is_configured() {
            match LegacyCipher::new(&config.cipher.login_enc_key, &config.cipher.login_enc_salt) {
                Ok(cipher) => Some(Arc::new(cipher)),
                Err(e) => {
                    warn!(error = %e, "Legacy cipher could not be initialised");
                    None
                }
            }
        } else {
            warn!("LOGIN_ENC_KEY/LOGIN_ENC_SALT not set; password operations will fail");
            None
        };

        Self {
            db_ready: Arc::new(AtomicBool::new(db_ready)),
            leads: LeadService::new(pool.clone()),
            packages: PackageService::new(pool.clone()),
            logins: LoginService::new(pool.clone(), cipher, tokens.clone(), domains.clone()),
            clients: ClientService::new(pool.clone()),
            labs: LabService::new(pool.clone()),
            employees: EmployeeService::new(pool.clone()),
            tests: TestService::new(pool.clone()),
            client_locations: ClientLocationService::new(pool),
            tokens,
            domains,
            config: Arc::new(config),
        }
    }

    pub fn is_db_ready(&self) -> bool {
        self.db_ready.load(Ordering::Relaxed)
    }
}

/// Pool settings for the configured database
pub fn database_config(settings: &DatabaseSettings) -> DatabaseConfig {
    let (host, port) = settings.host_and_port();
    DatabaseConfig {
        url: settings.url.clone(),
        host,
        port,
        username: settings.user.clone(),
        password: settings.password.clone(),
        database: settings.database_name.clone(),
        max_connections: settings.pool_max,
        min_connections: settings.pool_min,
        idle_timeout: settings.idle_timeout,
        require_ssl: settings.encrypt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_database_config_from_settings() {
        let settings = DatabaseSettings {
            url: None,
            server: "db.internal:6543".to_string(),
            user: "svc".to_string(),
            password: "pw".to_string(),
            database_name: "aggregator".to_string(),
            pool_max: 12,
            pool_min: 2,
            idle_timeout: Duration::from_millis(30_000),
            encrypt: true,
            trust_server_cert: true,
        };

        let config = database_config(&settings);
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, Some(6543));
        assert_eq!(config.username, "svc");
        assert_eq!(config.database, "aggregator");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.min_connections, 2);
        assert!(config.require_ssl);
        assert!(config.url.is_none());
    }
}
