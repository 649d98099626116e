// Database connection management
use crate::error::{DatabaseError, DatabaseResult};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Connection settings for the PostgreSQL pool
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection URL; when set the discrete fields are ignored
    pub url: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout: Duration,
    pub require_ssl: bool,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("idle_timeout", &self.idle_timeout)
            .field("require_ssl", &self.require_ssl)
            .finish_non_exhaustive()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: None,
            username: "postgres".to_string(),
            password: String::new(),
            database: "aggregator".to_string(),
            max_connections: 10,
            min_connections: 0,
            idle_timeout: Duration::from_secs(30),
            require_ssl: false,
        }
    }
}

impl DatabaseConfig {
    /// Build driver connect options from either the URL or the discrete fields.
    pub fn connect_options(&self) -> DatabaseResult<PgConnectOptions> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url)
                .map_err(|e| DatabaseError::ConnectionFailed(format!("Invalid DATABASE_URL: {}", e)));
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .database(&self.database)
            .ssl_mode(if self.require_ssl {
                PgSslMode::Require
            } else {
                PgSslMode::Prefer
            });

        if let Some(port) = self.port {
            options = options.port(port);
        }
        if !self.password.is_empty() {
            options = options.password(&self.password);
        }

        Ok(options)
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(self.idle_timeout)
            .max_lifetime(Duration::from_secs(1800))
    }
}

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Connect eagerly; fails when the database is unreachable.
    pub async fn connect(config: &DatabaseConfig) -> DatabaseResult<Self> {
        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database connection pool created successfully"
        );

        Ok(Self { pool })
    }

    /// Create a pool that opens connections on first use.
    pub fn connect_lazy(config: &DatabaseConfig) -> DatabaseResult<Self> {
        let pool = config
            .pool_options()
            .connect_lazy_with(config.connect_options()?);

        Ok(Self { pool })
    }

    /// Get the underlying PgPool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending schema migrations from `migrations/`
    pub async fn migrate(&self) -> DatabaseResult<()> {
        sqlx::migrate!("../migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Close the pool
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}
