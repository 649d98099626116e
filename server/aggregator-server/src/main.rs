use aggregator_server::{create_app, database_config, AppState};
use anyhow::Context;
use clap::Parser;
use colored::*;
use config_engine::AppConfig;
use database_layer::DatabasePool;
use logger_redacted::subscriber::use_colored_output;
use logger_redacted::{init_logging, FileLogConfig, LoggerConfig};
use std::net::SocketAddr;
use tracing::{error, info, warn};

/// B2B diagnostic aggregator HTTP server
#[derive(Parser, Debug)]
#[command(name = "aggregator-server")]
#[command(about = "HTTP API for leads, packages and the client/lab directories")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port; overrides PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Apply pending SQL migrations before serving
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let logger_config = LoggerConfig {
        production: config.server.is_production(),
        verbose: args.verbose,
        targets: vec![
            "aggregator_server".to_string(),
            "database_layer".to_string(),
        ],
        file: Some(FileLogConfig::new(
            config.logging.dir.clone(),
            config.logging.retention_hours,
        )),
    };
    let _log_guard = init_logging(&logger_config).context("Failed to initialise logging")?;

    if use_colored_output(&logger_config) {
        print_startup_banner();
    }

    let port = args.port.unwrap_or(config.server.port);
    info!("{}", "Starting aggregator server".bright_cyan());
    info!("Version: {}", env!("CARGO_PKG_VERSION").bright_white());
    info!("Environment: {}", config.server.environment.bright_white());

    let db_config = database_config(&config.database);
    let (pool, db_ready) = match DatabasePool::connect(&db_config).await {
        Ok(pool) => {
            info!("{}", "Database connection established".bright_green());
            (pool, true)
        }
        Err(e) => {
            error!(error = %e, "Database unreachable; serving 503 until restart");
            let pool = DatabasePool::connect_lazy(&db_config)
                .context("Invalid database configuration")?;
            (pool, false)
        }
    };

    if args.migrate {
        if db_ready {
            pool.migrate().await.context("Failed to run migrations")?;
            info!("{}", "Migrations applied".bright_green());
        } else {
            warn!("Skipping migrations: database unavailable");
        }
    }

    let state = AppState::new(config, pool.pool().clone(), db_ready);
    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", args.host, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.host, port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("{}", format!("Server running on http://{}", addr).bright_green());
    info!("{}", format!("Ping available at: http://{}/ping", addr).bright_blue());
    info!("{}", format!("API v1 available at: http://{}/api/v1", addr).bright_blue());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn print_startup_banner() {
    println!("{}", "╔══════════════════════════════════════════════════════════════╗".bright_cyan());
    println!("{}", "║                   B2B DIAGNOSTIC AGGREGATOR                  ║".bright_cyan());
    println!("{}", "║              Leads, packages and partner directory           ║".bright_cyan());
    println!("{}", "╚══════════════════════════════════════════════════════════════╝".bright_cyan());
    println!();
}
