use crate::config::LoggerConfig;
use crate::error::{LoggerError, LoggerResult};
use crate::formatter::ColoredFormatter;
use crate::rotation::hourly_appender;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Keeps the non-blocking file writer alive; drop it only at shutdown.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Whether console output should use the colored development format.
pub fn use_colored_output(config: &LoggerConfig) -> bool {
    !config.production && std::env::var("NO_COLOR").is_err() && atty::is(atty::Stream::Stdout)
}

/// Install the global tracing subscriber.
///
/// Console output is colored in development on a terminal and JSON
/// otherwise. When file output is configured, every event is also written
/// as JSON to an hourly rolling file.
pub fn init_logging(config: &LoggerConfig) -> LoggerResult<LoggingGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directives()));

    let (file_layer, file_guard) = match &config.file {
        Some(file_config) => {
            let appender = hourly_appender(file_config)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    let installed = if use_colored_output(config) {
        registry
            .with(fmt::layer().with_ansi(true).event_format(ColoredFormatter::new()))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false),
            )
            .try_init()
    };
    installed.map_err(|e| LoggerError::Init(e.to_string()))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
