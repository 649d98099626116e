use crate::config::FileLogConfig;
use crate::error::{LoggerError, LoggerResult};
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Delete files starting with `prefix` in `dir` last modified before `retention` ago.
///
/// Returns the number of files removed.
pub fn prune_expired_logs(dir: &Path, prefix: &str, retention: Duration) -> io::Result<usize> {
    let Some(cutoff) = SystemTime::now().checked_sub(retention) else {
        return Ok(0);
    };

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(prefix) {
            continue;
        }
        if metadata.modified()? < cutoff {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    Ok(removed)
}

/// Hourly appender writing `<prefix>.<yyyy-MM-dd-HH>` files.
///
/// Files older than the retention window are pruned first; the appender
/// itself keeps at most `retention_hours` files afterwards.
pub fn hourly_appender(config: &FileLogConfig) -> LoggerResult<RollingFileAppender> {
    fs::create_dir_all(&config.dir).map_err(|source| LoggerError::LogDirectory {
        path: config.dir.display().to_string(),
        source,
    })?;

    let retention = Duration::from_secs(config.retention_hours.saturating_mul(3_600));
    if let Err(e) = prune_expired_logs(&config.dir, &config.prefix, retention) {
        eprintln!("failed to prune old log files in {}: {e}", config.dir.display());
    }

    let max_files = usize::try_from(config.retention_hours.max(1)).unwrap_or(usize::MAX);

    RollingFileAppender::builder()
        .rotation(Rotation::HOURLY)
        .filename_prefix(&config.prefix)
        .max_log_files(max_files)
        .build(&config.dir)
        .map_err(|e| LoggerError::Appender(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn age_file(path: &Path, age: Duration) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn test_prunes_only_expired_prefixed_files() {
        let dir = tempfile::tempdir().unwrap();
        let old_log = dir.path().join("api.2024-01-01-00");
        let fresh_log = dir.path().join("api.2024-01-02-00");
        let other = dir.path().join("other.txt");
        for path in [&old_log, &fresh_log, &other] {
            fs::write(path, "x").unwrap();
        }
        age_file(&old_log, Duration::from_secs(48 * 3_600));
        age_file(&other, Duration::from_secs(48 * 3_600));

        let removed =
            prune_expired_logs(dir.path(), "api", Duration::from_secs(24 * 3_600)).unwrap();

        assert_eq!(removed, 1);
        assert!(!old_log.exists());
        assert!(fresh_log.exists());
        assert!(other.exists());
    }

    #[test]
    fn test_hourly_appender_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        let appender = hourly_appender(&FileLogConfig::new(&log_dir, 24));

        assert!(appender.is_ok());
        assert!(log_dir.is_dir());
    }
}
