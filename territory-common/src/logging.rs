//! Session logging
//!
//! One run = one session log. Events go to stdout and to
//! `<log_dir>/injection_log_<YYYYMMDD_HHMMSS>.txt`, so the file mirrors the
//! console line for line. The subscriber is installed for the lifetime of
//! the [`SessionLog`] value only; dropping it flushes the file and restores
//! the previous subscriber.

use crate::{time, Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Scoped handle on the session log file
pub struct SessionLog {
    path: PathBuf,
    file: Arc<File>,
    _guard: DefaultGuard,
}

impl SessionLog {
    /// Create the log file and install console + file logging
    ///
    /// `level` is an `EnvFilter` directive (e.g. `info`); `RUST_LOG` overrides it.
    pub fn start(log_dir: &Path, level: &str) -> Result<Self> {
        std::fs::create_dir_all(log_dir)?;

        let stamp = time::session_stamp(&time::now());
        let path = log_dir.join(format!("injection_log_{}.txt", stamp));
        let file = Arc::new(File::create(&path)?);

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(level)
                .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", level, e)))?,
        };

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stdout))
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Arc::clone(&file)),
            );
        let guard = tracing::subscriber::set_default(subscriber);

        info!("=== Territory Injector Log Started: {} ===", stamp);

        Ok(Self {
            path,
            file,
            _guard: guard,
        })
    }

    /// Path of the session log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SessionLog {
    fn drop(&mut self) {
        let _ = (&*self.file).flush();
        let _ = self.file.sync_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_session_log_mirrors_events_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = {
            let log = SessionLog::start(temp_dir.path(), "info").unwrap();
            tracing::info!("Injected 3 zones into farms (North)");
            tracing::debug!("not at info level");
            log.path().to_path_buf()
        };

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Territory Injector Log Started"));
        assert!(content.contains("Injected 3 zones into farms (North)"));
        assert!(content.contains("INFO"));
        assert!(!content.contains("not at info level"));
    }

    #[test]
    fn test_session_log_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let log = SessionLog::start(&temp_dir.path().join("logs"), "warn").unwrap();
        let name = log.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("injection_log_"));
        assert!(name.ends_with(".txt"));
        assert!(log.path().exists());
    }
}
