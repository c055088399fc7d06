//! Application logging functionality
//!
//! Everything goes to stderr; a run also keeps a dated log file in the
//! output directory so a long batch can be inspected afterwards.

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the log file for today's runs
pub fn current_log_file_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d");
    format!("scopin-{}.log", timestamp)
}

/// Get the path to the current log file inside `logs_dir`
pub fn current_log_file(logs_dir: &Path) -> PathBuf {
    logs_dir.join(current_log_file_name())
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "scopin=debug,info"
        } else {
            "scopin=info,warn"
        })
    })
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default filter. The returned guard flushes the
/// log file when dropped and must be held until the program exits.
pub fn init(logs_dir: Option<&Path>, verbose: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match logs_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, current_log_file_name());
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
            tracing_subscriber::registry()
                .with(env_filter(verbose))
                .with(stderr_layer)
                .with(file_layer)
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter(verbose))
                .with(stderr_layer)
                .try_init()?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_is_dated() {
        let name = current_log_file_name();
        assert!(name.starts_with("scopin-"));
        assert!(name.ends_with(".log"));
        // scopin-YYYY-MM-DD.log
        assert_eq!(name.len(), "scopin-".len() + 10 + ".log".len());
        assert_eq!(
            current_log_file(Path::new("out/logs")),
            Path::new("out/logs").join(name)
        );
    }
}
