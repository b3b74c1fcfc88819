//! Tracing subscriber setup.
//!
//! Logs go to stderr as human-readable or JSON lines. When a log directory is
//! configured, a daily-rolling JSON file is written alongside.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;

pub const LOG_FILE_PREFIX: &str = "storefront.log";

/// Keeps the file writer flushing until dropped. Hold it for the life of `main`.
#[must_use]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_directive(base: &str, verbose: bool) -> String {
    if verbose {
        "storefront=debug,tower_http=debug".to_string()
    } else {
        base.to_string()
    }
}

pub fn init_tracing(format: LogFormat, directive: &str, log_dir: Option<&Path>) -> Result<LogGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let stderr_layer = match format {
        LogFormat::Pretty => fmt::layer().with_writer(std::io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };

    let (file_layer, file_guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LogGuard { _file: file_guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_verbose_enables_debug() {
        assert_eq!(
            default_directive("storefront=info", true),
            "storefront=debug,tower_http=debug"
        );
        assert_eq!(default_directive("storefront=warn", false), "storefront=warn");
    }
}
