use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::errors::{WeedScopeError, WeedScopeResult};

/// Stream the console layer writes to. Commands that print results on
/// stdout log to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

impl ConsoleTarget {
    fn writer(self) -> BoxMakeWriter {
        match self {
            ConsoleTarget::Stdout => BoxMakeWriter::new(std::io::stdout),
            ConsoleTarget::Stderr => BoxMakeWriter::new(std::io::stderr),
        }
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level; the file layer is only added when enabled.
pub fn init_logging(config: &LoggingConfig, console: ConsoleTarget) -> WeedScopeResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.level)?,
    };

    let file_layer = if config.log_to_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_path)?;
        Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(console.writer()))
        .with(file_layer)
        .try_init()
        .map_err(|e| WeedScopeError::Internal(format!("logging already initialised: {e}")))?;

    if config.log_to_file {
        tracing::info!(path = %config.log_path.display(), "logging to file");
    }
    Ok(())
}

/// Run `f` under a temporary stderr subscriber, for work that happens before
/// the configured subscriber can be installed (loading the config itself).
pub fn with_bootstrap_logging<T>(f: impl FnOnce() -> T) -> T {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

fn level_filter(level: &str) -> WeedScopeResult<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| WeedScopeError::Config(format!("invalid log level '{level}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_levels_and_directives() {
        assert!(level_filter("info").is_ok());
        assert!(level_filter("weedscope=debug,tower_http=info").is_ok());
    }

    #[test]
    fn bootstrap_logging_returns_the_closure_result() {
        let value = with_bootstrap_logging(|| {
            tracing::info!("emitted before the global subscriber exists");
            41 + 1
        });
        assert_eq!(value, 42);
    }
}
