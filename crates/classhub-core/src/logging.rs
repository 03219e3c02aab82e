//! Tracing subscriber initialization.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::logging::LoggingConfig;

/// Initialize tracing from the logging configuration.
///
/// `RUST_LOG` takes precedence over the configured level. Uses
/// `try_init` so embedding hosts (and tests) that already installed a
/// subscriber are left alone.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            let _ = fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .try_init();
        }
        _ => {
            let _ = fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .try_init();
        }
    }
}
