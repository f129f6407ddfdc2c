use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{LogFormat, LoggingConfig};

/// Install a tracing subscriber whose output is captured by the test harness.
///
/// `RUST_LOG` wins over the configured level. Only the first call in a
/// process installs a subscriber; later calls return `Ok(false)`.
pub fn init_test_logging(config: &LoggingConfig) -> Result<bool> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log level configuration")?;

    let registry = Registry::default().with(env_filter);

    let installed = match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_test_writer()
                .with_target(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true);

            registry.with(fmt_layer).try_init().is_ok()
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_test_writer()
                .with_target(true)
                .with_thread_names(true)
                .with_span_list(true)
                .flatten_event(true);

            registry.with(fmt_layer).try_init().is_ok()
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_test_writer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);

            registry.with(fmt_layer).try_init().is_ok()
        }
    };

    if installed {
        tracing::debug!(
            log_level = %config.level,
            log_format = ?config.format,
            "Mock vendor logging initialized"
        );
    }

    Ok(installed)
}
