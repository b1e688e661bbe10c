//! Tracing subscriber setup

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// An unparsable `RUST_LOG` is ignored with a warning. Calling this twice is
/// harmless: the second install is ignored.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected_env) = resolve_filter(rust_log.as_deref(), &config.level)?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    if let Some(error) = rejected_env {
        tracing::warn!(
            %error,
            level = %config.level,
            "Ignoring invalid RUST_LOG, using logging.level"
        );
    }
    Ok(())
}

/// Pick the filter from `RUST_LOG` when it parses, else from `level`.
///
/// The second value carries the parse error of a rejected `RUST_LOG`.
fn resolve_filter(rust_log: Option<&str>, level: &str) -> Result<(EnvFilter, Option<String>)> {
    let rejected = match rust_log.filter(|value| !value.trim().is_empty()) {
        Some(value) => match EnvFilter::try_new(value) {
            Ok(filter) => return Ok((filter, None)),
            Err(e) => Some(format!("{value:?}: {e}")),
        },
        None => None,
    };

    let filter =
        EnvFilter::try_new(level).with_context(|| format!("Invalid logging.level {level:?}"))?;
    Ok((filter, rejected))
}
