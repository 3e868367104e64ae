//! Log subscriber setup.

use ecoledger_types::{LedgerError, LogFormat, LoggingConfig, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global `tracing` subscriber built from `config`.
///
/// `RUST_LOG` takes precedence over `config.level`, but `config.level` is
/// checked either way. If a global subscriber is already installed the call
/// does nothing, so tests and embedding hosts may call it repeatedly.
///
/// # Errors
/// Returns [`LedgerError::Configuration`] if `config.level` is not a valid
/// filter directive.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let configured = level_filter(&config.level)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or(configured);

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };
    if installed.is_ok() {
        tracing::debug!(level = %config.level, format = ?config.format, "tracing initialised");
    }
    Ok(())
}

fn level_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| LedgerError::Configuration(format!("invalid log level {level:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let config = LoggingConfig::default();
        init_tracing(&config).unwrap();
        init_tracing(&config).unwrap();
    }

    #[test]
    fn json_format_initialises() {
        let config = LoggingConfig {
            level: "ecoledger=debug".into(),
            format: LogFormat::Json,
        };
        init_tracing(&config).unwrap();
    }

    #[test]
    fn invalid_level_is_configuration_error() {
        let config = LoggingConfig {
            level: "ecoledger=loudest".into(),
            format: LogFormat::Pretty,
        };
        let err = init_tracing(&config).unwrap_err();
        assert!(matches!(err, LedgerError::Configuration(ref msg) if msg.contains("loudest")), "{err}");
        assert!(level_filter("warn,ecoledger_state=trace").is_ok());
    }
}
