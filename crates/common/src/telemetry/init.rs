use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use super::TelemetryConfig;

/// Initialize structured JSON logging to stdout.
///
/// `RUST_LOG` takes precedence over the configured log level.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_span_list(true)
        .with_current_span(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    info!(service_name = %config.service_name, "telemetry initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_config_creation() {
        let config = TelemetryConfig {
            service_name: "create-device".to_string(),
            log_level: "debug".to_string(),
        };

        assert_eq!(config.service_name, "create-device");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "unknown-service");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_second_initialization_is_an_error() {
        let config = TelemetryConfig::default();
        let first = init_telemetry(&config);
        let second = init_telemetry(&config);
        // Another test may have installed the global subscriber first
        assert!(first.is_err() || second.is_err());
    }
}
