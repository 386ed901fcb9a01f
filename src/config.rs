//! Probe construction parameters.

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

/// Configuration for a [`Probe`](crate::Probe).
///
/// All fields have defaults, so a config deserialized from a partial TOML or
/// JSON table fills in the rest. Capacities are validated at probe
/// construction; zero is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Maximum number of readings retained in the signal buffer. Older
    /// readings are evicted front-first once this is exceeded. Defaults to
    /// `usize::MAX`, effectively unbounded.
    pub max_signal_length: usize,

    /// Capacity of the bounded ingestion channel created on activation.
    /// Producers block once this many values are queued. Defaults to 1, so
    /// producers are throttled by consumer speed unless raised.
    pub input_buffer_length: usize,

    /// Optional display name, used only for labeling (log events, default
    /// plot titles). Carries no behavioral weight.
    pub name: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_signal_length: usize::MAX,
            input_buffer_length: 1,
            name: None,
        }
    }
}

impl ProbeConfig {
    /// Create a config with the given signal capacity and defaults elsewhere.
    #[must_use]
    pub fn with_max_signal_length(max_signal_length: usize) -> Self {
        Self {
            max_signal_length,
            ..Self::default()
        }
    }

    /// Validate semantic constraints that type-level parsing cannot catch.
    pub fn validate(&self) -> Result<(), ProbeError> {
        if self.max_signal_length == 0 {
            return Err(ProbeError::invalid_config(
                "max_signal_length must be at least 1",
            ));
        }
        if self.input_buffer_length == 0 {
            return Err(ProbeError::invalid_config(
                "input_buffer_length must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.max_signal_length, usize::MAX);
        assert_eq!(config.input_buffer_length, 1);
        assert!(config.name.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacities_rejected() {
        let config = ProbeConfig::with_max_signal_length(0);
        assert!(config.validate().is_err());

        let config = ProbeConfig {
            input_buffer_length: 0,
            ..ProbeConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: ProbeConfig =
            serde_json::from_str(r#"{"input_buffer_length": 8}"#).unwrap();
        assert_eq!(config.input_buffer_length, 8);
        assert_eq!(config.max_signal_length, usize::MAX);
    }
}
