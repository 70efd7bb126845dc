// Scenario Configuration

use std::fmt;

// ============================================================================
// Scenario Configuration
// ============================================================================

/// Experiment parameters for a single simulated run.
///
/// Constructed once from defaults plus caller-supplied overrides, then
/// immutable for the rest of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    /// Number of sensor nodes
    pub sensor_count: u32,

    /// Simulation duration (seconds)
    pub simulation_duration: f64,

    /// Interval between packets per sensor (seconds)
    pub packet_interval: f64,

    /// UDP payload size (bytes)
    pub packet_size: u32,

    /// Transmission power (dBm)
    pub tx_power: f64,
}

/// Optional named overrides applied on top of the defaults.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ScenarioOverrides {
    pub sensor_count: Option<u32>,
    pub simulation_duration: Option<f64>,
    pub packet_interval: Option<f64>,
    pub packet_size: Option<u32>,
    pub tx_power: Option<f64>,
}

impl ScenarioOverrides {
    /// Merge another override set on top of this one. Fields set in `other`
    /// win over fields set here.
    pub fn merged_with(mut self, other: ScenarioOverrides) -> Self {
        if other.sensor_count.is_some() {
            self.sensor_count = other.sensor_count;
        }
        if other.simulation_duration.is_some() {
            self.simulation_duration = other.simulation_duration;
        }
        if other.packet_interval.is_some() {
            self.packet_interval = other.packet_interval;
        }
        if other.packet_size.is_some() {
            self.packet_size = other.packet_size;
        }
        if other.tx_power.is_some() {
            self.tx_power = other.tx_power;
        }
        self
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            sensor_count: 27,
            simulation_duration: 47.0,
            packet_interval: 1.0,
            packet_size: 64,
            tx_power: 20.0,
        }
    }
}

impl ScenarioConfig {
    /// Build a validated configuration from defaults plus overrides.
    pub fn from_overrides(overrides: &ScenarioOverrides) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            sensor_count: overrides.sensor_count.unwrap_or(defaults.sensor_count),
            simulation_duration: overrides
                .simulation_duration
                .unwrap_or(defaults.simulation_duration),
            packet_interval: overrides.packet_interval.unwrap_or(defaults.packet_interval),
            packet_size: overrides.packet_size.unwrap_or(defaults.packet_size),
            tx_power: overrides.tx_power.unwrap_or(defaults.tx_power),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check all invariants: count/duration/interval/size positive and
    /// finite, tx_power finite (any sign).
    fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_count == 0 {
            return Err(ConfigError::InvalidParameter { field: "sensor_count" });
        }
        if !(self.simulation_duration.is_finite() && self.simulation_duration > 0.0) {
            return Err(ConfigError::InvalidParameter {
                field: "simulation_duration",
            });
        }
        if !(self.packet_interval.is_finite() && self.packet_interval > 0.0) {
            return Err(ConfigError::InvalidParameter {
                field: "packet_interval",
            });
        }
        if self.packet_size == 0 {
            return Err(ConfigError::InvalidParameter { field: "packet_size" });
        }
        if !self.tx_power.is_finite() {
            return Err(ConfigError::InvalidParameter { field: "tx_power" });
        }
        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while building a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An override yielded a non-positive or non-finite parameter
    InvalidParameter { field: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter { field } => {
                write!(f, "invalid parameter: {}", field)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScenarioConfig::from_overrides(&ScenarioOverrides::default()).unwrap();
        assert_eq!(config.sensor_count, 27);
        assert_eq!(config.simulation_duration, 47.0);
        assert_eq!(config.packet_interval, 1.0);
        assert_eq!(config.packet_size, 64);
        assert_eq!(config.tx_power, 20.0);
    }

    #[test]
    fn test_overrides_applied() {
        let overrides = ScenarioOverrides {
            sensor_count: Some(5),
            packet_interval: Some(0.25),
            tx_power: Some(-3.0),
            ..Default::default()
        };
        let config = ScenarioConfig::from_overrides(&overrides).unwrap();
        assert_eq!(config.sensor_count, 5);
        assert_eq!(config.packet_interval, 0.25);
        assert_eq!(config.tx_power, -3.0);
        // untouched fields keep their defaults
        assert_eq!(config.packet_size, 64);
    }

    #[test]
    fn test_negative_interval_rejected() {
        let overrides = ScenarioOverrides {
            packet_interval: Some(-1.0),
            ..Default::default()
        };
        assert_eq!(
            ScenarioConfig::from_overrides(&overrides),
            Err(ConfigError::InvalidParameter {
                field: "packet_interval"
            })
        );
    }

    #[test]
    fn test_zero_duration_rejected() {
        let overrides = ScenarioOverrides {
            simulation_duration: Some(0.0),
            ..Default::default()
        };
        assert_eq!(
            ScenarioConfig::from_overrides(&overrides),
            Err(ConfigError::InvalidParameter {
                field: "simulation_duration"
            })
        );
    }

    #[test]
    fn test_zero_sensor_count_rejected() {
        let overrides = ScenarioOverrides {
            sensor_count: Some(0),
            ..Default::default()
        };
        assert_eq!(
            ScenarioConfig::from_overrides(&overrides),
            Err(ConfigError::InvalidParameter {
                field: "sensor_count"
            })
        );
    }

    #[test]
    fn test_nan_tx_power_rejected() {
        let overrides = ScenarioOverrides {
            tx_power: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(
            ScenarioConfig::from_overrides(&overrides),
            Err(ConfigError::InvalidParameter { field: "tx_power" })
        );
    }

    #[test]
    fn test_negative_tx_power_allowed() {
        let overrides = ScenarioOverrides {
            tx_power: Some(-20.0),
            ..Default::default()
        };
        assert!(ScenarioConfig::from_overrides(&overrides).is_ok());
    }

    #[test]
    fn test_override_merge_precedence() {
        let file = ScenarioOverrides {
            sensor_count: Some(10),
            packet_size: Some(128),
            ..Default::default()
        };
        let cli = ScenarioOverrides {
            sensor_count: Some(3),
            ..Default::default()
        };
        let merged = file.merged_with(cli);
        assert_eq!(merged.sensor_count, Some(3));
        assert_eq!(merged.packet_size, Some(128));
    }
}
