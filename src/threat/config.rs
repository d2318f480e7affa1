use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning values for target selection and client notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    /// A candidate in melee range must exceed the current target's threat by this factor.
    pub melee_switch_ratio: f32,
    /// A candidate anywhere must exceed the current target's threat by this factor.
    pub ranged_switch_ratio: f32,
    /// Minimum spacing between throttled threat-list updates, in milliseconds.
    pub notify_interval_ms: u32,
    /// Keep a victim reachable while it sits in engagement range even if the
    /// owner cannot otherwise get to it.
    pub engagement_grace: bool,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            melee_switch_ratio: 1.1,
            ranged_switch_ratio: 1.3,
            notify_interval_ms: 1000,
            engagement_grace: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read threat config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse threat config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be a finite value >= 1.0, got {value}")]
    RatioOutOfRange { field: &'static str, value: f32 },
    #[error("ranged_switch_ratio ({ranged}) must not be below melee_switch_ratio ({melee})")]
    RatiosInverted { melee: f32, ranged: f32 },
    #[error("notify_interval_ms must be greater than zero")]
    ZeroInterval,
}

impl ThreatConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ThreatConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("melee_switch_ratio", self.melee_switch_ratio),
            ("ranged_switch_ratio", self.ranged_switch_ratio),
        ] {
            if !value.is_finite() || value < 1.0 {
                return Err(ConfigError::RatioOutOfRange { field, value });
            }
        }
        if self.ranged_switch_ratio < self.melee_switch_ratio {
            return Err(ConfigError::RatiosInverted {
                melee: self.melee_switch_ratio,
                ranged: self.ranged_switch_ratio,
            });
        }
        if self.notify_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}
