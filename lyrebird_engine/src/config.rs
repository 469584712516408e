// Engine configuration and construction-time validation.
//
// `EngineConfig` gathers every tunable the orchestrator needs: the
// difficulty preset (capacities, zones, scoring rates), synthesis sample
// rate, per-phoneme base duration, the input chunk consumed per tick, the
// rate-tracking window, and the noise seed.
//
// Validation happens exactly once, before any queue or backend is built.
// Misconfiguration is the only fatal error in the system: there is no
// meaningful runtime recovery from a zero-capacity queue or a zero sample
// rate, so construction rejects it and nothing else ever fails.

use crate::difficulty::Difficulty;
use lyrebird_voice::DEFAULT_SAMPLE_RATE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level configuration for one performance session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Difficulty preset: queue capacities, zone thresholds, scoring.
    pub difficulty: Difficulty,
    /// Synthesizer output rate in Hz.
    pub sample_rate: u32,
    /// Base per-phoneme duration before `duration_modifier` scaling, ms.
    pub base_duration_ms: u32,
    /// Keystrokes consumed from the input queue per tick.
    pub chunk_size: usize,
    /// Trailing window for fill/drain rate estimation, ms.
    pub rate_window_ms: u64,
    /// Seed for the synthesizer's breathiness noise.
    pub noise_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            difficulty: Difficulty::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            base_duration_ms: 100,
            chunk_size: 8,
            rate_window_ms: 2000,
            noise_seed: 0,
        }
    }
}

impl EngineConfig {
    /// Default config with a specific difficulty preset.
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        EngineConfig {
            difficulty,
            ..Self::default()
        }
    }

    /// Reject misconfiguration before any tick runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty.input_capacity == 0 {
            return Err(ConfigError::ZeroCapacity { queue: "input" });
        }
        if self.difficulty.output_capacity == 0 {
            return Err(ConfigError::ZeroCapacity { queue: "output" });
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.base_duration_ms == 0 {
            return Err(ConfigError::ZeroBaseDuration);
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        let (low, high) = (self.difficulty.zone_low, self.difficulty.zone_high);
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low >= high {
            return Err(ConfigError::InvalidZoneThresholds { low, high });
        }
        Ok(())
    }
}

/// Fatal construction-time configuration errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A queue capacity of zero makes every push an overflow.
    ZeroCapacity { queue: &'static str },
    /// The synthesizer cannot emit samples at 0 Hz.
    ZeroSampleRate,
    /// Every phoneme would be zero-length.
    ZeroBaseDuration,
    /// The orchestrator would never consume input.
    ZeroChunkSize,
    /// Zone thresholds must satisfy 0 <= low < high <= 1.
    InvalidZoneThresholds { low: f32, high: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity { queue } => {
                write!(f, "{queue} queue capacity must be positive")
            }
            ConfigError::ZeroSampleRate => write!(f, "sample rate must be positive"),
            ConfigError::ZeroBaseDuration => write!(f, "base phoneme duration must be positive"),
            ConfigError::ZeroChunkSize => write!(f, "per-tick input chunk size must be positive"),
            ConfigError::InvalidZoneThresholds { low, high } => {
                write!(f, "zone thresholds must satisfy 0 <= low < high <= 1, got {low}..{high}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn every_difficulty_preset_is_valid() {
        for name in Difficulty::preset_names() {
            let config = EngineConfig::with_difficulty(Difficulty::by_name(name).unwrap());
            assert!(config.validate().is_ok(), "preset {name} should validate");
        }
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut config = EngineConfig::default();
        config.difficulty.output_capacity = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCapacity { queue: "output" })
        );
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        let config = EngineConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSampleRate));
    }

    #[test]
    fn inverted_zone_thresholds_are_rejected() {
        let mut config = EngineConfig::default();
        config.difficulty.zone_low = 0.8;
        config.difficulty.zone_high = 0.2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidZoneThresholds { .. })
        ));
    }

    #[test]
    fn config_errors_display() {
        let err = ConfigError::ZeroCapacity { queue: "input" };
        assert!(err.to_string().contains("input queue"));
    }
}
