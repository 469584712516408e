// Voice profiles — named sets of synthesis parameter overrides.
//
// A profile shifts the whole performance's register without touching the
// markup rules: base pitch, how far emphasis bends pitch, vibrato shape,
// default breathiness, and overall volume. Presets are plain constructors
// so callers can also build fully custom profiles field-by-field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A customizable voice that modifies mapper and synthesizer parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// Display name.
    pub name: String,
    /// Base fundamental frequency in Hz (higher = higher voice).
    pub base_pitch_hz: f32,
    /// Scale on the emphasis pitch bend (1.0 = the standard ±20% swing).
    pub pitch_range: f32,
    /// Vibrato depth in Hz (0 disables pitch wobble even when sustained).
    pub vibrato_depth_hz: f32,
    /// Vibrato rate in Hz.
    pub vibrato_rate_hz: f32,
    /// Baseline breathiness in [0, 1]; soft emphasis raises it further.
    pub breathiness: f32,
    /// Overall volume multiplier applied by the mapper.
    pub volume_scale: f32,
    /// Short description for UI display.
    pub description: String,
}

impl Default for VoiceProfile {
    fn default() -> Self {
        VoiceProfile {
            name: "Default".into(),
            base_pitch_hz: 220.0,
            pitch_range: 1.0,
            vibrato_depth_hz: 10.0,
            vibrato_rate_hz: 5.0,
            breathiness: 0.0,
            volume_scale: 1.0,
            description: "Standard neutral voice.".into(),
        }
    }
}

impl VoiceProfile {
    /// Warm lower register.
    pub fn alto() -> Self {
        VoiceProfile {
            name: "Alto".into(),
            base_pitch_hz: 196.0,
            pitch_range: 0.9,
            vibrato_depth_hz: 8.0,
            description: "Warm lower register.".into(),
            ..Self::default()
        }
    }

    /// Bright higher register.
    pub fn soprano() -> Self {
        VoiceProfile {
            name: "Soprano".into(),
            base_pitch_hz: 330.0,
            pitch_range: 1.2,
            vibrato_depth_hz: 12.0,
            description: "Bright higher register.".into(),
            ..Self::default()
        }
    }

    /// Deep lower register.
    pub fn bass() -> Self {
        VoiceProfile {
            name: "Bass".into(),
            base_pitch_hz: 110.0,
            pitch_range: 0.8,
            vibrato_depth_hz: 6.0,
            volume_scale: 1.1,
            description: "Deep lower register.".into(),
            ..Self::default()
        }
    }

    /// Soft, breathy whisper voice.
    pub fn whisper() -> Self {
        VoiceProfile {
            name: "Whisper".into(),
            base_pitch_hz: 200.0,
            pitch_range: 0.5,
            vibrato_depth_hz: 0.0,
            breathiness: 0.7,
            volume_scale: 0.5,
            description: "Soft, breathy whisper voice.".into(),
            ..Self::default()
        }
    }

    /// Flat, mechanical tone: no vibrato, no pitch bend to speak of.
    pub fn robot() -> Self {
        VoiceProfile {
            name: "Robot".into(),
            base_pitch_hz: 180.0,
            pitch_range: 0.3,
            vibrato_depth_hz: 0.0,
            vibrato_rate_hz: 0.0,
            volume_scale: 0.9,
            description: "Flat, mechanical tone.".into(),
            ..Self::default()
        }
    }

    /// Look up a preset by name, case-insensitively.
    pub fn by_name(name: &str) -> Result<VoiceProfile, UnknownVoice> {
        match name.to_lowercase().as_str() {
            "default" => Ok(Self::default()),
            "alto" => Ok(Self::alto()),
            "soprano" => Ok(Self::soprano()),
            "bass" => Ok(Self::bass()),
            "whisper" => Ok(Self::whisper()),
            "robot" => Ok(Self::robot()),
            _ => Err(UnknownVoice {
                requested: name.to_string(),
            }),
        }
    }

    /// All preset names, in ascending pitch order.
    pub fn preset_names() -> &'static [&'static str] {
        &["bass", "robot", "alto", "whisper", "default", "soprano"]
    }
}

/// Lookup failure for `VoiceProfile::by_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVoice {
    pub requested: String,
}

impl fmt::Display for UnknownVoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown voice {:?}; valid: {}",
            self.requested,
            VoiceProfile::preset_names().join(", ")
        )
    }
}

impl std::error::Error for UnknownVoice {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_is_case_insensitive() {
        let profile = VoiceProfile::by_name("SoPrAnO").unwrap();
        assert_eq!(profile.name, "Soprano");
        assert_eq!(profile.base_pitch_hz, 330.0);
    }

    #[test]
    fn unknown_voice_error_lists_presets() {
        let err = VoiceProfile::by_name("falsetto").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("falsetto"), "message should echo the request");
        assert!(msg.contains("soprano"), "message should list valid names");
    }

    #[test]
    fn every_preset_name_resolves() {
        for name in VoiceProfile::preset_names() {
            assert!(VoiceProfile::by_name(name).is_ok(), "preset {name} missing");
        }
    }

    #[test]
    fn robot_has_no_vibrato() {
        let robot = VoiceProfile::robot();
        assert_eq!(robot.vibrato_depth_hz, 0.0);
        assert_eq!(robot.vibrato_rate_hz, 0.0);
    }
}
