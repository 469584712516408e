// Difficulty presets — the tunable gameplay parameters, as data.
//
// Everything that makes a session easier or harder lives in one serde
// struct: queue capacities, the optimal-zone thresholds, per-tick point
// rates, the token bonus multiplier, and the grade thresholds. The engine
// reads these from its config — never magic numbers — so balance iteration
// is a data change, and tests can construct degenerate presets freely.
//
// Named preset constructors produce the shipped tiers; `by_name` resolves
// them case-insensitively for the CLI and song metadata.

use crate::scoring::{GradeScale, TickRates};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gameplay parameters that vary by difficulty tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Display name.
    pub name: String,
    /// Max keystrokes in the input queue.
    pub input_capacity: usize,
    /// Max phoneme events in the output queue.
    pub output_capacity: usize,
    /// Below this fill level the output queue reads Under.
    pub zone_low: f32,
    /// Above this fill level the output queue reads Over.
    pub zone_high: f32,
    /// Points per tick by zone.
    pub tick_rates: TickRates,
    /// Multiplier on token accuracy bonuses.
    pub token_bonus_multiplier: f32,
    /// Grade thresholds on accumulated points.
    pub grade_scale: GradeScale,
    /// Short description for UI display.
    pub description: String,
}

impl Difficulty {
    /// Wide buffer zone, gentle penalties. Great for learning.
    pub fn easy() -> Self {
        Difficulty {
            name: "Easy".into(),
            input_capacity: 512,
            output_capacity: 256,
            zone_low: 0.1,
            zone_high: 0.9,
            tick_rates: TickRates {
                optimal: 10,
                under: -2,
                over: -1,
            },
            token_bonus_multiplier: 1.0,
            grade_scale: GradeScale {
                s: 6000,
                a: 4500,
                b: 3000,
                c: 1500,
                d: 500,
            },
            description: "Wide buffer zone, gentle penalties. Great for learning.".into(),
        }
    }

    /// Standard buffer zone and penalties. The intended experience.
    pub fn medium() -> Self {
        Difficulty {
            name: "Medium".into(),
            input_capacity: 256,
            output_capacity: 128,
            zone_low: 0.2,
            zone_high: 0.8,
            tick_rates: TickRates {
                optimal: 10,
                under: -5,
                over: -3,
            },
            token_bonus_multiplier: 1.5,
            grade_scale: GradeScale::default(),
            description: "Standard buffer zone and penalties. The intended experience.".into(),
        }
    }

    /// Narrow buffer zone, harsh penalties. For experienced players.
    pub fn hard() -> Self {
        Difficulty {
            name: "Hard".into(),
            input_capacity: 128,
            output_capacity: 64,
            zone_low: 0.3,
            zone_high: 0.7,
            tick_rates: TickRates {
                optimal: 15,
                under: -10,
                over: -7,
            },
            token_bonus_multiplier: 2.0,
            grade_scale: GradeScale {
                s: 12000,
                a: 9500,
                b: 7000,
                c: 4500,
                d: 2000,
            },
            description: "Narrow buffer zone, harsh penalties. For experienced players.".into(),
        }
    }

    /// Razor-thin buffer zone. Only for virtuosos.
    pub fn expert() -> Self {
        Difficulty {
            name: "Expert".into(),
            input_capacity: 64,
            output_capacity: 32,
            zone_low: 0.35,
            zone_high: 0.65,
            tick_rates: TickRates {
                optimal: 20,
                under: -15,
                over: -12,
            },
            token_bonus_multiplier: 3.0,
            grade_scale: GradeScale {
                s: 15000,
                a: 12000,
                b: 9000,
                c: 6000,
                d: 3000,
            },
            description: "Razor-thin buffer zone. Only for virtuosos.".into(),
        }
    }

    /// Look up a preset by name, case-insensitively.
    pub fn by_name(name: &str) -> Result<Difficulty, UnknownDifficulty> {
        match name.to_lowercase().as_str() {
            "easy" => Ok(Self::easy()),
            "medium" => Ok(Self::medium()),
            "hard" => Ok(Self::hard()),
            "expert" => Ok(Self::expert()),
            _ => Err(UnknownDifficulty {
                requested: name.to_string(),
            }),
        }
    }

    /// All preset names, in order of increasing challenge.
    pub fn preset_names() -> &'static [&'static str] {
        &["easy", "medium", "hard", "expert"]
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::medium()
    }
}

/// Lookup failure for `Difficulty::by_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty {
    pub requested: String,
}

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown difficulty {:?}; valid: {}",
            self.requested,
            Difficulty::preset_names().join(", ")
        )
    }
}

impl std::error::Error for UnknownDifficulty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_narrow_with_challenge() {
        let tiers = [
            Difficulty::easy(),
            Difficulty::medium(),
            Difficulty::hard(),
            Difficulty::expert(),
        ];
        for pair in tiers.windows(2) {
            assert!(
                pair[1].output_capacity < pair[0].output_capacity,
                "{} should have a smaller buffer than {}",
                pair[1].name,
                pair[0].name
            );
            let width = |d: &Difficulty| d.zone_high - d.zone_low;
            assert!(
                width(&pair[1]) < width(&pair[0]),
                "{} should have a narrower optimal zone than {}",
                pair[1].name,
                pair[0].name
            );
        }
    }

    #[test]
    fn zone_thresholds_are_sane() {
        for name in Difficulty::preset_names() {
            let d = Difficulty::by_name(name).unwrap();
            assert!(d.zone_low < d.zone_high, "{name} thresholds inverted");
            assert!(d.zone_low >= 0.0 && d.zone_high <= 1.0);
        }
    }

    #[test]
    fn by_name_is_case_insensitive() {
        assert_eq!(Difficulty::by_name("EXPERT").unwrap().name, "Expert");
    }

    #[test]
    fn unknown_difficulty_error_lists_presets() {
        let err = Difficulty::by_name("nightmare").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nightmare"));
        assert!(msg.contains("easy") && msg.contains("expert"));
    }

    #[test]
    fn serde_roundtrip() {
        let d = Difficulty::hard();
        let json = serde_json::to_string(&d).unwrap();
        let restored: Difficulty = serde_json::from_str(&json).unwrap();
        assert_eq!(d, restored);
    }
}
