// Core Sheet Text types: keystrokes, emphasis levels, and prosody tokens.
//
// These types are shared by the engine crate (input queue, scoring) and the
// voice crate (phoneme mapping). A `Keystroke` is what the player produces;
// a `Token` is what the tokenizer distills a word into. Everything derives
// `Serialize`/`Deserialize` so songs, recordings, and session state can move
// through JSON unchanged.
//
// Determinism constraint: these types carry caller-supplied timestamps only.
// Nothing here reads the system clock.

use serde::{Deserialize, Serialize};

/// A single typed character with its modifier state.
///
/// Immutable once enqueued: the input queue stores keystrokes exactly as
/// fed, and the tokenizer consumes them without modification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keystroke {
    /// The character produced by the keypress.
    pub character: char,
    /// Shift was held (or the character implies it, see `from_char`).
    pub shift: bool,
    /// Ctrl was held — marks the word for harmony.
    pub ctrl: bool,
    /// Alt was held. Reserved; no markup rule reads it yet.
    pub alt: bool,
    /// Session time at which the keystroke was enqueued, in milliseconds.
    pub timestamp_ms: u64,
}

impl Keystroke {
    /// Build a keystroke from a plain character, inferring `shift` from
    /// uppercase. Convenience for `feed_text` and tests; `ctrl`/`alt` are
    /// false and the timestamp is zero (callers stamp it on enqueue).
    pub fn from_char(character: char) -> Self {
        Self {
            character,
            shift: character.is_uppercase(),
            ctrl: false,
            alt: false,
            timestamp_ms: 0,
        }
    }

    /// Same as `from_char` with ctrl held.
    pub fn from_char_ctrl(character: char) -> Self {
        Self {
            ctrl: true,
            ..Self::from_char(character)
        }
    }
}

/// Emphasis level of a token, ordered from quietest to loudest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    /// Unmarked text.
    #[default]
    None,
    /// `_underscore_`-wrapped text — quiet and breathy.
    Soft,
    /// A single all-caps word.
    Loud,
    /// A run of two or more consecutive all-caps words.
    Shout,
}

/// A parsed unit of Sheet Text with prosody annotations.
///
/// Produced by the tokenizer, consumed once by the phoneme mapper. Songs
/// store the expected token sequence in this same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The word text with markup delimiters stripped.
    pub text: String,
    /// Emphasis level derived from caps/underscore markup.
    #[serde(default)]
    pub emphasis: Emphasis,
    /// A trailing ellipsis was attached — hold the note.
    #[serde(default)]
    pub sustain: bool,
    /// Bracket-wrapped or ctrl-typed — layer harmony voices.
    #[serde(default)]
    pub harmony: bool,
    /// Multiplier on each constituent phoneme's base duration. Always >= 0;
    /// clamped here, at the producing boundary, never downstream.
    #[serde(default = "default_duration_modifier")]
    pub duration_modifier: f32,
}

fn default_duration_modifier() -> f32 {
    1.0
}

impl Token {
    /// A plain token with no markup: emphasis none, no sustain, no harmony,
    /// unit duration.
    pub fn plain(text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            emphasis: Emphasis::None,
            sustain: false,
            harmony: false,
            duration_modifier: 1.0,
        }
    }
}
