// Shared Sheet Text crate.
//
// Provides the Sheet Text notation as a programmatic resource for both
// `lyrebird_engine` (input queue, scoring comparisons) and `lyrebird_voice`
// (phoneme mapping). No audio or queue dependencies — this crate is pure
// text domain.
//
// Architecture:
// - `types.rs`: Core types — `Keystroke`, `Emphasis`, `Token`
// - `tokenizer.rs`: The two-pass markup tokenizer (segmentation + shout promotion)
// - `song.rs`: `Song` — JSON-loadable expected token sequences with metadata
//
// Determinism constraint: tokenization is a pure function of the keystroke
// slice. No timestamps are read, no randomness, no global state.

pub mod song;
pub mod tokenizer;
pub mod types;

// Re-export key types at crate root for convenience.
pub use song::Song;
pub use tokenizer::{tokenize, tokenize_str};
pub use types::{Emphasis, Keystroke, Token};
