// The Lyrebird voice — phoneme mapping and waveform synthesis.
//
// This crate turns prosody tokens from `lyrebird_text` into sound: a fixed
// word→phoneme lexicon maps tokens to timed `PhonemeEvent`s, and an
// oscillator synthesizer renders each event to 16-bit PCM. Voice profiles
// shift the register of both stages.
//
// Architecture:
// - `event.rs`:   `PhonemeEvent` — the timed unit of synthesized sound
// - `lexicon.rs`: `PhonemeLexicon` — injected word→phoneme table (JSON,
//                 embedded default via `include_str!`)
// - `mapper.rs`:  `MapperBackend` trait; `LexiconMapper` + `ScriptedMapper`
// - `profile.rs`: `VoiceProfile` — named presets (alto, whisper, robot, ...)
// - `synth.rs`:   `SynthBackend` trait; `OscillatorSynth` + `FormantSynth`
// - `wav.rs`:     Mono 16-bit WAV output via `hound`
//
// Both mapper and synthesizer are capability interfaces: the table-driven /
// oscillator variants are always available and fully deterministic; the
// placeholder variants report `BackendError::Unavailable` instead of
// panicking, so callers can detect and substitute.
//
// Determinism constraint: mapping is a pure function of its inputs; the
// synthesizer's only randomness is breathiness noise drawn from a seeded
// `lyrebird_prng::NoiseRng`.

pub mod event;
pub mod lexicon;
pub mod mapper;
pub mod profile;
pub mod synth;
pub mod wav;

// Re-export key types at crate root for convenience.
pub use event::PhonemeEvent;
pub use lexicon::{PhonemeLexicon, default_lexicon};
pub use mapper::{LexiconMapper, MapperBackend, ScriptedMapper};
pub use profile::VoiceProfile;
pub use synth::{DEFAULT_SAMPLE_RATE, FormantSynth, OscillatorSynth, SynthBackend};

use std::fmt;

/// Failure modes shared by mapper and synthesizer backends.
///
/// `Unavailable` is the distinct "not yet available" signal the placeholder
/// variants return — callers detect it and substitute a working backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend exists as a declared capability but has no implementation.
    Unavailable { backend: &'static str },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unavailable { backend } => {
                write!(f, "{backend} backend is not yet available")
            }
        }
    }
}

impl std::error::Error for BackendError {}
