// Phoneme events — the timed units of sound the mapper emits and the
// synthesizer consumes.
//
// An event is fully self-describing: the synthesizer needs nothing beyond
// the event and its own configuration to render PCM. Harmony voices are
// derived from `harmony_intervals` at render time and layered in parallel —
// they are never separate queue entries.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A single phoneme with timing and prosody parameters.
///
/// Invariants, maintained by the mapper that produces events:
/// - `volume` and `breathiness` are already clamped to [0, 1];
/// - `duration_ms > 0` unless `volume == 0.0` (the explicit silence marker);
/// - within one mapper batch, `start_ms` is non-decreasing and primary-voice
///   events never overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhonemeEvent {
    /// ARPAbet-style phoneme symbol (e.g. "dh", "ax").
    pub phoneme: String,
    /// Session time at which the phoneme begins, in milliseconds.
    pub start_ms: u64,
    /// How long the phoneme sounds, in milliseconds.
    pub duration_ms: u32,
    /// Amplitude scale in [0, 1]. Zero means an explicit silence event.
    pub volume: f32,
    /// Fundamental frequency of the carrier, always positive.
    pub pitch_hz: f32,
    /// Apply low-frequency pitch modulation (sustained phonemes).
    pub vibrato: bool,
    /// Noise blend proportion in [0, 1].
    pub breathiness: f32,
    /// Signed semitone offsets for parallel harmony voices, in order.
    /// Empty for a solo phoneme. Rarely more than two, hence the inline vec.
    pub harmony_intervals: SmallVec<[i8; 4]>,
}

impl PhonemeEvent {
    /// End of the phoneme on the session clock.
    pub fn end_ms(&self) -> u64 {
        self.start_ms + u64::from(self.duration_ms)
    }

    /// Whether this event is an explicit silence marker.
    pub fn is_silence(&self) -> bool {
        self.volume == 0.0
    }
}
