// Phoneme mapper — converts Sheet Text tokens into timed phoneme events.
//
// The mapper is a capability interface with two variants: `LexiconMapper`,
// the deterministic table-driven backend that is always available, and
// `ScriptedMapper`, a placeholder that reports itself unavailable so callers
// can detect the gap and substitute rather than crash.
//
// Emphasis drives prosody through three fixed rules:
//   volume       none 0.5 | soft 0.3 | loud 0.8 | shout 1.0
//   breathiness  soft 0.6, everything else 0.0 (profile baseline may raise it)
//   pitch bend   none x1.0 | soft x0.9 | loud x1.1 | shout x1.2
// The bend is scaled by the voice profile's `pitch_range` before it is
// applied to the base pitch.
//
// **Critical constraint: determinism.** Identical token sequences and start
// offsets must yield byte-identical event sequences: no randomness, no wall
// clock. The only time input is the caller-supplied batch offset.

use crate::BackendError;
use crate::event::PhonemeEvent;
use crate::lexicon::PhonemeLexicon;
use crate::profile::VoiceProfile;
use lyrebird_text::{Emphasis, Token};
use smallvec::{SmallVec, smallvec};

/// A backend that turns tokens into phoneme events.
pub trait MapperBackend {
    /// Map a token batch starting at `start_offset_ms` on the session clock.
    ///
    /// Events come back with non-decreasing `start_ms` and no primary-voice
    /// overlap: each phoneme begins where the previous one ends.
    fn map(&self, tokens: &[Token], start_offset_ms: u64)
    -> Result<Vec<PhonemeEvent>, BackendError>;
}

/// The deterministic table-driven mapper.
pub struct LexiconMapper {
    lexicon: PhonemeLexicon,
    profile: VoiceProfile,
    base_duration_ms: u32,
}

impl LexiconMapper {
    /// Default per-phoneme duration before `duration_modifier` scaling.
    pub const DEFAULT_BASE_DURATION_MS: u32 = 100;

    pub fn new(lexicon: PhonemeLexicon, profile: VoiceProfile, base_duration_ms: u32) -> Self {
        LexiconMapper {
            lexicon,
            profile,
            base_duration_ms,
        }
    }

    /// Phoneme sequence for a word: lexicon hit, or the deterministic
    /// letter-spelling fallback so every input is mappable. Words with no
    /// alphabetic characters (the standalone "..." token) spell to nothing
    /// and contribute no events.
    fn phonemes_for(&self, word: &str) -> Vec<String> {
        if let Some(phonemes) = self.lexicon.get(word) {
            return phonemes.to_vec();
        }
        word.chars()
            .filter(|c| c.is_alphabetic())
            .map(|c| c.to_lowercase().to_string())
            .collect()
    }
}

impl MapperBackend for LexiconMapper {
    fn map(
        &self,
        tokens: &[Token],
        start_offset_ms: u64,
    ) -> Result<Vec<PhonemeEvent>, BackendError> {
        let mut events = Vec::new();
        let mut cursor_ms = start_offset_ms;

        for token in tokens {
            let phonemes = self.phonemes_for(&token.text);

            // All [0,1] fields are clamped here, at the producing boundary.
            let mut volume =
                (emphasis_volume(token.emphasis) * self.profile.volume_scale).clamp(0.0, 1.0);
            let breathiness = emphasis_breathiness(token.emphasis)
                .max(self.profile.breathiness)
                .clamp(0.0, 1.0);

            let bend = 1.0 + (emphasis_pitch_mult(token.emphasis) - 1.0) * self.profile.pitch_range;
            let pitch_hz = self.profile.base_pitch_hz * bend;

            let duration_ms =
                (self.base_duration_ms as f32 * token.duration_modifier).round() as u32;
            if duration_ms == 0 {
                // A zero-length phoneme can only exist as the silence marker.
                volume = 0.0;
            }

            let harmony_intervals: SmallVec<[i8; 4]> = if token.harmony {
                smallvec![4, 7]
            } else {
                SmallVec::new()
            };

            for phoneme in phonemes {
                events.push(PhonemeEvent {
                    phoneme,
                    start_ms: cursor_ms,
                    duration_ms,
                    volume,
                    pitch_hz,
                    vibrato: token.sustain,
                    breathiness,
                    harmony_intervals: harmony_intervals.clone(),
                });
                cursor_ms += u64::from(duration_ms);
            }
        }

        Ok(events)
    }
}

fn emphasis_volume(emphasis: Emphasis) -> f32 {
    match emphasis {
        Emphasis::None => 0.5,
        Emphasis::Soft => 0.3,
        Emphasis::Loud => 0.8,
        Emphasis::Shout => 1.0,
    }
}

fn emphasis_breathiness(emphasis: Emphasis) -> f32 {
    match emphasis {
        Emphasis::Soft => 0.6,
        _ => 0.0,
    }
}

fn emphasis_pitch_mult(emphasis: Emphasis) -> f32 {
    match emphasis {
        Emphasis::None => 1.0,
        Emphasis::Soft => 0.9,
        Emphasis::Loud => 1.1,
        Emphasis::Shout => 1.2,
    }
}

/// Placeholder for a scripted phoneme backend driven by external rules.
///
/// Not yet implemented: every call reports `BackendError::Unavailable` so
/// callers can detect the gap and fall back to `LexiconMapper`.
pub struct ScriptedMapper;

impl MapperBackend for ScriptedMapper {
    fn map(&self, _tokens: &[Token], _start_offset_ms: u64) -> Result<Vec<PhonemeEvent>, BackendError> {
        Err(BackendError::Unavailable {
            backend: "scripted mapper",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::default_lexicon;
    use lyrebird_text::tokenize_str;

    fn mapper() -> LexiconMapper {
        LexiconMapper::new(
            default_lexicon(),
            VoiceProfile::default(),
            LexiconMapper::DEFAULT_BASE_DURATION_MS,
        )
    }

    #[test]
    fn lexicon_word_maps_to_its_phonemes() {
        let events = mapper().map(&[Token::plain("sun")], 0).unwrap();
        let symbols: Vec<&str> = events.iter().map(|e| e.phoneme.as_str()).collect();
        assert_eq!(symbols, vec!["s", "ah", "n"]);
    }

    #[test]
    fn unknown_word_spells_letter_by_letter() {
        let events = mapper().map(&[Token::plain("Zyx9")], 0).unwrap();
        let symbols: Vec<&str> = events.iter().map(|e| e.phoneme.as_str()).collect();
        assert_eq!(symbols, vec!["z", "y", "x"], "digits are skipped");
    }

    #[test]
    fn start_times_are_cumulative_and_non_overlapping() {
        let events = mapper().map(&tokenize_str("the sun"), 500).unwrap();
        assert_eq!(events[0].start_ms, 500);
        for pair in events.windows(2) {
            assert_eq!(
                pair[1].start_ms,
                pair[0].end_ms(),
                "each phoneme should begin where the previous ends"
            );
        }
    }

    #[test]
    fn emphasis_sets_volume_and_pitch() {
        let events = mapper().map(&tokenize_str("the SUN"), 0).unwrap();
        let the = &events[0];
        let sun = &events[2];
        assert_eq!(the.volume, 0.5);
        assert_eq!(the.pitch_hz, 220.0);
        assert_eq!(sun.volume, 0.8);
        assert!(sun.pitch_hz > the.pitch_hz, "loud should raise pitch");
    }

    #[test]
    fn soft_emphasis_is_breathy() {
        let events = mapper().map(&tokenize_str("falling _gently_ down"), 0).unwrap();
        let gently: Vec<_> = events.iter().filter(|e| e.breathiness > 0.0).collect();
        assert!(!gently.is_empty());
        for ev in gently {
            assert!(
                ev.breathiness >= 0.5,
                "soft phonemes should be breathy, got {}",
                ev.breathiness
            );
            assert_eq!(ev.volume, 0.3);
        }
    }

    #[test]
    fn sustain_doubles_duration_and_enables_vibrato() {
        let events = mapper().map(&tokenize_str("hold... this"), 0).unwrap();
        // "hold" -> hh ow l d, all sustained at 200ms.
        for ev in &events[..4] {
            assert_eq!(ev.duration_ms, 200);
            assert!(ev.vibrato);
        }
        assert_eq!(events[4].duration_ms, 100);
        assert!(!events[4].vibrato);
    }

    #[test]
    fn harmony_sets_major_third_and_fifth() {
        let events = mapper().map(&tokenize_str("[together]"), 0).unwrap();
        for ev in &events {
            assert_eq!(ev.harmony_intervals.as_slice(), &[4, 7]);
        }
    }

    #[test]
    fn plain_tokens_have_empty_harmony() {
        let events = mapper().map(&tokenize_str("together"), 0).unwrap();
        for ev in &events {
            assert!(ev.harmony_intervals.is_empty());
        }
    }

    #[test]
    fn zero_duration_modifier_becomes_silence() {
        let mut token = Token::plain("sun");
        token.duration_modifier = 0.0;
        let events = mapper().map(&[token], 0).unwrap();
        for ev in &events {
            assert_eq!(ev.duration_ms, 0);
            assert!(ev.is_silence(), "zero-length phonemes must be silence");
        }
    }

    #[test]
    fn mapping_is_deterministic() {
        let tokens = tokenize_str("the SUN... is falling _down_ and RISING [again]");
        let a = mapper().map(&tokens, 1234).unwrap();
        let b = mapper().map(&tokens, 1234).unwrap();
        // Byte-identical, not merely equal.
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[test]
    fn profile_scales_volume_and_pitch() {
        let whisper = LexiconMapper::new(
            default_lexicon(),
            VoiceProfile::whisper(),
            LexiconMapper::DEFAULT_BASE_DURATION_MS,
        );
        let events = whisper.map(&[Token::plain("sun")], 0).unwrap();
        assert_eq!(events[0].volume, 0.25); // 0.5 * 0.5 volume_scale
        assert_eq!(events[0].pitch_hz, 200.0);
        assert!(events[0].breathiness >= 0.7, "whisper baseline breathiness");
    }

    #[test]
    fn scripted_mapper_reports_unavailable() {
        let err = ScriptedMapper.map(&[Token::plain("sun")], 0).unwrap_err();
        assert!(matches!(err, BackendError::Unavailable { .. }));
    }
}
