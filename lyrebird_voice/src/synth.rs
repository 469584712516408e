// Waveform synthesis — renders phoneme events to 16-bit PCM.
//
// Like the mapper, synthesis is a capability interface with two variants:
// `OscillatorSynth` (always available) and the `FormantSynth` placeholder.
//
// The oscillator renders a sine carrier at the event's pitch, amplitude
// scaled by its volume. Vibrato modulates the carrier with a low-frequency
// oscillator; breathiness crossfades noise into the tone; harmony intervals
// layer additional carriers at equal-tempered transpositions. The harmony
// sum is NOT renormalized — loudness is part of the harmony mechanic — and
// clipping is prevented only at i16 quantization.
//
// Output is mono, fixed-rate (22,050 Hz by default), 16-bit signed linear
// PCM. `sample_count = round(sample_rate * duration_ms / 1000)`.
//
// Noise comes from an owned `NoiseRng`: renders are reproducible given the
// construction seed and call order, which is what the engine's determinism
// tests rely on.

use crate::BackendError;
use crate::event::PhonemeEvent;
use crate::profile::VoiceProfile;
use lyrebird_prng::NoiseRng;
use std::f32::consts::TAU;

/// Default output sample rate, Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 22_050;

/// A backend that renders phoneme events to PCM sample buffers.
pub trait SynthBackend {
    /// Render one event. The returned buffer always has exactly
    /// `round(sample_rate * duration_ms / 1000)` samples; a `volume` of 0.0
    /// yields an all-zero buffer of that length (the silence contract),
    /// never an error or a skip.
    fn render(&mut self, event: &PhonemeEvent) -> Result<Vec<i16>, BackendError>;

    /// The backend's output sample rate in Hz.
    fn sample_rate(&self) -> u32;
}

/// The always-available sine oscillator synthesizer.
pub struct OscillatorSynth {
    sample_rate: u32,
    vibrato_rate_hz: f32,
    vibrato_depth_hz: f32,
    noise: NoiseRng,
}

impl OscillatorSynth {
    /// Standard voice: 5 Hz vibrato at ±10 Hz depth.
    pub fn new(sample_rate: u32, seed: u64) -> Self {
        OscillatorSynth {
            sample_rate,
            vibrato_rate_hz: 5.0,
            vibrato_depth_hz: 10.0,
            noise: NoiseRng::new(seed),
        }
    }

    /// Vibrato shape taken from a voice profile.
    pub fn with_profile(sample_rate: u32, profile: &VoiceProfile, seed: u64) -> Self {
        OscillatorSynth {
            sample_rate,
            vibrato_rate_hz: profile.vibrato_rate_hz,
            vibrato_depth_hz: profile.vibrato_depth_hz,
            noise: NoiseRng::new(seed),
        }
    }
}

impl SynthBackend for OscillatorSynth {
    fn render(&mut self, event: &PhonemeEvent) -> Result<Vec<i16>, BackendError> {
        let num_samples = (f64::from(self.sample_rate) * f64::from(event.duration_ms) / 1000.0)
            .round() as usize;

        // Silence contract: correct length, all zeros.
        if event.volume <= 0.0 {
            return Ok(vec![0i16; num_samples]);
        }

        let mut samples = Vec::with_capacity(num_samples);
        for i in 0..num_samples {
            let t = i as f32 / self.sample_rate as f32;

            // Carrier frequency, with optional vibrato LFO.
            let mut freq = event.pitch_hz;
            if event.vibrato {
                freq += self.vibrato_depth_hz * (TAU * self.vibrato_rate_hz * t).sin();
            }

            let mut value = (TAU * freq * t).sin();

            // Harmony voices at equal-tempered transpositions of the
            // (already vibrato-modulated) carrier. Superposed, not
            // renormalized.
            for &interval in &event.harmony_intervals {
                let ratio = 2f32.powf(f32::from(interval) / 12.0);
                value += 0.5 * (TAU * freq * ratio * t).sin();
            }

            // Breathiness crossfades noise into the tone.
            if event.breathiness > 0.0 {
                let b = event.breathiness;
                value = value * (1.0 - b) + self.noise.next_sample() * b;
            }

            value *= event.volume;

            // Clipping prevention happens here and only here.
            let quantized = (value * 32767.0).clamp(-32768.0, 32767.0) as i16;
            samples.push(quantized);
        }

        Ok(samples)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Placeholder for a formant-filter synthesis backend.
///
/// Not yet implemented: every render reports `BackendError::Unavailable`
/// so callers can detect the gap and fall back to `OscillatorSynth`.
pub struct FormantSynth {
    sample_rate: u32,
}

impl FormantSynth {
    pub fn new(sample_rate: u32) -> Self {
        FormantSynth { sample_rate }
    }
}

impl SynthBackend for FormantSynth {
    fn render(&mut self, _event: &PhonemeEvent) -> Result<Vec<i16>, BackendError> {
        Err(BackendError::Unavailable {
            backend: "formant synth",
        })
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::{SmallVec, smallvec};

    fn event(duration_ms: u32, volume: f32) -> PhonemeEvent {
        PhonemeEvent {
            phoneme: "ah".into(),
            start_ms: 0,
            duration_ms,
            volume,
            pitch_hz: 220.0,
            vibrato: false,
            breathiness: 0.0,
            harmony_intervals: SmallVec::new(),
        }
    }

    #[test]
    fn sample_count_matches_duration() {
        let mut synth = OscillatorSynth::new(22_050, 42);
        let buf = synth.render(&event(100, 0.8)).unwrap();
        assert_eq!(buf.len(), 2205);
    }

    #[test]
    fn sample_count_rounds() {
        let mut synth = OscillatorSynth::new(22_050, 42);
        // 22050 * 33 / 1000 = 727.65 -> 728
        let buf = synth.render(&event(33, 0.8)).unwrap();
        assert_eq!(buf.len(), 728);
    }

    #[test]
    fn zero_volume_is_silence_of_correct_length() {
        let mut synth = OscillatorSynth::new(22_050, 42);
        let buf = synth.render(&event(250, 0.0)).unwrap();
        assert_eq!(buf.len(), 5512); // round(22050 * 0.25)
        assert!(buf.iter().all(|&s| s == 0), "silence must be all zeros");
    }

    #[test]
    fn zero_duration_is_an_empty_buffer() {
        let mut synth = OscillatorSynth::new(22_050, 42);
        let buf = synth.render(&event(0, 0.0)).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn nonzero_volume_produces_signal() {
        let mut synth = OscillatorSynth::new(22_050, 42);
        let buf = synth.render(&event(100, 1.0)).unwrap();
        let peak = buf.iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(peak > 20_000, "full volume sine should near full scale, peak {peak}");
    }

    #[test]
    fn volume_scales_amplitude() {
        let mut synth = OscillatorSynth::new(22_050, 42);
        let loud = synth.render(&event(100, 1.0)).unwrap();
        let quiet = synth.render(&event(100, 0.25)).unwrap();
        let peak = |buf: &[i16]| buf.iter().map(|s| s.unsigned_abs()).max().unwrap();
        let ratio = f64::from(peak(&loud)) / f64::from(peak(&quiet));
        assert!(
            (ratio - 4.0).abs() < 0.1,
            "quarter volume should quarter the peak, ratio {ratio}"
        );
    }

    #[test]
    fn harmony_layering_raises_peak_without_renormalization() {
        let mut synth = OscillatorSynth::new(22_050, 42);
        let solo = synth.render(&event(200, 0.5)).unwrap();
        let mut harmonized = event(200, 0.5);
        harmonized.harmony_intervals = smallvec![4, 7];
        let layered = synth.render(&harmonized).unwrap();
        let peak = |buf: &[i16]| buf.iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(
            peak(&layered) > peak(&solo),
            "layered harmony should be louder than the solo carrier"
        );
    }

    #[test]
    fn clipping_is_prevented_at_quantization() {
        let mut synth = OscillatorSynth::new(22_050, 42);
        let mut ev = event(200, 1.0);
        ev.harmony_intervals = smallvec![4, 7, 12, -12];
        let buf = synth.render(&ev).unwrap();
        // Every sample is a valid i16 by construction; verify the extremes
        // saturate instead of wrapping.
        assert!(buf.iter().any(|&s| s == i16::MAX || s == i16::MIN));
    }

    #[test]
    fn vibrato_changes_the_waveform() {
        let mut a = OscillatorSynth::new(22_050, 42);
        let mut b = OscillatorSynth::new(22_050, 42);
        let flat = a.render(&event(200, 0.8)).unwrap();
        let mut wobble_ev = event(200, 0.8);
        wobble_ev.vibrato = true;
        let wobble = b.render(&wobble_ev).unwrap();
        assert_ne!(flat, wobble);
    }

    #[test]
    fn breathiness_renders_deterministically_per_seed() {
        let mut ev = event(100, 0.6);
        ev.breathiness = 0.5;
        let mut a = OscillatorSynth::new(22_050, 7);
        let mut b = OscillatorSynth::new(22_050, 7);
        assert_eq!(a.render(&ev).unwrap(), b.render(&ev).unwrap());

        let mut c = OscillatorSynth::new(22_050, 8);
        assert_ne!(
            a.render(&ev).unwrap(),
            c.render(&ev).unwrap(),
            "different noise seeds should differ (a has also advanced)"
        );
    }

    #[test]
    fn formant_synth_reports_unavailable() {
        let mut synth = FormantSynth::new(22_050);
        let err = synth.render(&event(100, 0.5)).unwrap_err();
        assert!(matches!(err, BackendError::Unavailable { .. }));
    }
}
