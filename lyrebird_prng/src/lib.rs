// Deterministic, portable pseudo-random number generator.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding.
// Hand-rolled with zero external dependencies so the same seed produces the
// same byte stream on every platform.
//
// Lyrebird has exactly one consumer of randomness: the breathiness noise
// component in `lyrebird_voice`'s oscillator synthesizer. Routing it through
// this crate instead of `rand` keeps rendered PCM reproducible — two
// performances constructed with the same seed emit identical waveforms,
// which the pipeline determinism tests compare byte-for-byte.
//
// **Critical constraint: determinism.** Every method on `NoiseRng` must
// produce identical output given the same prior state, regardless of
// platform, compiler version, or optimization level. No floating-point
// arithmetic in the core generator, no stdlib PRNG, no OS entropy.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG — the project's sole source of randomness.
///
/// The synthesizer owns one instance, seeded at construction. Serializable
/// so a recorded session can resume mid-stream with the noise state intact.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoiseRng {
    s: [u64; 4],
}

impl NoiseRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// Uses SplitMix64 to expand the seed into the 256-bit internal state.
    /// Two `NoiseRng` instances created with the same seed produce identical
    /// output sequences.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform `f32` in [0, 1).
    ///
    /// Uses the upper 24 bits of a `u64` to fill the mantissa of an f32.
    /// 24 bits gives full f32 precision.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Generate a uniform noise sample in [-1, 1).
    ///
    /// This is the shape the synthesizer mixes against a unit-amplitude
    /// carrier when rendering breathiness.
    pub fn next_sample(&mut self) -> f32 {
        self.next_f32() * 2.0 - 1.0
    }
}

/// SplitMix64 — used only for seeding xoshiro256++ from a single `u64`.
///
/// The standard recommendation from the xoshiro authors for expanding a
/// small seed into a larger state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
