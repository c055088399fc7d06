//! Digital signal synthesis
//!
//! Turns an integer into the sampled waveform of its framed serial encoding,
//! with optional Gaussian noise on top.

pub mod framing;
pub mod noise;

pub use framing::FramingSpec;
pub use noise::{GaussianNoise, NoiseSource, Silence};

/// Level drawn for a "high" bit
pub const HIGH: f64 = 1.0;
/// Level drawn for a "low" bit
pub const LOW: f64 = -1.0;

/// Sampled signal, roughly within [-1 - ε, 1 + ε] once noise is added
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f64>,
}

impl Waveform {
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Polarity of a bit: with an idle-high line a 1 is drawn high, otherwise
/// everything is inverted.
pub fn polarity(bit: bool, starts_high: bool) -> f64 {
    if bit == starts_high {
        HIGH
    } else {
        LOW
    }
}

/// Build the waveform for `value`.
///
/// Each framed bit is held for `samples_per_bit` samples and every sample
/// then gets independent noise with standard deviation `noise_amount`.
/// A zero noise amount leaves an exact square wave.
pub fn synthesize(
    value: u64,
    framing: &FramingSpec,
    samples_per_bit: usize,
    noise_amount: f64,
    noise: &mut impl NoiseSource,
) -> Waveform {
    let mut samples = Vec::with_capacity(framing.framed_len() * samples_per_bit);
    for bit in framing.frame(value) {
        let level = polarity(bit, framing.starts_high());
        samples.extend(std::iter::repeat(level).take(samples_per_bit));
    }

    if noise_amount > 0.0 {
        for sample in &mut samples {
            *sample += noise.gaussian(noise_amount);
        }
    }

    Waveform { samples }
}

/// Identifies a distinct signal; equal keys trace to the same outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalKey {
    pub value: u64,
    pub framing: FramingSpec,
}

impl SignalKey {
    pub fn new(value: u64, framing: FramingSpec) -> Self {
        Self { value, framing }
    }

    /// Seed for this signal's noise, derived from the variant seed.
    ///
    /// Recomputing a single glyph reproduces exactly the same noise.
    pub fn noise_seed(&self, variant_seed: u64) -> u64 {
        let framing_bits = u64::from(self.framing.bit_width())
            | u64::from(self.framing.include_start_bit()) << 8
            | u64::from(self.framing.include_end_bit()) << 9
            | u64::from(self.framing.starts_high()) << 10;
        splitmix64(variant_seed ^ splitmix64(self.value ^ framing_bits.rotate_left(48)))
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
