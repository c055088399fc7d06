//! Font variants: the numeric settings behind one generated style

use crate::core::errors::{GenerationError, Result};
use crate::font_source::VerticalOffset;
use crate::signal::FramingSpec;
use serde::{Deserialize, Serialize};

/// Framing applied to every primary glyph of a variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingDefaults {
    pub bit_width: u32,
    pub starts_high: bool,
}

impl Default for FramingDefaults {
    fn default() -> Self {
        Self {
            bit_width: 8,
            starts_high: true,
        }
    }
}

/// One complete generation pass. Variants share nothing at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontVariant {
    /// Style name, e.g. `Regular`
    pub name: String,
    pub samples_per_bit: usize,
    pub noise_amount: f64,
    /// Seed for all noise in this variant; always explicit so builds reproduce
    pub seed: u64,
    #[serde(default)]
    pub framing: FramingDefaults,
    #[serde(default)]
    pub vertical_offset: VerticalOffset,
}

impl FontVariant {
    pub fn new(name: &str, samples_per_bit: usize, noise_amount: f64, seed: u64) -> Self {
        Self {
            name: name.to_string(),
            samples_per_bit,
            noise_amount,
            seed,
            framing: FramingDefaults::default(),
            vertical_offset: VerticalOffset::default(),
        }
    }

    /// The built-in ScopinSans styles
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("NoNoise", 80, 0.0, 1),
            Self::new("Regular", 100, 0.04, 2),
            Self::new("FastBaud", 30, 0.04, 3),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| {
            Err(GenerationError::InvalidInput(format!(
                "variant '{}': {reason}",
                self.name
            )))
        };
        if self.name.trim().is_empty() {
            return invalid("name must not be empty".to_string());
        }
        if self.name.contains(['/', '\\']) {
            return invalid("name must not contain path separators".to_string());
        }
        if self.samples_per_bit == 0 {
            return invalid("samples per bit must be positive".to_string());
        }
        if !self.noise_amount.is_finite() || self.noise_amount < 0.0 {
            return invalid(format!(
                "noise amount must be a finite value >= 0, got {}",
                self.noise_amount
            ));
        }
        self.primary_framing().map(|_| ())
    }

    /// Start and stop bits around every primary glyph
    pub fn primary_framing(&self) -> Result<FramingSpec> {
        FramingSpec::new(self.framing.bit_width, true, true, self.framing.starts_high)
    }

    pub fn vertical_offset(&self) -> f64 {
        self.vertical_offset
            .for_signal(self.samples_per_bit, self.noise_amount)
    }
}
