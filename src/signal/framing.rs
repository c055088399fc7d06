//! Serial framing of a raw value into a bit sequence

use crate::core::errors::{GenerationError, Result};
use serde::{Deserialize, Serialize};

/// Widest value a frame can carry
pub const MAX_BIT_WIDTH: u32 = 64;

/// How a raw integer is expanded into the bits that get drawn.
///
/// Data bits are always sent least significant bit first, the way a UART
/// puts them on the wire and an oscilloscope shows them left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FramingSpec {
    bit_width: u32,
    include_start_bit: bool,
    include_end_bit: bool,
    starts_high: bool,
}

impl Default for FramingSpec {
    fn default() -> Self {
        Self {
            bit_width: 8,
            include_start_bit: true,
            include_end_bit: true,
            starts_high: true,
        }
    }
}

impl FramingSpec {
    pub fn new(
        bit_width: u32,
        include_start_bit: bool,
        include_end_bit: bool,
        starts_high: bool,
    ) -> Result<Self> {
        if bit_width == 0 || bit_width > MAX_BIT_WIDTH {
            return Err(GenerationError::InvalidInput(format!(
                "bit width must be between 1 and {MAX_BIT_WIDTH}, got {bit_width}"
            )));
        }
        Ok(Self {
            bit_width,
            include_start_bit,
            include_end_bit,
            starts_high,
        })
    }

    /// The same framing without start and stop bits
    pub fn unframed(self) -> Self {
        Self {
            include_start_bit: false,
            include_end_bit: false,
            ..self
        }
    }

    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    pub fn include_start_bit(&self) -> bool {
        self.include_start_bit
    }

    pub fn include_end_bit(&self) -> bool {
        self.include_end_bit
    }

    pub fn starts_high(&self) -> bool {
        self.starts_high
    }

    /// Number of bits in a framed unit
    pub fn framed_len(&self) -> usize {
        self.bit_width as usize
            + usize::from(self.include_start_bit)
            + usize::from(self.include_end_bit)
    }

    /// Whether `value` is representable in `bit_width` bits
    pub fn fits(&self, value: u64) -> bool {
        self.bit_width >= MAX_BIT_WIDTH || value >> self.bit_width == 0
    }

    /// Frame `value`: start bit (0), data bits LSB first, stop bit (1).
    ///
    /// Bits above `bit_width` are ignored.
    pub fn frame(&self, value: u64) -> Vec<bool> {
        let mut bits = Vec::with_capacity(self.framed_len());
        if self.include_start_bit {
            bits.push(false);
        }
        bits.extend((0..self.bit_width).map(|i| (value >> i) & 1 == 1));
        if self.include_end_bit {
            bits.push(true);
        }
        bits
    }

    /// Short stable tag used to key cached outlines, e.g. `8sEh`
    pub fn tag(&self) -> String {
        format!(
            "{}{}{}{}",
            self.bit_width,
            if self.include_start_bit { "s" } else { "" },
            if self.include_end_bit { "E" } else { "" },
            if self.starts_high { "h" } else { "l" },
        )
    }
}
