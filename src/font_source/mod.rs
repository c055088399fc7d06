//! Font-side data: fitting traced outlines into glyphs and assembling them
//!
//! Everything here works in font units (y up, one em = `units_per_em`).

pub mod assembler;
pub mod fit;
pub mod metrics;


pub use assembler::{FontAssembler, Glyph, UfoAssembler};
pub use fit::{FittedGlyph, GlyphFitter, MaxScale, VerticalOffset};
pub use metrics::FontInfo;
