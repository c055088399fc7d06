//! Fitting traced outlines into the em box

use crate::trace::TracedOutline;
use kurbo::{Affine, BezPath, Shape, Vec2};
use serde::{Deserialize, Serialize};

/// A glyph outline positioned in font units
#[derive(Debug, Clone, PartialEq)]
pub struct FittedGlyph {
    pub outline: BezPath,
    pub advance_width: u32,
    /// Scale that was applied, natural or forced
    pub applied_scale: f64,
}

/// Baseline alignment, fitted by eye per variant rather than derived.
///
/// The offset is `base + per_sample * samples_per_bit + per_noise * noise`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalOffset {
    pub base: f64,
    pub per_sample: f64,
    pub per_noise: f64,
}

impl Default for VerticalOffset {
    fn default() -> Self {
        Self {
            base: -128.0,
            per_sample: 0.0,
            per_noise: 0.0,
        }
    }
}

impl VerticalOffset {
    pub fn for_signal(&self, samples_per_bit: usize, noise_amount: f64) -> f64 {
        self.base + self.per_sample * samples_per_bit as f64 + self.per_noise * noise_amount
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphFitter {
    pub em_size: u32,
    /// Glyphs are shifted left by this much and their advance shortened by
    /// the same amount so neighbours overlap slightly and traces join up.
    pub overlap: f64,
}

impl GlyphFitter {
    pub fn new(em_size: u32, overlap: f64) -> Self {
        Self { em_size, overlap }
    }

    /// Map raster coordinates into font space: y flipped and the document's
    /// width spread across one em.
    pub fn import_transform(&self, outline: &TracedOutline) -> Affine {
        let em = f64::from(self.em_size);
        let factor = if outline.width > 0.0 {
            em / outline.width
        } else {
            1.0
        };
        Affine::new([factor, 0.0, 0.0, -factor, 0.0, outline.height * factor])
    }

    /// Scale and place an outline, computing its advance width.
    ///
    /// With `forced_scale` the glyph is sized to match the rest of the
    /// family instead of its own proportions; its advance then never
    /// exceeds its own natural width.
    pub fn fit(
        &self,
        outline: &TracedOutline,
        vertical_offset: f64,
        forced_scale: Option<f64>,
    ) -> FittedGlyph {
        let imported = self.import_transform(outline) * outline.to_bezpath();
        if outline.is_empty() {
            return FittedGlyph {
                outline: imported,
                advance_width: 0,
                applied_scale: 0.0,
            };
        }

        let bbox = imported.bounding_box();
        let natural_scale = if bbox.height() > 0.0 {
            bbox.width() / bbox.height()
        } else {
            0.0
        };
        let scale = forced_scale.unwrap_or(natural_scale);

        let mut target_width = f64::from(self.em_size) * scale;
        if forced_scale.is_some() {
            target_width = target_width.min(bbox.width());
        }
        let advance = (target_width.ceil() - self.overlap).max(1.0);

        let placement = Affine::translate(Vec2::new(-self.overlap, vertical_offset))
            * Affine::scale(scale);

        FittedGlyph {
            outline: placement * imported,
            advance_width: advance as u32,
            applied_scale: scale,
        }
    }
}

/// Running maximum of the scales applied to primary glyphs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaxScale(f64);

impl MaxScale {
    pub fn observe(&mut self, scale: f64) {
        if scale > self.0 {
            self.0 = scale;
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}
