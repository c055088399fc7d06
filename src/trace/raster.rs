//! Greyscale rasterization of a scene
//!
//! Downscaling is part of the look: at a fraction of native resolution the
//! sharp polyline corners blur into soft edges before tracing. Strokes are
//! drawn with vello's CPU renderer and its alpha is read back as ink.

use crate::core::errors::{retry_io, GenerationError, Result};
use crate::scene::VectorScene;
use std::io::BufWriter;
use std::path::Path;
use vello_cpu::color::palette::css::BLACK;
use vello_cpu::kurbo::{Affine, Cap, Line, Shape, Stroke};
use vello_cpu::{Pixmap, RenderContext};

/// CSS pixels per millimetre
pub const PX_PER_MM: f64 = 96.0 / 25.4;

const WHITE: u8 = 255;

/// Flattening tolerance for stroke paths, in scene units
const STROKE_TOLERANCE: f64 = 0.1;

/// 8-bit greyscale image, row-major, 0 = ink and 255 = background
#[derive(Debug, Clone, PartialEq)]
pub struct GreyBitmap {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl GreyBitmap {
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![WHITE; width * height],
        }
    }

    /// Black ink over white from per-pixel alpha coverage
    pub fn from_alpha(width: usize, height: usize, alpha: impl Iterator<Item = u8>) -> Self {
        Self {
            width,
            height,
            pixels: alpha.map(|a| WHITE - a).collect(),
        }
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    /// Ink coverage in 0..=1 per pixel
    pub fn ink(&self) -> Vec<f64> {
        self.pixels
            .iter()
            .map(|&p| 1.0 - f64::from(p) / f64::from(WHITE))
            .collect()
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == WHITE)
    }

    pub fn write_png(&self, path: &Path) -> Result<()> {
        let file = retry_io(path, || std::fs::File::create(path))?;
        let mut encoder = png::Encoder::new(
            BufWriter::new(file),
            self.width as u32,
            self.height as u32,
        );
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| GenerationError::interop("png encode", e.to_string()))?;
        writer
            .write_image_data(&self.pixels)
            .map_err(|e| GenerationError::interop("png encode", e.to_string()))?;
        Ok(())
    }
}

/// Render the scene's strokes on a white background.
///
/// `scale` is relative to the native 96 dpi rendering of the millimetre
/// sized document. Strokes get round caps and anti-aliased edges.
pub fn rasterize(scene: &VectorScene, scale: f64) -> Result<GreyBitmap> {
    let px = PX_PER_MM * scale;
    let width = pixel_extent(scene.width * px)?;
    let height = pixel_extent(scene.height * px)?;

    let mut ctx = RenderContext::new(width, height);
    // scene units (origin on the baseline) to pixel space (origin top left)
    ctx.set_transform(Affine::scale(px) * Affine::translate((0.0, scene.half_height())));
    ctx.set_paint(BLACK);
    for segment in &scene.segments {
        let (p0, p1) = (segment.line.p0, segment.line.p1);
        let line = Line::new((p0.x, p0.y), (p1.x, p1.y));
        ctx.set_stroke(Stroke::new(segment.stroke_width).with_caps(Cap::Round));
        ctx.stroke_path(&line.to_path(STROKE_TOLERANCE));
    }
    ctx.flush();

    let mut pixmap = Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(GreyBitmap::from_alpha(
        usize::from(width),
        usize::from(height),
        pixmap.data().iter().map(|pixel| pixel.a),
    ))
}

fn pixel_extent(size: f64) -> Result<u16> {
    let pixels = size.ceil().max(1.0);
    if !pixels.is_finite() || pixels > f64::from(u16::MAX) {
        return Err(GenerationError::interop(
            "raster",
            format!("{size} pixels do not fit a render target"),
        ));
    }
    Ok(pixels as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::StrokeSegment;
    use kurbo::Point;

    fn flat_scene(y: f64) -> VectorScene {
        VectorScene {
            width: 100.0,
            height: 100.0,
            segments: vec![StrokeSegment {
                line: kurbo::Line::new(Point::new(10.0, y), Point::new(90.0, y)),
                stroke_width: 4.0,
            }],
        }
    }

    #[test]
    fn test_empty_scene_is_blank() {
        let scene = VectorScene {
            width: 50.0,
            height: 40.0,
            segments: vec![],
        };
        let bitmap = rasterize(&scene, 0.3).unwrap();
        assert!(bitmap.is_blank());
        assert_eq!(bitmap.width, (50.0 * PX_PER_MM * 0.3).ceil() as usize);
    }

    #[test]
    fn test_horizontal_stroke_lands_on_its_row() {
        let bitmap = rasterize(&flat_scene(-30.0), 1.0).unwrap();
        let px = PX_PER_MM;
        let row = ((-30.0 + 50.0) * px) as usize;
        let col = (50.0 * px) as usize;
        assert_eq!(bitmap.get(col, row), 0);
        // far from the stroke stays white
        assert_eq!(bitmap.get(col, bitmap.height - 2), WHITE);
        assert_eq!(bitmap.get(1, row), WHITE);
    }

    #[test]
    fn test_stroke_edges_are_antialiased() {
        let bitmap = rasterize(&flat_scene(0.0), 0.3).unwrap();
        assert!(bitmap.pixels.iter().any(|&p| p > 0 && p < WHITE));
    }

    #[test]
    fn test_round_caps_reach_past_the_line_ends() {
        let bitmap = rasterize(&flat_scene(0.0), 1.0).unwrap();
        let row = (50.0 * PX_PER_MM) as usize;
        // the cap extends half the stroke width (2 mm) beyond x = 90
        let inside_cap = (91.0 * PX_PER_MM) as usize;
        let past_cap = (93.0 * PX_PER_MM) as usize;
        assert!(bitmap.get(inside_cap, row) < WHITE / 2);
        assert_eq!(bitmap.get(past_cap, row), WHITE);
    }

    #[test]
    fn test_oversized_scene_is_an_error() {
        let scene = VectorScene {
            width: 1.0e6,
            height: 10.0,
            segments: vec![],
        };
        assert!(matches!(
            rasterize(&scene, 1.0),
            Err(GenerationError::Interop { .. })
        ));
    }

    #[test]
    fn test_png_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raster.png");
        rasterize(&flat_scene(0.0), 0.3)
            .unwrap()
            .write_png(&path)
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
