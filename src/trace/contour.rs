//! Marching-squares extraction of ink regions
//!
//! The ink grid is padded with a blank border so every region comes back as
//! closed rings. Rings are oriented for the font's y-up space: outer rings
//! end up counter-clockwise and holes clockwise once y is flipped.

use super::raster::GreyBitmap;
use crate::core::errors::{GenerationError, Result};
use contour_isobands::ContourBuilder;
use kurbo::Point;

/// Upper band edge, above any possible coverage
const INK_CEILING: f64 = 2.0;

/// A closed polygon without its repeated closing point
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub points: Vec<Point>,
}

impl Ring {
    /// Shoelace area, positive when counter-clockwise in y-up coordinates
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0
    }

    fn oriented(mut self, negative_area: bool) -> Self {
        if (self.signed_area() < 0.0) != negative_area {
            self.points.reverse();
        }
        self
    }
}

/// Find the boundaries of every region whose ink reaches `threshold`.
///
/// Coordinates are in pixels with pixel centers at half-integers. Rings
/// smaller than `min_area` square pixels are dropped as speckles.
pub fn ink_rings(bitmap: &GreyBitmap, threshold: f64, min_area: f64) -> Result<Vec<Ring>> {
    if bitmap.is_blank() {
        return Ok(Vec::new());
    }

    let padded_width = bitmap.width + 2;
    let padded_height = bitmap.height + 2;
    let ink = bitmap.ink();
    let mut values = vec![0.0; padded_width * padded_height];
    for y in 0..bitmap.height {
        let src = &ink[y * bitmap.width..(y + 1) * bitmap.width];
        let dst_start = (y + 1) * padded_width + 1;
        values[dst_start..dst_start + bitmap.width].copy_from_slice(src);
    }

    let bands = ContourBuilder::new(padded_width, padded_height)
        .use_quad_tree(true)
        .x_origin(-0.5)
        .y_origin(-0.5)
        .contours(&values, &[threshold, INK_CEILING])
        .map_err(|e| GenerationError::interop("contour extraction", format!("{e:?}")))?;

    let mut rings = Vec::new();
    for band in &bands {
        for polygon in &band.geometry().0 {
            // pixel space is y-down, so a y-up counter-clockwise ring has negative area here
            let exterior = polygon.exterior().0.iter().map(|c| (c.x, c.y));
            if let Some(outer) = to_ring(exterior, min_area) {
                rings.push(outer.oriented(true));
            }
            for interior in polygon.interiors() {
                if let Some(hole) = to_ring(interior.0.iter().map(|c| (c.x, c.y)), min_area) {
                    rings.push(hole.oriented(false));
                }
            }
        }
    }
    Ok(rings)
}

fn to_ring(coords: impl Iterator<Item = (f64, f64)>, min_area: f64) -> Option<Ring> {
    let mut points: Vec<Point> = coords.map(|(x, y)| Point::new(x, y)).collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points.dedup();
    if points.len() < 3 {
        return None;
    }
    let ring = Ring { points };
    (ring.signed_area().abs() >= min_area).then_some(ring)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap_with_block(x0: usize, y0: usize, x1: usize, y1: usize) -> GreyBitmap {
        let mut bitmap = GreyBitmap::blank(20, 20);
        for y in y0..y1 {
            for x in x0..x1 {
                bitmap.pixels[y * 20 + x] = 0;
            }
        }
        bitmap
    }

    #[test]
    fn test_blank_bitmap_has_no_rings() {
        let rings = ink_rings(&GreyBitmap::blank(8, 8), 0.5, 1.0).unwrap();
        assert!(rings.is_empty());
    }

    #[test]
    fn test_block_traces_to_one_outer_ring() {
        let rings = ink_rings(&bitmap_with_block(4, 5, 14, 10), 0.5, 1.0).unwrap();
        assert_eq!(rings.len(), 1);
        let ring = &rings[0];
        assert!(ring.signed_area() < 0.0);
        // 10 x 5 block, boundary runs halfway between ink and paper centers
        assert!((ring.signed_area().abs() - 50.0).abs() < 5.0);
        let min_x = ring.points.iter().map(|p| p.x).fold(f64::MAX, f64::min);
        let max_y = ring.points.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert!((min_x - 4.0).abs() < 0.6);
        assert!((max_y - 10.0).abs() < 0.6);
    }

    #[test]
    fn test_speckles_are_dropped() {
        let rings = ink_rings(&bitmap_with_block(3, 3, 4, 4), 0.5, 4.0).unwrap();
        assert!(rings.is_empty());
    }

    #[test]
    fn test_hole_is_oriented_opposite() {
        let mut bitmap = bitmap_with_block(2, 2, 18, 18);
        for y in 7..13 {
            for x in 7..13 {
                bitmap.pixels[y * 20 + x] = 255;
            }
        }
        let rings = ink_rings(&bitmap, 0.5, 1.0).unwrap();
        assert_eq!(rings.len(), 2);
        let outer = rings.iter().filter(|r| r.signed_area() < 0.0).count();
        let holes = rings.iter().filter(|r| r.signed_area() > 0.0).count();
        assert_eq!((outer, holes), (1, 1));
    }
}
