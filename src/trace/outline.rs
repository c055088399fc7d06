//! Traced outline data

use kurbo::{BezPath, Point, Rect, Shape};

/// One piece of a traced contour.
///
/// A corner is drawn as two straight lines through its vertex; a curve is a
/// single cubic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TracedSegment {
    Corner { vertex: Point, end: Point },
    Curve { c1: Point, c2: Point, end: Point },
}

impl TracedSegment {
    pub fn end(&self) -> Point {
        match *self {
            Self::Corner { end, .. } | Self::Curve { end, .. } => end,
        }
    }
}

/// A closed sub-path
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub start: Point,
    pub segments: Vec<TracedSegment>,
}

impl Contour {
    pub fn append_to(&self, path: &mut BezPath) {
        path.move_to(self.start);
        for segment in &self.segments {
            match *segment {
                TracedSegment::Corner { vertex, end } => {
                    path.line_to(vertex);
                    path.line_to(end);
                }
                TracedSegment::Curve { c1, c2, end } => path.curve_to(c1, c2, end),
            }
        }
        path.close_path();
    }
}

/// Traced glyph shape in raster pixel coordinates (y down)
#[derive(Debug, Clone, PartialEq)]
pub struct TracedOutline {
    /// Width of the document the outline was traced from
    pub width: f64,
    /// Height of the document the outline was traced from
    pub height: f64,
    pub contours: Vec<Contour>,
}

impl TracedOutline {
    pub fn empty(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            contours: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn to_bezpath(&self) -> BezPath {
        let mut path = BezPath::new();
        for contour in &self.contours {
            contour.append_to(&mut path);
        }
        path
    }

    /// Tight bounds of the drawn shape, `None` when there is nothing to draw
    pub fn bounding_box(&self) -> Option<Rect> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_bezpath().bounding_box())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Contour {
        Contour {
            start: Point::new(0.0, 5.0),
            segments: vec![
                TracedSegment::Corner {
                    vertex: Point::new(0.0, 0.0),
                    end: Point::new(5.0, 0.0),
                },
                TracedSegment::Corner {
                    vertex: Point::new(10.0, 0.0),
                    end: Point::new(10.0, 5.0),
                },
                TracedSegment::Curve {
                    c1: Point::new(10.0, 8.0),
                    c2: Point::new(8.0, 10.0),
                    end: Point::new(5.0, 10.0),
                },
                TracedSegment::Corner {
                    vertex: Point::new(0.0, 10.0),
                    end: Point::new(0.0, 5.0),
                },
            ],
        }
    }

    #[test]
    fn test_bounding_box() {
        let outline = TracedOutline {
            width: 20.0,
            height: 20.0,
            contours: vec![square()],
        };
        let bbox = outline.bounding_box().unwrap();
        assert_eq!(bbox.min_x(), 0.0);
        assert_eq!(bbox.min_y(), 0.0);
        assert_eq!(bbox.max_x(), 10.0);
        assert_eq!(bbox.max_y(), 10.0);
    }

    #[test]
    fn test_empty_outline_has_no_bounds() {
        assert!(TracedOutline::empty(10.0, 10.0).bounding_box().is_none());
    }

    #[test]
    fn test_corner_expands_to_two_lines() {
        let mut path = BezPath::new();
        square().append_to(&mut path);
        // move + 3 corners * 2 lines + 1 curve + close
        assert_eq!(path.elements().len(), 1 + 6 + 1 + 1);
    }
}
