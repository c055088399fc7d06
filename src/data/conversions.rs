//! Outline conversion into the norad UFO format
//!
//! Kurbo paths are turned into UFO contours: a closed contour lists its
//! on-curve points with the off-curve handles in between, and the first point
//! carries the type of the segment that closes back onto it.

use kurbo::{BezPath, PathEl, Point};

/// Convert a path of closed contours into UFO contours.
pub fn bezpath_to_norad_contours(path: &BezPath) -> Vec<norad::Contour> {
    let mut contours = Vec::new();
    let mut points: Vec<norad::ContourPoint> = Vec::new();
    let mut start: Option<Point> = None;

    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => {
                if let Some(first) = start.take() {
                    contours.extend(finish_contour(std::mem::take(&mut points), first));
                }
                start = Some(p);
                points.push(on_curve(p, norad::PointType::Line));
            }
            PathEl::LineTo(p) => {
                let repeats_last = points.last().is_some_and(|last| {
                    last.typ != norad::PointType::OffCurve && last.x == p.x && last.y == p.y
                });
                if !repeats_last {
                    points.push(on_curve(p, norad::PointType::Line));
                }
            }
            PathEl::QuadTo(c, p) => {
                points.push(off_curve(c));
                points.push(on_curve(p, norad::PointType::QCurve));
            }
            PathEl::CurveTo(c1, c2, p) => {
                points.push(off_curve(c1));
                points.push(off_curve(c2));
                points.push(on_curve(p, norad::PointType::Curve));
            }
            PathEl::ClosePath => {
                if let Some(first) = start.take() {
                    contours.extend(finish_contour(std::mem::take(&mut points), first));
                }
            }
        }
    }
    if let Some(first) = start {
        contours.extend(finish_contour(points, first));
    }
    contours
}

/// Fold a trailing point that lands back on the start into the start point
fn finish_contour(mut points: Vec<norad::ContourPoint>, first: Point) -> Option<norad::Contour> {
    if points.len() > 1 {
        let last = &points[points.len() - 1];
        if last.typ != norad::PointType::OffCurve && last.x == first.x && last.y == first.y {
            let closing = points.pop().map(|p| p.typ);
            if let Some(typ) = closing {
                points[0].typ = typ;
            }
        }
    }
    // a lone point or a back-and-forth line draws nothing
    let on_curve_count = points
        .iter()
        .filter(|p| p.typ != norad::PointType::OffCurve)
        .count();
    if on_curve_count < 2 || points.len() < 3 {
        return None;
    }
    Some(norad::Contour::new(points, None))
}

fn on_curve(p: Point, typ: norad::PointType) -> norad::ContourPoint {
    norad::ContourPoint::new(p.x, p.y, typ, false, None, None)
}

fn off_curve(p: Point) -> norad::ContourPoint {
    norad::ContourPoint::new(p.x, p.y, norad::PointType::OffCurve, false, None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_curve_contour() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((100.0, 0.0));
        path.curve_to((100.0, 50.0), (50.0, 100.0), (0.0, 100.0));
        path.curve_to((-20.0, 60.0), (-20.0, 20.0), (0.0, 0.0));
        path.close_path();

        let contours = bezpath_to_norad_contours(&path);
        assert_eq!(contours.len(), 1);
        let types: Vec<_> = contours[0].points.iter().map(|p| p.typ.clone()).collect();
        assert_eq!(
            types,
            vec![
                norad::PointType::Curve,
                norad::PointType::Line,
                norad::PointType::OffCurve,
                norad::PointType::OffCurve,
                norad::PointType::Curve,
                norad::PointType::OffCurve,
                norad::PointType::OffCurve,
            ]
        );
    }

    #[test]
    fn test_implicit_closing_line() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 10.0));
        path.close_path();
        path.move_to((20.0, 20.0));
        path.line_to((30.0, 20.0));
        path.line_to((30.0, 30.0));
        path.close_path();

        let contours = bezpath_to_norad_contours(&path);
        assert_eq!(contours.len(), 2);
        assert!(contours
            .iter()
            .all(|c| c.points.len() == 3 && c.points[0].typ == norad::PointType::Line));
    }

    #[test]
    fn test_empty_path() {
        assert!(bezpath_to_norad_contours(&BezPath::new()).is_empty());
    }
}
