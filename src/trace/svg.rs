//! Standalone SVG documents for traced outlines
//!
//! Path data uses `M x,y` to start a contour, `L x,y L x,y` for a corner,
//! `C x1,y1 x2,y2 x,y` for a curve and `z` to close. The reader parses the
//! path data with kurbo and only accepts what the writer produces; it is the
//! loader for the on-disk outline cache.

use super::outline::{Contour, TracedOutline, TracedSegment};
use crate::core::errors::{retry_io, GenerationError, Result};
use kurbo::{BezPath, PathEl, Point};
use std::fmt::Write;
use std::path::Path;

pub fn path_data(outline: &TracedOutline) -> String {
    let mut d = String::new();
    for contour in &outline.contours {
        let _ = write!(d, "M{:.6},{:.6}", contour.start.x, contour.start.y);
        for segment in &contour.segments {
            let _ = match *segment {
                TracedSegment::Corner { vertex, end } => write!(
                    d,
                    "L{:.6},{:.6}L{:.6},{:.6}",
                    vertex.x, vertex.y, end.x, end.y
                ),
                TracedSegment::Curve { c1, c2, end } => write!(
                    d,
                    "C{:.6},{:.6} {:.6},{:.6} {:.6},{:.6}",
                    c1.x, c1.y, c2.x, c2.y, end.x, end.y
                ),
            };
        }
        d.push('z');
    }
    d
}

pub fn outline_to_svg(outline: &TracedOutline) -> String {
    format!(
        "<svg version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\" \
         xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\">\
         <path stroke=\"none\" fill=\"#000\" fill-rule=\"evenodd\" d=\"{d}\"/></svg>",
        w = outline.width,
        h = outline.height,
        d = path_data(outline),
    )
}

pub fn write_outline(outline: &TracedOutline, path: &Path) -> Result<()> {
    let doc = outline_to_svg(outline);
    retry_io(path, || std::fs::write(path, &doc))
}

pub fn read_outline(path: &Path) -> Result<TracedOutline> {
    let doc = retry_io(path, || std::fs::read_to_string(path))?;
    parse_outline(&doc)
        .map_err(|message| GenerationError::interop("outline cache", format!("{}: {message}", path.display())))
}

pub fn parse_outline(doc: &str) -> std::result::Result<TracedOutline, String> {
    let width = attribute(doc, "width")?;
    let height = attribute(doc, "height")?;
    let d = attribute_str(doc, "d")?;
    // kurbo stops quietly at the first byte it does not know
    if let Some(c) = d.chars().find(|c| !PATH_ALPHABET.contains(*c)) {
        return Err(format!("unexpected character {c:?} in path data"));
    }
    let path = BezPath::from_svg(d).map_err(|e| e.to_string())?;
    Ok(TracedOutline {
        width,
        height,
        contours: contours_from_path(&path)?,
    })
}

const PATH_ALPHABET: &str = "MLCz0123456789.,- ";

fn attribute_str<'a>(doc: &'a str, name: &str) -> std::result::Result<&'a str, String> {
    let needle = format!(" {name}=\"");
    let start = doc
        .find(&needle)
        .map(|i| i + needle.len())
        .ok_or_else(|| format!("missing attribute '{name}'"))?;
    let len = doc[start..]
        .find('"')
        .ok_or_else(|| format!("unterminated attribute '{name}'"))?;
    Ok(&doc[start..start + len])
}

fn attribute(doc: &str, name: &str) -> std::result::Result<f64, String> {
    let raw = attribute_str(doc, name)?;
    raw.parse()
        .map_err(|_| format!("attribute '{name}' is not a number: {raw}"))
}

/// Corners come back as pairs of line segments, curves as single cubics.
fn contours_from_path(path: &BezPath) -> std::result::Result<Vec<Contour>, String> {
    let mut contours = Vec::new();
    let mut current: Option<Contour> = None;
    let mut vertex: Option<Point> = None;
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(start) => {
                if current.is_some() {
                    return Err("contour not closed before M".to_string());
                }
                current = Some(Contour {
                    start,
                    segments: Vec::new(),
                });
            }
            PathEl::LineTo(point) => {
                let contour = current.as_mut().ok_or("segment before M")?;
                match vertex.take() {
                    Some(vertex) => contour
                        .segments
                        .push(TracedSegment::Corner { vertex, end: point }),
                    None => vertex = Some(point),
                }
            }
            PathEl::CurveTo(c1, c2, end) if vertex.is_none() => {
                let contour = current.as_mut().ok_or("segment before M")?;
                contour.segments.push(TracedSegment::Curve { c1, c2, end });
            }
            PathEl::ClosePath if vertex.is_none() => {
                contours.push(current.take().ok_or("z without an open contour")?);
            }
            PathEl::QuadTo(..) => return Err("quadratic segments are not traced".to_string()),
            PathEl::CurveTo(..) | PathEl::ClosePath => {
                return Err("unpaired L command".to_string())
            }
        }
    }
    if current.is_some() || vertex.is_some() {
        return Err("unclosed contour".to_string());
    }
    Ok(contours)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_outline() -> TracedOutline {
        TracedOutline {
            width: 300.0,
            height: 150.0,
            contours: vec![Contour {
                start: Point::new(1.5, 2.25),
                segments: vec![
                    TracedSegment::Corner {
                        vertex: Point::new(10.0, 2.0),
                        end: Point::new(10.0, 20.0),
                    },
                    TracedSegment::Curve {
                        c1: Point::new(10.0, 30.0),
                        c2: Point::new(-3.125, 30.0),
                        end: Point::new(1.5, 2.25),
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_path_data_format() {
        let d = path_data(&sample_outline());
        assert_eq!(
            d,
            "M1.500000,2.250000\
             L10.000000,2.000000L10.000000,20.000000\
             C10.000000,30.000000 -3.125000,30.000000 1.500000,2.250000z"
        );
    }

    #[test]
    fn test_cached_document_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("65.svg");
        let outline = sample_outline();
        write_outline(&outline, &path).unwrap();
        assert_eq!(read_outline(&path).unwrap(), outline);
    }

    #[test]
    fn test_empty_outline_document() {
        let outline = TracedOutline::empty(12.0, 8.0);
        let parsed = parse_outline(&outline_to_svg(&outline)).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(parsed.width, 12.0);
    }

    #[test]
    fn test_rejects_foreign_path_data() {
        let doc = "<svg width=\"1\" height=\"1\"><path d=\"M0,0Q1,1 2,2z\"/></svg>";
        assert!(parse_outline(doc).is_err());
        let doc = "<svg width=\"1\" height=\"1\"><path d=\"M0,0L1,1z\"/></svg>";
        assert!(parse_outline(doc).is_err());
        let doc = "<svg width=\"1\" height=\"1\"><path d=\"M0,0L1,1L2,2\"/></svg>";
        assert!(parse_outline(doc).is_err());
    }

    #[test]
    fn test_corrupted_cache_document_is_an_error() {
        for d in ["\u{e9}0,0z", "M0,0\u{e9}1,1z", "M0,0L1,1L\u{20ac}2,2z"] {
            let doc = format!("<svg width=\"1\" height=\"1\"><path d=\"{d}\"/></svg>");
            assert!(parse_outline(&doc).is_err(), "{d:?} parsed");
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("65.svg");
        std::fs::write(&path, "<svg width=\"1\" height=\"1\"><path d=\"\u{e9}\"/></svg>").unwrap();
        assert!(matches!(
            read_outline(&path),
            Err(GenerationError::Interop { .. })
        ));
    }
}
