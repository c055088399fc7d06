//! SVG document for a scene
//!
//! One `<line>` per segment, sized in millimetres with the view box
//! centered on the baseline.

use super::VectorScene;
use crate::core::errors::{retry_io, Result};
use std::fmt::Write;
use std::path::Path;

pub fn scene_to_svg(scene: &VectorScene) -> String {
    let half = scene.half_height();
    let mut doc = String::new();
    let _ = write!(
        doc,
        "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n\
         <svg baseProfile=\"tiny\" version=\"1.2\" xmlns=\"http://www.w3.org/2000/svg\" \
         width=\"{w}mm\" height=\"{h}mm\" viewBox=\"0 {top} {w} {h}\">\n",
        w = scene.width,
        h = scene.height,
        top = -half,
    );
    for segment in &scene.segments {
        let line = segment.line;
        let _ = writeln!(
            doc,
            "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"rgb(0,0,0)\" stroke-width=\"{}\" stroke-linecap=\"round\" />",
            line.p0.x, line.p0.y, line.p1.x, line.p1.y, segment.stroke_width
        );
    }
    doc.push_str("</svg>\n");
    doc
}

/// Write the scene document, overwriting any previous scratch copy
pub fn write_scene(scene: &VectorScene, path: &Path) -> Result<()> {
    let doc = scene_to_svg(scene);
    retry_io(path, || std::fs::write(path, &doc))
}
