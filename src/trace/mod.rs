//! Raster round trip: scene → bitmap → traced outline
//!
//! Tracing a blurred rendering instead of emitting the per-sample polyline
//! collapses the jagged trace into a handful of smooth segments.

pub mod contour;
pub mod curve;
pub mod outline;
pub mod raster;
pub mod svg;

pub use outline::{Contour, TracedOutline, TracedSegment};

use crate::core::errors::Result;
use crate::scene::{self, VectorScene};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceParams {
    /// Raster size relative to a native 96 dpi rendering
    pub raster_scale: f64,
    /// Simplification tolerance in pixels
    pub tolerance: f64,
    /// Turns at or above this alpha become corners
    pub alpha_max: f64,
    /// Ink coverage that counts as inside the glyph
    pub ink_threshold: f64,
    /// Regions below this many square pixels are discarded
    pub min_area: f64,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            raster_scale: 0.3,
            tolerance: 0.8,
            alpha_max: 1.0,
            ink_threshold: 0.5,
            min_area: 2.0,
        }
    }
}

/// Scratch files reused for every character of one run
#[derive(Debug, Clone)]
pub struct ScratchFiles {
    pub document: PathBuf,
    pub raster: PathBuf,
}

impl ScratchFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            document: dir.join("scene.svg"),
            raster: dir.join("raster.png"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RasterTracer {
    params: TraceParams,
    scratch: Option<ScratchFiles>,
}

impl RasterTracer {
    pub fn new(params: TraceParams) -> Self {
        Self {
            params,
            scratch: None,
        }
    }

    /// Keep the intermediate document and bitmap in the given files
    pub fn with_scratch(mut self, scratch: ScratchFiles) -> Self {
        self.scratch = Some(scratch);
        self
    }

    pub fn params(&self) -> &TraceParams {
        &self.params
    }

    /// Trace a scene into an outline in raster pixel coordinates.
    ///
    /// A blank rendering traces to an outline without contours.
    pub fn trace(&self, scene: &VectorScene) -> Result<TracedOutline> {
        if let Some(scratch) = &self.scratch {
            scene::svg::write_scene(scene, &scratch.document)?;
        }

        let bitmap = raster::rasterize(scene, self.params.raster_scale)?;
        if let Some(scratch) = &self.scratch {
            bitmap.write_png(&scratch.raster)?;
        }

        let rings = contour::ink_rings(&bitmap, self.params.ink_threshold, self.params.min_area)?;
        let contours: Vec<Contour> = rings
            .iter()
            .filter_map(|ring| curve::fit_ring(ring, self.params.tolerance, self.params.alpha_max))
            .collect();

        debug!(
            "Traced {}x{} bitmap into {} contours ({} segments)",
            bitmap.width,
            bitmap.height,
            contours.len(),
            contours.iter().map(|c| c.segments.len()).sum::<usize>()
        );

        Ok(TracedOutline {
            width: bitmap.width as f64,
            height: bitmap.height as f64,
            contours,
        })
    }
}
