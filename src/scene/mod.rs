//! Vector line art for a waveform
//!
//! The scene lives in physical units (millimetres in the written document)
//! with y pointing down and the origin vertically centered, so a trace at
//! `-amplitude` is drawn at the top of the canvas.

pub mod svg;

use crate::signal::Waveform;
use kurbo::{Line, Point};
use serde::{Deserialize, Serialize};

/// One stroked line of the trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSegment {
    pub line: Line,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorScene {
    /// Canvas width in physical units
    pub width: f64,
    /// Canvas height; the canvas spans `-height / 2 ..= height / 2` vertically
    pub height: f64,
    pub segments: Vec<StrokeSegment>,
}

impl VectorScene {
    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }
}

/// Tunable geometry of the drawn trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    /// Distance from the baseline to the canvas edge
    pub half_height: f64,
    pub stroke_width: f64,
    /// Fraction of `half_height` a noiseless trace reaches
    pub headroom: f64,
    /// Headroom given up per unit of noise
    pub noise_headroom: f64,
    /// Trailing space reserved for the stop bit's falling edge
    pub falling_edge_padding: f64,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            half_height: 200.0,
            stroke_width: 4.5,
            headroom: 0.95,
            noise_headroom: 1.0,
            falling_edge_padding: 4.0,
        }
    }
}

impl SceneParams {
    /// Vertical scale applied to samples, leaving room for noise spikes
    pub fn amplitude_scale(&self, noise_amount: f64) -> f64 {
        self.half_height * (self.headroom - self.noise_headroom * noise_amount)
    }

    pub fn builder(&self) -> SceneBuilder {
        SceneBuilder {
            half_height: self.half_height,
            falling_edge_padding: self.falling_edge_padding,
        }
    }
}

/// Walks a waveform and emits one segment per sample.
#[derive(Debug, Clone, Copy)]
pub struct SceneBuilder {
    half_height: f64,
    falling_edge_padding: f64,
}

impl SceneBuilder {
    pub fn build(
        &self,
        waveform: &Waveform,
        amplitude_scale: f64,
        starts_high: bool,
        add_falling_edge: bool,
        stroke_width: f64,
    ) -> VectorScene {
        let idle = if starts_high {
            -amplitude_scale
        } else {
            amplitude_scale
        };
        let mut cursor = Point::new(0.0, idle);
        let mut segments = Vec::with_capacity(waveform.len() + 1);

        for &sample in waveform.samples() {
            let next = Point::new(cursor.x + 1.0, -sample * amplitude_scale);
            segments.push(StrokeSegment {
                line: Line::new(cursor, next),
                stroke_width,
            });
            cursor = next;
        }

        let mut width = waveform.len() as f64;
        if add_falling_edge {
            segments.push(StrokeSegment {
                line: Line::new(cursor, Point::new(cursor.x + 2.0, 0.0)),
                stroke_width,
            });
            width += self.falling_edge_padding;
        }

        VectorScene {
            width,
            height: 2.0 * self.half_height,
            segments,
        }
    }
}
