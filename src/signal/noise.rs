//! Gaussian noise sources

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies zero-mean Gaussian samples.
///
/// Inject a seeded source when the output has to be reproducible.
pub trait NoiseSource {
    fn gaussian(&mut self, std_dev: f64) -> f64;
}

/// Box-Muller transform over a seeded `StdRng`
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    rng: StdRng,
    spare: Option<f64>,
}

impl GaussianNoise {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            spare: None,
        }
    }

    fn standard_normal(&mut self) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        // (0, 1] so the log never sees zero
        let u1 = 1.0 - self.rng.gen::<f64>();
        let u2 = self.rng.gen::<f64>();
        let radius = (-2.0 * u1.ln()).sqrt();
        let angle = std::f64::consts::TAU * u2;
        self.spare = Some(radius * angle.sin());
        radius * angle.cos()
    }
}

impl NoiseSource for GaussianNoise {
    fn gaussian(&mut self, std_dev: f64) -> f64 {
        self.standard_normal() * std_dev
    }
}

/// Always returns zero
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl NoiseSource for Silence {
    fn gaussian(&mut self, _std_dev: f64) -> f64 {
        0.0
    }
}
