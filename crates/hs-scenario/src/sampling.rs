//! Batches of scenario parameters drawn from simple distributions.

use crate::{ScenarioError, ScenarioResult};
use hs_sim::SimRng;
use rand::distr::Uniform;
use rand_distr::{Distribution, Normal};

/// Seeded source of parameter batches.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: SimRng,
}

impl Sampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SimRng::from_seed_u64(seed),
        }
    }

    /// `n` values uniformly distributed over `[min, max]`.
    pub fn uniform(&mut self, min: f64, max: f64, n: usize) -> ScenarioResult<Vec<f64>> {
        let dist = Uniform::new_inclusive(min, max).map_err(|_| ScenarioError::InvalidArg {
            what: "uniform bounds must be finite with min <= max",
        })?;
        Ok((0..n).map(|_| dist.sample(&mut self.rng.0)).collect())
    }

    /// `n` values from a normal distribution.
    pub fn normal(&mut self, mean: f64, std: f64, n: usize) -> ScenarioResult<Vec<f64>> {
        if !mean.is_finite() || !std.is_finite() || std < 0.0 {
            return Err(ScenarioError::InvalidArg {
                what: "normal needs a finite mean and a finite non-negative std",
            });
        }
        let dist = Normal::new(mean, std).map_err(|_| ScenarioError::InvalidArg {
            what: "normal needs a finite mean and a finite non-negative std",
        })?;
        Ok((0..n).map(|_| dist.sample(&mut self.rng.0)).collect())
    }
}
