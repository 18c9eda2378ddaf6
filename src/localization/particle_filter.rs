//! Importance weighting and resampling for the particle population.
//!
//! Weights come from a Gaussian similarity kernel between the robot's
//! sensor reading and each particle's. Resampling draws the next
//! generation from the cumulative weight distribution, one independent
//! quantile per slot, spawning fresh random particles when a draw finds
//! no probability mass.

use crate::core::rng::SimRng;
use crate::core::types::SensorReading;
use crate::localization::agent::Particle;

/// Divisor substituted when the population's weights sum to zero.
pub const WEIGHT_EPSILON: f64 = 1e-8;

/// Gaussian similarity kernel between two sensor readings.
///
/// `exp(-d^2 / (2 * sigma))` with `d` the Euclidean distance between the
/// two 4-vectors. Identical readings score 1 for any sigma; larger sigma
/// flattens the kernel so mismatched readings keep more weight.
#[inline]
pub fn weight_gaussian_kernel(a: &SensorReading, b: &SensorReading, sigma: f64) -> f64 {
    let distance = a.distance(b);
    (-distance * distance / (2.0 * sigma)).exp()
}

/// Normalize particle weights in place against the population total.
///
/// A zero total degrades to dividing by [`WEIGHT_EPSILON`] instead of
/// producing NaN, and is reported since it means no particle matched the
/// robot's reading at all. Returns the pre-normalization total.
pub fn normalize_weights(particles: &mut [Particle]) -> f64 {
    let total: f64 = particles.iter().map(|p| p.weight).sum();
    let divisor = if total == 0.0 {
        log::warn!("All particle weights are zero, normalizing against epsilon");
        WEIGHT_EPSILON
    } else {
        total
    };
    for particle in particles.iter_mut() {
        particle.weight /= divisor;
    }
    total
}

/// Cumulative weight distribution over one particle generation.
///
/// Built once per step from normalized weights and consumed by repeated
/// draws; the cumulative sequence is non-decreasing by construction and
/// never mutated.
#[derive(Debug, Clone)]
pub struct WeightedDistribution {
    cumulative: Vec<f64>,
}

impl WeightedDistribution {
    /// Accumulate the population's weights in order.
    pub fn new(particles: &[Particle]) -> Self {
        let mut cumulative = Vec::with_capacity(particles.len());
        let mut sum = 0.0;
        for p in particles {
            sum += p.weight;
            cumulative.push(sum);
        }
        Self { cumulative }
    }

    /// Index of the particle owning quantile `u`.
    ///
    /// Binary-searches for the leftmost cumulative entry at or above `u`.
    /// `None` means `u` exceeds every entry, which only happens when the
    /// population is empty or all weights collapsed to zero; callers
    /// respond by spawning a fresh random particle, not by failing.
    pub fn select(&self, u: f64) -> Option<usize> {
        let idx = self.cumulative.partition_point(|&c| c < u);
        (idx < self.cumulative.len()).then_some(idx)
    }

    /// Draw one particle index proportional to weight.
    pub fn sample(&self, rng: &mut SimRng) -> Option<usize> {
        self.select(rng.uniform())
    }

    /// Total accumulated weight.
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}
