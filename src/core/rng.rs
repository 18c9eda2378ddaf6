//! Seedable random source for the simulation
//!
//! One generator instance drives maze generation, agent placement, sensor
//! noise, and resampling draws, so a whole run replays from a single seed.

use rand::prelude::*;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, StandardNormal, Uniform};

/// Random source with configurable seed for reproducibility
#[derive(Debug, Clone)]
pub struct SimRng {
    rng: SmallRng,
}

impl SimRng {
    /// Create a new random source
    ///
    /// If seed is 0, uses random entropy for non-deterministic behavior.
    /// Otherwise, uses the provided seed for reproducible results.
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self { rng }
    }

    /// Generate uniform random in [0, 1)
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        Uniform::new(0.0f64, 1.0).sample(&mut self.rng)
    }

    /// Generate uniform random in [low, high)
    #[inline]
    pub fn range(&mut self, low: f64, high: f64) -> f64 {
        Uniform::new(low, high).sample(&mut self.rng)
    }

    /// Generate Gaussian noise with given standard deviation
    #[inline]
    pub fn gaussian(&mut self, stddev: f64) -> f64 {
        if stddev == 0.0 {
            return 0.0;
        }
        let n: f64 = self.rng.sample(StandardNormal);
        n * stddev
    }

    /// Returns true with given probability
    #[inline]
    pub fn chance(&mut self, probability: f64) -> bool {
        self.uniform() < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_seed() {
        let mut rng1 = SimRng::new(42);
        let mut rng2 = SimRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gaussian(1.0), rng2.gaussian(1.0));
            assert_eq!(rng1.uniform(), rng2.uniform());
        }
    }

    #[test]
    fn test_zero_stddev() {
        let mut rng = SimRng::new(42);
        for _ in 0..10 {
            assert_eq!(rng.gaussian(0.0), 0.0);
        }
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = SimRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(100.0, 250.0);
            assert!((100.0..250.0).contains(&v), "Out of range: {}", v);
        }
    }

    #[test]
    fn test_chance_probability() {
        let mut rng = SimRng::new(42);
        let mut count = 0;
        let trials = 10000;

        for _ in 0..trials {
            if rng.chance(0.25) {
                count += 1;
            }
        }

        let ratio = count as f64 / trials as f64;
        assert!((ratio - 0.25).abs() < 0.05); // Within 5% of expected
    }

    #[test]
    fn test_gaussian_statistics() {
        let mut rng = SimRng::new(7);
        let n = 10000;
        let stddev = 20.0;

        let samples: Vec<f64> = (0..n).map(|_| rng.gaussian(stddev)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;

        assert!(mean.abs() < 1.0, "Mean should be near zero: {}", mean);
        assert!(
            (var.sqrt() - stddev).abs() < 1.0,
            "Stddev should be near {}: {}",
            stddev,
            var.sqrt()
        );
    }
}
