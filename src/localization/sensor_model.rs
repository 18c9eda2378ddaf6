//! Four-directional wall-distance sensor.
//!
//! The maze answers distance queries in its own absolute frame. The
//! sensor model re-expresses them in the agent's heading frame (quarter
//! turn buckets, since the maze is rectilinear), clips them to the sensor
//! range, and optionally perturbs them with reading-proportional Gaussian
//! noise. Particles sense noise-free; the robot senses through
//! [`NoisePolicy::Gaussian`].

use serde::{Deserialize, Serialize};

use crate::core::rng::SimRng;
use crate::core::types::{Pose, SensorReading};
use crate::world::Maze;

/// Sensor noise behavior of an agent.
///
/// `Gaussian` perturbs each component independently with standard
/// deviation `reading * fraction / 2`, after the base reading is taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoisePolicy {
    /// Exact readings (particles).
    None,
    /// Reading-proportional Gaussian noise (the robot).
    Gaussian {
        /// Noise magnitude as a fraction of the reading. Typical: 0.05
        fraction: f64,
    },
}

impl NoisePolicy {
    /// Apply this policy to a finished reading.
    pub fn apply(&self, reading: SensorReading, rng: &mut SimRng) -> SensorReading {
        match self {
            NoisePolicy::None => reading,
            NoisePolicy::Gaussian { fraction } => {
                SensorReading(reading.0.map(|d| d + rng.gaussian(d * fraction / 2.0)))
            }
        }
    }
}

impl Default for NoisePolicy {
    fn default() -> Self {
        NoisePolicy::None
    }
}

/// Wall distances in the maze's absolute frame.
#[inline]
pub fn raw_reading(pose: &Pose, maze: &Maze) -> SensorReading {
    maze.distance_to_walls(pose.x, pose.y)
}

/// Wall distances in the agent's heading frame, range-clipped.
///
/// The maze-frame reading is rotated by whole quarter turns chosen from
/// the heading's 90-degree bucket, so agents facing the same way report
/// comparable vectors regardless of compass direction. With a limit, no
/// component exceeds it.
pub fn oriented_reading(pose: &Pose, maze: &Maze, sensor_limit: Option<f64>) -> SensorReading {
    let rotated = raw_reading(pose, maze).rotated_right(rotation_steps(pose.heading));
    match sensor_limit {
        Some(limit) => rotated.clipped(limit),
        None => rotated,
    }
}

/// Quarter turns that re-express a maze-frame reading in the heading
/// frame.
///
/// Headings are normalized to [0, 360); the last bucket wraps through
/// north.
fn rotation_steps(heading: f64) -> usize {
    if (45.0..135.0).contains(&heading) {
        0
    } else if (135.0..225.0).contains(&heading) {
        1
    } else if (225.0..315.0).contains(&heading) {
        2
    } else {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn single_cell() -> Maze {
        Maze::from_grid(vec![vec![0x0F]], 200.0, 100.0).unwrap()
    }

    #[test]
    fn test_rotation_steps_buckets() {
        assert_eq!(rotation_steps(45.0), 0);
        assert_eq!(rotation_steps(90.0), 0);
        assert_eq!(rotation_steps(134.9), 0);
        assert_eq!(rotation_steps(135.0), 1);
        assert_eq!(rotation_steps(180.0), 1);
        assert_eq!(rotation_steps(224.9), 1);
        assert_eq!(rotation_steps(225.0), 2);
        assert_eq!(rotation_steps(270.0), 2);
        assert_eq!(rotation_steps(314.9), 2);
        assert_eq!(rotation_steps(315.0), 3);
        assert_eq!(rotation_steps(359.9), 3);
        assert_eq!(rotation_steps(0.0), 3);
        assert_eq!(rotation_steps(44.9), 3);
    }

    #[test]
    fn test_oriented_reading_per_heading() {
        let maze = single_cell();
        // Maze frame at (30, 120): up 120, right 70, down 80, left 30.
        let east = oriented_reading(&Pose::new(30.0, 120.0, 90.0), &maze, None);
        assert_eq!(east.0, [120.0, 70.0, 80.0, 30.0]);

        let south = oriented_reading(&Pose::new(30.0, 120.0, 180.0), &maze, None);
        assert_eq!(south.0, [30.0, 120.0, 70.0, 80.0]);

        let west = oriented_reading(&Pose::new(30.0, 120.0, 270.0), &maze, None);
        assert_eq!(west.0, [80.0, 30.0, 120.0, 70.0]);

        let north = oriented_reading(&Pose::new(30.0, 120.0, 0.0), &maze, None);
        assert_eq!(north.0, [70.0, 80.0, 30.0, 120.0]);
    }

    #[test]
    fn test_oriented_reading_clips_to_limit() {
        let maze = single_cell();
        let reading = oriented_reading(&Pose::new(30.0, 120.0, 90.0), &maze, Some(75.0));
        assert_eq!(reading.0, [75.0, 70.0, 75.0, 30.0]);
    }

    #[test]
    fn test_noise_policy_none_is_identity() {
        let mut rng = SimRng::new(42);
        let reading = SensorReading([120.0, 70.0, 80.0, 30.0]);
        assert_eq!(NoisePolicy::None.apply(reading, &mut rng), reading);
    }

    #[test]
    fn test_noise_policy_gaussian_statistics() {
        let mut rng = SimRng::new(42);
        let policy = NoisePolicy::Gaussian { fraction: 0.05 };
        let reading = SensorReading([100.0, 100.0, 100.0, 100.0]);

        let n = 2000;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for _ in 0..n {
            let noisy = policy.apply(reading, &mut rng);
            sum += noisy.up();
            sum_sq += (noisy.up() - 100.0) * (noisy.up() - 100.0);
        }
        let mean = sum / n as f64;
        let std = (sum_sq / n as f64).sqrt();

        assert_relative_eq!(mean, 100.0, epsilon = 0.5);
        // Expected std = 100 * 0.05 / 2 = 2.5
        assert_relative_eq!(std, 2.5, epsilon = 0.5);
    }

    #[test]
    fn test_noise_policy_gaussian_zero_reading_stays_zero() {
        let mut rng = SimRng::new(42);
        let policy = NoisePolicy::Gaussian { fraction: 0.05 };
        let noisy = policy.apply(SensorReading::zero(), &mut rng);
        assert_eq!(noisy, SensorReading::zero());
    }
}
