//! Moving agents: the particle population and the robot.
//!
//! Both kinds of agent share one pose representation and one motion
//! model. A particle is a weighted pose hypothesis that senses exactly;
//! the robot senses through a [`NoisePolicy`] and reacts to rejected
//! moves by drawing fresh random headings until one works.

use serde::{Deserialize, Serialize};

use crate::core::rng::SimRng;
use crate::core::types::{Pose, SensorReading};
use crate::localization::motion_model::attempt_move;
use crate::localization::sensor_model::{oriented_reading, NoisePolicy};
use crate::world::Maze;

/// Snap a pose into the maze's half-open bounds.
///
/// Coordinates below zero snap to zero; coordinates at or past the upper
/// bound snap just inside it. The heading is left to `Pose`'s own
/// normalization.
pub fn clamp_into_maze(pose: &Pose, maze: &Maze) -> Pose {
    let x = if pose.x < 0.0 {
        0.0
    } else if pose.x >= maze.width() {
        maze.width() * 0.9999
    } else {
        pose.x
    };
    let y = if pose.y < 0.0 {
        0.0
    } else if pose.y >= maze.height() {
        maze.height() * 0.9999
    } else {
        pose.y
    };
    Pose::new(x, y, pose.heading)
}

/// Jitter a pose with Gaussian noise and clamp it back into the maze.
///
/// Draw order is x, y, heading. Used for resampled particle clones and
/// for the robot's initial placement.
pub fn perturb_pose(
    pose: &Pose,
    position_std: f64,
    heading_std: f64,
    maze: &Maze,
    rng: &mut SimRng,
) -> Pose {
    let jittered = Pose::new(
        pose.x + rng.gaussian(position_std),
        pose.y + rng.gaussian(position_std),
        pose.heading + rng.gaussian(heading_std),
    );
    clamp_into_maze(&jittered, maze)
}

/// A single particle representing a possible robot pose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    /// Hypothesized robot pose.
    pub pose: Pose,
    /// Importance weight, relative to the population this step.
    pub weight: f64,
}

impl Particle {
    /// Create a new particle with unit weight.
    pub fn new(pose: Pose) -> Self {
        Self { pose, weight: 1.0 }
    }

    /// Place a fresh particle uniformly at random in the maze.
    pub fn random(maze: &Maze, rng: &mut SimRng) -> Self {
        let x = rng.range(0.0, maze.width());
        let y = rng.range(0.0, maze.height());
        let heading = rng.range(0.0, 360.0);
        Self::new(Pose::new(x, y, heading))
    }

    /// Clone for the next generation: jittered pose, unit weight.
    pub fn perturbed_clone(
        &self,
        position_std: f64,
        heading_std: f64,
        maze: &Maze,
        rng: &mut SimRng,
    ) -> Particle {
        Particle::new(perturb_pose(&self.pose, position_std, heading_std, maze, rng))
    }

    /// Sense walls from the particle's pose (exact, range-clipped).
    pub fn read_sensor(&self, maze: &Maze, sensor_limit: Option<f64>) -> SensorReading {
        oriented_reading(&self.pose, maze, sensor_limit)
    }

    /// Attempt one displacement along the current heading.
    ///
    /// Returns whether the move was accepted; a rejected move keeps the
    /// prior pose.
    pub fn try_move(&mut self, speed: f64, maze: &Maze) -> bool {
        match attempt_move(&self.pose, speed, maze) {
            Some(pose) => {
                self.pose = pose;
                true
            }
            None => false,
        }
    }
}

/// The simulated robot.
///
/// Owns its speed and sensor noise policy. Counters expose how many move
/// attempts (`time_step`) and accepted moves (`step_count`) the robot has
/// made.
#[derive(Debug, Clone)]
pub struct Robot {
    pose: Pose,
    speed: f64,
    noise: NoisePolicy,
    time_step: u64,
    step_count: u64,
}

impl Robot {
    /// Create a robot at a pose.
    pub fn new(pose: Pose, speed: f64, noise: NoisePolicy) -> Self {
        Self {
            pose,
            speed,
            noise,
            time_step: 0,
            step_count: 0,
        }
    }

    /// Current pose.
    #[inline]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Current heading in degrees.
    #[inline]
    pub fn heading(&self) -> f64 {
        self.pose.heading
    }

    /// Movement speed in world units per step.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Move attempts so far, rejected ones included.
    #[inline]
    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    /// Accepted moves so far.
    #[inline]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Sense walls through the robot's noise policy.
    pub fn read_sensor(
        &self,
        maze: &Maze,
        sensor_limit: Option<f64>,
        rng: &mut SimRng,
    ) -> SensorReading {
        let reading = oriented_reading(&self.pose, maze, sensor_limit);
        self.noise.apply(reading, rng)
    }

    /// Move one step, redrawing the heading until a move is accepted.
    ///
    /// Returns the number of attempts. A heading into the cell interior
    /// always exists for speeds below one cell dimension, so the retry
    /// loop terminates.
    pub fn move_with_retries(&mut self, maze: &Maze, rng: &mut SimRng) -> u32 {
        let mut attempts = 0;
        loop {
            self.time_step += 1;
            attempts += 1;
            if let Some(pose) = attempt_move(&self.pose, self.speed, maze) {
                self.pose = pose;
                self.step_count += 1;
                break;
            }
            self.pose = self.pose.with_heading(rng.range(0.0, 360.0));
        }
        if attempts > 1 {
            log::debug!("Robot redrew {} headings before moving", attempts - 1);
        }
        attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn walled_cell() -> Maze {
        Maze::from_grid(vec![vec![0x0F]], 100.0, 100.0).unwrap()
    }

    #[test]
    fn test_random_particles_inside_maze() {
        let maze = Maze::from_grid(vec![vec![0, 0], vec![0, 0]], 100.0, 100.0).unwrap();
        let mut rng = SimRng::new(42);
        for _ in 0..100 {
            let p = Particle::random(&maze, &mut rng);
            assert!(maze.contains(p.pose.x, p.pose.y), "pose out of maze: {:?}", p.pose);
            assert!((0.0..360.0).contains(&p.pose.heading));
            assert_eq!(p.weight, 1.0);
        }
    }

    #[test]
    fn test_clamp_into_maze() {
        let maze = walled_cell();
        let inside = clamp_into_maze(&Pose::new(40.0, 60.0, 10.0), &maze);
        assert_relative_eq!(inside.x, 40.0);
        assert_relative_eq!(inside.y, 60.0);

        let low = clamp_into_maze(&Pose::new(-5.0, -0.1, 10.0), &maze);
        assert_eq!((low.x, low.y), (0.0, 0.0));

        let high = clamp_into_maze(&Pose::new(100.0, 250.0, 10.0), &maze);
        assert_relative_eq!(high.x, 99.99);
        assert_relative_eq!(high.y, 99.99);
    }

    #[test]
    fn test_perturbed_clone_resets_weight() {
        let maze = walled_cell();
        let mut rng = SimRng::new(42);
        let mut particle = Particle::new(Pose::new(50.0, 50.0, 90.0));
        particle.weight = 0.3;

        let clone = particle.perturbed_clone(0.0, 0.0, &maze, &mut rng);
        assert_eq!(clone.weight, 1.0);
        assert_eq!(clone.pose, particle.pose, "zero stddev leaves the pose unchanged");
    }

    #[test]
    fn test_perturbed_clone_stays_inside() {
        let maze = walled_cell();
        let mut rng = SimRng::new(42);
        let particle = Particle::new(Pose::new(1.0, 99.0, 0.0));
        for _ in 0..200 {
            let clone = particle.perturbed_clone(30.0, 18.0, &maze, &mut rng);
            assert!(
                maze.contains(clone.pose.x, clone.pose.y),
                "clone escaped the maze: {:?}",
                clone.pose
            );
        }
    }

    #[test]
    fn test_try_move_updates_pose_only_on_success() {
        let maze = walled_cell();
        let mut particle = Particle::new(Pose::new(50.0, 50.0, 90.0));
        assert!(particle.try_move(10.0, &maze));
        assert_relative_eq!(particle.pose.x, 60.0, epsilon = 1e-9);

        let mut stuck = Particle::new(Pose::new(95.0, 50.0, 90.0));
        assert!(!stuck.try_move(10.0, &maze));
        assert_relative_eq!(stuck.pose.x, 95.0);
    }

    #[test]
    fn test_robot_counts_accepted_move() {
        let maze = walled_cell();
        let mut rng = SimRng::new(42);
        let mut robot = Robot::new(Pose::new(50.0, 50.0, 90.0), 10.0, NoisePolicy::None);

        let attempts = robot.move_with_retries(&maze, &mut rng);
        assert_eq!(attempts, 1);
        assert_eq!(robot.time_step(), 1);
        assert_eq!(robot.step_count(), 1);
        assert_relative_eq!(robot.pose().x, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_robot_retries_until_legal_heading() {
        let maze = walled_cell();
        let mut rng = SimRng::new(42);
        // First attempt exits the maze and must be rejected.
        let mut robot = Robot::new(Pose::new(95.0, 50.0, 90.0), 10.0, NoisePolicy::None);

        let attempts = robot.move_with_retries(&maze, &mut rng);
        assert!(attempts > 1, "the initial heading leads out of the maze");
        assert_eq!(robot.time_step(), attempts as u64);
        assert_eq!(robot.step_count(), 1);
        assert!(maze.contains(robot.pose().x, robot.pose().y));
    }

    #[test]
    fn test_robot_sensor_noise_policies() {
        let maze = walled_cell();
        let mut rng = SimRng::new(42);
        let pose = Pose::new(30.0, 70.0, 90.0);

        let exact = Robot::new(pose, 10.0, NoisePolicy::None);
        assert_eq!(
            exact.read_sensor(&maze, None, &mut rng),
            SensorReading([70.0, 70.0, 30.0, 30.0])
        );

        let noisy = Robot::new(pose, 10.0, NoisePolicy::Gaussian { fraction: 0.05 });
        let reading = noisy.read_sensor(&maze, None, &mut rng);
        for (got, base) in reading.0.iter().zip([70.0, 70.0, 30.0, 30.0]) {
            // 5 sigma of reading * 0.05 / 2
            assert!(
                (got - base).abs() < base * 0.125,
                "noise out of expected band: {} vs {}",
                got,
                base
            );
        }
    }
}
