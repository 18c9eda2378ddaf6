//! Monte Carlo localization layer.
//!
//! Weighted particles approximate the robot's posterior pose
//! distribution inside a known maze.
//!
//! # Components
//!
//! - [`Particle`] / [`Robot`]: the moving agents
//! - [`motion_model`]: wall-aware displacement shared by both agents
//! - [`sensor_model`]: heading-relative wall distances, with and without
//!   noise
//! - [`WeightedDistribution`]: cumulative-weight resampling
//!
//! # Example
//!
//! ```ignore
//! use vyuha_mcl::localization::{weight_gaussian_kernel, Particle};
//!
//! let robot_reading = robot.read_sensor(&maze, sensor_limit, &mut rng);
//! for particle in &mut particles {
//!     let reading = particle.read_sensor(&maze, sensor_limit);
//!     particle.weight = weight_gaussian_kernel(&robot_reading, &reading, sigma);
//! }
//! ```

mod agent;
pub mod motion_model;
pub mod sensor_model;
mod particle_filter;

pub use agent::{clamp_into_maze, perturb_pose, Particle, Robot};
pub use motion_model::{attempt_move, displacement};
pub use particle_filter::{
    normalize_weights, weight_gaussian_kernel, WeightedDistribution, WEIGHT_EPSILON,
};
pub use sensor_model::{oriented_reading, raw_reading, NoisePolicy};
