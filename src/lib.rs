//! VyuhaMCL - Monte Carlo localization in procedurally generated mazes
//!
//! A robot wanders a grid-walled maze with noisy motion and noisy
//! distance sensors; a population of weighted particles approximates the
//! posterior over its pose and is resampled toward the truth each step.
//!
//! # Architecture
//!
//! The crate is organized into 4 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← Orchestration
//! │        (config, simulation loop, renderer seam)     │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                 localization/                       │  ← Core algorithms
//! │    (agents, motion, sensing, weighting, resampling) │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    world/                           │  ← World model
//! │          (bit-packed maze, wall queries)            │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │               (types, math, rng)                    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use vyuha_mcl::{NullRenderer, Simulation, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     random_seed: 42,
//!     ..SimulationConfig::small()
//! };
//! let mut sim = Simulation::new(config).unwrap();
//! let mut renderer = NullRenderer;
//!
//! for _ in 0..10 {
//!     let report = sim.step(&mut renderer);
//!     assert_eq!(report.step, sim.steps());
//! }
//! let estimate = sim.estimate().expect("population carries weight");
//! assert!(sim.maze().contains(estimate.x, estimate.y));
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: World model (depends on core)
// ============================================================================
pub mod world;

// ============================================================================
// Layer 3: Localization algorithms (depends on core, world)
// ============================================================================
pub mod localization;

// ============================================================================
// Layer 4: Simulation engine (depends on all layers)
// ============================================================================
pub mod engine;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::math;
pub use crate::core::rng::SimRng;
pub use crate::core::types::{Pose, SensorReading};

// World
pub use world::{
    Direction, Maze, MazeConfig, MazeError, WALL_BOTTOM, WALL_LEFT, WALL_RIGHT, WALL_TOP,
};

// Localization
pub use localization::{
    attempt_move, clamp_into_maze, displacement, normalize_weights, oriented_reading,
    perturb_pose, raw_reading, weight_gaussian_kernel, NoisePolicy, Particle, Robot,
    WeightedDistribution, WEIGHT_EPSILON,
};

// Engine
pub use engine::{
    ConfigError, MazeRenderer, NullRenderer, Simulation, SimulationConfig, StepReport,
};
