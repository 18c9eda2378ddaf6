//! Simulation engine layer.
//!
//! Orchestrates one localization run: validated configuration, the
//! renderer seam, and the step loop that drives sensing, weighting,
//! resampling, and motion.
//!
//! # Components
//!
//! - [`SimulationConfig`]: the validated parameter bundle
//! - [`Simulation`]: the step-driven engine
//! - [`MazeRenderer`] / [`NullRenderer`]: the drawing seam
//! - [`StepReport`]: per-step diagnostics

mod config;
mod renderer;
mod simulation;

pub use config::{ConfigError, SimulationConfig};
pub use renderer::{MazeRenderer, NullRenderer};
pub use simulation::{Simulation, StepReport};
