//! Drawing-surface contract between the engine and a display.
//!
//! The engine pushes draw calls through [`MazeRenderer`] once per step
//! and never reads anything back; windowing, colors, and event loops all
//! live on the implementation's side of the seam. Headless runs use
//! [`NullRenderer`].

use crate::core::types::Pose;
use crate::localization::{Particle, Robot};
use crate::world::Maze;

/// Receiver of the engine's per-step draw calls.
///
/// Call order per step: the maze once before the first frame, then
/// `draw_particles`, `draw_robot`, `draw_estimate`, `end_frame`.
pub trait MazeRenderer {
    /// Draw the static maze walls. Called once, before the first frame.
    fn draw_maze(&mut self, maze: &Maze);

    /// Redraw the particle population.
    ///
    /// `show_frequency` asks for every n-th particle only, to keep large
    /// populations drawable.
    fn draw_particles(&mut self, particles: &[Particle], show_frequency: usize);

    /// Redraw the robot.
    fn draw_robot(&mut self, robot: &Robot);

    /// Redraw the weighted-mean estimate, when one exists.
    fn draw_estimate(&mut self, estimate: Option<Pose>);

    /// Frame finished; drop transient objects before the next one.
    fn end_frame(&mut self);
}

/// Renderer that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl MazeRenderer for NullRenderer {
    fn draw_maze(&mut self, _maze: &Maze) {}
    fn draw_particles(&mut self, _particles: &[Particle], _show_frequency: usize) {}
    fn draw_robot(&mut self, _robot: &Robot) {}
    fn draw_estimate(&mut self, _estimate: Option<Pose>) {}
    fn end_frame(&mut self) {}
}
