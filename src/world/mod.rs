//! World model layer.
//!
//! The maze the agents live in: wall storage, generation, and the
//! geometric queries the localization layer builds on.
//!
//! # Components
//!
//! - [`Maze`]: bit-packed wall grid with permissibility and wall-distance
//!   queries
//! - [`MazeConfig`]: randomized-generation parameters
//! - [`Direction`]: the four cell-edge directions

mod maze;

pub use maze::{
    Direction, Maze, MazeConfig, MazeError, WALL_BOTTOM, WALL_LEFT, WALL_RIGHT, WALL_TOP,
};
