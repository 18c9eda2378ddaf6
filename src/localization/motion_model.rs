//! Grid-crossing motion model shared by the robot and particles.
//!
//! A move displaces a pose along its heading and validates the resulting
//! segment against the maze walls, classified by how many cells it
//! crosses:
//!
//! 1. Same cell: always legal.
//! 2. Straight crossing (one axis): legal iff the shared edge between the
//!    two cells is open.
//! 3. Diagonal crossing (both axes): legal iff both edges the segment
//!    actually passes through are open, tested at the column boundary
//!    first, then the row boundary.
//!
//! Headings are degrees with 0 pointing along +y (increasing rows) and 90
//! along +x (increasing columns). A move never changes the heading;
//! heading updates belong to the caller.

use crate::core::math::{cell_index, heading_to_radians};
use crate::core::types::Pose;
use crate::world::{Direction, Maze};

/// Displacement vector for one move along a heading.
#[inline]
pub fn displacement(heading: f64, speed: f64) -> (f64, f64) {
    let rad = heading_to_radians(heading);
    (rad.sin() * speed, rad.cos() * speed)
}

/// Try to advance a pose by `speed` along its heading.
///
/// Returns the displaced pose when the move is legal, `None` when a wall
/// or the maze boundary blocks it. A rejected move leaves the caller's
/// pose untouched; retrying with a new heading is the caller's decision.
///
/// # Panics
///
/// Panics if the displacement crosses more than one cell on either axis.
/// The edge checks below only see adjacent cells, so speeds above one
/// cell dimension break the model's contract.
pub fn attempt_move(pose: &Pose, speed: f64, maze: &Maze) -> Option<Pose> {
    debug_assert!(
        maze.contains(pose.x, pose.y),
        "move starts outside the maze: ({}, {})",
        pose.x,
        pose.y
    );

    let (dx, dy) = displacement(pose.heading, speed);
    let x2 = pose.x + dx;
    let y2 = pose.y + dy;

    let row1 = cell_index(pose.y, maze.grid_height());
    let col1 = cell_index(pose.x, maze.grid_width());
    let row2 = cell_index(y2, maze.grid_height());
    let col2 = cell_index(x2, maze.grid_width());

    if !maze.is_valid_cell(row2, col2) {
        return None;
    }

    let accepted = match ((row2 - row1).abs(), (col2 - col1).abs()) {
        (0, 0) => true,
        (1, 0) => maze.edge_open(row1.min(row2) as usize, col1 as usize, Direction::Down),
        (0, 1) => maze.edge_open(row1 as usize, col1.min(col2) as usize, Direction::Right),
        (1, 1) => diagonal_clear(maze, (pose.x, pose.y), (x2, y2), (row1, row2), (col1, col2)),
        (d_row, d_col) => panic!(
            "move crossed {} rows and {} cols in one step; speed {} breaks the one-cell contract for {} x {} cells",
            d_row,
            d_col,
            speed,
            maze.grid_height(),
            maze.grid_width()
        ),
    };

    accepted.then(|| Pose::new(x2, y2, pose.heading))
}

/// Check both edges a diagonal segment passes through.
///
/// The segment crosses exactly one vertical and one horizontal grid line.
/// Interpolating the crossing points tells which row the vertical edge is
/// tested in and which column the horizontal edge is tested in.
fn diagonal_clear(
    maze: &Maze,
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    (row1, row2): (i64, i64),
    (col1, col2): (i64, i64),
) -> bool {
    // Both axes moved, so neither denominator is zero.
    let boundary_x = col1.max(col2) as f64 * maze.grid_width();
    let y_at_crossing = y1 + (y2 - y1) * (boundary_x - x1) / (x2 - x1);
    let crossing_row = cell_index(y_at_crossing, maze.grid_height()) as usize;
    if !maze.edge_open(crossing_row, col1.min(col2) as usize, Direction::Right) {
        return false;
    }

    let boundary_y = row1.max(row2) as f64 * maze.grid_height();
    let x_at_crossing = x1 + (x2 - x1) * (boundary_y - y1) / (y2 - y1);
    let crossing_col = cell_index(x_at_crossing, maze.grid_width()) as usize;
    maze.edge_open(row1.min(row2) as usize, crossing_col, Direction::Down)
}
