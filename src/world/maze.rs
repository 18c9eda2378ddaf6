//! Bit-packed wall grid for rectilinear mazes.
//!
//! Each cell stores its four edges in a 4-bit mask; a set bit means the
//! edge is walled.
//!
//! # Wall Encoding
//!
//! ```text
//! bit 0 (1): top edge walled
//! bit 1 (2): right edge walled
//! bit 2 (4): bottom edge walled
//! bit 3 (8): left edge walled
//! ```
//!
//! Two structural invariants hold for every constructed maze:
//!
//! - Boundary closure: outer cells always have their outward edge walled,
//!   so walks along the wall graph terminate inside the grid.
//! - Pairwise consistency: adjacent cells agree about their shared edge
//!   (the right bit of a cell equals the left bit of its right neighbor,
//!   and likewise for bottom/top pairs).
//!
//! Construction enforces both by repair: a wall reported by either side of
//! a shared edge is OR-ed into both sides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::math::{cell_index, cell_offset};
use crate::core::rng::SimRng;
use crate::core::types::SensorReading;

/// Top edge wall bit.
pub const WALL_TOP: u8 = 1;
/// Right edge wall bit.
pub const WALL_RIGHT: u8 = 2;
/// Bottom edge wall bit.
pub const WALL_BOTTOM: u8 = 4;
/// Left edge wall bit.
pub const WALL_LEFT: u8 = 8;

/// One of the four edge directions of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in sensor-reading order [up, right, down, left].
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Wall mask bit for this edge.
    #[inline]
    pub fn bit(self) -> u8 {
        match self {
            Direction::Up => WALL_TOP,
            Direction::Right => WALL_RIGHT,
            Direction::Down => WALL_BOTTOM,
            Direction::Left => WALL_LEFT,
        }
    }
}

/// Axis of a shared edge between two adjacent cells.
///
/// `Vertical` edges separate left/right neighbors, `Horizontal` edges
/// separate up/down neighbors. Repair dispatches on this enum, so no
/// unclassifiable mismatch can exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WallAxis {
    Vertical,
    Horizontal,
}

/// Parameters for randomized maze generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Number of cell rows. Default: 25
    pub num_rows: usize,
    /// Number of cell columns. Default: 25
    pub num_cols: usize,
    /// Physical height of one cell in world units. Default: 100.0
    pub grid_height: f64,
    /// Physical width of one cell in world units. Default: 100.0
    pub grid_width: f64,
    /// Probability of a wall on each interior edge. Default: 0.25
    pub wall_prob: f64,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            num_rows: 25,
            num_cols: 25,
            grid_height: 100.0,
            grid_width: 100.0,
            wall_prob: 0.25,
        }
    }
}

impl MazeConfig {
    /// Validate generation parameters.
    pub fn validate(&self) -> Result<(), MazeError> {
        if self.num_rows == 0 || self.num_cols == 0 {
            return Err(MazeError::EmptyGrid);
        }
        if self.grid_height <= 0.0 || self.grid_width <= 0.0 {
            return Err(MazeError::InvalidCellSize {
                height: self.grid_height,
                width: self.grid_width,
            });
        }
        if !(0.0..=1.0).contains(&self.wall_prob) {
            return Err(MazeError::InvalidWallProbability(self.wall_prob));
        }
        Ok(())
    }
}

/// Errors from maze construction.
#[derive(Debug, Error)]
pub enum MazeError {
    #[error("maze must have at least one row and one column")]
    EmptyGrid,
    #[error("maze row {row} has {actual} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("cell ({row}, {col}) has mask {mask}, expected a 4-bit value")]
    InvalidCellMask { row: usize, col: usize, mask: u8 },
    #[error("cell dimensions must be positive, got {height} x {width}")]
    InvalidCellSize { height: f64, width: f64 },
    #[error("wall probability must be in [0, 1], got {0}")]
    InvalidWallProbability(f64),
}

/// Rectilinear maze with bit-packed walls.
///
/// Immutable after construction. Supports wall-permissibility queries for
/// collision checking and four-directional wall-distance queries for the
/// sensor model.
#[derive(Debug, Clone)]
pub struct Maze {
    /// Cell wall masks.
    ///
    /// Row-major storage: index = row * num_cols + col
    cells: Vec<u8>,

    /// Grid height in cells.
    num_rows: usize,

    /// Grid width in cells.
    num_cols: usize,

    /// Physical height of one cell in world units.
    grid_height: f64,

    /// Physical width of one cell in world units.
    grid_width: f64,
}

impl Maze {
    /// Build a maze from an explicit grid of wall masks.
    ///
    /// The grid is taken as authored, then boundary closure and pairwise
    /// consistency are enforced; any consistency repair is reported with a
    /// warning since it means the input contradicted itself.
    pub fn from_grid(
        grid: Vec<Vec<u8>>,
        grid_height: f64,
        grid_width: f64,
    ) -> Result<Self, MazeError> {
        if grid_height <= 0.0 || grid_width <= 0.0 {
            return Err(MazeError::InvalidCellSize {
                height: grid_height,
                width: grid_width,
            });
        }
        let num_rows = grid.len();
        let num_cols = grid.first().map_or(0, Vec::len);
        if num_rows == 0 || num_cols == 0 {
            return Err(MazeError::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(num_rows * num_cols);
        for (row, row_cells) in grid.iter().enumerate() {
            if row_cells.len() != num_cols {
                return Err(MazeError::RaggedGrid {
                    row,
                    expected: num_cols,
                    actual: row_cells.len(),
                });
            }
            for (col, &mask) in row_cells.iter().enumerate() {
                if mask > 0x0F {
                    return Err(MazeError::InvalidCellMask { row, col, mask });
                }
                cells.push(mask);
            }
        }

        let mut maze = Self {
            cells,
            num_rows,
            num_cols,
            grid_height,
            grid_width,
        };
        maze.fix_boundary();
        let repairs = maze.fix_inconsistencies();
        if repairs > 0 {
            log::warn!("Repaired {} wall inconsistencies in provided maze grid", repairs);
        }
        log::info!(
            "Maze ready: {} x {} cells, {:.0} x {:.0} world units",
            maze.num_rows,
            maze.num_cols,
            maze.height(),
            maze.width(),
        );
        Ok(maze)
    }

    /// Generate a random maze.
    ///
    /// Each interior right edge, then each interior bottom edge, gets a
    /// wall with probability `wall_prob`, drawn in row-major order from
    /// `rng`. Generation writes only one side of each edge, so the
    /// consistency repair that mirrors the bits onto the facing cells runs
    /// silently afterwards.
    pub fn random(config: &MazeConfig, rng: &mut SimRng) -> Result<Self, MazeError> {
        config.validate()?;

        let mut maze = Self {
            cells: vec![0; config.num_rows * config.num_cols],
            num_rows: config.num_rows,
            num_cols: config.num_cols,
            grid_height: config.grid_height,
            grid_width: config.grid_width,
        };

        for row in 0..maze.num_rows {
            for col in 0..maze.num_cols - 1 {
                if rng.chance(config.wall_prob) {
                    let idx = maze.idx(row, col);
                    maze.cells[idx] |= WALL_RIGHT;
                }
            }
        }
        for row in 0..maze.num_rows - 1 {
            for col in 0..maze.num_cols {
                if rng.chance(config.wall_prob) {
                    let idx = maze.idx(row, col);
                    maze.cells[idx] |= WALL_BOTTOM;
                }
            }
        }

        maze.fix_boundary();
        let repairs = maze.fix_inconsistencies();
        log::debug!(
            "Randomized maze generation mirrored {} one-sided walls",
            repairs
        );
        log::info!(
            "Maze ready: {} x {} cells, {:.0} x {:.0} world units, wall probability {}",
            maze.num_rows,
            maze.num_cols,
            maze.height(),
            maze.width(),
            config.wall_prob,
        );
        Ok(maze)
    }

    /// Grid height in cells.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Grid width in cells.
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Physical height of one cell in world units.
    #[inline]
    pub fn grid_height(&self) -> f64 {
        self.grid_height
    }

    /// Physical width of one cell in world units.
    #[inline]
    pub fn grid_width(&self) -> f64 {
        self.grid_width
    }

    /// Total maze height in world units.
    #[inline]
    pub fn height(&self) -> f64 {
        self.num_rows as f64 * self.grid_height
    }

    /// Total maze width in world units.
    #[inline]
    pub fn width(&self) -> f64 {
        self.num_cols as f64 * self.grid_width
    }

    /// Raw wall masks in row-major order (renderer input).
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Wall mask of one cell.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.cells[self.idx(row, col)]
    }

    /// Check if signed cell indices fall inside the grid.
    #[inline]
    pub fn is_valid_cell(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.num_rows && (col as usize) < self.num_cols
    }

    /// Check if a continuous point lies inside the maze.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width() && y < self.height()
    }

    /// Check if one edge of a cell is open (no wall).
    #[inline]
    pub fn edge_open(&self, row: usize, col: usize, direction: Direction) -> bool {
        self.cell(row, col) & direction.bit() == 0
    }

    /// Openness of all four edges of a cell, in [up, right, down, left]
    /// order.
    #[inline]
    pub fn permissibilities(&self, row: usize, col: usize) -> [bool; 4] {
        Direction::ALL.map(|d| self.edge_open(row, col, d))
    }

    /// Distance from a point to the nearest wall in each maze-frame
    /// direction, in [up, right, down, left] order.
    ///
    /// Walks the wall graph cell by cell from the cell containing the
    /// point, accumulating one cell dimension per open edge crossed, plus
    /// the point's offset within its own cell. Boundary closure bounds
    /// every walk. The point must lie inside the maze.
    pub fn distance_to_walls(&self, x: f64, y: f64) -> SensorReading {
        debug_assert!(
            self.contains(x, y),
            "sensor query outside the maze: ({}, {})",
            x,
            y
        );
        let row = cell_index(y, self.grid_height) as usize;
        let col = cell_index(x, self.grid_width) as usize;

        let mut d_up = cell_offset(y, self.grid_height);
        let mut r = row;
        while self.edge_open(r, col, Direction::Up) {
            debug_assert!(r > 0, "boundary closure must stop the upward walk");
            r -= 1;
            d_up += self.grid_height;
        }

        let mut d_right = self.grid_width - cell_offset(x, self.grid_width);
        let mut c = col;
        while self.edge_open(row, c, Direction::Right) {
            debug_assert!(c + 1 < self.num_cols, "boundary closure must stop the rightward walk");
            c += 1;
            d_right += self.grid_width;
        }

        let mut d_down = self.grid_height - cell_offset(y, self.grid_height);
        let mut r = row;
        while self.edge_open(r, col, Direction::Down) {
            debug_assert!(r + 1 < self.num_rows, "boundary closure must stop the downward walk");
            r += 1;
            d_down += self.grid_height;
        }

        let mut d_left = cell_offset(x, self.grid_width);
        let mut c = col;
        while self.edge_open(row, c, Direction::Left) {
            debug_assert!(c > 0, "boundary closure must stop the leftward walk");
            c -= 1;
            d_left += self.grid_width;
        }

        SensorReading([d_up, d_right, d_down, d_left])
    }

    /// Row-major cell index.
    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.num_rows && col < self.num_cols);
        row * self.num_cols + col
    }

    /// Wall in every outward-facing edge of the boundary cells.
    fn fix_boundary(&mut self) {
        for row in 0..self.num_rows {
            let left = self.idx(row, 0);
            self.cells[left] |= WALL_LEFT;
            let right = self.idx(row, self.num_cols - 1);
            self.cells[right] |= WALL_RIGHT;
        }
        for col in 0..self.num_cols {
            let top = self.idx(0, col);
            self.cells[top] |= WALL_TOP;
            let bottom = self.idx(self.num_rows - 1, col);
            self.cells[bottom] |= WALL_BOTTOM;
        }
    }

    /// Find every shared edge whose two cells disagree.
    ///
    /// Reports the upper-left cell of each mismatched pair.
    fn wall_mismatches(&self) -> Vec<(usize, usize, WallAxis)> {
        let mut mismatches = Vec::new();
        for row in 0..self.num_rows {
            for col in 0..self.num_cols {
                if col + 1 < self.num_cols {
                    let here = self.cell(row, col) & WALL_RIGHT != 0;
                    let neighbor = self.cell(row, col + 1) & WALL_LEFT != 0;
                    if here != neighbor {
                        mismatches.push((row, col, WallAxis::Vertical));
                    }
                }
                if row + 1 < self.num_rows {
                    let here = self.cell(row, col) & WALL_BOTTOM != 0;
                    let neighbor = self.cell(row + 1, col) & WALL_TOP != 0;
                    if here != neighbor {
                        mismatches.push((row, col, WallAxis::Horizontal));
                    }
                }
            }
        }
        mismatches
    }

    /// Repair every pairwise wall mismatch by walling both sides.
    ///
    /// Returns the number of repaired edges.
    fn fix_inconsistencies(&mut self) -> usize {
        let mismatches = self.wall_mismatches();
        for &(row, col, axis) in &mismatches {
            match axis {
                WallAxis::Vertical => {
                    let here = self.idx(row, col);
                    self.cells[here] |= WALL_RIGHT;
                    let neighbor = self.idx(row, col + 1);
                    self.cells[neighbor] |= WALL_LEFT;
                }
                WallAxis::Horizontal => {
                    let here = self.idx(row, col);
                    self.cells[here] |= WALL_BOTTOM;
                    let neighbor = self.idx(row + 1, col);
                    self.cells[neighbor] |= WALL_TOP;
                }
            }
        }
        mismatches.len()
    }
}
