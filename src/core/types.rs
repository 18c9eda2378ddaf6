//! Pose and sensor-reading types for maze localization.

use serde::{Deserialize, Serialize};

/// Agent pose in the maze frame.
///
/// Position (x, y) in world units with the origin at the maze's top-left
/// corner, x growing rightward along columns and y growing downward along
/// rows. Heading is in degrees, clockwise from the y-axis, normalized to
/// [0, 360).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// X position in world units
    pub x: f64,
    /// Y position in world units
    pub y: f64,
    /// Heading in degrees, normalized to [0, 360)
    pub heading: f64,
}

impl Pose {
    /// Create a new pose with heading normalized to [0, 360).
    #[inline]
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            x,
            y,
            heading: crate::core::math::normalize_heading(heading),
        }
    }

    /// Pose at the origin facing along the y-axis.
    #[inline]
    pub fn origin() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            heading: 0.0,
        }
    }

    /// Same position with a different (normalized) heading.
    #[inline]
    pub fn with_heading(&self, heading: f64) -> Self {
        Self::new(self.x, self.y, heading)
    }

    /// Euclidean distance to another pose's position.
    #[inline]
    pub fn distance(&self, other: &Pose) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::origin()
    }
}

/// One four-directional wall-distance measurement.
///
/// Components are ordered [up, right, down, left] in whatever frame the
/// producer used: `Maze::distance_to_walls` reports them in the maze's
/// absolute frame, the sensor model rotates them into the agent's frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading(pub [f64; 4]);

impl SensorReading {
    /// Reading with all four components zero.
    #[inline]
    pub fn zero() -> Self {
        Self([0.0; 4])
    }

    /// Rotate the component order right by `steps` places.
    ///
    /// One step moves the last component to the front, re-expressing a
    /// maze-frame reading one quarter turn clockwise.
    #[inline]
    pub fn rotated_right(&self, steps: usize) -> Self {
        let mut out = self.0;
        out.rotate_right(steps % 4);
        Self(out)
    }

    /// Clamp every component to at most `limit`.
    #[inline]
    pub fn clipped(&self, limit: f64) -> Self {
        Self(self.0.map(|d| d.min(limit)))
    }

    /// Euclidean distance to another reading, treating both as 4-vectors.
    #[inline]
    pub fn distance(&self, other: &SensorReading) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Component in the up (negative y) direction.
    #[inline]
    pub fn up(&self) -> f64 {
        self.0[0]
    }

    /// Component in the right (positive x) direction.
    #[inline]
    pub fn right(&self) -> f64 {
        self.0[1]
    }

    /// Component in the down (positive y) direction.
    #[inline]
    pub fn down(&self) -> f64 {
        self.0[2]
    }

    /// Component in the left (negative x) direction.
    #[inline]
    pub fn left(&self) -> f64 {
        self.0[3]
    }
}

impl Default for SensorReading {
    fn default() -> Self {
        Self::zero()
    }
}
