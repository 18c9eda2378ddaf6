//! Mathematical primitives for maze-frame geometry.
//!
//! Functions for heading normalization (degrees, clockwise from the
//! y-axis) and continuous-to-cell coordinate mapping.

/// Normalize a heading in degrees to [0, 360).
///
/// # Example
/// ```
/// use vyuha_mcl::core::math::normalize_heading;
///
/// assert!((normalize_heading(370.0) - 10.0).abs() < 1e-9);
/// assert!((normalize_heading(-90.0) - 270.0).abs() < 1e-9);
/// ```
#[inline]
pub fn normalize_heading(heading: f64) -> f64 {
    heading.rem_euclid(360.0)
}

/// Convert a heading in degrees to radians.
#[inline]
pub fn heading_to_radians(heading: f64) -> f64 {
    heading.to_radians()
}

/// Map a continuous coordinate to its cell index via floor division.
///
/// Negative coordinates map to negative indices; callers decide whether
/// an index outside the grid is a rejection or a fault.
///
/// # Example
/// ```
/// use vyuha_mcl::core::math::cell_index;
///
/// assert_eq!(cell_index(250.0, 100.0), 2);
/// assert_eq!(cell_index(-0.5, 100.0), -1);
/// ```
#[inline]
pub fn cell_index(coord: f64, cell_size: f64) -> i64 {
    (coord / cell_size).floor() as i64
}

/// Offset of a continuous coordinate within its cell, in [0, cell_size).
#[inline]
pub fn cell_offset(coord: f64, cell_size: f64) -> f64 {
    coord - (cell_index(coord, cell_size) as f64) * cell_size
}
