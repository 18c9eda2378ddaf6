//! Core foundation layer.
//!
//! Bottom layer of the crate with no internal dependencies. All other
//! layers depend on core.
//!
//! # Contents
//!
//! - [`types`]: Core data types (poses, sensor readings)
//! - [`math`]: Mathematical primitives (heading normalization, cell mapping)
//! - [`rng`]: Seedable random source shared by the whole simulation

pub mod math;
pub mod rng;
pub mod types;
