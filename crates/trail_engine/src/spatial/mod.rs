//! Spatial partitioning data structures
//!
//! Provides the broad-phase index for tomb collision queries.

pub mod grid;

pub use grid::{SpatialGrid, DEFAULT_NEIGHBOR_RADIUS};
