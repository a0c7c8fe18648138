//! Geometry errors
//!
//! Degenerate inputs are rejected up front instead of letting NaN directions
//! leak into distance and projection math.

use thiserror::Error;

/// Degenerate or non-finite geometric input
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// A transform maps one of the canonical axes to a zero-length vector
    #[error("transform collapses the {axis} axis to zero length")]
    DegenerateAxis {
        /// Which local axis collapsed ("right", "up" or "forward")
        axis: &'static str,
    },

    /// Three plane points are coincident or collinear
    #[error("plane points are coincident or collinear")]
    DegeneratePlane,

    /// Camera eye equals its target, or the up vector is parallel to the view direction
    #[error("camera basis is degenerate: {0}")]
    DegenerateCamera(&'static str),

    /// Perspective parameters cannot describe a frustum
    #[error("invalid perspective: {0}")]
    InvalidPerspective(&'static str),

    /// An input vector or matrix contains NaN or infinity
    #[error("non-finite geometric input")]
    NonFiniteInput,
}
