//! Oriented bounding boxes
//!
//! An [`OrientedBoundingBox`] is a local axis-aligned extent pushed through a
//! world matrix: it keeps the 8 transformed corners for projection and the
//! 3 normalized local axes as candidate separating axes.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Mat3, Mat4, Point3, Vec3};
use crate::physics::error::GeometryError;

use super::sat::intervals_overlap;

/// Closed interval produced by projecting a box onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Smallest projected value
    pub min: f32,
    /// Largest projected value
    pub max: f32,
}

impl Projection {
    /// Intervals overlap when `max(min_a, min_b) <= min(max_a, max_b)`; touching counts
    pub fn overlaps(&self, other: &Projection) -> bool {
        intervals_overlap(self.min, self.max, other.min, other.max)
    }
}

/// How corners are mapped onto an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionMode {
    /// `dot(axis, corner)`: the standard SAT projection
    #[default]
    Signed,
    /// `length(corner * dot(axis, corner))`, always non-negative.
    ///
    /// Kept for parity with the legacy collision rules. It folds boxes on
    /// opposite sides of the origin onto the same interval, so it reports
    /// overlaps that signed projection correctly separates.
    Magnitude,
}

/// Box with 8 world-space corners and 3 world-space unit axes
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedBoundingBox {
    corners: [Vec3; 8],
    right_axis: Vec3,
    up_axis: Vec3,
    forward_axis: Vec3,
}

impl Default for OrientedBoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

impl OrientedBoundingBox {
    /// Unit box spanning `[0, 1]` on every axis, aligned with the world
    pub fn new() -> Self {
        Self {
            corners: local_corners(&Vec3::zeros(), &Vec3::new(1.0, 1.0, 1.0)),
            right_axis: Vec3::x(),
            up_axis: Vec3::y(),
            forward_axis: Vec3::z(),
        }
    }

    /// Build a box from a local extent and world matrix in one step
    pub fn from_transform(min: &Vec3, max: &Vec3, transform: &Mat4) -> Result<Self, GeometryError> {
        let mut obb = Self::new();
        obb.set_min_max(min, max, transform);
        obb.set_axes_transform(transform)?;
        Ok(obb)
    }

    /// Transform the 8 corners of the local extent `[min, max]` by `transform`.
    ///
    /// Corners are stored back-bottom-left, back-bottom-right,
    /// front-bottom-left, front-bottom-right, then the same four on top
    /// (back = min z, bottom = min y, left = min x).
    pub fn set_min_max(&mut self, min: &Vec3, max: &Vec3, transform: &Mat4) -> &[Vec3; 8] {
        let local = local_corners(min, max);
        for (corner, local) in self.corners.iter_mut().zip(local.iter()) {
            *corner = transform.transform_point(&Point3::from(*local)).coords;
        }
        &self.corners
    }

    /// Take the box axes from the upper-left 3x3 block of `transform`.
    ///
    /// Each canonical axis is mapped through the block and normalized, so
    /// scale is discarded but shear is not.
    pub fn set_axes_transform(&mut self, transform: &Mat4) -> Result<[Vec3; 3], GeometryError> {
        let linear: Mat3 = transform.fixed_view::<3, 3>(0, 0).into_owned();

        let right = utils::try_normalize(&(linear * Vec3::x()))
            .ok_or(GeometryError::DegenerateAxis { axis: "right" })?;
        let up = utils::try_normalize(&(linear * Vec3::y()))
            .ok_or(GeometryError::DegenerateAxis { axis: "up" })?;
        let forward = utils::try_normalize(&(linear * Vec3::z()))
            .ok_or(GeometryError::DegenerateAxis { axis: "forward" })?;

        self.right_axis = right;
        self.up_axis = up;
        self.forward_axis = forward;
        Ok(self.axes())
    }

    /// Right, up and forward axes in world space
    pub fn axes(&self) -> [Vec3; 3] {
        [self.right_axis, self.up_axis, self.forward_axis]
    }

    /// World-space corners
    pub fn corners(&self) -> &[Vec3; 8] {
        &self.corners
    }

    /// Mean of the 8 corners
    pub fn center(&self) -> Vec3 {
        self.corners.iter().sum::<Vec3>() / 8.0
    }

    /// Project every corner onto `axis` and return the covered interval
    pub fn project(&self, axis: &Vec3, mode: ProjectionMode) -> Projection {
        let project_corner = |corner: &Vec3| match mode {
            ProjectionMode::Signed => axis.dot(corner),
            ProjectionMode::Magnitude => (corner * axis.dot(corner)).magnitude(),
        };

        self.corners.iter().map(project_corner).fold(
            Projection {
                min: f32::INFINITY,
                max: f32::NEG_INFINITY,
            },
            |acc, p| Projection {
                min: acc.min.min(p),
                max: acc.max.max(p),
            },
        )
    }
}

fn local_corners(min: &Vec3, max: &Vec3) -> [Vec3; 8] {
    [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, max.y, max.z),
    ]
}
