//! # View Frustum Culling
//!
//! A perspective view volume described by six planes whose normals point
//! inward, so a point is inside when its signed distance to every plane is
//! non-negative.
//!
//! The frustum is rebuilt from two inputs: the projection parameters
//! ([`Frustum::update_perspective`]) and the camera pose
//! ([`Frustum::update_camera`]). Until both have been supplied the planes are
//! unset and nothing is culled.
//!
//! ## Camera Basis
//!
//! ```text
//! Z = normalize(eye - center)    points backwards, out of the screen
//! X = normalize(up x Z)          right
//! Y = Z x X                      true up
//! ```
//!
//! The near and far rectangles are centred on `eye - Z * near` and
//! `eye - Z * far` with half-extents `distance * tan(fov / 2)` vertically and
//! that times the aspect ratio horizontally.

use log::{trace, warn};

use crate::foundation::math::{utils, Vec3};
use crate::physics::collision::OrientedBoundingBox;
use crate::physics::error::GeometryError;

/// Plane in Hessian normal form: `distance(p) = d + dot(normal, p)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal
    pub normal: Vec3,
    /// Offset along the normal
    pub d: f32,
}

impl Plane {
    /// Plane through three ordered points.
    ///
    /// The normal is `normalize(normalize(c - b) x normalize(a - b))`, so the
    /// winding of `a, b, c` picks the positive side.
    pub fn from_points(a: &Vec3, b: &Vec3, c: &Vec3) -> Result<Self, GeometryError> {
        if !(utils::is_finite(a) && utils::is_finite(b) && utils::is_finite(c)) {
            return Err(GeometryError::NonFiniteInput);
        }
        let to_c = utils::try_normalize(&(c - b)).ok_or(GeometryError::DegeneratePlane)?;
        let to_a = utils::try_normalize(&(a - b)).ok_or(GeometryError::DegeneratePlane)?;
        let normal = utils::try_normalize(&to_c.cross(&to_a)).ok_or(GeometryError::DegeneratePlane)?;

        Ok(Self {
            normal,
            d: -normal.dot(b),
        })
    }

    /// Signed distance; positive on the side the normal points toward
    pub fn distance(&self, point: &Vec3) -> f32 {
        self.d + self.normal.dot(point)
    }
}

/// The six frustum planes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrustumPlane {
    /// Top
    Top,
    /// Bottom
    Bottom,
    /// Left
    Left,
    /// Right
    Right,
    /// Near clip plane
    Near,
    /// Far clip plane
    Far,
}

impl FrustumPlane {
    /// All planes in storage order
    pub const ALL: [FrustumPlane; 6] = [
        FrustumPlane::Top,
        FrustumPlane::Bottom,
        FrustumPlane::Left,
        FrustumPlane::Right,
        FrustumPlane::Near,
        FrustumPlane::Far,
    ];

    fn index(self) -> usize {
        match self {
            FrustumPlane::Top => 0,
            FrustumPlane::Bottom => 1,
            FrustumPlane::Left => 2,
            FrustumPlane::Right => 3,
            FrustumPlane::Near => 4,
            FrustumPlane::Far => 5,
        }
    }
}

/// Three-way result of testing a box against the frustum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// Every corner is inside every plane
    Inside,
    /// Not provably outside, but some corner is outside some plane
    Intersecting,
    /// Every corner is outside at least one plane
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Perspective {
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    near_half_height: f32,
    near_half_width: f32,
    far_half_height: f32,
    far_half_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CameraPose {
    eye: Vec3,
    center: Vec3,
    up: Vec3,
}

impl CameraPose {
    /// Right, true-up and backward unit axes
    fn basis(&self) -> Result<(Vec3, Vec3, Vec3), GeometryError> {
        let z = utils::try_normalize(&(self.eye - self.center))
            .ok_or(GeometryError::DegenerateCamera("eye coincides with center"))?;
        let x = utils::try_normalize(&self.up.cross(&z))
            .ok_or(GeometryError::DegenerateCamera("up is parallel to the view direction"))?;
        Ok((x, z.cross(&x), z))
    }
}

/// Perspective view frustum
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frustum {
    perspective: Option<Perspective>,
    pose: Option<CameraPose>,
    planes: Option<[Plane; 6]>,
    near_center: Vec3,
    far_center: Vec3,
}

impl Frustum {
    /// Frustum with no projection or pose; culls nothing until both are set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the projection parameters (`fov` is the vertical angle in radians).
    ///
    /// Rebuilds the planes when a camera pose is already known.
    pub fn update_perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) -> Result<(), GeometryError> {
        if ![fov, aspect, near, far].iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NonFiniteInput);
        }
        if !(fov > 0.0 && fov < std::f32::consts::PI) {
            return Err(GeometryError::InvalidPerspective("field of view must lie in (0, pi)"));
        }
        if aspect <= 0.0 {
            return Err(GeometryError::InvalidPerspective("aspect ratio must be positive"));
        }
        if near <= 0.0 || far <= near {
            return Err(GeometryError::InvalidPerspective("clip distances must satisfy 0 < near < far"));
        }

        let tan_half_fov = (fov * 0.5).tan();
        let near_half_height = near * tan_half_fov;
        let far_half_height = far * tan_half_fov;
        let perspective = Perspective {
            fov,
            aspect,
            near,
            far,
            near_half_height,
            near_half_width: near_half_height * aspect,
            far_half_height,
            far_half_width: far_half_height * aspect,
        };

        if let Some(pose) = self.pose {
            self.apply(&perspective, &pose)?;
        }
        self.perspective = Some(perspective);
        Ok(())
    }

    /// Set the camera pose and rebuild the planes.
    ///
    /// Fails when `eye == center`, `up` is parallel to the view direction, or
    /// any input is non-finite, whether or not a projection has been set yet.
    /// On failure the previous pose and planes are kept.
    pub fn update_camera(&mut self, eye: Vec3, center: Vec3, up: Vec3) -> Result<(), GeometryError> {
        if !(utils::is_finite(&eye) && utils::is_finite(&center) && utils::is_finite(&up)) {
            return Err(GeometryError::NonFiniteInput);
        }
        let pose = CameraPose { eye, center, up };
        pose.basis()?;

        if let Some(perspective) = self.perspective {
            self.apply(&perspective, &pose)?;
        }
        self.pose = Some(pose);
        Ok(())
    }

    fn apply(&mut self, p: &Perspective, pose: &CameraPose) -> Result<(), GeometryError> {
        let (x, y, z) = pose.basis()?;

        let near_center = pose.eye - z * p.near;
        let far_center = pose.eye - z * p.far;

        let (nh, nw) = (y * p.near_half_height, x * p.near_half_width);
        let (fh, fw) = (y * p.far_half_height, x * p.far_half_width);

        let ntl = near_center + nh - nw;
        let ntr = near_center + nh + nw;
        let nbl = near_center - nh - nw;
        let nbr = near_center - nh + nw;

        let ftl = far_center + fh - fw;
        let ftr = far_center + fh + fw;
        let fbl = far_center - fh - fw;
        let fbr = far_center - fh + fw;

        let planes = [
            Plane::from_points(&ntr, &ntl, &ftl),
            Plane::from_points(&nbl, &nbr, &fbr),
            Plane::from_points(&ntl, &nbl, &fbl),
            Plane::from_points(&nbr, &ntr, &fbr),
            Plane::from_points(&ntl, &ntr, &nbr),
            Plane::from_points(&ftr, &ftl, &fbl),
        ];
        let mut built = [Plane { normal: Vec3::zeros(), d: 0.0 }; 6];
        for (slot, plane) in built.iter_mut().zip(planes) {
            *slot = plane.inspect_err(|e| warn!("Frustum rebuild failed: {e}"))?;
        }

        self.planes = Some(built);
        self.near_center = near_center;
        self.far_center = far_center;
        trace!(
            "Frustum rebuilt: eye {:?} -> center {:?}, fov {:.3}, aspect {:.3}",
            pose.eye, pose.center, p.fov, p.aspect
        );
        Ok(())
    }

    /// True once both the projection and a camera pose have been applied
    pub fn is_ready(&self) -> bool {
        self.planes.is_some()
    }

    /// One of the six planes, `None` until the frustum is ready
    pub fn plane(&self, which: FrustumPlane) -> Option<&Plane> {
        self.planes.as_ref().map(|planes| &planes[which.index()])
    }

    /// Centre of the near rectangle
    pub fn near_center(&self) -> Vec3 {
        self.near_center
    }

    /// Centre of the far rectangle
    pub fn far_center(&self) -> Vec3 {
        self.far_center
    }

    /// True when `point` is on the inner side of every plane (or the frustum is not ready)
    pub fn is_point_in_frustum(&self, point: &Vec3) -> bool {
        match &self.planes {
            Some(planes) => planes.iter().all(|plane| plane.distance(point) >= 0.0),
            None => true,
        }
    }

    /// Classify the 8 corners of `obb` against every plane.
    ///
    /// A box is outside as soon as one plane has all corners behind it. The
    /// corner scan for a plane stops once it has seen both an inside and an
    /// outside corner.
    pub fn classify_box(&self, obb: &OrientedBoundingBox) -> Containment {
        let Some(planes) = &self.planes else {
            return Containment::Inside;
        };

        let mut result = Containment::Inside;
        for plane in planes {
            let (mut inside, mut outside) = (0u32, 0u32);
            for corner in obb.corners() {
                if plane.distance(corner) < 0.0 {
                    outside += 1;
                } else {
                    inside += 1;
                }
                if inside > 0 && outside > 0 {
                    break;
                }
            }

            if inside == 0 {
                return Containment::Outside;
            }
            if outside > 0 {
                result = Containment::Intersecting;
            }
        }
        result
    }

    /// Conservative visibility test: false only when the box is provably outside.
    ///
    /// Boxes straddling several planes near a frustum corner may be reported
    /// visible.
    pub fn is_box_in_frustum(&self, obb: &OrientedBoundingBox) -> bool {
        self.classify_box(obb) != Containment::Outside
    }
}
