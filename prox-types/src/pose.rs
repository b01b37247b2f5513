//! Rigid transforms.
//!
//! A [`Pose`] is the configuration of a rigid body in 3D space: a position
//! and a unit-quaternion orientation. The rotation is orthonormal and
//! right-handed by construction; solvers never re-validate it.

use nalgebra::{Isometry3, Matrix3, Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position and orientation of a rigid body.
///
/// # Example
///
/// ```
/// use prox_types::Pose;
/// use nalgebra::{Point3, Vector3};
///
/// let pose = Pose::from_position(Point3::new(1.0, 2.0, 3.0));
/// let world = pose.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert_eq!(world, Point3::new(2.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Position in world coordinates.
    pub position: Point3<f64>,
    /// Orientation as a unit quaternion.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Create an identity pose (origin, no rotation).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position only (identity rotation).
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position and rotation.
    #[must_use]
    pub const fn from_position_rotation(
        position: Point3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self { position, rotation }
    }

    /// Create a pose from an isometry.
    #[must_use]
    pub fn from_isometry(iso: Isometry3<f64>) -> Self {
        Self {
            position: Point3::from(iso.translation.vector),
            rotation: iso.rotation,
        }
    }

    /// Convert to an isometry.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(self.position.coords.into(), self.rotation)
    }

    /// The rotation as a 3x3 matrix.
    ///
    /// Column `i` is the world-space direction of the body's local axis `i`;
    /// the separating-axis solver consumes the columns directly.
    #[must_use]
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.rotation.to_rotation_matrix().into_inner()
    }

    /// The translation as a vector.
    #[must_use]
    pub fn translation(&self) -> Vector3<f64> {
        self.position.coords
    }

    /// Transform a point from local to world coordinates.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * local.coords
    }

    /// Transform a vector from local to world coordinates (rotation only).
    #[must_use]
    pub fn transform_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local
    }

    /// Transform a point from world to local coordinates.
    #[must_use]
    pub fn inverse_transform_point(&self, world: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.inverse() * (world - self.position))
    }

    /// Transform a vector from world to local coordinates.
    #[must_use]
    pub fn inverse_transform_vector(&self, world: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.inverse() * world
    }

    /// Compute the inverse pose.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            position: Point3::from(-(inv_rotation * self.position.coords)),
            rotation: inv_rotation,
        }
    }

    /// Compose two poses: `self * other`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            position: self.transform_point(&other.position),
            rotation: self.rotation * other.rotation,
        }
    }

    /// Linear interpolation between two poses.
    ///
    /// Uses SLERP for rotation interpolation.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            position: Point3::from(self.position.coords.lerp(&other.position.coords, t)),
            rotation: self.rotation.slerp(&other.rotation, t),
        }
    }

    /// Check if the pose contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.rotation.coords.iter().all(|x| x.is_finite())
    }
}
