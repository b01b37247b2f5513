//! Contact records produced by the narrow phase.

use nalgebra::Vector3;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The geometric maximum number of points in a single contact manifold.
///
/// The box/box clipping path can produce at most 8 penetrating vertices, and
/// every other solver emits fewer; manifolds therefore never heap-allocate.
pub const MAX_MANIFOLD_POINTS: usize = 8;

/// A single contact point between two bodies.
///
/// Invariants at the solver boundary:
///
/// - `normal` has unit length and points out of body 1 into body 2
/// - `depth >= 0` (penetration distance along `normal`)
/// - `position` lies on the incident body's surface, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactPoint {
    /// Contact normal (unit vector, body 1 toward body 2).
    pub normal: Vector3<f64>,
    /// Contact position in world coordinates.
    pub position: Vector3<f64>,
    /// Penetration depth along the normal.
    pub depth: f64,
}

/// An ordered contact manifold, at most [`MAX_MANIFOLD_POINTS`] long.
///
/// Empty iff the bodies are separated. When the solver culled the clip
/// output, the deepest contact is at index 0; otherwise points appear in
/// clip order.
pub type ContactManifold = SmallVec<[ContactPoint; MAX_MANIFOLD_POINTS]>;

impl ContactPoint {
    /// Create a new contact point.
    #[must_use]
    pub const fn new(normal: Vector3<f64>, position: Vector3<f64>, depth: f64) -> Self {
        Self {
            normal,
            position,
            depth,
        }
    }

    /// Component-wise approximate equality under a caller-chosen tolerance.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.normal - other.normal).abs().max() <= tolerance
            && (self.position - other.position).abs().max() <= tolerance
            && (self.depth - other.depth).abs() <= tolerance
    }

    /// The same contact seen from the other body: negated normal.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            position: self.position,
            depth: self.depth,
        }
    }

    /// Check that all components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.normal.iter().all(|x| x.is_finite())
            && self.position.iter().all(|x| x.is_finite())
            && self.depth.is_finite()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn approx_eq_respects_tolerance() {
        let a = ContactPoint::new(Vector3::x(), Vector3::new(1.0, 2.0, 3.0), 0.5);
        let mut b = a;
        b.position.x += 1e-9;

        assert!(a.approx_eq(&b, 1e-8));
        assert!(!a.approx_eq(&b, 1e-10));
    }

    #[test]
    fn flipped_negates_only_the_normal() {
        let a = ContactPoint::new(Vector3::z(), Vector3::new(0.0, 1.0, 0.0), 0.25);
        let f = a.flipped();

        assert_eq!(f.normal, -Vector3::z());
        assert_eq!(f.position, a.position);
        assert_eq!(f.depth, a.depth);
    }

    #[test]
    fn manifold_stays_on_the_stack() {
        let mut manifold = ContactManifold::new();
        for i in 0..MAX_MANIFOLD_POINTS {
            manifold.push(ContactPoint::new(
                Vector3::x(),
                Vector3::new(i as f64, 0.0, 0.0),
                0.1,
            ));
        }
        assert_eq!(manifold.len(), MAX_MANIFOLD_POINTS);
        assert!(!manifold.spilled());
    }
}
