//! Query configuration and result records.
//!
//! A discrete query is configured by [`CollisionRequest`]; a continuous
//! (time-of-contact) query by [`ContinuousCollisionRequest`], whose solver,
//! motion, and distance-oracle choices are the enumerations below. The
//! dispatcher validates the combination against the shape pair and rejects
//! mismatches without touching the caller's result.

use crate::contact::MAX_MANIFOLD_POINTS;
use crate::pose::Pose;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motion interpolation used for both objects of a continuous query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CcdMotionType {
    /// Fixed rotation, linearly interpolated translation.
    #[default]
    Translation,
    /// LERP translation with SLERP rotation.
    Linear,
    /// Screw motion: rotation about an axis line plus translation along it.
    Screw,
    /// Smooth higher-order interpolation between the endpoint poses.
    Spline,
}

/// Time-of-contact algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CcdSolverType {
    /// Uniform discrete sampling of the motion interval.
    #[default]
    Naive,
    /// Distance-driven conservative advancement.
    ConservativeAdvancement,
    /// Ray-shooting against the swept volume (translation only).
    RayShooting,
    /// Per-feature polynomial root finding (mesh/mesh, translation only).
    PolynomialSolver,
}

/// Distance oracle used by conservative advancement.
///
/// Both variants drive the same simplex solver; they select its termination
/// profile (tolerance and iteration cap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GjkSolverType {
    /// Looser tolerance, higher iteration cap.
    #[default]
    LibCcd,
    /// Tighter tolerance, lower iteration cap.
    Indep,
}

/// Configuration of a discrete narrow-phase query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionRequest {
    /// Maximum number of contact points to generate, in `[1, 8]`.
    ///
    /// Out-of-range values are clamped silently by the solver.
    pub max_contacts: usize,
    /// When false, solvers may skip manifold construction and report the
    /// boolean outcome only.
    pub enable_contacts: bool,
}

impl Default for CollisionRequest {
    fn default() -> Self {
        Self {
            max_contacts: 4,
            enable_contacts: true,
        }
    }
}

impl CollisionRequest {
    /// A request for the boolean outcome only.
    #[must_use]
    pub fn boolean() -> Self {
        Self {
            max_contacts: 1,
            enable_contacts: false,
        }
    }

    /// A request for the full manifold (up to the geometric maximum).
    #[must_use]
    pub fn full_manifold() -> Self {
        Self {
            max_contacts: MAX_MANIFOLD_POINTS,
            enable_contacts: true,
        }
    }
}

/// Configuration of a continuous-collision query.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContinuousCollisionRequest {
    /// Time-of-contact algorithm.
    pub solver_type: CcdSolverType,
    /// Motion interpolation applied to both objects.
    pub motion_type: CcdMotionType,
    /// Distance oracle for conservative advancement.
    pub gjk_solver_type: GjkSolverType,
    /// Iteration cap. Must be positive.
    pub num_max_iterations: usize,
    /// Time-of-contact tolerance. Must be positive.
    pub toc_err: f64,
}

impl Default for ContinuousCollisionRequest {
    fn default() -> Self {
        Self {
            solver_type: CcdSolverType::default(),
            motion_type: CcdMotionType::default(),
            gjk_solver_type: GjkSolverType::default(),
            num_max_iterations: 30,
            toc_err: 1e-4,
        }
    }
}

/// Outcome of a continuous-collision query.
///
/// When `is_collide` is false, `time_of_contact` is 1 and the contact
/// transforms are unspecified; callers must not read them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContinuousCollisionResult {
    /// Whether the objects touch within the motion interval.
    pub is_collide: bool,
    /// First contact time in `[0, 1]`; 1 when no contact occurs.
    pub time_of_contact: f64,
    /// Pose of object 1 at the time of contact.
    pub contact_tf1: Pose,
    /// Pose of object 2 at the time of contact.
    pub contact_tf2: Pose,
}

impl Default for ContinuousCollisionResult {
    fn default() -> Self {
        Self {
            is_collide: false,
            time_of_contact: 1.0,
            contact_tf1: Pose::identity(),
            contact_tf2: Pose::identity(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_are_positive() {
        let req = ContinuousCollisionRequest::default();
        assert!(req.num_max_iterations > 0);
        assert!(req.toc_err > 0.0);
        assert_eq!(req.solver_type, CcdSolverType::Naive);
        assert_eq!(req.motion_type, CcdMotionType::Translation);
    }

    #[test]
    fn collision_request_presets() {
        assert!(!CollisionRequest::boolean().enable_contacts);
        assert_eq!(
            CollisionRequest::full_manifold().max_contacts,
            MAX_MANIFOLD_POINTS
        );
        let def = CollisionRequest::default();
        assert!(def.max_contacts >= 1 && def.max_contacts <= MAX_MANIFOLD_POINTS);
    }

    #[test]
    fn result_default_reports_no_collision() {
        let res = ContinuousCollisionResult::default();
        assert!(!res.is_collide);
        assert_eq!(res.time_of_contact, 1.0);
    }
}
