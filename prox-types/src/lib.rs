//! Core types for collision and proximity queries.
//!
//! This crate provides the foundational types for the Proxima engine:
//!
//! - [`Pose`] - Rigid transform (position + orientation) of a body
//! - [`ContactPoint`] - A single narrow-phase contact (normal, position, depth)
//! - [`ContinuousCollisionRequest`] / [`ContinuousCollisionResult`] -
//!   Configuration and outcome of a time-of-contact query
//! - [`ProxError`] - Failure kinds surfaced at the query boundary
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They have no algorithms, no dispatch, no
//! shape knowledge. They're the common language between:
//!
//! - The narrow-phase solvers and the continuous-collision dispatcher
//!   (`prox-core`)
//! - Physics engines consuming contact manifolds
//! - Logging and replay (serialized query trajectories)
//!
//! # Coordinate System
//!
//! Right-handed, world coordinates unless a doc comment says otherwise.
//! Contact normals point out of the first body into the second.
//!
//! # Example
//!
//! ```
//! use prox_types::{ContactPoint, Pose};
//! use nalgebra::{Point3, Vector3};
//!
//! let pose = Pose::from_position(Point3::new(0.0, 0.0, 1.0));
//! let contact = ContactPoint::new(Vector3::x(), Vector3::new(0.5, 0.0, 0.0), 0.1);
//!
//! assert_eq!(pose.position.z, 1.0);
//! assert!(contact.depth >= 0.0);
//! ```

#![doc(html_root_url = "https://docs.rs/prox-types/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
)]

mod contact;
mod error;
mod pose;
mod request;

pub use contact::{ContactManifold, ContactPoint, MAX_MANIFOLD_POINTS};
pub use error::ProxError;
pub use pose::Pose;
pub use request::{
    CcdMotionType, CcdSolverType, CollisionRequest, ContinuousCollisionRequest,
    ContinuousCollisionResult, GjkSolverType,
};

// Re-export math types for convenience
pub use nalgebra::{Isometry3, Matrix3, Point3, UnitQuaternion, Vector3};

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, ProxError>;
