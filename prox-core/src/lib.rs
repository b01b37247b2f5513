//! Narrow-phase contact and continuous-collision engine for rigid 3D
//! bodies.
//!
//! Given two geometric objects, each with a pose, this crate answers:
//!
//! - do they overlap, and with what contact manifold
//!   ([`collide`](narrow::collide), [`box_box`](narrow::box_box))
//! - how far apart are they, and where are the nearest points
//!   ([`gjk::distance`])
//! - under a parameterized motion over the unit time interval, when do
//!   they first touch ([`continuous_collide`](ccd::continuous_collide))
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Continuous-collision dispatcher                 │
//! │  Selects: motion model, TOC algorithm, narrow-phase routine │
//! └───────────┬──────────────────┬──────────────────┬───────────┘
//!             │                  │                  │
//!             ▼                  ▼                  ▼
//! ┌──────────────────┐ ┌─────────────────┐ ┌─────────────────────┐
//! │   Narrow phase   │ │ Distance oracle │ │  Polynomial solver  │
//! │ box/box SAT with │ │  (GJK simplex)  │ │ swept-mesh BVH +    │
//! │ manifold, sphere │ │                 │ │ coplanarity cubics  │
//! │ pair, GJK bool   │ │                 │ │                     │
//! └──────────────────┘ └─────────────────┘ └─────────────────────┘
//! ```
//!
//! The box/box separating-axis solver is the centerpiece: fifteen axis
//! tests with face-biased tie-breaking, reference/incident face selection,
//! Sutherland-Hodgman clipping, depth back-projection, and fair-point
//! culling down to the caller's contact budget.
//!
//! # Concurrency
//!
//! Every query is synchronous and reentrant; geometries are read-only
//! across a query and safe to share between threads. [`motion::Motion`]
//! values carry per-query mutable state and must not be shared across
//! concurrent queries. Outputs are deterministic functions of the inputs.
//!
//! # Quick Start
//!
//! ```
//! use prox_core::shape::CollisionGeometry;
//! use prox_core::narrow::collide;
//! use prox_types::{CollisionRequest, Pose};
//! use nalgebra::{Point3, Vector3};
//!
//! let a = CollisionGeometry::box_shape(Vector3::repeat(0.5));
//! let b = CollisionGeometry::box_shape(Vector3::repeat(0.5));
//! let tf_a = Pose::identity();
//! let tf_b = Pose::from_position(Point3::new(0.9, 0.0, 0.0));
//!
//! let outcome = collide(&a, &tf_a, &b, &tf_b, &CollisionRequest::default())?;
//! assert!(outcome.is_collide);
//! assert_eq!(outcome.contacts.len(), 4);
//! # Ok::<(), prox_types::ProxError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/prox-core/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
)]

pub mod ccd;
pub mod gjk;
pub mod mesh;
pub mod mid_phase;
pub mod motion;
pub mod narrow;
pub mod shape;

pub use ccd::{continuous_collide, INVALID_TOC};
pub use gjk::{DistanceResult, GjkOptions};
pub use mesh::{Triangle, TriangleMeshData};
pub use motion::Motion;
pub use narrow::{box_box, collide, BoxBoxResult, CollisionOutcome};
pub use shape::{Aabb, CollisionGeometry};

// Re-export the data crate for convenience
pub use prox_types::{
    CcdMotionType, CcdSolverType, CollisionRequest, ContactManifold, ContactPoint,
    ContinuousCollisionRequest, ContinuousCollisionResult, GjkSolverType, Pose, ProxError,
    Result, MAX_MANIFOLD_POINTS,
};
