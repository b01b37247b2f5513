//! Narrow-phase dispatch.
//!
//! [`collide`] selects the contact routine for a geometry pair: analytic
//! paths first (sphere/sphere, the box/box separating-axis solver), then
//! the simplex (GJK) boolean fallback for the remaining convex pairs.
//! Pairs with no entry (anything involving a triangle mesh, plane, or
//! half-space) are reported as unsupported; continuous queries reach
//! meshes through the polynomial solver instead.

pub(crate) mod polygon;

pub mod box_box;

pub use box_box::{box_box, BoxBoxResult};

use nalgebra::Vector3;
use prox_types::{
    CollisionRequest, ContactManifold, ContactPoint, Pose, ProxError, Result,
};

use crate::gjk::{self, GjkOptions};
use crate::shape::CollisionGeometry;

/// Minimum norm threshold for geometric operations.
///
/// Small enough not to reject valid configurations, large enough to stay
/// clear of `f64::EPSILON` noise when normalizing near-degenerate vectors.
pub const GEOM_EPSILON: f64 = 1e-10;

/// Outcome of a discrete narrow-phase query.
#[derive(Debug, Clone, Default)]
pub struct CollisionOutcome {
    /// Whether the geometries overlap.
    pub is_collide: bool,
    /// Contact points, when requested and available for the pair.
    pub contacts: ContactManifold,
}

/// Discrete narrow-phase collision between two posed geometries.
///
/// # Errors
///
/// Returns [`ProxError::UnsupportedPair`] when the pair has no dispatch
/// entry (triangle meshes, planes, half-spaces).
pub fn collide(
    geom1: &CollisionGeometry,
    tf1: &Pose,
    geom2: &CollisionGeometry,
    tf2: &Pose,
    request: &CollisionRequest,
) -> Result<CollisionOutcome> {
    if !geom1.is_convex_solid() || !geom2.is_convex_solid() {
        return Err(ProxError::unsupported_pair(
            geom1.kind_name(),
            geom2.kind_name(),
        ));
    }
    Ok(collide_convex(geom1, tf1, geom2, tf2, request))
}

/// Dispatch for convex pairs; callers have already validated support.
pub(crate) fn collide_convex(
    geom1: &CollisionGeometry,
    tf1: &Pose,
    geom2: &CollisionGeometry,
    tf2: &Pose,
    request: &CollisionRequest,
) -> CollisionOutcome {
    use CollisionGeometry::{Box, Sphere};

    match (geom1, geom2) {
        // Analytic sphere-sphere (cheaper and more robust than the simplex path)
        (Sphere { radius: r1 }, Sphere { radius: r2 }) => {
            collide_sphere_sphere(*r1, tf1, *r2, tf2, request)
        }

        // Box-box separating-axis solver with manifold generation
        (
            Box {
                half_extents: he1, ..
            },
            Box {
                half_extents: he2, ..
            },
        ) => {
            let result = box_box(&(he1 * 2.0), tf1, &(he2 * 2.0), tf2, request.max_contacts);
            let contacts = if request.enable_contacts {
                result.contacts
            } else {
                ContactManifold::new()
            };
            CollisionOutcome {
                is_collide: result.code != 0,
                contacts,
            }
        }

        // Remaining convex pairs: boolean simplex query
        _ => {
            let is_collide =
                gjk::intersect(geom1, tf1, geom2, tf2, &GjkOptions::default());
            CollisionOutcome {
                is_collide,
                contacts: ContactManifold::new(),
            }
        }
    }
}

/// Sphere-sphere contact.
fn collide_sphere_sphere(
    r1: f64,
    tf1: &Pose,
    r2: f64,
    tf2: &Pose,
    request: &CollisionRequest,
) -> CollisionOutcome {
    let diff = tf2.position - tf1.position;
    let dist = diff.norm();
    let depth = r1 + r2 - dist;
    if depth < 0.0 {
        return CollisionOutcome::default();
    }

    let mut contacts = ContactManifold::new();
    if request.enable_contacts {
        let normal = if dist > GEOM_EPSILON {
            diff / dist
        } else {
            // Concentric spheres: any direction separates them equally
            Vector3::x()
        };
        // On the incident (body 2) surface
        let position = tf2.position.coords - normal * r2;
        contacts.push(ContactPoint::new(normal, position, depth));
    }

    CollisionOutcome {
        is_collide: true,
        contacts,
    }
}
