//! Continuous-collision dispatch.
//!
//! [`continuous_collide`] answers: given two geometries, each moving over
//! the unit time interval between a begin and an end pose, at what fraction
//! of the interval do they first touch? The request selects the motion
//! interpolation and the time-of-contact algorithm; the dispatcher
//! validates the combination against the shape pair, runs the solver, and
//! writes the contact-time poses back into the result.
//!
//! Invalid combinations are rejected with a warning and the
//! [`INVALID_TOC`] sentinel, leaving the caller's result untouched.

mod polynomial;

use prox_types::{
    CcdMotionType, CcdSolverType, CollisionRequest, ContinuousCollisionRequest,
    ContinuousCollisionResult, Pose, ProxError, Result,
};

use crate::gjk::{self, GjkOptions};
use crate::motion::Motion;
use crate::narrow;
use crate::shape::CollisionGeometry;

/// Sentinel returned for invalid or unsupported request configurations.
pub const INVALID_TOC: f64 = -1.0;

/// Continuous collision between two moving geometries.
///
/// Returns the time of contact in `[0, 1]` (1 when the objects never
/// touch), or [`INVALID_TOC`] when the request configuration is invalid
/// for the shape pair; `result` is then left untouched.
pub fn continuous_collide(
    geom1: &CollisionGeometry,
    tf1_beg: &Pose,
    tf1_end: &Pose,
    geom2: &CollisionGeometry,
    tf2_beg: &Pose,
    tf2_end: &Pose,
    request: &ContinuousCollisionRequest,
    result: &mut ContinuousCollisionResult,
) -> f64 {
    if let Err(err) = validate_request(geom1, geom2, request) {
        tracing::warn!("continuous collision rejected: {err}");
        return INVALID_TOC;
    }

    let mut motion1 = Motion::new(tf1_beg, tf1_end, request.motion_type);
    let mut motion2 = Motion::new(tf2_beg, tf2_end, request.motion_type);

    match request.solver_type {
        CcdSolverType::Naive => {
            collide_naive(geom1, &mut motion1, geom2, &mut motion2, request, result)
        }
        CcdSolverType::ConservativeAdvancement => collide_conservative_advancement(
            geom1,
            &mut motion1,
            geom2,
            &mut motion2,
            request,
            result,
        ),
        CcdSolverType::PolynomialSolver => {
            collide_polynomial(geom1, &mut motion1, geom2, &mut motion2, result)
        }
        CcdSolverType::RayShooting => {
            // The validity matrix admits this configuration, but no
            // ray-shooting solver ships; report it as unsupported.
            tracing::warn!("ray-shooting continuous collision is not implemented");
            INVALID_TOC
        }
    }
}

/// Check the solver/motion/geometry validity matrix.
fn validate_request(
    geom1: &CollisionGeometry,
    geom2: &CollisionGeometry,
    request: &ContinuousCollisionRequest,
) -> Result<()> {
    if request.num_max_iterations == 0 {
        return Err(ProxError::invalid_request("iteration cap must be positive"));
    }
    if !request.toc_err.is_finite() || request.toc_err <= 0.0 {
        return Err(ProxError::invalid_request(
            "time-of-contact tolerance must be positive",
        ));
    }

    match request.solver_type {
        // Discrete sampling and conservative advancement run on every pair
        // the narrow phase / distance oracle supports.
        CcdSolverType::Naive | CcdSolverType::ConservativeAdvancement => {
            if !geom1.is_convex_solid() || !geom2.is_convex_solid() {
                return Err(ProxError::unsupported_pair(
                    geom1.kind_name(),
                    geom2.kind_name(),
                ));
            }
        }
        CcdSolverType::RayShooting => {
            if request.motion_type != CcdMotionType::Translation {
                return Err(ProxError::invalid_request(
                    "ray-shooting requires translation motion",
                ));
            }
            if !geom1.is_convex_solid() || !geom2.is_convex_solid() {
                return Err(ProxError::invalid_request(
                    "ray-shooting requires primitive geometries",
                ));
            }
        }
        CcdSolverType::PolynomialSolver => {
            if request.motion_type != CcdMotionType::Translation {
                return Err(ProxError::invalid_request(
                    "polynomial solver requires translation motion",
                ));
            }
            let meshes = matches!(geom1, CollisionGeometry::TriangleMesh { .. })
                && matches!(geom2, CollisionGeometry::TriangleMesh { .. });
            if !meshes {
                return Err(ProxError::invalid_request(
                    "polynomial solver requires triangle meshes on both sides",
                ));
            }
        }
    }

    Ok(())
}

/// Integrate both motions to the contact time and record the poses.
fn write_contact_poses(
    motion1: &mut Motion,
    motion2: &mut Motion,
    toc: f64,
    result: &mut ContinuousCollisionResult,
) {
    motion1.integrate(toc);
    motion2.integrate(toc);
    result.contact_tf1 = motion1.current_transform();
    result.contact_tf2 = motion2.current_transform();
}

/// Discrete sampling: test uniformly spaced times and stop at the first
/// overlapping sample.
///
/// The reported time is the first overlapping sample, not an interpolated
/// root; its granularity is the sample spacing, so results are quantized
/// compared to the advancing solvers.
fn collide_naive(
    geom1: &CollisionGeometry,
    motion1: &mut Motion,
    geom2: &CollisionGeometry,
    motion2: &mut Motion,
    request: &ContinuousCollisionRequest,
    result: &mut ContinuousCollisionResult,
) -> f64 {
    // ceil(1/toc_err) samples resolve the interval to the requested
    // tolerance; the iteration cap bounds the work. At least two samples
    // keep the spacing formula finite.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n_samples = request
        .num_max_iterations
        .min((1.0 / request.toc_err).ceil() as usize)
        .max(2);

    let boolean = CollisionRequest::boolean();
    for i in 0..n_samples {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 / (n_samples - 1) as f64;
        motion1.integrate(t);
        motion2.integrate(t);
        let tf1 = motion1.current_transform();
        let tf2 = motion2.current_transform();

        if narrow::collide_convex(geom1, &tf1, geom2, &tf2, &boolean).is_collide {
            result.is_collide = true;
            result.time_of_contact = t;
            result.contact_tf1 = tf1;
            result.contact_tf2 = tf2;
            return t;
        }
    }

    result.is_collide = false;
    result.time_of_contact = 1.0;
    result.time_of_contact
}

/// Conservative advancement: repeatedly advance time by the ratio of the
/// current separation to the bound on the relative motion.
///
/// The bound caps how fast any pair of body points can approach, so no
/// first contact can be stepped over; iteration stops when the separation
/// drops below the tolerance or the caps run out.
fn collide_conservative_advancement(
    geom1: &CollisionGeometry,
    motion1: &mut Motion,
    geom2: &CollisionGeometry,
    motion2: &mut Motion,
    request: &ContinuousCollisionRequest,
    result: &mut ContinuousCollisionResult,
) -> f64 {
    let options = GjkOptions::from(request.gjk_solver_type);
    let bound = motion1.bound_on_motion(geom1.bounding_radius())
        + motion2.bound_on_motion(geom2.bounding_radius());

    let mut t = 0.0;
    for _ in 0..request.num_max_iterations {
        motion1.integrate(t);
        motion2.integrate(t);
        let tf1 = motion1.current_transform();
        let tf2 = motion2.current_transform();

        let separation = gjk::distance(geom1, &tf1, geom2, &tf2, &options);
        if separation.intersecting || separation.distance < request.toc_err {
            result.is_collide = true;
            result.time_of_contact = t;
            write_contact_poses(motion1, motion2, t, result);
            return t;
        }

        if bound <= f64::EPSILON {
            break; // No relative motion: the gap can never close
        }
        t += separation.distance / bound;
        if t >= 1.0 {
            break;
        }
    }

    result.is_collide = false;
    result.time_of_contact = 1.0;
    result.time_of_contact
}

/// Polynomial-roots solver for translating triangle meshes.
fn collide_polynomial(
    geom1: &CollisionGeometry,
    motion1: &mut Motion,
    geom2: &CollisionGeometry,
    motion2: &mut Motion,
    result: &mut ContinuousCollisionResult,
) -> f64 {
    let (
        CollisionGeometry::TriangleMesh { data: mesh1 },
        CollisionGeometry::TriangleMesh { data: mesh2 },
    ) = (geom1, geom2)
    else {
        return INVALID_TOC; // Excluded by validation
    };
    let (Some(vel1), Some(vel2)) = (motion1.velocity(), motion2.velocity()) else {
        return INVALID_TOC; // Excluded by validation
    };

    motion1.integrate(0.0);
    motion2.integrate(0.0);
    let tf1 = motion1.current_transform();
    let tf2 = motion2.current_transform();

    match polynomial::earliest_mesh_contact(mesh1, &tf1, &vel1, mesh2, &tf2, &vel2) {
        Some(toc) => {
            result.is_collide = true;
            result.time_of_contact = toc;
            write_contact_poses(motion1, motion2, toc, result);
            toc
        }
        None => {
            result.is_collide = false;
            result.time_of_contact = 1.0;
            result.time_of_contact
        }
    }
}
