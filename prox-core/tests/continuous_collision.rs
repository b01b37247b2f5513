//! End-to-end continuous-collision scenarios across the solver matrix.

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use prox_core::{
    continuous_collide, CcdMotionType, CcdSolverType, CollisionGeometry,
    ContinuousCollisionRequest, ContinuousCollisionResult, TriangleMeshData, INVALID_TOC,
};
use prox_types::Pose;
use std::sync::Arc;

fn at(x: f64, y: f64, z: f64) -> Pose {
    Pose::from_position(Point3::new(x, y, z))
}

fn unit_box() -> CollisionGeometry {
    CollisionGeometry::box_shape(Vector3::repeat(0.5))
}

fn square_mesh(x: f64) -> CollisionGeometry {
    // Two triangles forming a unit square in a plane of constant x
    CollisionGeometry::triangle_mesh(Arc::new(TriangleMeshData::new(
        vec![
            Point3::new(x, -1.0, -1.0),
            Point3::new(x, 1.0, -1.0),
            Point3::new(x, 1.0, 1.0),
            Point3::new(x, -1.0, 1.0),
        ],
        vec![0, 1, 2, 0, 2, 3],
    )))
}

#[test]
fn naive_sweep_hits_a_static_box() {
    let request = ContinuousCollisionRequest {
        num_max_iterations: 101,
        toc_err: 0.01,
        ..ContinuousCollisionRequest::default()
    };
    let mut result = ContinuousCollisionResult::default();

    let toc = continuous_collide(
        &unit_box(),
        &at(-2.0, 0.0, 0.0),
        &at(2.0, 0.0, 0.0),
        &unit_box(),
        &at(0.0, 0.0, 0.0),
        &at(0.0, 0.0, 0.0),
        &request,
        &mut result,
    );

    assert!(result.is_collide);
    // Faces meet when the centers are 1.0 apart, at t = 0.25; the sampler
    // reports the first of its 100 grid points at or past that time.
    assert_relative_eq!(toc, 25.0 / 99.0, epsilon = 1e-12);
    // The sampler's answer is within one grid step of the exact time
    assert!((toc - 0.25).abs() <= 0.01 + 1e-12);
}

#[test]
fn naive_sweep_misses_an_offset_box() {
    let request = ContinuousCollisionRequest {
        num_max_iterations: 101,
        toc_err: 0.01,
        ..ContinuousCollisionRequest::default()
    };
    let mut result = ContinuousCollisionResult::default();

    let toc = continuous_collide(
        &unit_box(),
        &at(-2.0, 0.0, 0.0),
        &at(2.0, 0.0, 0.0),
        &unit_box(),
        &at(0.0, 3.0, 0.0),
        &at(0.0, 3.0, 0.0),
        &request,
        &mut result,
    );

    assert!(!result.is_collide);
    assert_relative_eq!(toc, 1.0, epsilon = 1e-12);
    assert_relative_eq!(result.time_of_contact, 1.0, epsilon = 1e-12);
}

#[test]
fn naive_overlap_at_a_sample_is_a_true_overlap() {
    // Soundness: when the sampler reports contact at t*, the discrete test
    // at t* must agree.
    use prox_core::{collide, CollisionRequest};

    let request = ContinuousCollisionRequest {
        num_max_iterations: 64,
        toc_err: 0.02,
        ..ContinuousCollisionRequest::default()
    };
    let mut result = ContinuousCollisionResult::default();

    let toc = continuous_collide(
        &unit_box(),
        &at(-2.0, 0.1, 0.0),
        &at(2.0, 0.1, 0.0),
        &unit_box(),
        &at(0.0, 0.0, 0.0),
        &at(0.0, 0.0, 0.0),
        &request,
        &mut result,
    );

    assert!(result.is_collide);
    let check = collide(
        &unit_box(),
        &result.contact_tf1,
        &unit_box(),
        &result.contact_tf2,
        &CollisionRequest::boolean(),
    )
    .unwrap();
    assert!(check.is_collide, "sampled contact at t = {toc} must overlap");
}

#[test]
fn conservative_advancement_matches_the_analytic_time() {
    for gjk in [
        prox_types::GjkSolverType::LibCcd,
        prox_types::GjkSolverType::Indep,
    ] {
        let request = ContinuousCollisionRequest {
            solver_type: CcdSolverType::ConservativeAdvancement,
            gjk_solver_type: gjk,
            num_max_iterations: 64,
            toc_err: 1e-3,
            ..ContinuousCollisionRequest::default()
        };
        let mut result = ContinuousCollisionResult::default();

        let toc = continuous_collide(
            &CollisionGeometry::sphere(0.5),
            &at(-2.0, 0.0, 0.0),
            &at(2.0, 0.0, 0.0),
            &CollisionGeometry::sphere(0.5),
            &at(0.0, 0.0, 0.0),
            &at(0.0, 0.0, 0.0),
            &request,
            &mut result,
        );

        assert!(result.is_collide);
        assert!((toc - 0.25).abs() < 1e-3, "{gjk:?}: toc = {toc}");
        // Contact poses correspond to the reported time
        assert_relative_eq!(
            result.contact_tf1.position.x,
            -2.0 + 4.0 * toc,
            epsilon = 1e-9
        );
    }
}

#[test]
fn conservative_advancement_works_with_every_motion_kind() {
    // The endpoints describe a pure translation, so every interpolant
    // traverses the same path and must find (approximately) the same
    // contact time.
    for motion in [
        CcdMotionType::Translation,
        CcdMotionType::Linear,
        CcdMotionType::Screw,
        CcdMotionType::Spline,
    ] {
        let request = ContinuousCollisionRequest {
            solver_type: CcdSolverType::ConservativeAdvancement,
            motion_type: motion,
            num_max_iterations: 128,
            toc_err: 1e-3,
            ..ContinuousCollisionRequest::default()
        };
        let mut result = ContinuousCollisionResult::default();

        let toc = continuous_collide(
            &CollisionGeometry::sphere(0.5),
            &at(-2.0, 0.0, 0.0),
            &at(2.0, 0.0, 0.0),
            &CollisionGeometry::sphere(0.5),
            &at(0.0, 0.0, 0.0),
            &at(0.0, 0.0, 0.0),
            &request,
            &mut result,
        );

        assert!(result.is_collide, "{motion:?} missed the contact");
        let expected = match motion {
            // The eased path crosses the contact plane later in parameter
            // time: 3t^2 - 2t^3 = 0.25 at t ~ 0.3265
            CcdMotionType::Spline => 0.3265,
            _ => 0.25,
        };
        assert!(
            (toc - expected).abs() < 5e-3,
            "{motion:?}: toc = {toc}, expected ~{expected}"
        );
    }
}

#[test]
fn polynomial_solver_finds_the_mesh_contact_time() {
    let request = ContinuousCollisionRequest {
        solver_type: CcdSolverType::PolynomialSolver,
        motion_type: CcdMotionType::Translation,
        ..ContinuousCollisionRequest::default()
    };
    let mut result = ContinuousCollisionResult::default();

    // Square sheet sweeping +X into a static sheet at x = 1
    let toc = continuous_collide(
        &square_mesh(0.0),
        &at(0.0, 0.0, 0.0),
        &at(2.0, 0.0, 0.0),
        &square_mesh(1.0),
        &at(0.0, 0.0, 0.0),
        &at(0.0, 0.0, 0.0),
        &request,
        &mut result,
    );

    assert!(result.is_collide);
    assert_relative_eq!(toc, 0.5, epsilon = 1e-9);
    assert_relative_eq!(result.contact_tf1.position.x, 1.0, epsilon = 1e-9);
}

#[test]
fn polynomial_solver_reports_a_miss() {
    let request = ContinuousCollisionRequest {
        solver_type: CcdSolverType::PolynomialSolver,
        motion_type: CcdMotionType::Translation,
        ..ContinuousCollisionRequest::default()
    };
    let mut result = ContinuousCollisionResult::default();

    // Sheets moving apart
    let toc = continuous_collide(
        &square_mesh(0.0),
        &at(0.0, 0.0, 0.0),
        &at(-2.0, 0.0, 0.0),
        &square_mesh(1.0),
        &at(0.0, 0.0, 0.0),
        &at(2.0, 0.0, 0.0),
        &request,
        &mut result,
    );

    assert!(!result.is_collide);
    assert_relative_eq!(toc, 1.0, epsilon = 1e-12);
}

#[test]
fn validity_matrix_rejections() {
    let mesh = square_mesh(0.0);
    let b = unit_box();
    let mut result = ContinuousCollisionResult::default();
    let untouched = result;

    // Polynomial solver needs meshes on both sides
    let bad_geom = ContinuousCollisionRequest {
        solver_type: CcdSolverType::PolynomialSolver,
        ..ContinuousCollisionRequest::default()
    };
    assert_eq!(
        continuous_collide(
            &b,
            &at(0.0, 0.0, 0.0),
            &at(1.0, 0.0, 0.0),
            &b,
            &at(0.0, 0.0, 0.0),
            &at(0.0, 0.0, 0.0),
            &bad_geom,
            &mut result,
        ),
        INVALID_TOC
    );

    // Polynomial solver needs translation motion
    let bad_motion = ContinuousCollisionRequest {
        solver_type: CcdSolverType::PolynomialSolver,
        motion_type: CcdMotionType::Screw,
        ..ContinuousCollisionRequest::default()
    };
    assert_eq!(
        continuous_collide(
            &mesh,
            &at(0.0, 0.0, 0.0),
            &at(1.0, 0.0, 0.0),
            &mesh,
            &at(2.0, 0.0, 0.0),
            &at(2.0, 0.0, 0.0),
            &bad_motion,
            &mut result,
        ),
        INVALID_TOC
    );

    // Naive sampling has no mesh narrow phase
    let mesh_naive = ContinuousCollisionRequest::default();
    assert_eq!(
        continuous_collide(
            &mesh,
            &at(0.0, 0.0, 0.0),
            &at(1.0, 0.0, 0.0),
            &mesh,
            &at(2.0, 0.0, 0.0),
            &at(2.0, 0.0, 0.0),
            &mesh_naive,
            &mut result,
        ),
        INVALID_TOC
    );

    // Ray shooting is admitted by the matrix but ships no solver
    let ray = ContinuousCollisionRequest {
        solver_type: CcdSolverType::RayShooting,
        motion_type: CcdMotionType::Translation,
        ..ContinuousCollisionRequest::default()
    };
    assert_eq!(
        continuous_collide(
            &b,
            &at(0.0, 0.0, 0.0),
            &at(1.0, 0.0, 0.0),
            &b,
            &at(2.0, 0.0, 0.0),
            &at(2.0, 0.0, 0.0),
            &ray,
            &mut result,
        ),
        INVALID_TOC
    );

    // Every rejection leaves the result untouched
    assert_eq!(result, untouched);
}
