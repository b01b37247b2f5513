//! Benchmarks for the narrow-phase solver and the continuous-collision
//! dispatcher.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use prox_core::narrow::box_box;
use prox_core::{
    continuous_collide, CcdSolverType, CollisionGeometry, ContinuousCollisionRequest,
    ContinuousCollisionResult,
};
use prox_types::Pose;

fn bench_box_box(c: &mut Criterion) {
    let side = Vector3::repeat(1.0);
    let tf1 = Pose::identity();
    let tf_face = Pose::from_position(Point3::new(0.9, 0.0, 0.0));
    let tf_skew = Pose::from_position_rotation(
        Point3::new(0.7, 0.2, 0.1),
        UnitQuaternion::from_euler_angles(0.2, -0.1, 0.4),
    );
    let tf_apart = Pose::from_position(Point3::new(3.0, 0.0, 0.0));

    c.bench_function("box_box_face_manifold", |b| {
        b.iter(|| box_box(black_box(&side), &tf1, black_box(&side), &tf_face, 4))
    });
    c.bench_function("box_box_skew_manifold", |b| {
        b.iter(|| box_box(black_box(&side), &tf1, black_box(&side), &tf_skew, 8))
    });
    c.bench_function("box_box_separated", |b| {
        b.iter(|| box_box(black_box(&side), &tf1, black_box(&side), &tf_apart, 4))
    });
}

fn bench_continuous(c: &mut Criterion) {
    let geom = CollisionGeometry::box_shape(Vector3::repeat(0.5));
    let beg = Pose::from_position(Point3::new(-2.0, 0.0, 0.0));
    let end = Pose::from_position(Point3::new(2.0, 0.0, 0.0));
    let fixed = Pose::identity();

    let naive = ContinuousCollisionRequest {
        num_max_iterations: 101,
        toc_err: 0.01,
        ..ContinuousCollisionRequest::default()
    };
    let advancement = ContinuousCollisionRequest {
        solver_type: CcdSolverType::ConservativeAdvancement,
        num_max_iterations: 64,
        toc_err: 1e-4,
        ..ContinuousCollisionRequest::default()
    };

    c.bench_function("ccd_naive_box_sweep", |b| {
        b.iter(|| {
            let mut result = ContinuousCollisionResult::default();
            continuous_collide(
                black_box(&geom),
                &beg,
                &end,
                black_box(&geom),
                &fixed,
                &fixed,
                &naive,
                &mut result,
            )
        })
    });
    c.bench_function("ccd_conservative_advancement_box_sweep", |b| {
        b.iter(|| {
            let mut result = ContinuousCollisionResult::default();
            continuous_collide(
                black_box(&geom),
                &beg,
                &end,
                black_box(&geom),
                &fixed,
                &fixed,
                &advancement,
                &mut result,
            )
        })
    });
}

criterion_group!(benches, bench_box_box, bench_continuous);
criterion_main!(benches);
