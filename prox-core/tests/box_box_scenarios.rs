//! Scenario coverage for the box/box separating-axis solver through the
//! public narrow-phase interface.

use approx::assert_relative_eq;
use nalgebra::{Point3, UnitQuaternion, Vector3};
use prox_core::narrow::box_box;
use prox_core::{collide, CollisionGeometry, CollisionRequest, Pose};
use std::f64::consts::FRAC_PI_4;

fn at(x: f64, y: f64, z: f64) -> Pose {
    Pose::from_position(Point3::new(x, y, z))
}

#[test]
fn face_contact_through_the_dispatcher() {
    let a = CollisionGeometry::box_shape(Vector3::repeat(0.5));
    let b = CollisionGeometry::box_shape(Vector3::repeat(0.5));

    let outcome = collide(
        &a,
        &at(0.0, 0.0, 0.0),
        &b,
        &at(0.9, 0.0, 0.0),
        &CollisionRequest::default(),
    )
    .unwrap();

    assert!(outcome.is_collide);
    assert_eq!(outcome.contacts.len(), 4);
    for c in &outcome.contacts {
        assert_relative_eq!(c.depth, 0.1, epsilon = 1e-12);
        assert_relative_eq!(c.normal.x, 1.0, epsilon = 1e-12);
        // All four points on the incident face plane
        assert_relative_eq!(c.position.x, 0.4, epsilon = 1e-12);
    }
}

#[test]
fn separated_boxes_produce_no_contacts() {
    let a = CollisionGeometry::box_shape(Vector3::repeat(0.5));
    let b = CollisionGeometry::box_shape(Vector3::repeat(0.5));

    let outcome = collide(
        &a,
        &at(0.0, 0.0, 0.0),
        &b,
        &at(1.1, 0.0, 0.0),
        &CollisionRequest::default(),
    )
    .unwrap();

    assert!(!outcome.is_collide);
    assert!(outcome.contacts.is_empty());
}

#[test]
fn deep_containment_keeps_every_depth_positive() {
    let outer = CollisionGeometry::box_shape(Vector3::repeat(1.5));
    let inner = CollisionGeometry::box_shape(Vector3::repeat(0.5));

    let outcome = collide(
        &outer,
        &at(0.0, 0.0, 0.0),
        &inner,
        &at(0.2, 0.1, 0.0),
        &CollisionRequest::full_manifold(),
    )
    .unwrap();

    assert!(outcome.is_collide);
    assert!(!outcome.contacts.is_empty());
    for c in &outcome.contacts {
        assert!(c.depth >= 0.0);
        // Escape along +X: 1.5 + 0.5 - 0.2
        assert_relative_eq!(c.depth, 1.8, epsilon = 1e-12);
        assert_relative_eq!(c.normal.x, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn edge_contact_produces_a_single_point() {
    // Crossed diamond-profile beams: ridge against ridge
    let beam1 = Vector3::new(4.0, 0.2, 0.2);
    let beam2 = Vector3::new(0.2, 4.0, 0.2);
    let tf1 = Pose::from_position_rotation(
        Point3::origin(),
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_4),
    );
    let tf2 = Pose::from_position_rotation(
        Point3::new(0.0, 0.0, 0.27),
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_4),
    );

    let result = box_box(&beam1, &tf1, &beam2, &tf2, 8);

    assert!(result.is_collide());
    assert!(result.is_edge_contact());
    assert_eq!(result.contacts.len(), 1);
    // Ridges along X and Y cross: the contact normal is vertical
    assert_relative_eq!(result.normal.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(result.normal.y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(result.normal.z, 1.0, epsilon = 1e-9);
}

#[test]
fn manifold_cap_orders_deepest_first() {
    // Tilt the second box slightly so the four clipped corners carry
    // different depths, then cap the manifold at three points.
    let side = Vector3::repeat(1.0);
    let tf1 = Pose::identity();
    let tf2 = Pose::from_position_rotation(
        Point3::new(0.95, 0.0, 0.0),
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.05),
    );

    let result = box_box(&side, &tf1, &side, &tf2, 3);

    assert!(result.is_collide());
    assert_eq!(result.contacts.len(), 3);
    let first = result.contacts[0].depth;
    for c in &result.contacts {
        assert!(first >= c.depth - 1e-12);
    }
}

#[test]
fn symmetry_swapping_bodies_negates_the_normal() {
    let side1 = Vector3::new(1.0, 2.0, 1.5);
    let side2 = Vector3::new(0.8, 0.8, 2.2);
    let tf1 = Pose::from_position_rotation(
        Point3::new(0.1, -0.2, 0.05),
        UnitQuaternion::from_euler_angles(0.1, 0.3, -0.2),
    );
    let tf2 = Pose::from_position_rotation(
        Point3::new(0.9, 0.3, 0.4),
        UnitQuaternion::from_euler_angles(-0.4, 0.1, 0.6),
    );

    let ab = box_box(&side1, &tf1, &side2, &tf2, 8);
    let ba = box_box(&side2, &tf2, &side1, &tf1, 8);

    assert!(ab.is_collide());
    assert_eq!(ab.is_collide(), ba.is_collide());
    assert_relative_eq!(ab.depth, ba.depth, epsilon = 1e-9);
    assert_relative_eq!((ab.normal + ba.normal).norm(), 0.0, epsilon = 1e-9);
}

#[test]
fn rigid_motion_of_both_boxes_transports_the_answer() {
    let side = Vector3::repeat(1.0);
    let tf1 = Pose::identity();
    let tf2 = Pose::from_position_rotation(
        Point3::new(0.8, 0.1, 0.0),
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.3),
    );

    let base = box_box(&side, &tf1, &side, &tf2, 8);
    assert!(base.is_collide());

    // Apply one rigid motion to both boxes
    let motion = Pose::from_position_rotation(
        Point3::new(5.0, -1.0, 2.0),
        UnitQuaternion::from_euler_angles(0.7, 0.2, -0.4),
    );
    let moved = box_box(
        &side,
        &motion.compose(&tf1),
        &side,
        &motion.compose(&tf2),
        8,
    );

    assert_eq!(base.code, moved.code);
    assert_relative_eq!(base.depth, moved.depth, epsilon = 1e-9);
    assert_relative_eq!(
        (moved.normal - motion.rotation * base.normal).norm(),
        0.0,
        epsilon = 1e-9
    );
    assert_eq!(base.contacts.len(), moved.contacts.len());
    for (c0, c1) in base.contacts.iter().zip(moved.contacts.iter()) {
        let transported = motion.transform_point(&Point3::from(c0.position)).coords;
        assert_relative_eq!((c1.position - transported).norm(), 0.0, epsilon = 1e-9);
    }
}
