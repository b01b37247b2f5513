//! Simplex-based distance queries (GJK).
//!
//! The conservative-advancement solver needs the separation distance and
//! the closest-point pair of two convex shapes; the naive discrete path
//! needs a boolean overlap test for the convex pairs without an analytic
//! routine. Both run on the same machinery: support points of the
//! Minkowski difference drive a simplex (point, segment, triangle,
//! tetrahedron) toward the feature closest to the origin, and barycentric
//! weights of that feature recover witness points on the two shapes.
//!
//! # References
//!
//! - Gilbert, Johnson, Keerthi: "A Fast Procedure for Computing the
//!   Distance Between Complex Objects in Three-Dimensional Space" (1988)
//! - Ericson: "Real-Time Collision Detection" (2005), closest-point
//!   simplex tests

use nalgebra::Vector3;
use prox_types::{GjkSolverType, Pose};
use smallvec::SmallVec;

use crate::shape::CollisionGeometry;

/// Termination profile of the simplex solver.
#[derive(Debug, Clone, Copy)]
pub struct GjkOptions {
    /// Distance below which the shapes count as touching, and the relative
    /// progress threshold that ends the descent.
    pub tolerance: f64,
    /// Iteration cap.
    pub max_iterations: usize,
}

impl Default for GjkOptions {
    fn default() -> Self {
        Self::from(GjkSolverType::default())
    }
}

impl From<GjkSolverType> for GjkOptions {
    fn from(solver: GjkSolverType) -> Self {
        match solver {
            GjkSolverType::LibCcd => Self {
                tolerance: 1e-6,
                max_iterations: 128,
            },
            GjkSolverType::Indep => Self {
                tolerance: 1e-8,
                max_iterations: 64,
            },
        }
    }
}

/// Result of a distance query.
#[derive(Debug, Clone, Copy)]
pub struct DistanceResult {
    /// Separation distance; 0 when the shapes intersect.
    pub distance: f64,
    /// Closest point on shape 1, world coordinates.
    pub point1: Vector3<f64>,
    /// Closest point on shape 2, world coordinates.
    pub point2: Vector3<f64>,
    /// Whether the shapes overlap (distance is then 0).
    pub intersecting: bool,
}

/// A vertex of the Minkowski-difference simplex, remembering the support
/// points of both shapes so witness points can be reconstructed.
#[derive(Debug, Clone, Copy)]
struct SupportPoint {
    /// Point in Minkowski space (`a - b`).
    v: Vector3<f64>,
    /// Support point on shape 1, world coordinates.
    a: Vector3<f64>,
    /// Support point on shape 2, world coordinates.
    b: Vector3<f64>,
}

type Simplex = SmallVec<[SupportPoint; 4]>;
type Weights = SmallVec<[f64; 4]>;

/// Separation distance and closest points between two convex shapes.
///
/// Non-convex geometries never reach this routine; dispatch guards them.
#[must_use]
pub fn distance(
    geom1: &CollisionGeometry,
    tf1: &Pose,
    geom2: &CollisionGeometry,
    tf2: &Pose,
    options: &GjkOptions,
) -> DistanceResult {
    debug_assert!(geom1.is_convex_solid() && geom2.is_convex_solid());

    // Initial direction: center offset, or X for coincident centers
    let mut dir = tf2.position - tf1.position;
    if dir.norm() < options.tolerance {
        dir = Vector3::x();
    }

    let mut simplex: Simplex = SmallVec::new();
    simplex.push(minkowski_support(geom1, tf1, geom2, tf2, &dir));

    for _ in 0..options.max_iterations {
        let Some((closest, weights)) = closest_to_origin(&mut simplex) else {
            // Origin enclosed by a tetrahedron
            return intersecting_result(&simplex);
        };

        let dist = closest.norm();
        if dist < options.tolerance {
            return intersecting_result(&simplex);
        }

        let w = minkowski_support(geom1, tf1, geom2, tf2, &(-closest));

        // Terminate when the new support cannot meaningfully shrink the
        // distance: v.v - v.w is the maximum possible improvement.
        if dist * dist - closest.dot(&w.v) <= options.tolerance * dist {
            return witness_result(&simplex, &weights, dist);
        }

        simplex.push(w);
    }

    // Iteration cap: report the best feature found so far
    match closest_to_origin(&mut simplex) {
        Some((closest, weights)) => witness_result(&simplex, &weights, closest.norm()),
        None => intersecting_result(&simplex),
    }
}

/// Boolean overlap query for a convex pair.
#[must_use]
pub fn intersect(
    geom1: &CollisionGeometry,
    tf1: &Pose,
    geom2: &CollisionGeometry,
    tf2: &Pose,
    options: &GjkOptions,
) -> bool {
    distance(geom1, tf1, geom2, tf2, options).intersecting
}

fn intersecting_result(simplex: &Simplex) -> DistanceResult {
    // Any simplex point serves; the witness pair is not meaningful at
    // penetration, so report the last support pair.
    let last = simplex[simplex.len() - 1];
    DistanceResult {
        distance: 0.0,
        point1: last.a,
        point2: last.b,
        intersecting: true,
    }
}

fn witness_result(simplex: &Simplex, weights: &Weights, dist: f64) -> DistanceResult {
    let mut point1 = Vector3::zeros();
    let mut point2 = Vector3::zeros();
    for (sp, &w) in simplex.iter().zip(weights.iter()) {
        point1 += sp.a * w;
        point2 += sp.b * w;
    }
    DistanceResult {
        distance: dist,
        point1,
        point2,
        intersecting: false,
    }
}

/// Closest point of the current simplex to the origin.
///
/// Reduces the simplex in place to the minimal feature supporting that
/// point and returns it with matching barycentric weights. `None` means a
/// tetrahedron encloses the origin.
fn closest_to_origin(simplex: &mut Simplex) -> Option<(Vector3<f64>, Weights)> {
    match simplex.len() {
        1 => {
            let mut weights = Weights::new();
            weights.push(1.0);
            Some((simplex[0].v, weights))
        }
        2 => Some(closest_on_segment(simplex)),
        3 => Some(closest_on_triangle(simplex)),
        _ => closest_on_tetrahedron(simplex),
    }
}

fn closest_on_segment(simplex: &mut Simplex) -> (Vector3<f64>, Weights) {
    let a = simplex[0];
    let b = simplex[1];
    let ab = b.v - a.v;
    let len_sq = ab.norm_squared();

    let mut weights = Weights::new();
    if len_sq < f64::EPSILON {
        simplex.truncate(1);
        weights.push(1.0);
        return (a.v, weights);
    }

    let t = -a.v.dot(&ab) / len_sq;
    if t <= 0.0 {
        simplex.truncate(1);
        weights.push(1.0);
        (a.v, weights)
    } else if t >= 1.0 {
        simplex[0] = b;
        simplex.truncate(1);
        weights.push(1.0);
        (b.v, weights)
    } else {
        weights.push(1.0 - t);
        weights.push(t);
        (a.v + ab * t, weights)
    }
}

#[allow(clippy::similar_names)] // d1..d6 is the canonical naming for the region tests
fn closest_on_triangle(simplex: &mut Simplex) -> (Vector3<f64>, Weights) {
    let a = simplex[0];
    let b = simplex[1];
    let c = simplex[2];

    let ab = b.v - a.v;
    let ac = c.v - a.v;
    let ap = -a.v;

    let mut weights = Weights::new();

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        simplex.truncate(1);
        weights.push(1.0);
        return (a.v, weights);
    }

    let bp = -b.v;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        simplex[0] = b;
        simplex.truncate(1);
        weights.push(1.0);
        return (b.v, weights);
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let denom = d1 - d3;
        let v = if denom.abs() > f64::EPSILON {
            d1 / denom
        } else {
            0.5
        };
        simplex.truncate(2);
        weights.push(1.0 - v);
        weights.push(v);
        return (a.v + ab * v, weights);
    }

    let cp = -c.v;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        simplex[0] = c;
        simplex.truncate(1);
        weights.push(1.0);
        return (c.v, weights);
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let denom = d2 - d6;
        let w = if denom.abs() > f64::EPSILON {
            d2 / denom
        } else {
            0.5
        };
        simplex[1] = c;
        simplex.truncate(2);
        weights.push(1.0 - w);
        weights.push(w);
        return (a.v + ac * w, weights);
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let num = d4 - d3;
        let denom = num + (d5 - d6);
        let w = if denom.abs() > f64::EPSILON {
            num / denom
        } else {
            0.5
        };
        simplex[0] = b;
        simplex[1] = c;
        simplex.truncate(2);
        weights.push(1.0 - w);
        weights.push(w);
        return (b.v + (c.v - b.v) * w, weights);
    }

    // Interior of the face
    let total = va + vb + vc;
    if total.abs() < f64::EPSILON {
        // Degenerate triangle: keep the first vertex
        simplex.truncate(1);
        weights.push(1.0);
        return (a.v, weights);
    }
    let denom = 1.0 / total;
    let v = vb * denom;
    let w = vc * denom;
    weights.push(1.0 - v - w);
    weights.push(v);
    weights.push(w);
    (a.v + ab * v + ac * w, weights)
}

fn closest_on_tetrahedron(simplex: &mut Simplex) -> Option<(Vector3<f64>, Weights)> {
    // Faces as index triples, each paired with the opposite vertex
    const FACES: [([usize; 3], usize); 4] = [
        ([0, 1, 2], 3),
        ([0, 2, 3], 1),
        ([0, 3, 1], 2),
        ([1, 3, 2], 0),
    ];

    let points = [simplex[0], simplex[1], simplex[2], simplex[3]];
    let mut best: Option<(f64, Simplex, Vector3<f64>, Weights)> = None;
    let mut outside_any = false;

    for (face, opposite) in FACES {
        let p = points[face[0]].v;
        let q = points[face[1]].v;
        let r = points[face[2]].v;
        let mut n = (q - p).cross(&(r - p));
        if n.dot(&(points[opposite].v - p)) > 0.0 {
            n = -n;
        }
        // Origin on the outer side of this face?
        if n.dot(&(-p)) <= 0.0 {
            continue;
        }
        outside_any = true;

        let mut face_simplex: Simplex = SmallVec::new();
        face_simplex.push(points[face[0]]);
        face_simplex.push(points[face[1]]);
        face_simplex.push(points[face[2]]);
        let (closest, weights) = closest_on_triangle(&mut face_simplex);
        let dist_sq = closest.norm_squared();
        if best.as_ref().map_or(true, |(d, ..)| dist_sq < *d) {
            best = Some((dist_sq, face_simplex, closest, weights));
        }
    }

    if !outside_any {
        return None; // Origin inside the tetrahedron
    }

    // Unwrap is structurally safe: outside_any implies a candidate exists.
    let (_, reduced, closest, weights) = best?;
    *simplex = reduced;
    Some((closest, weights))
}

// ============================================================================
// Support functions
// ============================================================================

fn minkowski_support(
    geom1: &CollisionGeometry,
    tf1: &Pose,
    geom2: &CollisionGeometry,
    tf2: &Pose,
    dir: &Vector3<f64>,
) -> SupportPoint {
    let a = support(geom1, tf1, dir);
    let b = support(geom2, tf2, &(-dir));
    SupportPoint { v: a - b, a, b }
}

/// World-space support point of a posed convex shape: the surface point
/// furthest along `dir`.
#[must_use]
pub fn support(geom: &CollisionGeometry, pose: &Pose, dir: &Vector3<f64>) -> Vector3<f64> {
    let local_dir = pose.rotation.inverse() * dir;
    let local = support_local(geom, &local_dir);
    pose.position.coords + pose.rotation * local
}

fn support_local(geom: &CollisionGeometry, dir: &Vector3<f64>) -> Vector3<f64> {
    const DIR_EPSILON: f64 = 1e-12;

    match geom {
        CollisionGeometry::Sphere { radius } => {
            let n = dir.norm();
            if n > DIR_EPSILON {
                dir * (radius / n)
            } else {
                Vector3::new(*radius, 0.0, 0.0)
            }
        }
        CollisionGeometry::Box { half_extents } => Vector3::new(
            if dir.x >= 0.0 {
                half_extents.x
            } else {
                -half_extents.x
            },
            if dir.y >= 0.0 {
                half_extents.y
            } else {
                -half_extents.y
            },
            if dir.z >= 0.0 {
                half_extents.z
            } else {
                -half_extents.z
            },
        ),
        CollisionGeometry::Capsule {
            half_length,
            radius,
        } => {
            let n = dir.norm();
            let cap = if n > DIR_EPSILON {
                dir * (radius / n)
            } else {
                Vector3::new(*radius, 0.0, 0.0)
            };
            let z = if dir.z >= 0.0 {
                *half_length
            } else {
                -half_length
            };
            Vector3::new(cap.x, cap.y, cap.z + z)
        }
        CollisionGeometry::Cylinder {
            half_length,
            radius,
        } => {
            let radial = dir.xy().norm();
            let (x, y) = if radial > DIR_EPSILON {
                (dir.x / radial * radius, dir.y / radial * radius)
            } else {
                (0.0, 0.0)
            };
            let z = if dir.z >= 0.0 {
                *half_length
            } else {
                -half_length
            };
            Vector3::new(x, y, z)
        }
        CollisionGeometry::Cone {
            half_length,
            radius,
        } => {
            let apex = Vector3::new(0.0, 0.0, *half_length);
            let radial = dir.xy().norm();
            let rim = if radial > DIR_EPSILON {
                Vector3::new(
                    dir.x / radial * radius,
                    dir.y / radial * radius,
                    -half_length,
                )
            } else {
                Vector3::new(*radius, 0.0, -half_length)
            };
            if dir.dot(&apex) >= dir.dot(&rim) {
                apex
            } else {
                rim
            }
        }
        CollisionGeometry::Ellipsoid { radii } => {
            let scaled = Vector3::new(radii.x * dir.x, radii.y * dir.y, radii.z * dir.z);
            let m = scaled.norm();
            if m > DIR_EPSILON {
                Vector3::new(
                    radii.x * radii.x * dir.x / m,
                    radii.y * radii.y * dir.y / m,
                    radii.z * radii.z * dir.z / m,
                )
            } else {
                Vector3::new(radii.x, 0.0, 0.0)
            }
        }
        CollisionGeometry::ConvexMesh { vertices } => support_vertex_set(vertices, dir),
        CollisionGeometry::Triangle { vertices } => support_vertex_set(vertices, dir),
        // Non-convex shapes never reach the simplex solver
        CollisionGeometry::TriangleMesh { .. }
        | CollisionGeometry::Plane { .. }
        | CollisionGeometry::HalfSpace { .. } => {
            debug_assert!(false, "support queried on a non-convex shape");
            Vector3::zeros()
        }
    }
}

/// Extreme vertex of a finite vertex set along `dir`.
fn support_vertex_set(vertices: &[nalgebra::Point3<f64>], dir: &Vector3<f64>) -> Vector3<f64> {
    vertices
        .iter()
        .map(|v| v.coords)
        .max_by(|a, b| {
            a.dot(dir)
                .partial_cmp(&b.dot(dir))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or_else(Vector3::zeros)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn at(x: f64, y: f64, z: f64) -> Pose {
        Pose::from_position(Point3::new(x, y, z))
    }

    #[test]
    fn sphere_sphere_distance_and_witnesses() {
        let s = CollisionGeometry::sphere(1.0);
        let result = distance(
            &s,
            &at(0.0, 0.0, 0.0),
            &s,
            &at(3.0, 0.0, 0.0),
            &GjkOptions::default(),
        );

        assert!(!result.intersecting);
        assert_relative_eq!(result.distance, 1.0, epsilon = 1e-5);
        assert_relative_eq!(result.point1.x, 1.0, epsilon = 1e-4);
        assert_relative_eq!(result.point2.x, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn box_box_distance_is_exact_on_polytopes() {
        let b = CollisionGeometry::box_shape(Vector3::repeat(0.5));
        let result = distance(
            &b,
            &at(0.0, 0.0, 0.0),
            &b,
            &at(3.0, 0.0, 0.0),
            &GjkOptions::default(),
        );

        assert!(!result.intersecting);
        assert_relative_eq!(result.distance, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn overlapping_boxes_intersect() {
        let b = CollisionGeometry::box_shape(Vector3::repeat(0.5));
        assert!(intersect(
            &b,
            &at(0.0, 0.0, 0.0),
            &b,
            &at(0.5, 0.3, 0.0),
            &GjkOptions::default()
        ));
    }

    #[test]
    fn concentric_shapes_intersect() {
        let s = CollisionGeometry::sphere(1.0);
        let b = CollisionGeometry::box_shape(Vector3::repeat(0.4));
        assert!(intersect(
            &s,
            &at(0.0, 0.0, 0.0),
            &b,
            &at(0.0, 0.0, 0.0),
            &GjkOptions::default()
        ));
    }

    #[test]
    fn diagonal_offset_boxes_measure_the_corner_gap() {
        let b = CollisionGeometry::box_shape(Vector3::repeat(0.5));
        let result = distance(
            &b,
            &at(0.0, 0.0, 0.0),
            &b,
            &at(2.0, 2.0, 0.0),
            &GjkOptions::default(),
        );

        // Corners at (0.5, 0.5) and (1.5, 1.5): gap is sqrt(2)
        assert!(!result.intersecting);
        assert_relative_eq!(result.distance, std::f64::consts::SQRT_2, epsilon = 1e-6);
    }

    #[test]
    fn capsule_sphere_gap() {
        let capsule = CollisionGeometry::capsule(1.0, 0.25);
        let sphere = CollisionGeometry::sphere(0.25);
        let result = distance(
            &capsule,
            &at(0.0, 0.0, 0.0),
            &sphere,
            &at(2.0, 0.0, 0.0),
            &GjkOptions::default(),
        );

        // Axis gap 2.0 minus both radii
        assert_relative_eq!(result.distance, 1.5, epsilon = 1e-5);
    }

    #[test]
    fn support_points_are_extreme() {
        let b = CollisionGeometry::box_shape(Vector3::new(0.5, 1.0, 1.5));
        let pose = Pose::identity();

        let p = support(&b, &pose, &Vector3::new(1.0, -1.0, 1.0));
        assert_relative_eq!(p.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(p.y, -1.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 1.5, epsilon = 1e-12);

        let cone = CollisionGeometry::cone(1.0, 0.5);
        let apex = support(&cone, &pose, &Vector3::z());
        assert_relative_eq!(apex.z, 1.0, epsilon = 1e-12);
        let rim = support(&cone, &pose, &Vector3::new(1.0, 0.0, -0.2));
        assert_relative_eq!(rim.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(rim.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn solver_profiles_differ() {
        let libccd = GjkOptions::from(GjkSolverType::LibCcd);
        let indep = GjkOptions::from(GjkSolverType::Indep);
        assert!(indep.tolerance < libccd.tolerance);
        assert!(libccd.max_iterations > indep.max_iterations);
    }
}
