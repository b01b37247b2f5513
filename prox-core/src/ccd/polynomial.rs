//! Polynomial-roots time of contact for translating triangle meshes.
//!
//! Every vertex moves linearly over the unit interval, so the moment two
//! triangle features touch is a root of a low-degree polynomial: four
//! points are coplanar when their scalar triple product vanishes, and with
//! linearly moving points that product is a cubic in `t`. Per candidate
//! triangle pair the fifteen feature combinations (6 vertex-face, 9
//! edge-edge) are reduced to coplanarity cubics, solved in closed form,
//! and each root is validated by a containment test at the root time. The
//! earliest admissible root over all pairs is the time of contact.
//!
//! Candidate pairs come from a BVH over the second mesh's swept triangle
//! bounds, queried with the first mesh's swept bounds; triangle pairs
//! whose swept boxes never meet are skipped wholesale.

use nalgebra::{Point3, Vector3};
use prox_types::Pose;
use smallvec::SmallVec;

use crate::mesh::TriangleMeshData;
use crate::mid_phase::{Bvh, BvhPrimitive};
use crate::shape::Aabb;

/// Coefficient magnitude below which a polynomial term is treated as zero.
const COEFF_EPSILON: f64 = 1e-12;

/// Slack for the barycentric / segment-parameter containment tests.
const CONTAINMENT_EPSILON: f64 = 1e-8;

/// Maximum gap between coplanar edges still counted as touching.
const EDGE_GAP_EPSILON: f64 = 1e-6;

/// Earliest time in `[0, 1]` at which the two translating meshes touch.
///
/// `tf1`/`tf2` are the poses at `t = 0`; `vel1`/`vel2` the world-space
/// displacements over the unit interval.
pub(crate) fn earliest_mesh_contact(
    mesh1: &TriangleMeshData,
    tf1: &Pose,
    vel1: &Vector3<f64>,
    mesh2: &TriangleMeshData,
    tf2: &Pose,
    vel2: &Vector3<f64>,
) -> Option<f64> {
    // World-space vertex positions at t = 0
    let verts1: Vec<Vector3<f64>> = mesh1
        .vertices()
        .iter()
        .map(|v| tf1.transform_point(v).coords)
        .collect();
    let verts2: Vec<Vector3<f64>> = mesh2
        .vertices()
        .iter()
        .map(|v| tf2.transform_point(v).coords)
        .collect();

    // BVH over mesh 2's swept triangle bounds
    let prims: Vec<BvhPrimitive> = mesh2
        .triangles()
        .iter()
        .enumerate()
        .map(|(j, tri)| {
            let aabb = swept_triangle_aabb(
                &[verts2[tri.v0], verts2[tri.v1], verts2[tri.v2]],
                vel2,
            );
            BvhPrimitive::new(aabb, j)
        })
        .collect();
    let bvh = Bvh::build(prims);

    let mut toc: Option<f64> = None;
    for tri1 in mesh1.triangles() {
        let a = [verts1[tri1.v0], verts1[tri1.v1], verts1[tri1.v2]];
        let query = swept_triangle_aabb(&a, vel1);

        for j in bvh.query(&query) {
            let tri2 = &mesh2.triangles()[j];
            let b = [verts2[tri2.v0], verts2[tri2.v1], verts2[tri2.v2]];

            if let Some(t) = triangle_pair_contact_time(&a, vel1, &b, vel2) {
                if toc.map_or(true, |best| t < best) {
                    toc = Some(t);
                }
            }
        }
    }

    toc
}

/// Bound containing a triangle over its whole motion interval.
fn swept_triangle_aabb(tri: &[Vector3<f64>; 3], vel: &Vector3<f64>) -> Aabb {
    Aabb::from_points(
        tri.iter()
            .map(|v| Point3::from(*v))
            .chain(tri.iter().map(|v| Point3::from(v + vel))),
    )
}

/// Earliest feature contact between two moving triangles.
fn triangle_pair_contact_time(
    a: &[Vector3<f64>; 3],
    va: &Vector3<f64>,
    b: &[Vector3<f64>; 3],
    vb: &Vector3<f64>,
) -> Option<f64> {
    let mut best: Option<f64> = None;
    let mut consider = |t: Option<f64>| {
        if let Some(t) = t {
            if best.map_or(true, |cur| t < cur) {
                best = Some(t);
            }
        }
    };

    // Vertices of B against the face of A, and vice versa
    for &p in b {
        consider(vertex_face_time(&p, vb, a, va));
    }
    for &p in a {
        consider(vertex_face_time(&p, va, b, vb));
    }

    // All nine edge pairs
    for i in 0..3 {
        let (a0, a1) = (a[i], a[(i + 1) % 3]);
        for j in 0..3 {
            let (b0, b1) = (b[j], b[(j + 1) % 3]);
            consider(edge_edge_time(&a0, &a1, va, &b0, &b1, vb));
        }
    }

    best
}

/// Time at which a moving vertex crosses a moving triangle's interior.
fn vertex_face_time(
    p: &Vector3<f64>,
    vp: &Vector3<f64>,
    q: &[Vector3<f64>; 3],
    vq: &Vector3<f64>,
) -> Option<f64> {
    // Edges of the face translate rigidly, so only the vertex-to-face
    // offset carries a velocity term; the general per-vertex form below
    // still covers independently moving vertices.
    let e1 = q[1] - q[0];
    let f1 = Vector3::zeros();
    let e2 = q[2] - q[0];
    let f2 = Vector3::zeros();
    let d0 = p - q[0];
    let g = vp - vq;

    let coeffs = coplanarity_cubic(&e1, &f1, &e2, &f2, &d0, &g);

    for t in admissible_roots(&coeffs, &e1, &e2) {
        let pt = p + vp * t;
        let q0 = q[0] + vq * t;
        let q1 = q[1] + vq * t;
        let q2 = q[2] + vq * t;
        if point_in_triangle(&pt, &q0, &q1, &q2) {
            return Some(t);
        }
    }
    None
}

/// Time at which two moving edges cross.
fn edge_edge_time(
    a0: &Vector3<f64>,
    a1: &Vector3<f64>,
    va: &Vector3<f64>,
    b0: &Vector3<f64>,
    b1: &Vector3<f64>,
    vb: &Vector3<f64>,
) -> Option<f64> {
    let e1 = a1 - a0;
    let f1 = Vector3::zeros();
    let e2 = b1 - b0;
    let f2 = Vector3::zeros();
    let d0 = b0 - a0;
    let g = vb - va;

    let coeffs = coplanarity_cubic(&e1, &f1, &e2, &f2, &d0, &g);

    for t in admissible_roots(&coeffs, &e1, &e2) {
        let pa0 = a0 + va * t;
        let pa1 = a1 + va * t;
        let pb0 = b0 + vb * t;
        let pb1 = b1 + vb * t;
        if segments_touch(&pa0, &pa1, &pb0, &pb1) {
            return Some(t);
        }
    }
    None
}

/// Coefficients `[c0, c1, c2, c3]` of the coplanarity condition
/// `(e1(t) x e2(t)) . d(t) = 0` with `e_i(t) = e_i + t f_i` and
/// `d(t) = d0 + t g`.
fn coplanarity_cubic(
    e1: &Vector3<f64>,
    f1: &Vector3<f64>,
    e2: &Vector3<f64>,
    f2: &Vector3<f64>,
    d0: &Vector3<f64>,
    g: &Vector3<f64>,
) -> [f64; 4] {
    let n0 = e1.cross(e2);
    let n1 = e1.cross(f2) + f1.cross(e2);
    let n2 = f1.cross(f2);

    [
        n0.dot(d0),
        n0.dot(g) + n1.dot(d0),
        n1.dot(g) + n2.dot(d0),
        n2.dot(g),
    ]
}

/// Roots of the coplanarity polynomial within `[0, 1]`, ascending.
///
/// An identically vanishing polynomial means the features stay coplanar
/// over the whole interval (e.g. sliding in a shared plane); `t = 0` is
/// then the only candidate, validated by the caller's containment test.
/// The degenerate-feature guard on `e1`/`e2` keeps zero-length edges from
/// reporting phantom roots.
fn admissible_roots(
    coeffs: &[f64; 4],
    e1: &Vector3<f64>,
    e2: &Vector3<f64>,
) -> SmallVec<[f64; 3]> {
    let mut out: SmallVec<[f64; 3]> = SmallVec::new();

    if coeffs.iter().all(|c| c.abs() < COEFF_EPSILON) {
        if e1.norm_squared() > COEFF_EPSILON && e2.norm_squared() > COEFF_EPSILON {
            out.push(0.0);
        }
        return out;
    }

    for t in solve_cubic(coeffs[3], coeffs[2], coeffs[1], coeffs[0]) {
        if (-CONTAINMENT_EPSILON..=1.0 + CONTAINMENT_EPSILON).contains(&t) {
            out.push(t.clamp(0.0, 1.0));
        }
    }
    out.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Real roots of `c3 t^3 + c2 t^2 + c1 t + c0`, ascending.
fn solve_cubic(c3: f64, c2: f64, c1: f64, c0: f64) -> SmallVec<[f64; 3]> {
    let mut roots: SmallVec<[f64; 3]> = SmallVec::new();

    if c3.abs() < COEFF_EPSILON {
        // Quadratic
        if c2.abs() < COEFF_EPSILON {
            // Linear
            if c1.abs() >= COEFF_EPSILON {
                roots.push(-c0 / c1);
            }
            return roots;
        }
        let disc = c1 * c1 - 4.0 * c2 * c0;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            roots.push((-c1 - sq) / (2.0 * c2));
            roots.push((-c1 + sq) / (2.0 * c2));
            roots.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
        }
        return roots;
    }

    // Depressed cubic t = s - a/3: s^3 + p s + q = 0
    let a = c2 / c3;
    let b = c1 / c3;
    let c = c0 / c3;
    let p = b - a * a / 3.0;
    let q = 2.0 * a * a * a / 27.0 - a * b / 3.0 + c;
    let shift = -a / 3.0;

    let half_q = q * 0.5;
    let third_p = p / 3.0;
    let disc = half_q * half_q + third_p * third_p * third_p;

    if disc > COEFF_EPSILON {
        // One real root
        let sq = disc.sqrt();
        let u = (-half_q + sq).cbrt();
        let v = (-half_q - sq).cbrt();
        roots.push(u + v + shift);
    } else if third_p.abs() < COEFF_EPSILON {
        // Triple root
        roots.push(shift);
    } else {
        // Three real roots (trigonometric form)
        let r = (-third_p).sqrt();
        let cos_arg = (-half_q / (r * r * r)).clamp(-1.0, 1.0);
        let phi = cos_arg.acos();
        for k in 0..3 {
            roots.push(2.0 * r * ((phi + 2.0 * std::f64::consts::PI * f64::from(k)) / 3.0).cos() + shift);
        }
        roots.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    }

    roots
}

/// Barycentric containment of a (coplanar) point in a triangle.
fn point_in_triangle(
    p: &Vector3<f64>,
    q0: &Vector3<f64>,
    q1: &Vector3<f64>,
    q2: &Vector3<f64>,
) -> bool {
    let v0 = q1 - q0;
    let v1 = q2 - q0;
    let v2 = p - q0;

    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < COEFF_EPSILON {
        return false; // Degenerate triangle
    }
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    let u = 1.0 - v - w;

    u >= -CONTAINMENT_EPSILON && v >= -CONTAINMENT_EPSILON && w >= -CONTAINMENT_EPSILON
}

/// Whether two (coplanar) segments pass within the touching gap of each
/// other, with both closest-point parameters on the segments.
fn segments_touch(
    a0: &Vector3<f64>,
    a1: &Vector3<f64>,
    b0: &Vector3<f64>,
    b1: &Vector3<f64>,
) -> bool {
    let da = a1 - a0;
    let db = b1 - b0;
    let r = a0 - b0;

    let a = da.dot(&da);
    let e = db.dot(&db);
    if a < COEFF_EPSILON || e < COEFF_EPSILON {
        return false; // Degenerate edge
    }

    let f = db.dot(&r);
    let c = da.dot(&r);
    let bb = da.dot(&db);
    let denom = a * e - bb * bb;

    let s = if denom.abs() > COEFF_EPSILON {
        ((bb * f - c * e) / denom).clamp(0.0, 1.0)
    } else {
        0.0 // Parallel edges
    };
    let t = ((bb * s + f) / e).clamp(0.0, 1.0);
    // Re-project s against the clamped t
    let s = ((bb * t - c) / a).clamp(0.0, 1.0);

    let pa = a0 + da * s;
    let pb = b0 + db * t;
    (pa - pb).norm() <= EDGE_GAP_EPSILON
}
