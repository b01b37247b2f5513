//! Box/box narrow phase: separating-axis test with contact-manifold
//! generation.
//!
//! Fifteen candidate axes are tested in a fixed order: the three face
//! normals of each box, then the nine edge-direction cross products. A
//! positive separation on any axis ends the query. Otherwise the axis with
//! the least penetration wins, with edge axes handicapped by a small bias
//! so near-ties report the stabler face contact. Face contacts clip the
//! incident face against the reference face and cull the result to the
//! caller's budget; edge contacts reduce to a closest-point query between
//! the two touching edge lines.

use nalgebra::{Matrix3, Vector3};
use prox_types::{ContactManifold, ContactPoint, Pose, MAX_MANIFOLD_POINTS};

use super::polygon::{cull_points, intersect_rect_quad};

/// Multiplicative bias applied to edge-edge separation scores.
///
/// Near-ties between a face axis and an edge axis resolve toward the face:
/// face manifolds give downstream solvers more stable stacks than a single
/// edge contact. Calibration constant; not configurable.
const SAT_FACE_BIAS: f64 = 1.05;

/// Inflation added to each entry of the absolute relative rotation before
/// the edge-edge tests, keeping near-parallel axes from generating spurious
/// wins while leaving the face tests untouched.
const ABS_ROT_INFLATION: f64 = 1.0e-6;

/// Squared-cosine threshold above which two edge directions count as
/// parallel and keep the caller's reference points.
const PARALLEL_LINE_THRESHOLD: f64 = 1.0e-4;

/// Result of a box/box separating-axis query.
#[derive(Debug, Clone)]
pub struct BoxBoxResult {
    /// Winning axis code: 0 when separated, 1-3 a face of box 1, 4-6 a face
    /// of box 2, 7-15 an edge-edge cross product.
    pub code: u8,
    /// Unit contact normal in world coordinates, box 1 toward box 2.
    /// Zero when separated.
    pub normal: Vector3<f64>,
    /// Minimum penetration depth; non-negative when colliding.
    pub depth: f64,
    /// Contact points; empty iff separated (or the clip degenerated).
    pub contacts: ContactManifold,
}

impl BoxBoxResult {
    /// Whether the boxes overlap.
    #[must_use]
    pub fn is_collide(&self) -> bool {
        self.code != 0
    }

    /// Whether the winning axis was an edge-edge cross product.
    #[must_use]
    pub fn is_edge_contact(&self) -> bool {
        self.code > 6
    }

    fn separated() -> Self {
        Self {
            code: 0,
            normal: Vector3::zeros(),
            depth: 0.0,
            contacts: ContactManifold::new(),
        }
    }
}

/// Closest-approach parameters of two lines `pa + alpha*ua`, `pb + beta*ub`
/// with unit directions.
///
/// Near-parallel lines return `(0, 0)` so the caller keeps its pre-chosen
/// reference points.
pub(crate) fn line_closest_approach(
    pa: &Vector3<f64>,
    ua: &Vector3<f64>,
    pb: &Vector3<f64>,
    ub: &Vector3<f64>,
) -> (f64, f64) {
    let p = pb - pa;
    let uaub = ua.dot(ub);
    let q1 = ua.dot(&p);
    let q2 = -ub.dot(&p);
    let d = 1.0 - uaub * uaub;
    if d <= PARALLEL_LINE_THRESHOLD {
        (0.0, 0.0)
    } else {
        let d = 1.0 / d;
        ((q1 + uaub * q2) * d, (uaub * q1 + q2) * d)
    }
}

/// Best separating axis found so far.
#[derive(Clone, Copy)]
enum BestAxis {
    /// Column of box 1's rotation.
    Face1(usize),
    /// Column of box 2's rotation.
    Face2(usize),
    /// Normalized edge-edge cross product, in box 1's local frame.
    Edge(Vector3<f64>),
}

/// Box/box collision with manifold generation.
///
/// `side1` and `side2` are the full side lengths (twice the half-extents);
/// both must be strictly positive, which callers ensure. `max_contacts` is
/// clamped to `[1, 8]` silently.
#[must_use]
#[allow(clippy::too_many_lines)] // One pass over 15 axes plus two contact paths; splitting obscures the order dependence
pub fn box_box(
    side1: &Vector3<f64>,
    tf1: &Pose,
    side2: &Vector3<f64>,
    tf2: &Pose,
    max_contacts: usize,
) -> BoxBoxResult {
    let max_contacts = max_contacts.clamp(1, MAX_MANIFOLD_POINTS);

    let r1 = tf1.rotation_matrix();
    let r2 = tf2.rotation_matrix();
    let t1 = tf1.translation();
    let t2 = tf2.translation();

    // Center offset in world coordinates, and expressed in box 1's frame
    let p = t2 - t1;
    let pp = r1.transpose() * p;

    // Half extents
    let a = side1 * 0.5;
    let b = side2 * 0.5;

    // Relative rotation and its absolute value
    let rel: Matrix3<f64> = r1.transpose() * r2;
    let mut abs_rel = rel.abs();

    let mut s = f64::NEG_INFINITY;
    let mut best = BestAxis::Face1(0);
    let mut invert_normal = false;
    let mut code = 0u8;

    // Face normals of box 1 (codes 1-3)
    for i in 0..3 {
        let tmp = pp[i];
        let s2 = tmp.abs()
            - (abs_rel[(i, 0)] * b[0] + abs_rel[(i, 1)] * b[1] + abs_rel[(i, 2)] * b[2] + a[i]);
        if s2 > 0.0 {
            return BoxBoxResult::separated();
        }
        if s2 > s {
            s = s2;
            best = BestAxis::Face1(i);
            invert_normal = tmp < 0.0;
            code = 1 + i as u8;
        }
    }

    // Face normals of box 2 (codes 4-6)
    for j in 0..3 {
        let tmp = r2.column(j).dot(&p);
        let s2 = tmp.abs()
            - (abs_rel[(0, j)] * a[0] + abs_rel[(1, j)] * a[1] + abs_rel[(2, j)] * a[2] + b[j]);
        if s2 > 0.0 {
            return BoxBoxResult::separated();
        }
        if s2 > s {
            s = s2;
            best = BestAxis::Face2(j);
            invert_normal = tmp < 0.0;
            code = 4 + j as u8;
        }
    }

    // Inflate |R| so the edge tests tolerate near-parallel axes; the face
    // tests above are already done and stay unaffected.
    abs_rel.iter_mut().for_each(|q| *q += ABS_ROT_INFLATION);

    // Edge-edge cross products (codes 7-15): axis = u_i x v_j
    for i in 0..3 {
        let i1 = (i + 1) % 3;
        let i2 = (i + 2) % 3;
        for j in 0..3 {
            let j1 = (j + 1) % 3;
            let j2 = (j + 2) % 3;

            let tmp = pp[i2] * rel[(i1, j)] - pp[i1] * rel[(i2, j)];
            let s2 = tmp.abs()
                - (a[i1] * abs_rel[(i2, j)]
                    + a[i2] * abs_rel[(i1, j)]
                    + b[j1] * abs_rel[(i, j2)]
                    + b[j2] * abs_rel[(i, j1)]);
            if s2 > 0.0 {
                return BoxBoxResult::separated();
            }

            // Axis in box 1's frame: e_i x (column j of the relative rotation)
            let mut n = Vector3::zeros();
            n[i1] = -rel[(i2, j)];
            n[i2] = rel[(i1, j)];
            let length = n.norm();
            if length <= f64::EPSILON {
                continue; // Parallel edges give a degenerate axis
            }

            let s2 = s2 / length;
            if s2 * SAT_FACE_BIAS > s {
                s = s2;
                best = BestAxis::Edge(n / length);
                invert_normal = tmp < 0.0;
                code = 7 + (3 * i + j) as u8;
            }
        }
    }

    debug_assert!(code != 0, "overlapping boxes must select an axis");

    // World-space normal, oriented from box 1 toward box 2
    let mut normal = match best {
        BestAxis::Face1(i) => r1.column(i).into_owned(),
        BestAxis::Face2(j) => r2.column(j).into_owned(),
        BestAxis::Edge(n_local) => r1 * n_local,
    };
    if invert_normal {
        normal = -normal;
    }
    let depth = -s;

    let mut contacts = ContactManifold::new();

    if code > 6 {
        // Edge/edge: walk out from each center to a point on the touching
        // edge, then slide to the closest-approach pair of the edge lines.
        let mut pa = t1;
        for j in 0..3 {
            let sign = if r1.column(j).dot(&normal) > 0.0 {
                1.0
            } else {
                -1.0
            };
            pa += r1.column(j) * (a[j] * sign);
        }
        let mut pb = t2;
        for j in 0..3 {
            let sign = if r2.column(j).dot(&normal) > 0.0 {
                -1.0
            } else {
                1.0
            };
            pb += r2.column(j) * (b[j] * sign);
        }

        let ua = r1.column(((code - 7) / 3) as usize).into_owned();
        let ub = r2.column(((code - 7) % 3) as usize).into_owned();
        let (alpha, beta) = line_closest_approach(&pa, &ua, &pb, &ub);
        pa += ua * alpha;
        pb += ub * beta;

        contacts.push(ContactPoint::new(normal, pb, depth));
        return BoxBoxResult {
            code,
            normal,
            depth,
            contacts,
        };
    }

    // Face/something: the winning axis is a face normal. That face is the
    // reference; the incident face is the other box's face most anti-aligned
    // with the normal.
    let reference_is_body1 = code <= 3;
    let (ra, rb, ta, tb, sa, sb) = if reference_is_body1 {
        (&r1, &r2, t1, t2, &a, &b)
    } else {
        (&r2, &r1, t2, t1, &b, &a)
    };

    // Normal pointing away from the reference body
    let normal2 = if reference_is_body1 { normal } else { -normal };

    // Reference normal in the incident body's frame, and its componentwise
    // magnitudes; the largest component names the incident face axis.
    let nr = rb.transpose() * normal2;
    let anr = nr.abs();

    let (lanr, a1, a2) = if anr[1] > anr[0] {
        if anr[1] > anr[2] {
            (1, 0, 2)
        } else {
            (2, 0, 1)
        }
    } else if anr[0] > anr[2] {
        (0, 1, 2)
    } else {
        (2, 0, 1)
    };

    // Center of the incident face, relative to the reference center
    let center = if nr[lanr] < 0.0 {
        tb - ta + rb.column(lanr) * sb[lanr]
    } else {
        tb - ta - rb.column(lanr) * sb[lanr]
    };

    // Reference face axes: normal axis and the two in-plane axes
    let code_n = if reference_is_body1 {
        (code - 1) as usize
    } else {
        (code - 4) as usize
    };
    let (code1, code2) = match code_n {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    // Incident face corners projected into the reference face's 2D frame
    let c1 = ra.column(code1).dot(&center);
    let c2 = ra.column(code2).dot(&center);
    let m11 = rb.column(a1).dot(&ra.column(code1));
    let m12 = rb.column(a2).dot(&ra.column(code1));
    let m21 = rb.column(a1).dot(&ra.column(code2));
    let m22 = rb.column(a2).dot(&ra.column(code2));

    let k1 = m11 * sb[a1];
    let k2 = m21 * sb[a1];
    let k3 = m12 * sb[a2];
    let k4 = m22 * sb[a2];
    let quad = [
        [c1 - k1 - k3, c2 - k2 - k4],
        [c1 - k1 + k3, c2 - k2 + k4],
        [c1 + k1 + k3, c2 + k2 + k4],
        [c1 + k1 - k3, c2 + k2 - k4],
    ];

    let rect = [sa[code1], sa[code2]];
    let (clipped, n_intersect) = intersect_rect_quad(rect, quad);
    if n_intersect < 1 {
        // Degenerate clip (zero-area incident projection); report the SAT
        // outcome without points.
        return BoxBoxResult {
            code,
            normal,
            depth,
            contacts,
        };
    }

    // Back-project each clipped 2D point onto the incident face and keep
    // the ones that actually penetrate the reference face.
    let det = m11 * m22 - m12 * m21;
    if det.abs() < f64::EPSILON {
        return BoxBoxResult {
            code,
            normal,
            depth,
            contacts,
        };
    }
    let det1 = 1.0 / det;
    let m11 = m11 * det1;
    let m12 = m12 * det1;
    let m21 = m21 * det1;
    let m22 = m22 * det1;

    let mut points = [Vector3::zeros(); MAX_MANIFOLD_POINTS];
    let mut depths = [0.0; MAX_MANIFOLD_POINTS];
    let mut planar = [[0.0; 2]; MAX_MANIFOLD_POINTS];
    let mut cnum = 0usize;
    for j in 0..n_intersect {
        let k1 = m22 * (clipped[j][0] - c1) - m12 * (clipped[j][1] - c2);
        let k2 = -m21 * (clipped[j][0] - c1) + m11 * (clipped[j][1] - c2);
        let point = center + rb.column(a1) * k1 + rb.column(a2) * k2;
        let dep = sa[code_n] - normal2.dot(&point);
        if dep >= 0.0 {
            points[cnum] = point;
            depths[cnum] = dep;
            planar[cnum] = clipped[j];
            cnum += 1;
        }
    }
    if cnum < 1 {
        return BoxBoxResult {
            code,
            normal,
            depth,
            contacts,
        };
    }

    // Contact position: reference-relative point lifted back to world. When
    // the reference is body 2, shift by the penetration so positions stay on
    // the incident (body 1) surface.
    let emit = |points: &[Vector3<f64>], depths: &[f64], j: usize, contacts: &mut ContactManifold| {
        let position = if reference_is_body1 {
            points[j] + ta
        } else {
            points[j] + ta - normal * depths[j]
        };
        contacts.push(ContactPoint::new(normal, position, depths[j]));
    };

    let maxc = max_contacts.min(cnum);
    if cnum <= maxc {
        for j in 0..cnum {
            emit(&points, &depths, j, &mut contacts);
        }
    } else {
        // Over budget: cull, keeping the deepest point first
        let mut deepest = 0;
        for j in 1..cnum {
            if depths[j] > depths[deepest] {
                deepest = j;
            }
        }
        for &j in &cull_points(&planar[..cnum], maxc, deepest) {
            emit(&points, &depths, j, &mut contacts);
        }
    }

    BoxBoxResult {
        code,
        normal,
        depth,
        contacts,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, UnitQuaternion};
    use std::f64::consts::FRAC_PI_4;

    fn pose(x: f64, y: f64, z: f64) -> Pose {
        Pose::from_position(Point3::new(x, y, z))
    }

    #[test]
    fn aligned_face_contact() {
        // Unit boxes offset 0.9 along X: 0.1 overlap, four face contacts
        let side = Vector3::repeat(1.0);
        let result = box_box(&side, &pose(0.0, 0.0, 0.0), &side, &pose(0.9, 0.0, 0.0), 4);

        assert_eq!(result.code, 1);
        assert!(result.is_collide());
        assert!(!result.is_edge_contact());
        assert_relative_eq!(result.depth, 0.1, epsilon = 1e-12);
        assert_relative_eq!(result.normal.x, 1.0, epsilon = 1e-12);
        assert_eq!(result.contacts.len(), 4);
        for c in &result.contacts {
            assert_relative_eq!(c.depth, 0.1, epsilon = 1e-12);
            // Points lie on the incident (body 2) face at x = 0.4
            assert_relative_eq!(c.position.x, 0.4, epsilon = 1e-12);
            assert_relative_eq!(c.normal.x, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn aligned_separated() {
        let side = Vector3::repeat(1.0);
        let result = box_box(&side, &pose(0.0, 0.0, 0.0), &side, &pose(1.1, 0.0, 0.0), 4);

        assert_eq!(result.code, 0);
        assert!(!result.is_collide());
        assert!(result.contacts.is_empty());
    }

    #[test]
    fn touching_faces_still_collide() {
        // Exactly touching counts as contact: separation requires s2 > 0
        let side = Vector3::repeat(1.0);
        let result = box_box(&side, &pose(0.0, 0.0, 0.0), &side, &pose(1.0, 0.0, 0.0), 4);

        assert_eq!(result.code, 1);
        assert_relative_eq!(result.depth, 0.0, epsilon = 1e-12);
        assert_eq!(result.contacts.len(), 4);
    }

    #[test]
    fn crossed_beams_edge_contact() {
        // Two long diamond-profile beams crossed at right angles, ridge on
        // ridge, overlapping by ~0.0128 vertically. The winning axis must be
        // the edge-edge cross product of the two ridge directions.
        let side1 = Vector3::new(4.0, 0.2, 0.2);
        let side2 = Vector3::new(0.2, 4.0, 0.2);
        let tf1 = Pose::from_position_rotation(
            Point3::origin(),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_4),
        );
        let tf2 = Pose::from_position_rotation(
            Point3::new(0.0, 0.0, 0.27),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_4),
        );

        let result = box_box(&side1, &tf1, &side2, &tf2, 4);

        assert!(result.is_collide());
        assert!(result.is_edge_contact(), "code = {}", result.code);
        assert_eq!(result.contacts.len(), 1);
        // Ridges run along x and y; their cross product is the z axis
        assert_relative_eq!(result.normal.z, 1.0, epsilon = 1e-9);
        // The |R| inflation perturbs edge depths by a few 1e-7
        let expected_depth = 0.2 * std::f64::consts::SQRT_2 - 0.27;
        assert_relative_eq!(result.depth, expected_depth, epsilon = 1e-5);
        // Contact sits near the ridge crossing
        assert!(result.contacts[0].position.xy().norm() < 0.05);
    }

    #[test]
    fn containment_reports_shortest_escape_axis() {
        // Small box fully inside a big one, closest to the +X face
        let big = Vector3::repeat(3.0);
        let small = Vector3::repeat(1.0);
        let result = box_box(&big, &pose(0.0, 0.0, 0.0), &small, &pose(0.2, 0.1, 0.0), 8);

        assert!(result.is_collide());
        assert_eq!(result.code, 1);
        assert_relative_eq!(result.normal.x, 1.0, epsilon = 1e-12);
        // Escape along +X: half sums 1.5 + 0.5 minus the 0.2 offset
        assert_relative_eq!(result.depth, 1.8, epsilon = 1e-12);
        assert!(!result.contacts.is_empty());
        for c in &result.contacts {
            assert!(c.depth >= 0.0);
        }
    }

    #[test]
    fn manifold_respects_the_contact_budget() {
        // Identical overlapping boxes produce a full 4-corner clip; ask for 2
        let side = Vector3::repeat(1.0);
        let result = box_box(&side, &pose(0.0, 0.0, 0.0), &side, &pose(0.8, 0.0, 0.0), 2);

        assert_eq!(result.contacts.len(), 2);
        // Culled output leads with the deepest point
        assert!(result.contacts[0].depth >= result.contacts[1].depth);
    }

    #[test]
    fn max_contacts_is_clamped_silently() {
        let side = Vector3::repeat(1.0);
        let zero = box_box(&side, &pose(0.0, 0.0, 0.0), &side, &pose(0.9, 0.0, 0.0), 0);
        let large = box_box(&side, &pose(0.0, 0.0, 0.0), &side, &pose(0.9, 0.0, 0.0), 64);

        assert_eq!(zero.contacts.len(), 1);
        assert_eq!(large.contacts.len(), 4);
    }

    #[test]
    fn rotated_face_contact_prefers_face_over_edge() {
        // Box 2 rotated 45 degrees about Z, corner pressed into box 1's +X
        // face: the face axis must win despite the deep edge candidates.
        let side = Vector3::repeat(1.0);
        let tf2 = Pose::from_position_rotation(
            Point3::new(1.15, 0.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_4),
        );
        let result = box_box(&side, &pose(0.0, 0.0, 0.0), &side, &tf2, 4);

        assert!(result.is_collide());
        assert_eq!(result.code, 1);
        assert_relative_eq!(result.normal.x, 1.0, epsilon = 1e-12);
        let expected_depth = 0.5 + 0.5 * std::f64::consts::SQRT_2 - 1.15;
        assert_relative_eq!(result.depth, expected_depth, epsilon = 1e-12);
    }

    #[test]
    fn symmetry_of_depth_and_normal() {
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

        assert_eq!(ab.is_collide(), ba.is_collide());
        if ab.is_collide() {
            assert_relative_eq!(ab.depth, ba.depth, epsilon = 1e-9);
            assert_relative_eq!((ab.normal + ba.normal).norm(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn every_contact_satisfies_the_boundary_invariants() {
        let side1 = Vector3::new(1.0, 1.0, 1.0);
        let side2 = Vector3::new(1.4, 0.6, 1.0);
        let tf1 = pose(0.0, 0.0, 0.0);
        let tf2 = Pose::from_position_rotation(
            Point3::new(0.7, 0.2, 0.1),
            UnitQuaternion::from_euler_angles(0.2, -0.1, 0.4),
        );

        let result = box_box(&side1, &tf1, &side2, &tf2, 8);
        assert!(result.is_collide());

        let center_line = tf2.position - tf1.position;
        for c in &result.contacts {
            assert!(c.depth >= 0.0);
            assert_relative_eq!(c.normal.norm(), 1.0, epsilon = 4.0 * f64::EPSILON);
            // Normal points from body 1 toward body 2
            assert!(center_line.dot(&c.normal) >= -1e-9);
        }
    }

    #[test]
    fn translation_invariance() {
        let side = Vector3::repeat(1.0);
        let shift = Vector3::new(3.0, -7.0, 11.0);
        let tf1 = pose(0.0, 0.0, 0.0);
        let tf2 = Pose::from_position_rotation(
            Point3::new(0.8, 0.1, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, 0.3),
        );
        let tf1s = Pose::from_position_rotation(tf1.position + shift, tf1.rotation);
        let tf2s = Pose::from_position_rotation(tf2.position + shift, tf2.rotation);

        let base = box_box(&side, &tf1, &side, &tf2, 8);
        let moved = box_box(&side, &tf1s, &side, &tf2s, 8);

        assert_eq!(base.code, moved.code);
        assert_relative_eq!(base.depth, moved.depth, epsilon = 16.0 * f64::EPSILON);
        assert_relative_eq!(
            (base.normal - moved.normal).norm(),
            0.0,
            epsilon = 16.0 * f64::EPSILON
        );
        assert_eq!(base.contacts.len(), moved.contacts.len());
        for (c0, c1) in base.contacts.iter().zip(moved.contacts.iter()) {
            assert_relative_eq!(
                (c1.position - shift - c0.position).norm(),
                0.0,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn rotation_equivariance() {
        let side = Vector3::repeat(1.0);
        let tf1 = pose(0.0, 0.0, 0.0);
        let tf2 = Pose::from_position_rotation(
            Point3::new(0.8, 0.1, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, 0.3),
        );
        let rot = UnitQuaternion::from_euler_angles(0.5, -0.3, 0.9);
        let rotate = |tf: &Pose| {
            Pose::from_position_rotation(Point3::from(rot * tf.position.coords), rot * tf.rotation)
        };

        let base = box_box(&side, &tf1, &side, &tf2, 8);
        let turned = box_box(&side, &rotate(&tf1), &side, &rotate(&tf2), 8);

        assert_eq!(base.code, turned.code);
        assert_relative_eq!(base.depth, turned.depth, epsilon = 64.0 * f64::EPSILON);
        assert_relative_eq!(
            (turned.normal - rot * base.normal).norm(),
            0.0,
            epsilon = 1e-9
        );
        assert_eq!(base.contacts.len(), turned.contacts.len());
        for (c0, c1) in base.contacts.iter().zip(turned.contacts.iter()) {
            assert_relative_eq!((c1.position - rot * c0.position).norm(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn line_closest_approach_crossing_lines() {
        // Line A along X at origin, line B along Y through (1, 0, 1)
        let (alpha, beta) = line_closest_approach(
            &Vector3::zeros(),
            &Vector3::x(),
            &Vector3::new(1.0, -2.0, 1.0),
            &Vector3::y(),
        );
        assert_relative_eq!(alpha, 1.0, epsilon = 1e-12);
        assert_relative_eq!(beta, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn line_closest_approach_parallel_returns_zero() {
        let (alpha, beta) = line_closest_approach(
            &Vector3::zeros(),
            &Vector3::x(),
            &Vector3::new(0.0, 1.0, 0.0),
            &Vector3::x(),
        );
        assert_eq!(alpha, 0.0);
        assert_eq!(beta, 0.0);
    }
}
