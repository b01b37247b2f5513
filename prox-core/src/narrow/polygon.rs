//! 2D polygon helpers for face-contact manifold construction.
//!
//! The box/box solver projects the incident face into the reference face's
//! plane, clips it against the reference rectangle
//! ([`intersect_rect_quad`]), and reduces an oversized clip output to a
//! bounded, well-spread manifold ([`cull_points`]).

use smallvec::SmallVec;
use std::f64::consts::PI;

/// Scale substituted for the centroid weight when the polygon's doubled
/// area underflows; keeps the culler finite on degenerate input.
const DEGENERATE_AREA_SCALE: f64 = 1e18;

/// Clip a convex quadrilateral against the rectangle
/// `[-h[0], h[0]] x [-h[1], h[1]]` centered at the origin.
///
/// Successive half-plane clipping against `x = -h0`, `x = +h0`, `y = -h1`,
/// `y = +h1`: for each edge of the working polygon, the leading endpoint is
/// emitted when it lies inside the half-plane, and the edge/line crossing is
/// emitted when the endpoints straddle the line. The working polygon
/// double-buffers between two fixed 8-vertex arrays; a convex clip of a
/// quad against a rectangle cannot exceed 8 vertices, and the pass stops
/// early if it reaches that bound.
///
/// The crossing computation divides by the coordinate span of the edge;
/// straddling endpoints guarantee a nonzero span, so no guard is needed.
///
/// Returns the output vertices (in polygon order) and their count.
pub(crate) fn intersect_rect_quad(h: [f64; 2], quad: [[f64; 2]; 4]) -> ([[f64; 2]; 8], usize) {
    let mut cur = [[0.0; 2]; 8];
    let mut next = [[0.0; 2]; 8];
    cur[..4].copy_from_slice(&quad);
    let mut nq = 4usize;

    for dir in 0..2 {
        for sign in [-1.0, 1.0] {
            if nq == 0 {
                return (cur, 0);
            }
            let mut nr = 0usize;
            for i in 0..nq {
                let p = cur[i];
                let pn = cur[(i + 1) % nq];
                let p_inside = sign * p[dir] <= h[dir];
                let pn_inside = sign * pn[dir] <= h[dir];

                if p_inside {
                    next[nr] = p;
                    nr += 1;
                    if nr == 8 {
                        return (next, 8);
                    }
                }
                if p_inside != pn_inside {
                    let other = 1 - dir;
                    let t = (sign * h[dir] - p[dir]) / (pn[dir] - p[dir]);
                    next[nr][other] = p[other] + (pn[other] - p[other]) * t;
                    next[nr][dir] = sign * h[dir];
                    nr += 1;
                    if nr == 8 {
                        return (next, 8);
                    }
                }
            }
            std::mem::swap(&mut cur, &mut next);
            nq = nr;
        }
    }

    (cur, nq)
}

/// Select `m` of `n` planar points that span the polygon fairly around its
/// centroid.
///
/// The centroid is area-weighted for `n >= 3` (midpoint for 2, the point
/// itself for 1). Each point's angle from the centroid is computed; for
/// `j in 1..m` the still-available point closest in circular distance to
/// the target angle `angle[i0] + j * 2*pi / m` is taken, ties broken toward
/// the lower index. `i0` is always first in the output, and the result
/// holds `m` distinct indices.
///
/// `points.len()` must be in `1..=8`, `m` in `1..=points.len()`, and `i0`
/// a valid index.
pub(crate) fn cull_points(points: &[[f64; 2]], m: usize, i0: usize) -> SmallVec<[usize; 8]> {
    let n = points.len();
    debug_assert!((1..=8).contains(&n));
    debug_assert!((1..=n).contains(&m));
    debug_assert!(i0 < n);

    // Polygon centroid
    let (cx, cy) = match n {
        1 => (points[0][0], points[0][1]),
        2 => (
            0.5 * (points[0][0] + points[1][0]),
            0.5 * (points[0][1] + points[1][1]),
        ),
        _ => {
            let mut a = 0.0;
            let mut cx = 0.0;
            let mut cy = 0.0;
            for i in 0..n - 1 {
                let q = points[i][0] * points[i + 1][1] - points[i + 1][0] * points[i][1];
                a += q;
                cx += q * (points[i][0] + points[i + 1][0]);
                cy += q * (points[i][1] + points[i + 1][1]);
            }
            let q = points[n - 1][0] * points[0][1] - points[0][0] * points[n - 1][1];
            let scale = if (a + q).abs() > f64::EPSILON {
                1.0 / (3.0 * (a + q))
            } else {
                DEGENERATE_AREA_SCALE
            };
            (
                scale * (cx + q * (points[n - 1][0] + points[0][0])),
                scale * (cy + q * (points[n - 1][1] + points[0][1])),
            )
        }
    };

    // Angle of each point around the centroid
    let mut angles = [0.0; 8];
    for (i, p) in points.iter().enumerate() {
        angles[i] = (p[1] - cy).atan2(p[0] - cx);
    }

    let mut available = [true; 8];
    available[i0] = false;
    let mut selected: SmallVec<[usize; 8]> = SmallVec::new();
    selected.push(i0);

    for j in 1..m {
        let mut target = angles[i0] + (j as f64) * (2.0 * PI / m as f64);
        if target > PI {
            target -= 2.0 * PI;
        }

        // Seed with the first free slot so NaN angle data cannot duplicate i0
        let mut pick = (0..n).find(|&i| available[i]).unwrap_or(i0);
        let mut best = f64::INFINITY;
        for (i, &angle) in angles.iter().enumerate().take(n) {
            if !available[i] {
                continue;
            }
            let mut diff = (angle - target).abs();
            if diff > PI {
                diff = 2.0 * PI - diff;
            }
            if diff < best {
                best = diff;
                pick = i;
            }
        }
        available[pick] = false;
        selected.push(pick);
    }

    selected
}
