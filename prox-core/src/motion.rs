//! Motion models for continuous collision queries.
//!
//! A [`Motion`] interpolates a pose over the unit time interval. The
//! dispatcher creates one per object per query, repeatedly `integrate`s it
//! to candidate times, and reads back `current_transform`. Motions carry
//! per-query mutable state and must not be shared across concurrent
//! queries; everything else in a query is read-only.
//!
//! The four variants live in one tagged enum; the dispatcher is the only
//! branch point and switches inline, so no per-call virtual dispatch is
//! paid.

use nalgebra::{Unit, Vector3};
use prox_types::{CcdMotionType, Pose};

/// Angle below which a screw decomposition degrades to pure translation.
const SCREW_ANGLE_EPSILON: f64 = 1e-9;

/// Peak speed multiplier of the cubic ease curve (derivative of
/// `3t^2 - 2t^3` at `t = 1/2`).
const EASE_PEAK_RATE: f64 = 1.5;

/// A pose-valued function of `t` in `[0, 1]`.
#[derive(Debug, Clone)]
pub enum Motion {
    /// Fixed rotation, linearly interpolated translation.
    Translation {
        /// Pose at `t = 0`.
        tf_beg: Pose,
        /// Total displacement over the interval.
        delta: Vector3<f64>,
        /// Pose at the last integrated time.
        current: Pose,
    },
    /// LERP translation, SLERP rotation.
    Linear {
        /// Pose at `t = 0`.
        tf_beg: Pose,
        /// Pose at `t = 1`.
        tf_end: Pose,
        /// Pose at the last integrated time.
        current: Pose,
    },
    /// Rotation about a fixed axis line plus translation along the axis.
    Screw {
        /// Pose at `t = 0`.
        tf_beg: Pose,
        /// Pose at `t = 1`, kept for the degenerate fallback.
        tf_end: Pose,
        /// Unit rotation axis.
        axis: Unit<Vector3<f64>>,
        /// Total rotation angle over the interval.
        angle: f64,
        /// A point on the rotation axis line.
        axis_point: Vector3<f64>,
        /// Translation along the axis over the interval.
        along: Vector3<f64>,
        /// Pose at the last integrated time.
        current: Pose,
    },
    /// Cubic-eased interpolation between the endpoint poses.
    Spline {
        /// Pose at `t = 0`.
        tf_beg: Pose,
        /// Pose at `t = 1`.
        tf_end: Pose,
        /// Pose at the last integrated time.
        current: Pose,
    },
}

impl Motion {
    /// Create a motion of the requested kind between two poses.
    #[must_use]
    pub fn new(tf_beg: &Pose, tf_end: &Pose, kind: CcdMotionType) -> Self {
        match kind {
            CcdMotionType::Translation => Self::Translation {
                tf_beg: *tf_beg,
                delta: tf_end.position - tf_beg.position,
                current: *tf_beg,
            },
            CcdMotionType::Linear => Self::Linear {
                tf_beg: *tf_beg,
                tf_end: *tf_end,
                current: *tf_beg,
            },
            CcdMotionType::Screw => Self::new_screw(tf_beg, tf_end),
            CcdMotionType::Spline => Self::Spline {
                tf_beg: *tf_beg,
                tf_end: *tf_end,
                current: *tf_beg,
            },
        }
    }

    /// Screw (Chasles) decomposition of the relative displacement: every
    /// rigid displacement is a rotation about some axis line plus a
    /// translation along that axis.
    fn new_screw(tf_beg: &Pose, tf_end: &Pose) -> Self {
        let delta_rot = tf_end.rotation * tf_beg.rotation.inverse();
        let dp = tf_end.position - tf_beg.position;

        let Some((axis, angle)) = delta_rot.axis_angle() else {
            // No rotation: the screw is a pure translation along dp
            return Self::Screw {
                tf_beg: *tf_beg,
                tf_end: *tf_end,
                axis: Vector3::x_axis(),
                angle: 0.0,
                axis_point: Vector3::zeros(),
                along: dp,
                current: *tf_beg,
            };
        };

        let u = axis.into_inner();
        let along = u * dp.dot(&u);
        let perp = dp - along;
        // Point on the axis line: the rotation alone must carry tf_beg's
        // position across the perpendicular displacement.
        let axis_point =
            tf_beg.position.coords + 0.5 * (perp + u.cross(&perp) / (angle * 0.5).tan());

        Self::Screw {
            tf_beg: *tf_beg,
            tf_end: *tf_end,
            axis,
            angle,
            axis_point,
            along,
            current: *tf_beg,
        }
    }

    /// Set the internal time parameter (clamped to `[0, 1]`) and update the
    /// current pose.
    pub fn integrate(&mut self, t: f64) {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Translation {
                tf_beg,
                delta,
                current,
            } => {
                *current = Pose::from_position_rotation(
                    tf_beg.position + *delta * t,
                    tf_beg.rotation,
                );
            }
            Self::Linear {
                tf_beg,
                tf_end,
                current,
            } => {
                *current = tf_beg.lerp(tf_end, t);
            }
            Self::Screw {
                tf_beg,
                tf_end,
                axis,
                angle,
                axis_point,
                along,
                current,
            } => {
                if angle.abs() < SCREW_ANGLE_EPSILON {
                    *current = tf_beg.lerp(tf_end, t);
                } else {
                    let rot_t = nalgebra::UnitQuaternion::from_axis_angle(axis, *angle * t);
                    let position =
                        *axis_point + rot_t * (tf_beg.position.coords - *axis_point) + *along * t;
                    *current = Pose::from_position_rotation(
                        position.into(),
                        rot_t * tf_beg.rotation,
                    );
                }
            }
            Self::Spline {
                tf_beg,
                tf_end,
                current,
            } => {
                let eased = t * t * (3.0 - 2.0 * t);
                *current = tf_beg.lerp(tf_end, eased);
            }
        }
    }

    /// Pose at the last integrated time (the begin pose before any
    /// `integrate` call).
    #[must_use]
    pub fn current_transform(&self) -> Pose {
        match self {
            Self::Translation { current, .. }
            | Self::Linear { current, .. }
            | Self::Screw { current, .. }
            | Self::Spline { current, .. } => *current,
        }
    }

    /// Total displacement per unit time; defined for the translation
    /// variant only.
    #[must_use]
    pub fn velocity(&self) -> Option<Vector3<f64>> {
        match self {
            Self::Translation { delta, .. } => Some(*delta),
            _ => None,
        }
    }

    /// Upper bound on the per-unit-time displacement of any body point
    /// within `radius` of the body origin.
    ///
    /// Conservative advancement divides the current separation by this
    /// bound; overestimating only slows convergence, underestimating would
    /// skip contacts, so each formula bounds the variant's true peak rate.
    #[must_use]
    pub fn bound_on_motion(&self, radius: f64) -> f64 {
        match self {
            Self::Translation { delta, .. } => delta.norm(),
            Self::Linear { tf_beg, tf_end, .. } => {
                let angle = tf_beg.rotation.angle_to(&tf_end.rotation);
                (tf_end.position - tf_beg.position).norm() + angle * radius
            }
            Self::Screw {
                tf_beg,
                angle,
                axis_point,
                along,
                ..
            } => {
                let arm = radius + (tf_beg.position.coords - axis_point).norm();
                along.norm() + angle.abs() * arm
            }
            Self::Spline { tf_beg, tf_end, .. } => {
                let angle = tf_beg.rotation.angle_to(&tf_end.rotation);
                EASE_PEAK_RATE * ((tf_end.position - tf_beg.position).norm() + angle * radius)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, UnitQuaternion};
    use std::f64::consts::FRAC_PI_2;

    fn translation_pair() -> (Pose, Pose) {
        (
            Pose::from_position(Point3::new(-2.0, 0.0, 0.0)),
            Pose::from_position(Point3::new(2.0, 0.0, 0.0)),
        )
    }

    #[test]
    fn translation_interpolates_position_only() {
        let (beg, end) = translation_pair();
        let mut motion = Motion::new(&beg, &end, CcdMotionType::Translation);

        motion.integrate(0.5);
        let tf = motion.current_transform();
        assert_relative_eq!(tf.position.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(tf.rotation.angle(), 0.0, epsilon = 1e-12);

        assert_eq!(motion.velocity(), Some(Vector3::new(4.0, 0.0, 0.0)));
        assert_relative_eq!(motion.bound_on_motion(10.0), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn integrate_clamps_the_parameter() {
        let (beg, end) = translation_pair();
        let mut motion = Motion::new(&beg, &end, CcdMotionType::Translation);

        motion.integrate(2.0);
        assert_relative_eq!(motion.current_transform().position.x, 2.0, epsilon = 1e-12);
        motion.integrate(-1.0);
        assert_relative_eq!(motion.current_transform().position.x, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn linear_slerps_the_rotation() {
        let beg = Pose::identity();
        let end = Pose::from_position_rotation(
            Point3::new(1.0, 0.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
        );
        let mut motion = Motion::new(&beg, &end, CcdMotionType::Linear);

        motion.integrate(0.5);
        let tf = motion.current_transform();
        assert_relative_eq!(tf.position.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(tf.rotation.angle(), FRAC_PI_2 / 2.0, epsilon = 1e-12);

        assert_eq!(motion.velocity(), None);
    }

    #[test]
    fn screw_matches_the_endpoints() {
        let beg = Pose::from_position(Point3::new(1.0, 0.0, 0.0));
        let end = Pose::from_position_rotation(
            Point3::new(0.0, 1.0, 0.5),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
        );
        let mut motion = Motion::new(&beg, &end, CcdMotionType::Screw);

        motion.integrate(0.0);
        let tf0 = motion.current_transform();
        assert_relative_eq!((tf0.position - beg.position).norm(), 0.0, epsilon = 1e-9);

        motion.integrate(1.0);
        let tf1 = motion.current_transform();
        assert_relative_eq!((tf1.position - end.position).norm(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(
            tf1.rotation.angle_to(&end.rotation),
            0.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn screw_without_rotation_is_a_translation() {
        let (beg, end) = translation_pair();
        let mut motion = Motion::new(&beg, &end, CcdMotionType::Screw);

        motion.integrate(0.25);
        assert_relative_eq!(motion.current_transform().position.x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn spline_matches_endpoints_and_eases_the_middle() {
        let (beg, end) = translation_pair();
        let mut motion = Motion::new(&beg, &end, CcdMotionType::Spline);

        motion.integrate(0.0);
        assert_relative_eq!(motion.current_transform().position.x, -2.0, epsilon = 1e-12);
        motion.integrate(1.0);
        assert_relative_eq!(motion.current_transform().position.x, 2.0, epsilon = 1e-12);
        // Midpoint of the ease curve coincides with the chord midpoint
        motion.integrate(0.5);
        assert_relative_eq!(motion.current_transform().position.x, 0.0, epsilon = 1e-12);
        // But a quarter of the way in, the eased path lags the chord
        motion.integrate(0.25);
        assert!(motion.current_transform().position.x < -1.0);
    }

    #[test]
    fn bounds_dominate_sampled_step_lengths() {
        let beg = Pose::identity();
        let end = Pose::from_position_rotation(
            Point3::new(1.5, -0.5, 0.25),
            UnitQuaternion::from_euler_angles(0.4, 0.2, -0.7),
        );
        let radius = 2.0;

        for kind in [
            CcdMotionType::Translation,
            CcdMotionType::Linear,
            CcdMotionType::Screw,
            CcdMotionType::Spline,
        ] {
            let mut motion = Motion::new(&beg, &end, kind);
            let bound = motion.bound_on_motion(radius);

            // March a body point through time; no step may outrun the bound
            let probe = Vector3::new(0.0, 0.0, radius);
            let steps = 256;
            let mut prev = {
                motion.integrate(0.0);
                let tf = motion.current_transform();
                tf.position.coords + tf.rotation * probe
            };
            for i in 1..=steps {
                let t = f64::from(i) / f64::from(steps);
                motion.integrate(t);
                let tf = motion.current_transform();
                let point = tf.position.coords + tf.rotation * probe;
                let step = (point - prev).norm();
                assert!(
                    step <= bound / f64::from(steps) + 1e-9,
                    "{kind:?}: step {step} exceeds bound rate"
                );
                prev = point;
            }
        }
    }
}
