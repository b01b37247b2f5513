//! Collision geometry leaves.
//!
//! [`CollisionGeometry`] enumerates the primitive shapes the engine
//! recognizes. Each shape is described in its local frame (boxes centered at
//! the origin and axis-aligned, capsules and cylinders along local Z) and
//! carries no pose; queries pair a geometry with a [`prox_types::Pose`].
//!
//! Only the convex solids participate in the simplex distance oracle, and
//! only the box/box pair has a dedicated manifold solver; the remaining
//! pairs are dispatched to collaborator routines or rejected as unsupported.

use nalgebra::{Point3, Vector3};
use std::sync::Arc;

use crate::mesh::TriangleMeshData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Collision geometry for a rigid body.
#[derive(Debug, Clone)]
pub enum CollisionGeometry {
    /// Sphere with given radius.
    Sphere {
        /// Sphere radius. Must be positive.
        radius: f64,
    },
    /// Box with half-extents, axis-aligned in its local frame.
    Box {
        /// Half-extents along each local axis. All components must be positive.
        half_extents: Vector3<f64>,
    },
    /// Capsule (cylinder with hemispherical caps) along local Z.
    Capsule {
        /// Half-length of the cylindrical portion. Must be non-negative.
        half_length: f64,
        /// Radius. Must be positive.
        radius: f64,
    },
    /// Cylinder along local Z.
    Cylinder {
        /// Half-length along Z. Must be positive.
        half_length: f64,
        /// Radius. Must be positive.
        radius: f64,
    },
    /// Cone along local Z, apex at `+half_length`, base disc at `-half_length`.
    Cone {
        /// Half-length along Z. Must be positive.
        half_length: f64,
        /// Base radius. Must be positive.
        radius: f64,
    },
    /// Ellipsoid (scaled sphere).
    Ellipsoid {
        /// Radii along each local axis. All components must be positive.
        radii: Vector3<f64>,
    },
    /// Convex hull of a vertex set.
    ConvexMesh {
        /// Hull vertices in local coordinates. Must have at least 4 vertices.
        vertices: Vec<Point3<f64>>,
    },
    /// A single triangle.
    Triangle {
        /// The three vertices in local coordinates.
        vertices: [Point3<f64>; 3],
    },
    /// Non-convex triangle mesh.
    TriangleMesh {
        /// The mesh data.
        data: Arc<TriangleMeshData>,
    },
    /// Infinite plane `normal . x = distance`.
    Plane {
        /// Unit normal of the plane.
        normal: Vector3<f64>,
        /// Distance from the origin along the normal.
        distance: f64,
    },
    /// Half-space `normal . x <= distance`.
    HalfSpace {
        /// Unit outward normal.
        normal: Vector3<f64>,
        /// Distance from the origin along the normal.
        distance: f64,
    },
}

impl CollisionGeometry {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a sphere.
    ///
    /// # Panics
    ///
    /// Debug builds panic if `radius` is not positive and finite.
    #[must_use]
    pub fn sphere(radius: f64) -> Self {
        debug_assert!(
            radius > 0.0 && radius.is_finite(),
            "sphere radius must be positive and finite, got {radius}"
        );
        Self::Sphere { radius }
    }

    /// Create a box from half-extents.
    ///
    /// # Panics
    ///
    /// Debug builds panic if any half-extent is not positive and finite.
    #[must_use]
    pub fn box_shape(half_extents: Vector3<f64>) -> Self {
        debug_assert!(
            half_extents.iter().all(|&h| h > 0.0 && h.is_finite()),
            "box half-extents must be positive and finite, got {half_extents:?}"
        );
        Self::Box { half_extents }
    }

    /// Create a box from full side lengths.
    #[must_use]
    pub fn box_from_sides(sides: Vector3<f64>) -> Self {
        Self::box_shape(sides * 0.5)
    }

    /// Create a capsule along local Z.
    #[must_use]
    pub fn capsule(half_length: f64, radius: f64) -> Self {
        debug_assert!(half_length >= 0.0, "capsule half-length must be non-negative");
        debug_assert!(radius > 0.0, "capsule radius must be positive");
        Self::Capsule {
            half_length,
            radius,
        }
    }

    /// Create a cylinder along local Z.
    #[must_use]
    pub fn cylinder(half_length: f64, radius: f64) -> Self {
        debug_assert!(half_length > 0.0, "cylinder half-length must be positive");
        debug_assert!(radius > 0.0, "cylinder radius must be positive");
        Self::Cylinder {
            half_length,
            radius,
        }
    }

    /// Create a cone along local Z.
    #[must_use]
    pub fn cone(half_length: f64, radius: f64) -> Self {
        debug_assert!(half_length > 0.0, "cone half-length must be positive");
        debug_assert!(radius > 0.0, "cone radius must be positive");
        Self::Cone {
            half_length,
            radius,
        }
    }

    /// Create an ellipsoid.
    #[must_use]
    pub fn ellipsoid(radii: Vector3<f64>) -> Self {
        debug_assert!(
            radii.iter().all(|&r| r > 0.0 && r.is_finite()),
            "ellipsoid radii must be positive and finite, got {radii:?}"
        );
        Self::Ellipsoid { radii }
    }

    /// Create a convex hull from vertices.
    ///
    /// # Panics
    ///
    /// Debug builds panic with fewer than 4 vertices.
    #[must_use]
    pub fn convex_mesh(vertices: Vec<Point3<f64>>) -> Self {
        debug_assert!(
            vertices.len() >= 4,
            "convex mesh needs at least 4 vertices, got {}",
            vertices.len()
        );
        Self::ConvexMesh { vertices }
    }

    /// Create a single-triangle geometry.
    #[must_use]
    pub fn triangle(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self::Triangle {
            vertices: [v0, v1, v2],
        }
    }

    /// Create a triangle-mesh geometry.
    #[must_use]
    pub fn triangle_mesh(data: Arc<TriangleMeshData>) -> Self {
        Self::TriangleMesh { data }
    }

    /// Create a plane.
    #[must_use]
    pub fn plane(normal: Vector3<f64>, distance: f64) -> Self {
        debug_assert!(
            (normal.norm() - 1.0).abs() < 1e-9,
            "plane normal must be unit length"
        );
        Self::Plane { normal, distance }
    }

    /// Create a half-space.
    #[must_use]
    pub fn half_space(normal: Vector3<f64>, distance: f64) -> Self {
        debug_assert!(
            (normal.norm() - 1.0).abs() < 1e-9,
            "half-space normal must be unit length"
        );
        Self::HalfSpace { normal, distance }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Short name of the geometry kind, used in dispatch diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Box { .. } => "box",
            Self::Capsule { .. } => "capsule",
            Self::Cylinder { .. } => "cylinder",
            Self::Cone { .. } => "cone",
            Self::Ellipsoid { .. } => "ellipsoid",
            Self::ConvexMesh { .. } => "convex-mesh",
            Self::Triangle { .. } => "triangle",
            Self::TriangleMesh { .. } => "triangle-mesh",
            Self::Plane { .. } => "plane",
            Self::HalfSpace { .. } => "half-space",
        }
    }

    /// Whether the shape is a bounded convex solid (usable by the simplex
    /// distance oracle).
    #[must_use]
    pub fn is_convex_solid(&self) -> bool {
        matches!(
            self,
            Self::Sphere { .. }
                | Self::Box { .. }
                | Self::Capsule { .. }
                | Self::Cylinder { .. }
                | Self::Cone { .. }
                | Self::Ellipsoid { .. }
                | Self::ConvexMesh { .. }
                | Self::Triangle { .. }
        )
    }

    /// Radius of the smallest origin-centered bounding sphere in the local
    /// frame. Infinite for unbounded shapes.
    #[must_use]
    pub fn bounding_radius(&self) -> f64 {
        match self {
            Self::Sphere { radius } => *radius,
            Self::Box { half_extents } => half_extents.norm(),
            Self::Capsule {
                half_length,
                radius,
            } => half_length + radius,
            Self::Cylinder {
                half_length,
                radius,
            }
            | Self::Cone {
                half_length,
                radius,
            } => (half_length * half_length + radius * radius).sqrt(),
            Self::Ellipsoid { radii } => radii.max(),
            Self::ConvexMesh { vertices } => vertices
                .iter()
                .map(|v| v.coords.norm())
                .fold(0.0, f64::max),
            Self::Triangle { vertices } => vertices
                .iter()
                .map(|v| v.coords.norm())
                .fold(0.0, f64::max),
            Self::TriangleMesh { data } => data
                .vertices()
                .iter()
                .map(|v| v.coords.norm())
                .fold(0.0, f64::max),
            Self::Plane { .. } | Self::HalfSpace { .. } => f64::INFINITY,
        }
    }

    /// Local-frame axis-aligned bounding box. Unbounded shapes return an
    /// infinite box.
    #[must_use]
    pub fn local_aabb(&self) -> Aabb {
        match self {
            Self::Sphere { radius } => {
                Aabb::from_center(Point3::origin(), Vector3::repeat(*radius))
            }
            Self::Box { half_extents } => Aabb::from_center(Point3::origin(), *half_extents),
            Self::Capsule {
                half_length,
                radius,
            } => Aabb::from_center(
                Point3::origin(),
                Vector3::new(*radius, *radius, half_length + radius),
            ),
            Self::Cylinder {
                half_length,
                radius,
            }
            | Self::Cone {
                half_length,
                radius,
            } => Aabb::from_center(
                Point3::origin(),
                Vector3::new(*radius, *radius, *half_length),
            ),
            Self::Ellipsoid { radii } => Aabb::from_center(Point3::origin(), *radii),
            Self::ConvexMesh { vertices } => Aabb::from_points(vertices.iter().copied()),
            Self::Triangle { vertices } => Aabb::from_points(vertices.iter().copied()),
            Self::TriangleMesh { data } => {
                let (min, max) = data.aabb();
                Aabb::new(min, max)
            }
            Self::Plane { .. } | Self::HalfSpace { .. } => Aabb::new(
                Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
                Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            ),
        }
    }
}

// ============================================================================
// Axis-aligned bounding box
// ============================================================================

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Point3::origin(), Point3::origin())
    }
}

impl Aabb {
    /// Create a box from its corners.
    #[must_use]
    pub const fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Create a box from a center and half-extents.
    #[must_use]
    pub fn from_center(center: Point3<f64>, half_extents: Vector3<f64>) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest box containing all of `points`. Empty input yields the
    /// default (degenerate) box at the origin.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Point3<f64>>) -> Self {
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut any = false;
        for p in points {
            any = true;
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        if any { Self { min, max } } else { Self::default() }
    }

    /// The union of two boxes.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        Self {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Whether the boxes overlap (closed intervals).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }
}
