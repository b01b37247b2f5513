//! Triangle mesh geometry.
//!
//! [`TriangleMeshData`] stores vertices and triangles in the mesh's local
//! frame. The polynomial continuous-collision path reads the mesh through a
//! transient displaced copy of its vertex positions; the source mesh itself
//! is never mutated by a query, so meshes can be shared across threads
//! behind an `Arc`.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single triangle defined by three vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// Index of first vertex.
    pub v0: usize,
    /// Index of second vertex.
    pub v1: usize,
    /// Index of third vertex.
    pub v2: usize,
}

impl Triangle {
    /// Create a new triangle from vertex indices.
    #[must_use]
    pub const fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2 }
    }
}

/// Triangle mesh collision data.
///
/// The mesh is defined in local coordinates and paired with a pose at query
/// time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleMeshData {
    /// Vertices in local coordinates.
    vertices: Vec<Point3<f64>>,
    /// Triangle definitions.
    triangles: Vec<Triangle>,
    /// Cached local-frame AABB corners.
    aabb_min: Point3<f64>,
    aabb_max: Point3<f64>,
}

impl TriangleMeshData {
    /// Create a mesh from vertices and a flat index array.
    ///
    /// # Panics
    ///
    /// Panics if `indices.len()` is not a multiple of 3 or any index is out
    /// of bounds.
    #[must_use]
    pub fn new(vertices: Vec<Point3<f64>>, indices: Vec<usize>) -> Self {
        assert!(
            indices.len() % 3 == 0,
            "triangle indices must be a multiple of 3"
        );
        let max_vertex = vertices.len();
        for &idx in &indices {
            assert!(
                idx < max_vertex,
                "triangle index {idx} out of bounds (max: {})",
                max_vertex - 1
            );
        }

        let triangles: Vec<Triangle> = indices
            .chunks(3)
            .map(|chunk| Triangle::new(chunk[0], chunk[1], chunk[2]))
            .collect();

        Self::from_triangles(vertices, triangles)
    }

    /// Create a mesh from vertices and triangles.
    ///
    /// # Panics
    ///
    /// Panics if any triangle index is out of bounds.
    #[must_use]
    pub fn from_triangles(vertices: Vec<Point3<f64>>, triangles: Vec<Triangle>) -> Self {
        let max_vertex = vertices.len();
        for tri in &triangles {
            assert!(
                tri.v0 < max_vertex && tri.v1 < max_vertex && tri.v2 < max_vertex,
                "triangle index out of bounds"
            );
        }

        let (aabb_min, aabb_max) = Self::compute_aabb(&vertices);

        Self {
            vertices,
            triangles,
            aabb_min,
            aabb_max,
        }
    }

    fn compute_aabb(vertices: &[Point3<f64>]) -> (Point3<f64>, Point3<f64>) {
        if vertices.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for v in vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }
        (min, max)
    }

    /// Get the vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Get the triangles.
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Local-frame AABB corners.
    #[must_use]
    pub fn aabb(&self) -> (Point3<f64>, Point3<f64>) {
        (self.aabb_min, self.aabb_max)
    }

    /// Vertex positions of a triangle.
    #[must_use]
    pub fn triangle_vertices(&self, tri: &Triangle) -> (Point3<f64>, Point3<f64>, Point3<f64>) {
        (
            self.vertices[tri.v0],
            self.vertices[tri.v1],
            self.vertices[tri.v2],
        )
    }

    /// The vertex buffer translated by `displacement`.
    ///
    /// The polynomial continuous-collision solver uses this to encode the
    /// end-of-interval geometry without mutating the source mesh.
    #[must_use]
    pub fn displaced_vertices(&self, displacement: &Vector3<f64>) -> Vec<Point3<f64>> {
        self.vertices.iter().map(|v| v + displacement).collect()
    }
}
