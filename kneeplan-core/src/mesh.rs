//! Mesh data structures and functionality

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Two-triangle quad from four corners given in winding order
    pub fn quad(corners: [Point3f; 4]) -> Self {
        Self::from_vertices_and_faces(corners.to_vec(), vec![[0, 1, 2], [0, 2, 3]])
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: [usize; 3]) {
        self.faces.push(face);
    }

    /// Corner positions of a face, `None` if the face indexes past the vertex list
    pub fn triangle(&self, face_index: usize) -> Option<[Point3f; 3]> {
        let face = self.faces.get(face_index)?;
        Some([
            *self.vertices.get(face[0])?,
            *self.vertices.get(face[1])?,
            *self.vertices.get(face[2])?,
        ])
    }

    /// Unit normal of a face from its winding. Degenerate faces get a zero
    /// normal; `None` if the face indexes past the vertex list.
    pub fn face_normal(&self, face_index: usize) -> Option<Vector3f> {
        let [v0, v1, v2] = self.triangle(face_index)?;
        Some(
            (v1 - v0)
                .cross(&(v2 - v0))
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vector3f::zeros),
        )
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
