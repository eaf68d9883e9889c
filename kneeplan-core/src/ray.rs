//! Rays and ray intersection queries
//!
//! Screen picks are turned into world-space rays and tested against bone
//! meshes, landmark markers and the resection plane.

use crate::mesh::TriangleMesh;
use crate::plane::Plane;
use crate::point::*;
use crate::{Error, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const EPSILON: f32 = 1e-8;

/// Face count above which mesh intersection fans out over rayon
const PARALLEL_FACE_THRESHOLD: usize = 4096;

/// A half-line starting at `origin` along the unit vector `direction`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3f,
    pub direction: Vector3f,
}

/// The closest intersection of a ray with a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Parametric distance along the ray
    pub t: f32,
    /// World-space hit point
    pub point: Point3f,
    /// Index of the face that was hit
    pub face: usize,
    /// Unit normal of the face that was hit
    pub normal: Vector3f,
}

impl Ray {
    /// Create a ray, normalising `direction`
    pub fn new(origin: Point3f, direction: Vector3f) -> Result<Self> {
        let direction = direction
            .try_normalize(EPSILON)
            .ok_or_else(|| Error::InvalidData("Ray direction must be non-zero".to_string()))?;
        Ok(Self { origin, direction })
    }

    /// Point at parametric distance `t`
    pub fn point_at(&self, t: f32) -> Point3f {
        self.origin + self.direction * t
    }

    /// Ray-triangle intersection using the Möller–Trumbore algorithm.
    ///
    /// Returns the parametric distance of the hit. Hits at or behind the
    /// origin are rejected, as are rays parallel to the triangle.
    pub fn intersect_triangle(&self, v0: &Point3f, v1: &Point3f, v2: &Point3f) -> Option<f32> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = self.direction.cross(&edge2);
        let a = edge1.dot(&h);
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = self.origin - v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * self.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        (t > EPSILON).then_some(t)
    }

    /// Intersection with an infinite plane. `None` when parallel or behind the origin.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<f32> {
        let denom = plane.normal.dot(&self.direction);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = plane.normal.dot(&(plane.point - self.origin)) / denom;
        (t > EPSILON).then_some(t)
    }

    /// Intersection with a sphere; the nearest hit in front of the origin
    pub fn intersect_sphere(&self, center: &Point3f, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(&self.direction);
        let c = oc.norm_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        [-b - root, -b + root].into_iter().find(|t| *t > EPSILON)
    }

    /// Closest intersection with any face of `mesh`
    pub fn intersect_mesh(&self, mesh: &TriangleMesh) -> Option<RayHit> {
        let test_face = |face_index: usize| -> Option<(usize, f32)> {
            let [v0, v1, v2] = mesh.triangle(face_index)?;
            self.intersect_triangle(&v0, &v1, &v2).map(|t| (face_index, t))
        };

        let closest = if mesh.face_count() >= PARALLEL_FACE_THRESHOLD {
            (0..mesh.face_count())
                .into_par_iter()
                .filter_map(test_face)
                .min_by(|a, b| a.1.total_cmp(&b.1))
        } else {
            (0..mesh.face_count())
                .filter_map(test_face)
                .min_by(|a, b| a.1.total_cmp(&b.1))
        };

        let (face, t) = closest?;
        let normal = mesh.face_normal(face)?;

        log::trace!("ray hit face {} at t = {:.3}", face, t);

        Some(RayHit {
            t,
            point: self.point_at(t),
            face,
            normal,
        })
    }
}
