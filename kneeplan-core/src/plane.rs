//! Infinite planes in point-normal form

use crate::point::*;
use crate::transform::Transform3D;
use crate::{Error, Result};
use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

/// A plane through `point` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub point: Point3f,
    pub normal: Vector3f,
}

impl Plane {
    /// Create a plane from a point on it and a normal. The normal is normalised.
    pub fn new(point: Point3f, normal: Vector3f) -> Result<Self> {
        let normal = normal
            .try_normalize(1e-8)
            .ok_or_else(|| Error::InvalidData("Plane normal must be non-zero".to_string()))?;
        Ok(Self { point, normal })
    }

    /// Create a plane from three points, `None` if they are collinear
    pub fn from_points(p1: &Point3f, p2: &Point3f, p3: &Point3f) -> Option<Self> {
        let v1 = p2 - p1;
        let v2 = p3 - p1;

        let normal = v1.cross(&v2);
        if normal.magnitude() < 1e-8 {
            return None;
        }

        Some(Self {
            point: *p1,
            normal: normal.normalize(),
        })
    }

    /// Create a plane from the equation ax + by + cz + d = 0
    pub fn from_coefficients(a: f32, b: f32, c: f32, d: f32) -> Result<Self> {
        let normal = Vector3f::new(a, b, c);
        let magnitude = normal.magnitude();
        if magnitude < 1e-8 {
            return Err(Error::InvalidData("Plane coefficients describe no plane".to_string()));
        }

        let normal = normal / magnitude;
        let point = Point3f::from(normal * (-d / magnitude));
        Ok(Self { point, normal })
    }

    /// Coefficients [a, b, c, d] where ax + by + cz + d = 0
    pub fn coefficients(&self) -> Vector4<f32> {
        Vector4::new(
            self.normal.x,
            self.normal.y,
            self.normal.z,
            -self.normal.dot(&self.point.coords),
        )
    }

    /// Clip-plane coefficients as renderers consume them: the normal followed
    /// by its dot product with the plane point
    pub fn clip_coefficients(&self) -> Vector4<f32> {
        Vector4::new(
            self.normal.x,
            self.normal.y,
            self.normal.z,
            self.normal.dot(&self.point.coords),
        )
    }

    /// Signed distance from `point` to the plane, positive on the normal side
    pub fn signed_distance(&self, point: &Point3f) -> f32 {
        self.normal.dot(&(point - self.point))
    }

    /// Unsigned distance from `point` to the plane
    pub fn distance(&self, point: &Point3f) -> f32 {
        self.signed_distance(point).abs()
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project_point(&self, point: &Point3f) -> Point3f {
        point - self.normal * self.signed_distance(point)
    }

    /// Whether `point` lies within `tolerance` of the plane
    pub fn contains(&self, point: &Point3f, tolerance: f32) -> bool {
        self.distance(point) <= tolerance
    }

    /// The plane carried through `transform`
    pub fn transformed(&self, transform: &Transform3D) -> Result<Self> {
        let point = transform.transform_point(&self.point);
        // Normals transform by the inverse transpose
        let normal = match transform.inverse() {
            Some(inverse) => inverse.matrix.fixed_view::<3, 3>(0, 0).transpose() * self.normal,
            None => {
                return Err(Error::Algorithm(
                    "Cannot transform plane through a singular transform".to_string(),
                ))
            }
        };
        Self::new(point, normal)
    }
}
