//! Poses handed to the rendering layer

use nalgebra::{Isometry3, Matrix4, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// A homogeneous 4x4 transform.
///
/// Resection planes reach the renderer as a pose in this form: local +Z is
/// the plane normal and the local origin is the plane centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Pure translation by `offset`
    pub fn translation(offset: Vector3<f32>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&offset),
        }
    }

    /// Rigid pose: local axes rotated by `orientation`, local origin at `origin`
    pub fn from_pose(origin: &Point3<f32>, orientation: &UnitQuaternion<f32>) -> Self {
        Self {
            matrix: Isometry3::from_parts(origin.coords.into(), *orientation).to_homogeneous(),
        }
    }

    /// Where the local origin lands in world space
    pub fn origin(&self) -> Point3<f32> {
        Point3::from(self.matrix.fixed_view::<3, 1>(0, 3).into_owned())
    }

    /// The same transform with its origin moved to `origin`
    pub fn moved_to(&self, origin: &Point3<f32>) -> Self {
        let mut matrix = self.matrix;
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&origin.coords);
        Self { matrix }
    }

    pub fn transform_point(&self, point: &Point3<f32>) -> Point3<f32> {
        Point3::from_homogeneous(self.matrix * point.to_homogeneous()).unwrap_or(*point)
    }

    /// Apply the linear part only; translation does not affect directions
    pub fn transform_vector(&self, vector: &Vector3<f32>) -> Vector3<f32> {
        self.matrix.fixed_view::<3, 3>(0, 0) * vector
    }

    /// `None` for a singular matrix
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

/// `a * b` applies `b` first
impl std::ops::Mul for Transform3D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            matrix: self.matrix * rhs.matrix,
        }
    }
}
