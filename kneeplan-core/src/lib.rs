//! Core data structures for kneeplan
//!
//! This crate provides the geometric vocabulary shared by the planning
//! crates: points, triangle meshes, transforms, rays and planes.

pub mod point;
pub mod mesh;
pub mod traits;
pub mod transform;
pub mod plane;
pub mod ray;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use traits::*;
pub use transform::*;
pub use plane::*;
pub use ray::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Isometry3, Matrix3, Matrix4, Point3, Rotation3, Unit, UnitQuaternion, Vector3, Vector4};
