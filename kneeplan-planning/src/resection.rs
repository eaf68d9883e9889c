//! Resection (cutting) plane perpendicular to a reference axis
//!
//! The plane is a finite square with a pose: a centre and an orientation
//! whose local +Z is the plane normal and whose local X and Y span the cut.
//! The pose is what the rendering layer receives.

use kneeplan_core::{
    Error, Matrix3, Plane, Point3f, Result, Rotation3, Transform3D, Unit, UnitQuaternion, Vector3f,
};
use serde::{Deserialize, Serialize};

/// A square cutting plane with a rotatable pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResectionPlane {
    pub name: String,
    pub centre: Point3f,
    pub orientation: UnitQuaternion<f32>,
    pub size: f32,
}

/// First in-plane direction for a normal: `normal × X`, or `normal × Y`
/// when the normal runs along X
fn in_plane_axis(normal: &Vector3f) -> Vector3f {
    normal
        .cross(&Vector3f::x())
        .try_normalize(1e-6)
        .or_else(|| normal.cross(&Vector3f::y()).try_normalize(1e-6))
        .unwrap_or_else(Vector3f::y)
}

fn orientation_from_basis(u: &Vector3f, normal: &Vector3f) -> UnitQuaternion<f32> {
    let v = normal.cross(u);
    let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[*u, v, *normal]));
    UnitQuaternion::from_rotation_matrix(&rotation)
}

impl ResectionPlane {
    /// Plane centred on `to`, facing `from`.
    ///
    /// For the mechanical axis `from` is the femur centre and `to` the hip
    /// centre, so the normal runs from hip toward knee.
    pub fn perpendicular_to(name: impl Into<String>, from: Point3f, to: Point3f, size: f32) -> Result<Self> {
        let normal = (from - to).try_normalize(1e-6).ok_or_else(|| {
            Error::Algorithm("Cannot build a plane perpendicular to a zero-length axis".to_string())
        })?;
        if size <= 0.0 {
            return Err(Error::InvalidData("Plane size must be positive".to_string()));
        }

        let u = in_plane_axis(&normal);
        Ok(Self {
            name: name.into(),
            centre: to,
            orientation: orientation_from_basis(&u, &normal),
            size,
        })
    }

    /// Unit normal (local +Z)
    pub fn normal(&self) -> Vector3f {
        self.orientation * Vector3f::z()
    }

    /// First in-plane axis (local +X)
    pub fn u_axis(&self) -> Vector3f {
        self.orientation * Vector3f::x()
    }

    /// Second in-plane axis (local +Y)
    pub fn v_axis(&self) -> Vector3f {
        self.orientation * Vector3f::y()
    }

    pub fn centre(&self) -> Point3f {
        self.centre
    }

    /// The infinite plane this square lies in
    pub fn plane(&self) -> Plane {
        Plane {
            point: self.centre,
            normal: self.normal(),
        }
    }

    /// World pose of the plane for the rendering layer
    pub fn transform(&self) -> Transform3D {
        Transform3D::from_pose(&self.centre, &self.orientation)
    }

    /// Square corners, counter-clockwise around the normal
    pub fn corners(&self) -> [Point3f; 4] {
        let half = self.size * 0.5;
        let u = self.u_axis() * half;
        let v = self.v_axis() * half;
        [
            self.centre - u - v,
            self.centre + u - v,
            self.centre + u + v,
            self.centre - u + v,
        ]
    }

    /// Spin the in-plane axes so that local X follows `hint` projected into
    /// the plane. The normal is unchanged.
    pub fn align_to(&mut self, hint: &Vector3f) -> Result<()> {
        let normal = self.normal();
        let projected = hint - normal * normal.dot(hint);
        let u = projected.try_normalize(1e-6).ok_or_else(|| {
            Error::Algorithm("Alignment direction is parallel to the plane normal".to_string())
        })?;
        self.orientation = orientation_from_basis(&u, &normal);
        Ok(())
    }

    /// Rotate by `angle` radians about a world axis through the centre
    pub fn rotate(&mut self, axis: &Unit<Vector3f>, angle: f32) {
        self.orientation = UnitQuaternion::from_axis_angle(axis, angle) * self.orientation;
    }

    /// Varus/valgus tilt in degrees: rotation about the in-plane Y axis
    pub fn rotate_varus_valgus(&mut self, degrees: f32) {
        let axis = Unit::new_normalize(self.v_axis());
        self.rotate(&axis, degrees.to_radians());
    }

    /// Flexion/extension tilt in degrees: rotation about the in-plane X axis
    pub fn rotate_flexion(&mut self, degrees: f32) {
        let axis = Unit::new_normalize(self.u_axis());
        self.rotate(&axis, degrees.to_radians());
    }

    /// Translate the plane along its normal
    pub fn offset(&mut self, distance: f32) {
        self.centre += self.normal() * distance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mechanical_plane() -> ResectionPlane {
        let femur_centre = Point3f::new(0.0, 0.0, 0.0);
        let hip_centre = Point3f::new(0.0, 400.0, 0.0);
        ResectionPlane::perpendicular_to("mechanicalAxisPlane", femur_centre, hip_centre, 200.0).unwrap()
    }

    #[test]
    fn test_plane_faces_from_point() {
        let plane = mechanical_plane();
        assert_relative_eq!(plane.normal(), -Vector3f::y(), epsilon = 1e-6);
        assert_eq!(plane.centre(), Point3f::new(0.0, 400.0, 0.0));
        assert_eq!(plane.name, "mechanicalAxisPlane");
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let plane = ResectionPlane::perpendicular_to(
            "p",
            Point3f::new(12.0, -3.0, 5.0),
            Point3f::new(-20.0, 380.0, 44.0),
            200.0,
        )
        .unwrap();
        let (u, v, n) = (plane.u_axis(), plane.v_axis(), plane.normal());

        assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(u.dot(&n), 0.0, epsilon = 1e-5);
        assert_relative_eq!(v.dot(&n), 0.0, epsilon = 1e-5);
        assert_relative_eq!(u.cross(&v), n, epsilon = 1e-5);
    }

    #[test]
    fn test_normal_along_x_uses_fallback_axis() {
        let plane = ResectionPlane::perpendicular_to("p", Point3f::new(10.0, 0.0, 0.0), Point3f::origin(), 50.0).unwrap();
        assert_relative_eq!(plane.normal(), Vector3f::x(), epsilon = 1e-6);
        assert_relative_eq!(plane.u_axis().dot(&Vector3f::x()), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_coincident_points_rejected() {
        let p = Point3f::new(1.0, 2.0, 3.0);
        assert!(ResectionPlane::perpendicular_to("p", p, p, 200.0).is_err());
        assert!(ResectionPlane::perpendicular_to("p", p, Point3f::origin(), 0.0).is_err());
    }

    #[test]
    fn test_corners_lie_on_plane() {
        let plane = mechanical_plane();
        let infinite = plane.plane();
        let corners = plane.corners();
        for corner in &corners {
            assert!(infinite.contains(corner, 1e-3));
        }
        assert_relative_eq!((corners[1] - corners[0]).norm(), 200.0, epsilon = 1e-3);
        assert_relative_eq!((corners[2] - corners[0]).norm(), 200.0 * 2f32.sqrt(), epsilon = 1e-3);
    }

    #[test]
    fn test_transform_maps_local_frame() {
        let plane = mechanical_plane();
        let t = plane.transform();
        assert_relative_eq!(t.transform_point(&Point3f::origin()), plane.centre, epsilon = 1e-4);
        assert_relative_eq!(t.transform_vector(&Vector3f::z()), plane.normal(), epsilon = 1e-6);
    }

    #[test]
    fn test_align_keeps_normal() {
        let mut plane = mechanical_plane();
        let normal = plane.normal();
        plane.align_to(&Vector3f::new(1.0, 0.3, 0.0)).unwrap();

        assert_relative_eq!(plane.normal(), normal, epsilon = 1e-5);
        assert_relative_eq!(plane.u_axis(), Vector3f::x(), epsilon = 1e-5);
        assert!(plane.align_to(&Vector3f::y()).is_err());
    }

    #[test]
    fn test_rotations_and_offset() {
        let mut plane = mechanical_plane();
        plane.align_to(&Vector3f::x()).unwrap();

        plane.rotate_varus_valgus(3.0);
        let tilt = plane.normal().dot(&-Vector3f::y()).acos().to_degrees();
        assert_relative_eq!(tilt, 3.0, epsilon = 1e-2);
        assert_eq!(plane.centre, Point3f::new(0.0, 400.0, 0.0));

        plane.rotate_varus_valgus(-3.0);
        plane.rotate_flexion(5.0);
        let tilt = plane.normal().dot(&-Vector3f::y()).acos().to_degrees();
        assert_relative_eq!(tilt, 5.0, epsilon = 1e-2);

        let mut shifted = mechanical_plane();
        shifted.offset(9.0);
        assert_relative_eq!(shifted.centre, Point3f::new(0.0, 391.0, 0.0), epsilon = 1e-4);
    }
}
