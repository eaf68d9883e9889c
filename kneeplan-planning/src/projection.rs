//! Projections of landmark geometry onto a plane

use kneeplan_core::{Plane, Point3f, Ray};

/// Length of the perpendicular guide drawn from a point off a plane
pub const DEFAULT_NORMAL_LENGTH: f32 = 100.0;

/// Orthogonal projection of `point` onto `plane`
pub fn project_point_onto_plane(point: &Point3f, plane: &Plane) -> Point3f {
    plane.project_point(point)
}

/// Project both ends of a segment onto `plane`.
///
/// With the trans-epicondylar landmarks and the resection plane this gives
/// the TEA as seen on the cut surface.
pub fn project_segment_onto_plane(a: &Point3f, b: &Point3f, plane: &Plane) -> (Point3f, Point3f) {
    (plane.project_point(a), plane.project_point(b))
}

/// The point `length` units from `point` along the plane normal
pub fn offset_along_normal(point: &Point3f, plane: &Plane, length: f32) -> Point3f {
    point + plane.normal * length
}

/// Where a pick ray meets the plane, if it does so in front of the ray origin
pub fn project_screen_pick(ray: &Ray, plane: &Plane) -> Option<Point3f> {
    ray.intersect_plane(plane).map(|t| ray.point_at(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kneeplan_core::Vector3f;

    fn horizontal_plane() -> Plane {
        Plane::new(Point3f::new(0.0, 50.0, 0.0), Vector3f::y()).unwrap()
    }

    #[test]
    fn test_segment_projection_flattens_height() {
        let plane = horizontal_plane();
        let (a, b) = project_segment_onto_plane(
            &Point3f::new(-40.0, 20.0, 5.0),
            &Point3f::new(40.0, 80.0, -5.0),
            &plane,
        );
        assert_relative_eq!(a, Point3f::new(-40.0, 50.0, 5.0));
        assert_relative_eq!(b, Point3f::new(40.0, 50.0, -5.0));
    }

    #[test]
    fn test_projection_is_idempotent() {
        let plane = Plane::new(Point3f::new(3.0, 1.0, -2.0), Vector3f::new(0.2, 1.0, -0.4)).unwrap();
        let p = Point3f::new(17.0, -6.0, 11.0);
        let once = project_point_onto_plane(&p, &plane);
        let twice = project_point_onto_plane(&once, &plane);
        assert_relative_eq!(once, twice, epsilon = 1e-4);
        assert_relative_eq!(plane.distance(&once), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_offset_along_normal() {
        let plane = horizontal_plane();
        let p = Point3f::new(1.0, 2.0, 3.0);
        assert_relative_eq!(
            offset_along_normal(&p, &plane, DEFAULT_NORMAL_LENGTH),
            Point3f::new(1.0, 102.0, 3.0)
        );
    }

    #[test]
    fn test_screen_pick_on_plane() {
        let plane = horizontal_plane();
        let ray = Ray::new(Point3f::new(5.0, 500.0, 5.0), -Vector3f::y()).unwrap();
        assert_relative_eq!(project_screen_pick(&ray, &plane).unwrap(), Point3f::new(5.0, 50.0, 5.0));

        let away = Ray::new(Point3f::new(5.0, 500.0, 5.0), Vector3f::y()).unwrap();
        assert!(project_screen_pick(&away, &plane).is_none());
    }
}
