//! Core traits for kneeplan

use crate::{mesh::*, point::*};

/// Trait for objects with spatial extent
pub trait Drawable {
    /// Get the axis-aligned bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        if self.vertices.is_empty() {
            return (Point3f::origin(), Point3f::origin());
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for vertex in &self.vertices {
            min = min_point(&min, vertex);
            max = max_point(&max, vertex);
        }

        (min, max)
    }
}

/// Union of several bounding boxes, `None` when there are none
pub fn combined_bounds<'a, I>(items: I) -> Option<(Point3f, Point3f)>
where
    I: IntoIterator<Item = &'a dyn Drawable>,
{
    items
        .into_iter()
        .map(|item| item.bounding_box())
        .reduce(|(min_a, max_a), (min_b, max_b)| {
            (min_point(&min_a, &min_b), max_point(&max_a, &max_b))
        })
}
