//! Scene host: the boundary between planning logic and the rendering layer
//!
//! Planning code looks meshes up by name, casts pick rays and creates or
//! disposes visual primitives only through [`SceneHost`]. [`Scene`] is an
//! in-memory host that records every change as a [`SceneEvent`] for a
//! renderer to drain.

use crate::axes::Axis;
use crate::landmarks::Landmark;
use crate::resection::ResectionPlane;
use kneeplan_core::{combined_bounds, Color, Drawable, Point3f, Ray, Transform3D, TriangleMesh};
use std::collections::BTreeMap;

/// Geometry of a visual primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Landmark marker
    Sphere { center: Point3f, diameter: f32 },
    /// Polyline through `points`
    Line { points: Vec<Point3f> },
    /// Square of side `size` in the local XY plane of `transform`
    Plane { transform: Transform3D, size: f32 },
}

/// A named, coloured visual object owned by the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub name: String,
    pub color: Color,
    pub shape: Shape,
}

impl Primitive {
    /// Red marker sphere for a placed landmark
    pub fn marker(landmark: Landmark, center: Point3f, diameter: f32) -> Self {
        Self {
            name: landmark.name().to_string(),
            color: Color::RED,
            shape: Shape::Sphere { center, diameter },
        }
    }

    /// Line primitive for a reference axis, in the axis colour
    pub fn axis(axis: &Axis) -> Self {
        Self::line(axis.kind.name(), axis.start, axis.end, axis.kind.color())
    }

    pub fn line(name: impl Into<String>, a: Point3f, b: Point3f, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            shape: Shape::Line { points: vec![a, b] },
        }
    }

    /// White square for a resection plane
    pub fn resection_plane(plane: &ResectionPlane) -> Self {
        Self {
            name: plane.name.clone(),
            color: Color::WHITE,
            shape: Shape::Plane {
                transform: plane.transform(),
                size: plane.size,
            },
        }
    }

    /// Position as the rendering layer reports it: the sphere centre, the
    /// first line vertex, or the plane origin
    pub fn position(&self) -> Option<Point3f> {
        match &self.shape {
            Shape::Sphere { center, .. } => Some(*center),
            Shape::Line { points } => points.first().copied(),
            Shape::Plane { transform, .. } => Some(transform.origin()),
        }
    }

    /// Distance along `ray` to the primitive; lines are not pickable
    fn pick_distance(&self, ray: &Ray) -> Option<f32> {
        match &self.shape {
            Shape::Sphere { center, diameter } => ray.intersect_sphere(center, diameter * 0.5),
            Shape::Line { .. } => None,
            Shape::Plane { transform, size } => {
                let half = size * 0.5;
                let corners = [(-half, -half), (half, -half), (half, half), (-half, half)]
                    .map(|(x, y)| transform.transform_point(&Point3f::new(x, y, 0.0)));
                ray.intersect_mesh(&TriangleMesh::quad(corners)).map(|hit| hit.t)
            }
        }
    }
}

/// A pick result: which object was hit and where
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub name: String,
    pub point: Point3f,
    pub t: f32,
}

/// Changes the rendering layer must mirror
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Created(Primitive),
    Replaced(Primitive),
    Moved { name: String, position: Point3f },
    Disposed(String),
}

/// The collaborators planning logic needs from a 3D scene
pub trait SceneHost {
    /// Position of a named mesh, if it exists
    fn mesh_position(&self, name: &str) -> Option<Point3f>;

    /// Closest pickable object along `ray`
    fn pick(&self, ray: &Ray) -> Option<PickHit>;

    /// Intersection of `ray` with one named object only
    fn pick_named(&self, name: &str, ray: &Ray) -> Option<PickHit>;

    /// Add a primitive, replacing any object with the same name
    fn create(&mut self, primitive: Primitive);

    /// Remove a named primitive, returning whether it existed
    fn dispose(&mut self, name: &str) -> bool;

    /// Move a named primitive, returning whether it existed
    fn set_position(&mut self, name: &str, position: Point3f) -> bool;
}

/// In-memory scene holding bone meshes and planning primitives
#[derive(Debug, Default)]
pub struct Scene {
    bones: BTreeMap<String, TriangleMesh>,
    primitives: BTreeMap<String, Primitive>,
    events: Vec<SceneEvent>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bone mesh (e.g. "femur", "tibia")
    pub fn add_bone(&mut self, name: impl Into<String>, mesh: TriangleMesh) {
        let name = name.into();
        log::info!("Bone '{}' added with {} faces", name, mesh.face_count());
        self.bones.insert(name, mesh);
    }

    pub fn bone(&self, name: &str) -> Option<&TriangleMesh> {
        self.bones.get(name)
    }

    pub fn primitive(&self, name: &str) -> Option<&Primitive> {
        self.primitives.get(name)
    }

    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.values()
    }

    /// Take the pending change log
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Union of the bone bounding boxes
    pub fn combined_bounds(&self) -> Option<(Point3f, Point3f)> {
        combined_bounds(self.bones.values().map(|mesh| mesh as &dyn Drawable))
    }

    /// Centre of the combined bone bounds, where the camera should look on load
    pub fn framing_target(&self) -> Option<Point3f> {
        self.combined_bounds()
            .map(|(min, max)| nalgebra::center(&min, &max))
    }

    fn pick_bone(name: &str, mesh: &TriangleMesh, ray: &Ray) -> Option<PickHit> {
        ray.intersect_mesh(mesh).map(|hit| PickHit {
            name: name.to_string(),
            point: hit.point,
            t: hit.t,
        })
    }

    fn pick_primitive(primitive: &Primitive, ray: &Ray) -> Option<PickHit> {
        primitive.pick_distance(ray).map(|t| PickHit {
            name: primitive.name.clone(),
            point: ray.point_at(t),
            t,
        })
    }
}

impl SceneHost for Scene {
    fn mesh_position(&self, name: &str) -> Option<Point3f> {
        if let Some(primitive) = self.primitives.get(name) {
            return primitive.position();
        }
        self.bones.get(name).map(|mesh| mesh.center())
    }

    fn pick(&self, ray: &Ray) -> Option<PickHit> {
        let bone_hits = self
            .bones
            .iter()
            .filter_map(|(name, mesh)| Self::pick_bone(name, mesh, ray));
        let primitive_hits = self
            .primitives
            .values()
            .filter_map(|primitive| Self::pick_primitive(primitive, ray));

        bone_hits
            .chain(primitive_hits)
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }

    fn pick_named(&self, name: &str, ray: &Ray) -> Option<PickHit> {
        if let Some(primitive) = self.primitives.get(name) {
            return Self::pick_primitive(primitive, ray);
        }
        self.bones
            .get(name)
            .and_then(|mesh| Self::pick_bone(name, mesh, ray))
    }

    fn create(&mut self, primitive: Primitive) {
        match self.primitives.insert(primitive.name.clone(), primitive.clone()) {
            Some(_) => {
                log::debug!("Primitive '{}' replaced", primitive.name);
                self.events.push(SceneEvent::Replaced(primitive));
            }
            None => {
                log::debug!("Primitive '{}' created", primitive.name);
                self.events.push(SceneEvent::Created(primitive));
            }
        }
    }

    fn dispose(&mut self, name: &str) -> bool {
        if self.primitives.remove(name).is_some() {
            log::debug!("{} found. Disposing now...", name);
            self.events.push(SceneEvent::Disposed(name.to_string()));
            true
        } else {
            false
        }
    }

    fn set_position(&mut self, name: &str, position: Point3f) -> bool {
        let Some(primitive) = self.primitives.get_mut(name) else {
            return false;
        };

        match &mut primitive.shape {
            Shape::Sphere { center, .. } => *center = position,
            Shape::Line { points } => {
                if let Some(first) = points.first().copied() {
                    let delta = position - first;
                    points.iter_mut().for_each(|p| *p += delta);
                }
            }
            Shape::Plane { transform, .. } => {
                *transform = transform.moved_to(&position);
            }
        }

        self.events.push(SceneEvent::Moved {
            name: name.to_string(),
            position,
        });
        true
    }
}
