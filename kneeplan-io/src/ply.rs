//! PLY export of planning primitives
//!
//! Markers become lone vertices, axis and guide lines become `edge`
//! elements and resection planes become two-triangle quads in `face`.
//! Every vertex carries the colour of the primitive it belongs to.

use crate::IoError;
use kneeplan_core::{Color, Point3f, Result};
use kneeplan_planning::{Primitive, Shape};
use ply_rs::{
    ply::{Addable, DefaultElement, ElementDef, Ply, Property, PropertyDef, PropertyType, ScalarType},
    writer::Writer,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct PrimitivePlyWriter;

#[derive(Default)]
struct Buffers {
    vertices: Vec<(Point3f, Color)>,
    edges: Vec<[usize; 2]>,
    faces: Vec<[usize; 3]>,
}

impl Buffers {
    fn push_vertex(&mut self, point: Point3f, color: Color) -> usize {
        self.vertices.push((point, color));
        self.vertices.len() - 1
    }

    fn add(&mut self, primitive: &Primitive) {
        match &primitive.shape {
            Shape::Sphere { center, .. } => {
                self.push_vertex(*center, primitive.color);
            }
            Shape::Line { points } => {
                let indices: Vec<usize> = points
                    .iter()
                    .map(|point| self.push_vertex(*point, primitive.color))
                    .collect();
                self.edges.extend(indices.windows(2).map(|pair| [pair[0], pair[1]]));
            }
            Shape::Plane { transform, size } => {
                let half = size * 0.5;
                let base = self.vertices.len();
                for (x, y) in [(-half, -half), (half, -half), (half, half), (-half, half)] {
                    let corner = transform.transform_point(&Point3f::new(x, y, 0.0));
                    self.push_vertex(corner, primitive.color);
                }
                self.faces.push([base, base + 1, base + 2]);
                self.faces.push([base, base + 2, base + 3]);
            }
        }
    }
}

fn scalar(name: &str, scalar_type: ScalarType) -> PropertyDef {
    PropertyDef::new(name.to_string(), PropertyType::Scalar(scalar_type))
}

fn index(value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| {
        IoError::WriteError {
            message: format!("Vertex index {} exceeds PLY int range", value),
        }
        .into()
    })
}

impl PrimitivePlyWriter {
    /// Build the PLY document for a set of primitives
    fn build<'a, I>(primitives: I) -> Result<Ply<DefaultElement>>
    where
        I: IntoIterator<Item = &'a Primitive>,
    {
        let mut buffers = Buffers::default();
        for primitive in primitives {
            buffers.add(primitive);
        }

        let mut ply = Ply::<DefaultElement>::new();
        ply.header.comments.push("kneeplan planning primitives".to_string());

        // Define vertex element
        let mut vertex_element = ElementDef::new("vertex".to_string());
        vertex_element.count = buffers.vertices.len();
        for axis in ["x", "y", "z"] {
            vertex_element.properties.add(scalar(axis, ScalarType::Float));
        }
        for channel in ["red", "green", "blue"] {
            vertex_element.properties.add(scalar(channel, ScalarType::UChar));
        }
        ply.header.elements.add(vertex_element);

        // Define edge element
        let mut edge_element = ElementDef::new("edge".to_string());
        edge_element.count = buffers.edges.len();
        edge_element.properties.add(scalar("vertex1", ScalarType::Int));
        edge_element.properties.add(scalar("vertex2", ScalarType::Int));
        ply.header.elements.add(edge_element);

        // Define face element
        let mut face_element = ElementDef::new("face".to_string());
        face_element.count = buffers.faces.len();
        face_element.properties.add(PropertyDef::new(
            "vertex_indices".to_string(),
            PropertyType::List(ScalarType::UChar, ScalarType::Int),
        ));
        ply.header.elements.add(face_element);

        let vertices = buffers
            .vertices
            .iter()
            .map(|(point, color)| {
                let [r, g, b] = color.to_rgb8();
                let mut vertex = DefaultElement::new();
                vertex.insert("x".to_string(), Property::Float(point.x));
                vertex.insert("y".to_string(), Property::Float(point.y));
                vertex.insert("z".to_string(), Property::Float(point.z));
                vertex.insert("red".to_string(), Property::UChar(r));
                vertex.insert("green".to_string(), Property::UChar(g));
                vertex.insert("blue".to_string(), Property::UChar(b));
                vertex
            })
            .collect();
        ply.payload.insert("vertex".to_string(), vertices);

        let mut edges = Vec::with_capacity(buffers.edges.len());
        for edge in &buffers.edges {
            let mut element = DefaultElement::new();
            element.insert("vertex1".to_string(), Property::Int(index(edge[0])?));
            element.insert("vertex2".to_string(), Property::Int(index(edge[1])?));
            edges.push(element);
        }
        ply.payload.insert("edge".to_string(), edges);

        let mut faces = Vec::with_capacity(buffers.faces.len());
        for face in &buffers.faces {
            let mut element = DefaultElement::new();
            let indices = vec![index(face[0])?, index(face[1])?, index(face[2])?];
            element.insert("vertex_indices".to_string(), Property::ListInt(indices));
            faces.push(element);
        }
        ply.payload.insert("face".to_string(), faces);

        Ok(ply)
    }

    /// Write primitives as an ASCII PLY file
    pub fn write<'a, I, P>(primitives: I, path: P) -> Result<()>
    where
        I: IntoIterator<Item = &'a Primitive>,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let mut ply = Self::build(primitives)?;

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Writer::new().write_ply(&mut writer, &mut ply)?;
        writer.flush()?;

        log::info!(
            "Exported {} vertices to {}",
            ply.payload.get("vertex").map_or(0, |v| v.len()),
            path.display()
        );
        Ok(())
    }
}
