//! Femoral reference axes derived from landmark pairs

use crate::landmarks::{Landmark, LandmarkSet};
use kneeplan_core::{Color, Point3f, Vector3f};
use serde::{Deserialize, Serialize};

/// The reference axes a plan can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisKind {
    Mechanical,
    Anatomical,
    TransEpicondylar,
    PosteriorCondylar,
}

impl AxisKind {
    pub const ALL: [AxisKind; 4] = [
        AxisKind::Mechanical,
        AxisKind::Anatomical,
        AxisKind::TransEpicondylar,
        AxisKind::PosteriorCondylar,
    ];

    /// Scene name of the axis line
    pub fn name(self) -> &'static str {
        match self {
            AxisKind::Mechanical => "mechanicalAxis",
            AxisKind::Anatomical => "anatomicalAxis",
            AxisKind::TransEpicondylar => "TEAxis",
            AxisKind::PosteriorCondylar => "PCAxis",
        }
    }

    pub fn color(self) -> Color {
        match self {
            AxisKind::Mechanical => Color::RED,
            AxisKind::Anatomical => Color::GREEN,
            AxisKind::TransEpicondylar => Color::BLUE,
            AxisKind::PosteriorCondylar => Color::YELLOW,
        }
    }

    /// Start and end landmarks of the axis
    pub fn landmarks(self) -> (Landmark, Landmark) {
        match self {
            AxisKind::Mechanical => (Landmark::FemurCentre, Landmark::HipCentre),
            AxisKind::Anatomical => (Landmark::FemurProximalCanal, Landmark::FemurDistalCanal),
            AxisKind::TransEpicondylar => (Landmark::MedialEpicondyle, Landmark::LateralEpicondyle),
            AxisKind::PosteriorCondylar => (Landmark::PosteriorMedialPt, Landmark::PosteriorLateralPt),
        }
    }
}

/// A reference axis as the segment between its two landmarks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub kind: AxisKind,
    pub start: Point3f,
    pub end: Point3f,
}

impl Axis {
    pub fn between(kind: AxisKind, start: Point3f, end: Point3f) -> Self {
        Self { kind, start, end }
    }

    /// Build the axis if both of its landmarks are placed
    pub fn from_landmarks(kind: AxisKind, landmarks: &LandmarkSet) -> Option<Self> {
        let (a, b) = kind.landmarks();
        let (start, end) = landmarks.pair(a, b)?;
        Some(Self::between(kind, start, end))
    }

    /// Unit direction from start to end, `None` if the landmarks coincide
    pub fn direction(&self) -> Option<Vector3f> {
        (self.end - self.start).try_normalize(1e-6)
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).norm()
    }

    pub fn midpoint(&self) -> Point3f {
        nalgebra::center(&self.start, &self.end)
    }

    pub fn points(&self) -> [Point3f; 2] {
        [self.start, self.end]
    }
}

/// Every axis whose landmarks are placed, in `AxisKind::ALL` order
pub fn derive_axes(landmarks: &LandmarkSet) -> Vec<Axis> {
    AxisKind::ALL
        .into_iter()
        .filter_map(|kind| Axis::from_landmarks(kind, landmarks))
        .collect()
}

/// Acute angle between two axis lines in degrees, in `[0, 90]`.
/// Axis direction does not matter.
pub fn angle_between(a: &Axis, b: &Axis) -> Option<f32> {
    let da = a.direction()?;
    let db = b.direction()?;
    Some(da.dot(&db).abs().min(1.0).acos().to_degrees())
}
