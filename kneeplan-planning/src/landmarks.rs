//! Anatomical landmarks and the set of placed landmark positions

use kneeplan_core::{Error, Point3f, Vector3f};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Landmarks a clinician can place on the femur
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Landmark {
    FemurCentre,
    HipCentre,
    FemurProximalCanal,
    FemurDistalCanal,
    MedialEpicondyle,
    LateralEpicondyle,
    DistalMedialPt,
    DistalLateralPt,
    PosteriorMedialPt,
    PosteriorLateralPt,
}

impl Landmark {
    /// All landmarks in menu order
    pub const ALL: [Landmark; 10] = [
        Landmark::FemurCentre,
        Landmark::HipCentre,
        Landmark::FemurProximalCanal,
        Landmark::FemurDistalCanal,
        Landmark::MedialEpicondyle,
        Landmark::LateralEpicondyle,
        Landmark::DistalMedialPt,
        Landmark::DistalLateralPt,
        Landmark::PosteriorMedialPt,
        Landmark::PosteriorLateralPt,
    ];

    /// Scene name of the landmark's marker
    pub fn name(self) -> &'static str {
        match self {
            Landmark::FemurCentre => "femCentre",
            Landmark::HipCentre => "hipCentre",
            Landmark::FemurProximalCanal => "femurProximalCanal",
            Landmark::FemurDistalCanal => "femurDistalCanal",
            Landmark::MedialEpicondyle => "medialEpicondyle",
            Landmark::LateralEpicondyle => "lateralEpicondyle",
            Landmark::DistalMedialPt => "distalMedialPt",
            Landmark::DistalLateralPt => "distalLateralPt",
            Landmark::PosteriorMedialPt => "posteriorMedialPt",
            Landmark::PosteriorLateralPt => "posteriorLateralPt",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Landmark::FemurCentre => "Femur Centre",
            Landmark::HipCentre => "Hip Centre",
            Landmark::FemurProximalCanal => "Femur Proximal Canal",
            Landmark::FemurDistalCanal => "Femur Distal Canal",
            Landmark::MedialEpicondyle => "Medial Epicondyle",
            Landmark::LateralEpicondyle => "Lateral Epicondyle",
            Landmark::DistalMedialPt => "Distal Medial Pt",
            Landmark::DistalLateralPt => "Distal Lateral Pt",
            Landmark::PosteriorMedialPt => "Posterior Medial Pt",
            Landmark::PosteriorLateralPt => "Posterior Lateral Pt",
        }
    }

    /// Look a landmark up by its scene name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|landmark| landmark.name() == name)
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Landmark {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::InvalidData(format!("Unknown landmark: {}", s)))
    }
}

impl TryFrom<String> for Landmark {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Landmark> for String {
    fn from(landmark: Landmark) -> Self {
        landmark.name().to_string()
    }
}

/// Placed landmark positions. Each landmark is either placed once or absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    positions: BTreeMap<Landmark, Point3f>,
}

impl LandmarkSet {
    /// Create an empty landmark set
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a landmark, returning its previous position if it was already placed
    pub fn place(&mut self, landmark: Landmark, position: Point3f) -> Option<Point3f> {
        self.positions.insert(landmark, position)
    }

    pub fn get(&self, landmark: Landmark) -> Option<Point3f> {
        self.positions.get(&landmark).copied()
    }

    pub fn contains(&self, landmark: Landmark) -> bool {
        self.positions.contains_key(&landmark)
    }

    pub fn remove(&mut self, landmark: Landmark) -> Option<Point3f> {
        self.positions.remove(&landmark)
    }

    /// Move a placed landmark by `delta`, returning the new position
    pub fn translate(&mut self, landmark: Landmark, delta: Vector3f) -> Option<Point3f> {
        let position = self.positions.get_mut(&landmark)?;
        *position += delta;
        Some(*position)
    }

    /// Both positions, or `None` if either landmark is missing
    pub fn pair(&self, a: Landmark, b: Landmark) -> Option<(Point3f, Point3f)> {
        Some((self.get(a)?, self.get(b)?))
    }

    /// Placed landmarks in menu order
    pub fn iter(&self) -> impl Iterator<Item = (Landmark, Point3f)> + '_ {
        self.positions.iter().map(|(landmark, position)| (*landmark, *position))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }
}

impl FromIterator<(Landmark, Point3f)> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = (Landmark, Point3f)>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}
