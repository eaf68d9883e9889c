//! Landmark placement from scene picks
//!
//! A pick while a landmark is active either creates that landmark's marker
//! at the picked point or, if the marker already exists, attaches the
//! translation gizmo to it. Markers are never duplicated.

use crate::landmarks::{Landmark, LandmarkSet};
use kneeplan_core::{Point3f, Vector3f};

/// What a pick did to the landmark set
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementOutcome {
    /// No landmark is active, the pick was ignored
    NoActiveLandmark,
    /// The active landmark was placed at the picked point
    Created { landmark: Landmark, position: Point3f },
    /// The active landmark already exists and the gizmo now drives it
    Selected { landmark: Landmark, position: Point3f },
    /// The active landmark is not placed and the pick hit nothing
    Missed { landmark: Landmark },
}

/// Tracks the active landmark and the marker the translation gizmo is attached to
#[derive(Debug, Clone, Default)]
pub struct LandmarkPlacer {
    active: Option<Landmark>,
    attached: Option<Landmark>,
}

impl LandmarkPlacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the landmark subsequent picks apply to
    pub fn set_active(&mut self, landmark: Landmark) {
        self.active = Some(landmark);
    }

    pub fn active(&self) -> Option<Landmark> {
        self.active
    }

    /// Landmark the gizmo currently drives
    pub fn attached(&self) -> Option<Landmark> {
        self.attached
    }

    pub fn detach(&mut self) {
        self.attached = None;
    }

    /// Apply a pick. `hit` is the picked world point, if the pick hit anything.
    pub fn handle_pick(&mut self, landmarks: &mut LandmarkSet, hit: Option<Point3f>) -> PlacementOutcome {
        let Some(landmark) = self.active else {
            return PlacementOutcome::NoActiveLandmark;
        };

        if let Some(position) = landmarks.get(landmark) {
            self.attached = Some(landmark);
            log::debug!("{} already placed, gizmo attached", landmark);
            return PlacementOutcome::Selected { landmark, position };
        }

        self.attached = None;
        match hit {
            Some(position) => {
                landmarks.place(landmark, position);
                self.attached = Some(landmark);
                log::info!(
                    "Placed {} at ({:.2}, {:.2}, {:.2})",
                    landmark.label(),
                    position.x,
                    position.y,
                    position.z
                );
                PlacementOutcome::Created { landmark, position }
            }
            None => PlacementOutcome::Missed { landmark },
        }
    }

    /// Gizmo drag of the attached marker. The gizmo stays world-aligned, so
    /// `delta` is applied in world space as given.
    pub fn drag(&self, landmarks: &mut LandmarkSet, delta: Vector3f) -> Option<(Landmark, Point3f)> {
        let landmark = self.attached?;
        landmarks.translate(landmark, delta).map(|position| (landmark, position))
    }
}
