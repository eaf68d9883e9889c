//! Planning session: landmark picks, marker drags and the "Update" action

use crate::axes::{angle_between, Axis, AxisKind};
use crate::config::PlanningConfig;
use crate::landmarks::{Landmark, LandmarkSet};
use crate::placement::{LandmarkPlacer, PlacementOutcome};
use crate::projection::project_segment_onto_plane;
use crate::resection::ResectionPlane;
use crate::scene::{Primitive, SceneHost};
use kneeplan_core::{Point3f, Ray, Vector3f};
use serde::{Deserialize, Serialize};

/// Manual adjustments applied to the resection plane after it is rebuilt
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaneAdjustment {
    /// Tilt about the plane's anteroposterior axis, degrees
    #[serde(default)]
    pub varus_valgus: f32,
    /// Tilt about the plane's mediolateral axis, degrees
    #[serde(default)]
    pub flexion: f32,
    /// Shift along the plane normal
    #[serde(default)]
    pub offset: f32,
}

impl PlaneAdjustment {
    fn apply(&self, plane: &mut ResectionPlane) {
        if self.varus_valgus != 0.0 {
            plane.rotate_varus_valgus(self.varus_valgus);
        }
        if self.flexion != 0.0 {
            plane.rotate_flexion(self.flexion);
        }
        if self.offset != 0.0 {
            plane.offset(self.offset);
        }
    }
}

/// Angles between reference axes, degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    /// Mechanical vs anatomical axis
    pub mechanical_anatomical: Option<f32>,
    /// Trans-epicondylar vs posterior condylar axis
    pub epicondylar_condylar: Option<f32>,
}

/// What one update built
#[derive(Debug, Clone, Default)]
pub struct UpdateReport {
    pub axes: Vec<Axis>,
    pub plane: Option<ResectionPlane>,
    /// The TEA projected onto the resection plane
    pub projected_tea: Option<(Point3f, Point3f)>,
    pub measurements: Measurements,
}

impl UpdateReport {
    pub fn axis(&self, kind: AxisKind) -> Option<&Axis> {
        self.axes.iter().find(|axis| axis.kind == kind)
    }
}

/// State of one planning session
#[derive(Debug, Clone, Default)]
pub struct PlanningSession {
    landmarks: LandmarkSet,
    placer: LandmarkPlacer,
    config: PlanningConfig,
    adjustment: PlaneAdjustment,
}

impl PlanningSession {
    pub fn new(config: PlanningConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    pub fn landmarks(&self) -> &LandmarkSet {
        &self.landmarks
    }

    pub fn placer(&self) -> &LandmarkPlacer {
        &self.placer
    }

    pub fn adjustment(&self) -> PlaneAdjustment {
        self.adjustment
    }

    pub fn set_adjustment(&mut self, adjustment: PlaneAdjustment) {
        self.adjustment = adjustment;
    }

    /// Select the landmark the next click places
    pub fn set_active(&mut self, landmark: Landmark) {
        self.placer.set_active(landmark);
    }

    /// Place a landmark directly (e.g. from a saved session) and create its marker
    pub fn place<H: SceneHost>(&mut self, host: &mut H, landmark: Landmark, position: Point3f) {
        self.landmarks.place(landmark, position);
        host.create(Primitive::marker(landmark, position, self.config.markers.diameter));
    }

    /// Re-read marker positions from the host so markers moved by the
    /// rendering layer are honoured
    pub fn sync_from_host<H: SceneHost>(&mut self, host: &H) {
        for landmark in Landmark::ALL {
            match host.mesh_position(landmark.name()) {
                Some(position) => {
                    self.landmarks.place(landmark, position);
                }
                None => {
                    self.landmarks.remove(landmark);
                }
            }
        }
    }

    /// A click in the viewport, already turned into a world ray
    pub fn click<H: SceneHost>(&mut self, host: &mut H, ray: &Ray) -> PlacementOutcome {
        self.sync_from_host(host);

        let hit = host.pick(ray);
        if let Some(hit) = &hit {
            log::debug!("Pick hit '{}' at t = {:.2}", hit.name, hit.t);
        }

        let outcome = self
            .placer
            .handle_pick(&mut self.landmarks, hit.map(|hit| hit.point));

        if let PlacementOutcome::Created { landmark, position } = outcome {
            host.create(Primitive::marker(landmark, position, self.config.markers.diameter));
        }
        outcome
    }

    /// Gizmo drag of the attached marker, starting from where the host
    /// currently has it. A marker the host no longer holds detaches the gizmo.
    pub fn drag<H: SceneHost>(&mut self, host: &mut H, delta: Vector3f) -> Option<(Landmark, Point3f)> {
        self.sync_from_host(host);

        let Some((landmark, position)) = self.placer.drag(&mut self.landmarks, delta) else {
            self.placer.detach();
            return None;
        };

        if !host.set_position(landmark.name(), position) {
            log::warn!("Marker {} is gone from the scene, dropping it", landmark.name());
            self.landmarks.remove(landmark);
            self.placer.detach();
            return None;
        }
        Some((landmark, position))
    }

    /// Rebuild every axis whose landmarks exist, then the resection plane
    pub fn update<H: SceneHost>(&mut self, host: &mut H) -> UpdateReport {
        self.placer.detach();
        self.sync_from_host(host);

        let mut report = UpdateReport::default();

        for kind in AxisKind::ALL {
            let Some(axis) = Axis::from_landmarks(kind, &self.landmarks) else {
                continue;
            };
            if host.dispose(kind.name()) {
                log::debug!("{} line found. Disposing now...", kind.name());
            }
            host.create(Primitive::axis(&axis));
            log::info!("{} updated, length {:.2}", kind.name(), axis.length());
            report.axes.push(axis);
        }

        let tea = report.axis(AxisKind::TransEpicondylar).copied();

        if let Some(mechanical) = report.axis(AxisKind::Mechanical).copied() {
            report.plane = self.rebuild_plane(host, &mechanical, tea.as_ref());
        }

        if let (Some(plane), Some(tea)) = (&report.plane, &tea) {
            report.projected_tea = Some(project_segment_onto_plane(&tea.start, &tea.end, &plane.plane()));
        }

        let measure = |a: AxisKind, b: AxisKind| match (report.axis(a), report.axis(b)) {
            (Some(a), Some(b)) => angle_between(a, b),
            _ => None,
        };
        report.measurements = Measurements {
            mechanical_anatomical: measure(AxisKind::Mechanical, AxisKind::Anatomical),
            epicondylar_condylar: measure(AxisKind::TransEpicondylar, AxisKind::PosteriorCondylar),
        };

        report
    }

    fn rebuild_plane<H: SceneHost>(
        &self,
        host: &mut H,
        mechanical: &Axis,
        tea: Option<&Axis>,
    ) -> Option<ResectionPlane> {
        let name = format!("{}Plane", AxisKind::Mechanical.name());
        if host.dispose(&name) {
            log::debug!("Existing mesh {} found. Disposing now...", name);
        }

        let mut plane = match ResectionPlane::perpendicular_to(
            name,
            mechanical.start,
            mechanical.end,
            self.config.plane.size,
        ) {
            Ok(plane) => plane,
            Err(e) => {
                log::warn!("Resection plane not built: {}", e);
                return None;
            }
        };

        if self.config.plane.align_to_tea {
            if let Some(direction) = tea.and_then(Axis::direction) {
                if let Err(e) = plane.align_to(&direction) {
                    log::warn!("Plane left unaligned: {}", e);
                }
            }
        }

        self.adjustment.apply(&mut plane);
        host.create(Primitive::resection_plane(&plane));
        Some(plane)
    }
}
