//! Integration tests for kneeplan-planning
//!
//! These tests drive a whole planning session against an in-memory scene:
//! picking landmarks on a bone, updating axes and the resection plane, and
//! checking what the rendering layer receives.

use approx::assert_relative_eq;
use kneeplan_core::{Point3f, Ray, TriangleMesh, Vector3f};
use kneeplan_planning::*;

/// A box-shaped stand-in for a femur, spanning y = 0..420 with its front face at z = -30
fn create_test_femur() -> TriangleMesh {
    let (min, max) = (Point3f::new(-40.0, 0.0, -30.0), Point3f::new(40.0, 420.0, 30.0));
    let mut mesh = TriangleMesh::new();
    for i in 0..8 {
        mesh.add_vertex(Point3f::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        ));
    }
    let quads = [
        [0, 1, 3, 2], // front (z min)
        [4, 6, 7, 5], // back
        [0, 2, 6, 4], // x min
        [1, 5, 7, 3], // x max
        [0, 4, 5, 1], // y min
        [2, 3, 7, 6], // y max
    ];
    for [a, b, c, d] in quads {
        mesh.add_face([a, b, c]);
        mesh.add_face([a, c, d]);
    }
    mesh
}

/// Ray shot at the front face of the test femur
fn front_ray(x: f32, y: f32) -> Ray {
    Ray::new(Point3f::new(x, y, -500.0), Vector3f::z()).unwrap()
}

fn create_test_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add_bone("femur", create_test_femur());
    scene
}

fn pick_landmark(session: &mut PlanningSession, scene: &mut Scene, landmark: Landmark, x: f32, y: f32) {
    session.set_active(landmark);
    let outcome = session.click(scene, &front_ray(x, y));
    assert!(
        matches!(outcome, PlacementOutcome::Created { .. }),
        "{} was not created: {:?}",
        landmark,
        outcome
    );
}

fn pick_all_landmarks(session: &mut PlanningSession, scene: &mut Scene) {
    pick_landmark(session, scene, Landmark::FemurCentre, 0.0, 20.0);
    pick_landmark(session, scene, Landmark::HipCentre, 0.0, 400.0);
    pick_landmark(session, scene, Landmark::FemurProximalCanal, 5.0, 380.0);
    pick_landmark(session, scene, Landmark::FemurDistalCanal, 0.0, 60.0);
    pick_landmark(session, scene, Landmark::MedialEpicondyle, -35.0, 30.0);
    pick_landmark(session, scene, Landmark::LateralEpicondyle, 35.0, 30.0);
    pick_landmark(session, scene, Landmark::PosteriorMedialPt, -30.0, 10.0);
    pick_landmark(session, scene, Landmark::PosteriorLateralPt, 30.0, 14.0);
}

#[test]
fn test_camera_center_pick_lands_on_bone() {
    let mut scene = create_test_scene();
    let mut camera = ArcRotateCamera::default();
    camera.frame(scene.framing_target().unwrap());
    assert_relative_eq!(camera.target, Point3f::new(0.0, 210.0, 0.0));

    let mut session = PlanningSession::new(PlanningConfig::default());
    session.set_active(Landmark::FemurCentre);
    let ray = camera.screen_ray(400.0, 300.0, 800.0, 600.0).unwrap();

    match session.click(&mut scene, &ray) {
        PlacementOutcome::Created { landmark, position } => {
            assert_eq!(landmark, Landmark::FemurCentre);
            assert_relative_eq!(position, Point3f::new(0.0, 210.0, -30.0), epsilon = 1e-2);
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    match &scene.primitive("femCentre").unwrap().shape {
        Shape::Sphere { diameter, .. } => assert_eq!(*diameter, 15.0),
        other => panic!("marker is not a sphere: {:?}", other),
    }
}

#[test]
fn test_click_outside_bone_creates_nothing() {
    let mut scene = create_test_scene();
    let mut session = PlanningSession::new(PlanningConfig::default());
    session.set_active(Landmark::HipCentre);

    let outcome = session.click(&mut scene, &front_ray(200.0, 200.0));
    assert_eq!(outcome, PlacementOutcome::Missed { landmark: Landmark::HipCentre });
    assert!(scene.primitive("hipCentre").is_none());
    assert!(session.landmarks().is_empty());
}

#[test]
fn test_full_plan() {
    let mut scene = create_test_scene();
    let mut session = PlanningSession::new(PlanningConfig::default());
    pick_all_landmarks(&mut session, &mut scene);
    assert_eq!(session.landmarks().len(), 8);

    let report = session.update(&mut scene);
    assert_eq!(report.axes.len(), 4);
    assert!(session.placer().attached().is_none());

    // Each axis line connects its two landmarks
    for axis in &report.axes {
        let (a, b) = axis.kind.landmarks();
        assert_eq!(axis.start, session.landmarks().get(a).unwrap());
        assert_eq!(axis.end, session.landmarks().get(b).unwrap());
        match &scene.primitive(axis.kind.name()).unwrap().shape {
            Shape::Line { points } => assert_eq!(points, &vec![axis.start, axis.end]),
            other => panic!("axis is not a line: {:?}", other),
        }
    }

    // Plane sits on the hip centre, faces the femur centre and follows the TEA
    let plane = report.plane.as_ref().unwrap();
    assert_relative_eq!(plane.centre, Point3f::new(0.0, 400.0, -30.0), epsilon = 1e-3);
    assert_relative_eq!(plane.normal(), -Vector3f::y(), epsilon = 1e-5);
    assert_relative_eq!(plane.u_axis(), Vector3f::x(), epsilon = 1e-5);

    // TEA projected onto the cut
    let (medial, lateral) = report.projected_tea.unwrap();
    assert_relative_eq!(medial, Point3f::new(-35.0, 400.0, -30.0), epsilon = 1e-3);
    assert_relative_eq!(lateral, Point3f::new(35.0, 400.0, -30.0), epsilon = 1e-3);

    let expected_ma = (5.0f32 / 320.0).atan().to_degrees();
    assert_relative_eq!(report.measurements.mechanical_anatomical.unwrap(), expected_ma, epsilon = 1e-2);
    let expected_pca = (4.0f32 / 60.0).atan().to_degrees();
    assert_relative_eq!(report.measurements.epicondylar_condylar.unwrap(), expected_pca, epsilon = 1e-2);
}

#[test]
fn test_drag_then_update_moves_plane() {
    let mut scene = create_test_scene();
    let mut session = PlanningSession::new(PlanningConfig::default());
    pick_landmark(&mut session, &mut scene, Landmark::FemurCentre, 0.0, 20.0);
    pick_landmark(&mut session, &mut scene, Landmark::HipCentre, 0.0, 400.0);

    // Gizmo is on the hip centre after placing it
    let moved = session.drag(&mut scene, Vector3f::new(0.0, 10.0, 0.0)).unwrap();
    assert_eq!(moved.0, Landmark::HipCentre);
    assert_relative_eq!(
        scene.mesh_position("hipCentre").unwrap(),
        Point3f::new(0.0, 410.0, -30.0),
        epsilon = 1e-3
    );

    let report = session.update(&mut scene);
    assert_relative_eq!(report.plane.unwrap().centre, Point3f::new(0.0, 410.0, -30.0), epsilon = 1e-3);

    // Update detached the gizmo
    assert!(session.drag(&mut scene, Vector3f::x()).is_none());
}

#[test]
fn test_reselecting_landmark_does_not_duplicate() {
    let mut scene = create_test_scene();
    let mut session = PlanningSession::new(PlanningConfig::default());
    pick_landmark(&mut session, &mut scene, Landmark::MedialEpicondyle, -35.0, 30.0);
    scene.drain_events();

    session.set_active(Landmark::MedialEpicondyle);
    let outcome = session.click(&mut scene, &front_ray(10.0, 100.0));
    assert!(matches!(outcome, PlacementOutcome::Selected { .. }));
    assert!(scene.drain_events().is_empty());
    assert_relative_eq!(
        scene.mesh_position("medialEpicondyle").unwrap(),
        Point3f::new(-35.0, 30.0, -30.0),
        epsilon = 1e-3
    );
}

#[test]
fn test_partial_update_keeps_stale_axes() {
    let mut scene = create_test_scene();
    let mut session = PlanningSession::new(PlanningConfig::default());
    pick_all_landmarks(&mut session, &mut scene);
    session.update(&mut scene);

    // Removing a marker leaves its previous axis in the scene untouched
    scene.dispose("posteriorLateralPt");
    scene.drain_events();
    let report = session.update(&mut scene);

    assert_eq!(report.axes.len(), 3);
    assert!(report.axis(AxisKind::PosteriorCondylar).is_none());
    assert!(scene.primitive("PCAxis").is_some());
    assert!(report.measurements.epicondylar_condylar.is_none());
    assert!(!scene
        .drain_events()
        .iter()
        .any(|event| *event == SceneEvent::Disposed("PCAxis".to_string())));
}

#[test]
fn test_plane_pick_projects_onto_cut() {
    let mut scene = create_test_scene();
    let mut session = PlanningSession::new(PlanningConfig::default());
    pick_landmark(&mut session, &mut scene, Landmark::FemurCentre, 0.0, 20.0);
    pick_landmark(&mut session, &mut scene, Landmark::HipCentre, 0.0, 400.0);
    let plane = session.update(&mut scene).plane.unwrap();

    let ray = Ray::new(Point3f::new(20.0, 800.0, -10.0), -Vector3f::y()).unwrap();
    let hit = scene.pick_named(&plane.name, &ray).unwrap();
    assert_relative_eq!(hit.point, Point3f::new(20.0, 400.0, -10.0), epsilon = 1e-3);
    assert_relative_eq!(
        project_screen_pick(&ray, &plane.plane()).unwrap(),
        hit.point,
        epsilon = 1e-3
    );

    let guide = offset_along_normal(&hit.point, &plane.plane(), session.config().projection.normal_length);
    assert_relative_eq!(guide, Point3f::new(20.0, 300.0, -10.0), epsilon = 1e-3);
}
