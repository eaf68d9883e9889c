//! Interactive-style landmark picking on a synthetic femur
//!
//! Frames an orbit camera on a box-shaped bone, "clicks" screen pixels to
//! place every landmark, drags the hip centre with the gizmo and runs the
//! update twice, printing what the scene receives along the way.

use anyhow::{bail, Result};
use clap::Parser;
use kneeplan_core::{Point3f, TriangleMesh, Vector3f};
use kneeplan_io::SessionFile;
use kneeplan_planning::{
    ArcRotateCamera, Landmark, PlacementOutcome, PlanningConfig, PlanningSession, Scene, SceneEvent,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Pick femoral landmarks through a camera and build the resection plane")]
struct Cli {
    /// Viewport width in pixels
    #[arg(long, default_value_t = 1600.0)]
    width: f32,
    /// Viewport height in pixels
    #[arg(long, default_value_t = 900.0)]
    height: f32,
    /// Varus/valgus tilt applied to the plane, degrees
    #[arg(long, default_value_t = 0.0)]
    varus_valgus: f32,
    /// Flexion tilt applied to the plane, degrees
    #[arg(long, default_value_t = 0.0)]
    flexion: f32,
    /// Save the picked landmarks as a session file
    #[arg(long)]
    save: Option<PathBuf>,
}

/// Box-shaped femur: 80 wide, 420 long, 60 deep, front face at z = -30
fn synthetic_femur() -> TriangleMesh {
    let (min, max) = (Point3f::new(-40.0, 0.0, -30.0), Point3f::new(40.0, 420.0, 30.0));
    let corner = |i: usize| {
        Point3f::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        )
    };

    let mut mesh = TriangleMesh::new();
    for i in 0..8 {
        mesh.add_vertex(corner(i));
    }
    for [a, b, c, d] in [
        [0, 1, 3, 2],
        [4, 6, 7, 5],
        [0, 2, 6, 4],
        [1, 5, 7, 3],
        [0, 4, 5, 1],
        [2, 3, 7, 6],
    ] {
        mesh.add_face([a, b, c]);
        mesh.add_face([a, c, d]);
    }
    mesh
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = PlanningConfig::load()?;
    let mut camera = ArcRotateCamera::from_config(&config.camera);
    camera.aspect_ratio = cli.width / cli.height;

    let mut scene = Scene::new();
    scene.add_bone("femur", synthetic_femur());
    if let Some(target) = scene.framing_target() {
        camera.frame(target);
    }

    // Where the surgeon would click on the front of the bone
    let picks = [
        (Landmark::FemurCentre, Point3f::new(0.0, 20.0, -30.0)),
        (Landmark::HipCentre, Point3f::new(0.0, 400.0, -30.0)),
        (Landmark::FemurProximalCanal, Point3f::new(5.0, 380.0, -30.0)),
        (Landmark::FemurDistalCanal, Point3f::new(0.0, 60.0, -30.0)),
        (Landmark::MedialEpicondyle, Point3f::new(-35.0, 30.0, -30.0)),
        (Landmark::LateralEpicondyle, Point3f::new(35.0, 30.0, -30.0)),
        (Landmark::DistalMedialPt, Point3f::new(-20.0, 4.0, -30.0)),
        (Landmark::DistalLateralPt, Point3f::new(20.0, 4.0, -30.0)),
        (Landmark::PosteriorMedialPt, Point3f::new(-30.0, 10.0, -30.0)),
        (Landmark::PosteriorLateralPt, Point3f::new(30.0, 14.0, -30.0)),
    ];

    let mut session = PlanningSession::new(config);
    for (landmark, target) in picks {
        let Some((x, y)) = camera.world_to_screen(&target, cli.width, cli.height) else {
            bail!("{} is behind the camera", landmark);
        };
        let ray = camera.screen_ray(x, y, cli.width, cli.height)?;
        session.set_active(landmark);
        match session.click(&mut scene, &ray) {
            PlacementOutcome::Created { position, .. } => println!(
                "{:<22} pixel ({:>6.1}, {:>6.1}) -> ({:.2}, {:.2}, {:.2})",
                landmark.label(),
                x,
                y,
                position.x,
                position.y,
                position.z
            ),
            outcome => bail!("pick for {} failed: {:?}", landmark, outcome),
        }
    }

    let report = session.update(&mut scene);
    if let Some(plane) = &report.plane {
        println!("\nInitial plane centre {:?}, normal {:?}", plane.centre(), plane.normal());
    }

    // Move the hip centre up with the gizmo and rebuild
    session.set_active(Landmark::HipCentre);
    let hip = Point3f::new(0.0, 400.0, -30.0);
    if let Some((x, y)) = camera.world_to_screen(&hip, cli.width, cli.height) {
        session.click(&mut scene, &camera.screen_ray(x, y, cli.width, cli.height)?);
    }
    if session.drag(&mut scene, Vector3f::new(2.0, 10.0, 0.0)).is_none() {
        bail!("hip centre marker could not be dragged");
    }

    let mut adjustment = session.adjustment();
    adjustment.varus_valgus = cli.varus_valgus;
    adjustment.flexion = cli.flexion;
    session.set_adjustment(adjustment);

    scene.drain_events();
    let report = session.update(&mut scene);
    for event in scene.drain_events() {
        match event {
            SceneEvent::Created(primitive) => println!("created  {}", primitive.name),
            SceneEvent::Replaced(primitive) => println!("replaced {}", primitive.name),
            SceneEvent::Moved { name, position } => println!("moved    {} to {:?}", name, position),
            SceneEvent::Disposed(name) => println!("disposed {}", name),
        }
    }

    if let Some(plane) = &report.plane {
        println!("\nAdjusted plane centre {:?}, normal {:?}", plane.centre(), plane.normal());
    }
    if let Some(angle) = report.measurements.mechanical_anatomical {
        println!("Mechanical / anatomical: {:.2} deg", angle);
    }
    if let Some(angle) = report.measurements.epicondylar_condylar {
        println!("Epicondylar / condylar:  {:.2} deg", angle);
    }

    if let Some(path) = &cli.save {
        SessionFile::from_session(&session).write(path)?;
        println!("Saved session to {}", path.display());
    }

    Ok(())
}
