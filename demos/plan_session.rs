//! Rebuild a femoral resection plan from a saved session
//!
//! Loads landmark positions and plane adjustments from a JSON session file,
//! runs one update and prints the derived axes, the resection plane and the
//! axis angles. The resulting primitives can optionally be exported as PLY.

use anyhow::{Context, Result};
use clap::Parser;
use kneeplan_io::{PrimitivePlyWriter, SessionFile};
use kneeplan_planning::{AxisKind, PlanningConfig, PlanningSession, Scene};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Rebuild femoral axes and the resection plane from a session file")]
struct Cli {
    /// Session file (JSON)
    #[arg(long)]
    session: PathBuf,
    /// Directory holding default.toml / user.toml
    #[arg(long, default_value = "config")]
    config: PathBuf,
    /// Write the resulting primitives to this PLY file
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = PlanningConfig::load_from(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let file = SessionFile::read(&cli.session)?;

    let mut scene = Scene::new();
    let mut session = PlanningSession::new(config);
    file.restore(&mut session, &mut scene);

    let report = session.update(&mut scene);

    println!("Axes:");
    for kind in AxisKind::ALL {
        match report.axis(kind) {
            Some(axis) => println!(
                "  {:<14} {:>8.2} mm  ({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2})",
                kind.name(),
                axis.length(),
                axis.start.x,
                axis.start.y,
                axis.start.z,
                axis.end.x,
                axis.end.y,
                axis.end.z
            ),
            None => println!("  {:<14} missing landmarks", kind.name()),
        }
    }

    match &report.plane {
        Some(plane) => {
            let centre = plane.centre();
            let normal = plane.normal();
            let clip = plane.plane().clip_coefficients();
            println!("\nResection plane {}:", plane.name);
            println!("  centre  ({:.2}, {:.2}, {:.2})", centre.x, centre.y, centre.z);
            println!("  normal  ({:.4}, {:.4}, {:.4})", normal.x, normal.y, normal.z);
            println!("  clip    ({:.4}, {:.4}, {:.4}, {:.2})", clip.x, clip.y, clip.z, clip.w);
        }
        None => println!("\nNo resection plane: mechanical axis is incomplete"),
    }

    if let Some((medial, lateral)) = report.projected_tea {
        println!(
            "  TEA on cut ({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2})",
            medial.x, medial.y, medial.z, lateral.x, lateral.y, lateral.z
        );
    }

    println!("\nMeasurements:");
    let show = |angle: Option<f32>| angle.map_or_else(|| "n/a".to_string(), |a| format!("{:.2} deg", a));
    println!("  mechanical / anatomical   {}", show(report.measurements.mechanical_anatomical));
    println!("  epicondylar / condylar    {}", show(report.measurements.epicondylar_condylar));

    if let Some(path) = &cli.export {
        PrimitivePlyWriter::write(scene.primitives(), path)
            .with_context(|| format!("exporting primitives to {}", path.display()))?;
        println!("\nExported primitives to {}", path.display());
    }

    Ok(())
}
