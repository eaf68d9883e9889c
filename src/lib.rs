//! # kneeplan
//!
//! Landmark-driven femoral resection planning for total knee arthroplasty.
//!
//! This is the umbrella crate that provides convenient access to all kneeplan functionality.
//! You can use this crate to get everything in one place, or use individual crates for
//! more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Geometry primitives (points, meshes, planes, rays, transforms)
//! - **Planning**: Landmarks, femoral axes, the resection plane and picking
//! - **I/O**: JSON session files and PLY export of planning primitives
//!
//! ## Quick Start
//!
//! ```rust
//! use kneeplan::prelude::*;
//!
//! let mut scene = Scene::new();
//! let mut session = PlanningSession::new(PlanningConfig::default());
//! session.place(&mut scene, Landmark::FemurCentre, Point3f::new(0.0, 0.0, 0.0));
//! session.place(&mut scene, Landmark::HipCentre, Point3f::new(0.0, 420.0, 0.0));
//!
//! let report = session.update(&mut scene);
//! let plane = report.plane.unwrap();
//! assert!((plane.normal().y + 1.0).abs() < 1e-5);
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables io
//! - `io`: Session files and PLY export

// Re-export core functionality
pub use kneeplan_core::*;

// Re-export sub-crates
pub use kneeplan_planning as planning;

#[cfg(feature = "io")]
pub use kneeplan_io as io;

/// Convenient imports for common use cases
pub mod prelude {
    pub use kneeplan_core::*;

    pub use kneeplan_planning::*;

    #[cfg(feature = "io")]
    pub use kneeplan_io::{PrimitivePlyWriter, SessionFile};
}
