//! # kneeplan planning
//!
//! Landmark-driven construction of femoral reference axes and a resection
//! plane for preoperative knee-replacement planning.
//!
//! The planning logic talks to the 3D scene only through [`SceneHost`]:
//! it looks meshes up by name, casts pick rays and creates or disposes
//! visual primitives. [`Scene`] is an in-memory host.

pub mod landmarks;
pub mod placement;
pub mod axes;
pub mod resection;
pub mod projection;
pub mod scene;
pub mod camera;
pub mod config;
pub mod session;

// Re-export commonly used items
pub use landmarks::*;
pub use placement::*;
pub use axes::*;
pub use resection::*;
pub use projection::*;
pub use scene::*;
pub use camera::*;
pub use config::*;
pub use session::*;
