//! I/O for kneeplan
//!
//! Planning sessions are stored as JSON; derived primitives (markers, axes,
//! resection planes) can be exported as PLY for inspection in other tools.

pub mod error;
pub mod ply;
pub mod session_file;

pub use error::*;
pub use ply::PrimitivePlyWriter;
pub use session_file::SessionFile;
