//! JSON persistence of a planning session
//!
//! ```json
//! {
//!   "landmarks": { "femCentre": [0.0, 0.0, 0.0], "hipCentre": [0.0, 420.0, 0.0] },
//!   "plane": { "varus_valgus": 0.0, "flexion": 3.0, "offset": 0.0 }
//! }
//! ```

use crate::IoError;
use kneeplan_core::Result;
use kneeplan_planning::{LandmarkSet, PlaneAdjustment, PlanningSession, SceneHost};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

/// On-disk form of a planning session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionFile {
    pub landmarks: LandmarkSet,
    #[serde(default)]
    pub plane: PlaneAdjustment,
}

impl SessionFile {
    /// Snapshot the landmarks and plane adjustment of a session
    pub fn from_session(session: &PlanningSession) -> Self {
        Self {
            landmarks: session.landmarks().clone(),
            plane: session.adjustment(),
        }
    }

    /// Parse a session from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            IoError::ParseError {
                message: e.to_string(),
            }
            .into()
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            IoError::WriteError {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Read a session file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => IoError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => IoError::Io(e),
        })?;

        let reader = BufReader::new(file);
        let session: SessionFile = serde_json::from_reader(reader).map_err(|e| IoError::ParseError {
            message: format!("{}: {}", path.display(), e),
        })?;
        log::info!("Loaded {} landmarks from {}", session.landmarks.len(), path.display());
        Ok(session)
    }

    /// Write a session file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(self.to_json()?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Place every stored landmark into `session` and `host`, and carry over
    /// the plane adjustment
    pub fn restore<H: SceneHost>(&self, session: &mut PlanningSession, host: &mut H) {
        for (landmark, position) in self.landmarks.iter() {
            session.place(host, landmark, position);
        }
        session.set_adjustment(self.plane);
    }
}
