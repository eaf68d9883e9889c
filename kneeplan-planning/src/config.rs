//! Planning configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`KNEEPLAN_SECTION__KEY`)

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use kneeplan_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sizes and defaults used when building planning primitives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default)]
    pub plane: PlaneConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

impl PlanningConfig {
    /// Load configuration from the `config` directory
    pub fn load() -> Result<Self> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory. Missing files
    /// fall back to built-in defaults.
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::from(Serialized::defaults(PlanningConfig::default()));

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // KNEEPLAN_PLANE__SIZE=150 -> plane.size = 150
        figment = figment.merge(Env::prefixed("KNEEPLAN_").split("__"));

        let config: PlanningConfig = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes that cannot produce visible geometry
    pub fn validate(&self) -> Result<()> {
        if self.markers.diameter <= 0.0 {
            return Err(Error::Config("markers.diameter must be positive".to_string()));
        }
        if self.plane.size <= 0.0 {
            return Err(Error::Config("plane.size must be positive".to_string()));
        }
        if self.camera.radius <= 0.0 {
            return Err(Error::Config("camera.radius must be positive".to_string()));
        }
        if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
            return Err(Error::Config("camera.fov must be between 0 and 180 degrees".to_string()));
        }
        Ok(())
    }
}

/// Landmark marker spheres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Sphere diameter in scene units
    pub diameter: f32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self { diameter: 15.0 }
    }
}

/// Resection plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneConfig {
    /// Side length of the square
    pub size: f32,
    /// Spin the plane's in-plane axes to follow the TEA when it is available
    pub align_to_tea: bool,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            size: 200.0,
            align_to_tea: true,
        }
    }
}

/// Projection helpers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Length of perpendicular guides drawn off the plane
    pub normal_length: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            normal_length: crate::projection::DEFAULT_NORMAL_LENGTH,
        }
    }
}

/// Initial orbit camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Distance from the target
    pub radius: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: 950.0,
            fov: 45.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlanningConfig::default();
        assert_eq!(config.markers.diameter, 15.0);
        assert_eq!(config.plane.size, 200.0);
        assert_eq!(config.projection.normal_length, 100.0);
        assert_eq!(config.camera.radius, 950.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_fov() {
        let mut config = PlanningConfig::default();
        config.camera.fov = 180.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        config.camera.fov = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_dir_uses_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = PlanningConfig::load_from("no_such_dir").expect("defaults");
            assert_eq!(config, PlanningConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_layered_sources() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "default.toml",
                r#"
                [plane]
                size = 180.0
                align_to_tea = false

                [markers]
                diameter = 12.0
                "#,
            )?;
            jail.create_file("user.toml", "[markers]\ndiameter = 10.0\n")?;
            jail.set_env("KNEEPLAN_CAMERA__RADIUS", "700");

            let config = PlanningConfig::load_from(".").expect("layered config");
            assert_eq!(config.plane.size, 180.0);
            assert!(!config.plane.align_to_tea);
            assert_eq!(config.markers.diameter, 10.0);
            assert_eq!(config.camera.radius, 700.0);
            assert_eq!(config.projection.normal_length, 100.0);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_size_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("default.toml", "[plane]\nsize = -1.0\n")?;
            assert!(PlanningConfig::load_from(".").is_err());
            Ok(())
        });
    }
}
