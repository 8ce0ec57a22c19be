//! Engine configuration
//!
//! All tunables live in [`EngineConfig`]. Every section falls back to its
//! defaults, so a config file only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use crate::error::ConfigError;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.json` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension(path) {
            Some("toml") => {
                toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            Some("json") => {
                serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.json` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Top-level engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub shadow: ShadowSettings,
    pub controller: ControllerConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
}

impl Config for EngineConfig {}

/// Dynamics constants applied every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Subtracted from vertical velocity each tick
    pub gravity: f32,
    /// Velocity multiplier applied each tick
    pub friction_factor: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.1,
            friction_factor: 0.5,
        }
    }
}

/// Shadow map frustum and sampling parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    /// Edge length of the square depth target in texels
    pub resolution: u32,
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub bias: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            resolution: 4096,
            fov_deg: 81.0,
            near: 1.0,
            far: 100.0,
            bias: 0.0002,
        }
    }
}

/// Input-to-velocity scaling for the possessing controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub movement_speed: f32,
    pub turn_speed: f32,
    pub jump_height: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            movement_speed: 10.0,
            turn_speed: 6.0,
            jump_height: 30.0,
        }
    }
}

/// Projection and spawn settings for the scene camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    /// minX, maxX, minY, maxY, minZ, maxZ
    pub aabb: [f32; 6],
    pub flying: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 0.0, 10.0],
            aabb: [-1.0, 1.0, -2.5, 2.5, -1.0, 1.0],
            flying: false,
        }
    }
}

/// Window and surface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f64; 4],
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: bool,
    pub title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.75, 0.88, 0.92, 1.0],
            window_width: 1200,
            window_height: 800,
            vsync: true,
            title: "Kelpie".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [physics]
            gravity = 0.25

            [shadow]
            resolution = 2048
            "#,
        )
        .unwrap();

        assert_eq!(config.physics.gravity, 0.25);
        assert_eq!(config.physics.friction_factor, 0.5);
        assert_eq!(config.shadow.resolution, 2048);
        assert_eq!(config.shadow.bias, 0.0002);
        assert_eq!(config.controller, ControllerConfig::default());
    }

    #[test]
    fn test_save_and_load_toml() {
        let path = std::env::temp_dir().join(format!("kelpie-config-{}.toml", std::process::id()));
        let mut config = EngineConfig::default();
        config.controller.turn_speed = 3.0;
        config.render.vsync = false;

        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join(format!("kelpie-config-{}.yaml", std::process::id()));
        std::fs::write(&path, "physics: {}").unwrap();
        let result = EngineConfig::load_from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
