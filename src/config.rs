//! Runtime Configuration
//!
//! Window, camera start, motion tuning and colors, loaded from an optional
//! JSON file. Every field has a default, so a config file only needs to list
//! what it changes.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::camera::Camera;
use crate::motion::MotionController;
use crate::renderer::Rgb;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub motion: MotionConfig,
    pub colors: ColorConfig,
    /// JSON map file; the built-in map is used when absent.
    pub map: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "Grid Caster".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f64; 2],
    pub direction: [f64; 2],
    /// Plane length relative to `direction`; 0.66 gives roughly 67 degrees.
    pub plane_length: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [22.0, 12.0],
            direction: [-1.0, 0.0],
            plane_length: 0.66,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> Camera {
        Camera::new(self.position, self.direction, self.plane_length)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Cells per second
    pub move_speed: f64,
    /// Radians per second
    pub rotation_speed: f64,
    /// Upper bound on the time step of a single frame, in seconds
    pub max_frame_seconds: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rotation_speed: 3.0,
            max_frame_seconds: 0.1,
        }
    }
}

impl MotionConfig {
    pub fn controller(&self) -> MotionController {
        MotionController {
            move_speed: self.move_speed,
            rotation_speed: self.rotation_speed,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub ceiling: [u8; 3],
    pub floor: [u8; 3],
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            ceiling: [50, 50, 50],
            floor: [100, 100, 100],
        }
    }
}

impl ColorConfig {
    pub fn ceiling(&self) -> Rgb {
        let [r, g, b] = self.ceiling;
        Rgb::new(r, g, b)
    }

    pub fn floor(&self) -> Rgb {
        let [r, g, b] = self.floor;
        Rgb::new(r, g, b)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::JsonError(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::JsonError(e)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_scene() {
        let config = Config::default();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 480);
        assert!(config.map.is_none());

        let cam = config.camera.build();
        assert_eq!(cam.pos, [22.0, 12.0]);
        assert_eq!(cam.dir, [-1.0, 0.0]);
        assert!((cam.plane[1] - 0.66).abs() < 1e-12);

        let ctl = config.motion.controller();
        assert_eq!(ctl.move_speed, 5.0);
        assert_eq!(ctl.rotation_speed, 3.0);
        assert_eq!(config.colors.ceiling(), Rgb::new(50, 50, 50));
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = Config::from_json(
            r#"{
                "window": { "width": 320 },
                "motion": { "move_speed": 2.5 },
                "map": "levels/box.json"
            }"#,
        )
        .unwrap();
        assert_eq!(config.window.width, 320);
        assert_eq!(config.window.height, 480);
        assert_eq!(config.motion.move_speed, 2.5);
        assert_eq!(config.motion.rotation_speed, 3.0);
        assert_eq!(config.map, Some(PathBuf::from("levels/box.json")));
    }

    #[test]
    fn test_bad_json_is_reported() {
        let err = Config::from_json("{ \"window\": 3 }").unwrap_err();
        assert!(matches!(err, ConfigError::JsonError(_)));
        assert!(err.to_string().starts_with("JSON error"));

        let err = Config::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
