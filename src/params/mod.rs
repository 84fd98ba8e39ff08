//! Parameter definitions with units and documented semantics.
//!
//! A [`SceneConfig`] is built once at startup (defaults, optional TOML file,
//! CLI overrides), validated, and then handed by reference to the camera and
//! the director. Nothing reads configuration from global state.

mod camera;
mod render;
mod shader;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use camera::{CameraPathParams, DEFAULT_CONTROL_POINTS};
pub use render::RenderConfig;
pub use shader::ShaderParams;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("camera cycle must be a positive finite duration, got {0} ms")]
    InvalidCycle(f64),

    #[error("camera loop needs at least 2 control points, got {0}")]
    TooFewControlPoints(usize),

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("{0} is used as a divisor and must be non-zero")]
    ZeroDivisor(&'static str),

    #[error("window size must be non-zero, got {width}x{height}")]
    InvalidWindow { width: u32, height: u32 },

    #[error("clipping planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },
}

/// Complete scene configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraPathParams,
    pub shader: ShaderParams,
    pub render: RenderConfig,
}

impl SceneConfig {
    /// Load configuration from a TOML file; missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })
    }

    /// Reject configurations that would feed NaN or infinity into the frame loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if !(cam.cycle_ms.is_finite() && cam.cycle_ms > 0.0) {
            return Err(ConfigError::InvalidCycle(cam.cycle_ms));
        }
        if cam.control_points.len() < 2 {
            return Err(ConfigError::TooFewControlPoints(cam.control_points.len()));
        }

        let scalars = [
            ("camera.lookahead_ms", cam.lookahead_ms),
            ("camera.gaze_drop", cam.gaze_drop as f64),
            ("camera.target_pull", cam.target_pull as f64),
            ("camera.base_fov_degrees", cam.base_fov_degrees as f64),
            ("camera.fov_damping", cam.fov_damping as f64),
            ("shader.distortion_min", self.shader.distortion_min as f64),
            ("shader.distortion_range", self.shader.distortion_range as f64),
            ("shader.scale", self.shader.scale as f64),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        if let Some(bad) = cam
            .control_points
            .iter()
            .flatten()
            .find(|c| !c.is_finite())
        {
            return Err(ConfigError::NonFinite {
                name: "camera.control_points",
                value: *bad as f64,
            });
        }
        if cam.fov_damping == 0.0 {
            return Err(ConfigError::ZeroDivisor("camera.fov_damping"));
        }

        let render = &self.render;
        if render.window_width == 0 || render.window_height == 0 {
            return Err(ConfigError::InvalidWindow {
                width: render.window_width,
                height: render.window_height,
            });
        }
        if !(render.near_plane > 0.0 && render.near_plane < render.far_plane) {
            return Err(ConfigError::InvalidClipPlanes {
                near: render.near_plane,
                far: render.far_plane,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.camera.control_points.len(), 5);
        assert_eq!(config.camera.base_fov_degrees, 75.0);
    }

    #[test]
    fn test_zero_cycle_rejected() {
        let mut config = SceneConfig::default();
        config.camera.cycle_ms = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCycle(c)) if c == 0.0
        ));

        config.camera.cycle_ms = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidCycle(_))));
    }

    #[test]
    fn test_too_few_control_points_rejected() {
        let mut config = SceneConfig::default();
        config.camera.control_points = vec![[0.0, 0.0, 0.0]];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooFewControlPoints(1))
        ));
    }

    #[test]
    fn test_non_finite_parameter_rejected() {
        let mut config = SceneConfig::default();
        config.shader.distortion_range = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite {
                name: "shader.distortion_range",
                ..
            })
        ));
    }

    #[test]
    fn test_clip_planes_rejected() {
        let mut config = SceneConfig::default();
        config.render.near_plane = 600.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidClipPlanes { .. })
        ));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SceneConfig::from_toml_str(
            r#"
            [camera]
            cycle_ms = 10000.0

            [shader]
            scale = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.cycle_ms, 10_000.0);
        assert_eq!(config.camera.lookahead_ms, 1_000.0);
        assert_eq!(config.shader.scale, 2.5);
        assert_eq!(config.shader.distortion_min, ShaderParams::default().distortion_min);
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn test_demo_config_matches_defaults() {
        let config = SceneConfig::from_toml_str(include_str!("../../demos/scene.toml")).unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[shader]\ndistortion_min = 0.3").unwrap();

        let config = SceneConfig::load(file.path()).unwrap();
        assert_eq!(config.shader.distortion_min, 0.3);
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[camera\ncycle_ms = ").unwrap();

        let err = SceneConfig::load(file.path()).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => {
                assert_eq!(path, file.path().display().to_string())
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
