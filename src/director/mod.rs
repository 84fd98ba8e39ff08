//! Per-frame orchestration: camera, geometry, effects, uniforms, draw.

pub mod mapping;

use glam::Vec3;
use serde::Serialize;
use tracing::trace;

use crate::audio::AudioFrame;
use crate::backend::{BackendError, Effect, ParamValue, ProceduralGeometry, RenderBackend};
use crate::camera::{CameraState, PathCamera};
use crate::params::{ConfigError, SceneConfig, ShaderParams};

pub use mapping::{EffectParams, ShaderUniforms};

/// Grid shader uniform names
pub mod uniform_names {
    pub const TIME: &str = "time";
    pub const DISTORTION_STRENGTH: &str = "distortion_strength";
    pub const SCALE: &str = "scale";
}

/// Effect parameter names
pub mod effect_names {
    pub const CONTRAST: &str = "contrast";
    pub const STRENGTH: &str = "strength";
    pub const COLUMNS: &str = "columns";
}

/// Everything the director computed for one frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    pub time_ms: f64,
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub shader: ShaderUniforms,
    pub effects: EffectParams,
}

impl FrameReport {
    fn new(time_ms: f64, camera: &CameraState, shader: ShaderUniforms, effects: EffectParams) -> Self {
        Self {
            time_ms,
            position: camera.position.to_array(),
            target: camera.target.to_array(),
            fov_degrees: camera.fov_degrees,
            shader,
            effects,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Drives one backend from time and audio, frame by frame
pub struct SceneDirector<B: RenderBackend> {
    camera: PathCamera,
    shader: ShaderParams,
    geometry: Vec<Box<dyn ProceduralGeometry>>,
    backend: B,
}

impl<B: RenderBackend> SceneDirector<B> {
    /// Build the director from validated configuration; rejects invalid config up front.
    pub fn new(config: &SceneConfig, backend: B) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            camera: PathCamera::new(&config.camera, &config.render)?,
            shader: config.shader.clone(),
            geometry: Vec::new(),
            backend,
        })
    }

    /// Register a time/audio-driven geometry collaborator (updated in registration order)
    pub fn add_geometry(&mut self, geometry: Box<dyn ProceduralGeometry>) {
        self.geometry.push(geometry);
    }

    /// Render one frame.
    ///
    /// Order: camera, procedural geometry, post-processing parameters, shader
    /// uniforms, then composite.
    ///
    /// # Arguments
    /// * `delta_ms` - Time since the previous frame
    /// * `time_ms` - Time since scene start
    /// * `audio` - This frame's audio features
    pub fn render(
        &mut self,
        delta_ms: f64,
        time_ms: f64,
        audio: &AudioFrame,
    ) -> Result<FrameReport, BackendError> {
        self.camera.update(time_ms, audio, &mut self.backend);

        let camera = self.camera.get();
        for geometry in &mut self.geometry {
            geometry.update(time_ms, delta_ms, audio, camera);
        }

        let effects = mapping::effect_params(audio);
        self.apply_effects(&effects);

        let uniforms = mapping::shader_uniforms(time_ms, audio, &self.shader);
        self.apply_uniforms(&uniforms);

        self.backend.composite(delta_ms)?;

        let report = FrameReport::new(time_ms, self.camera.get(), uniforms, effects);
        trace!(
            time_ms,
            fov = report.fov_degrees,
            distortion = uniforms.distortion_strength,
            contrast = effects.contrast,
            "frame rendered"
        );
        Ok(report)
    }

    fn apply_effects(&mut self, effects: &EffectParams) {
        self.backend.set_effect_param(
            Effect::BrightnessContrast,
            effect_names::CONTRAST,
            ParamValue::Float(effects.contrast),
        );
        self.backend.set_effect_param(
            Effect::Glitch,
            effect_names::STRENGTH,
            ParamValue::Vec2(effects.glitch_strength),
        );
        self.backend.set_effect_param(
            Effect::Glitch,
            effect_names::COLUMNS,
            ParamValue::Float(effects.glitch_columns),
        );
    }

    fn apply_uniforms(&mut self, uniforms: &ShaderUniforms) {
        self.backend
            .set_uniform(uniform_names::TIME, ParamValue::Float(uniforms.time));
        self.backend.set_uniform(
            uniform_names::DISTORTION_STRENGTH,
            ParamValue::Float(uniforms.distortion_strength),
        );
        self.backend
            .set_uniform(uniform_names::SCALE, ParamValue::Float(uniforms.scale));
    }

    /// Window resize: forward the new aspect ratio to the camera and re-push its pose
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
        self.backend.apply_camera(self.camera.get());
    }

    pub fn camera(&self) -> &PathCamera {
        &self.camera
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
