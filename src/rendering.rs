//! CPU-side render backend: packs sink updates into GPU-ready uniform blocks.
//!
//! Pipelines, textures and the effect passes themselves live with whatever
//! graphics layer uploads these blocks; this backend keeps their contents
//! current and records what each composited frame would have drawn.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use tracing::warn;

use crate::backend::{
    BackendError, CameraSink, Compositor, Effect, EffectParameterSink, ParamValue, UniformSink,
};
use crate::camera::CameraState;
use crate::director::{effect_names, uniform_names};

/// Uniform buffer for the grid-plane shader (view-projection matrix + parameters)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GridUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub time: f32,
    pub distortion_strength: f32,
    pub scale: f32,
    pub _padding: f32, // Padding for alignment
}

/// Uniform buffer shared by the brightness/contrast and glitch passes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct EffectUniforms {
    pub glitch_strength: [f32; 2],
    pub glitch_columns: f32,
    pub contrast: f32,
}

/// Blocks as they stood when a frame was composited
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CompositedFrame {
    pub delta_ms: f64,
    pub grid: GridUniforms,
    pub effects: EffectUniforms,
}

/// Backend holding the current uniform blocks
pub struct UniformBlockBackend {
    grid: GridUniforms,
    effects: EffectUniforms,
    frames_composited: u64,
    /// Composited frames, kept only when capture is enabled
    history: Option<Vec<CompositedFrame>>,
}

impl Default for UniformBlockBackend {
    fn default() -> Self {
        Self::new(false)
    }
}

impl UniformBlockBackend {
    /// Create a backend; with `capture` every composited frame is retained.
    pub fn new(capture: bool) -> Self {
        Self {
            grid: GridUniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                time: 0.0,
                distortion_strength: 0.0,
                scale: 1.0,
                _padding: 0.0,
            },
            effects: EffectUniforms::zeroed(),
            frames_composited: 0,
            history: capture.then(Vec::new),
        }
    }

    pub fn grid(&self) -> &GridUniforms {
        &self.grid
    }

    pub fn effects(&self) -> &EffectUniforms {
        &self.effects
    }

    /// Grid block as raw bytes, ready for a buffer write
    pub fn grid_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.grid)
    }

    /// Effect block as raw bytes, ready for a buffer write
    pub fn effect_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.effects)
    }

    pub fn frames_composited(&self) -> u64 {
        self.frames_composited
    }

    pub fn history(&self) -> &[CompositedFrame] {
        self.history.as_deref().unwrap_or(&[])
    }
}

impl CameraSink for UniformBlockBackend {
    fn apply_camera(&mut self, state: &CameraState) {
        self.grid.view_proj = state.view_proj().to_cols_array_2d();
    }
}

impl UniformSink for UniformBlockBackend {
    fn set_uniform(&mut self, name: &'static str, value: ParamValue) {
        let slot = match name {
            uniform_names::TIME => &mut self.grid.time,
            uniform_names::DISTORTION_STRENGTH => &mut self.grid.distortion_strength,
            uniform_names::SCALE => &mut self.grid.scale,
            _ => {
                warn!(name, "unknown grid uniform");
                return;
            }
        };
        match value {
            ParamValue::Float(v) => *slot = v,
            ParamValue::Vec2(_) => warn!(name, "grid uniform expects a scalar"),
        }
    }
}

impl EffectParameterSink for UniformBlockBackend {
    fn set_effect_param(&mut self, effect: Effect, name: &'static str, value: ParamValue) {
        match (effect, name, value) {
            (Effect::BrightnessContrast, effect_names::CONTRAST, ParamValue::Float(v)) => {
                self.effects.contrast = v;
            }
            (Effect::Glitch, effect_names::STRENGTH, ParamValue::Vec2(v)) => {
                self.effects.glitch_strength = v.to_array();
            }
            (Effect::Glitch, effect_names::COLUMNS, ParamValue::Float(v)) => {
                self.effects.glitch_columns = v;
            }
            _ => warn!(?effect, name, ?value, "unsupported effect parameter"),
        }
    }
}

impl Compositor for UniformBlockBackend {
    fn composite(&mut self, delta_ms: f64) -> Result<(), BackendError> {
        if !delta_ms.is_finite() {
            return Err(BackendError::Composite(format!(
                "non-finite frame delta {delta_ms}"
            )));
        }
        self.frames_composited += 1;
        if let Some(history) = self.history.as_mut() {
            history.push(CompositedFrame {
                delta_ms,
                grid: self.grid,
                effects: self.effects,
            });
        }
        Ok(())
    }
}
