//! Capability traits the scene core drives.
//!
//! The camera and director never touch a concrete graphics library; a backend
//! implements these sinks and owns pipelines, textures and effect passes.

use glam::Vec2;
use thiserror::Error;

use crate::audio::AudioFrame;
use crate::camera::CameraState;

/// Value written into a named shader uniform or effect parameter
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Vec2(Vec2),
}

/// Post-processing effects whose parameters the director drives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    BrightnessContrast,
    Glitch,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("frame composition failed: {0}")]
    Composite(String),
}

/// Accepts camera pose and projection updates
pub trait CameraSink {
    /// Called after the camera committed a new pose; the backend recomputes
    /// anything that depends on position, orientation or projection.
    fn apply_camera(&mut self, state: &CameraState);
}

/// Accepts named uniforms for the grid-plane shader
pub trait UniformSink {
    fn set_uniform(&mut self, name: &'static str, value: ParamValue);
}

/// Accepts named parameters for post-processing effects
pub trait EffectParameterSink {
    fn set_effect_param(&mut self, effect: Effect, name: &'static str, value: ParamValue);
}

/// Composites and presents one frame
pub trait Compositor {
    fn composite(&mut self, delta_ms: f64) -> Result<(), BackendError>;
}

/// Full backend surface used by the director
pub trait RenderBackend: CameraSink + UniformSink + EffectParameterSink + Compositor {}

impl<T> RenderBackend for T where T: CameraSink + UniformSink + EffectParameterSink + Compositor {}

/// Time- and audio-driven geometry living in the backend's scene (torus ring, reactive tube)
pub trait ProceduralGeometry {
    /// Called after the camera has moved, so `camera` is this frame's pose.
    fn update(&mut self, time_ms: f64, delta_ms: f64, audio: &AudioFrame, camera: &CameraState);
}
