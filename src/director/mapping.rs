//! Audio-to-visual parameter mappings.
//!
//! Every mapping is a pure function of time, the audio frame and static
//! configuration. None of them clamp their output.

use glam::Vec2;
use serde::Serialize;

use crate::audio::AudioFrame;
use crate::params::ShaderParams;

/// Averaged energy treated as "full" when scaling distortion
pub const ENERGY_CEILING: f32 = 80.0;

/// Instantaneous energy divisor for contrast
pub const CONTRAST_ENERGY_DIVISOR: f32 = 16.0;

/// Contrast gain applied after normalising energy
pub const CONTRAST_GAIN: f32 = 1.1;

/// Glitch bands per unit of peak intensity
pub const GLITCH_COLUMN_DENSITY: f32 = 0.0004;

/// Values for the grid-plane shader
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ShaderUniforms {
    /// Scene time (milliseconds). Narrowed to `f32` for upload: whole
    /// milliseconds are exact up to 2^24 ms (about 4.6 hours), coarser after.
    pub time: f32,
    pub distortion_strength: f32,
    pub scale: f32,
}

/// Values for the post-processing chain
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EffectParams {
    pub contrast: f32,
    /// Glitch strength, identical in both axes
    #[serde(serialize_with = "serialize_vec2")]
    pub glitch_strength: Vec2,
    pub glitch_columns: f32,
}

fn serialize_vec2<S: serde::Serializer>(v: &Vec2, serializer: S) -> Result<S::Ok, S::Error> {
    v.to_array().serialize(serializer)
}

/// Formula: distortion = min + (energy_average / 80) * range
pub fn distortion_strength(audio: &AudioFrame, shader: &ShaderParams) -> f32 {
    shader.distortion_min + (audio.energy_average / ENERGY_CEILING) * shader.distortion_range
}

/// Formula: contrast = 0 + energy / 16 * 1.1
pub fn contrast(audio: &AudioFrame) -> f32 {
    audio.energy / CONTRAST_ENERGY_DIVISOR * CONTRAST_GAIN
}

pub fn glitch_strength(audio: &AudioFrame) -> Vec2 {
    Vec2::splat(audio.peak.value)
}

/// Formula: columns = peak.value * 0.0004 * peak.energy
pub fn glitch_columns(audio: &AudioFrame) -> f32 {
    audio.peak.value * GLITCH_COLUMN_DENSITY * audio.peak.energy
}

/// Grid-shader values for one frame; `time_ms` loses sub-millisecond
/// precision once narrowed, see [`ShaderUniforms::time`].
pub fn shader_uniforms(time_ms: f64, audio: &AudioFrame, shader: &ShaderParams) -> ShaderUniforms {
    ShaderUniforms {
        time: time_ms as f32,
        distortion_strength: distortion_strength(audio, shader),
        scale: shader.scale,
    }
}

pub fn effect_params(audio: &AudioFrame) -> EffectParams {
    EffectParams {
        contrast: contrast(audio),
        glitch_strength: glitch_strength(audio),
        glitch_columns: glitch_columns(audio),
    }
}
