//! Grid shader parameters.

use serde::{Deserialize, Serialize};

/// Static parameters of the grid-plane distortion shader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderParams {
    /// Distortion strength at silence (shader units)
    /// Formula: distortion = min + (energy_average / 80) * range
    pub distortion_min: f32,

    /// Distortion added when the averaged energy reaches the ceiling of 80
    pub distortion_range: f32,

    /// Grid texture scale (not audio-reactive)
    pub scale: f32,
}

impl Default for ShaderParams {
    fn default() -> Self {
        Self {
            distortion_min: 0.05,
            distortion_range: 0.6,
            scale: 1.0,
        }
    }
}
