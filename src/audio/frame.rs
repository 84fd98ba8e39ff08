//! Per-frame audio feature snapshot.

use serde::{Deserialize, Serialize};

/// Peak detector output for the current frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakFeatures {
    /// Peak magnitude (0 when no peak is active)
    pub value: f32,
    /// Energy measured at the peak
    pub energy: f32,
}

/// Audio analysis features for one rendered frame.
///
/// Produced upstream once per frame and borrowed read-only by the camera and
/// the director. Serialized as `{energy, energyAverage, peak: {value, energy}}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFrame {
    /// Instantaneous energy
    pub energy: f32,
    /// Energy averaged over recent frames (ceiling of 80 assumed by the mappings)
    pub energy_average: f32,
    pub peak: PeakFeatures,
}

impl AudioFrame {
    /// A frame with no audio activity
    pub const SILENT: Self = Self {
        energy: 0.0,
        energy_average: 0.0,
        peak: PeakFeatures {
            value: 0.0,
            energy: 0.0,
        },
    };

    /// Product of peak magnitude and peak energy, the driver of FOV and glitch density
    pub fn peak_intensity(&self) -> f32 {
        self.peak.value * self.peak.energy
    }
}
