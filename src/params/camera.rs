//! Camera loop configuration.

use serde::{Deserialize, Serialize};

/// Control points of the closed camera loop (world units)
pub const DEFAULT_CONTROL_POINTS: [[f32; 3]; 5] = [
    [-60.6, 20.0, -55.6],
    [-60.6, 17.7, 60.6],
    [-60.6, 27.0, 120.6],
    [60.6, 80.2, 60.6],
    [60.6, 18.5, -70.6],
];

/// Parameters of the spline camera path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPathParams {
    /// Duration of one full loop around the spline (milliseconds, > 0)
    pub cycle_ms: f64,

    /// How far ahead in time the look-at target leads the camera (milliseconds)
    pub lookahead_ms: f64,

    /// Vertical drop applied to the look-ahead point before scaling (world units)
    pub gaze_drop: f32,

    /// Uniform scale pulling the look-at target toward the origin (dimensionless, < 1)
    pub target_pull: f32,

    /// Field of view with no audio input (degrees)
    pub base_fov_degrees: f32,

    /// Divisor applied to `peak.value * peak.energy` before it is added to the FOV
    pub fov_damping: f32,

    /// Closed-loop control points (world units, at least 2)
    pub control_points: Vec<[f32; 3]>,
}

impl Default for CameraPathParams {
    fn default() -> Self {
        Self {
            cycle_ms: 20_000.0,
            lookahead_ms: 1_000.0,
            gaze_drop: 1.0,
            target_pull: 0.2,
            base_fov_degrees: 75.0,
            fov_damping: 10.0,
            control_points: DEFAULT_CONTROL_POINTS.to_vec(),
        }
    }
}
