//! Spline camera: follows the closed loop and looks slightly ahead of itself.

use glam::{Mat4, Vec3};

use crate::audio::AudioFrame;
use crate::backend::CameraSink;
use crate::params::{CameraPathParams, ConfigError, RenderConfig};
use crate::spline::ClosedSpline;

/// Camera pose and projection, mutated once per frame by [`PathCamera::update`]
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Unit direction of travel along the loop; not used for the pose yet
    /// (reserved for banking into turns)
    pub heading: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraState {
    fn new(render: &RenderConfig, fov_degrees: f32) -> Self {
        let mut state = Self {
            position: Vec3::splat(5.0),
            target: Vec3::ZERO,
            fov_degrees,
            aspect: render.aspect_ratio(),
            near: render.near_plane,
            far: render.far_plane,
            heading: Vec3::Z,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        state.update_matrices();
        state
    }

    /// Recompute view and projection from the current pose
    fn update_matrices(&mut self) {
        // Always keep Y as up vector (camera never rolls)
        self.view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        self.projection =
            Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Camera travelling a closed spline with one loop per `cycle_ms`
pub struct PathCamera {
    spline: ClosedSpline,
    params: CameraPathParams,
    state: CameraState,
}

impl PathCamera {
    /// Build the camera from validated configuration.
    pub fn new(params: &CameraPathParams, render: &RenderConfig) -> Result<Self, ConfigError> {
        if !(params.cycle_ms.is_finite() && params.cycle_ms > 0.0) {
            return Err(ConfigError::InvalidCycle(params.cycle_ms));
        }
        let spline = ClosedSpline::new(params.control_points.iter().copied().map(Vec3::from_array))
            .ok_or(ConfigError::TooFewControlPoints(params.control_points.len()))?;

        Ok(Self {
            spline,
            params: params.clone(),
            state: CameraState::new(render, params.base_fov_degrees),
        })
    }

    /// Map absolute time onto the unit loop parameter `[0, 1)`
    pub fn loop_phase(&self, time_ms: f64) -> f32 {
        (time_ms.rem_euclid(self.params.cycle_ms) / self.params.cycle_ms) as f32
    }

    /// Field of view for an audio frame: base widened by peak intensity, unclamped
    pub fn fov_for(&self, audio: &AudioFrame) -> f32 {
        self.params.base_fov_degrees + audio.peak_intensity() / self.params.fov_damping
    }

    /// Look-at target for loop parameter `t2`: the ahead point lowered, then pulled toward the origin
    fn target_for(&self, t2: f32) -> Vec3 {
        let ahead = self.spline.point_at(t2);
        (ahead - Vec3::Y * self.params.gaze_drop) * self.params.target_pull
    }

    /// Advance the camera to `time_ms` and push the new pose to `sink`.
    ///
    /// # Arguments
    /// * `time_ms` - Milliseconds since scene start
    /// * `audio` - Current frame's audio features
    /// * `sink` - Backend receiving the committed pose
    pub fn update(&mut self, time_ms: f64, audio: &AudioFrame, sink: &mut impl CameraSink) {
        let t = self.loop_phase(time_ms);
        let t2 = self.loop_phase(time_ms + self.params.lookahead_ms);

        self.state.position = self.spline.point_at(t);
        self.state.heading = self.spline.tangent_at(t);
        self.state.target = self.target_for(t2);
        self.state.fov_degrees = self.fov_for(audio);
        self.state.update_matrices();

        sink.apply_camera(&self.state);
    }

    /// Current camera pose and projection
    pub fn get(&self) -> &CameraState {
        &self.state
    }

    /// Window resize: recompute the projection for the new aspect ratio.
    /// A zero-height surface (minimised window) leaves the projection untouched.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.state.aspect = width as f32 / height as f32;
        self.state.update_matrices();
    }

    /// Evenly sampled loop positions for drawing the path as a line
    pub fn path_points(&self, divisions: usize) -> Vec<Vec3> {
        self.spline.sample_points(divisions)
    }

    pub fn spline(&self) -> &ClosedSpline {
        &self.spline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::PeakFeatures;

    /// Sink that only counts pose updates
    #[derive(Default)]
    struct CountingSink {
        updates: usize,
        last_fov: f32,
    }

    impl CameraSink for CountingSink {
        fn apply_camera(&mut self, state: &CameraState) {
            self.updates += 1;
            self.last_fov = state.fov_degrees;
        }
    }

    fn camera_with_cycle(cycle_ms: f64) -> PathCamera {
        let params = CameraPathParams {
            cycle_ms,
            ..CameraPathParams::default()
        };
        PathCamera::new(&params, &RenderConfig::default()).unwrap()
    }

    fn peak_frame(value: f32, energy: f32) -> AudioFrame {
        AudioFrame {
            peak: PeakFeatures { value, energy },
            ..AudioFrame::SILENT
        }
    }

    #[test]
    fn test_rejects_zero_cycle() {
        let params = CameraPathParams {
            cycle_ms: 0.0,
            ..CameraPathParams::default()
        };
        assert!(matches!(
            PathCamera::new(&params, &RenderConfig::default()),
            Err(ConfigError::InvalidCycle(_))
        ));
    }

    #[test]
    fn test_position_is_periodic() {
        let mut camera = camera_with_cycle(10_000.0);
        let mut sink = CountingSink::default();
        let audio = AudioFrame::SILENT;

        for &time in &[0.0, 1234.5, 7_999.0] {
            camera.update(time, &audio, &mut sink);
            let base = camera.get().position;
            for k in 1..4 {
                camera.update(time + k as f64 * 10_000.0, &audio, &mut sink);
                assert!(
                    camera.get().position.abs_diff_eq(base, 1e-3),
                    "time {time} + {k} cycles"
                );
            }
        }
        assert_eq!(sink.updates, 12);
    }

    #[test]
    fn test_half_cycle_golden_position() {
        let mut camera = camera_with_cycle(10_000.0);
        camera.update(5_000.0, &AudioFrame::SILENT, &mut CountingSink::default());

        let expected = camera.spline().point_at(0.5);
        let position = camera.get().position;
        assert_eq!(position, expected);
        assert!(position.abs_diff_eq(Vec3::new(0.0, 58.0375, 102.55), 1e-3));
    }

    #[test]
    fn test_target_leads_by_lookahead_and_is_pulled_in() {
        let mut camera = camera_with_cycle(10_000.0);
        camera.update(2_000.0, &AudioFrame::SILENT, &mut CountingSink::default());

        let ahead = camera.spline().point_at(0.3);
        let expected = Vec3::new(ahead.x, ahead.y - 1.0, ahead.z) * 0.2;
        assert!(camera.get().target.abs_diff_eq(expected, 1e-4));
        assert!(camera.get().target.length() < ahead.length());
    }

    #[test]
    fn test_lookahead_wraps_around_loop_end() {
        let mut camera = camera_with_cycle(10_000.0);
        camera.update(9_500.0, &AudioFrame::SILENT, &mut CountingSink::default());

        let ahead = camera.spline().point_at(0.05);
        let expected = (ahead - Vec3::Y) * 0.2;
        assert!(camera.get().target.abs_diff_eq(expected, 1e-3));
    }

    #[test]
    fn test_fov_follows_peak() {
        let mut camera = camera_with_cycle(10_000.0);
        let mut sink = CountingSink::default();

        camera.update(0.0, &peak_frame(1.0, 10.0), &mut sink);
        assert!((camera.get().fov_degrees - 76.0).abs() < 1e-5);
        assert_eq!(sink.last_fov, camera.get().fov_degrees);

        camera.update(0.0, &AudioFrame::SILENT, &mut sink);
        assert_eq!(camera.get().fov_degrees, 75.0);
    }

    #[test]
    fn test_fov_monotonic_in_peak_intensity() {
        let camera = camera_with_cycle(10_000.0);
        let mut previous = f32::MIN;
        for step in 0..50 {
            let value = step as f32 * 0.1;
            let fov = camera.fov_for(&peak_frame(value, value * 2.0));
            assert!(fov >= previous);
            previous = fov;
        }
    }

    #[test]
    fn test_fov_is_not_clamped() {
        let camera = camera_with_cycle(10_000.0);
        let fov = camera.fov_for(&peak_frame(100.0, 100.0));
        assert_eq!(fov, 75.0 + 1000.0);
    }

    #[test]
    fn test_heading_is_unit_length() {
        let mut camera = camera_with_cycle(10_000.0);
        camera.update(3_300.0, &AudioFrame::SILENT, &mut CountingSink::default());
        assert!((camera.get().heading.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_set_aspect_updates_projection() {
        let mut camera = camera_with_cycle(10_000.0);
        let before = camera.get().projection;

        camera.set_aspect(800, 800);
        assert_eq!(camera.get().aspect, 1.0);
        assert_ne!(camera.get().projection, before);

        let square = camera.get().projection;
        camera.set_aspect(800, 0);
        assert_eq!(camera.get().projection, square);
    }

    #[test]
    fn test_view_proj_matrix_is_finite() {
        let mut camera = camera_with_cycle(10_000.0);
        camera.update(1_000.0, &AudioFrame::SILENT, &mut CountingSink::default());

        let view_proj = camera.get().view_proj();
        assert_ne!(view_proj, Mat4::IDENTITY);
        assert!(view_proj.is_finite());
    }

    #[test]
    fn test_negative_time_maps_into_loop() {
        let camera = camera_with_cycle(10_000.0);
        let phase = camera.loop_phase(-2_500.0);
        assert!((phase - 0.75).abs() < 1e-6);
    }
}
