//! Closed uniform Catmull-Rom curve through a fixed set of control points.

use glam::Vec3;

/// Tension of the uniform Catmull-Rom basis (0.5 = standard Catmull-Rom)
const TENSION: f32 = 0.5;

/// Closed Catmull-Rom spline, immutable after construction
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSpline {
    points: Vec<Vec3>,
}

/// Cubic Hermite segment coefficients: c0 + c1*w + c2*w^2 + c3*w^3
struct Segment {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl Segment {
    fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        let t0 = (p2 - p0) * TENSION;
        let t1 = (p3 - p1) * TENSION;
        Self {
            c0: p1,
            c1: t0,
            c2: -3.0 * p1 + 3.0 * p2 - 2.0 * t0 - t1,
            c3: 2.0 * p1 - 2.0 * p2 + t0 + t1,
        }
    }

    fn point(&self, w: f32) -> Vec3 {
        self.c0 + w * (self.c1 + w * (self.c2 + w * self.c3))
    }

    fn derivative(&self, w: f32) -> Vec3 {
        self.c1 + w * (2.0 * self.c2 + w * 3.0 * self.c3)
    }
}

impl ClosedSpline {
    /// Build a closed loop through `points`.
    ///
    /// Returns `None` with fewer than 2 points; callers validate configuration
    /// before reaching this, so `None` means a programming error upstream.
    pub fn new(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let points: Vec<Vec3> = points.into_iter().collect();
        (points.len() >= 2).then_some(Self { points })
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    /// Locate the segment containing loop parameter `t` and the local weight within it.
    fn segment_at(&self, t: f32) -> (Segment, f32) {
        let n = self.points.len();
        let p = n as f32 * t;
        let base = p.floor();
        let weight = p - base;
        let i = (base as i64).rem_euclid(n as i64) as usize;

        let at = |offset: usize| self.points[(i + offset) % n];
        let segment = Segment::catmull_rom(at(n - 1), at(0), at(1), at(2));
        (segment, weight)
    }

    /// Evaluate the curve at loop parameter `t` (one loop per unit of `t`).
    pub fn point_at(&self, t: f32) -> Vec3 {
        let (segment, weight) = self.segment_at(t);
        segment.point(weight)
    }

    /// Unit tangent at loop parameter `t`, or zero where the curve stalls.
    pub fn tangent_at(&self, t: f32) -> Vec3 {
        let (segment, weight) = self.segment_at(t);
        segment.derivative(weight).normalize_or_zero()
    }

    /// `divisions + 1` evenly spaced samples from `t = 0` to `t = 1` inclusive.
    pub fn sample_points(&self, divisions: usize) -> Vec<Vec3> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|d| self.point_at(d as f32 / divisions as f32))
            .collect()
    }
}
