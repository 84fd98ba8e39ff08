//! Splinewave library - spline camera and audio-to-visual parameter mapping

pub mod audio;
pub mod backend;
pub mod camera;
pub mod cli;
pub mod director;
pub mod logging;
pub mod params;
pub mod rendering;
pub mod spline;
