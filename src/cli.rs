//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::audio::{AudioFrameSource, AudioSourceError, SyntheticPulse, TraceReplay};
use crate::params::{ConfigError, SceneConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "splinewave")]
#[command(about = "Audio-reactive spline camera scene, driven headless", long_about = None)]
pub struct Args {
    /// Scene configuration file (TOML); defaults are used for missing fields
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the camera loop duration (milliseconds)
    #[arg(long, value_name = "MS")]
    pub camera_cycle_ms: Option<f64>,

    /// Number of frames to render
    #[arg(long, value_name = "COUNT", default_value = "600")]
    pub frames: u64,

    /// Fixed frame rate of the simulated clock
    #[arg(long, value_name = "FPS", default_value = "60", value_parser = positive_finite)]
    pub fps: f64,

    /// Replay pre-analysed audio frames from a JSON-lines file instead of the synthetic pulse
    #[arg(long, value_name = "FILE")]
    pub audio_trace: Option<PathBuf>,

    /// Tempo of the synthetic pulse (beats per minute)
    #[arg(long, value_name = "BPM", default_value = "120", value_parser = positive_finite)]
    pub tempo: f64,

    /// Write one JSON report per rendered frame to this file
    #[arg(long, value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Print the sampled camera loop as JSON (render.path_divisions segments) and exit
    #[arg(long)]
    pub dump_path: bool,

    /// Log filter when RUST_LOG is unset (e.g. info, debug, splinewave=trace)
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,
}

/// Clock rates must be finite and above zero, or frame times turn into NaN
fn positive_finite(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("not a number: {e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a positive finite number, got {value}"))
    }
}

impl Args {
    /// Build and validate the scene configuration from file and overrides
    pub fn scene_config(&self) -> Result<SceneConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => {
                info!(path = %path.display(), "loading scene config");
                SceneConfig::load(path)?
            }
            None => SceneConfig::default(),
        };

        if let Some(cycle_ms) = self.camera_cycle_ms {
            config.camera.cycle_ms = cycle_ms;
        }

        config.validate()?;
        Ok(config)
    }

    /// Frame interval of the simulated clock (milliseconds)
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps
    }

    /// Audio source selected on the command line
    pub fn audio_source(&self) -> Result<Box<dyn AudioFrameSource>, AudioSourceError> {
        match &self.audio_trace {
            Some(path) => {
                let replay = TraceReplay::load(path)?;
                info!(frames = replay.len(), "Audio: trace replay");
                Ok(Box::new(replay))
            }
            None => {
                info!(tempo_bpm = self.tempo, "Audio: synthetic pulse");
                Ok(Box::new(SyntheticPulse::with_tempo(self.tempo)))
            }
        }
    }
}
