//! Splinewave - audio-reactive grid scene seen from a camera looping a spline.
//!
//! Runs the scene director headless on a fixed-step clock: each frame pulls
//! an audio frame, updates camera, effects and uniforms, and optionally
//! writes a JSON report of what was drawn.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use splinewave::camera::PathCamera;
use splinewave::cli::Args;
use splinewave::director::SceneDirector;
use splinewave::logging;
use splinewave::rendering::UniformBlockBackend;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level)?;

    let config = args.scene_config().context("Invalid scene configuration")?;

    if args.dump_path {
        let camera = PathCamera::new(&config.camera, &config.render)?;
        let points: Vec<[f32; 3]> = camera
            .path_points(config.render.path_divisions)
            .into_iter()
            .map(|p| p.to_array())
            .collect();
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &points)?;
        writeln!(stdout)?;
        return Ok(());
    }

    let mut audio = args.audio_source().context("Failed to open audio source")?;
    let mut director = SceneDirector::new(&config, UniformBlockBackend::default())?;

    let mut trace = match &args.trace {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create trace file: {}", path.display()))?;
            Some(BufWriter::new(file))
        }
        None => None,
    };

    let frame_ms = args.frame_interval_ms();
    info!(
        frames = args.frames,
        fps = args.fps,
        cycle_ms = config.camera.cycle_ms,
        "Splinewave is running"
    );

    let mut widest_fov = f32::MIN;
    for frame in 0..args.frames {
        let time_ms = frame as f64 * frame_ms;
        let audio_frame = audio.next_frame(time_ms);
        let report = director
            .render(frame_ms, time_ms, &audio_frame)
            .with_context(|| format!("Render failed at frame {frame}"))?;

        widest_fov = widest_fov.max(report.fov_degrees);
        if let Some(writer) = trace.as_mut() {
            serde_json::to_writer(&mut *writer, &report)?;
            writeln!(writer)?;
        }
        if frame % 60 == 0 {
            debug!(frame, time_ms, fov = report.fov_degrees, "progress");
        }
    }

    if let Some(mut writer) = trace {
        writer.flush().context("Failed to flush trace file")?;
    }

    info!(
        frames = director.backend().frames_composited(),
        widest_fov, "Done"
    );
    Ok(())
}
