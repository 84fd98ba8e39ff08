//! Producers of one [`AudioFrame`] per rendered frame.
//!
//! Capture and spectral analysis happen outside this crate; these sources
//! either replay frames analysed elsewhere or synthesise a beat-like signal
//! for running the scene without an audio pipeline.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::frame::{AudioFrame, PeakFeatures};

#[derive(Debug, Error)]
pub enum AudioSourceError {
    #[error("failed to read audio trace {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid audio frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("audio trace {0} contains no frames")]
    Empty(String),
}

/// Anything that can hand the scene an audio frame for a given instant
pub trait AudioFrameSource {
    /// Frame for absolute scene time `time_ms`; called once per rendered frame.
    fn next_frame(&mut self, time_ms: f64) -> AudioFrame;
}

/// Synthetic kick-drum style pulse: a peak on every beat that decays exponentially
#[derive(Debug, Clone)]
pub struct SyntheticPulse {
    /// Beats per minute
    pub tempo_bpm: f64,
    /// Energy at the moment a beat fires
    pub beat_energy: f32,
    /// Energy floor between beats
    pub floor_energy: f32,
    /// Time constant of the exponential decay after each beat (milliseconds)
    pub decay_ms: f64,
    /// Smoothing factor of the running energy average (0..1, per frame)
    pub average_smoothing: f32,
    energy_average: f32,
}

impl Default for SyntheticPulse {
    fn default() -> Self {
        Self {
            tempo_bpm: 120.0,
            beat_energy: 24.0,
            floor_energy: 2.0,
            decay_ms: 120.0,
            average_smoothing: 0.05,
            energy_average: 0.0,
        }
    }
}

impl SyntheticPulse {
    /// Default pulse shape at the given tempo
    pub fn with_tempo(tempo_bpm: f64) -> Self {
        Self {
            tempo_bpm,
            ..Self::default()
        }
    }

    pub fn energy_average(&self) -> f32 {
        self.energy_average
    }
}

impl AudioFrameSource for SyntheticPulse {
    fn next_frame(&mut self, time_ms: f64) -> AudioFrame {
        let beat_ms = 60_000.0 / self.tempo_bpm;
        let since_beat = time_ms.rem_euclid(beat_ms);
        let envelope = (-since_beat / self.decay_ms).exp() as f32;

        let energy = self.floor_energy + (self.beat_energy - self.floor_energy) * envelope;
        self.energy_average += (energy - self.energy_average) * self.average_smoothing;

        AudioFrame {
            energy,
            energy_average: self.energy_average,
            peak: PeakFeatures {
                value: envelope,
                energy: self.beat_energy * envelope,
            },
        }
    }
}

/// Replays pre-analysed frames from a JSON-lines trace, looping at the end.
#[derive(Debug, Clone)]
pub struct TraceReplay {
    frames: Vec<AudioFrame>,
    cursor: usize,
}

impl TraceReplay {
    pub fn new(frames: Vec<AudioFrame>) -> Option<Self> {
        (!frames.is_empty()).then_some(Self { frames, cursor: 0 })
    }

    /// Load a trace where every non-blank line is one JSON-encoded [`AudioFrame`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AudioSourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AudioSourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let frames = Self::parse(BufReader::new(file)).map_err(|err| match err {
            AudioSourceError::Io { source, .. } => AudioSourceError::Io {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;

        debug!(frames = frames.len(), path = %path.display(), "loaded audio trace");
        Self::new(frames).ok_or_else(|| AudioSourceError::Empty(path.display().to_string()))
    }

    fn parse(reader: impl BufRead) -> Result<Vec<AudioFrame>, AudioSourceError> {
        let mut frames = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| AudioSourceError::Io {
                path: String::new(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let frame = serde_json::from_str(&line).map_err(|source| AudioSourceError::Parse {
                line: index + 1,
                source,
            })?;
            frames.push(frame);
        }
        Ok(frames)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl AudioFrameSource for TraceReplay {
    fn next_frame(&mut self, _time_ms: f64) -> AudioFrame {
        let frame = self.frames[self.cursor];
        self.cursor += 1;
        if self.cursor == self.frames.len() {
            debug!("audio trace exhausted, looping");
            self.cursor = 0;
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_pulse_peaks_on_beat() {
        let mut pulse = SyntheticPulse::default();
        let on_beat = pulse.next_frame(0.0);
        let off_beat = pulse.next_frame(250.0);

        assert!((on_beat.peak.value - 1.0).abs() < 1e-6);
        assert_eq!(on_beat.energy, pulse.beat_energy);
        assert!(off_beat.peak.value < on_beat.peak.value);
        assert!(off_beat.energy >= pulse.floor_energy);
    }

    #[test]
    fn test_pulse_repeats_every_beat() {
        let mut pulse = SyntheticPulse::default();
        let a = pulse.next_frame(100.0);
        let b = pulse.next_frame(600.0); // 120 bpm = 500 ms per beat
        assert!((a.peak.value - b.peak.value).abs() < 1e-5);
        assert!((a.energy - b.energy).abs() < 1e-4);
    }

    #[test]
    fn test_with_tempo_sets_beat_length() {
        let mut pulse = SyntheticPulse::with_tempo(60.0);
        assert_eq!(pulse.tempo_bpm, 60.0);
        assert_eq!(pulse.energy_average(), 0.0);

        let a = pulse.next_frame(100.0);
        let b = pulse.next_frame(1_100.0); // 60 bpm = 1000 ms per beat
        assert!((a.peak.value - b.peak.value).abs() < 1e-5);
    }

    #[test]
    fn test_pulse_average_tracks_energy() {
        let mut pulse = SyntheticPulse::default();
        let mut last = AudioFrame::SILENT;
        for frame in 0..600 {
            last = pulse.next_frame(frame as f64 * 1000.0 / 60.0);
        }
        assert!(last.energy_average > pulse.floor_energy);
        assert!(last.energy_average < pulse.beat_energy);
    }

    #[test]
    fn test_trace_parse_skips_blank_lines() {
        let text = "{\"energy\":1,\"energyAverage\":2,\"peak\":{\"value\":0,\"energy\":0}}\n\n\
                    {\"energy\":3,\"energyAverage\":4,\"peak\":{\"value\":1,\"energy\":5}}\n";
        let frames = TraceReplay::parse(Cursor::new(text)).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].peak.energy, 5.0);
    }

    #[test]
    fn test_trace_parse_reports_line_number() {
        let text = "{\"energy\":1,\"energyAverage\":2,\"peak\":{\"value\":0,\"energy\":0}}\nnot json\n";
        let err = TraceReplay::parse(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, AudioSourceError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_trace_replay_loops() {
        let frames = vec![
            AudioFrame {
                energy: 1.0,
                ..AudioFrame::SILENT
            },
            AudioFrame {
                energy: 2.0,
                ..AudioFrame::SILENT
            },
        ];
        let mut replay = TraceReplay::new(frames).unwrap();
        let energies: Vec<f32> = (0..5).map(|i| replay.next_frame(i as f64).energy).collect();
        assert_eq!(energies, vec![1.0, 2.0, 1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_trace_load_empty_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file).unwrap();
        assert!(matches!(
            TraceReplay::load(file.path()),
            Err(AudioSourceError::Empty(_))
        ));
    }

    #[test]
    fn test_trace_new_rejects_empty() {
        assert!(TraceReplay::new(Vec::new()).is_none());
    }
}
