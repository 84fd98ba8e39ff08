//! Audio features consumed by the scene.
//!
//! Frames arrive pre-analysed; this module only defines their shape and the
//! sources that hand them to the frame loop.

mod frame;
mod source;

// Re-export public types
pub use frame::{AudioFrame, PeakFeatures};
pub use source::{AudioFrameSource, AudioSourceError, SyntheticPulse, TraceReplay};
