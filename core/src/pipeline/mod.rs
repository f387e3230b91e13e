//! Frame pipeline: beat derivation, timing, orchestration, scheduling and
//! headless export.

mod beat;
mod clock;
pub mod export;
mod scheduler;
mod visualizer;

pub use beat::{bass_energy, BeatState, BASS_BINS, WAVEFORM_STRIDE};
pub use clock::{FrameClock, FrameTime};
pub use export::{export_frames, ExportConfig, ExportProgress, ExportSummary, Resolution};
pub use scheduler::{FixedRateScheduler, FrameScheduler, RealtimeScheduler, RenderLoop, StopHandle};
pub use visualizer::{FrameReport, Visualizer};

use crate::audio::AnalyzerError;
use crate::overlay::AssetError;
use crate::render::RenderError;
use crate::settings::SettingsError;

/// Errors that can occur outside the frame loop (setup, export, sinks).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
