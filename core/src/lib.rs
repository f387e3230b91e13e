//! Sonic Canvas Core
//!
//! Audio-reactive scene renderer for generating music visualizer frames.
//!
//! # Features
//!
//! - 18 spectrum and waveform designs drawn on a CPU canvas via tiny-skia
//! - FFT analysis of mono PCM via RustFFT, shaped like a browser analyser
//! - Beat detection from bass energy
//! - Particle atmospherics (snow, rain, fireworks, fog, ...) and screen overlays
//! - Background, logo and animated sticker overlays decoded off-thread
//! - Live and offline (fixed frame rate) render loops, PNG frame export

pub mod audio;
pub mod designs;
pub mod effects;
pub mod overlay;
pub mod pipeline;
pub mod render;
pub mod settings;

// Re-export commonly used types
pub use audio::{AnalyserNode, AudioSource, SampleDomain, SilentSource, SpectrumSample};
pub use designs::{DrawInput, VisualizerMode};
pub use effects::{EffectEngine, EffectKind, Particle};
pub use overlay::{AnimatedOverlay, AssetError, OverlayAssets};
pub use pipeline::{
    export_frames, BeatState, ExportConfig, FixedRateScheduler, FrameScheduler, PipelineError,
    RealtimeScheduler, RenderLoop, Resolution, Visualizer,
};
pub use render::{Canvas, RenderError, Rgba, ThemeColor, WORKING_HEIGHT, WORKING_WIDTH};
pub use settings::{
    EffectParams, EffectToggles, EngineConstants, SettingsError, SettingsHandle,
    VisualizerSettings,
};
