//! Audio analysis collaborator.
//!
//! The renderer never decodes audio itself. Each frame it asks an
//! [`AudioSource`] for either frequency magnitudes or waveform bytes:
//! - [`AnalyserNode`]: FFT analyser fed with mono PCM via RustFFT
//! - [`SilentSource`]: neutral buffers for when nothing is playing
//! - [`synth`]: deterministic test signals

pub mod fft;
pub mod source;
pub mod synth;

pub use fft::{AnalyserNode, AnalyzerError};
pub use source::{
    clamp_smoothing, AudioSource, SampleDomain, SilentSource, SpectrumSample, DEFAULT_BIN_COUNT,
    WAVEFORM_MIDPOINT,
};
pub use synth::Synth;
