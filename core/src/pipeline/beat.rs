//! Per-frame bass energy and beat flag.

use crate::audio::{SampleDomain, SpectrumSample, WAVEFORM_MIDPOINT};

/// Frequency bins averaged for bass energy.
pub const BASS_BINS: usize = 5;
/// Stride used when estimating energy from a waveform.
pub const WAVEFORM_STRIDE: usize = 10;

/// Bass energy (0..255 scale) and whether it crossed the beat threshold.
///
/// Recomputed from scratch every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BeatState {
    pub is_beat: bool,
    pub bass_energy: f32,
}

impl BeatState {
    pub fn derive(sample: &SpectrumSample<'_>, playing: bool, threshold: f32) -> Self {
        let bass_energy = if playing { bass_energy(sample) } else { 0.0 };
        Self {
            is_beat: bass_energy > threshold,
            bass_energy,
        }
    }
}

/// Mean of the first five bins, or for waveforms twice the mean distance
/// from silence over every tenth sample.
pub fn bass_energy(sample: &SpectrumSample<'_>) -> f32 {
    let data = sample.data;
    if data.is_empty() {
        return 0.0;
    }
    match sample.domain {
        SampleDomain::Frequency => {
            let sum: f32 = (0..BASS_BINS)
                .map(|i| data.get(i).copied().unwrap_or(0) as f32)
                .sum();
            sum / BASS_BINS as f32
        }
        SampleDomain::Waveform => {
            let sum: f32 = data
                .iter()
                .step_by(WAVEFORM_STRIDE)
                .map(|&v| (v as f32 - WAVEFORM_MIDPOINT as f32).abs())
                .sum();
            sum / (data.len() as f32 / WAVEFORM_STRIDE as f32) * 2.0
        }
    }
}
