//! Real-time FFT analyser using RustFFT.
//!
//! Behaves like a browser analyser node: a sliding window of the most
//! recent samples, Blackman windowing, exponential smoothing across calls
//! and a decibel range mapped onto bytes.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::source::{clamp_smoothing, AudioSource, WAVEFORM_MIDPOINT};

pub const DEFAULT_FFT_SIZE: usize = 2048;
pub const DEFAULT_SMOOTHING: f32 = 0.85;
pub const DEFAULT_MIN_DECIBELS: f32 = -90.0;
pub const DEFAULT_MAX_DECIBELS: f32 = -10.0;

/// Error type for analyser construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyzerError {
    #[error("FFT size must be a power of 2 between 32 and 32768, got {0}")]
    InvalidFftSize(usize),
}

/// Sliding-window spectrum analyser.
pub struct AnalyserNode {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
    /// Most recent `fft_size` samples, oldest first.
    history: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    smoothing: f32,
    min_decibels: f32,
    max_decibels: f32,
    frequency: Vec<u8>,
    waveform: Vec<u8>,
    has_audio: bool,
}

impl AnalyserNode {
    pub fn new(fft_size: usize) -> Result<Self, AnalyzerError> {
        if !fft_size.is_power_of_two() || !(32..=32768).contains(&fft_size) {
            return Err(AnalyzerError::InvalidFftSize(fft_size));
        }
        Ok(Self::build(fft_size))
    }

    fn build(fft_size: usize) -> Self {
        // Blackman window, alpha = 0.16
        let window = (0..fft_size)
            .map(|i| {
                let t = i as f32 / fft_size as f32;
                0.42 - 0.5 * (2.0 * PI * t).cos() + 0.08 * (4.0 * PI * t).cos()
            })
            .collect();

        let bins = fft_size / 2;
        Self {
            fft: FftPlanner::new().plan_fft_forward(fft_size),
            fft_size,
            window,
            history: vec![0.0; fft_size],
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; bins],
            smoothing: DEFAULT_SMOOTHING,
            min_decibels: DEFAULT_MIN_DECIBELS,
            max_decibels: DEFAULT_MAX_DECIBELS,
            frequency: vec![0; bins],
            waveform: vec![WAVEFORM_MIDPOINT; bins],
            has_audio: false,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of frequency bins (FFT size / 2).
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    /// Set the byte mapping range. Ignored unless `min < max`.
    pub fn set_decibel_range(&mut self, min_decibels: f32, max_decibels: f32) {
        if min_decibels < max_decibels {
            self.min_decibels = min_decibels;
            self.max_decibels = max_decibels;
        }
    }

    /// Feed mono PCM in `-1.0..=1.0`. Only the newest `fft_size` samples are kept.
    pub fn push_samples(&mut self, samples: &[f32]) {
        if samples.is_empty() {
            return;
        }
        self.has_audio = true;
        if samples.len() >= self.fft_size {
            self.history
                .copy_from_slice(&samples[samples.len() - self.fft_size..]);
        } else {
            self.history.rotate_left(samples.len());
            let start = self.fft_size - samples.len();
            self.history[start..].copy_from_slice(samples);
        }
    }

    /// Forget all audio and smoothing state.
    pub fn reset(&mut self) {
        self.history.fill(0.0);
        self.smoothed.fill(0.0);
        self.frequency.fill(0);
        self.waveform.fill(WAVEFORM_MIDPOINT);
        self.has_audio = false;
    }

    /// Get the frequency in Hz for a given bin index.
    pub fn bin_to_freq(&self, bin: usize, sample_rate: u32) -> f32 {
        bin as f32 * sample_rate as f32 / self.fft_size as f32
    }

    fn update_frequency(&mut self) {
        for ((slot, &s), &w) in self.scratch.iter_mut().zip(&self.history).zip(&self.window) {
            *slot = Complex::new(s * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let norm = 1.0 / self.fft_size as f32;
        let range = self.max_decibels - self.min_decibels;
        for (k, byte) in self.frequency.iter_mut().enumerate() {
            let magnitude = self.scratch[k].norm() * norm;
            let smoothed = self.smoothing * self.smoothed[k] + (1.0 - self.smoothing) * magnitude;
            self.smoothed[k] = if smoothed.is_finite() { smoothed } else { 0.0 };

            let db = 20.0 * self.smoothed[k].max(1e-12).log10();
            let scaled = 255.0 / range * (db - self.min_decibels);
            *byte = scaled.floor().clamp(0.0, 255.0) as u8;
        }
    }

    fn update_waveform(&mut self) {
        let start = self.fft_size - self.waveform.len();
        for (byte, &s) in self.waveform.iter_mut().zip(&self.history[start..]) {
            *byte = (128.0 * (1.0 + s)).floor().clamp(0.0, 255.0) as u8;
        }
    }
}

impl Default for AnalyserNode {
    fn default() -> Self {
        Self::build(DEFAULT_FFT_SIZE)
    }
}

impl AudioSource for AnalyserNode {
    fn frequency_data(&mut self) -> &[u8] {
        if self.has_audio {
            self.update_frequency();
        }
        &self.frequency
    }

    fn waveform_data(&mut self) -> &[u8] {
        if self.has_audio {
            self.update_waveform();
        }
        &self.waveform
    }

    fn set_smoothing_constant(&mut self, value: f32) {
        self.smoothing = clamp_smoothing(value);
    }
}
