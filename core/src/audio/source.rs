//! Sample types and the per-frame audio source interface.

use serde::{Deserialize, Serialize};

/// Buffer length used when no analyser is connected (half of a 2048-point FFT).
pub const DEFAULT_BIN_COUNT: usize = 1024;

/// Waveform byte value that represents silence.
pub const WAVEFORM_MIDPOINT: u8 = 128;

/// Which analysis buffer a design consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleDomain {
    /// Magnitudes per frequency bin, 0..=255.
    Frequency,
    /// Time-domain bytes, 128 = silence.
    Waveform,
}

/// One frame's read-only view of analysis data.
///
/// Borrowed from the source for the duration of a frame and never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectrumSample<'a> {
    pub domain: SampleDomain,
    pub data: &'a [u8],
}

impl<'a> SpectrumSample<'a> {
    pub fn new(domain: SampleDomain, data: &'a [u8]) -> Self {
        Self { domain, data }
    }

    pub fn frequency(data: &'a [u8]) -> Self {
        Self::new(SampleDomain::Frequency, data)
    }

    pub fn waveform(data: &'a [u8]) -> Self {
        Self::new(SampleDomain::Waveform, data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Audio analysis collaborator, polled once per frame.
///
/// Both buffers keep a stable length. Sources without live audio return
/// neutral data (zeros for frequency, the midpoint for waveform) rather
/// than failing.
pub trait AudioSource {
    fn frequency_data(&mut self) -> &[u8];

    fn waveform_data(&mut self) -> &[u8];

    /// Upstream smoothing constant; implementations clamp to `0.1..=0.99`.
    fn set_smoothing_constant(&mut self, value: f32);

    fn sample(&mut self, domain: SampleDomain) -> SpectrumSample<'_> {
        match domain {
            SampleDomain::Frequency => SpectrumSample::frequency(self.frequency_data()),
            SampleDomain::Waveform => SpectrumSample::waveform(self.waveform_data()),
        }
    }
}

/// Clamp a smoothing constant into the range analysers accept.
pub fn clamp_smoothing(value: f32) -> f32 {
    if value.is_nan() {
        return 0.85;
    }
    value.clamp(0.1, 0.99)
}

/// Source used when no audio is connected.
#[derive(Debug, Clone)]
pub struct SilentSource {
    frequency: Vec<u8>,
    waveform: Vec<u8>,
}

impl SilentSource {
    pub fn new(bins: usize) -> Self {
        Self {
            frequency: vec![0; bins],
            waveform: vec![WAVEFORM_MIDPOINT; bins],
        }
    }
}

impl Default for SilentSource {
    fn default() -> Self {
        Self::new(DEFAULT_BIN_COUNT)
    }
}

impl AudioSource for SilentSource {
    fn frequency_data(&mut self) -> &[u8] {
        &self.frequency
    }

    fn waveform_data(&mut self) -> &[u8] {
        &self.waveform
    }

    fn set_smoothing_constant(&mut self, _value: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_source_is_neutral() {
        let mut source = SilentSource::default();
        assert_eq!(source.frequency_data().len(), DEFAULT_BIN_COUNT);
        assert!(source.frequency_data().iter().all(|&v| v == 0));
        assert!(source.waveform_data().iter().all(|&v| v == WAVEFORM_MIDPOINT));

        let sample = source.sample(SampleDomain::Waveform);
        assert_eq!(sample.domain, SampleDomain::Waveform);
        assert_eq!(sample.len(), DEFAULT_BIN_COUNT);
    }

    #[test]
    fn test_clamp_smoothing() {
        assert_eq!(clamp_smoothing(0.0), 0.1);
        assert_eq!(clamp_smoothing(1.5), 0.99);
        assert_eq!(clamp_smoothing(0.5), 0.5);
        assert_eq!(clamp_smoothing(f32::NAN), 0.85);
    }
}
