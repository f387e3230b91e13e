//! Synthetic test signals.
//!
//! Deterministic mono PCM for tests, benches and the headless example.

use std::f32::consts::PI;

/// Signal generator bound to one sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Synth {
    pub sample_rate: u32,
}

impl Synth {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    fn len(&self, seconds: f32) -> usize {
        (seconds.max(0.0) * self.sample_rate as f32) as usize
    }

    /// Pure tone.
    pub fn sine(&self, frequency: f32, seconds: f32, amplitude: f32) -> Vec<f32> {
        let rate = self.sample_rate as f32;
        (0..self.len(seconds))
            .map(|i| amplitude * (2.0 * PI * frequency * i as f32 / rate).sin())
            .collect()
    }

    /// Seeded uniform noise in `-amplitude..amplitude`.
    pub fn noise(&self, seconds: f32, amplitude: f32, seed: u64) -> Vec<f32> {
        let mut rng = fastrand::Rng::with_seed(seed);
        (0..self.len(seconds))
            .map(|_| amplitude * (rng.f32() * 2.0 - 1.0))
            .collect()
    }

    /// A 150 ms kick: pitch falls from 150 Hz to 50 Hz under an exponential decay.
    pub fn kick(&self) -> Vec<f32> {
        let rate = self.sample_rate as f32;
        let mut phase = 0.0f32;
        (0..self.len(0.15))
            .map(|i| {
                let t = i as f32 / rate;
                let freq = 50.0 + 100.0 * (-t * 30.0).exp();
                phase += 2.0 * PI * freq / rate;
                (-t * 15.0).exp() * phase.sin()
            })
            .collect()
    }

    /// Four-on-the-floor kicks at `bpm`, peak-normalised to 1.0.
    pub fn beat_pattern(&self, bpm: f32, seconds: f32) -> Vec<f32> {
        let mut out = vec![0.0; self.len(seconds)];
        let spacing = ((60.0 / bpm.max(1.0)) * self.sample_rate as f32) as usize;
        let kick = self.kick();

        for start in (0..out.len()).step_by(spacing.max(1)) {
            for (dst, k) in out[start..].iter_mut().zip(&kick) {
                *dst += k;
            }
        }

        let peak = out.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        if peak > 1.0 {
            out.iter_mut().for_each(|s| *s /= peak);
        }
        out
    }
}

impl Default for Synth {
    fn default() -> Self {
        Self::new(44100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_length_and_peak() {
        let samples = Synth::new(44100).sine(440.0, 1.0, 0.5);
        assert_eq!(samples.len(), 44100);
        let max = samples.iter().cloned().fold(0.0f32, f32::max);
        assert!((max - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_noise_is_seeded() {
        let synth = Synth::default();
        assert_eq!(synth.noise(0.01, 1.0, 7), synth.noise(0.01, 1.0, 7));
        assert_ne!(synth.noise(0.01, 1.0, 7), synth.noise(0.01, 1.0, 8));
    }

    #[test]
    fn test_kick_decays() {
        let kick = Synth::default().kick();
        let early = kick[..kick.len() / 10].iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        let late = kick[kick.len() / 2..].iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        assert!(early > late);
    }

    #[test]
    fn test_beat_pattern_is_normalised() {
        let samples = Synth::default().beat_pattern(120.0, 2.0);
        assert_eq!(samples.len(), 88200);
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }
}
