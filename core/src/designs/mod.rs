//! Visualization design system.
//!
//! Every design is a pure function of (sample, size, settings, elapsed
//! time) that draws onto a [`Canvas`](crate::render::Canvas). Designs keep no state between
//! frames, so switching modes costs nothing.
//!
//! - Bars family: Bars, DualBars, Equalizer, LedBars, Pixel
//! - Waves: Wave, Fluid, JellyWave, Aurora
//! - Polar: Circular, Ripple, Starburst, PulseCircles, FlowerPetals, Butterfly
//! - Dots: Spectrum, DotWave, Particles

mod bars;
mod circular;
mod dots;
mod registry;
mod wave;

pub use registry::{draw, draw_fn, DrawFn};

use serde::{Deserialize, Serialize};

use crate::audio::SampleDomain;
use crate::render::{Fill, Rgba, RAINBOW_STOPS};
use crate::settings::VisualizerSettings;

/// Inputs shared by every design.
#[derive(Debug, Clone, Copy)]
pub struct DrawInput<'a> {
    pub data: &'a [u8],
    pub width: f32,
    pub height: f32,
    pub settings: &'a VisualizerSettings,
    /// Animation clock in milliseconds (advances only while playing).
    pub elapsed_ms: f64,
}

impl DrawInput<'_> {
    /// Value at `i` as `f32`, or 0 past the end of the buffer.
    #[inline]
    pub(crate) fn value(&self, i: usize) -> f32 {
        self.data.get(i).copied().unwrap_or(0) as f32
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn is_rainbow(&self) -> bool {
        self.settings.color.is_rainbow()
    }

    /// The theme colour, or white when rainbow is selected.
    pub(crate) fn color(&self) -> Rgba {
        self.settings.color.solid_or_white()
    }

    pub(crate) fn amplitude(&self) -> f32 {
        self.settings.amplitude
    }

    pub(crate) fn thickness(&self) -> f32 {
        self.settings.line_thickness
    }
}

/// `floor(len * fraction)`, never below 1.
pub(crate) fn meaningful_len(len: usize, fraction: f32) -> usize {
    ((len as f32 * fraction).floor() as usize).max(1)
}

/// Hue sweep over `n` slots.
pub(crate) fn hue_at(i: usize, n: usize, lightness: f32) -> Rgba {
    Rgba::hsl(i as f32 / n.max(1) as f32 * 360.0, 100.0, lightness)
}

/// The 7-stop rainbow, horizontal (left to right) or vertical (bottom up).
pub(crate) fn rainbow_gradient(width: f32, height: f32, horizontal: bool) -> Fill {
    if horizontal {
        Fill::linear((0.0, 0.0), (width, 0.0), &RAINBOW_STOPS)
    } else {
        Fill::linear((0.0, height), (0.0, 0.0), &RAINBOW_STOPS)
    }
}

/// Mean of the first ten bins, 0..255.
pub(crate) fn bass_average(input: &DrawInput) -> f32 {
    (0..10).map(|i| input.value(i)).sum::<f32>() / 10.0
}

/// Available visualization modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisualizerMode {
    Bars,
    Wave,
    Circular,
    DualBars,
    Ripple,
    Pixel,
    Equalizer,
    Starburst,
    Butterfly,
    Aurora,
    Spectrum,
    DotWave,
    LedBars,
    Fluid,
    Particles,
    JellyWave,
    PulseCircles,
    FlowerPetals,
}

impl VisualizerMode {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::all()
            .iter()
            .copied()
            .find(|m| m.name().replace('_', "").eq_ignore_ascii_case(&key))
    }

    /// Parse a mode name, falling back to [`VisualizerMode::Bars`].
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            log::warn!("unknown visualizer mode {s:?}, using BARS");
            Self::Bars
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bars => "BARS",
            Self::Wave => "WAVE",
            Self::Circular => "CIRCULAR",
            Self::DualBars => "DUAL_BARS",
            Self::Ripple => "RIPPLE",
            Self::Pixel => "PIXEL",
            Self::Equalizer => "EQUALIZER",
            Self::Starburst => "STARBURST",
            Self::Butterfly => "BUTTERFLY",
            Self::Aurora => "AURORA",
            Self::Spectrum => "SPECTRUM",
            Self::DotWave => "DOT_WAVE",
            Self::LedBars => "LED_BARS",
            Self::Fluid => "FLUID",
            Self::Particles => "PARTICLES",
            Self::JellyWave => "JELLY_WAVE",
            Self::PulseCircles => "PULSE_CIRCLES",
            Self::FlowerPetals => "FLOWER_PETALS",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Bars => "Classic vertical bars",
            Self::Wave => "Oscilloscope line",
            Self::Circular => "Bars around a ring",
            Self::DualBars => "Bars growing up and down from the centre",
            Self::Ripple => "Concentric circles per frequency band",
            Self::Pixel => "Retro blocky bars",
            Self::Equalizer => "Segmented LED equalizer",
            Self::Starburst => "Radial rays from the centre",
            Self::Butterfly => "Mirrored wing curves",
            Self::Aurora => "Rainbow gradient wave with reflection",
            Self::Spectrum => "Centre-out rainbow dot columns",
            Self::DotWave => "Horizontal wave of dots",
            Self::LedBars => "Rounded rainbow LED segments",
            Self::Fluid => "Filled gradient fluid",
            Self::Particles => "Pastel particle dust",
            Self::JellyWave => "Layered wobbling jelly wave",
            Self::PulseCircles => "Heartbeat rings driven by bass",
            Self::FlowerPetals => "Rotating flower of petals",
        }
    }

    /// Which analysis buffer this mode reads.
    pub fn sample_domain(&self) -> SampleDomain {
        match self {
            Self::Wave | Self::Fluid | Self::JellyWave => SampleDomain::Waveform,
            _ => SampleDomain::Frequency,
        }
    }

    /// True for modes that always draw their own palette.
    pub fn ignores_theme_color(&self) -> bool {
        matches!(
            self,
            Self::Aurora | Self::Spectrum | Self::DotWave | Self::LedBars | Self::Particles
        )
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Bars,
            Self::Wave,
            Self::Circular,
            Self::DualBars,
            Self::Ripple,
            Self::Pixel,
            Self::Equalizer,
            Self::Starburst,
            Self::Butterfly,
            Self::Aurora,
            Self::Spectrum,
            Self::DotWave,
            Self::LedBars,
            Self::Fluid,
            Self::Particles,
            Self::JellyWave,
            Self::PulseCircles,
            Self::FlowerPetals,
        ]
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for VisualizerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
