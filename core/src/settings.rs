//! Visualizer settings, effect toggles and engine constants.
//!
//! Settings are owned by the UI collaborator and read once per frame. The
//! JSON shape matches the UI's camelCase record, so a saved settings file
//! can be loaded directly.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::render::ThemeColor;

/// Settings loading errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-frame visualizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualizerSettings {
    pub color: ThemeColor,
    /// Stroke width, or cell size driver for block designs (1 to 10).
    pub line_thickness: f32,
    /// Magnitude multiplier (0.5 to 3.0).
    pub amplitude: f32,
    /// Analyser smoothing constant, forwarded to the audio source.
    pub sensitivity: f32,
    pub background_image: Option<PathBuf>,
    pub logo_image: Option<PathBuf>,
    pub scale: f32,
    pub position_x: f32,
    pub position_y: f32,

    pub logo_scale: f32,
    /// Horizontal anchor, percent of the free space.
    pub logo_x: f32,
    pub logo_y: f32,

    pub sticker_image: Option<PathBuf>,
    pub sticker_scale: f32,
    pub sticker_x: f32,
    pub sticker_y: f32,

    pub effects: EffectToggles,
    pub effect_params: EffectParams,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            color: ThemeColor::default(),
            line_thickness: 2.0,
            amplitude: 1.0,
            sensitivity: 0.85,
            background_image: None,
            logo_image: None,
            scale: 1.0,
            position_x: 0.0,
            position_y: 0.0,
            logo_scale: 1.0,
            logo_x: 95.0,
            logo_y: 5.0,
            sticker_image: None,
            sticker_scale: 1.0,
            sticker_x: 50.0,
            sticker_y: 50.0,
            effects: EffectToggles::default(),
            effect_params: EffectParams::default(),
        }
    }
}

impl VisualizerSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&text)?;
        log::debug!("loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The fifteen named effect switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectToggles {
    // Transforms
    pub mirror: bool,
    pub pulse: bool,
    pub shake: bool,
    pub glitch: bool,

    // Atmosphere
    pub snow: bool,
    pub rain: bool,
    /// Droplets on the lens.
    pub raindrops: bool,
    /// Floating bokeh motes.
    pub particles: bool,
    pub fireworks: bool,
    pub starfield: bool,
    pub fog: bool,
    pub fireflies: bool,

    // Screen overlays
    pub film_grain: bool,
    pub vignette: bool,
    pub scanlines: bool,
}

impl EffectToggles {
    /// Every effect switched on.
    pub fn all() -> Self {
        Self {
            mirror: true,
            pulse: true,
            shake: true,
            glitch: true,
            snow: true,
            rain: true,
            raindrops: true,
            particles: true,
            fireworks: true,
            starfield: true,
            fog: true,
            fireflies: true,
            film_grain: true,
            vignette: true,
            scanlines: true,
        }
    }
}

/// Shared effect multipliers (typically 0.1 to 3.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectParams {
    pub speed: f32,
    pub intensity: f32,
    pub shake_strength: f32,
    pub glitch_strength: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            speed: 1.0,
            intensity: 1.0,
            shake_strength: 1.0,
            glitch_strength: 1.0,
        }
    }
}

/// Substitute 1.0 for a zero (unset) multiplier.
pub(crate) fn or_one(value: f32) -> f32 {
    if value == 0.0 {
        1.0
    } else {
        value
    }
}

/// Tunable engine constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConstants {
    /// Bass energy (0..255) above which a frame counts as a beat.
    pub beat_threshold: f32,
    pub snow_count: f32,
    pub rain_count: f32,
    pub droplet_count: f32,
    pub floating_count: f32,
    pub firefly_count: f32,
    pub star_count: usize,
    pub fog_count: usize,
    pub firework_burst: usize,
}

impl Default for EngineConstants {
    fn default() -> Self {
        Self {
            beat_threshold: 140.0,
            snow_count: 150.0,
            rain_count: 300.0,
            droplet_count: 20.0,
            floating_count: 50.0,
            firefly_count: 30.0,
            star_count: 100,
            fog_count: 5,
            firework_burst: 30,
        }
    }
}

/// Settings store swapped wholesale between frames.
///
/// The renderer takes one [`SettingsHandle::snapshot`] per frame, so a
/// concurrent [`SettingsHandle::replace`] never produces a frame that mixes
/// fields from two different settings records.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    current: Arc<Mutex<Arc<VisualizerSettings>>>,
}

impl SettingsHandle {
    pub fn new(settings: VisualizerSettings) -> Self {
        Self {
            current: Arc::new(Mutex::new(Arc::new(settings))),
        }
    }

    pub fn snapshot(&self) -> Arc<VisualizerSettings> {
        let guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn replace(&self, settings: VisualizerSettings) {
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(settings);
    }

    /// Apply `f` to a copy of the current settings and publish the result.
    pub fn update(&self, f: impl FnOnce(&mut VisualizerSettings)) {
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = VisualizerSettings::clone(&guard);
        f(&mut next);
        *guard = Arc::new(next);
    }
}
