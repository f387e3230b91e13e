//! Background, logo and sticker imagery.
//!
//! Every image is decoded off the render thread and consumed through
//! [`AssetSlot`] state checks, so a slow or broken file only ever means the
//! overlay is missing from a frame.

mod animated;
mod asset;
pub mod placement;

use std::path::Path;
use std::time::{Duration, Instant};

use thiserror::Error;
use tiny_skia::Pixmap;

pub use animated::{AnimatedFrame, AnimatedOverlay, DEFAULT_FRAME_DELAY_MS};
pub use asset::{decode_image, AssetSlot, AssetState, DecodeFn};
pub use placement::Placement;

use crate::render::RenderError;
use crate::settings::VisualizerSettings;

/// Errors from loading overlay assets.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("image is not animated")]
    NotAnimated,

    #[error("animation has zero total duration")]
    ZeroDuration,

    #[error("decoder thread exited without a result")]
    WorkerGone,
}

impl AssetError {
    /// A still image offered as an animation. Callers fall back to the
    /// static decode, so this is not worth a warning.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NotAnimated)
    }
}

fn decode_animation(path: &Path) -> Result<AnimatedOverlay, AssetError> {
    AnimatedOverlay::open(path)
}

/// The three overlay images configured in settings.
///
/// The sticker is decoded twice in parallel: once as a still image and once
/// as an animation. When the animation loads it takes precedence.
#[derive(Debug)]
pub struct OverlayAssets {
    background: AssetSlot<Pixmap>,
    logo: AssetSlot<Pixmap>,
    sticker: AssetSlot<Pixmap>,
    sticker_animation: AssetSlot<AnimatedOverlay>,
}

impl Default for OverlayAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayAssets {
    pub fn new() -> Self {
        Self {
            background: AssetSlot::new("background"),
            logo: AssetSlot::new("logo"),
            sticker: AssetSlot::new("sticker"),
            sticker_animation: AssetSlot::new("sticker-animation"),
        }
    }

    /// Start decodes for any image path that changed since the last call.
    pub fn sync(&mut self, settings: &VisualizerSettings) {
        self.background
            .sync(settings.background_image.as_deref(), decode_image);
        self.logo.sync(settings.logo_image.as_deref(), decode_image);
        self.sticker.sync(settings.sticker_image.as_deref(), decode_image);
        self.sticker_animation
            .sync(settings.sticker_image.as_deref(), decode_animation);
    }

    /// Collect finished decodes without blocking.
    pub fn poll(&mut self) {
        self.background.poll();
        self.logo.poll();
        self.sticker.poll();
        self.sticker_animation.poll();
    }

    /// Block until no decode is pending or `timeout` passes. Offline
    /// renders call this so the first frame already has its overlays.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let left = || deadline.saturating_duration_since(Instant::now());
        self.background.wait(left())
            && self.logo.wait(left())
            && self.sticker.wait(left())
            && self.sticker_animation.wait(left())
    }

    pub fn background(&self) -> Option<&Pixmap> {
        self.background.ready()
    }

    pub fn logo(&self) -> Option<&Pixmap> {
        self.logo.ready()
    }

    pub fn sticker_animation(&self) -> Option<&AnimatedOverlay> {
        self.sticker_animation.ready().filter(|a| a.is_loaded())
    }

    /// Sticker image for `elapsed_ms`: the animated frame when available,
    /// otherwise the still decode.
    pub fn sticker(&self, elapsed_ms: f64) -> Option<&Pixmap> {
        self.sticker_animation()
            .and_then(|a| a.get_frame(elapsed_ms))
            .or_else(|| self.sticker.ready())
    }

    pub fn is_pending(&self) -> bool {
        self.background.is_pending()
            || self.logo.is_pending()
            || self.sticker.is_pending()
            || self.sticker_animation.is_pending()
    }

    /// Release every decoded image and abandon in-flight decodes.
    pub fn dispose(&mut self) {
        self.background.dispose();
        self.logo.dispose();
        self.sticker.dispose();
        self.sticker_animation.dispose();
    }
}
