//! Multi-frame sticker decoding and time-based frame lookup.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::{AnimationDecoder, Frame, ImageFormat};
use tiny_skia::Pixmap;

use super::AssetError;
use crate::render::pixmap_from_rgba8;

/// Display time used for frames that declare a zero delay.
pub const DEFAULT_FRAME_DELAY_MS: f64 = 100.0;

/// One decoded frame and how long it stays on screen.
#[derive(Debug, Clone)]
pub struct AnimatedFrame {
    pub image: Pixmap,
    pub delay_ms: f64,
}

/// Decoded animation, or nothing when unloaded.
///
/// Only sequences of two or more frames count as loaded; a still image is
/// left to the static overlay path.
#[derive(Debug, Clone, Default)]
pub struct AnimatedOverlay {
    source: Option<PathBuf>,
    frames: Vec<AnimatedFrame>,
    total_ms: f64,
}

impl AnimatedOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already decoded frames.
    pub fn from_frames(frames: Vec<AnimatedFrame>) -> Result<Self, AssetError> {
        if frames.len() <= 1 {
            return Err(AssetError::NotAnimated);
        }
        let total_ms: f64 = frames.iter().map(|f| f.delay_ms.max(0.0)).sum();
        if !(total_ms > 0.0) {
            return Err(AssetError::ZeroDuration);
        }
        Ok(Self {
            source: None,
            frames,
            total_ms,
        })
    }

    /// Decode an animated GIF or APNG held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        Self::from_frames(decode_frames(bytes)?)
    }

    /// Decode a file. Used as the sticker slot's worker decoder.
    pub fn open(path: &Path) -> Result<Self, AssetError> {
        let mut overlay = Self::from_bytes(&std::fs::read(path)?)?;
        overlay.source = Some(path.to_path_buf());
        Ok(overlay)
    }

    /// Load `path` in place. Reloading the current source is a no-op; on
    /// failure the overlay is left unloaded.
    pub fn load(&mut self, path: &Path) -> Result<(), AssetError> {
        if self.is_loaded() && self.source.as_deref() == Some(path) {
            return Ok(());
        }
        self.dispose();
        *self = Self::open(path)?;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.frames.len() > 1
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Sum of all frame delays in milliseconds.
    pub fn total_duration(&self) -> f64 {
        self.total_ms
    }

    /// Frame visible `time_ms` after the animation started, looping forever.
    pub fn get_frame(&self, time_ms: f64) -> Option<&Pixmap> {
        if !self.is_loaded() || !(self.total_ms > 0.0) {
            return None;
        }
        let t = if time_ms.is_finite() {
            time_ms.rem_euclid(self.total_ms)
        } else {
            0.0
        };

        let mut elapsed = 0.0;
        for frame in &self.frames {
            elapsed += frame.delay_ms.max(0.0);
            if t < elapsed {
                return Some(&frame.image);
            }
        }
        self.frames.first().map(|f| &f.image)
    }

    /// Release every decoded frame.
    pub fn dispose(&mut self) {
        self.frames.clear();
        self.total_ms = 0.0;
        self.source = None;
    }
}

fn decode_frames(bytes: &[u8]) -> Result<Vec<AnimatedFrame>, AssetError> {
    let frames = match image::guess_format(bytes)? {
        ImageFormat::Gif => GifDecoder::new(Cursor::new(bytes))?
            .into_frames()
            .collect_frames()?,
        ImageFormat::Png => {
            let decoder = PngDecoder::new(Cursor::new(bytes))?;
            if !decoder.is_apng()? {
                return Err(AssetError::NotAnimated);
            }
            decoder.apng()?.into_frames().collect_frames()?
        }
        _ => return Err(AssetError::NotAnimated),
    };
    frames.into_iter().map(convert_frame).collect()
}

fn convert_frame(frame: Frame) -> Result<AnimatedFrame, AssetError> {
    let (numer, denom) = frame.delay().numer_denom_ms();
    let delay_ms = if numer == 0 || denom == 0 {
        DEFAULT_FRAME_DELAY_MS
    } else {
        numer as f64 / denom as f64
    };
    let buffer = frame.into_buffer();
    let (w, h) = buffer.dimensions();
    Ok(AnimatedFrame {
        image: pixmap_from_rgba8(w, h, buffer.as_raw())?,
        delay_ms,
    })
}
