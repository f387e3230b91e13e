//! Colour types: straight-alpha RGBA, HSL conversion and the theme colour.
//!
//! The theme colour is either a concrete colour or the `rainbow` sentinel,
//! in which case every design substitutes its own procedural hue mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA colour with `f32` channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb8(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb8(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    /// Same colour with the alpha channel replaced.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 17;
                }
                Some(Self::rgb8(out[0], out[1], out[2]))
            }
            6 | 8 => {
                let r = channel(hex.get(0..2)?)?;
                let g = channel(hex.get(2..4)?)?;
                let b = channel(hex.get(4..6)?)?;
                let a = match hex.get(6..8) {
                    Some(a) => channel(a)? as f32 / 255.0,
                    None => 1.0,
                };
                Some(Self::rgba8(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Hex form (`#rrggbb`, or `#rrggbbaa` when not opaque).
    pub fn to_hex(&self) -> String {
        let [r, g, b] = [self.r, self.g, self.b].map(to_channel);
        if self.a >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{:02x}", to_channel(self.a))
        }
    }

    /// Colour from hue (degrees, wrapped), saturation and lightness (percent).
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            return Self { r: l, g: l, b: l, a: 1.0 };
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self {
            r: hue_to_channel(p, q, h + 1.0 / 3.0),
            g: hue_to_channel(p, q, h),
            b: hue_to_channel(p, q, h - 1.0 / 3.0),
            a: 1.0,
        }
    }

    pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        Self::hsl(hue, saturation, lightness).with_alpha(alpha)
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(
            to_channel(self.r),
            to_channel(self.g),
            to_channel(self.b),
            to_channel(self.a),
        )
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Seven-stop rainbow shared by the line, fluid and jelly designs.
pub const RAINBOW_STOPS: [(f32, Rgba); 7] = [
    (0.0, Rgba::rgb8(0xff, 0x00, 0x00)),
    (0.15, Rgba::rgb8(0xff, 0x7f, 0x00)),
    (0.3, Rgba::rgb8(0xff, 0xff, 0x00)),
    (0.45, Rgba::rgb8(0x00, 0xff, 0x00)),
    (0.6, Rgba::rgb8(0x00, 0x00, 0xff)),
    (0.75, Rgba::rgb8(0x4b, 0x00, 0x82)),
    (1.0, Rgba::rgb8(0x94, 0x00, 0xd3)),
];

/// Error returned when a theme colour string is neither `rainbow` nor hex.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid colour: {0:?}")]
pub struct InvalidColor(pub String);

/// The user's theme colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ThemeColor {
    Solid(Rgba),
    /// Ignore the literal colour and use a procedural hue sweep.
    Rainbow,
}

impl ThemeColor {
    pub fn is_rainbow(&self) -> bool {
        matches!(self, ThemeColor::Rainbow)
    }

    /// The solid colour, or white for the rainbow sentinel.
    pub fn solid_or_white(&self) -> Rgba {
        match self {
            ThemeColor::Solid(c) => *c,
            ThemeColor::Rainbow => Rgba::WHITE,
        }
    }
}

impl Default for ThemeColor {
    fn default() -> Self {
        ThemeColor::Solid(Rgba::rgb8(0x8b, 0x5c, 0xf6))
    }
}

impl TryFrom<String> for ThemeColor {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for ThemeColor {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("rainbow") {
            return Ok(ThemeColor::Rainbow);
        }
        Rgba::from_hex(s)
            .map(ThemeColor::Solid)
            .ok_or_else(|| InvalidColor(s.to_string()))
    }
}

impl From<ThemeColor> for String {
    fn from(value: ThemeColor) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeColor::Solid(c) => f.write_str(&c.to_hex()),
            ThemeColor::Rainbow => f.write_str("rainbow"),
        }
    }
}
