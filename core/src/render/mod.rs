//! CPU drawing surface and colour handling.
//!
//! Everything visual in the crate draws through [`Canvas`], an
//! immediate-mode surface backed by `tiny-skia`.

mod canvas;
mod color;

pub use canvas::{pixmap_from_rgba8, Canvas, Fill, RenderError};
pub use color::{InvalidColor, Rgba, ThemeColor, RAINBOW_STOPS};

/// Fixed working resolution all absolute pixel constants are defined against.
pub const WORKING_WIDTH: u32 = 1920;
pub const WORKING_HEIGHT: u32 = 1080;
