//! Mode to draw-function lookup table.
//!
//! Adding a mode means adding one `VisualizerMode` variant and one entry
//! here, in the same position as in [`VisualizerMode::all`].

use super::{bars, circular, dots, wave, DrawInput, VisualizerMode};
use crate::render::Canvas;

/// Signature shared by every design.
pub type DrawFn = fn(&mut Canvas, &DrawInput);

static DRAW_TABLE: [DrawFn; 18] = [
    bars::draw_bars,
    wave::draw_wave,
    circular::draw_circular,
    bars::draw_dual_bars,
    circular::draw_ripple,
    bars::draw_pixel,
    bars::draw_equalizer,
    circular::draw_starburst,
    circular::draw_butterfly,
    wave::draw_aurora,
    dots::draw_spectrum,
    dots::draw_dot_wave,
    bars::draw_led_bars,
    wave::draw_fluid,
    dots::draw_particles,
    wave::draw_jelly_wave,
    circular::draw_pulse_circles,
    circular::draw_flower_petals,
];

/// Look up the draw function for a mode.
pub fn draw_fn(mode: VisualizerMode) -> DrawFn {
    DRAW_TABLE[mode.index()]
}

/// Draw `mode` with its own save/restore scope. Empty samples draw nothing.
///
/// # Example
/// ```
/// use sonic_canvas::designs::{draw, DrawInput, VisualizerMode};
/// use sonic_canvas::render::Canvas;
/// use sonic_canvas::settings::VisualizerSettings;
///
/// let settings = VisualizerSettings::default();
/// let mut canvas = Canvas::new(192, 108).unwrap();
/// let data = [128u8; 64];
/// let input = DrawInput {
///     data: &data,
///     width: 192.0,
///     height: 108.0,
///     settings: &settings,
///     elapsed_ms: 0.0,
/// };
/// draw(VisualizerMode::Bars, &mut canvas, &input);
/// assert!(canvas.drawn_bounds().is_some());
/// ```
pub fn draw(mode: VisualizerMode, canvas: &mut Canvas, input: &DrawInput) {
    if input.data.is_empty() || input.width <= 0.0 || input.height <= 0.0 {
        return;
    }
    canvas.save();
    draw_fn(mode)(canvas, input);
    canvas.restore();
}
