//! Column designs: classic bars, dual bars, pixel blocks, equalizer and LED bars.

use tiny_skia::{Path, PathBuilder};

use super::{hue_at, meaningful_len, DrawInput};
use crate::render::{Canvas, Fill, Rgba};

const EQ_PEAK: Rgba = Rgba::rgb8(0xef, 0x44, 0x44);
const EQ_MID: Rgba = Rgba::rgb8(0xf5, 0x9e, 0x0b);

/// Width of a column starting at `x`, cut at the right edge.
fn clipped_width(x: f32, bar_width: f32, width: f32) -> f32 {
    bar_width.min(width - x)
}

/// Vertical bars from the bottom edge, fading to transparent downwards.
pub(super) fn draw_bars(canvas: &mut Canvas, input: &DrawInput) {
    let DrawInput { width, height, .. } = *input;
    let gap = input.thickness();
    let meaningful = meaningful_len(input.len(), 0.6);
    let bar_width = ((width / meaningful as f32) * 2.5 - gap).max(2.0);
    let rainbow = input.is_rainbow();
    let color = input.color();

    let mut x = 0.0;
    for i in 0..input.len() {
        if x >= width {
            break;
        }
        let bar_height = (input.value(i) / 255.0 * height * input.amplitude()).max(4.0);
        let top = height - bar_height;

        let fill = if rainbow {
            Fill::Solid(hue_at(i, meaningful, 50.0))
        } else {
            Fill::linear(
                (0.0, top),
                (0.0, height),
                &[(0.0, color), (1.0, Rgba::TRANSPARENT)],
            )
        };
        canvas.fill_rect(x, top, clipped_width(x, bar_width, width), bar_height, &fill);

        x += bar_width + gap;
    }
}

/// Bars mirrored above and below the horizontal centre line.
pub(super) fn draw_dual_bars(canvas: &mut Canvas, input: &DrawInput) {
    let DrawInput { width, height, .. } = *input;
    let center_y = height / 2.0;
    let gap = input.thickness();
    let meaningful = meaningful_len(input.len(), 0.5);
    let bar_width = ((width / meaningful as f32) * 2.0 - gap).max(2.0);
    let solid = Fill::Solid(input.color());

    let mut x = 0.0;
    for i in 0..meaningful {
        if x >= width {
            break;
        }
        let bar_height = input.value(i) / 255.0 * center_y * input.amplitude();
        let w = clipped_width(x, bar_width, width);

        if input.is_rainbow() {
            let fill = Fill::Solid(hue_at(i, meaningful, 50.0));
            canvas.fill_rect(x, center_y - bar_height, w, bar_height, &fill);
            canvas.fill_rect(x, center_y, w, bar_height, &fill);
        } else {
            canvas.fill_rect(x, center_y - bar_height, w, bar_height, &solid);
            canvas.fill_rect(x, center_y, w, bar_height, &solid);
        }

        x += bar_width + gap;
    }
}

/// Retro square blocks stacked from the bottom, brighter towards the top.
pub(super) fn draw_pixel(canvas: &mut Canvas, input: &DrawInput) {
    let DrawInput { width, height, .. } = *input;
    let gap = 2.0;
    let block = input.thickness() * 4.0;
    if block <= 0.0 {
        return;
    }
    let pitch = block + gap;
    let cols = (width / pitch).floor() as usize;
    let step = input.len() / cols.max(1);

    for i in 0..cols {
        let bar_height = input.value(i * step) / 255.0 * height * input.amplitude();
        let blocks = (bar_height / pitch).floor() as usize;
        let x = i as f32 * pitch;
        let color = if input.is_rainbow() {
            hue_at(i, cols, 60.0)
        } else {
            input.color()
        };

        for j in 0..blocks {
            let y = height - j as f32 * pitch - block;
            canvas.set_alpha(0.5 + (j as f32 / blocks as f32) * 0.5);
            canvas.fill_rect(x, y, block, block, &Fill::Solid(color));
        }
    }
    canvas.set_alpha(1.0);
}

/// Segmented equalizer with amber and red bands near the top.
pub(super) fn draw_equalizer(canvas: &mut Canvas, input: &DrawInput) {
    let DrawInput { width, height, .. } = *input;
    let gap_x = input.thickness();
    let gap_y = 2.0;
    let segment_height = 5.0;
    let meaningful = meaningful_len(input.len(), 0.6);
    let bar_width = ((width / meaningful as f32) * 2.5 - gap_x).max(4.0);

    let mut x = 0.0;
    for i in 0..meaningful {
        if x >= width {
            break;
        }
        let bar_height = input.value(i) / 255.0 * height * input.amplitude();
        let segments = (bar_height / (segment_height + gap_y)).floor() as usize;
        let w = clipped_width(x, bar_width, width);

        for j in 0..segments {
            let y = height - (j + 1) as f32 * (segment_height + gap_y);
            let color = if input.is_rainbow() {
                hue_at(i, meaningful, 60.0)
            } else if j > 30 {
                EQ_PEAK
            } else if j > 20 {
                EQ_MID
            } else {
                input.color()
            };
            canvas.fill_rect(x, y, w, segment_height, &Fill::Solid(color));
        }

        x += bar_width + gap_x;
    }
}

/// Rounded rectangle whose bottom edge sits at `bottom`.
fn rounded_segment(x: f32, bottom: f32, w: f32, h: f32, r: f32) -> Option<Path> {
    let top = bottom - h;
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, top);
    pb.line_to(x + w - r, top);
    pb.quad_to(x + w, top, x + w, top + r);
    pb.line_to(x + w, bottom - r);
    pb.quad_to(x + w, bottom, x + w - r, bottom);
    pb.line_to(x + r, bottom);
    pb.quad_to(x, bottom, x, bottom - r);
    pb.line_to(x, top + r);
    pb.quad_to(x, top, x + r, top);
    pb.close();
    pb.finish()
}

/// Centred rainbow LED columns (purple through red, yellow and green to blue).
pub(super) fn draw_led_bars(canvas: &mut Canvas, input: &DrawInput) {
    let DrawInput { width, height, .. } = *input;
    let gap_x = 4.0;
    let gap_y = 2.0;
    let segment_height = 6.0;
    let padding_bottom = 10.0;
    let meaningful = meaningful_len(input.len(), 0.7);
    let bar_width = ((width / meaningful as f32) - gap_x).max(4.0);

    let mut x = ((width - meaningful as f32 * (bar_width + gap_x)) / 2.0).max(0.0);
    for i in 0..meaningful {
        if x + bar_width > width {
            break;
        }
        let hue = 320.0 - (i as f32 / meaningful as f32) * 280.0;
        let color = Rgba::hsl(hue, 100.0, 55.0);

        let bar_height = input.value(i) / 255.0 * height * input.amplitude() * 0.8;
        let segments = (bar_height / (segment_height + gap_y)).floor() as usize;

        if segments > 0 {
            // Soft glow behind the column.
            let column = segments as f32 * (segment_height + gap_y);
            let halo_top = (height - padding_bottom - column).max(0.0);
            canvas.fill_rect(
                x,
                halo_top,
                bar_width,
                height - padding_bottom - halo_top,
                &Fill::Solid(color.with_alpha(0.12)),
            );
        }

        for j in 0..segments {
            let bottom = height - j as f32 * (segment_height + gap_y) - padding_bottom;
            if let Some(path) = rounded_segment(x, bottom, bar_width, segment_height, 2.0) {
                canvas.fill_path(&path, &Fill::Solid(color));
            }
        }

        x += bar_width + gap_x;
    }
}
