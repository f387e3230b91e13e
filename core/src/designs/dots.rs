//! Dot-based designs with fixed palettes.
//!
//! These ignore the theme colour entirely.

use super::{meaningful_len, DrawInput};
use crate::render::{Canvas, Fill, Rgba};

const PASTELS: [Rgba; 9] = [
    Rgba::rgb8(0xff, 0x9a, 0xa2),
    Rgba::rgb8(0xff, 0xb7, 0xb2),
    Rgba::rgb8(0xff, 0xda, 0xc1),
    Rgba::rgb8(0xe2, 0xf0, 0xcb),
    Rgba::rgb8(0xb5, 0xea, 0xd7),
    Rgba::rgb8(0xc7, 0xce, 0xea),
    Rgba::rgb8(0xff, 0xf5, 0xba),
    Rgba::rgb8(0xff, 0x99, 0xcc),
    Rgba::rgb8(0x99, 0xcc, 0xff),
];

/// Columns of dots growing out from the centre line, pink through yellow.
pub(super) fn draw_spectrum(canvas: &mut Canvas, input: &DrawInput) {
    let DrawInput { width, height, .. } = *input;
    let center_y = height / 2.0;
    let meaningful = meaningful_len(input.len(), 0.7);
    let gap_x = 4.0;
    let gap_y = 3.0;
    let bar_width = (width / meaningful as f32 - gap_x).max(6.0);
    let columns = ((width / (bar_width + gap_x)).floor() as usize).max(1);
    let step = meaningful.div_ceil(columns).max(1);
    let dot = bar_width;

    let mut x = (width - columns as f32 * (bar_width + gap_x)) / 2.0;
    for i in (0..meaningful).step_by(step) {
        if x > width {
            break;
        }
        let val = input.value(i);
        if val < 5.0 {
            x += bar_width + gap_x;
            continue;
        }

        let amplitude = val / 255.0 * (height / 2.2) * input.amplitude();
        let hue = (340.0 - i as f32 / meaningful as f32 * 300.0).floor();
        let color = Rgba::hsl(hue, 100.0, 60.0);
        let dots = (amplitude / (dot + gap_y)).floor() as usize;

        for j in 0..dots {
            let offset = j as f32 * (dot + gap_y);
            let cx = x + dot / 2.0;
            canvas.glow_circle(cx, center_y - offset - dot / 2.0, dot / 2.0, color, 8.0);
            canvas.glow_circle(cx, center_y + offset + dot / 2.0, dot / 2.0, color, 8.0);
        }

        x += bar_width + gap_x;
    }
}

/// A rainbow row of dots, each column expanding symmetrically with loudness.
pub(super) fn draw_dot_wave(canvas: &mut Canvas, input: &DrawInput) {
    let DrawInput { width, height, .. } = *input;
    let center_y = height / 2.0;
    let meaningful = meaningful_len(input.len(), 0.75);
    let gap_x = 4.0;
    let gap_y = 4.0;
    let dot = (width / meaningful as f32 - gap_x).max(2.0);
    let radius = dot / 2.0;

    let mut x = ((width - meaningful as f32 * (dot + gap_x)) / 2.0).max(0.0);
    for i in 0..meaningful {
        if x + dot > width {
            break;
        }
        let val = input.value(i);
        if val > 10.0 {
            let color = Fill::Solid(Rgba::hsl(i as f32 / meaningful as f32 * 360.0, 100.0, 60.0));
            let amplitude = val / 255.0 * height * input.amplitude() * 0.8;
            let dots = (amplitude / (dot + gap_y)).floor() as usize;

            canvas.fill_circle(x + radius, center_y, radius, &color);
            for j in 1..=dots / 2 {
                let offset = j as f32 * (dot + gap_y);
                canvas.fill_circle(x + radius, center_y - offset, radius, &color);
                canvas.fill_circle(x + radius, center_y + offset, radius, &color);
            }
        }
        x += dot + gap_x;
    }
}

/// 150 pastel motes drifting upwards; loud bins lift, enlarge and brighten them.
pub(super) fn draw_particles(canvas: &mut Canvas, input: &DrawInput) {
    const COUNT: usize = 150;
    let DrawInput { width, height, .. } = *input;
    let meaningful = meaningful_len(input.len(), 0.7);
    let time = input.elapsed_ms / 1000.0;
    let halo = Fill::Solid(Rgba::WHITE.with_alpha(0.5));
    let shine = Fill::Solid(Rgba::WHITE.with_alpha(0.8));

    for i in 0..COUNT {
        let index = (i as f32 / COUNT as f32 * meaningful as f32).floor() as usize;
        let amp = input.value(index) / 255.0 * input.amplitude();
        if amp < 0.05 {
            continue;
        }

        let seed = i as f64 * 123.456;
        let mut x = i as f32 / COUNT as f32 * width + ((time + seed).sin() * 30.0) as f32;
        if x < 0.0 {
            x += width;
        }
        if x > width {
            x -= width;
        }

        let speed = 20.0 + (i % 10) as f64 * 10.0;
        let rise = ((time * speed + seed * 100.0) % (height as f64 + 100.0)) as f32;
        let y = height + 50.0 - rise - amp * amp * 100.0;

        let size = (2 + (i % 4) * 2) as f32 + amp * 10.0;

        canvas.set_alpha(0.4 + amp * 0.6);
        canvas.fill_circle(x, y, size, &Fill::Solid(PASTELS[i % PASTELS.len()]));
        if amp > 0.6 {
            canvas.stroke_circle(x, y, size, &halo, 2.0);
        }
        canvas.fill_circle(x - size * 0.3, y - size * 0.3, size * 0.2, &shine);
    }
    canvas.set_alpha(1.0);
}
