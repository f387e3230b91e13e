//! Polar designs laid out around the canvas centre.

use std::f32::consts::PI;

use tiny_skia::PathBuilder;

use super::{bass_average, hue_at, DrawInput};
use crate::render::{Canvas, Fill, Rgba};

const BUTTERFLY_STOPS: [(f32, Rgba); 6] = [
    (0.0, Rgba::rgb8(0xff, 0x00, 0x00)),
    (0.2, Rgba::rgb8(0xff, 0xa5, 0x00)),
    (0.4, Rgba::rgb8(0xff, 0xff, 0x00)),
    (0.6, Rgba::rgb8(0x00, 0x80, 0x00)),
    (0.8, Rgba::rgb8(0x00, 0x00, 0xff)),
    (1.0, Rgba::rgb8(0xee, 0x82, 0xee)),
];

const STAMEN: Rgba = Rgba::rgb8(0x33, 0x33, 0x33);

fn polar(cx: f32, cy: f32, angle: f32, radius: f32) -> (f32, f32) {
    (cx + angle.cos() * radius, cy + angle.sin() * radius)
}

/// 180 radial bars standing on a ring.
pub(super) fn draw_circular(canvas: &mut Canvas, input: &DrawInput) {
    const BARS: usize = 180;
    let (cx, cy) = (input.width / 2.0, input.height / 2.0);
    let radius = input.width.min(input.height) / 4.0;
    let thickness = input.thickness();
    let step = input.len() / BARS;

    canvas.stroke_circle(cx, cy, radius - 10.0, &Fill::Solid(Rgba::WHITE.with_alpha(0.2)), 1.0);

    for i in 0..BARS {
        let scaled = input.value(i * step) / 255.0 * radius * input.amplitude();
        let angle = 2.0 * PI * (i as f32 / BARS as f32) - PI / 2.0;
        let outer = radius + scaled.max(5.0);
        let color = if input.is_rainbow() {
            hue_at(i, BARS, 50.0)
        } else {
            input.color()
        };

        let mut pb = PathBuilder::new();
        let (x0, y0) = polar(cx, cy, angle, radius);
        let (x1, y1) = polar(cx, cy, angle, outer);
        pb.move_to(x0, y0);
        pb.line_to(x1, y1);
        if let Some(path) = pb.finish() {
            canvas.glow_path(&path, color, thickness, thickness);
            canvas.stroke_path_round(&path, &Fill::Solid(color), thickness);
        }
    }
}

/// Twenty concentric rings, one per frequency band.
pub(super) fn draw_ripple(canvas: &mut Canvas, input: &DrawInput) {
    const BANDS: usize = 20;
    let (cx, cy) = (input.width / 2.0, input.height / 2.0);
    let max_radius = input.width.max(input.height) / 2.0;
    let step = input.len() / BANDS;

    for i in 0..BANDS {
        let scale = input.value(i * step) / 255.0 * input.amplitude();
        if scale <= 0.1 {
            continue;
        }
        let r = i as f32 / BANDS as f32 * max_radius;
        let color = if input.is_rainbow() {
            hue_at(i, BANDS, 60.0)
        } else {
            input.color()
        };
        canvas.set_alpha(scale.min(1.0));
        canvas.stroke_circle(cx, cy, r, &Fill::Solid(color), input.thickness() * scale * 3.0);
    }
    canvas.set_alpha(1.0);
}

/// 64 rays from a small inner offset, each tipped with a white dot.
pub(super) fn draw_starburst(canvas: &mut Canvas, input: &DrawInput) {
    const RAYS: usize = 64;
    const INNER: f32 = 20.0;
    let (cx, cy) = (input.width / 2.0, input.height / 2.0);
    let max_radius = input.width.min(input.height) / 2.0;
    let thickness = input.thickness();
    let step = input.len() / RAYS;

    for i in 0..RAYS {
        let amp = input.value(i * step) / 255.0 * input.amplitude();
        if amp <= 0.05 {
            continue;
        }
        let angle = 2.0 * PI * i as f32 / RAYS as f32;
        let (x0, y0) = polar(cx, cy, angle, INNER);
        let (x1, y1) = polar(cx, cy, angle, INNER + amp * max_radius);
        let color = if input.is_rainbow() {
            hue_at(i, RAYS, 60.0)
        } else {
            input.color()
        };

        let mut pb = PathBuilder::new();
        pb.move_to(x0, y0);
        pb.line_to(x1, y1);
        if let Some(path) = pb.finish() {
            canvas.glow_path(&path, color, thickness, amp * 10.0);
            canvas.stroke_path_round(&path, &Fill::Solid(color), thickness);
        }
        canvas.fill_circle(x1, y1, thickness, &Fill::Solid(Rgba::WHITE));
    }
}

/// Two mirrored parametric wings.
pub(super) fn draw_butterfly(canvas: &mut Canvas, input: &DrawInput) {
    const POINTS: usize = 100;
    let DrawInput { width, height, .. } = *input;
    let (cx, cy) = (width / 2.0, height / 2.0);
    let scale = width.min(height) / 3.0;
    let step = input.len() / POINTS;
    let thickness = input.thickness();

    let (stroke, glow) = if input.is_rainbow() {
        (
            Fill::linear((0.0, 0.0), (width, height), &BUTTERFLY_STOPS),
            Rgba::WHITE.with_alpha(0.5),
        )
    } else {
        (Fill::Solid(input.color()), input.color())
    };

    for side in [1.0f32, -1.0] {
        let mut pb = PathBuilder::new();
        for i in 0..=POINTS {
            let r = (0.5 + input.value(i * step) / 255.0 * input.amplitude()) * scale;
            let theta = i as f32 / POINTS as f32 * PI;
            let x = cx + side * r * theta.sin() * (theta * 2.0).cos();
            let y = cy - r * theta.cos();
            if i == 0 {
                pb.move_to(x, y);
            } else {
                pb.line_to(x, y);
            }
        }
        if let Some(path) = pb.finish() {
            canvas.glow_path(&path, glow, thickness, 5.0);
            canvas.stroke_path(&path, &stroke, thickness);
        }
    }
}

/// Four echo rings whose expansion comes only from the bass average.
pub(super) fn draw_pulse_circles(canvas: &mut Canvas, input: &DrawInput) {
    const RINGS: usize = 4;
    let (cx, cy) = (input.width / 2.0, input.height / 2.0);
    let norm_bass = bass_average(input) / 255.0;
    let base_radius = input.width.min(input.height) * 0.18;
    let expansion = norm_bass * (input.height * 0.15) * input.amplitude();
    let beat_alpha = 0.5 + norm_bass * 0.5;
    let spin = (input.elapsed_ms / 10.0 % 360.0) as f32;

    for i in 0..RINGS {
        let fi = i as f32;
        let layer = 1.0 - fi / RINGS as f32;
        let r = base_radius + fi * 25.0 + expansion * (1.0 + fi * 0.3);
        let color = if input.is_rainbow() {
            Rgba::hsl(spin + fi * 30.0, 100.0, 60.0)
        } else {
            input.color()
        };
        let width = input.thickness() * (1.0 + norm_bass * layer);

        canvas.set_alpha(beat_alpha * layer.max(0.0));
        canvas.stroke_circle(cx, cy, r, &Fill::Solid(color), width);
    }
    canvas.set_alpha(1.0);
}

/// A slowly rotating flower: one quadratic petal per slot plus a pulsing centre.
pub(super) fn draw_flower_petals(canvas: &mut Canvas, input: &DrawInput) {
    const PETALS: usize = 24;
    let max_radius = input.width.min(input.height) / 2.5;
    let time = (input.elapsed_ms / 2000.0) as f32;
    let step = (input.len() / PETALS).max(1);
    let norm_bass = bass_average(input) / 255.0;
    let slot = 2.0 * PI / PETALS as f32;
    let rainbow = input.is_rainbow();

    canvas.save();
    canvas.translate(input.width / 2.0, input.height / 2.0);
    canvas.rotate(time);

    for i in 0..PETALS {
        let mean = (0..step).map(|k| input.value(i * step + k)).sum::<f32>() / step as f32;
        let amp = mean / 255.0 * input.amplitude();
        if amp < 0.05 {
            continue;
        }

        let angle = slot * i as f32;
        let petal_len = max_radius * amp;
        let r_base = 30.0 + norm_bass * 20.0;
        let cp_dist = r_base + petal_len * 0.5;

        let (tip_x, tip_y) = polar(0.0, 0.0, angle, r_base + petal_len);
        let (cp1_x, cp1_y) = polar(0.0, 0.0, angle - slot * 0.5, cp_dist);
        let (cp2_x, cp2_y) = polar(0.0, 0.0, angle + slot * 0.5, cp_dist);
        let (base_x, base_y) = polar(0.0, 0.0, angle, r_base);

        let mut pb = PathBuilder::new();
        pb.move_to(base_x, base_y);
        pb.quad_to(cp1_x, cp1_y, tip_x, tip_y);
        pb.quad_to(cp2_x, cp2_y, base_x, base_y);
        let Some(path) = pb.finish() else {
            continue;
        };

        if rainbow {
            let hue = i as f32 / PETALS as f32 * 360.0;
            canvas.fill_path(&path, &Fill::Solid(Rgba::hsla(hue, 100.0, 60.0, 0.8)));
            canvas.stroke_path(&path, &Fill::Solid(Rgba::hsl(hue, 100.0, 80.0)), 1.0);
        } else {
            canvas.set_alpha(0.8);
            canvas.fill_path(&path, &Fill::Solid(input.color()));
            canvas.stroke_path(&path, &Fill::Solid(Rgba::WHITE.with_alpha(0.4)), 1.0);
            canvas.set_alpha(1.0);
        }
    }

    let center_radius = 25.0 + norm_bass * 15.0;
    canvas.glow_circle(0.0, 0.0, center_radius, Rgba::WHITE, 20.0);

    for i in 0..5 {
        let a = i as f32 / 5.0 * 2.0 * PI + time * 2.0;
        let (x, y) = polar(0.0, 0.0, a, center_radius * 0.5);
        canvas.fill_circle(x, y, 2.0, &Fill::Solid(STAMEN));
    }

    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::VisualizerSettings;

    fn input<'a>(data: &'a [u8], settings: &'a VisualizerSettings) -> DrawInput<'a> {
        DrawInput {
            data,
            width: 400.0,
            height: 400.0,
            settings,
            elapsed_ms: 0.0,
        }
    }

    #[test]
    fn test_pulse_circles_grow_with_bass() {
        let settings = VisualizerSettings::default();
        let quiet = vec![0u8; 64];
        let mut loud = vec![0u8; 64];
        loud[..10].fill(255);

        let mut a = Canvas::new(400, 400).unwrap();
        draw_pulse_circles(&mut a, &input(&quiet, &settings));
        let mut b = Canvas::new(400, 400).unwrap();
        draw_pulse_circles(&mut b, &input(&loud, &settings));

        let width_quiet = a.drawn_bounds().unwrap()[2] - a.drawn_bounds().unwrap()[0];
        let width_loud = b.drawn_bounds().unwrap()[2] - b.drawn_bounds().unwrap()[0];
        assert!(width_loud > width_quiet);
    }

    #[test]
    fn test_flower_balances_state_stack() {
        let settings = VisualizerSettings::default();
        let data = vec![180u8; 256];
        let mut canvas = Canvas::new(400, 400).unwrap();
        draw_flower_petals(&mut canvas, &input(&data, &settings));
        assert_eq!(canvas.save_depth(), 0);
        assert_eq!(canvas.alpha(), 1.0);
        // Centre disc is white.
        assert_eq!(canvas.pixel(200, 200).unwrap()[..3], [255, 255, 255]);
    }

    #[test]
    fn test_silent_starburst_and_ripple_draw_nothing() {
        let settings = VisualizerSettings::default();
        let data = vec![0u8; 256];
        let mut canvas = Canvas::new(400, 400).unwrap();
        draw_starburst(&mut canvas, &input(&data, &settings));
        draw_ripple(&mut canvas, &input(&data, &settings));
        assert!(canvas.drawn_bounds().is_none());
    }
}
