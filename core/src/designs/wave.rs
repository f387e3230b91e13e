//! Line and filled-area designs: oscilloscope, aurora, fluid and jelly.

use tiny_skia::PathBuilder;

use super::{rainbow_gradient, DrawInput};
use crate::render::{Canvas, Fill, Rgba};

const AURORA_STOPS: [(f32, Rgba); 7] = [
    (0.0, Rgba::rgb8(0xff, 0x33, 0x33)),
    (0.16, Rgba::rgb8(0xff, 0xaa, 0x33)),
    (0.33, Rgba::rgb8(0xff, 0xff, 0x33)),
    (0.5, Rgba::rgb8(0x33, 0xff, 0x33)),
    (0.66, Rgba::rgb8(0x33, 0xff, 0xff)),
    (0.83, Rgba::rgb8(0x33, 0x33, 0xff)),
    (1.0, Rgba::rgb8(0xaa, 0x33, 0xff)),
];

const FLUID_CYAN: Rgba = Rgba::rgb8(0x33, 0xcc, 0xff);
const FLUID_VIOLET: Rgba = Rgba::rgb8(0x99, 0x33, 0xff);
const FLUID_PINK: Rgba = Rgba::rgb8(0xff, 0x33, 0xaa);

/// Oscilloscope trace around the vertical centre.
pub(super) fn draw_wave(canvas: &mut Canvas, input: &DrawInput) {
    let DrawInput { width, height, .. } = *input;
    let len = input.len();
    let slice = width / len as f32;

    let mut pb = PathBuilder::new();
    for i in 0..len {
        let v = (input.value(i) - 128.0) / 128.0;
        let x = i as f32 * slice;
        let y = height / 2.0 + v * (height / 2.0) * input.amplitude();
        if i == 0 {
            pb.move_to(x, y);
        } else {
            pb.line_to(x, y);
        }
    }
    pb.line_to(width, height / 2.0);
    let Some(path) = pb.finish() else {
        return;
    };

    let thickness = input.thickness();
    let (stroke, glow) = if input.is_rainbow() {
        (rainbow_gradient(width, height, true), Rgba::WHITE.with_alpha(0.5))
    } else {
        (Fill::Solid(input.color()), input.color())
    };
    canvas.glow_path(&path, glow, thickness, thickness * 2.0);
    canvas.stroke_path(&path, &stroke, thickness);
}

/// Always-rainbow mirrored wave: a bright upper lobe and a faint reflection.
pub(super) fn draw_aurora(canvas: &mut Canvas, input: &DrawInput) {
    let DrawInput { width, height, .. } = *input;
    let center_y = height / 2.0;
    let len = input.len();
    let step = (len / 128).max(1);
    let slice = width / (len as f32 / step as f32);
    let gradient = Fill::linear((0.0, 0.0), (width, 0.0), &AURORA_STOPS);
    let edge = Fill::Solid(Rgba::WHITE.with_alpha(0.3));

    for (flip, opacity) in [(false, 0.9), (true, 0.4)] {
        let mut pb = PathBuilder::new();
        let (mut px, mut py) = (0.0, center_y);

        for (n, i) in (0..len).step_by(step).enumerate() {
            let bar_height = input.value(i) / 255.0 * (height / 2.5) * input.amplitude();
            let x = n as f32 * slice;
            let y = if flip {
                center_y + bar_height
            } else {
                center_y - bar_height
            };

            if i == 0 {
                pb.move_to(x, y);
            } else {
                pb.quad_to(px, py, (px + x) / 2.0, (py + y) / 2.0);
            }
            px = x;
            py = y;
        }
        pb.line_to(width, center_y);
        pb.close();

        if let Some(path) = pb.finish() {
            canvas.set_alpha(opacity);
            canvas.fill_path(&path, &gradient);
            canvas.stroke_path(&path, &edge, 1.0);
        }
    }
    canvas.set_alpha(1.0);
}

/// Smooth hills filled to the bottom edge with a highlight along the top.
pub(super) fn draw_fluid(canvas: &mut Canvas, input: &DrawInput) {
    let DrawInput { width, height, .. } = *input;
    let len = input.len();
    let step = len.div_ceil(32).max(1);
    let slice = width / (len as f32 / step as f32);

    let fill = if input.is_rainbow() {
        rainbow_gradient(width, height, false)
    } else {
        Fill::linear(
            (0.0, height * 0.2),
            (0.0, height),
            &[
                (0.0, input.color()),
                (0.3, FLUID_CYAN),
                (0.7, FLUID_VIOLET),
                (1.0, FLUID_PINK),
            ],
        )
    };

    let mut pb = PathBuilder::new();
    pb.move_to(0.0, height);
    let (mut prev_x, mut prev_y) = (0.0, height);
    for (n, i) in (0..len).step_by(step).enumerate() {
        let amp = (input.value(i) / 255.0).powf(1.5) * height * input.amplitude();
        let x = n as f32 * slice;
        let y = height - amp;
        if i == 0 {
            pb.line_to(x, y);
        } else {
            let mid_x = prev_x + (x - prev_x) / 2.0;
            pb.cubic_to(mid_x, prev_y, mid_x, y, x, y);
        }
        prev_x = x;
        prev_y = y;
    }
    pb.line_to(width, height);
    pb.close();
    let Some(path) = pb.finish() else {
        return;
    };

    canvas.set_alpha(0.85);
    canvas.fill_path(&path, &fill);
    canvas.set_alpha(1.0);

    canvas.glow_path(&path, Rgba::WHITE, 3.0, 15.0);
    canvas.stroke_path(&path, &Fill::Solid(Rgba::WHITE.with_alpha(0.6)), 3.0);
}

/// Three translucent layers of audio plus a slow sinusoidal wobble.
pub(super) fn draw_jelly_wave(canvas: &mut Canvas, input: &DrawInput) {
    let DrawInput { width, height, .. } = *input;
    let time = (input.elapsed_ms / 2000.0) as f32;
    let len = input.len();
    let step = (len / 20).max(1);
    let edge = Fill::Solid(Rgba::WHITE.with_alpha(0.5));
    let fill = if input.is_rainbow() {
        rainbow_gradient(width, height, true)
    } else {
        Fill::Solid(input.color())
    };

    for layer in 0..3 {
        let layer_offset = layer as f32 * 30.0;
        let phase = layer as f32 * 2.0;

        let mut pb = PathBuilder::new();
        pb.move_to(0.0, height);
        let (mut prev_x, mut prev_y) = (0.0, height);
        for (n, i) in (0..=len).step_by(step).enumerate() {
            let t = i as f32 / len as f32;
            let x = t * width;
            let audio = input.value(i) / 255.0 * height * 0.4 * input.amplitude();
            let jelly = (t * 4.0 + time + phase).sin() * 40.0;
            let jelly2 = (t * 9.0 - time * 2.0).cos() * 20.0;
            let y = (height - (audio + jelly + jelly2) - 100.0 + layer_offset).min(height);

            if n == 0 {
                pb.line_to(x, y);
            } else {
                pb.quad_to(prev_x, prev_y, (prev_x + x) / 2.0, (prev_y + y) / 2.0);
            }
            prev_x = x;
            prev_y = y;
        }
        pb.line_to(width, prev_y);
        pb.line_to(width, height);
        pb.close();

        if let Some(path) = pb.finish() {
            canvas.set_alpha(0.3 + layer as f32 * 0.15);
            canvas.fill_path(&path, &fill);
            canvas.stroke_path(&path, &edge, 2.0);
        }
    }
    canvas.set_alpha(1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::VisualizerSettings;

    fn input<'a>(data: &'a [u8], settings: &'a VisualizerSettings, t: f64) -> DrawInput<'a> {
        DrawInput {
            data,
            width: 400.0,
            height: 300.0,
            settings,
            elapsed_ms: t,
        }
    }

    #[test]
    fn test_silent_wave_is_flat() {
        let settings = VisualizerSettings::default();
        let data = vec![128u8; 256];
        let mut canvas = Canvas::new(400, 300).unwrap();
        draw_wave(&mut canvas, &input(&data, &settings, 0.0));
        let [_, top, _, bottom] = canvas.drawn_bounds().unwrap();
        assert!((top - 149.0).abs() < 0.01 && (bottom - 151.0).abs() < 0.01);
    }

    #[test]
    fn test_jelly_wave_moves_with_time() {
        let settings = VisualizerSettings::default();
        let data = vec![0u8; 256];
        let mut a = Canvas::new(400, 300).unwrap();
        let mut b = Canvas::new(400, 300).unwrap();
        draw_jelly_wave(&mut a, &input(&data, &settings, 0.0));
        draw_jelly_wave(&mut b, &input(&data, &settings, 1500.0));
        assert_ne!(a.to_rgba8(), b.to_rgba8());
        assert!(a.drawn_bounds().unwrap()[3] <= 301.0);
    }

    #[test]
    fn test_single_sample_does_not_panic() {
        let settings = VisualizerSettings::default();
        let data = [200u8];
        let mut canvas = Canvas::new(400, 300).unwrap();
        let designs: [fn(&mut Canvas, &DrawInput); 4] =
            [draw_wave, draw_aurora, draw_fluid, draw_jelly_wave];
        for f in designs {
            f(&mut canvas, &input(&data, &settings, 10.0));
        }
    }
}
