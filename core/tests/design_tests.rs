//! Integration tests for the visualization design system.


use fixtures::*;
use sonic_canvas::designs::{self, DrawInput, VisualizerMode};
use sonic_canvas::render::{Rgba, ThemeColor, WORKING_HEIGHT, WORKING_WIDTH};
use sonic_canvas::settings::VisualizerSettings;

fn render(mode: VisualizerMode, data: &[u8], settings: &VisualizerSettings, elapsed_ms: f64) -> Vec<u8> {
    let mut canvas = working_canvas(192, 108);
    let input = DrawInput {
        data,
        width: WORKING_WIDTH as f32,
        height: WORKING_HEIGHT as f32,
        settings,
        elapsed_ms,
    };
    designs::draw(mode, &mut canvas, &input);
    canvas.to_rgba8()
}

// ==================== Registry Tests ====================

#[test]
fn test_every_mode_has_metadata() {
    assert_eq!(VisualizerMode::all().len(), 18);
    for mode in VisualizerMode::all() {
        assert!(!mode.name().is_empty());
        assert!(!mode.description().is_empty(), "{:?} has no description", mode);
        assert_eq!(VisualizerMode::from_str(mode.name()), Some(*mode));
    }
}

#[test]
fn test_unknown_mode_name_falls_back_to_bars() {
    assert_eq!(VisualizerMode::from_str("KALEIDOSCOPE"), None);
    assert_eq!(VisualizerMode::parse_or_default("KALEIDOSCOPE"), VisualizerMode::Bars);
}

#[test]
fn test_empty_sample_draws_nothing() {
    let settings = VisualizerSettings::default();
    for mode in VisualizerMode::all() {
        let mut canvas = working_canvas(96, 54);
        let input = DrawInput {
            data: &[],
            width: WORKING_WIDTH as f32,
            height: WORKING_HEIGHT as f32,
            settings: &settings,
            elapsed_ms: 0.0,
        };
        designs::draw(*mode, &mut canvas, &input);
        assert!(canvas.drawn_bounds().is_none(), "{:?} drew on an empty sample", mode);
    }
}

// ==================== Bounds Tests ====================

#[test]
fn test_silent_modes_stay_on_canvas() {
    let settings = VisualizerSettings::default();
    let data = uniform_spectrum(BIN_COUNT, 0);
    let scale = 192.0 / WORKING_WIDTH as f32;
    let tolerance = (settings.line_thickness + 1.0) * scale;

    for mode in VisualizerMode::all() {
        let mut canvas = working_canvas(192, 108);
        let input = DrawInput {
            data: &data,
            width: WORKING_WIDTH as f32,
            height: WORKING_HEIGHT as f32,
            settings: &settings,
            elapsed_ms: 1234.0,
        };
        designs::draw(*mode, &mut canvas, &input);
        assert_eq!(canvas.save_depth(), 0, "{:?} left the state stack unbalanced", mode);

        if let Some([x0, y0, x1, y1]) = canvas.drawn_bounds() {
            assert!(
                x0 >= -tolerance && y0 >= -tolerance,
                "{:?} drew above/left of the canvas: ({}, {})",
                mode,
                x0,
                y0
            );
            assert!(
                x1 <= 192.0 + tolerance && y1 <= 108.0 + tolerance,
                "{:?} drew below/right of the canvas: ({}, {})",
                mode,
                x1,
                y1
            );
        }
    }
}

#[test]
fn test_single_bin_sample_does_not_panic() {
    let settings = VisualizerSettings::default();
    for mode in VisualizerMode::all() {
        render(*mode, &[200], &settings, 0.0);
    }
}

// ==================== Colour Tests ====================

#[test]
fn test_rainbow_is_deterministic() {
    let settings = settings_with_color(ThemeColor::Rainbow);
    let data = uniform_spectrum(BIN_COUNT, 180);
    for mode in VisualizerMode::all() {
        let a = render(*mode, &data, &settings, 500.0);
        let b = render(*mode, &data, &settings, 500.0);
        assert_eq!(a, b, "{:?} rainbow output is not deterministic", mode);
    }
}

#[test]
fn test_rainbow_ignores_previous_solid_colour() {
    let data = uniform_spectrum(BIN_COUNT, 180);
    let red = settings_with_color(solid(255, 0, 0));
    let rainbow = settings_with_color(ThemeColor::Rainbow);

    for mode in VisualizerMode::all() {
        // The same canvas first draws a solid frame, then a rainbow one.
        let mut reused = working_canvas(192, 108);
        for settings in [&red, &rainbow] {
            reused.clear(Rgba::BLACK);
            let input = DrawInput {
                data: &data,
                width: WORKING_WIDTH as f32,
                height: WORKING_HEIGHT as f32,
                settings,
                elapsed_ms: 0.0,
            };
            designs::draw(*mode, &mut reused, &input);
        }

        let mut fresh = working_canvas(192, 108);
        fresh.clear(Rgba::BLACK);
        let input = DrawInput {
            data: &data,
            width: WORKING_WIDTH as f32,
            height: WORKING_HEIGHT as f32,
            settings: &rainbow,
            elapsed_ms: 0.0,
        };
        designs::draw(*mode, &mut fresh, &input);

        assert_eq!(
            reused.to_rgba8(),
            fresh.to_rgba8(),
            "{:?} rainbow depends on the earlier solid colour",
            mode
        );
    }
}

#[test]
fn test_rainbow_bars_sweep_hue() {
    let data = uniform_spectrum(BIN_COUNT, 180);
    let settings = settings_with_color(ThemeColor::Rainbow);
    let mut canvas = working_canvas(960, 540);
    let input = DrawInput {
        data: &data,
        width: WORKING_WIDTH as f32,
        height: WORKING_HEIGHT as f32,
        settings: &settings,
        elapsed_ms: 0.0,
    };
    designs::draw(VisualizerMode::Bars, &mut canvas, &input);

    // Bar pitch is about 7.8 logical px over 614 hue slots.
    let [r, g, b, _] = canvas.pixel(1, 400).unwrap();
    assert!(r > 240 && g < 20 && b < 20, "first bar should be red, got ({}, {}, {})", r, g, b);

    // Bar 102 sits near 60 degrees.
    let [r, g, b, _] = canvas.pixel(400, 400).unwrap();
    assert!(r > 240 && g > 230 && b < 20, "bar 102 should be yellow, got ({}, {}, {})", r, g, b);

    // Bar 164 sits near 96 degrees.
    let [r, g, b, _] = canvas.pixel(642, 400).unwrap();
    assert!(g > 240 && (60..150).contains(&r) && b < 20, "bar 164 should be green, got ({}, {}, {})", r, g, b);
}

#[test]
fn test_rainbow_differs_from_solid_for_themed_modes() {
    let data = uniform_spectrum(BIN_COUNT, 180);
    let red = settings_with_color(solid(255, 0, 0));
    let rainbow = settings_with_color(ThemeColor::Rainbow);

    for mode in VisualizerMode::all().iter().filter(|m| !m.ignores_theme_color()) {
        let a = render(*mode, &data, &red, 0.0);
        let b = render(*mode, &data, &rainbow, 0.0);
        assert_ne!(a, b, "{:?} ignored the rainbow sentinel", mode);
    }
}

#[test]
fn test_palette_modes_ignore_theme_colour() {
    let data = gradient_spectrum(BIN_COUNT);
    let red = settings_with_color(solid(255, 0, 0));
    let rainbow = settings_with_color(ThemeColor::Rainbow);

    for mode in VisualizerMode::all().iter().filter(|m| m.ignores_theme_color()) {
        let a = render(*mode, &data, &red, 250.0);
        let b = render(*mode, &data, &rainbow, 250.0);
        assert_eq!(a, b, "{:?} should draw its own palette", mode);
    }
}

// ==================== Amplitude Tests ====================

#[test]
fn test_amplitude_grows_bars() {
    let data = uniform_spectrum(BIN_COUNT, 100);
    let mut canvas_low = working_canvas(192, 108);
    let mut canvas_high = working_canvas(192, 108);
    let low = VisualizerSettings::default();
    let high = VisualizerSettings {
        amplitude: 2.0,
        ..VisualizerSettings::default()
    };

    for (canvas, settings) in [(&mut canvas_low, &low), (&mut canvas_high, &high)] {
        let input = DrawInput {
            data: &data,
            width: WORKING_WIDTH as f32,
            height: WORKING_HEIGHT as f32,
            settings,
            elapsed_ms: 0.0,
        };
        designs::draw(VisualizerMode::Bars, canvas, &input);
    }

    let top_low = canvas_low.drawn_bounds().unwrap()[1];
    let top_high = canvas_high.drawn_bounds().unwrap()[1];
    assert!(
        top_high < top_low,
        "doubling amplitude should raise the bars: {} vs {}",
        top_high,
        top_low
    );
}
