//! Benchmarks for CPU frame composition.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sonic_canvas::audio::SpectrumSample;
use sonic_canvas::designs::VisualizerMode;
use sonic_canvas::render::{Canvas, WORKING_HEIGHT, WORKING_WIDTH};
use sonic_canvas::settings::{EffectToggles, VisualizerSettings};
use sonic_canvas::Visualizer;

fn spectrum() -> Vec<u8> {
    (0..1024).map(|i| (255 - i / 4) as u8).collect()
}

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas::with_working_size(width, height, WORKING_WIDTH as f32, WORKING_HEIGHT as f32).unwrap()
}

fn bench_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Modes 720p");
    let settings = VisualizerSettings::default();
    let data = spectrum();

    for mode in VisualizerMode::all() {
        group.bench_with_input(BenchmarkId::new("render", mode.name()), mode, |b, &mode| {
            let mut visualizer = Visualizer::with_seed(1);
            let mut canvas = canvas(1280, 720);
            let mut t = 0.0;
            b.iter(|| {
                t += 16.7;
                let sample = SpectrumSample::new(mode.sample_domain(), &data);
                black_box(visualizer.render_sample(&mut canvas, sample, &settings, Some(mode), true, t));
            });
        });
    }

    group.finish();
}

fn bench_resolutions(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resolution Scaling");
    let mut settings = VisualizerSettings::default();
    settings.effects = EffectToggles::all();
    let data = spectrum();

    for (width, height, name) in [(640, 360, "360p"), (1280, 720, "720p"), (1920, 1080, "1080p")] {
        group.bench_function(BenchmarkId::new("all_effects", name), |b| {
            let mut visualizer = Visualizer::with_seed(1);
            let mut canvas = canvas(width, height);
            let mut t = 0.0;
            b.iter(|| {
                t += 16.7;
                black_box(visualizer.render_sample(
                    &mut canvas,
                    SpectrumSample::frequency(&data),
                    &settings,
                    Some(VisualizerMode::Circular),
                    true,
                    t,
                ));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_modes, bench_resolutions);
criterion_main!(benches);
