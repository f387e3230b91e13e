//! Example: Render a visualization from synthetic audio.
//!
//! This example generates a synthetic beat pattern and exports a short run
//! of PNG frames.
//!
//! Run with:
//!     cargo run --example render_synthetic -- [output_dir] [MODE]

use std::path::PathBuf;

use anyhow::Context;
use sonic_canvas::audio::Synth;
use sonic_canvas::designs::VisualizerMode;
use sonic_canvas::pipeline::{export_frames, ExportConfig, ExportProgress, Resolution};
use sonic_canvas::settings::VisualizerSettings;
use sonic_canvas::ThemeColor;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| "synthetic_frames".into()));
    let mode = args
        .next()
        .map(|name| VisualizerMode::parse_or_default(&name))
        .unwrap_or(VisualizerMode::Circular);

    println!("Sonic Canvas - Synthetic Audio Example");
    println!("======================================\n");

    // Generate synthetic audio (120 BPM beat, 3 seconds)
    let synth = Synth::default();
    let duration_secs = 3.0;
    let bpm = 120.0;
    let samples = synth.beat_pattern(bpm, duration_secs as f32);

    println!("Generating synthetic beat...");
    println!("  Sample rate: {} Hz", synth.sample_rate);
    println!("  Duration: {} seconds", duration_secs);
    println!("  BPM: {}", bpm);
    println!("  Generated {} samples\n", samples.len());

    let mut settings = VisualizerSettings {
        color: ThemeColor::Rainbow,
        line_thickness: 3.0,
        ..VisualizerSettings::default()
    };
    settings.effects.pulse = true;
    settings.effects.shake = true;
    settings.effects.starfield = true;
    settings.effects.fireworks = true;
    settings.effects.vignette = true;

    let config = ExportConfig {
        resolution: Resolution::P720,
        fps: 30,
        mode: Some(mode),
        seed: Some(7),
        ..ExportConfig::new(&output_dir, duration_secs)
    };

    println!("Rendering {} ({})...", mode.name(), mode.description());
    println!("  Resolution: {:?}", config.resolution.dimensions());
    println!("  Frames: {}", config.total_frames());

    let mut report = |p: ExportProgress| {
        if p.frame % 30 == 0 || p.frame == p.total {
            println!("  Progress: {:.0}%", p.fraction() * 100.0);
        }
    };
    let summary = export_frames(&config, &settings, &samples, synth.sample_rate, Some(&mut report))
        .with_context(|| format!("exporting to {}", output_dir.display()))?;

    println!("\nDone! {} frames in {}", summary.frames, summary.output_dir.display());
    println!(
        "Encode with: ffmpeg -framerate {} -i {}/frame_%05d.png out.mp4",
        config.fps,
        summary.output_dir.display()
    );

    Ok(())
}
