//! Benchmarks for audio analysis.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sonic_canvas::audio::{AnalyserNode, AudioSource, SampleDomain, Synth};
use sonic_canvas::pipeline::BeatState;

const SAMPLE_RATE: u32 = 44100;

fn bench_frequency_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("Analyser");
    let samples = Synth::new(SAMPLE_RATE).noise(1.0, 0.8, 42);

    for fft_size in [512, 1024, 2048, 4096] {
        group.throughput(Throughput::Elements(fft_size as u64));
        group.bench_with_input(
            BenchmarkId::new("frequency_data", fft_size),
            &fft_size,
            |b, &size| {
                let mut analyser = AnalyserNode::new(size).unwrap();
                analyser.push_samples(&samples);
                b.iter(|| {
                    black_box(analyser.frequency_data()[0]);
                });
            },
        );
    }

    group.finish();
}

fn bench_frame_hop(c: &mut Criterion) {
    // One 60 fps frame: push a hop of PCM, read the spectrum, derive the beat.
    let mut group = c.benchmark_group("Frame Hop");
    let pcm = Synth::new(SAMPLE_RATE).beat_pattern(120.0, 2.0);
    let hop = SAMPLE_RATE as usize / 60;

    group.throughput(Throughput::Elements(hop as u64));
    group.bench_function("push_and_derive", |b| {
        let mut analyser = AnalyserNode::default();
        let mut chunks = pcm.chunks(hop).cycle();
        b.iter(|| {
            if let Some(chunk) = chunks.next() {
                analyser.push_samples(chunk);
            }
            let sample = analyser.sample(SampleDomain::Frequency);
            black_box(BeatState::derive(&sample, true, 140.0));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_frequency_data, bench_frame_hop);
criterion_main!(benches);
