//! Headless export: render PCM audio to numbered PNG frames at a fixed
//! virtual frame rate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::scheduler::{FixedRateScheduler, FrameScheduler};
use super::visualizer::Visualizer;
use super::PipelineError;
use crate::audio::{AnalyserNode, AudioSource, SampleDomain};
use crate::designs::VisualizerMode;
use crate::render::{Canvas, WORKING_HEIGHT, WORKING_WIDTH};
use crate::settings::VisualizerSettings;

/// How long an export waits for overlay images before starting without them.
const ASSET_TIMEOUT: Duration = Duration::from_secs(10);

/// Output frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    P1080,
    P720,
    Custom { width: u32, height: u32 },
}

impl Resolution {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Resolution::P1080 => (1920, 1080),
            Resolution::P720 => (1280, 720),
            Resolution::Custom { width, height } => (*width, *height),
        }
    }
}

/// Export job description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    pub resolution: Resolution,
    pub fps: u32,
    pub duration_secs: f64,
    pub output_dir: PathBuf,
    pub mode: Option<VisualizerMode>,
    /// Fixed seed for particles, shake and glitch; random when unset.
    pub seed: Option<u64>,
}

impl ExportConfig {
    pub fn new(output_dir: impl Into<PathBuf>, duration_secs: f64) -> Self {
        Self {
            resolution: Resolution::P1080,
            fps: 30,
            duration_secs,
            output_dir: output_dir.into(),
            mode: Some(VisualizerMode::Bars),
            seed: None,
        }
    }

    pub fn total_frames(&self) -> usize {
        FixedRateScheduler::for_duration(self.fps, self.duration_secs).total_frames()
    }
}

/// Progress after each written frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportProgress {
    pub frame: usize,
    pub total: usize,
}

impl ExportProgress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.frame as f32 / self.total as f32
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub frames: usize,
    pub output_dir: PathBuf,
}

/// `frame_00000.png`, `frame_00001.png`, ...
pub fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}

/// Analyser fed from a PCM buffer as virtual time advances. Audio past the
/// end of the buffer is silence.
struct PcmFeed<'a> {
    analyser: AnalyserNode,
    pcm: &'a [f32],
    sample_rate: u32,
    cursor: usize,
}

impl<'a> PcmFeed<'a> {
    fn new(pcm: &'a [f32], sample_rate: u32) -> Self {
        Self {
            analyser: AnalyserNode::default(),
            pcm,
            sample_rate,
            cursor: 0,
        }
    }

    /// Push everything up to `time_ms`.
    fn advance_to(&mut self, time_ms: f64) {
        let end = (time_ms / 1000.0 * self.sample_rate as f64).round().max(0.0) as usize;
        if end <= self.cursor {
            return;
        }
        let available = end.min(self.pcm.len());
        if available > self.cursor {
            self.analyser.push_samples(&self.pcm[self.cursor..available]);
        }
        let silence = end - available.max(self.cursor);
        if silence > 0 {
            self.analyser.push_samples(&vec![0.0; silence]);
        }
        self.cursor = end;
    }
}

impl AudioSource for PcmFeed<'_> {
    fn frequency_data(&mut self) -> &[u8] {
        self.analyser.frequency_data()
    }

    fn waveform_data(&mut self) -> &[u8] {
        self.analyser.waveform_data()
    }

    fn set_smoothing_constant(&mut self, value: f32) {
        self.analyser.set_smoothing_constant(value);
    }
}

/// Render `pcm` (mono, `sample_rate` Hz) to PNG frames in
/// `config.output_dir`.
///
/// Frames are composed at the 1920x1080 working resolution and scaled onto
/// the output resolution.
pub fn export_frames(
    config: &ExportConfig,
    settings: &VisualizerSettings,
    pcm: &[f32],
    sample_rate: u32,
    mut progress: Option<&mut dyn FnMut(ExportProgress)>,
) -> Result<ExportSummary, PipelineError> {
    let (width, height) = config.resolution.dimensions();
    std::fs::create_dir_all(&config.output_dir)?;

    let mut canvas = Canvas::with_working_size(
        width,
        height,
        WORKING_WIDTH as f32,
        WORKING_HEIGHT as f32,
    )?;
    let mut visualizer = match config.seed {
        Some(seed) => Visualizer::with_seed(seed),
        None => Visualizer::new(),
    };
    visualizer.assets_mut().sync(settings);
    if !visualizer.assets_mut().wait(ASSET_TIMEOUT) {
        log::warn!("overlay images still decoding; exporting without them");
    }

    let mut feed = PcmFeed::new(pcm, sample_rate.max(1));
    feed.set_smoothing_constant(settings.sensitivity);
    let domain = config
        .mode
        .map(|m| m.sample_domain())
        .unwrap_or(SampleDomain::Frequency);

    let mut scheduler = FixedRateScheduler::for_duration(config.fps, config.duration_secs);
    let total = scheduler.total_frames();
    log::info!(
        "exporting {total} frames at {width}x{height}, {} fps, to {}",
        scheduler.fps(),
        config.output_dir.display()
    );

    let mut frame = 0;
    while let Some(timestamp) = scheduler.next_frame() {
        feed.advance_to(timestamp);
        visualizer.render_sample(
            &mut canvas,
            feed.sample(domain),
            settings,
            config.mode,
            true,
            timestamp,
        );

        let path = frame_path(&config.output_dir, frame);
        image::save_buffer(&path, &canvas.to_rgba8(), width, height, image::ColorType::Rgba8)?;
        frame += 1;

        if let Some(cb) = progress.as_mut() {
            cb(ExportProgress { frame, total });
        }
        if frame % scheduler.fps() as usize == 0 {
            log::info!("exported {frame}/{total} frames");
        }
    }

    visualizer.dispose();
    Ok(ExportSummary {
        frames: frame,
        output_dir: config.output_dir.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_dimensions() {
        assert_eq!(Resolution::P1080.dimensions(), (1920, 1080));
        assert_eq!(Resolution::P720.dimensions(), (1280, 720));
        assert_eq!(
            Resolution::Custom {
                width: 64,
                height: 36
            }
            .dimensions(),
            (64, 36)
        );
    }

    #[test]
    fn test_frame_path_is_zero_padded() {
        let p = frame_path(Path::new("/tmp/out"), 42);
        assert_eq!(p, PathBuf::from("/tmp/out/frame_00042.png"));
    }

    #[test]
    fn test_pcm_feed_pads_with_silence() {
        let pcm = vec![0.5f32; 100];
        let mut feed = PcmFeed::new(&pcm, 1000);
        feed.advance_to(50.0);
        assert_eq!(feed.cursor, 50);
        feed.advance_to(300.0);
        assert_eq!(feed.cursor, 300);
        feed.advance_to(200.0);
        assert_eq!(feed.cursor, 300);
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(ExportProgress { frame: 3, total: 4 }.fraction(), 0.75);
        assert_eq!(ExportProgress { frame: 0, total: 0 }.fraction(), 1.0);
    }
}
