//! Frame scheduling: a paced live loop and a virtual-time offline loop
//! share the same orchestrator through [`FrameScheduler`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::visualizer::{FrameReport, Visualizer};
use super::PipelineError;
use crate::audio::AudioSource;
use crate::designs::VisualizerMode;
use crate::render::Canvas;
use crate::settings::SettingsHandle;

/// Source of frame timestamps.
pub trait FrameScheduler {
    /// Wait for the next frame and return its timestamp in milliseconds,
    /// or `None` once the loop should end.
    fn next_frame(&mut self) -> Option<f64>;
}

/// Idempotent, thread-safe "stop scheduling frames" switch.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Wall-clock scheduler paced to a target frame rate.
#[derive(Debug)]
pub struct RealtimeScheduler {
    interval: Duration,
    start: Instant,
    next_due: Option<Instant>,
    stop: StopHandle,
}

impl RealtimeScheduler {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            start: Instant::now(),
            next_due: None,
            stop: StopHandle::new(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

impl FrameScheduler for RealtimeScheduler {
    fn next_frame(&mut self) -> Option<f64> {
        if self.stop.is_stopped() {
            return None;
        }
        let now = Instant::now();
        if let Some(due) = self.next_due {
            if due > now {
                thread::sleep(due - now);
            }
        }
        let now = Instant::now();
        // Fall back to the current time after a stall instead of bursting.
        self.next_due = Some(match self.next_due {
            Some(due) if due + self.interval > now => due + self.interval,
            _ => now + self.interval,
        });
        if self.stop.is_stopped() {
            return None;
        }
        Some(now.duration_since(self.start).as_secs_f64() * 1000.0)
    }
}

/// Virtual-time scheduler: frame `i` is at `i * 1000 / fps` ms.
#[derive(Debug, Clone)]
pub struct FixedRateScheduler {
    fps: u32,
    total_frames: usize,
    index: usize,
}

impl FixedRateScheduler {
    pub fn new(fps: u32, total_frames: usize) -> Self {
        Self {
            fps: fps.max(1),
            total_frames,
            index: 0,
        }
    }

    /// Enough frames to cover `duration_secs`.
    pub fn for_duration(fps: u32, duration_secs: f64) -> Self {
        let fps = fps.max(1);
        let frames = (duration_secs.max(0.0) * fps as f64).ceil() as usize;
        Self::new(fps, frames)
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    /// Index of the frame the next call will yield.
    pub fn frame_index(&self) -> usize {
        self.index
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn next_frame(&mut self) -> Option<f64> {
        if self.index >= self.total_frames {
            return None;
        }
        let t = self.index as f64 * 1000.0 / self.fps as f64;
        self.index += 1;
        Some(t)
    }
}

/// Drives a [`Visualizer`] from any scheduler, reading one settings
/// snapshot per frame.
pub struct RenderLoop<S> {
    scheduler: S,
    mode: Option<VisualizerMode>,
    playing: bool,
}

impl<S: FrameScheduler> RenderLoop<S> {
    pub fn new(scheduler: S, mode: Option<VisualizerMode>) -> Self {
        Self {
            scheduler,
            mode,
            playing: true,
        }
    }

    pub fn set_mode(&mut self, mode: Option<VisualizerMode>) {
        self.mode = mode;
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Render until the scheduler runs out, handing each finished canvas
    /// to `sink`. A sink error ends the loop. Returns the frame count.
    pub fn run<F>(
        &mut self,
        visualizer: &mut Visualizer,
        canvas: &mut Canvas,
        source: &mut dyn AudioSource,
        settings: &SettingsHandle,
        mut sink: F,
    ) -> Result<usize, PipelineError>
    where
        F: FnMut(usize, &Canvas, &FrameReport) -> Result<(), PipelineError>,
    {
        let mut frames = 0;
        while let Some(timestamp) = self.scheduler.next_frame() {
            let snapshot = settings.snapshot();
            let report = visualizer.render_frame(
                canvas,
                source,
                &snapshot,
                self.mode,
                self.playing,
                timestamp,
            );
            sink(frames, canvas, &report)?;
            frames += 1;
        }
        log::debug!("render loop finished after {frames} frames");
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_rate_timestamps() {
        let mut s = FixedRateScheduler::new(30, 3);
        assert_eq!(s.next_frame(), Some(0.0));
        assert!((s.next_frame().unwrap() - 33.333).abs() < 0.01);
        assert!((s.next_frame().unwrap() - 66.667).abs() < 0.01);
        assert_eq!(s.next_frame(), None);
    }

    #[test]
    fn test_for_duration_rounds_up() {
        assert_eq!(FixedRateScheduler::for_duration(30, 1.01).total_frames(), 31);
        assert_eq!(FixedRateScheduler::for_duration(60, 0.0).total_frames(), 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut s = RealtimeScheduler::new(1000);
        assert!(s.next_frame().is_some());
        let stop = s.stop_handle();
        stop.stop();
        stop.stop();
        assert!(stop.is_stopped());
        assert_eq!(s.next_frame(), None);
        assert_eq!(s.next_frame(), None);
    }

    #[test]
    fn test_realtime_timestamps_increase() {
        let mut s = RealtimeScheduler::new(500);
        let a = s.next_frame().unwrap();
        let b = s.next_frame().unwrap();
        assert!(b > a);
    }
}
