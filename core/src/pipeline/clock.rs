//! Host timestamps to frame deltas and the animation clock.

/// Timing for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Time since the previous frame, in seconds. Zero on the first frame.
    pub delta_secs: f32,
    /// Animation clock in milliseconds; only advances while playing.
    pub elapsed_ms: f64,
}

/// Tracks the previous host timestamp and the play-time animation clock.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    elapsed_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `timestamp_ms`. Timestamps that run backwards count as a
    /// zero-length frame.
    pub fn tick(&mut self, timestamp_ms: f64, playing: bool) -> FrameTime {
        let delta_ms = match self.last_ms {
            Some(last) if timestamp_ms > last => timestamp_ms - last,
            _ => 0.0,
        };
        self.last_ms = Some(timestamp_ms);
        if playing {
            self.elapsed_ms += delta_ms;
        }
        FrameTime {
            delta_secs: (delta_ms / 1000.0) as f32,
            elapsed_ms: self.elapsed_ms,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Forget the previous timestamp so the next frame has zero delta.
    /// The animation clock is kept.
    pub fn resync(&mut self) {
        self.last_ms = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_has_zero_delta() {
        let mut clock = FrameClock::new();
        let t = clock.tick(5000.0, true);
        assert_eq!(t.delta_secs, 0.0);
        assert_eq!(t.elapsed_ms, 0.0);

        let t = clock.tick(5016.0, true);
        assert!((t.delta_secs - 0.016).abs() < 1e-6);
        assert_eq!(t.elapsed_ms, 16.0);
    }

    #[test]
    fn test_paused_frames_do_not_advance_animation() {
        let mut clock = FrameClock::new();
        clock.tick(0.0, true);
        clock.tick(100.0, true);
        let t = clock.tick(500.0, false);
        assert!((t.delta_secs - 0.4).abs() < 1e-6);
        assert_eq!(t.elapsed_ms, 100.0);
        assert_eq!(clock.tick(600.0, true).elapsed_ms, 200.0);
    }

    #[test]
    fn test_backwards_timestamp_is_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick(1000.0, true);
        let t = clock.tick(900.0, true);
        assert_eq!(t.delta_secs, 0.0);
        assert_eq!(clock.tick(950.0, true).elapsed_ms, 50.0);
    }

    #[test]
    fn test_resync_keeps_animation_clock() {
        let mut clock = FrameClock::new();
        clock.tick(0.0, true);
        clock.tick(250.0, true);
        clock.resync();
        let t = clock.tick(10_000.0, true);
        assert_eq!(t.delta_secs, 0.0);
        assert_eq!(t.elapsed_ms, 250.0);
    }
}
