//! The per-frame orchestrator.

use crate::audio::{AudioSource, SampleDomain, SpectrumSample};
use crate::designs::{self, DrawInput, VisualizerMode};
use crate::effects::EffectEngine;
use crate::overlay::{placement, OverlayAssets};
use crate::render::{Canvas, Fill, Rgba};
use crate::settings::{or_one, EngineConstants, VisualizerSettings};

use super::beat::BeatState;
use super::clock::{FrameClock, FrameTime};

const FALLBACK_BACKGROUND: Rgba = Rgba::rgb8(0x11, 0x11, 0x11);
const SHAKE_AMPLITUDE: f32 = 30.0;
const GLITCH_OFFSET: f32 = 40.0;

/// What a frame computed, for callers that react to beats.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub beat: BeatState,
    pub time: FrameTime,
}

/// Composes one frame: background, spectrum, overlays, particle effects and
/// post effects, in that order.
///
/// One instance per session. It owns the particle simulation and the
/// decoded overlay images; [`Visualizer::dispose`] releases both.
#[derive(Debug)]
pub struct Visualizer {
    effects: EffectEngine,
    assets: OverlayAssets,
    clock: FrameClock,
    rng: fastrand::Rng,
    beat_threshold: f32,
    smoothing: Option<f32>,
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::build(EffectEngine::new(), fastrand::Rng::new())
    }

    /// Reproducible randomness for particles, shake and glitch.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(EffectEngine::with_seed(seed), fastrand::Rng::with_seed(seed ^ 0x5eed))
    }

    pub fn with_constants(constants: EngineConstants, seed: u64) -> Self {
        Self::build(
            EffectEngine::with_constants(constants, seed),
            fastrand::Rng::with_seed(seed ^ 0x5eed),
        )
    }

    fn build(effects: EffectEngine, rng: fastrand::Rng) -> Self {
        Self {
            beat_threshold: effects.constants().beat_threshold,
            effects,
            assets: OverlayAssets::new(),
            clock: FrameClock::new(),
            rng,
            smoothing: None,
        }
    }

    pub fn effects(&self) -> &EffectEngine {
        &self.effects
    }

    pub fn assets(&self) -> &OverlayAssets {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut OverlayAssets {
        &mut self.assets
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    /// Pull a sample from `source` in the domain `mode` needs and render it.
    ///
    /// Forwards `settings.sensitivity` to the source whenever it changes.
    pub fn render_frame(
        &mut self,
        canvas: &mut Canvas,
        source: &mut dyn AudioSource,
        settings: &VisualizerSettings,
        mode: Option<VisualizerMode>,
        playing: bool,
        timestamp_ms: f64,
    ) -> FrameReport {
        if self.smoothing != Some(settings.sensitivity) {
            source.set_smoothing_constant(settings.sensitivity);
            self.smoothing = Some(settings.sensitivity);
        }
        let domain = mode
            .map(|m| m.sample_domain())
            .unwrap_or(SampleDomain::Frequency);
        let sample = source.sample(domain);
        self.render_sample(canvas, sample, settings, mode, playing, timestamp_ms)
    }

    /// Render one frame from an already captured sample.
    ///
    /// `mode == None` draws no spectrum but still runs overlays and effects.
    /// An empty sample yields a flat dark frame.
    pub fn render_sample(
        &mut self,
        canvas: &mut Canvas,
        sample: SpectrumSample<'_>,
        settings: &VisualizerSettings,
        mode: Option<VisualizerMode>,
        playing: bool,
        timestamp_ms: f64,
    ) -> FrameReport {
        self.assets.sync(settings);
        self.assets.poll();
        let time = self.clock.tick(timestamp_ms, playing);
        let (width, height) = (canvas.width(), canvas.height());

        canvas.clear(Rgba::BLACK);
        if sample.is_empty() {
            canvas.fill_rect(0.0, 0.0, width, height, &Fill::Solid(FALLBACK_BACKGROUND));
            return FrameReport {
                beat: BeatState::default(),
                time,
            };
        }

        let beat = BeatState::derive(&sample, playing, self.beat_threshold);
        self.effects.resize(width, height);
        if playing {
            self.effects
                .update(beat, &settings.effect_params, time.delta_secs);
        }

        let toggles = &settings.effects;
        let params = &settings.effect_params;

        canvas.save();
        if toggles.shake && beat.is_beat {
            let strength = or_one(params.shake_strength);
            let dx = (self.rng.f32() - 0.5) * SHAKE_AMPLITUDE * strength;
            let dy = (self.rng.f32() - 0.5) * SHAKE_AMPLITUDE * strength;
            canvas.translate(dx, dy);
        }
        if toggles.pulse {
            let zoom = 1.0 + beat.bass_energy / 255.0 * 0.1;
            canvas.translate(width / 2.0, height / 2.0);
            canvas.scale(zoom, zoom);
            canvas.translate(-width / 2.0, -height / 2.0);
        }

        self.draw_background(canvas, width, height);

        if let Some(mode) = mode {
            let input = DrawInput {
                data: sample.data,
                width,
                height,
                settings,
                elapsed_ms: time.elapsed_ms,
            };
            draw_spectrum(canvas, mode, input, settings, toggles.mirror);
        }

        self.draw_overlays(canvas, settings, time.elapsed_ms, width, height);
        self.effects.draw(canvas, toggles);

        if toggles.glitch && beat.is_beat {
            self.glitch(canvas, or_one(params.glitch_strength), width, height);
        }
        canvas.restore();

        FrameReport { beat, time }
    }

    fn draw_background(&self, canvas: &mut Canvas, width: f32, height: f32) {
        let image = self.assets.background().and_then(|img| {
            placement::cover(img.width() as f32, img.height() as f32, width, height)
                .map(|p| (img, p))
        });
        match image {
            Some((img, p)) => {
                canvas.draw_image(img.as_ref(), p.x, p.y, p.width, p.height, 1.0);
                canvas.fill_rect(0.0, 0.0, width, height, &Fill::Solid(Rgba::BLACK.with_alpha(0.3)));
            }
            None => canvas.fill_rect(0.0, 0.0, width, height, &Fill::Solid(FALLBACK_BACKGROUND)),
        }
    }

    fn draw_overlays(
        &self,
        canvas: &mut Canvas,
        settings: &VisualizerSettings,
        elapsed_ms: f64,
        width: f32,
        height: f32,
    ) {
        if let Some(logo) = self.assets.logo() {
            if let Some(p) = placement::anchored(
                logo.width() as f32,
                logo.height() as f32,
                width,
                height,
                or_one(settings.logo_scale),
                settings.logo_x,
                settings.logo_y,
            ) {
                canvas.draw_image(logo.as_ref(), p.x, p.y, p.width, p.height, 0.9);
            }
        }

        if let Some(sticker) = self.assets.sticker(elapsed_ms) {
            if let Some(p) = placement::anchored(
                sticker.width() as f32,
                sticker.height() as f32,
                width,
                height,
                or_one(settings.sticker_scale),
                settings.sticker_x,
                settings.sticker_y,
            ) {
                canvas.draw_image(sticker.as_ref(), p.x, p.y, p.width, p.height, 1.0);
            }
        }
    }

    /// Copy a random horizontal slice sideways and tint its top edge red.
    fn glitch(&mut self, canvas: &mut Canvas, strength: f32, width: f32, height: f32) {
        let slice_height = self.rng.f32() * 50.0 + 10.0;
        let slice_y = self.rng.f32() * height;
        let offset = (self.rng.f32() - 0.5) * GLITCH_OFFSET * strength;

        match canvas.blit_region((0.0, slice_y, width, slice_height), offset, slice_y) {
            Ok(()) => {
                let tint = Fill::Solid(Rgba::rgb8(255, 0, 0).with_alpha(0.2 * strength));
                canvas.fill_rect(0.0, slice_y, width, 5.0, &tint);
            }
            Err(err) => log::trace!("glitch skipped: {err}"),
        }
    }

    /// Drop particles, decoded overlays and timing state.
    pub fn dispose(&mut self) {
        self.assets.dispose();
        self.effects.reset();
        self.clock.reset();
        self.smoothing = None;
    }
}

/// Place the design: centred, offset and scaled by the user transform, and
/// optionally mirrored into two half-width copies.
fn draw_spectrum(
    canvas: &mut Canvas,
    mode: VisualizerMode,
    input: DrawInput<'_>,
    settings: &VisualizerSettings,
    mirror: bool,
) {
    let (width, height) = (input.width, input.height);
    canvas.save();
    canvas.translate(width / 2.0, height / 2.0);
    canvas.translate(settings.position_x, settings.position_y);
    canvas.scale(settings.scale, settings.scale);

    if mirror {
        let half = DrawInput {
            width: width / 2.0,
            ..input
        };
        canvas.save();
        canvas.translate(0.0, -height / 2.0);
        designs::draw(mode, canvas, &half);
        canvas.restore();

        canvas.save();
        canvas.scale(-1.0, 1.0);
        canvas.translate(0.0, -height / 2.0);
        designs::draw(mode, canvas, &half);
        canvas.restore();
    } else {
        canvas.translate(-width / 2.0, -height / 2.0);
        designs::draw(mode, canvas, &input);
    }
    canvas.restore();
}
