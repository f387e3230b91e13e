//! Particle effects and screen overlays layered over the spectrum.
//!
//! [`EffectEngine`] owns one population per [`EffectKind`]. `update`
//! advances every population regardless of which effects are switched on,
//! so toggling an effect mid-song shows a settled field instead of an empty
//! one. `draw` is pure with respect to the simulation state.

mod overlays;
mod paint;
mod particle;

use std::f32::consts::PI;

pub use particle::{population_target, EffectKind, Particle};

use crate::pipeline::BeatState;
use crate::render::{Canvas, Rgba, WORKING_HEIGHT, WORKING_WIDTH};
use crate::settings::{or_one, EffectParams, EffectToggles, EngineConstants};
use particle::sustain;

const FIREWORK_COLORS: [Rgba; 6] = [
    Rgba::rgb8(0xff, 0x00, 0x00),
    Rgba::rgb8(0x00, 0xff, 0x00),
    Rgba::rgb8(0x00, 0x00, 0xff),
    Rgba::rgb8(0xff, 0xff, 0x00),
    Rgba::rgb8(0xff, 0x00, 0xff),
    Rgba::rgb8(0x00, 0xff, 0xff),
];

/// Wrap margin for fog banks, which are larger than the screen edge.
const FOG_MARGIN: f32 = 200.0;
/// Wrap margin for fireflies.
const FIREFLY_MARGIN: f32 = 20.0;

/// Stateful simulation of every particle effect.
#[derive(Debug, Clone)]
pub struct EffectEngine {
    width: f32,
    height: f32,
    constants: EngineConstants,
    rng: fastrand::Rng,
    grain_seed: u64,
    snow: Vec<Particle>,
    rain: Vec<Particle>,
    droplets: Vec<Particle>,
    floating: Vec<Particle>,
    fireworks: Vec<Particle>,
    stars: Vec<Particle>,
    fog: Vec<Particle>,
    fireflies: Vec<Particle>,
}

impl Default for EffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectEngine {
    pub fn new() -> Self {
        Self::with_rng(EngineConstants::default(), fastrand::Rng::new())
    }

    /// Deterministic engine for reproducible renders and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(EngineConstants::default(), fastrand::Rng::with_seed(seed))
    }

    pub fn with_constants(constants: EngineConstants, seed: u64) -> Self {
        Self::with_rng(constants, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(constants: EngineConstants, rng: fastrand::Rng) -> Self {
        let mut engine = Self {
            width: WORKING_WIDTH as f32,
            height: WORKING_HEIGHT as f32,
            constants,
            grain_seed: 0,
            rng,
            snow: Vec::new(),
            rain: Vec::new(),
            droplets: Vec::new(),
            floating: Vec::new(),
            fireworks: Vec::new(),
            stars: Vec::new(),
            fog: Vec::new(),
            fireflies: Vec::new(),
        };
        engine.seed_static_layers();
        engine
    }

    /// Stars and fog exist from construction, independent of intensity.
    fn seed_static_layers(&mut self) {
        let (w, h) = (self.width, self.height);
        let rng = &mut self.rng;

        self.stars = (0..self.constants.star_count)
            .map(|_| {
                let mut p = Particle::at(rng.f32() * w, rng.f32() * h);
                p.size = rng.f32() * 2.0 + 1.0;
                p.alpha = rng.f32();
                p
            })
            .collect();

        self.fog = (0..self.constants.fog_count)
            .map(|_| {
                let mut p = Particle::at(rng.f32() * w, rng.f32() * h);
                p.vx = (rng.f32() - 0.5) * 0.5;
                p.size = 300.0 + rng.f32() * 200.0;
                p.alpha = 0.1 + rng.f32() * 0.1;
                p
            })
            .collect();
    }

    /// Resize the simulation area. Existing particles keep their positions.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn constants(&self) -> &EngineConstants {
        &self.constants
    }

    pub fn particles(&self, kind: EffectKind) -> &[Particle] {
        match kind {
            EffectKind::Fog => &self.fog,
            EffectKind::Starfield => &self.stars,
            EffectKind::Fireflies => &self.fireflies,
            EffectKind::Floating => &self.floating,
            EffectKind::Fireworks => &self.fireworks,
            EffectKind::Snow => &self.snow,
            EffectKind::Rain => &self.rain,
            EffectKind::Droplets => &self.droplets,
        }
    }

    /// Drop every particle, then reseed stars and fog.
    pub fn reset(&mut self) {
        self.snow.clear();
        self.rain.clear();
        self.droplets.clear();
        self.floating.clear();
        self.fireworks.clear();
        self.fireflies.clear();
        self.seed_static_layers();
    }

    /// Advance every population by `dt` seconds.
    ///
    /// Motion is expressed per 1/60 s tick, so positional deltas scale
    /// linearly with `dt`. Zero `speed` or `intensity` count as 1.0.
    pub fn update(&mut self, beat: BeatState, params: &EffectParams, dt: f32) {
        let speed = or_one(params.speed);
        let intensity = or_one(params.intensity);
        let dt_scale = dt.max(0.0) * 60.0;

        self.update_snow(speed, intensity, dt_scale);
        self.update_rain(speed, intensity, dt_scale);
        self.update_droplets(beat.is_beat, speed, intensity, dt_scale);
        self.update_floating(beat.is_beat, speed, intensity, dt_scale);
        self.update_fireworks(beat.is_beat, speed, intensity, dt_scale);
        self.update_stars(speed, dt_scale);
        self.update_fog(speed, dt_scale);
        self.update_fireflies(speed, intensity, dt_scale);

        self.grain_seed = self.rng.u64(..);
    }

    fn update_snow(&mut self, speed: f32, intensity: f32, dt: f32) {
        let (w, h) = (self.width, self.height);
        let target = population_target(self.constants.snow_count, intensity);
        let rng = &mut self.rng;

        sustain(&mut self.snow, target, || {
            let mut p = Particle::at(rng.f32() * w, -10.0);
            p.vx = (rng.f32() - 0.5) * speed;
            p.vy = (rng.f32() * 2.0 + 1.0) * speed;
            p.size = rng.f32() * 3.0 + 1.0;
            p.alpha = rng.f32() * 0.5 + 0.3;
            p
        });

        for p in &mut self.snow {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            if p.y > h {
                p.y = -10.0;
                p.x = rng.f32() * w;
            }
        }
    }

    fn update_rain(&mut self, speed: f32, intensity: f32, dt: f32) {
        let (w, h) = (self.width, self.height);
        let target = population_target(self.constants.rain_count, intensity);
        let rng = &mut self.rng;

        sustain(&mut self.rain, target, || {
            let mut p = Particle::at(rng.f32() * w, -20.0);
            p.vx = (rng.f32() - 0.5) * 0.5 * speed;
            p.vy = (rng.f32() * 15.0 + 10.0) * speed;
            p.size = rng.f32() * 2.0 + 1.0;
            p.alpha = rng.f32() * 0.4 + 0.1;
            p.life = rng.f32() * 20.0 + 10.0;
            p
        });

        for p in &mut self.rain {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            if p.y > h {
                p.y = -20.0;
                p.x = rng.f32() * w;
            }
        }
    }

    fn update_droplets(&mut self, is_beat: bool, speed: f32, intensity: f32, dt: f32) {
        let (w, h) = (self.width, self.height);
        let target = population_target(self.constants.droplet_count, intensity);
        let rng = &mut self.rng;

        let spawn = (is_beat && rng.f32() > 0.7 / intensity) || rng.f32() > 0.98 / intensity;
        if spawn && self.droplets.len() < target {
            let mut p = Particle::at(rng.f32() * w, rng.f32() * h);
            p.size = rng.f32() * 20.0 + 10.0;
            p.alpha = 0.0;
            p.max_life = Some((rng.f32() * 100.0 + 100.0) / speed);
            self.droplets.push(p);
        }

        self.droplets.retain_mut(|p| {
            let max_life = p.max_life.unwrap_or(0.0);
            p.life += dt;
            if p.life < 20.0 {
                p.alpha = p.life / 20.0 * 0.6;
            } else if p.life > max_life - 30.0 {
                p.alpha = ((max_life - p.life) / 30.0).max(0.0) * 0.6;
            }
            p.life <= max_life
        });
    }

    fn update_floating(&mut self, is_beat: bool, speed: f32, intensity: f32, dt: f32) {
        let (w, h) = (self.width, self.height);
        let target = population_target(self.constants.floating_count, intensity);
        let rng = &mut self.rng;

        sustain(&mut self.floating, target, || {
            let mut p = Particle::at(rng.f32() * w, rng.f32() * h);
            p.vx = (rng.f32() - 0.5) * 0.5 * speed;
            p.vy = (rng.f32() - 0.5) * 0.5 * speed;
            p.size = rng.f32() * 20.0 + 5.0;
            p.alpha = rng.f32() * 0.3;
            p
        });

        for p in &mut self.floating {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            wrap(&mut p.x, w, 0.0);
            wrap(&mut p.y, h, 0.0);
            p.size = if is_beat {
                (p.size * 1.02).min(40.0)
            } else {
                (p.size * 0.99).max(5.0)
            };
        }
    }

    fn update_fireworks(&mut self, is_beat: bool, speed: f32, intensity: f32, dt: f32) {
        let (w, h) = (self.width, self.height);
        let rng = &mut self.rng;

        if is_beat && rng.f32() > 0.8 / intensity.max(0.1) {
            let color = FIREWORK_COLORS[rng.usize(..FIREWORK_COLORS.len())];
            let cx = rng.f32() * w;
            let cy = rng.f32() * h * 0.6;
            log::trace!("firework burst at ({cx:.0}, {cy:.0})");
            for _ in 0..self.constants.firework_burst {
                let angle = rng.f32() * PI * 2.0;
                let velocity = (rng.f32() * 5.0 + 2.0) * speed;
                let mut p = Particle::at(cx, cy);
                p.vx = angle.cos() * velocity;
                p.vy = angle.sin() * velocity;
                p.size = rng.f32() * 3.0 + 1.0;
                p.life = 1.0;
                p.color = Some(color);
                self.fireworks.push(p);
            }
        }

        self.fireworks.retain_mut(|p| {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.vy += 0.1 * speed * dt;
            p.life -= 0.02 * speed * dt;
            p.life > 0.0
        });
    }

    fn update_stars(&mut self, speed: f32, dt: f32) {
        let w = self.width;
        for p in &mut self.stars {
            p.alpha = (p.alpha + (self.rng.f32() - 0.5) * 0.1 * speed * dt).clamp(0.2, 0.8);
            p.x -= 0.2 * speed * dt;
            if p.x < 0.0 {
                p.x = w;
            }
        }
    }

    fn update_fog(&mut self, speed: f32, dt: f32) {
        let w = self.width;
        for p in &mut self.fog {
            p.x += p.vx * speed * dt;
            wrap(&mut p.x, w, FOG_MARGIN);
        }
    }

    fn update_fireflies(&mut self, speed: f32, intensity: f32, dt: f32) {
        let (w, h) = (self.width, self.height);
        let target = population_target(self.constants.firefly_count, intensity);
        let rng = &mut self.rng;

        sustain(&mut self.fireflies, target, || {
            let mut p = Particle::at(rng.f32() * w, rng.f32() * h);
            p.vx = (rng.f32() - 0.5) * 0.5 * speed;
            p.vy = (rng.f32() - 0.5) * 0.5 * speed;
            p.size = rng.f32() * 4.0 + 2.0;
            p.life = rng.f32() * PI * 2.0;
            p
        });

        for p in &mut self.fireflies {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.vx = (p.vx + (rng.f32() - 0.5) * 0.05 * dt).clamp(-speed, speed);
            p.vy = (p.vy + (rng.f32() - 0.5) * 0.05 * dt).clamp(-speed, speed);
            wrap(&mut p.x, w, FIREFLY_MARGIN);
            wrap(&mut p.y, h, FIREFLY_MARGIN);
            p.life += 0.05 * speed * dt;
            p.alpha = (p.life.sin() + 1.0) / 2.0 * 0.8 + 0.2;
        }
    }

    /// Paint enabled effects back to front, then the screen overlays.
    pub fn draw(&self, canvas: &mut Canvas, toggles: &EffectToggles) {
        let layers = [
            (toggles.fog, EffectKind::Fog),
            (toggles.starfield, EffectKind::Starfield),
            (toggles.fireflies, EffectKind::Fireflies),
            (toggles.particles, EffectKind::Floating),
            (toggles.fireworks, EffectKind::Fireworks),
            (toggles.snow, EffectKind::Snow),
            (toggles.rain, EffectKind::Rain),
            (toggles.raindrops, EffectKind::Droplets),
        ];

        canvas.save();
        for (enabled, kind) in layers {
            if enabled {
                paint::draw_kind(canvas, kind, self.particles(kind));
            }
        }
        canvas.set_alpha(1.0);

        let (w, h) = (self.width, self.height);
        if toggles.scanlines {
            overlays::scanlines(canvas, w, h);
        }
        if toggles.vignette {
            overlays::vignette(canvas, w, h);
        }
        if toggles.film_grain {
            overlays::film_grain(canvas, w, h, self.grain_seed);
        }
        canvas.restore();
    }
}

/// Wrap `v` into `[-margin, extent + margin]`, re-entering from the other side.
fn wrap(v: &mut f32, extent: f32, margin: f32) {
    if *v < -margin {
        *v = extent + margin;
    }
    if *v > extent + margin {
        *v = -margin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALM: BeatState = BeatState {
        is_beat: false,
        bass_energy: 0.0,
    };
    const BEAT: BeatState = BeatState {
        is_beat: true,
        bass_energy: 255.0,
    };

    fn params(speed: f32, intensity: f32) -> EffectParams {
        EffectParams {
            speed,
            intensity,
            ..EffectParams::default()
        }
    }

    #[test]
    fn test_static_layers_exist_at_construction() {
        let engine = EffectEngine::with_seed(1);
        assert_eq!(engine.particles(EffectKind::Starfield).len(), 100);
        assert_eq!(engine.particles(EffectKind::Fog).len(), 5);
        assert!(engine.particles(EffectKind::Snow).is_empty());
    }

    #[test]
    fn test_populations_grow_one_per_tick() {
        let mut engine = EffectEngine::with_seed(2);
        for _ in 0..10 {
            engine.update(CALM, &params(1.0, 1.0), 1.0 / 60.0);
        }
        assert_eq!(engine.particles(EffectKind::Snow).len(), 10);
        assert_eq!(engine.particles(EffectKind::Rain).len(), 10);
        assert_eq!(engine.particles(EffectKind::Floating).len(), 10);
        assert_eq!(engine.particles(EffectKind::Fireflies).len(), 10);
    }

    #[test]
    fn test_population_shrinks_to_lower_intensity() {
        let mut engine = EffectEngine::with_seed(3);
        for _ in 0..200 {
            engine.update(CALM, &params(1.0, 1.0), 1.0 / 60.0);
        }
        assert_eq!(engine.particles(EffectKind::Snow).len(), 150);
        assert_eq!(engine.particles(EffectKind::Floating).len(), 50);

        engine.update(CALM, &params(1.0, 0.5), 1.0 / 60.0);
        assert_eq!(engine.particles(EffectKind::Snow).len(), 75);
        assert_eq!(engine.particles(EffectKind::Floating).len(), 25);
        assert_eq!(engine.particles(EffectKind::Fireflies).len(), 15);
    }

    #[test]
    fn test_zero_multipliers_fall_back_to_one() {
        let mut engine = EffectEngine::with_seed(4);
        for _ in 0..200 {
            engine.update(CALM, &params(0.0, 0.0), 1.0 / 60.0);
        }
        assert_eq!(engine.particles(EffectKind::Snow).len(), 150);
    }

    #[test]
    fn test_fog_drift_scales_with_dt() {
        let mut a = EffectEngine::with_seed(5);
        let mut b = a.clone();
        let before: Vec<f32> = a.particles(EffectKind::Fog).iter().map(|p| p.x).collect();
        a.update(CALM, &params(1.0, 1.0), 1.0 / 60.0);
        b.update(CALM, &params(1.0, 1.0), 1.0 / 30.0);

        for ((x0, pa), pb) in before
            .iter()
            .zip(a.particles(EffectKind::Fog))
            .zip(b.particles(EffectKind::Fog))
        {
            let da = pa.x - x0;
            let db = pb.x - x0;
            assert!((db - 2.0 * da).abs() < 1e-3, "{da} vs {db}");
        }
    }

    #[test]
    fn test_fireworks_fall_and_fade() {
        let mut engine = EffectEngine::with_seed(6);
        let loud = params(1.0, 10.0);
        for _ in 0..50 {
            engine.update(BEAT, &loud, 1.0 / 60.0);
            if !engine.particles(EffectKind::Fireworks).is_empty() {
                break;
            }
        }
        let burst = engine.particles(EffectKind::Fireworks).len();
        assert!(burst >= 30 && burst % 30 == 0);
        assert!(engine
            .particles(EffectKind::Fireworks)
            .iter()
            .all(|p| p.color.is_some() && p.life <= 1.0));

        // Life decays by 0.02 per tick, so every particle is gone after 50 calm ticks.
        for _ in 0..51 {
            engine.update(CALM, &loud, 1.0 / 60.0);
        }
        assert!(engine.particles(EffectKind::Fireworks).is_empty());
    }

    #[test]
    fn test_stars_stay_within_alpha_band() {
        let mut engine = EffectEngine::with_seed(7);
        for _ in 0..100 {
            engine.update(CALM, &params(3.0, 1.0), 1.0 / 60.0);
        }
        assert!(engine
            .particles(EffectKind::Starfield)
            .iter()
            .all(|p| (0.2..=0.8).contains(&p.alpha) && p.x >= 0.0));
    }

    #[test]
    fn test_droplets_fade_and_expire() {
        let mut engine = EffectEngine::with_seed(8);
        for _ in 0..400 {
            engine.update(BEAT, &params(1.0, 3.0), 1.0 / 60.0);
            for p in engine.particles(EffectKind::Droplets) {
                assert!((0.0..=0.6).contains(&p.alpha));
                assert!(p.life <= p.max_life.unwrap());
            }
        }
        assert!(engine.particles(EffectKind::Droplets).len() <= 60);
    }

    #[test]
    fn test_floating_motes_swell_on_beats() {
        let mut engine = EffectEngine::with_seed(9);
        for _ in 0..50 {
            engine.update(CALM, &params(1.0, 1.0), 1.0 / 60.0);
        }
        for _ in 0..200 {
            engine.update(BEAT, &params(1.0, 1.0), 1.0 / 60.0);
        }
        assert!(engine
            .particles(EffectKind::Floating)
            .iter()
            .all(|p| p.size > 39.0 && p.size <= 40.0));
    }

    #[test]
    fn test_reset_keeps_static_layers() {
        let mut engine = EffectEngine::with_seed(10);
        for _ in 0..20 {
            engine.update(BEAT, &params(1.0, 1.0), 1.0 / 60.0);
        }
        engine.reset();
        assert!(engine.particles(EffectKind::Snow).is_empty());
        assert_eq!(engine.particles(EffectKind::Starfield).len(), 100);
    }

    #[test]
    fn test_draw_with_everything_disabled_is_a_noop() {
        let mut engine = EffectEngine::with_seed(11);
        engine.resize(64.0, 36.0);
        for _ in 0..30 {
            engine.update(BEAT, &params(1.0, 1.0), 1.0 / 60.0);
        }
        let mut canvas = Canvas::new(64, 36).unwrap();
        engine.draw(&mut canvas, &EffectToggles::default());
        assert!(canvas.drawn_bounds().is_none());
        assert_eq!(canvas.save_depth(), 0);
    }
}
