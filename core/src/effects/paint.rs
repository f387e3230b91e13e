//! Per-kind particle painters.

use super::{EffectKind, Particle};
use crate::render::{Canvas, Fill, Rgba};

const RAIN: Rgba = Rgba::rgb8(0xaa, 0xdd, 0xff);
const FIREFLY: Rgba = Rgba::rgb8(0xcc, 0xff, 0x00);
const FOG: Rgba = Rgba::rgb8(200, 200, 200);

pub(super) fn draw_kind(canvas: &mut Canvas, kind: EffectKind, particles: &[Particle]) {
    match kind {
        EffectKind::Fog => fog(canvas, particles),
        EffectKind::Starfield | EffectKind::Floating | EffectKind::Snow => {
            white_dots(canvas, particles)
        }
        EffectKind::Fireflies => fireflies(canvas, particles),
        EffectKind::Fireworks => fireworks(canvas, particles),
        EffectKind::Rain => rain(canvas, particles),
        EffectKind::Droplets => droplets(canvas, particles),
    }
}

fn white_dots(canvas: &mut Canvas, particles: &[Particle]) {
    let white = Fill::Solid(Rgba::WHITE);
    for p in particles {
        canvas.set_alpha(p.alpha);
        canvas.fill_circle(p.x, p.y, p.size, &white);
    }
}

fn fog(canvas: &mut Canvas, particles: &[Particle]) {
    for p in particles {
        let fill = Fill::radial(
            (p.x, p.y),
            p.size,
            &[(0.0, FOG.with_alpha(p.alpha)), (1.0, FOG.with_alpha(0.0))],
        );
        canvas.set_alpha(1.0);
        canvas.fill_rect(p.x - p.size, p.y - p.size, p.size * 2.0, p.size * 2.0, &fill);
    }
}

fn fireflies(canvas: &mut Canvas, particles: &[Particle]) {
    for p in particles {
        canvas.set_alpha(p.alpha);
        canvas.glow_circle(p.x, p.y, p.size, FIREFLY, 10.0);
    }
}

fn fireworks(canvas: &mut Canvas, particles: &[Particle]) {
    for p in particles {
        canvas.set_alpha(p.life.clamp(0.0, 1.0));
        canvas.fill_circle(p.x, p.y, p.size, &Fill::Solid(p.color.unwrap_or(Rgba::WHITE)));
    }
}

/// Streaks whose length is the particle's `life`.
fn rain(canvas: &mut Canvas, particles: &[Particle]) {
    let streak = Fill::Solid(RAIN);
    for p in particles {
        canvas.set_alpha(p.alpha);
        canvas.line((p.x, p.y), (p.x, p.y + p.life), &streak, 1.0, false);
    }
}

/// Lens droplets: a faint ring plus a small highlight towards the top left.
fn droplets(canvas: &mut Canvas, particles: &[Particle]) {
    let ring = Fill::Solid(Rgba::WHITE.with_alpha(0.4));
    let shine = Fill::Solid(Rgba::WHITE.with_alpha(0.2));
    for p in particles {
        canvas.set_alpha(p.alpha);
        canvas.stroke_circle(p.x, p.y, p.size, &ring, 2.0);
        canvas.fill_circle(p.x - p.size * 0.3, p.y - p.size * 0.3, p.size * 0.2, &shine);
    }
}
