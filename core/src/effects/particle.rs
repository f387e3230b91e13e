//! Particle record and population bookkeeping.

use serde::{Deserialize, Serialize};

use crate::render::Rgba;

/// One simulated particle.
///
/// `life` is interpreted per kind: a length for rain, a tick counter for
/// droplets, a phase for fireflies and remaining life for fireworks.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub alpha: f32,
    pub life: f32,
    pub max_life: Option<f32>,
    pub color: Option<Rgba>,
}

impl Particle {
    pub(crate) fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size: 1.0,
            alpha: 1.0,
            life: 0.0,
            max_life: None,
            color: None,
        }
    }
}

/// The eight simulated effect kinds, in back-to-front draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    Fog,
    Starfield,
    Fireflies,
    Floating,
    Fireworks,
    Snow,
    Rain,
    Droplets,
}

impl EffectKind {
    pub fn all() -> &'static [Self] {
        &[
            Self::Fog,
            Self::Starfield,
            Self::Fireflies,
            Self::Floating,
            Self::Fireworks,
            Self::Snow,
            Self::Rain,
            Self::Droplets,
        ]
    }

    /// Kinds whose population follows `base * intensity`.
    pub fn scales_with_intensity(&self) -> bool {
        matches!(self, Self::Snow | Self::Rain | Self::Floating | Self::Fireflies)
    }
}

/// Population target for `base * intensity`, never above the product.
pub fn population_target(base: f32, intensity: f32) -> usize {
    (base * intensity).floor().max(0.0) as usize
}

/// Grow by one particle when below `target`, trim the oldest when above.
pub(crate) fn sustain(pop: &mut Vec<Particle>, target: usize, spawn: impl FnOnce() -> Particle) {
    if pop.len() < target {
        pop.push(spawn());
    }
    if pop.len() > target {
        let excess = pop.len() - target;
        pop.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_target_floors() {
        assert_eq!(population_target(150.0, 1.0), 150);
        assert_eq!(population_target(150.0, 0.33), 49);
        assert_eq!(population_target(30.0, 0.0), 0);
        assert_eq!(population_target(30.0, -1.0), 0);
    }

    #[test]
    fn test_sustain_trims_oldest_first() {
        let mut pop: Vec<Particle> = (0..5).map(|i| Particle::at(i as f32, 0.0)).collect();
        sustain(&mut pop, 3, || Particle::at(99.0, 0.0));
        assert_eq!(pop.iter().map(|p| p.x).collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);

        sustain(&mut pop, 4, || Particle::at(99.0, 0.0));
        assert_eq!(pop.len(), 4);
        assert_eq!(pop[3].x, 99.0);
    }
}
