//! Kernel-side particle field.
//!
//! The kernel only records particle data — position, motion, lifetime,
//! colour — and advances it each tick; drawing is the renderer's business.
//! Burst shapes are tuned per event (weapon impacts, shield crossings,
//! explosions, turbo wash, missile smoke) and their scatter comes from the
//! match RNG, so particle state is as reproducible as everything else.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use warbots_mask::Color;

use warbots_core::constants::CALCS_PER_SEC;
use warbots_core::enums::WeaponKind;
use warbots_core::types::heading_vec;

/// One particle. `ttl` counts down in seconds; renderers typically fade the
/// colour toward the background by `ttl / initial_ttl`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Particle {
    pub pos: DVec2,
    /// Travel heading in degrees.
    pub heading: f64,
    /// Speed in cm/s.
    pub speed: f64,
    /// Remaining lifetime in seconds.
    pub ttl: f64,
    pub initial_ttl: f64,
    pub color: Color,
}

/// The particle collection. When disabled, bursts are dropped at the source
/// so a headless match does no particle work at all.
#[derive(Debug, Clone)]
pub struct ParticleField {
    enabled: bool,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            particles: Vec::new(),
        }
    }

    pub fn all(&self) -> &[Particle] {
        &self.particles
    }

    /// Advance every particle one tick and retire the expired ones.
    pub fn advance(&mut self) {
        let dt = 1.0 / CALCS_PER_SEC as f64;
        self.particles.retain_mut(|p| {
            if p.ttl < 0.0 {
                return false;
            }
            p.pos += (p.speed * dt) * heading_vec(p.heading);
            p.ttl -= dt;
            true
        });
    }

    fn push(&mut self, pos: DVec2, color: Color, heading: f64, speed: f64, ttl: f64) {
        self.particles.push(Particle {
            pos,
            heading,
            speed,
            ttl,
            initial_ttl: ttl,
            color,
        });
    }

    /// Impact burst for a weapon hitting a robot or the wall.
    pub(crate) fn weapon_burst(&mut self, kind: WeaponKind, pos: DVec2, rng: &mut ChaCha8Rng) {
        if !self.enabled {
            return;
        }
        match kind {
            WeaponKind::Laser => {
                for _ in 0..600 {
                    let color = Color::rgb(
                        156 + rng.gen_range(0..100),
                        rng.gen_range(0..30),
                        rng.gen_range(0..30),
                    );
                    let heading = rng.gen::<f64>() * 360.0;
                    let speed = 5.0 + rng.gen::<f64>() * 60.0;
                    self.push(pos, color, heading, speed, 0.25);
                }
            }
            WeaponKind::Missile => {
                for _ in 0..1500 {
                    let color = Color::rgb(
                        156 + rng.gen_range(0..100),
                        rng.gen_range(0..30),
                        rng.gen_range(0..30),
                    );
                    let heading = rng.gen::<f64>() * 360.0;
                    let speed = rng.gen::<f64>() * 40.0;
                    self.push(pos, color, heading, speed, 2.0);
                }
            }
        }
    }

    /// Spray at the midpoint of two crossing shields.
    pub(crate) fn shield_cross_burst(&mut self, pos: DVec2, rng: &mut ChaCha8Rng) {
        if !self.enabled {
            return;
        }
        for _ in 0..1000 {
            let color = Color::rgb(rng.gen(), rng.gen(), rng.gen());
            let heading = rng.gen::<f64>() * 360.0;
            let speed = rng.gen::<f64>() * 40.0;
            self.push(pos, color, heading, speed, 1.5);
        }
    }

    /// The big one: a robot's generator letting go.
    pub(crate) fn explosion_burst(&mut self, pos: DVec2, rng: &mut ChaCha8Rng) {
        if !self.enabled {
            return;
        }
        for _ in 0..5000 {
            let color = Color::rgb(rng.gen(), rng.gen(), rng.gen());
            let heading = rng.gen::<f64>() * 360.0;
            let speed = rng.gen::<f64>() * 60.0;
            self.push(pos, color, heading, speed, 5.0);
        }
    }

    /// Exhaust wash emitted each tick while a turbo boost burns.
    pub(crate) fn turbo_wash(&mut self, pos: DVec2, rng: &mut ChaCha8Rng) {
        if !self.enabled {
            return;
        }
        for _ in 0..5 {
            let heading = rng.gen::<f64>() * 360.0;
            let speed = rng.gen::<f64>();
            self.push(pos, Color::rgb(255, 80, 80), heading, speed, 4.0);
        }
    }

    /// Smoke trail emitted behind a missile in flight.
    pub(crate) fn missile_smoke(&mut self, pos: DVec2, missile_heading: f64, rng: &mut ChaCha8Rng) {
        if !self.enabled {
            return;
        }
        for _ in 0..3 {
            let heading = missile_heading + 150.0 + rng.gen::<f64>() * 60.0;
            let speed = 2.0 + rng.gen::<f64>() * 3.0;
            self.push(pos, Color::rgb(200, 200, 200), heading, speed, 5.0);
        }
    }
}
