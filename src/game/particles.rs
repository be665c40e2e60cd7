//! Particle System
//!
//! Cosmetic explosion debris with a hard global cap. Spawn requests beyond
//! the cap are dropped rather than evicting live particles.

use rand::Rng;
use std::f32::consts::TAU;

use crate::rasterizer::{Color, Vec2};

/// Maximum number of live particles
pub const MAX_PARTICLES: usize = 80;

/// Default burst colour for explosions
pub const EXPLOSION_ORANGE: Color = Color::new(255, 140, 30);

/// A single particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Map-plane position
    pub position: Vec2,
    /// Height above the floor
    pub z: f32,
    /// Map-plane velocity (units per second)
    pub velocity: Vec2,
    pub vz: f32,
    /// Remaining life in seconds
    pub life: f32,
    /// Total lifetime (for fading)
    pub max_life: f32,
    pub color: Color,
    /// World-space radius
    pub size: f32,
    /// Downward acceleration on `z`
    pub gravity: f32,
}

impl Particle {
    /// Opacity used by the renderer
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0) * 0.8
    }
}

/// Owns every live particle
#[derive(Debug, Clone, Default)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self { particles: Vec::with_capacity(MAX_PARTICLES) }
    }

    /// Free slots under the cap
    pub fn headroom(&self) -> usize {
        MAX_PARTICLES.saturating_sub(self.particles.len())
    }

    /// Add one particle; false when the pool is full
    pub fn spawn(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= MAX_PARTICLES {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Radial burst of debris. Returns how many particles were actually spawned.
    pub fn spawn_explosion<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Vec2,
        color: Color,
        requested: usize,
    ) -> usize {
        let count = requested.min(self.headroom());
        for i in 0..count {
            let ang = (i as f32 / count as f32) * TAU + rng.gen_range(0.0..0.3);
            let speed = rng.gen_range(3.0..9.0);
            let life = rng.gen_range(20.0..35.0) / 60.0;
            let jitter = Vec2::new(rng.gen_range(-0.15..0.15), rng.gen_range(-0.15..0.15));
            self.particles.push(Particle {
                position: origin + jitter,
                z: 0.5,
                velocity: Vec2::from_angle(ang) * speed,
                vz: rng.gen_range(0.5..2.5),
                life,
                max_life: 35.0 / 60.0,
                color,
                size: 0.07,
                gravity: 7.2,
            });
        }
        count
    }

    /// Age, integrate and expire particles
    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.life -= dt;
            p.position += p.velocity * dt;
            p.vz -= p.gravity * dt;
            p.z += p.vz * dt;
            if p.z < 0.0 {
                p.z = 0.0;
                p.vz = 0.0;
                p.velocity = p.velocity * 0.5;
            }
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn all(&self) -> &[Particle] {
        &self.particles
    }

    pub fn alive_count(&self) -> usize {
        self.particles.len()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
