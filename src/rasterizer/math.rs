//! 2D math for the raycaster
//!
//! Vectors, angle helpers, easing curves, seeded smooth noise and the
//! world-to-screen billboard projection.

use std::f32::consts::{PI, TAU};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};

use super::constants::{HALF_FOV, HEIGHT, WIDTH};

/// 2D vector on the map plane (x right, y down the grid rows)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians)
    pub fn from_angle(angle: f32) -> Self {
        Self { x: angle.cos(), y: angle.sin() }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn len_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn len(self) -> f32 {
        self.len_sq().sqrt()
    }

    pub fn dist_sq(self, other: Vec2) -> f32 {
        (self - other).len_sq()
    }

    pub fn dist(self, other: Vec2) -> f32 {
        (self - other).len()
    }

    pub fn normalize(self) -> Vec2 {
        let l = self.len();
        if l == 0.0 {
            return Vec2::ZERO;
        }
        Vec2 { x: self.x / l, y: self.y / l }
    }

    /// Angle of this vector as returned by `atan2`
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Grid cell containing this point
    pub fn cell(self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }

    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        self + (other - self) * t
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 { x: self.x + other.x, y: self.y + other.y }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Vec2) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2 { x: self.x * s, y: self.y * s }
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2 { x: -self.x, y: -self.y }
    }
}

pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Normalise an angle into [0, 2π)
pub fn normalize_angle(a: f32) -> f32 {
    let r = a.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if r >= TAU { 0.0 } else { r }
}

/// Wrap an angle into (-π, π]
pub fn wrap_angle(a: f32) -> f32 {
    let mut r = a.rem_euclid(TAU);
    if r > PI {
        r -= TAU;
    }
    r
}

// =============================================================================
// Easing
// =============================================================================

pub fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

pub fn ease_in_quad(t: f32) -> f32 {
    t * t
}

pub fn ease_out_bounce(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

// =============================================================================
// Noise
// =============================================================================

/// 256-entry value-noise table filled from a seeded LCG.
/// Sampling is smoothstep-interpolated and wraps every 256 units.
#[derive(Debug, Clone)]
pub struct NoiseTable {
    values: [f32; 256],
}

impl NoiseTable {
    pub const DEFAULT_SEED: u32 = 12345;

    pub fn new(seed: u32) -> Self {
        let mut state = seed;
        let mut values = [0.0; 256];
        for v in values.iter_mut() {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            *v = state as f32 / u32::MAX as f32;
        }
        Self { values }
    }

    /// Smooth 1D noise in [0, 1]
    pub fn smooth(&self, x: f32) -> f32 {
        let fl = x.floor();
        let i = (fl as i64).rem_euclid(256) as usize;
        let f = x - fl;
        let u = f * f * (3.0 - 2.0 * f);
        lerp(self.values[i], self.values[(i + 1) & 255], u)
    }
}

impl Default for NoiseTable {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

// =============================================================================
// Projection
// =============================================================================

/// Screen placement of a billboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Horizontal screen centre in pixels
    pub sx: f32,
    /// Pixels per world unit at this depth (half screen height / distance)
    pub scale: f32,
    /// Euclidean distance from the viewer
    pub dist: f32,
}

/// Project a world point for a viewer at `eye` looking along `view_angle`.
///
/// Returns `None` when the point is closer than 0.1, outside the field of
/// view (plus a 0.1 rad margin), or the maths degenerates.
pub fn project(point: Vec2, eye: Vec2, view_angle: f32) -> Option<Projection> {
    project_to(point, eye, view_angle, WIDTH as f32, HEIGHT as f32)
}

pub fn project_to(point: Vec2, eye: Vec2, view_angle: f32, width: f32, height: f32) -> Option<Projection> {
    let d = point - eye;
    let dist = d.len();
    if dist < 0.1 {
        return None;
    }

    let rel = wrap_angle(d.angle() - view_angle);
    if rel.abs() > HALF_FOV + 0.1 {
        return None;
    }

    let sx = (width / 2.0) * (1.0 + rel.tan() / HALF_FOV.tan());
    let scale = (height / 2.0) / (dist * rel.cos().max(0.01));

    if !sx.is_finite() || !scale.is_finite() {
        return None;
    }

    Some(Projection { sx, scale, dist })
}
