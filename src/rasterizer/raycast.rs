//! DDA grid raycasting
//!
//! Walks a ray cell by cell through a tile grid until it reaches a cell that
//! stops rays, and reports the fish-eye corrected distance to it.

use super::math::Vec2;

/// Grid the raycaster can walk
pub trait RayGrid {
    /// Tile code of the cell if it stops a ray, `None` if rays pass through.
    /// Out-of-bounds cells must stop rays.
    fn ray_stop(&self, x: i32, y: i32) -> Option<u8>;
}

/// Which family of grid lines the ray crossed last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Crossed a vertical grid line (east/west face)
    X,
    /// Crossed a horizontal grid line (north/south face), drawn darker
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Perpendicular distance to the wall, floored at 0.1
    pub perp_dist: f32,
    pub side: Side,
    pub map_x: i32,
    pub map_y: i32,
    /// Tile code of the hit cell
    pub cell: u8,
    /// Fractional position along the wall face, 0..1
    pub wall_x: f32,
}

/// Substitute for a zero direction component
const DIR_EPSILON: f32 = 0.00001;

/// Cast one ray. Gives up after `2 * max_depth` steps and returns `None`.
pub fn cast_ray<G: RayGrid + ?Sized>(grid: &G, origin: Vec2, angle: f32, max_depth: f32) -> Option<RayHit> {
    let cos_r = angle.cos();
    let sin_r = angle.sin();
    let dir_x = if cos_r == 0.0 { DIR_EPSILON } else { cos_r };
    let dir_y = if sin_r == 0.0 { DIR_EPSILON } else { sin_r };

    let mut map_x = origin.x.floor() as i32;
    let mut map_y = origin.y.floor() as i32;
    let delta_x = (1.0 / dir_x).abs();
    let delta_y = (1.0 / dir_y).abs();

    let (step_x, mut side_x) = if dir_x < 0.0 {
        (-1, (origin.x - map_x as f32) * delta_x)
    } else {
        (1, (map_x as f32 + 1.0 - origin.x) * delta_x)
    };
    let (step_y, mut side_y) = if dir_y < 0.0 {
        (-1, (origin.y - map_y as f32) * delta_y)
    } else {
        (1, (map_y as f32 + 1.0 - origin.y) * delta_y)
    };

    let max_steps = (max_depth * 2.0).max(0.0) as usize;
    for _ in 0..max_steps {
        let side = if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            Side::X
        } else {
            side_y += delta_y;
            map_y += step_y;
            Side::Y
        };

        if let Some(cell) = grid.ray_stop(map_x, map_y) {
            let raw = match side {
                Side::X => side_x - delta_x,
                Side::Y => side_y - delta_y,
            };
            let perp_dist = raw.max(0.1);
            let along = match side {
                Side::X => origin.y + perp_dist * sin_r,
                Side::Y => origin.x + perp_dist * cos_r,
            };
            return Some(RayHit {
                perp_dist,
                side,
                map_x,
                map_y,
                cell,
                wall_x: along - along.floor(),
            });
        }
    }

    None
}

/// Per-column wall depths, used to occlude sprites
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    cols: Vec<f32>,
    far: f32,
}

impl DepthBuffer {
    pub fn new(width: usize, far: f32) -> Self {
        Self { cols: vec![far; width], far }
    }

    pub fn width(&self) -> usize {
        self.cols.len()
    }

    pub fn reset(&mut self) {
        let far = self.far;
        self.cols.iter_mut().for_each(|d| *d = far);
    }

    pub fn set(&mut self, col: usize, depth: f32) {
        if let Some(d) = self.cols.get_mut(col) {
            *d = depth;
        }
    }

    /// Depth at a column; off-screen columns read as the far plane
    pub fn get(&self, col: i32) -> f32 {
        if col < 0 {
            return self.far;
        }
        self.cols.get(col as usize).copied().unwrap_or(self.far)
    }

    /// True when something at `dist` is visible in `col` given a tolerance
    pub fn visible(&self, col: i32, dist: f32, tolerance: f32) -> bool {
        dist <= self.get(col) + tolerance
    }
}
