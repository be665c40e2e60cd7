//! Rasterizer constants
//!
//! Logical resolution and view constants shared by the raycaster and the
//! sprite compositor.

use std::f32::consts::PI;

/// Logical framebuffer width
pub const WIDTH: usize = 320;

/// Logical framebuffer height
pub const HEIGHT: usize = 240;

/// Horizontal field of view (60 degrees)
pub const FOV: f32 = PI / 3.0;

/// Half of the field of view, used for ray spread and sprite culling
pub const HALF_FOV: f32 = FOV / 2.0;

/// Farthest distance the raycaster resolves; also the "void" depth
pub const MAX_DEPTH: f32 = 20.0;

/// Wall texture edge length in texels
pub const TEXTURE_SIZE: usize = 64;
