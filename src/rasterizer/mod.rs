//! Software raycasting rasterizer
//!
//! Features:
//! - DDA grid raycasting with fish-eye corrected distances
//! - Per-column depth buffer for billboard occlusion
//! - RGBA software framebuffer with alpha blending
//!
//! # Module Organization
//!
//! - `types` - Color, Texture
//! - `math` - Vec2, angle helpers, easing, noise, billboard projection
//! - `raycast` - DDA ray walk and the column depth buffer
//! - `render` - Framebuffer and drawing primitives
//! - `constants` - Resolution and view constants

pub mod constants;
pub mod math;
pub mod raycast;
pub mod render;
pub mod types;

pub use constants::{FOV, HALF_FOV, HEIGHT, MAX_DEPTH, TEXTURE_SIZE, WIDTH};
pub use math::{clamp, ease_in_quad, ease_out_bounce, ease_out_quad, project, NoiseTable, Projection, Vec2};
pub use raycast::{cast_ray, DepthBuffer, RayGrid, RayHit, Side};
pub use render::Framebuffer;
pub use types::{Color, Texture};
