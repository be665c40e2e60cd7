//! World module - grid levels
//!
//! - Tile grid with one-way door latches
//! - Level definitions loaded from RON (plain or brotli-compressed)

mod level;
mod tilemap;

pub use level::*;
pub use tilemap::*;
