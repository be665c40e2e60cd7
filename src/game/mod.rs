//! Game module
//!
//! Simulation and presentation for the shooter:
//! - `world` owns the map, actors and run counters and runs the tick
//! - `player`, `enemy`, `projectile`, `pickup` are the per-actor systems
//! - `event` is the queue the simulation writes and the HUD drains
//! - `renderer` and `sprites` turn a `World` into pixels
//! - `runtime` wraps the world in the title/intro/play/end screen flow

pub mod config;
pub mod enemy;
pub mod event;
pub mod particles;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod renderer;
pub mod runtime;
pub mod sprites;
pub mod world;

pub use config::GameConfig;
pub use event::{EventQueue, GameEvent};
pub use renderer::Renderer;
pub use runtime::{FpsLimit, FrameTimings, GameSession, Screen};
pub use sprites::ArtAssets;
pub use world::World;
