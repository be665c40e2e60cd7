//! DECAF RISING: a software-rendered raycasting shooter
//!
//! Grid levels drawn column by column into a 320x240 framebuffer:
//! - DDA walls with torch flicker and side shading
//! - Depth-tested billboard enemies, pickups and projectiles
//! - Particle explosions and screen shake
//! - Three levels ending in a boss fight

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod game;
mod hud;
mod input;
mod rasterizer;
mod world;

use macroquad::prelude::*;

use game::{ArtAssets, FrameTimings, GameConfig, GameSession, Renderer};
use hud::Hud;
use input::InputState;
use world::{LevelDef, LevelError};

/// Default config location, overridden by `DECAF_CONFIG`
const CONFIG_PATH: &str = "assets/config.ron";

fn window_conf() -> Conf {
    Conf {
        window_title: format!("DECAF RISING v{}", VERSION),
        window_width: 960,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        #[cfg(not(target_arch = "wasm32"))]
        fullscreen: false,
        ..Default::default()
    }
}

fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_timestamp_secs()
            .try_init();
    }
}

async fn load_config() -> GameConfig {
    #[cfg(not(target_arch = "wasm32"))]
    let path = std::env::var("DECAF_CONFIG").unwrap_or_else(|_| CONFIG_PATH.to_string());
    #[cfg(target_arch = "wasm32")]
    let path = CONFIG_PATH.to_string();

    let text = match load_string(&path).await {
        Ok(text) => {
            log::info!("loaded config from {}", path);
            Some(text)
        }
        Err(e) => {
            log::debug!("no config at {}: {}", path, e);
            None
        }
    };
    GameConfig::from_ron_or_default(text.as_deref())
}

fn load_levels(config: &GameConfig) -> Result<Vec<LevelDef>, LevelError> {
    #[cfg(not(target_arch = "wasm32"))]
    if let Some(dir) = &config.levels_dir {
        log::info!("loading levels from {}", dir);
        return world::load_level_dir(dir);
    }
    #[cfg(target_arch = "wasm32")]
    if config.levels_dir.is_some() {
        log::warn!("levels_dir is ignored on the web, using built-in levels");
    }
    world::builtin_levels()
}

/// Replace procedural art with any PNGs found next to the game
async fn load_art_overrides(art: &mut ArtAssets) {
    for path in ArtAssets::override_paths() {
        let Ok(bytes) = load_file(&path).await else { continue };
        match art.apply_png(&path, &bytes) {
            Ok(()) => log::info!("loaded {}", path),
            Err(e) => log::warn!("keeping procedural art for {}: {}", path, e),
        }
    }
}

/// Sleep/spin until the frame has used its time budget
fn limit_frame(frame_start: f64, target_frame_time: f64) {
    if get_time() - frame_start >= target_frame_time {
        return;
    }
    // Native: sleep for the bulk, then spin for precision
    #[cfg(not(target_arch = "wasm32"))]
    {
        let spin_margin = 0.002;
        while get_time() - frame_start + spin_margin < target_frame_time {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        while get_time() - frame_start < target_frame_time {
            std::hint::spin_loop();
        }
    }
    // WASM: no thread::sleep, the browser paces frames anyway
    #[cfg(target_arch = "wasm32")]
    {
        while get_time() - frame_start < target_frame_time {
            std::hint::spin_loop();
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Crash logging first
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);
    init_logging();

    let config = load_config().await;
    let levels = match load_levels(&config) {
        Ok(levels) => levels,
        Err(e) => {
            log::error!("cannot load levels: {}", e);
            return;
        }
    };
    let seed = config
        .seed
        .unwrap_or_else(|| (macroquad::miniquad::date::now() * 1000.0) as u64);
    log::info!("{} levels, seed {}", levels.len(), seed);

    let mut art = ArtAssets::procedural(seed);
    load_art_overrides(&mut art).await;

    let mut session = match GameSession::new(config, levels, seed) {
        Ok(session) => session,
        Err(e) => {
            log::error!("cannot start: {}", e);
            return;
        }
    };
    let mut renderer = Renderer::new(art);
    let mut input = InputState::new();
    let mut hud = Hud::new();

    log::info!("=== DECAF RISING v{} ===", VERSION);

    loop {
        let frame_start = get_time();
        let frame_dt = get_frame_time();

        let t = FrameTimings::start();
        let intents = input.poll();
        if input.toggle_debug {
            session.show_debug = !session.show_debug;
        }
        if input.cycle_fps {
            session.fps_limit = session.fps_limit.next();
            log::info!("fps limit {}", session.fps_limit.label());
        }
        session.timings.input_ms = FrameTimings::elapsed_ms(t);

        let t = FrameTimings::start();
        session.update(frame_dt, &intents);
        hud.absorb(&mut session.world.events);
        hud.update(frame_dt);
        session.timings.logic_ms = FrameTimings::elapsed_ms(t);

        let t = FrameTimings::start();
        renderer.render(&session.world, &session.config);
        session.timings.render_ms = FrameTimings::elapsed_ms(t);

        let t = FrameTimings::start();
        let view = renderer.present();
        session.timings.upload_ms = FrameTimings::elapsed_ms(t);

        let t = FrameTimings::start();
        hud.draw(&session, view);
        session.timings.ui_ms = FrameTimings::elapsed_ms(t);
        session.timings.total_ms = FrameTimings::elapsed_ms(frame_start);

        if let Some(target_frame_time) = session.fps_limit.frame_time() {
            limit_frame(frame_start, target_frame_time);
        }

        next_frame().await;
    }
}
