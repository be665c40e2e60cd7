//! Game Runtime
//!
//! Screen flow (title, level intro, play, game over, victory) around the
//! simulation world, plus frame pacing and profiling helpers.

use serde::{Deserialize, Serialize};

use crate::input::Intents;
use crate::world::{LevelDef, LevelError};
use super::config::GameConfig;
use super::event::GameEvent;
use super::world::{TickOutcome, World};

/// Longest simulated step; slower frames run the game in slow motion
pub const MAX_DT: f32 = 0.05;
/// Seconds the level card stays up before play starts on its own
pub const LEVEL_INTRO_TIME: f32 = 2.5;

/// Frame timing data for performance profiling
#[derive(Debug, Clone, Default)]
pub struct FrameTimings {
    /// Input polling time (ms)
    pub input_ms: f32,
    /// Simulation tick time (ms)
    pub logic_ms: f32,
    /// Software render time (ms)
    pub render_ms: f32,
    /// Framebuffer to texture upload and draw (ms)
    pub upload_ms: f32,
    /// HUD drawing time (ms)
    pub ui_ms: f32,
    /// Total frame time (ms)
    pub total_ms: f32,
}

impl FrameTimings {
    /// Start timing a phase (returns time in seconds from macroquad)
    pub fn start() -> f64 {
        macroquad::prelude::get_time()
    }

    /// Get elapsed time in ms since start
    pub fn elapsed_ms(start: f64) -> f32 {
        ((macroquad::prelude::get_time() - start) * 1000.0) as f32
    }
}

/// FPS limit setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FpsLimit {
    Fps30,
    #[default]
    Fps60,
    /// As fast as possible
    Unlocked,
}

impl FpsLimit {
    /// Get the target frame time in seconds (None = unlocked)
    pub fn frame_time(&self) -> Option<f64> {
        match self {
            FpsLimit::Fps30 => Some(1.0 / 30.0),
            FpsLimit::Fps60 => Some(1.0 / 60.0),
            FpsLimit::Unlocked => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            FpsLimit::Fps30 => FpsLimit::Fps60,
            FpsLimit::Fps60 => FpsLimit::Unlocked,
            FpsLimit::Unlocked => FpsLimit::Fps30,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FpsLimit::Fps30 => "30",
            FpsLimit::Fps60 => "60",
            FpsLimit::Unlocked => "Unlocked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Title,
    /// Level card; counts down to play
    LevelIntro { remaining: f32 },
    Playing,
    GameOver,
    Victory,
}

/// The whole game: config, level list, world and screen state
pub struct GameSession {
    pub config: GameConfig,
    pub levels: Vec<LevelDef>,
    pub world: World,
    pub screen: Screen,
    pub fps_limit: FpsLimit,
    pub show_debug: bool,
    pub timings: FrameTimings,
}

impl GameSession {
    pub fn new(config: GameConfig, levels: Vec<LevelDef>, seed: u64) -> Result<Self, LevelError> {
        let first = levels
            .first()
            .cloned()
            .ok_or_else(|| LevelError::ValidationError("no levels to play".to_string()))?;
        let world = World::new(first, &config, seed);
        Ok(Self {
            fps_limit: config.fps_limit,
            show_debug: config.show_debug,
            config,
            levels,
            world,
            screen: Screen::Title,
            timings: FrameTimings::default(),
        })
    }

    pub fn level_index(&self) -> usize {
        self.world.stats.level_index
    }

    /// New run from the first level
    pub fn start_game(&mut self) {
        log::info!("starting new run");
        self.world.reset_run(&self.config);
        self.enter_level(0);
    }

    fn enter_level(&mut self, index: usize) {
        let Some(level) = self.levels.get(index).cloned() else {
            self.win();
            return;
        };
        log::info!("entering level {} \"{}\"", index + 1, level.name);
        self.world.load_level(index, level);
        self.screen = Screen::LevelIntro { remaining: LEVEL_INTRO_TIME };
    }

    fn win(&mut self) {
        log::info!("run won with {} points", self.world.player.score);
        self.world.events.send(GameEvent::Win {
            score: self.world.player.score,
            kills: self.world.stats.kills,
        });
        self.screen = Screen::Victory;
    }

    fn game_over(&mut self) {
        log::info!("player died on level {}", self.level_index() + 1);
        self.world.events.send(GameEvent::GameOver {
            score: self.world.player.score,
            kills: self.world.stats.kills,
        });
        self.screen = Screen::GameOver;
    }

    /// Advance one frame. `frame_dt` is raw wall-clock time since the last frame.
    pub fn update(&mut self, frame_dt: f32, intents: &Intents) {
        let dt = if frame_dt.is_finite() { frame_dt.clamp(0.0, MAX_DT) } else { 0.0 };

        match self.screen {
            Screen::Title => {
                if intents.confirm {
                    self.start_game();
                }
            }
            Screen::LevelIntro { remaining } => {
                let remaining = remaining - dt;
                if intents.confirm || remaining <= 0.0 {
                    self.screen = Screen::Playing;
                } else {
                    self.screen = Screen::LevelIntro { remaining };
                }
            }
            Screen::Playing => match self.world.tick(dt, intents, &self.config) {
                TickOutcome::Continue => {}
                TickOutcome::LevelComplete => {
                    let next = self.level_index() + 1;
                    self.enter_level(next);
                }
                TickOutcome::PlayerDied => self.game_over(),
                TickOutcome::BossDefeated => self.win(),
            },
            Screen::GameOver | Screen::Victory => {
                if intents.confirm {
                    self.screen = Screen::Title;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{EnemySpawn, PlayerStart};
    use crate::game::enemy::EnemyKind;

    fn level(name: &str, exit_open: bool) -> LevelDef {
        let exit = if exit_open { 9 } else { 0 };
        LevelDef {
            name: name.into(),
            blurb: String::new(),
            palette: 0,
            grid: vec![
                vec![1, 1, 1, 1, 1],
                vec![1, 0, 0, exit, 1],
                vec![1, 1, 1, 1, 1],
            ],
            player_start: PlayerStart { x: 1.5, y: 1.5, angle: 0.0 },
            enemies: Vec::new(),
            pickups: Vec::new(),
            torches: Vec::new(),
        }
    }

    fn confirm() -> Intents {
        Intents { confirm: true, ..Intents::default() }
    }

    #[test]
    fn test_no_levels_is_error() {
        assert!(GameSession::new(GameConfig::default(), Vec::new(), 1).is_err());
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut session = GameSession::new(GameConfig::default(), vec![level("A", false)], 1).unwrap();
        session.update(0.0, &confirm());
        session.update(0.0, &confirm());
        assert_eq!(session.screen, Screen::Playing);
        session.update(10.0, &Intents::default());
        assert!((session.world.time - MAX_DT).abs() < 1e-6);
        session.update(f32::NAN, &Intents::default());
        assert!((session.world.time - MAX_DT).abs() < 1e-6);
    }

    #[test]
    fn test_intro_times_out() {
        let mut session = GameSession::new(GameConfig::default(), vec![level("A", false)], 1).unwrap();
        session.update(0.016, &confirm());
        assert!(matches!(session.screen, Screen::LevelIntro { .. }));
        for _ in 0..60 {
            session.update(MAX_DT, &Intents::default());
        }
        assert_eq!(session.screen, Screen::Playing);
    }

    #[test]
    fn test_exit_advances_then_wins() {
        let levels = vec![level("A", true), level("B", true)];
        let mut session = GameSession::new(GameConfig::default(), levels, 1).unwrap();
        session.update(0.016, &confirm());
        session.update(0.016, &confirm());

        let walk = Intents { forward: true, ..Intents::default() };
        session.world.player.has_key = true;
        for _ in 0..60 {
            session.update(1.0 / 60.0, &walk);
        }
        assert_eq!(session.level_index(), 1);
        assert!(matches!(session.screen, Screen::LevelIntro { .. }));

        session.update(0.016, &confirm());
        session.world.player.has_key = true;
        for _ in 0..60 {
            session.update(1.0 / 60.0, &walk);
        }
        assert_eq!(session.screen, Screen::Victory);
        assert!(session.world.events.iter().any(|e| matches!(e, GameEvent::Win { .. })));
    }

    #[test]
    fn test_death_then_restart() {
        let mut session = GameSession::new(GameConfig::default(), vec![level("A", false)], 1).unwrap();
        session.update(0.016, &confirm());
        session.update(0.016, &confirm());
        session.world.player.hp = 0.0;
        session.update(0.016, &Intents::default());
        assert_eq!(session.screen, Screen::GameOver);

        session.update(0.016, &confirm());
        assert_eq!(session.screen, Screen::Title);
        session.update(0.016, &confirm());
        assert_eq!(session.world.player.hp, 100.0);
        assert_eq!(session.world.stats.kills, 0);
    }

    #[test]
    fn test_boss_kill_wins() {
        let mut boss_level = level("Boss", false);
        boss_level.enemies.push(EnemySpawn { kind: EnemyKind::Boss, x: 3.5, y: 1.5 });
        let mut session = GameSession::new(GameConfig::default(), vec![boss_level], 1).unwrap();
        session.update(0.016, &confirm());
        session.update(0.016, &confirm());
        session.world.stats.boss_defeated = true;
        session.update(0.016, &Intents::default());
        assert_eq!(session.screen, Screen::Victory);
    }

    #[test]
    fn test_fps_limit_cycle() {
        assert_eq!(FpsLimit::Fps30.next(), FpsLimit::Fps60);
        assert_eq!(FpsLimit::Unlocked.next(), FpsLimit::Fps30);
        assert_eq!(FpsLimit::Unlocked.frame_time(), None);
    }
}
