//! Simulation world
//!
//! Owns everything that changes during play and runs the per-frame tick in
//! a fixed order: doors, player, enemies, projectiles, pickups, exit check.
//! Systems reach shared state through a `SimContext` built for the tick.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::input::Intents;
use crate::rasterizer::Vec2;
use crate::world::{LevelDef, TileMap};
use super::config::GameConfig;
use super::enemy::{update_enemies, Enemy};
use super::event::{EventQueue, GameEvent};
use super::pickup::{update_pickups, Pickup};
use super::player::Player;
use super::projectile::ProjectileSystem;

/// Per-run counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub kills: u32,
    pub level_index: usize,
    pub boss_defeated: bool,
}

/// Shared state handed to every system during a tick
pub struct SimContext<'a> {
    pub map: &'a mut TileMap,
    pub pickups: &'a mut Vec<Pickup>,
    pub events: &'a mut EventQueue<GameEvent>,
    pub rng: &'a mut StdRng,
    pub config: &'a GameConfig,
    pub stats: &'a mut RunStats,
}

/// What the tick means for the screen flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    LevelComplete,
    PlayerDied,
    BossDefeated,
}

pub struct World {
    pub level: LevelDef,
    pub map: TileMap,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: ProjectileSystem,
    pub pickups: Vec<Pickup>,
    pub events: EventQueue<GameEvent>,
    pub rng: StdRng,
    pub stats: RunStats,
    /// Seconds of play on this level
    pub time: f32,
    exit_warned: bool,
}

impl World {
    pub fn new(level: LevelDef, config: &GameConfig, seed: u64) -> Self {
        let map = level.build_map();
        let mut world = Self {
            level,
            map,
            player: Player::new(config),
            enemies: Vec::new(),
            projectiles: ProjectileSystem::new(),
            pickups: Vec::new(),
            events: EventQueue::new(),
            rng: StdRng::seed_from_u64(seed),
            stats: RunStats::default(),
            time: 0.0,
            exit_warned: false,
        };
        world.spawn_level();
        world
    }

    /// Fresh player and counters, keeping the rng stream
    pub fn reset_run(&mut self, config: &GameConfig) {
        self.player = Player::new(config);
        self.stats = RunStats::default();
    }

    /// Swap in a new level. The player's run state carries over.
    pub fn load_level(&mut self, index: usize, level: LevelDef) {
        self.stats.level_index = index;
        self.map = level.build_map();
        self.level = level;
        self.spawn_level();
        self.events.send(GameEvent::LevelStarted { index, name: self.level.name.clone() });
    }

    fn spawn_level(&mut self) {
        self.enemies = self
            .level
            .enemies
            .iter()
            .map(|s| Enemy::new(s.kind, Vec2::new(s.x, s.y)))
            .collect();
        self.pickups = self
            .level
            .pickups
            .iter()
            .map(|s| Pickup::new(s.kind, Vec2::new(s.x, s.y)))
            .collect();
        self.projectiles.reset();
        self.player.place(&self.level.player_start);
        self.time = 0.0;
        self.exit_warned = false;
        self.stats.boss_defeated = false;
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }

    /// Advance the simulation by `dt` seconds
    pub fn tick(&mut self, dt: f32, intents: &Intents, config: &GameConfig) -> TickOutcome {
        self.time += dt;
        self.map.update(dt);

        let mut ctx = SimContext {
            map: &mut self.map,
            pickups: &mut self.pickups,
            events: &mut self.events,
            rng: &mut self.rng,
            config,
            stats: &mut self.stats,
        };

        self.player.update(dt, intents, &mut self.projectiles, &mut ctx);
        update_enemies(&mut self.enemies, dt, &mut self.player, &mut self.projectiles, &mut ctx);
        self.projectiles.update(dt, &mut self.enemies, &mut self.player, &mut ctx);
        update_pickups(ctx.pickups, dt, &mut self.player, config, ctx.events);

        if self.player.is_dead() {
            return TickOutcome::PlayerDied;
        }
        if self.stats.boss_defeated {
            return TickOutcome::BossDefeated;
        }
        self.check_exit()
    }

    fn check_exit(&mut self) -> TickOutcome {
        let (cx, cy) = self.player.position.cell();
        if !self.map.is_exit(cx, cy) {
            self.exit_warned = false;
            return TickOutcome::Continue;
        }
        if self.player.has_key {
            self.events.send(GameEvent::ExitReached);
            return TickOutcome::LevelComplete;
        }
        if !self.exit_warned {
            self.exit_warned = true;
            self.events.send(GameEvent::ExitLocked);
        }
        TickOutcome::Continue
    }
}

/// Owned state for building a `SimContext` in unit tests
#[cfg(test)]
pub(crate) struct TestBed {
    pub map: TileMap,
    pub pickups: Vec<Pickup>,
    pub events: EventQueue<GameEvent>,
    pub rng: StdRng,
    pub config: GameConfig,
    pub stats: RunStats,
    pub player: Player,
}

#[cfg(test)]
impl TestBed {
    pub fn new(grid: &[Vec<u8>]) -> Self {
        let config = GameConfig::default();
        Self {
            map: TileMap::new(grid),
            pickups: Vec::new(),
            events: EventQueue::new(),
            rng: StdRng::seed_from_u64(7),
            player: Player::new(&config),
            config,
            stats: RunStats::default(),
        }
    }

    pub fn with_ctx<R>(&mut self, f: impl FnOnce(&mut Player, &mut SimContext) -> R) -> R {
        let mut ctx = SimContext {
            map: &mut self.map,
            pickups: &mut self.pickups,
            events: &mut self.events,
            rng: &mut self.rng,
            config: &self.config,
            stats: &mut self.stats,
        };
        f(&mut self.player, &mut ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::enemy::EnemyKind;
    use crate::game::pickup::PickupKind;
    use crate::world::{load_level_from_str, EnemySpawn, PickupSpawn, PlayerStart};

    const DT: f32 = 1.0 / 60.0;

    fn level(enemies: Vec<EnemySpawn>, pickups: Vec<PickupSpawn>) -> LevelDef {
        LevelDef {
            name: "Test".into(),
            blurb: String::new(),
            palette: 0,
            grid: vec![
                vec![1, 1, 1, 1, 1, 1, 1],
                vec![1, 0, 0, 0, 0, 9, 1],
                vec![1, 0, 0, 0, 0, 0, 1],
                vec![1, 1, 1, 1, 1, 1, 1],
            ],
            player_start: PlayerStart { x: 1.5, y: 1.5, angle: 0.0 },
            enemies,
            pickups,
            torches: Vec::new(),
        }
    }

    #[test]
    fn test_spawns_from_level() {
        let config = GameConfig::default();
        let world = World::new(
            level(
                vec![EnemySpawn { kind: EnemyKind::Roller, x: 4.5, y: 2.5 }],
                vec![PickupSpawn { kind: PickupKind::Key, x: 2.5, y: 2.5 }],
            ),
            &config,
            1,
        );
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.pickups.len(), 1);
        assert_eq!(world.player.position, Vec2::new(1.5, 1.5));
    }

    #[test]
    fn test_exit_needs_key() {
        let config = GameConfig::default();
        let mut world = World::new(level(Vec::new(), Vec::new()), &config, 1);
        let forward = Intents { forward: true, ..Intents::default() };

        let mut outcome = TickOutcome::Continue;
        for _ in 0..120 {
            outcome = world.tick(DT, &forward, &config);
        }
        assert_eq!(outcome, TickOutcome::Continue);
        let warnings = world.events.iter().filter(|e| **e == GameEvent::ExitLocked).count();
        assert_eq!(warnings, 1);

        world.player.has_key = true;
        assert_eq!(world.tick(DT, &forward, &config), TickOutcome::LevelComplete);
    }

    #[test]
    fn test_player_death_outcome() {
        let config = GameConfig::default();
        let mut world = World::new(level(Vec::new(), Vec::new()), &config, 1);
        world.player.hp = 5.0;
        world.player.take_damage(10.0, &config, &mut world.events);
        assert_eq!(world.tick(DT, &Intents::default(), &config), TickOutcome::PlayerDied);
    }

    #[test]
    fn test_load_level_keeps_run_state() {
        let config = GameConfig::default();
        let mut world = World::new(level(Vec::new(), Vec::new()), &config, 1);
        world.player.score = 900;
        world.player.has_key = true;
        let next = load_level_from_str(
            "(name: \"Two\", blurb: \"\", palette: 1, grid: [[1,1,1],[1,0,1],[1,1,1]], \
             player_start: (x: 1.5, y: 1.5, angle: 0.0), enemies: [], pickups: [], torches: [])",
        )
        .unwrap();
        world.load_level(1, next);
        assert_eq!(world.player.score, 900);
        assert!(!world.player.has_key);
        assert_eq!(world.stats.level_index, 1);
        assert!(world.events.iter().any(|e| matches!(e, GameEvent::LevelStarted { index: 1, .. })));
    }
}
