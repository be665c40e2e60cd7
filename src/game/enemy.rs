//! Enemy AI
//!
//! Each enemy runs a small state machine:
//!
//! ```text
//! Idle -> Chase -> Attack -> Chase ...
//!   any -> Hurt -> Chase | Idle
//!   any -> Death (terminal)
//! ```
//!
//! Pathing is steering only: head straight for the target and slide along
//! walls one axis at a time. The boss adds phase changes and a delayed
//! triple volley on top of the ranged behaviour.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rasterizer::Vec2;
use super::event::GameEvent;
use super::pickup::{roll_loot, Pickup};
use super::player::Player;
use super::projectile::ProjectileSystem;
use super::world::SimContext;

/// Beyond this distance enemies lose interest
pub const DETECTION_RANGE: f32 = 12.0;
/// Ranged enemies only fire inside this distance
pub const FIRE_RANGE: f32 = 10.0;
pub const MELEE_RANGE: f32 = 0.7;
pub const HURT_TIME: f32 = 0.18;
pub const DEATH_TIME: f32 = 1.5;
const BOSS_INTRO_RANGE: f32 = 10.0;
const VOLLEY_SPREAD: f32 = 0.3;
const VOLLEY_DAMAGE_SCALE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Spitter,
    Roller,
    Barrel,
    Boss,
}

/// Fixed per-kind numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub hp: i32,
    /// Units per second
    pub speed: f32,
    pub damage: i32,
    /// Seconds between attacks
    pub fire_interval: f32,
    /// Projectile speed; `None` for melee
    pub shot_speed: Option<f32>,
    pub score: u32,
    /// Distance a ranged enemy tries to hold
    pub preferred_range: f32,
}

impl EnemyKind {
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Spitter => EnemyStats {
                hp: 40,
                speed: 1.4,
                damage: 8,
                fire_interval: 2.2,
                shot_speed: Some(5.0),
                score: 100,
                preferred_range: 6.0,
            },
            EnemyKind::Roller => EnemyStats {
                hp: 25,
                speed: 3.8,
                damage: 15,
                fire_interval: 0.8,
                shot_speed: None,
                score: 150,
                preferred_range: 0.0,
            },
            EnemyKind::Barrel => EnemyStats {
                hp: 150,
                speed: 0.8,
                damage: 22,
                fire_interval: 3.5,
                shot_speed: Some(3.5),
                score: 250,
                preferred_range: 4.0,
            },
            EnemyKind::Boss => EnemyStats {
                hp: 600,
                speed: 1.8,
                damage: 20,
                fire_interval: 1.5,
                shot_speed: Some(6.0),
                score: 5000,
                preferred_range: 6.0,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Spitter => "Spitter",
            EnemyKind::Roller => "Roller",
            EnemyKind::Barrel => "Barrel",
            EnemyKind::Boss => "Cactus King",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorState {
    Idle,
    Chase,
    Attack,
    Hurt,
    Death,
}

/// A boss volley shot waiting for its delay to run out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingShot {
    pub delay: f32,
    /// Where the player stood when the volley was fired
    pub target: Vec2,
    pub angle_offset: f32,
    pub damage: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub position: Vec2,
    /// Facing, radians
    pub angle: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub state: BehaviorState,
    /// Boss phase, 1..=3
    pub phase: u8,
    pub speed: f32,
    pub fire_interval: f32,
    pub hurt_timer: f32,
    pub death_timer: f32,
    pub fire_cooldown: f32,
    pub last_known_player: Option<Vec2>,
    pub pending: Vec<PendingShot>,
    pub intro_played: bool,
    pub dead: bool,
}

impl Enemy {
    pub fn new(kind: EnemyKind, position: Vec2) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            position,
            angle: 0.0,
            hp: stats.hp,
            max_hp: stats.hp,
            state: BehaviorState::Idle,
            phase: 1,
            speed: stats.speed,
            fire_interval: stats.fire_interval,
            hurt_timer: 0.0,
            death_timer: 0.0,
            fire_cooldown: 0.0,
            last_known_player: None,
            pending: Vec::new(),
            intro_played: false,
            dead: false,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    /// Dead and finished with the death animation
    pub fn is_expired(&self) -> bool {
        self.dead && self.death_timer <= 0.0
    }

    /// Apply damage. Dead enemies ignore further hits.
    pub fn take_damage(&mut self, amount: i32, critical: bool, player: &mut Player, ctx: &mut SimContext) {
        if self.dead {
            return;
        }
        self.hp -= amount;
        self.hurt_timer = HURT_TIME;
        self.state = BehaviorState::Hurt;
        ctx.events.send(GameEvent::EnemyHit {
            kind: self.kind,
            position: self.position,
            damage: amount,
            critical,
        });

        if self.is_boss() {
            self.check_boss_phase(player, ctx);
        }
        if self.hp <= 0 {
            self.die(player, ctx);
        }
    }

    fn check_boss_phase(&mut self, player: &mut Player, ctx: &mut SimContext) {
        let base = self.kind.stats();
        let (phase, speed_scale, interval, trauma) = if self.hp <= 120 && self.phase < 3 {
            (3, 1.6, 0.8, 0.7)
        } else if self.hp <= 300 && self.phase < 2 {
            (2, 1.3, 1.2, 0.5)
        } else {
            return;
        };
        self.phase = phase;
        self.speed = base.speed * speed_scale;
        self.fire_interval = interval;
        self.fire_cooldown = self.fire_cooldown.min(interval);
        player.add_trauma(trauma);
        ctx.events.send(GameEvent::BossPhaseChanged { phase });
    }

    fn die(&mut self, player: &mut Player, ctx: &mut SimContext) {
        self.hp = 0;
        self.dead = true;
        self.state = BehaviorState::Death;
        self.death_timer = DEATH_TIME;
        self.pending.clear();

        let score = self.kind.stats().score;
        player.add_score(score);
        player.add_charge(ctx.config.special.kill_bonus);
        ctx.stats.kills += 1;
        ctx.events.send(GameEvent::EnemyKilled { kind: self.kind, position: self.position, score });

        let roll: f32 = ctx.rng.gen();
        if let Some(kind) = roll_loot(self.kind, roll) {
            ctx.pickups.push(Pickup::new(kind, self.position));
            ctx.events.send(GameEvent::LootDropped { kind, position: self.position });
        }

        if self.is_boss() {
            ctx.stats.boss_defeated = true;
            ctx.events.send(GameEvent::BossDefeated);
        }
    }

    /// One AI tick
    pub fn update(&mut self, dt: f32, player: &mut Player, projectiles: &mut ProjectileSystem, ctx: &mut SimContext) {
        if self.dead {
            self.death_timer -= dt;
            return;
        }

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        self.fire_pending(dt, projectiles);

        let to_player = player.position - self.position;
        let dist = to_player.len();

        if self.is_boss() && !self.intro_played && dist < BOSS_INTRO_RANGE {
            self.intro_played = true;
            player.add_trauma(0.6);
            ctx.events.send(GameEvent::BossIntro);
        }

        if self.state == BehaviorState::Hurt {
            self.hurt_timer -= dt;
            if self.hurt_timer > 0.0 {
                return;
            }
            if dist < DETECTION_RANGE {
                // Getting shot gives the shooter away
                self.state = BehaviorState::Chase;
                self.last_known_player = Some(player.position);
            } else {
                self.state = BehaviorState::Idle;
            }
            return;
        }

        if dist > DETECTION_RANGE {
            self.state = BehaviorState::Idle;
            return;
        }

        if !ctx.map.line_of_sight(self.position, player.position) {
            if self.state == BehaviorState::Idle {
                return;
            }
            self.state = BehaviorState::Chase;
            if let Some(target) = self.last_known_player {
                self.face(target);
                self.move_toward(target, self.speed * 0.5 * dt, ctx);
            }
            return;
        }

        self.last_known_player = Some(player.position);
        self.state = BehaviorState::Chase;
        self.angle = to_player.angle();

        let stats = self.kind.stats();
        match stats.shot_speed {
            None => {
                if dist > MELEE_RANGE {
                    self.move_toward(player.position, self.speed * dt, ctx);
                } else if self.fire_cooldown <= 0.0 {
                    self.fire_cooldown = self.fire_interval;
                    self.state = BehaviorState::Attack;
                    player.take_damage(stats.damage as f32, ctx.config, ctx.events);
                }
            }
            Some(shot_speed) => {
                let preferred = stats.preferred_range;
                if dist > preferred + 1.0 {
                    self.move_toward(player.position, self.speed * dt, ctx);
                } else if dist < preferred - 1.0 {
                    let away = self.position + (self.position - player.position);
                    self.move_toward(away, self.speed * 0.5 * dt, ctx);
                }

                if self.fire_cooldown <= 0.0 && dist < FIRE_RANGE {
                    self.fire_cooldown = self.fire_interval;
                    self.state = BehaviorState::Attack;
                    self.fire(player.position, stats.damage, shot_speed, projectiles);
                }
            }
        }
    }

    fn fire(&mut self, target: Vec2, damage: i32, speed: f32, projectiles: &mut ProjectileSystem) {
        projectiles.spawn_enemy_shot(self.position, (target - self.position).angle(), damage, speed);

        if self.is_boss() && self.phase >= 3 {
            let side_damage = (damage as f32 * VOLLEY_DAMAGE_SCALE).round() as i32;
            self.pending.push(PendingShot { delay: 0.08, target, angle_offset: VOLLEY_SPREAD, damage: side_damage });
            self.pending.push(PendingShot { delay: 0.16, target, angle_offset: -VOLLEY_SPREAD, damage: side_damage });
        }
    }

    fn fire_pending(&mut self, dt: f32, projectiles: &mut ProjectileSystem) {
        if self.pending.is_empty() {
            return;
        }
        let speed = self.kind.stats().shot_speed.unwrap_or(0.0);
        let position = self.position;
        self.pending.retain_mut(|shot| {
            shot.delay -= dt;
            if shot.delay > 0.0 {
                return true;
            }
            let angle = (shot.target - position).angle() + shot.angle_offset;
            projectiles.spawn_enemy_shot(position, angle, shot.damage, speed);
            false
        });
    }

    fn face(&mut self, target: Vec2) {
        let d = target - self.position;
        if d.len_sq() > 1e-6 {
            self.angle = d.angle();
        }
    }

    /// Step toward `target`, resolving X then Y against walls
    fn move_toward(&mut self, target: Vec2, step: f32, ctx: &SimContext) {
        let delta = target - self.position;
        let len = delta.len();
        if len < 1e-4 {
            return;
        }
        let step = step.min(len);
        let next = self.position + delta * (step / len);
        if !ctx.map.is_wall(next.x.floor() as i32, self.position.y.floor() as i32) {
            self.position.x = next.x;
        }
        if !ctx.map.is_wall(self.position.x.floor() as i32, next.y.floor() as i32) {
            self.position.y = next.y;
        }
    }
}

/// Run every enemy's AI, then drop the ones whose death animation is over
pub fn update_enemies(
    enemies: &mut Vec<Enemy>,
    dt: f32,
    player: &mut Player,
    projectiles: &mut ProjectileSystem,
    ctx: &mut SimContext,
) {
    for enemy in enemies.iter_mut() {
        enemy.update(dt, player, projectiles, ctx);
    }
    enemies.retain(|e| !e.is_expired());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::world::TestBed;

    const DT: f32 = 1.0 / 60.0;

    fn room(size: usize) -> Vec<Vec<u8>> {
        let mut grid = vec![vec![0u8; size]; size];
        for i in 0..size {
            grid[0][i] = 1;
            grid[size - 1][i] = 1;
            grid[i][0] = 1;
            grid[i][size - 1] = 1;
        }
        grid
    }

    #[test]
    fn test_three_hits_kill_spitter() {
        let mut bed = TestBed::new(&room(10));
        let mut enemy = Enemy::new(EnemyKind::Spitter, Vec2::new(5.5, 5.5));

        for _ in 0..2 {
            bed.with_ctx(|player, ctx| enemy.take_damage(15, false, player, ctx));
        }
        assert_eq!(enemy.hp, 10);
        assert!(!enemy.dead);
        assert_eq!(enemy.state, BehaviorState::Hurt);

        bed.with_ctx(|player, ctx| enemy.take_damage(15, false, player, ctx));

        assert_eq!(enemy.hp, 0);
        assert!(enemy.dead);
        assert_eq!(enemy.state, BehaviorState::Death);
        assert_eq!(bed.stats.kills, 1);
        assert_eq!(bed.player.score, 100);
        let killed = bed.events.iter().filter(|e| matches!(e, GameEvent::EnemyKilled { .. })).count();
        assert_eq!(killed, 1);

        // Further hits do nothing
        let pickups = bed.pickups.len();
        bed.with_ctx(|player, ctx| enemy.take_damage(15, false, player, ctx));
        assert_eq!(bed.stats.kills, 1);
        assert_eq!(bed.pickups.len(), pickups);
        assert_eq!(enemy.hp, 0);
    }

    #[test]
    fn test_death_is_terminal_and_expires() {
        let mut bed = TestBed::new(&room(10));
        bed.player.position = Vec2::new(3.5, 3.5);
        let mut projectiles = ProjectileSystem::new();
        let mut enemies = vec![Enemy::new(EnemyKind::Roller, Vec2::new(5.5, 5.5))];
        bed.with_ctx(|player, ctx| enemies[0].take_damage(100, false, player, ctx));

        let mut ticks = 0;
        while !enemies.is_empty() {
            assert_eq!(enemies[0].state, BehaviorState::Death);
            bed.with_ctx(|player, ctx| update_enemies(&mut enemies, DT, player, &mut projectiles, ctx));
            ticks += 1;
            assert!(ticks < 200);
        }
        assert!((ticks as f32 * DT - DEATH_TIME).abs() < 2.0 * DT);
    }

    #[test]
    fn test_idle_needs_line_of_sight() {
        let mut grid = room(10);
        for row in grid.iter_mut().take(9).skip(1) {
            row[5] = 2;
        }
        let mut bed = TestBed::new(&grid);
        bed.player.position = Vec2::new(2.5, 5.5);
        let mut projectiles = ProjectileSystem::new();
        let mut enemy = Enemy::new(EnemyKind::Spitter, Vec2::new(7.5, 5.5));

        for _ in 0..30 {
            bed.with_ctx(|player, ctx| enemy.update(DT, player, &mut projectiles, ctx));
        }
        assert_eq!(enemy.state, BehaviorState::Idle);
        assert_eq!(enemy.position, Vec2::new(7.5, 5.5));
        assert!(projectiles.all().is_empty());
    }

    #[test]
    fn test_spitter_fires_immediately_then_waits() {
        let mut bed = TestBed::new(&room(12));
        bed.player.position = Vec2::new(2.5, 5.5);
        let mut projectiles = ProjectileSystem::new();
        let mut enemy = Enemy::new(EnemyKind::Spitter, Vec2::new(8.5, 5.5));

        bed.with_ctx(|player, ctx| enemy.update(DT, player, &mut projectiles, ctx));
        assert_eq!(enemy.state, BehaviorState::Attack);
        assert_eq!(projectiles.all().len(), 1);

        bed.with_ctx(|player, ctx| enemy.update(DT, player, &mut projectiles, ctx));
        assert_eq!(enemy.state, BehaviorState::Chase);
        assert_eq!(projectiles.all().len(), 1);
    }

    #[test]
    fn test_roller_melee() {
        let mut bed = TestBed::new(&room(10));
        bed.player.position = Vec2::new(5.0, 5.5);
        let mut projectiles = ProjectileSystem::new();
        let mut enemy = Enemy::new(EnemyKind::Roller, Vec2::new(7.5, 5.5));

        for _ in 0..60 {
            bed.with_ctx(|player, ctx| enemy.update(DT, player, &mut projectiles, ctx));
        }
        assert!(enemy.position.dist(bed.player.position) <= MELEE_RANGE + 0.1);
        assert!(bed.player.hp < 100.0);
        assert!(projectiles.all().is_empty());
    }

    #[test]
    fn test_hurt_recovers_to_chase() {
        let mut bed = TestBed::new(&room(10));
        bed.player.position = Vec2::new(2.5, 2.5);
        let mut projectiles = ProjectileSystem::new();
        let mut enemy = Enemy::new(EnemyKind::Barrel, Vec2::new(7.5, 7.5));
        bed.with_ctx(|player, ctx| enemy.take_damage(10, false, player, ctx));
        assert_eq!(enemy.state, BehaviorState::Hurt);

        for _ in 0..12 {
            bed.with_ctx(|player, ctx| enemy.update(DT, player, &mut projectiles, ctx));
        }
        assert_ne!(enemy.state, BehaviorState::Hurt);
        assert_ne!(enemy.state, BehaviorState::Idle);
    }

    #[test]
    fn test_boss_phases_once_each() {
        let mut bed = TestBed::new(&room(10));
        let mut boss = Enemy::new(EnemyKind::Boss, Vec2::new(5.5, 5.5));

        bed.with_ctx(|player, ctx| boss.take_damage(310, false, player, ctx));
        assert_eq!(boss.phase, 2);
        assert!((boss.fire_interval - 1.2).abs() < 1e-6);
        bed.with_ctx(|player, ctx| boss.take_damage(10, false, player, ctx));
        bed.with_ctx(|player, ctx| boss.take_damage(170, false, player, ctx));
        assert_eq!(boss.phase, 3);
        assert!((boss.speed - 1.8 * 1.6).abs() < 1e-5);

        let phases: Vec<u8> = bed
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::BossPhaseChanged { phase } => Some(*phase),
                _ => None,
            })
            .collect();
        assert_eq!(phases, vec![2, 3]);

        bed.with_ctx(|player, ctx| boss.take_damage(500, false, player, ctx));
        assert!(boss.dead);
        assert!(bed.stats.boss_defeated);
        assert!(bed.events.iter().any(|e| *e == GameEvent::BossDefeated));
    }

    #[test]
    fn test_boss_volley() {
        let mut bed = TestBed::new(&room(14));
        bed.player.position = Vec2::new(2.5, 6.5);
        let mut projectiles = ProjectileSystem::new();
        let mut boss = Enemy::new(EnemyKind::Boss, Vec2::new(8.5, 6.5));
        boss.phase = 3;

        bed.with_ctx(|player, ctx| boss.update(DT, player, &mut projectiles, ctx));
        assert_eq!(projectiles.all().len(), 1);
        assert!(bed.events.iter().any(|e| *e == GameEvent::BossIntro));

        for _ in 0..12 {
            bed.with_ctx(|player, ctx| boss.update(DT, player, &mut projectiles, ctx));
        }
        assert_eq!(projectiles.all().len(), 3);
        assert!(boss.pending.is_empty());
        assert!(projectiles.all()[1..].iter().all(|p| p.damage == 14));
        // Phases change move speed and fire rate, never shot speed
        assert!(projectiles.all().iter().all(|p| (p.velocity.len() - 6.0).abs() < 1e-4));
    }
}
