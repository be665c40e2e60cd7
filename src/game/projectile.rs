//! Projectiles
//!
//! Player shots, lobbed explosives, overdrive beams and enemy spit. The
//! system also owns the particle pool since explosions are the only
//! particle source.
//!
//! Per tick each projectile is aged, integrated, tested against walls and
//! then against its targets. Dead entries are filtered at the end.

use crate::rasterizer::Vec2;
use super::enemy::Enemy;
use super::event::GameEvent;
use super::particles::{ParticlePool, EXPLOSION_ORANGE};
use super::player::Player;
use super::world::SimContext;

/// Splash hits closer than this are reported as critical
const CRITICAL_SPLASH_DIST: f32 = 0.5;

/// Render height of a lobbed projectile at `z = 0`
pub const LOB_BASE_HEIGHT: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    Shot,
    Lobbed,
    Beam,
    EnemyShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

impl ProjectileKind {
    pub fn owner(self) -> Owner {
        match self {
            ProjectileKind::EnemyShot => Owner::Enemy,
            _ => Owner::Player,
        }
    }

    /// Explodes on contact instead of hitting a single target
    pub fn is_splash(self) -> bool {
        matches!(self, ProjectileKind::Lobbed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Height above launch point (lobbed only)
    pub z: f32,
    pub vz: f32,
    pub damage: i32,
    pub splash_radius: Option<f32>,
    pub owner: Owner,
    /// Seconds since spawn
    pub age: f32,
    pub alive: bool,
    /// Cosmetic seed for the beam's flicker
    pub flicker: f32,
}

impl Projectile {
    fn new(kind: ProjectileKind, position: Vec2, angle: f32, speed: f32, damage: i32) -> Self {
        Self {
            kind,
            position,
            velocity: Vec2::from_angle(angle) * speed,
            z: 0.0,
            vz: 0.0,
            damage,
            splash_radius: None,
            owner: kind.owner(),
            age: 0.0,
            alive: true,
            flicker: 0.0,
        }
    }
}

/// Linear falloff: full damage at the centre, nothing at or past `radius`
pub fn splash_damage(base: i32, dist: f32, radius: f32) -> i32 {
    if radius <= 0.0 || !(dist < radius) {
        return 0;
    }
    (base as f32 * (1.0 - dist / radius)).round() as i32
}

#[derive(Debug, Default)]
pub struct ProjectileSystem {
    projectiles: Vec<Projectile>,
    particles: ParticlePool,
}

impl ProjectileSystem {
    pub fn new() -> Self {
        Self { projectiles: Vec::new(), particles: ParticlePool::new() }
    }

    pub fn spawn_shot(&mut self, position: Vec2, angle: f32, damage: i32, speed: f32) {
        self.projectiles.push(Projectile::new(ProjectileKind::Shot, position, angle, speed, damage));
    }

    pub fn spawn_lobbed(
        &mut self,
        position: Vec2,
        angle: f32,
        damage: i32,
        speed: f32,
        splash_radius: f32,
        launch_vz: f32,
    ) {
        let mut p = Projectile::new(ProjectileKind::Lobbed, position, angle, speed, damage);
        p.splash_radius = Some(splash_radius);
        p.vz = launch_vz;
        self.projectiles.push(p);
    }

    pub fn spawn_beam(&mut self, position: Vec2, angle: f32, damage: i32, speed: f32, flicker: f32) {
        let mut p = Projectile::new(ProjectileKind::Beam, position, angle, speed, damage);
        p.flicker = flicker;
        self.projectiles.push(p);
    }

    pub fn spawn_enemy_shot(&mut self, position: Vec2, angle: f32, damage: i32, speed: f32) {
        self.projectiles.push(Projectile::new(ProjectileKind::EnemyShot, position, angle, speed, damage));
    }

    pub fn all(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    pub fn reset(&mut self) {
        self.projectiles.clear();
        self.particles.clear();
    }

    /// Advance every projectile one tick and resolve its collisions
    pub fn update(&mut self, dt: f32, enemies: &mut [Enemy], player: &mut Player, ctx: &mut SimContext) {
        let weapons = &ctx.config.weapons;
        let (gravity, fuse, max_age) = (weapons.lobbed_gravity, weapons.lobbed_fuse, weapons.max_age);
        let direct_sq = weapons.direct_hit_radius * weapons.direct_hit_radius;
        let player_sq = weapons.enemy_shot_hit_radius * weapons.enemy_shot_hit_radius;

        for p in self.projectiles.iter_mut().filter(|p| p.alive) {
            p.age += dt;

            if p.kind == ProjectileKind::Lobbed {
                p.vz -= gravity * dt;
                p.z += p.vz * dt;
                if p.z <= 0.0 && p.age > fuse {
                    p.alive = false;
                    detonate(&mut self.particles, p, enemies, player, ctx);
                    continue;
                }
            }

            if p.age > max_age {
                p.alive = false;
                continue;
            }

            if p.kind == ProjectileKind::Beam {
                p.flicker += dt * 30.0;
            }
            p.position += p.velocity * dt;

            if ctx.map.is_wall_at(p.position) {
                p.alive = false;
                if p.kind.is_splash() {
                    detonate(&mut self.particles, p, enemies, player, ctx);
                }
                continue;
            }

            match p.owner {
                Owner::Player => {
                    // Explosives go off as soon as anything is inside the blast
                    let contact_sq = match p.splash_radius {
                        Some(r) if p.kind.is_splash() => r * r,
                        _ => direct_sq,
                    };
                    let target = enemies
                        .iter_mut()
                        .find(|e| !e.dead && e.position.dist_sq(p.position) < contact_sq);
                    let Some(enemy) = target else { continue };
                    p.alive = false;
                    if p.kind.is_splash() {
                        detonate(&mut self.particles, p, enemies, player, ctx);
                    } else {
                        enemy.take_damage(p.damage, false, player, ctx);
                    }
                }
                Owner::Enemy => {
                    if player.position.dist_sq(p.position) < player_sq {
                        p.alive = false;
                        player.take_damage(p.damage as f32, ctx.config, ctx.events);
                    }
                }
            }
        }

        self.particles.update(dt);
        self.projectiles.retain(|p| p.alive);
    }
}

/// Area damage, debris and shake at the projectile's position
fn detonate(
    particles: &mut ParticlePool,
    p: &Projectile,
    enemies: &mut [Enemy],
    player: &mut Player,
    ctx: &mut SimContext,
) {
    let radius = p.splash_radius.unwrap_or(0.0);
    for enemy in enemies.iter_mut().filter(|e| !e.dead) {
        let dist = enemy.position.dist(p.position);
        let damage = splash_damage(p.damage, dist, radius);
        if damage > 0 {
            enemy.take_damage(damage, dist < CRITICAL_SPLASH_DIST, player, ctx);
        }
    }

    let count = ctx.config.effects.explosion_particles;
    particles.spawn_explosion(ctx.rng, p.position, EXPLOSION_ORANGE, count);
    player.add_trauma(0.6);
    ctx.events.send(GameEvent::Explosion { position: p.position, radius });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameConfig;
    use crate::game::enemy::EnemyKind;
    use crate::game::world::TestBed;

    const DT: f32 = 1.0 / 60.0;

    fn open_room() -> Vec<Vec<u8>> {
        let mut grid = vec![vec![0u8; 12]; 12];
        for i in 0..12 {
            grid[0][i] = 1;
            grid[11][i] = 1;
            grid[i][0] = 1;
            grid[i][11] = 1;
        }
        grid
    }

    #[test]
    fn test_splash_falloff() {
        assert_eq!(splash_damage(55, 0.0, 1.8), 55);
        assert_eq!(splash_damage(55, 0.9, 1.8), 28);
        assert_eq!(splash_damage(55, 1.8, 1.8), 0);
        assert_eq!(splash_damage(55, 2.5, 1.8), 0);
        assert_eq!(splash_damage(55, 0.5, 0.0), 0);
        let mut last = i32::MAX;
        for i in 0..=18 {
            let d = splash_damage(100, i as f32 * 0.1, 1.8);
            assert!(d <= last);
            last = d;
        }
    }

    #[test]
    fn test_lifetime_bound() {
        let mut bed = TestBed::new(&open_room());
        let mut system = ProjectileSystem::new();
        // Flying straight up the middle of a 10-wide room at 1 u/s never reaches a wall
        system.spawn_shot(Vec2::new(5.5, 5.5), 0.0, 10, 1.0);
        let mut ticks = 0;
        while !system.all().is_empty() {
            bed.with_ctx(|player, ctx| system.update(DT, &mut [], player, ctx));
            ticks += 1;
            assert!(ticks < 400);
        }
        assert!(ticks as f32 * DT <= 3.0 + 2.0 * DT);
    }

    #[test]
    fn test_shot_vanishes_in_wall() {
        let mut bed = TestBed::new(&open_room());
        let mut system = ProjectileSystem::new();
        system.spawn_shot(Vec2::new(1.5, 5.5), std::f32::consts::PI, 10, 12.0);
        for _ in 0..10 {
            bed.with_ctx(|player, ctx| system.update(DT, &mut [], player, ctx));
        }
        assert!(system.all().is_empty());
        assert_eq!(system.particles().alive_count(), 0);
        assert!(bed.events.is_empty());
    }

    #[test]
    fn test_lobbed_detonates_on_wall() {
        let mut bed = TestBed::new(&open_room());
        let mut system = ProjectileSystem::new();
        system.spawn_lobbed(Vec2::new(1.5, 5.5), std::f32::consts::PI, 55, 6.0, 1.8, 10.8);
        for _ in 0..20 {
            bed.with_ctx(|player, ctx| system.update(DT, &mut [], player, ctx));
        }
        assert!(system.all().is_empty());
        assert!(system.particles().alive_count() > 0);
        assert!(bed.events.iter().any(|e| matches!(e, GameEvent::Explosion { .. })));
    }

    #[test]
    fn test_lobbed_arc() {
        let mut bed = TestBed::new(&open_room());
        bed.player.position = Vec2::new(1.5, 1.5);
        let config = GameConfig::default();
        let w = &config.weapons;
        let mut system = ProjectileSystem::new();
        system.spawn_lobbed(Vec2::new(2.5, 5.5), 0.0, w.lobbed_damage, 1.0, w.lobbed_splash, w.lobbed_launch_vz);

        let mut peak = 0.0f32;
        let mut ticks = 0;
        while !system.all().is_empty() {
            bed.with_ctx(|player, ctx| system.update(DT, &mut [], player, ctx));
            if let Some(p) = system.all().first() {
                peak = peak.max(p.z);
                assert!(p.z > 0.0 || p.age <= w.lobbed_fuse);
            }
            ticks += 1;
            assert!(ticks < 200);
        }
        // 0.18 up, 0.012 down per tick: apex near tick 15, back on the floor around tick 30
        assert!(peak > 1.2 && peak < 1.3);
        assert!((29..=31).contains(&ticks));
        assert!(bed.events.iter().any(|e| matches!(e, GameEvent::Explosion { .. })));
    }

    #[test]
    fn test_splash_hits_everyone_in_radius() {
        let mut bed = TestBed::new(&open_room());
        bed.player.position = Vec2::new(1.5, 1.5);
        let mut enemies = vec![
            Enemy::new(EnemyKind::Barrel, Vec2::new(6.0, 5.5)),
            Enemy::new(EnemyKind::Barrel, Vec2::new(6.0, 6.5)),
            Enemy::new(EnemyKind::Barrel, Vec2::new(6.0, 9.5)),
        ];
        let mut system = ProjectileSystem::new();
        // Flat (no arc) lob that contacts the first barrel directly
        system.spawn_lobbed(Vec2::new(5.0, 5.5), 0.0, 55, 6.0, 1.8, 0.0);
        for _ in 0..10 {
            bed.with_ctx(|player, ctx| system.update(DT, &mut enemies, player, ctx));
        }
        assert!(enemies[0].hp < 150);
        assert!(enemies[1].hp < 150);
        assert!(enemies[0].hp < enemies[1].hp);
        assert_eq!(enemies[2].hp, 150);
        assert!(bed.player.trauma > 0.0);
    }

    #[test]
    fn test_lob_detonates_on_near_pass() {
        let mut bed = TestBed::new(&open_room());
        let mut enemies = vec![Enemy::new(EnemyKind::Barrel, Vec2::new(2.8, 6.5))];
        let mut system = ProjectileSystem::new();
        // Closest approach is 1.0: outside the direct-hit radius, inside the blast
        system.spawn_lobbed(Vec2::new(1.5, 5.5), 0.0, 55, 6.0, 1.8, 10.8);
        for _ in 0..60 {
            bed.with_ctx(|player, ctx| system.update(DT, &mut enemies, player, ctx));
        }
        assert!(system.all().is_empty());
        assert!(enemies[0].hp < enemies[0].max_hp);
        let blasts = bed.events.iter().filter(|e| matches!(e, GameEvent::Explosion { .. })).count();
        assert_eq!(blasts, 1);
    }

    #[test]
    fn test_shot_damages_single_target() {
        let mut bed = TestBed::new(&open_room());
        let mut enemies = vec![
            Enemy::new(EnemyKind::Spitter, Vec2::new(6.0, 5.5)),
            Enemy::new(EnemyKind::Spitter, Vec2::new(6.1, 5.5)),
        ];
        let mut system = ProjectileSystem::new();
        system.spawn_shot(Vec2::new(5.0, 5.5), 0.0, 12, 12.0);
        for _ in 0..10 {
            bed.with_ctx(|player, ctx| system.update(DT, &mut enemies, player, ctx));
        }
        let total: i32 = enemies.iter().map(|e| e.max_hp - e.hp).sum();
        assert_eq!(total, 12);
        assert!(system.all().is_empty());
    }

    #[test]
    fn test_enemy_shot_goes_through_armor() {
        let mut bed = TestBed::new(&open_room());
        bed.player.position = Vec2::new(6.0, 5.5);
        bed.player.armor = 10.0;
        let mut system = ProjectileSystem::new();
        system.spawn_enemy_shot(Vec2::new(5.0, 5.5), 0.0, 10, 5.0);
        for _ in 0..20 {
            bed.with_ctx(|player, ctx| system.update(DT, &mut [], player, ctx));
        }
        assert!(system.all().is_empty());
        assert_eq!(bed.player.armor, 4.0);
        assert_eq!(bed.player.hp, 96.0);
    }
}
