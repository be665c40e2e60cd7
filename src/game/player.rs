//! Player state and controls
//!
//! Movement with per-axis wall sliding, weapon cooldowns, the overdrive
//! meter, armour and screen shake.

use rand::Rng;

use crate::input::Intents;
use crate::rasterizer::math::normalize_angle;
use crate::rasterizer::Vec2;
use crate::world::PlayerStart;
use super::config::GameConfig;
use super::event::{EventQueue, GameEvent};
use super::pickup::PickupKind;
use super::projectile::{ProjectileKind, ProjectileSystem};
use super::world::SimContext;

/// Muzzle distance in front of the eye
const MUZZLE_FORWARD: f32 = 0.35;
/// Primary shots leave from slightly right of centre
const MUZZLE_RIGHT: f32 = 0.08;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec2,
    /// View direction, radians in [0, 2π)
    pub angle: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub armor: f32,
    pub max_armor: f32,
    /// Lobbed explosives left
    pub ammo: u32,
    pub max_ammo: u32,
    /// Overdrive meter
    pub charge: f32,
    pub max_charge: f32,
    pub score: u32,
    pub has_key: bool,
    pub special_active: bool,
    /// Weapon bob phase; advances while walking and on recoil
    pub bob_phase: f32,
    /// Shake strength in [0, 1]
    pub trauma: f32,
    /// Current shake offset in screen pixels
    pub shake: Vec2,
    pub moving: bool,
    shot_cooldown: f32,
    lob_cooldown: f32,
}

/// Sign that maps zero to zero
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let pc = &config.player;
        Self {
            position: Vec2::new(1.5, 1.5),
            angle: 0.0,
            hp: pc.max_hp,
            max_hp: pc.max_hp,
            armor: pc.start_armor,
            max_armor: pc.max_armor,
            ammo: pc.start_ammo,
            max_ammo: pc.max_ammo,
            charge: 0.0,
            max_charge: config.special.max_charge,
            score: 0,
            has_key: false,
            special_active: false,
            bob_phase: 0.0,
            trauma: 0.0,
            shake: Vec2::ZERO,
            moving: false,
            shot_cooldown: 0.0,
            lob_cooldown: 0.0,
        }
    }

    /// Move to a level's start. Run stats (hp, score, ammo) carry over; the key does not.
    pub fn place(&mut self, start: &PlayerStart) {
        self.position = Vec2::new(start.x, start.y);
        self.angle = normalize_angle(start.angle);
        self.has_key = false;
        self.trauma = 0.0;
        self.shake = Vec2::ZERO;
        self.shot_cooldown = 0.0;
        self.lob_cooldown = 0.0;
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Overdrive can be switched on
    pub fn special_ready(&self) -> bool {
        !self.special_active && self.charge >= self.max_charge
    }

    pub fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    pub fn add_charge(&mut self, amount: f32) {
        if !self.special_active {
            self.charge = (self.charge + amount).min(self.max_charge);
        }
    }

    pub fn add_trauma(&mut self, amount: f32) {
        self.trauma = (self.trauma + amount).min(1.0);
    }

    pub fn heal(&mut self, amount: f32, events: &mut EventQueue<GameEvent>) {
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        events.send(GameEvent::PlayerHealed { amount: self.hp - before });
    }

    /// Incoming damage. Overdrive soaks it into the meter, otherwise armour
    /// takes its share first.
    pub fn take_damage(&mut self, amount: f32, config: &GameConfig, events: &mut EventQueue<GameEvent>) {
        if amount <= 0.0 || self.is_dead() {
            return;
        }

        if self.special_active {
            self.charge -= amount;
            self.add_trauma(0.3);
            events.send(GameEvent::PlayerDamaged { amount: 0.0, absorbed: amount });
            if self.charge <= 0.0 {
                self.end_special(events);
            }
            return;
        }

        let absorbed = if self.armor > 0.0 {
            self.armor.min(amount * config.player.armor_absorb)
        } else {
            0.0
        };
        self.armor -= absorbed;
        let taken = amount - absorbed;
        self.hp = (self.hp - taken).max(0.0);
        self.add_trauma(0.5);
        events.send(GameEvent::PlayerDamaged { amount: taken, absorbed });
    }

    /// Apply a pickup's effect
    pub fn collect(&mut self, kind: PickupKind, config: &GameConfig, events: &mut EventQueue<GameEvent>) {
        let pc = &config.pickups;
        match kind {
            PickupKind::Health => self.heal(pc.heal, events),
            PickupKind::Armor => self.armor = (self.armor + pc.armor).min(self.max_armor),
            PickupKind::Ammo => self.ammo = (self.ammo + pc.ammo).min(self.max_ammo),
            PickupKind::Key => self.has_key = true,
            PickupKind::Energy => self.add_charge(pc.energy),
        }
        events.send(GameEvent::PickupCollected { kind });
    }

    fn end_special(&mut self, events: &mut EventQueue<GameEvent>) {
        self.charge = 0.0;
        self.special_active = false;
        events.send(GameEvent::SpecialModeEnded);
    }

    /// One tick of controls, meter and shake
    pub fn update(&mut self, dt: f32, intents: &Intents, projectiles: &mut ProjectileSystem, ctx: &mut SimContext) {
        if self.is_dead() {
            return;
        }
        let config = ctx.config;
        self.shot_cooldown = (self.shot_cooldown - dt).max(0.0);
        self.lob_cooldown = (self.lob_cooldown - dt).max(0.0);

        self.turn(dt, intents, config);
        self.walk(dt, intents, ctx);
        self.update_meter(dt, config, ctx.events);
        self.update_shake(dt, ctx);

        if intents.special {
            self.try_special(ctx.events);
        }
        if intents.fire {
            self.try_fire(projectiles, config, ctx.events);
        }
        if intents.lob {
            self.try_lob(projectiles, config, ctx.events);
        }
    }

    fn turn(&mut self, dt: f32, intents: &Intents, config: &GameConfig) {
        let pc = &config.player;
        let mut turn = intents.turn_delta * pc.mouse_sensitivity;
        if intents.turn_left {
            turn -= pc.turn_speed * dt;
        }
        if intents.turn_right {
            turn += pc.turn_speed * dt;
        }
        let angle = self.angle + turn;
        self.angle = if angle.is_finite() { normalize_angle(angle) } else { 0.0 };
    }

    fn walk(&mut self, dt: f32, intents: &Intents, ctx: &mut SimContext) {
        let dir = self.direction();
        let right = Vec2::new(-dir.y, dir.x);
        let mut wish = Vec2::ZERO;
        if intents.forward {
            wish += dir;
        }
        if intents.backward {
            wish += -dir;
        }
        if intents.strafe_right {
            wish += right;
        }
        if intents.strafe_left {
            wish += -right;
        }

        self.moving = wish.len_sq() > 0.0;
        if !self.moving {
            return;
        }
        let step = wish.normalize() * (ctx.config.player.move_speed * dt);
        let margin = ctx.config.player.wall_margin;
        let cy = self.position.y.floor() as i32;

        let probe_x = (self.position.x + step.x + sign(step.x) * margin).floor() as i32;
        if !ctx.map.is_wall(probe_x, cy) {
            self.position.x += step.x;
        } else {
            self.bump(probe_x, cy, ctx);
        }

        let cx_now = self.position.x.floor() as i32;
        let probe_y = (self.position.y + step.y + sign(step.y) * margin).floor() as i32;
        if !ctx.map.is_wall(cx_now, probe_y) {
            self.position.y += step.y;
        } else {
            self.bump(cx_now, probe_y, ctx);
        }

        self.bob_phase += dt * 8.0;
    }

    /// Walking into a door tries to open it
    fn bump(&mut self, x: i32, y: i32, ctx: &mut SimContext) {
        if !ctx.map.is_door(x, y) || ctx.map.door_state(x, y).is_some() {
            return;
        }
        if ctx.map.try_open_door(x, y, self.has_key) {
            ctx.events.send(GameEvent::DoorOpened { x, y });
        }
    }

    fn update_meter(&mut self, dt: f32, config: &GameConfig, events: &mut EventQueue<GameEvent>) {
        let sc = &config.special;
        if self.special_active {
            self.charge -= sc.drain_rate * dt;
            if self.charge <= 0.0 {
                self.end_special(events);
            }
        } else {
            self.charge = (self.charge + sc.charge_rate * dt).min(self.max_charge);
        }
    }

    fn update_shake(&mut self, dt: f32, ctx: &mut SimContext) {
        let fx = &ctx.config.effects;
        self.trauma = (self.trauma - fx.shake_decay * dt).max(0.0);
        if self.trauma <= 0.0 {
            self.shake = Vec2::ZERO;
            return;
        }
        let magnitude = self.trauma * self.trauma * fx.shake_magnitude;
        self.shake = Vec2::new(
            ctx.rng.gen_range(-1.0..=1.0f32) * magnitude,
            ctx.rng.gen_range(-1.0..=1.0f32) * magnitude,
        );
    }

    fn try_special(&mut self, events: &mut EventQueue<GameEvent>) {
        if self.special_active {
            return;
        }
        if !self.special_ready() {
            events.send(GameEvent::SpecialNotReady);
            return;
        }
        self.special_active = true;
        self.add_trauma(0.5);
        events.send(GameEvent::SpecialModeStarted);
    }

    fn try_fire(&mut self, projectiles: &mut ProjectileSystem, config: &GameConfig, events: &mut EventQueue<GameEvent>) {
        if self.shot_cooldown > 0.0 {
            return;
        }
        let w = &config.weapons;
        let dir = self.direction();
        if self.special_active {
            self.shot_cooldown = w.beam_cooldown;
            let muzzle = self.position + dir * MUZZLE_FORWARD;
            projectiles.spawn_beam(muzzle, self.angle, w.beam_damage, w.beam_speed, self.bob_phase);
            self.bob_phase += 0.5;
            events.send(GameEvent::WeaponFired { kind: ProjectileKind::Beam });
        } else {
            self.shot_cooldown = w.shot_cooldown;
            let right = Vec2::new(-dir.y, dir.x);
            let muzzle = self.position + dir * MUZZLE_FORWARD + right * MUZZLE_RIGHT;
            projectiles.spawn_shot(muzzle, self.angle, w.shot_damage, w.shot_speed);
            self.bob_phase += 0.3;
            events.send(GameEvent::WeaponFired { kind: ProjectileKind::Shot });
        }
    }

    fn try_lob(&mut self, projectiles: &mut ProjectileSystem, config: &GameConfig, events: &mut EventQueue<GameEvent>) {
        if self.lob_cooldown > 0.0 {
            return;
        }
        if self.ammo == 0 {
            events.send(GameEvent::OutOfAmmo);
            return;
        }
        let w = &config.weapons;
        self.lob_cooldown = w.lobbed_cooldown;
        self.ammo -= 1;
        let muzzle = self.position + self.direction() * MUZZLE_FORWARD;
        projectiles.spawn_lobbed(muzzle, self.angle, w.lobbed_damage, w.lobbed_speed, w.lobbed_splash, w.lobbed_launch_vz);
        events.send(GameEvent::WeaponFired { kind: ProjectileKind::Lobbed });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::world::TestBed;
    use crate::world::codes::DOOR;

    const DT: f32 = 1.0 / 60.0;

    fn corridor() -> Vec<Vec<u8>> {
        vec![
            vec![1, 1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, DOOR, 0, 1],
            vec![1, 0, 0, 0, 1, 0, 1],
            vec![1, 1, 1, 1, 1, 1, 1],
        ]
    }

    fn tick(bed: &mut TestBed, intents: &Intents, projectiles: &mut ProjectileSystem) {
        bed.with_ctx(|player, ctx| player.update(DT, intents, projectiles, ctx));
    }

    #[test]
    fn test_armor_absorbs_share() {
        let config = GameConfig::default();
        let mut events = EventQueue::new();
        let mut player = Player::new(&config);
        player.armor = 20.0;
        player.take_damage(20.0, &config, &mut events);
        assert_eq!(player.armor, 8.0);
        assert_eq!(player.hp, 92.0);

        player.armor = 1.0;
        player.take_damage(10.0, &config, &mut events);
        assert_eq!(player.armor, 0.0);
        assert_eq!(player.hp, 83.0);
    }

    #[test]
    fn test_special_drains_meter_instead_of_hp() {
        let config = GameConfig::default();
        let mut events = EventQueue::new();
        let mut player = Player::new(&config);
        player.charge = 100.0;
        player.try_special(&mut events);
        assert!(player.special_active);

        player.take_damage(30.0, &config, &mut events);
        assert_eq!(player.hp, 100.0);
        assert_eq!(player.charge, 70.0);

        player.take_damage(80.0, &config, &mut events);
        assert!(!player.special_active);
        assert_eq!(player.charge, 0.0);
        assert!(events.iter().any(|e| *e == GameEvent::SpecialModeEnded));
    }

    #[test]
    fn test_special_needs_full_meter() {
        let config = GameConfig::default();
        let mut events = EventQueue::new();
        let mut player = Player::new(&config);
        player.charge = 99.0;
        player.try_special(&mut events);
        assert!(!player.special_active);
        assert_eq!(events.iter().next(), Some(&GameEvent::SpecialNotReady));
    }

    #[test]
    fn test_lob_uses_ammo() {
        let mut bed = TestBed::new(&corridor());
        let mut projectiles = ProjectileSystem::new();
        let lob = Intents { lob: true, ..Intents::default() };

        bed.player.ammo = 1;
        tick(&mut bed, &lob, &mut projectiles);
        assert_eq!(bed.player.ammo, 0);
        assert_eq!(projectiles.all().len(), 1);
        assert_eq!(projectiles.all()[0].kind, ProjectileKind::Lobbed);

        bed.player.lob_cooldown = 0.0;
        tick(&mut bed, &lob, &mut projectiles);
        assert!(bed.events.iter().any(|e| *e == GameEvent::OutOfAmmo));
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut bed = TestBed::new(&corridor());
        let mut projectiles = ProjectileSystem::new();
        let fire = Intents { fire: true, ..Intents::default() };
        for _ in 0..12 {
            tick(&mut bed, &fire, &mut projectiles);
        }
        // 0.2 s of held fire at a 0.18 s cooldown
        let shots = bed.events.iter().filter(|e| matches!(e, GameEvent::WeaponFired { .. })).count();
        assert_eq!(shots, 2);
    }

    #[test]
    fn test_walls_block_movement() {
        let mut bed = TestBed::new(&corridor());
        bed.player.position = Vec2::new(1.5, 1.5);
        bed.player.angle = std::f32::consts::PI;
        let mut projectiles = ProjectileSystem::new();
        let forward = Intents { forward: true, ..Intents::default() };
        for _ in 0..60 {
            tick(&mut bed, &forward, &mut projectiles);
        }
        assert!(bed.player.position.x >= 1.0 + 0.3 - 1e-3);
        assert!(bed.player.bob_phase > 0.0);
    }

    #[test]
    fn test_door_needs_key() {
        let mut bed = TestBed::new(&corridor());
        bed.player.position = Vec2::new(3.5, 1.5);
        let mut projectiles = ProjectileSystem::new();
        let forward = Intents { forward: true, ..Intents::default() };

        for _ in 0..30 {
            tick(&mut bed, &forward, &mut projectiles);
        }
        assert!(bed.map.door_state(4, 1).is_none());
        assert!(bed.player.position.x < 4.0);

        bed.player.has_key = true;
        for _ in 0..30 {
            tick(&mut bed, &forward, &mut projectiles);
        }
        assert!(bed.map.door_state(4, 1).is_some());
        let opened = bed.events.iter().filter(|e| **e == GameEvent::DoorOpened { x: 4, y: 1 }).count();
        assert_eq!(opened, 1);
    }

    #[test]
    fn test_meter_charges_and_caps() {
        let mut bed = TestBed::new(&corridor());
        let mut projectiles = ProjectileSystem::new();
        for _ in 0..60 * 20 {
            tick(&mut bed, &Intents::default(), &mut projectiles);
        }
        assert_eq!(bed.player.charge, 100.0);
        assert!(bed.player.special_ready());
    }
}
