//! Pickups
//!
//! Floating collectibles placed by the level or dropped by dying enemies.

use serde::{Deserialize, Serialize};

use crate::rasterizer::Vec2;
use super::config::GameConfig;
use super::enemy::EnemyKind;
use super::event::{EventQueue, GameEvent};
use super::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Health,
    Armor,
    Ammo,
    Key,
    Energy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub kind: PickupKind,
    pub position: Vec2,
    /// Phase of the hover animation, radians
    pub bob_phase: f32,
    pub alive: bool,
}

impl Pickup {
    pub fn new(kind: PickupKind, position: Vec2) -> Self {
        // Stagger the hover so neighbouring pickups don't bob in lockstep
        let bob_phase = (position.x * 1.7 + position.y * 2.3) % std::f32::consts::TAU;
        Self { kind, position, bob_phase, alive: true }
    }

    /// Vertical hover offset in wall-height units
    pub fn bob_offset(&self) -> f32 {
        self.bob_phase.sin() * 0.05
    }
}

/// Loot table for a killed enemy. `roll` is uniform in [0, 1).
pub fn roll_loot(kind: EnemyKind, roll: f32) -> Option<PickupKind> {
    if kind == EnemyKind::Barrel && roll < 0.4 {
        return Some(PickupKind::Armor);
    }
    if roll < 0.35 {
        Some(PickupKind::Health)
    } else if roll < 0.45 {
        Some(PickupKind::Ammo)
    } else {
        None
    }
}

/// Animate pickups and hand any the player touches over to them
pub fn update_pickups(
    pickups: &mut Vec<Pickup>,
    dt: f32,
    player: &mut Player,
    config: &GameConfig,
    events: &mut EventQueue<GameEvent>,
) {
    let radius_sq = config.pickups.collect_radius * config.pickups.collect_radius;
    for pickup in pickups.iter_mut().filter(|p| p.alive) {
        pickup.bob_phase += dt * 2.5;
        if pickup.position.dist_sq(player.position) < radius_sq {
            pickup.alive = false;
            player.collect(pickup.kind, config, events);
        }
    }
    pickups.retain(|p| p.alive);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loot_table() {
        assert_eq!(roll_loot(EnemyKind::Barrel, 0.1), Some(PickupKind::Armor));
        assert_eq!(roll_loot(EnemyKind::Barrel, 0.42), Some(PickupKind::Ammo));
        assert_eq!(roll_loot(EnemyKind::Spitter, 0.1), Some(PickupKind::Health));
        assert_eq!(roll_loot(EnemyKind::Spitter, 0.4), Some(PickupKind::Ammo));
        assert_eq!(roll_loot(EnemyKind::Roller, 0.9), None);
        assert_eq!(roll_loot(EnemyKind::Boss, 0.45), None);
    }

    #[test]
    fn test_collect_on_touch() {
        let config = GameConfig::default();
        let mut events = EventQueue::new();
        let mut player = Player::new(&config);
        player.position = Vec2::new(2.5, 2.5);
        player.hp = 50.0;
        let mut pickups = vec![
            Pickup::new(PickupKind::Health, Vec2::new(2.6, 2.5)),
            Pickup::new(PickupKind::Key, Vec2::new(6.5, 2.5)),
        ];

        update_pickups(&mut pickups, 1.0 / 60.0, &mut player, &config, &mut events);

        assert_eq!(pickups.len(), 1);
        assert_eq!(pickups[0].kind, PickupKind::Key);
        assert_eq!(player.hp, 75.0);
        assert!(!player.has_key);
        assert!(events.iter().any(|e| *e == GameEvent::PickupCollected { kind: PickupKind::Health }));
    }

    #[test]
    fn test_bob_advances() {
        let config = GameConfig::default();
        let mut events = EventQueue::new();
        let mut player = Player::new(&config);
        player.position = Vec2::new(20.0, 20.0);
        let mut pickups = vec![Pickup::new(PickupKind::Ammo, Vec2::new(1.5, 1.5))];
        let before = pickups[0].bob_phase;
        update_pickups(&mut pickups, 0.4, &mut player, &config, &mut events);
        assert!((pickups[0].bob_phase - before - 1.0).abs() < 1e-5);
        assert!(events.is_empty());
    }
}
