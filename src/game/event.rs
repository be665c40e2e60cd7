//! Event System
//!
//! The simulation never calls into the HUD, audio, or screen effects
//! directly. It appends `GameEvent`s during the tick and the presentation
//! layer drains them once per frame. A tick with nobody listening simply
//! lets the queue be cleared.

use crate::rasterizer::Vec2;
use super::enemy::EnemyKind;
use super::pickup::PickupKind;
use super::projectile::ProjectileKind;

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the simulation reports to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// An enemy took damage. `critical` marks splash hits close to the centre.
    EnemyHit { kind: EnemyKind, position: Vec2, damage: i32, critical: bool },
    EnemyKilled { kind: EnemyKind, position: Vec2, score: u32 },
    /// Damage after armour; `absorbed` went into armour or the special meter
    PlayerDamaged { amount: f32, absorbed: f32 },
    PlayerHealed { amount: f32 },
    PickupCollected { kind: PickupKind },
    /// Loot dropped by a dying enemy
    LootDropped { kind: PickupKind, position: Vec2 },
    WeaponFired { kind: ProjectileKind },
    OutOfAmmo,
    SpecialNotReady,
    SpecialModeStarted,
    SpecialModeEnded,
    DoorOpened { x: i32, y: i32 },
    /// Standing on the exit without the key (sent once per visit)
    ExitLocked,
    ExitReached,
    Explosion { position: Vec2, radius: f32 },
    BossIntro,
    BossPhaseChanged { phase: u8 },
    BossDefeated,
    LevelStarted { index: usize, name: String },
    GameOver { score: u32, kills: u32 },
    Win { score: u32, kills: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue_basic() {
        let mut queue: EventQueue<u32> = EventQueue::new();
        assert!(queue.is_empty());

        queue.send(1);
        queue.send(2);
        queue.send(3);
        assert_eq!(queue.len(), 3);

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(events, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_iter_does_not_consume() {
        let mut queue = EventQueue::new();
        queue.send(GameEvent::OutOfAmmo);
        queue.send(GameEvent::BossPhaseChanged { phase: 2 });
        assert_eq!(queue.iter().count(), 2);
        assert_eq!(queue.len(), 2);
        queue.clear();
        assert!(queue.is_empty());
    }
}
