//! Text HUD
//!
//! Status line, boss bar, screen banners and a short message log. Drawn with
//! macroquad text on top of the presented framebuffer.

use macroquad::prelude::*;

use crate::game::enemy::EnemyKind;
use crate::game::pickup::PickupKind;
use crate::game::runtime::LEVEL_INTRO_TIME;
use crate::game::{EventQueue, GameEvent, GameSession, Screen};
use crate::rasterizer::{clamp, ease_in_quad, ease_out_bounce};

/// Messages kept on screen at once
pub const MAX_MESSAGES: usize = 5;
/// Seconds a message stays up
pub const MESSAGE_TIME: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub remaining: f32,
}

/// Player-facing line for an event, if it deserves one
pub fn message_for(event: &GameEvent) -> Option<String> {
    let text = match event {
        GameEvent::EnemyKilled { kind, score, .. } => format!("{} down +{}", kind.name(), score),
        GameEvent::PickupCollected { kind } => match kind {
            PickupKind::Health => "Coffee refill".to_string(),
            PickupKind::Armor => "Armour up".to_string(),
            PickupKind::Ammo => "Grenades +2".to_string(),
            PickupKind::Key => "Picked up the key".to_string(),
            PickupKind::Energy => "Overdrive charge".to_string(),
        },
        GameEvent::OutOfAmmo => "Out of grenades".to_string(),
        GameEvent::SpecialNotReady => "Overdrive not charged".to_string(),
        GameEvent::SpecialModeStarted => "OVERDRIVE!".to_string(),
        GameEvent::SpecialModeEnded => "Overdrive spent".to_string(),
        GameEvent::DoorOpened { .. } => "Door opened".to_string(),
        GameEvent::ExitLocked => "The exit is locked. Find the key".to_string(),
        GameEvent::BossIntro => format!("{} awakens!", EnemyKind::Boss.name()),
        GameEvent::BossPhaseChanged { phase } => format!("{} enters phase {}", EnemyKind::Boss.name(), phase),
        GameEvent::BossDefeated => format!("{} defeated!", EnemyKind::Boss.name()),
        GameEvent::LevelStarted { index, name } => format!("Level {}: {}", index + 1, name),
        _ => return None,
    };
    Some(text)
}

#[derive(Debug, Default)]
pub struct Hud {
    messages: Vec<Message>,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push(&mut self, text: String) {
        self.messages.push(Message { text, remaining: MESSAGE_TIME });
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    /// Drain the frame's events into the message log
    pub fn absorb(&mut self, events: &mut EventQueue<GameEvent>) {
        for event in events.drain() {
            log::debug!("{:?}", event);
            if let Some(text) = message_for(&event) {
                self.push(text);
            }
        }
    }

    pub fn update(&mut self, dt: f32) {
        for m in &mut self.messages {
            m.remaining -= dt;
        }
        self.messages.retain(|m| m.remaining > 0.0);
    }

    /// Draw over the game view `rect` (x, y, w, h in window pixels)
    pub fn draw(&self, session: &GameSession, rect: (f32, f32, f32, f32)) {
        let (x, y, w, h) = rect;
        let scale = (h / 240.0).max(1.0);
        let size = 10.0 * scale;
        let accent = session.config.palette(session.world.level.palette).accent;
        let accent = Color::from_rgba(accent[0], accent[1], accent[2], 255);

        match session.screen {
            Screen::Title => {
                self.banner("DECAF RISING", "Press Enter to start", rect, accent);
                return;
            }
            Screen::LevelIntro { remaining } => {
                let level = &session.world.level;
                let title = format!("Level {}: {}", session.level_index() + 1, level.name);
                // Card drops in from above
                let t = clamp((LEVEL_INTRO_TIME - remaining) / 0.6, 0.0, 1.0);
                let drop = (1.0 - ease_out_bounce(t)) * h * 0.4;
                self.banner(&title, &level.blurb, (x, y - drop, w, h), accent);
                return;
            }
            Screen::GameOver => {
                let sub = format!("Score {}  Kills {}  (Enter)", session.world.player.score, session.world.stats.kills);
                self.banner("YOU CRASHED", &sub, rect, RED);
                return;
            }
            Screen::Victory => {
                let sub = format!("Score {}  Kills {}  (Enter)", session.world.player.score, session.world.stats.kills);
                self.banner("FULLY CAFFEINATED", &sub, rect, GOLD);
                return;
            }
            Screen::Playing => {}
        }

        let p = &session.world.player;
        let status = format!(
            "HP {:>3}  AR {:>3}  GR {:>2}  OD {:>3}%  {}  SCORE {}",
            p.hp.ceil() as i32,
            p.armor.ceil() as i32,
            p.ammo,
            (p.charge / p.max_charge.max(1.0) * 100.0) as i32,
            if p.has_key { "KEY" } else { "---" },
            p.score,
        );
        draw_rectangle(x, y + h - size * 1.8, w, size * 1.8, Color::from_rgba(0, 0, 0, 160));
        draw_text(&status, x + size * 0.5, y + h - size * 0.5, size * 1.2, if p.special_active { SKYBLUE } else { WHITE });

        if let Some(boss) = session.world.boss().filter(|b| !b.dead) {
            let bar_w = w * 0.5;
            let bar_x = x + (w - bar_w) / 2.0;
            let bar_y = y + size;
            let frac = boss.hp as f32 / boss.max_hp.max(1) as f32;
            draw_rectangle(bar_x, bar_y, bar_w, size * 0.8, Color::from_rgba(60, 0, 0, 200));
            draw_rectangle(bar_x, bar_y, bar_w * frac, size * 0.8, accent);
            draw_text(boss.kind.name(), bar_x, bar_y - size * 0.2, size, WHITE);
        }

        for (i, m) in self.messages.iter().enumerate() {
            let alpha = 1.0 - ease_in_quad(1.0 - (m.remaining / 0.5).min(1.0));
            let line_y = y + size * 4.0 + i as f32 * size * 1.2;
            draw_text(&m.text, x + size * 0.5, line_y, size * 1.1, Color::new(1.0, 1.0, 1.0, alpha));
        }

        if session.show_debug {
            let t = &session.timings;
            let line = format!(
                "FPS {} ({})  in {:.1}  logic {:.1}  render {:.1}  upload {:.1}  ui {:.1}  total {:.1} ms",
                get_fps(),
                session.fps_limit.label(),
                t.input_ms,
                t.logic_ms,
                t.render_ms,
                t.upload_ms,
                t.ui_ms,
                t.total_ms,
            );
            draw_text(&line, x + 4.0, y + 14.0, 16.0, YELLOW);
        }
    }

    fn banner(&self, title: &str, subtitle: &str, rect: (f32, f32, f32, f32), color: Color) {
        let (x, y, w, h) = rect;
        let scale = (h / 240.0).max(1.0);
        draw_rectangle(x, y + h * 0.35, w, h * 0.3, Color::from_rgba(0, 0, 0, 180));

        let title_size = 24.0 * scale;
        let dims = measure_text(title, None, title_size as u16, 1.0);
        draw_text(title, x + (w - dims.width) / 2.0, y + h * 0.47, title_size, color);

        let sub_size = 10.0 * scale;
        let dims = measure_text(subtitle, None, sub_size as u16, 1.0);
        draw_text(subtitle, x + (w - dims.width) / 2.0, y + h * 0.58, sub_size, WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Vec2;

    #[test]
    fn test_absorb_drains_and_logs() {
        let mut hud = Hud::new();
        let mut events = EventQueue::new();
        events.send(GameEvent::ExitLocked);
        events.send(GameEvent::WeaponFired { kind: crate::game::projectile::ProjectileKind::Shot });
        events.send(GameEvent::EnemyKilled { kind: EnemyKind::Roller, position: Vec2::ZERO, score: 150 });
        hud.absorb(&mut events);
        assert!(events.is_empty());
        assert_eq!(hud.messages().len(), 2);
        assert_eq!(hud.messages()[1].text, "Roller down +150");
    }

    #[test]
    fn test_log_is_capped_and_expires() {
        let mut hud = Hud::new();
        for i in 0..8 {
            hud.push(format!("m{}", i));
        }
        assert_eq!(hud.messages().len(), MAX_MESSAGES);
        assert_eq!(hud.messages()[0].text, "m3");
        hud.update(MESSAGE_TIME + 0.1);
        assert!(hud.messages().is_empty());
    }
}
