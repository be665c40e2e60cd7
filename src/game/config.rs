//! Game configuration
//!
//! Every tunable number lives here with its default. `assets/config.ron`
//! may override any subset; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::rasterizer::Color;
use super::runtime::FpsLimit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Units per second
    pub move_speed: f32,
    /// Radians per second
    pub turn_speed: f32,
    /// Radians per mouse pixel
    pub mouse_sensitivity: f32,
    pub max_hp: f32,
    pub start_armor: f32,
    pub max_armor: f32,
    pub start_ammo: u32,
    pub max_ammo: u32,
    /// Clearance kept from walls when moving
    pub wall_margin: f32,
    /// Share of incoming damage armour soaks up
    pub armor_absorb: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.5,
            turn_speed: 2.2,
            mouse_sensitivity: 0.0025,
            max_hp: 100.0,
            start_armor: 0.0,
            max_armor: 100.0,
            start_ammo: 3,
            max_ammo: 99,
            wall_margin: 0.3,
            armor_absorb: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub shot_damage: i32,
    pub shot_speed: f32,
    pub shot_cooldown: f32,
    pub lobbed_damage: i32,
    pub lobbed_splash: f32,
    pub lobbed_speed: f32,
    pub lobbed_cooldown: f32,
    /// Initial upward speed, units per second
    pub lobbed_launch_vz: f32,
    /// Units per second squared
    pub lobbed_gravity: f32,
    /// Seconds before ground contact can detonate
    pub lobbed_fuse: f32,
    pub beam_damage: i32,
    pub beam_speed: f32,
    pub beam_cooldown: f32,
    pub enemy_shot_hit_radius: f32,
    pub direct_hit_radius: f32,
    /// Seconds before any projectile expires
    pub max_age: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            shot_damage: 12,
            shot_speed: 12.0,
            shot_cooldown: 0.18,
            lobbed_damage: 55,
            lobbed_splash: 1.8,
            lobbed_speed: 6.0,
            lobbed_cooldown: 1.0,
            // 0.18 per tick and 0.012 per tick² at 60 ticks per second
            lobbed_launch_vz: 10.8,
            lobbed_gravity: 43.2,
            lobbed_fuse: 0.2,
            beam_damage: 60,
            beam_speed: 18.0,
            beam_cooldown: 0.108,
            enemy_shot_hit_radius: 0.3,
            direct_hit_radius: 0.6,
            max_age: 3.0,
        }
    }
}

/// The overdrive meter: fills over time, spent as a timed powered-up mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialConfig {
    /// Charge per second while inactive
    pub charge_rate: f32,
    pub kill_bonus: f32,
    /// Charge per second while active
    pub drain_rate: f32,
    pub max_charge: f32,
}

impl Default for SpecialConfig {
    fn default() -> Self {
        Self { charge_rate: 6.08, kill_bonus: 15.0, drain_rate: 8.0, max_charge: 100.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub heal: f32,
    pub armor: f32,
    pub energy: f32,
    pub ammo: u32,
    pub collect_radius: f32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self { heal: 25.0, armor: 20.0, energy: 30.0, ammo: 2, collect_radius: 0.4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub torch_flicker_speed: f32,
    pub torch_flicker_amp: f32,
    /// Pixels of shake at full trauma
    pub shake_magnitude: f32,
    /// Trauma lost per second
    pub shake_decay: f32,
    pub explosion_particles: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            torch_flicker_speed: 0.08,
            torch_flicker_amp: 0.18,
            shake_magnitude: 18.0,
            shake_decay: 2.5,
            explosion_particles: 32,
        }
    }
}

/// Ceiling and floor gradient stops plus a HUD accent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub ceiling: [[u8; 3]; 2],
    pub floor: [[u8; 3]; 2],
    pub accent: [u8; 3],
}

impl Palette {
    pub fn ceiling_colors(&self) -> (Color, Color) {
        (Color::from_rgb(self.ceiling[0]), Color::from_rgb(self.ceiling[1]))
    }

    pub fn floor_colors(&self) -> (Color, Color) {
        (Color::from_rgb(self.floor[0]), Color::from_rgb(self.floor[1]))
    }
}

pub fn default_palettes() -> Vec<Palette> {
    vec![
        // Desert
        Palette {
            ceiling: [[0x3a, 0x20, 0x10], [0x20, 0x0c, 0x06]],
            floor: [[0x8b, 0x69, 0x14], [0x5a, 0x40, 0x10]],
            accent: [0xc8, 0x70, 0x20],
        },
        // Molten
        Palette {
            ceiling: [[0x20, 0x08, 0x08], [0x0a, 0x02, 0x02]],
            floor: [[0x4a, 0x1a, 0x08], [0x20, 0x0a, 0x04]],
            accent: [0xff, 0x40, 0x20],
        },
        // Crystal
        Palette {
            ceiling: [[0x08, 0x08, 0x18], [0x02, 0x02, 0x08]],
            floor: [[0x1a, 0x1a, 0x3a], [0x0a, 0x0a, 0x18]],
            accent: [0x80, 0x60, 0xff],
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub weapons: WeaponConfig,
    pub special: SpecialConfig,
    pub pickups: PickupConfig,
    pub effects: EffectsConfig,
    pub palettes: Vec<Palette>,
    pub fps_limit: FpsLimit,
    /// Timing overlay on start
    pub show_debug: bool,
    /// Seed for loot rolls and effects; random when absent
    pub seed: Option<u64>,
    /// Load levels from this directory instead of the built-in set (native only)
    pub levels_dir: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            weapons: WeaponConfig::default(),
            special: SpecialConfig::default(),
            pickups: PickupConfig::default(),
            effects: EffectsConfig::default(),
            palettes: default_palettes(),
            fps_limit: FpsLimit::default(),
            show_debug: false,
            seed: None,
            levels_dir: None,
        }
    }
}

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl GameConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let mut config: GameConfig = ron::from_str(s)?;
        if config.palettes.is_empty() {
            log::warn!("config has no palettes, using defaults");
            config.palettes = default_palettes();
        }
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Parse config text, falling back to defaults with a warning
    pub fn from_ron_or_default(text: Option<&str>) -> Self {
        match text {
            None => {
                log::info!("no config file, using defaults");
                Self::default()
            }
            Some(text) => Self::from_ron_str(text).unwrap_or_else(|e| {
                log::warn!("config ignored: {}", e);
                Self::default()
            }),
        }
    }

    /// Palette for a level, falling back to the first one
    pub fn palette(&self, index: usize) -> Palette {
        self.palettes
            .get(index)
            .or_else(|| self.palettes.first())
            .copied()
            .unwrap_or(default_palettes()[0])
    }
}
