//! Art assets
//!
//! Wall textures and billboard sprites are painted procedurally at start-up.
//! Any of them can be replaced by a PNG under `assets/textures/`; files that
//! are missing or fail to decode keep the painted version.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::rasterizer::{Color, Texture, TEXTURE_SIZE};
use crate::world::codes;
use super::enemy::{BehaviorState, Enemy, EnemyKind};
use super::pickup::PickupKind;

/// Directory probed for PNG overrides
pub const TEXTURE_DIR: &str = "assets/textures";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyFrame {
    Idle,
    Hurt,
    Attack,
    Death,
    Phase2,
    Phase3,
}

impl EnemyFrame {
    /// Frame for an enemy's current state
    pub fn for_enemy(enemy: &Enemy) -> Self {
        match enemy.state {
            BehaviorState::Death => EnemyFrame::Death,
            BehaviorState::Hurt => EnemyFrame::Hurt,
            BehaviorState::Attack => EnemyFrame::Attack,
            _ if enemy.is_boss() && enemy.phase == 3 => EnemyFrame::Phase3,
            _ if enemy.is_boss() && enemy.phase == 2 => EnemyFrame::Phase2,
            _ => EnemyFrame::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Enemy(EnemyKind, EnemyFrame),
    Pickup(PickupKind),
}

impl SpriteKey {
    /// Base file name of the PNG override, if this sprite accepts one
    fn file_name(self) -> Option<&'static str> {
        match self {
            SpriteKey::Enemy(kind, EnemyFrame::Idle) => Some(match kind {
                EnemyKind::Spitter => "spitter",
                EnemyKind::Roller => "roller",
                EnemyKind::Barrel => "barrel",
                EnemyKind::Boss => "boss",
            }),
            SpriteKey::Enemy(..) => None,
            SpriteKey::Pickup(kind) => Some(match kind {
                PickupKind::Health => "health",
                PickupKind::Armor => "armor",
                PickupKind::Ammo => "ammo",
                PickupKind::Key => "key",
                PickupKind::Energy => "energy",
            }),
        }
    }
}

/// Every texture the renderer samples
pub struct ArtAssets {
    walls: HashMap<u8, Texture>,
    sprites: HashMap<SpriteKey, Texture>,
}

const WALL_CODES: [u8; 7] = [1, 2, 3, 4, 5, codes::DOOR, codes::EXIT];
const ENEMY_KINDS: [EnemyKind; 4] = [EnemyKind::Spitter, EnemyKind::Roller, EnemyKind::Barrel, EnemyKind::Boss];
const PICKUP_KINDS: [PickupKind; 5] =
    [PickupKind::Health, PickupKind::Armor, PickupKind::Ammo, PickupKind::Key, PickupKind::Energy];

impl ArtAssets {
    /// Paint every texture. `seed` drives the speckle noise.
    pub fn procedural(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let walls = WALL_CODES.iter().map(|&code| (code, paint_wall(code, &mut rng))).collect();

        let mut sprites = HashMap::new();
        for kind in ENEMY_KINDS {
            let frames: &[EnemyFrame] = if kind == EnemyKind::Boss {
                &[EnemyFrame::Idle, EnemyFrame::Hurt, EnemyFrame::Attack, EnemyFrame::Death, EnemyFrame::Phase2, EnemyFrame::Phase3]
            } else {
                &[EnemyFrame::Idle, EnemyFrame::Hurt, EnemyFrame::Attack, EnemyFrame::Death]
            };
            for &frame in frames {
                sprites.insert(SpriteKey::Enemy(kind, frame), paint_enemy(kind, frame));
            }
        }
        for kind in PICKUP_KINDS {
            sprites.insert(SpriteKey::Pickup(kind), paint_pickup(kind));
        }

        Self { walls, sprites }
    }

    /// Texture for a wall cell code: known codes have their own, the rest use stone
    pub fn wall(&self, code: u8) -> Option<&Texture> {
        self.walls.get(&code).or_else(|| self.walls.get(&2))
    }

    pub fn sprite(&self, key: SpriteKey) -> Option<&Texture> {
        self.sprites.get(&key)
    }

    pub fn enemy_sprite(&self, enemy: &Enemy) -> Option<&Texture> {
        self.sprite(SpriteKey::Enemy(enemy.kind, EnemyFrame::for_enemy(enemy)))
            .or_else(|| self.sprite(SpriteKey::Enemy(enemy.kind, EnemyFrame::Idle)))
    }

    /// Relative paths of every PNG that may override a painted texture
    pub fn override_paths() -> Vec<String> {
        let walls = WALL_CODES.iter().map(|&c| wall_file_name(c));
        let sprites = ENEMY_KINDS
            .iter()
            .map(|&k| SpriteKey::Enemy(k, EnemyFrame::Idle))
            .chain(PICKUP_KINDS.iter().map(|&k| SpriteKey::Pickup(k)))
            .filter_map(|k| k.file_name().map(str::to_string));
        walls
            .chain(sprites)
            .map(|name| format!("{}/{}.png", TEXTURE_DIR, name))
            .collect()
    }

    /// Replace the texture named by `path` with decoded PNG bytes
    pub fn apply_png(&mut self, path: &str, bytes: &[u8]) -> Result<(), String> {
        let name = path
            .rsplit('/')
            .next()
            .and_then(|f| f.strip_suffix(".png"))
            .ok_or_else(|| format!("not a texture path: {}", path))?;
        let texture = Texture::from_png_bytes(bytes, name)?;

        if let Some(&code) = WALL_CODES.iter().find(|&&c| wall_file_name(c) == name) {
            self.walls.insert(code, texture);
            return Ok(());
        }
        let key = self
            .sprites
            .keys()
            .copied()
            .find(|k| k.file_name() == Some(name))
            .ok_or_else(|| format!("unknown texture name: {}", name))?;
        self.sprites.insert(key, texture);
        Ok(())
    }
}

fn wall_file_name(code: u8) -> String {
    match code {
        codes::DOOR => "door".to_string(),
        codes::EXIT => "exit".to_string(),
        c => format!("wall_{}", c),
    }
}

// =============================================================================
// Painting helpers
// =============================================================================

fn hex(s: &str) -> Color {
    Color::from_hex(s).unwrap_or(Color::new(255, 0, 255))
}

fn fill_ellipse(tex: &mut Texture, cx: f32, cy: f32, rx: f32, ry: f32, color: Color) {
    for y in 0..tex.height {
        for x in 0..tex.width {
            let dx = (x as f32 + 0.5 - cx) / rx;
            let dy = (y as f32 + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                tex.set(x, y, color);
            }
        }
    }
}

fn ring(tex: &mut Texture, cx: f32, cy: f32, r: f32, width: f32, color: Color) {
    for y in 0..tex.height {
        for x in 0..tex.width {
            let d = ((x as f32 + 0.5 - cx).powi(2) + (y as f32 + 0.5 - cy).powi(2)).sqrt();
            if (d - r).abs() <= width * 0.5 {
                tex.set(x, y, color);
            }
        }
    }
}

fn line(tex: &mut Texture, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color) {
    let steps = ((x1 - x0).abs().max((y1 - y0).abs()) * 2.0).ceil().max(1.0) as usize;
    let r = (width * 0.5).max(0.5);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = x0 + (x1 - x0) * t;
        let y = y0 + (y1 - y0) * t;
        let (xa, xb) = ((x - r).floor().max(0.0) as usize, (x + r).ceil() as usize);
        let (ya, yb) = ((y - r).floor().max(0.0) as usize, (y + r).ceil() as usize);
        for py in ya..yb {
            for px in xa..xb {
                tex.set(px, py, color);
            }
        }
    }
}

/// Convex polygon fill by half-plane tests
fn fill_polygon(tex: &mut Texture, points: &[(f32, f32)], color: Color) {
    let n = points.len();
    if n < 3 {
        return;
    }
    for y in 0..tex.height {
        for x in 0..tex.width {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let mut sign = 0.0f32;
            let inside = (0..n).all(|i| {
                let (ax, ay) = points[i];
                let (bx, by) = points[(i + 1) % n];
                let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
                if cross == 0.0 {
                    return true;
                }
                if sign == 0.0 {
                    sign = cross.signum();
                }
                cross.signum() == sign
            });
            if inside {
                tex.set(x, y, color);
            }
        }
    }
}

/// Blend `color` over every opaque texel
fn tint(tex: &mut Texture, color: Color, alpha: f32) {
    for p in tex.pixels.iter_mut().filter(|p| !p.is_transparent()) {
        let a = p.a;
        *p = p.lerp(color, alpha);
        p.a = a;
    }
}

fn speckle(tex: &mut Texture, rng: &mut StdRng, count: usize, w: usize, h: usize, color: Color, alpha: f32) {
    for _ in 0..count {
        let x = rng.gen_range(0..tex.width);
        let y = rng.gen_range(0..tex.height);
        for yy in y..(y + h).min(tex.height) {
            for xx in x..(x + w).min(tex.width) {
                let c = tex.get(xx, yy).lerp(color, alpha);
                tex.set(xx, yy, c);
            }
        }
    }
}

// =============================================================================
// Walls
// =============================================================================

fn paint_wall(code: u8, rng: &mut StdRng) -> Texture {
    let s = TEXTURE_SIZE;
    let sf = s as f32;
    match code {
        // Adobe brick
        1 => {
            let mut t = Texture::wall("adobe", hex("#c8a060"));
            let mortar = hex("#7a5030");
            for y in (0..s).step_by(12) {
                t.fill_rect(0, y, s, 2, mortar);
            }
            for y in (0..s).step_by(24) {
                for x in (0..s).step_by(16) {
                    t.fill_rect(x, y + 12, 2, 12, mortar);
                }
                for x in (8..s).step_by(16) {
                    t.fill_rect(x, y, 2, 12, mortar);
                }
            }
            speckle(&mut t, rng, 80, 2, 2, Color::BLACK, 0.08);
            t
        }
        // Dark stone
        2 => {
            let mut t = Texture::wall("stone", hex("#504030"));
            for y in (0..s).step_by(10) {
                for x in (0..s).step_by(10) {
                    if (x + y) % 20 == 0 {
                        t.fill_rect(x, y, 9, 9, hex("#382818"));
                    }
                }
            }
            speckle(&mut t, rng, 40, 3, 1, hex("#605040"), 1.0);
            t
        }
        // Mossy green
        3 => {
            let mut t = Texture::wall("moss", hex("#3a5830"));
            speckle(&mut t, rng, 60, 3, 5, hex("#507840"), 1.0);
            for y in (0..s).step_by(8) {
                t.fill_rect(0, y, s, 1, hex("#284020"));
            }
            t
        }
        // Molten rock with glowing cracks
        4 => {
            let mut t = Texture::wall("lava", hex("#2a0800"));
            let crack = hex("#ff6020");
            for _ in 0..6 {
                let (x0, xm, x1) = (rng.gen_range(0.0..sf), rng.gen_range(0.0..sf), rng.gen_range(0.0..sf));
                line(&mut t, x0, 0.0, xm, sf * 0.5, 2.0, crack);
                line(&mut t, xm, sf * 0.5, x1, sf, 2.0, crack);
            }
            speckle(&mut t, rng, 20, 4, 2, hex("#ff5000"), 0.3);
            t
        }
        // Crystal lair
        5 => {
            let mut t = Texture::wall("crystal", hex("#0a0820"));
            for _ in 0..8 {
                let (px, py) = (rng.gen_range(0.0..sf), rng.gen_range(0.0..sf));
                let size = rng.gen_range(4.0..14.0);
                fill_polygon(&mut t, &[(px, py), (px + size, py + size * 2.0), (px - size, py + size * 2.0)], hex("#4030a0"));
            }
            speckle(&mut t, rng, 30, 2, 2, hex("#7850ff"), 0.4);
            t
        }
        codes::DOOR => {
            let mut t = Texture::wall("door", hex("#606060"));
            t.fill_rect(4, 4, s - 8, s - 8, hex("#808080"));
            t.fill_rect(0, s / 2 - 2, s, 4, hex("#404040"));
            t.fill_rect(s / 2 - 2, 0, 4, s, hex("#404040"));
            for (x, y) in [(8.0, 8.0), (sf - 12.0, 8.0), (8.0, sf - 12.0), (sf - 12.0, sf - 12.0)] {
                t.fill_circle(x, y, 3.0, hex("#a0a0a0"));
            }
            t
        }
        codes::EXIT => {
            let mut t = Texture::wall("exit", hex("#050505"));
            let (x, w) = ((sf * 0.2) as usize, (sf * 0.6) as usize);
            t.fill_rect(x - 2, x - 2, w + 4, w + 4, hex("#80ffb0"));
            t.fill_rect(x, x, w, w, hex("#40ff80"));
            t
        }
        _ => Texture::wall("unknown", hex("#504030")),
    }
}

// =============================================================================
// Sprites
// =============================================================================

fn eyes(t: &mut Texture, cx: f32, cy: f32, spread: f32, r: f32, iris: Color) {
    for ex in [cx - spread, cx + spread] {
        t.fill_circle(ex, cy, r, iris);
        t.fill_circle(ex, cy, r * 0.5, Color::BLACK);
    }
}

fn crossed_eyes(t: &mut Texture, cx: f32, cy: f32, spread: f32, color: Color) {
    for ex in [cx - spread, cx + spread] {
        line(t, ex - 3.0, cy - 3.0, ex + 3.0, cy + 3.0, 2.0, color);
        line(t, ex + 3.0, cy - 3.0, ex - 3.0, cy + 3.0, 2.0, color);
    }
}

fn paint_enemy(kind: EnemyKind, frame: EnemyFrame) -> Texture {
    let hurt = frame == EnemyFrame::Hurt;
    let dead = frame == EnemyFrame::Death;
    let pick = |normal: &str, hurt_c: &str, dead_c: &str| {
        hex(if dead {
            dead_c
        } else if hurt {
            hurt_c
        } else {
            normal
        })
    };

    let (mut t, attack_tint) = match kind {
        EnemyKind::Spitter => {
            let mut t = Texture::new(64, 64);
            let (cx, cy) = (32.0, 36.0);
            t.fill_circle(cx, cy, 18.0, pick("#4a8a40", "#aaffaa", "#3a4a30"));
            if dead {
                crossed_eyes(&mut t, cx, cy - 5.0, 7.0, hex("#ff0000"));
            } else {
                let spine = hex("#206020");
                for i in 0..8 {
                    let a = i as f32 / 8.0 * std::f32::consts::TAU;
                    line(&mut t, cx + a.cos() * 18.0, cy + a.sin() * 18.0, cx + a.cos() * 26.0, cy + a.sin() * 26.0, 2.0, spine);
                }
                eyes(&mut t, cx, cy - 5.0, 7.0, 4.0, hex("#ff2020"));
                line(&mut t, cx - 5.0, cy + 7.0, cx + 5.0, cy + 7.0, 2.0, spine);
            }
            (t, Color::rgba(255, 255, 0, 255))
        }
        EnemyKind::Roller => {
            let mut t = Texture::new(48, 48);
            let (cx, cy) = (24.0, 30.0);
            t.fill_circle(cx, cy, 14.0, pick("#60a050", "#ccffcc", "#506040"));
            if dead {
                crossed_eyes(&mut t, cx, cy, 0.0, hex("#ff4040"));
            } else {
                let spine = hex("#304020");
                for i in 0..12 {
                    let a = i as f32 / 12.0 * std::f32::consts::TAU;
                    line(&mut t, cx + a.cos() * 14.0, cy + a.sin() * 14.0, cx + a.cos() * 22.0, cy + a.sin() * 22.0, 2.0, spine);
                }
                t.fill_circle(cx, cy, 4.0, hex("#ff1010"));
            }
            (t, Color::new(255, 100, 0))
        }
        EnemyKind::Barrel => {
            let mut t = Texture::new(72, 80);
            let (cx, cy) = (36.0, 44.0);
            fill_ellipse(&mut t, cx, cy, 16.0, 22.0, pick("#3a6030", "#aaffcc", "#304828"));
            if !dead {
                let band = hex("#204018");
                for dy in [-10.0, 0.0, 10.0] {
                    line(&mut t, cx - 15.0, cy + dy, cx + 15.0, cy + dy, 3.0, band);
                }
                let spine = hex("#507040");
                for i in -2..=2 {
                    let y = cy + i as f32 * 6.0;
                    line(&mut t, cx - 16.0, y, cx - 24.0, y, 2.0, spine);
                    line(&mut t, cx + 16.0, y, cx + 24.0, y, 2.0, spine);
                }
                eyes(&mut t, cx, cy - 6.0, 6.0, 4.0, hex("#ff2020"));
            } else {
                tint(&mut t, Color::new(80, 0, 0), 0.5);
            }
            (t, Color::new(255, 60, 0))
        }
        EnemyKind::Boss => {
            let phase = match frame {
                EnemyFrame::Phase3 => 3,
                EnemyFrame::Phase2 => 2,
                _ => 1,
            };
            let mut t = Texture::new(96, 120);
            let (cx, cy) = (48.0, 60.0);
            let body = if dead {
                hex("#300820")
            } else if hurt {
                hex("#ffaacc")
            } else {
                hex(match phase {
                    3 => "#200010",
                    2 => "#400020",
                    _ => "#600040",
                })
            };
            fill_polygon(&mut t, &[(cx - 24.0, 112.0), (cx - 18.0, cy + 10.0), (cx + 18.0, cy + 10.0), (cx + 24.0, 112.0)], body);
            // Hair behind the head
            fill_ellipse(&mut t, cx, cy - 30.0, 22.0, 30.0, if dead { hex("#403030") } else if phase >= 2 { hex("#800040") } else { hex("#c04060") });
            t.fill_circle(cx, cy - 14.0, 18.0, pick("#f0b0a0", "#ffccdd", "#503040"));
            if dead {
                tint(&mut t, Color::new(100, 0, 50), 0.6);
            } else {
                eyes(&mut t, cx, cy - 16.0, 7.0, 5.0, if phase == 3 { hex("#ff0000") } else { hex("#cc00cc") });
                line(&mut t, cx - 8.0, cy - 6.0, cx + 8.0, cy - 6.0, 2.0, hex("#803050"));
                let claw = if phase >= 2 { hex("#ff0080") } else { hex("#cc4080") };
                for i in 0..3 {
                    let o = i as f32 * 3.0;
                    line(&mut t, cx - 22.0 + o, cy + 10.0, cx - 26.0 + o, cy + 24.0, 3.0, claw);
                    line(&mut t, cx + 22.0 - o, cy + 10.0, cx + 26.0 - o, cy + 24.0, 3.0, claw);
                }
                if phase == 3 {
                    ring(&mut t, cx, cy, 44.0, 4.0, Color::rgba(255, 0, 100, 160));
                }
            }
            (t, Color::new(255, 0, 150))
        }
    };

    if frame == EnemyFrame::Attack {
        tint(&mut t, attack_tint, 0.35);
    }
    t.name = format!("{:?}_{:?}", kind, frame).to_lowercase();
    t
}

fn paint_pickup(kind: PickupKind) -> Texture {
    let mut t = Texture::new(48, 48);
    match kind {
        // Coffee cup
        PickupKind::Health => {
            fill_polygon(&mut t, &[(10.0, 12.0), (38.0, 12.0), (34.0, 42.0), (14.0, 42.0)], hex("#f0e0c0"));
            t.fill_rect(12, 14, 24, 10, hex("#3a1a00"));
            fill_ellipse(&mut t, 24.0, 14.0, 12.0, 4.0, hex("#c08040"));
            ring(&mut t, 38.0, 27.0, 8.0, 3.0, hex("#d0c0a0"));
        }
        PickupKind::Armor => {
            let shield = |s: f32| {
                [(24.0, 24.0 - 20.0 * s), (24.0 + 16.0 * s, 24.0 - 12.0 * s), (24.0 + 16.0 * s, 24.0 + 4.0 * s),
                 (24.0, 24.0 + 20.0 * s), (24.0 - 16.0 * s, 24.0 + 4.0 * s), (24.0 - 16.0 * s, 24.0 - 12.0 * s)]
            };
            fill_polygon(&mut t, &shield(1.0), hex("#8090b0"));
            fill_polygon(&mut t, &shield(0.65), hex("#a0b0d0"));
            t.fill_circle(24.0, 24.0, 5.0, hex("#c0d0f0"));
        }
        // Baguette
        PickupKind::Ammo => {
            line(&mut t, 8.0, 34.0, 40.0, 14.0, 12.0, hex("#d4a050"));
            for i in 0..3 {
                let x = 16.0 + i as f32 * 8.0;
                line(&mut t, x, 28.0 - i as f32 * 5.0, x + 4.0, 24.0 - i as f32 * 5.0, 1.5, hex("#a07030"));
            }
        }
        PickupKind::Key => {
            ring(&mut t, 16.0, 24.0, 8.0, 4.0, hex("#ffd040"));
            t.fill_rect(22, 22, 20, 4, hex("#ffd040"));
            t.fill_rect(34, 26, 3, 6, hex("#ffd040"));
            t.fill_rect(39, 26, 3, 8, hex("#ffd040"));
        }
        // Lightning bolt
        PickupKind::Energy => {
            t.fill_circle(24.0, 24.0, 20.0, Color::rgba(60, 120, 255, 90));
            fill_polygon(&mut t, &[(28.0, 4.0), (14.0, 26.0), (24.0, 26.0)], hex("#ffff60"));
            fill_polygon(&mut t, &[(24.0, 22.0), (34.0, 22.0), (20.0, 44.0)], hex("#ffff60"));
        }
    }
    t.name = format!("{:?}", kind).to_lowercase();
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Vec2;

    #[test]
    fn test_every_texture_painted() {
        let art = ArtAssets::procedural(3);
        for code in WALL_CODES {
            let t = art.wall(code).unwrap();
            assert_eq!((t.width, t.height), (TEXTURE_SIZE, TEXTURE_SIZE));
        }
        // Unknown codes fall back to stone
        assert_eq!(art.wall(7).unwrap().name, "stone");
        for kind in PICKUP_KINDS {
            let t = art.sprite(SpriteKey::Pickup(kind)).unwrap();
            assert!(t.pixels.iter().any(|p| !p.is_transparent()));
        }
        assert!(art.sprite(SpriteKey::Enemy(EnemyKind::Boss, EnemyFrame::Phase3)).is_some());
        assert!(art.sprite(SpriteKey::Enemy(EnemyKind::Roller, EnemyFrame::Phase3)).is_none());
    }

    #[test]
    fn test_frame_follows_state() {
        let art = ArtAssets::procedural(3);
        let mut boss = Enemy::new(EnemyKind::Boss, Vec2::ZERO);
        boss.state = BehaviorState::Chase;
        boss.phase = 2;
        assert_eq!(EnemyFrame::for_enemy(&boss), EnemyFrame::Phase2);
        boss.state = BehaviorState::Hurt;
        assert_eq!(EnemyFrame::for_enemy(&boss), EnemyFrame::Hurt);
        assert_eq!(art.enemy_sprite(&boss).unwrap().name, "boss_hurt");

        let roller = Enemy::new(EnemyKind::Roller, Vec2::ZERO);
        assert_eq!(art.enemy_sprite(&roller).unwrap().name, "roller_idle");
    }

    #[test]
    fn test_override_paths() {
        let paths = ArtAssets::override_paths();
        assert!(paths.contains(&"assets/textures/wall_1.png".to_string()));
        assert!(paths.contains(&"assets/textures/door.png".to_string()));
        assert!(paths.contains(&"assets/textures/key.png".to_string()));
        assert_eq!(paths.len(), WALL_CODES.len() + ENEMY_KINDS.len() + PICKUP_KINDS.len());
    }

    #[test]
    fn test_bad_png_keeps_painted() {
        let mut art = ArtAssets::procedural(3);
        assert!(art.apply_png("assets/textures/key.png", b"not a png").is_err());
        assert_eq!(art.sprite(SpriteKey::Pickup(PickupKind::Key)).unwrap().name, "key");
    }

    #[test]
    fn test_png_override() {
        let mut bytes = Vec::new();
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();

        let mut art = ArtAssets::procedural(3);
        art.apply_png("assets/textures/wall_3.png", &bytes).unwrap();
        assert_eq!(art.wall(3).unwrap().width, 2);
        art.apply_png("assets/textures/spitter.png", &bytes).unwrap();
        let spitter = Enemy::new(EnemyKind::Spitter, Vec2::ZERO);
        assert_eq!(art.enemy_sprite(&spitter).unwrap().get(0, 0), Color::new(10, 20, 30));
        assert!(art.apply_png("assets/textures/nothing.png", &bytes).is_err());
    }
}
