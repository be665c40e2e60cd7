//! Game Renderer
//!
//! Software raycaster drawing into a 320x240 framebuffer, which is then
//! uploaded as a texture and scaled to the window.
//!
//! Pass order: floor/ceiling gradient, DDA walls (filling the depth buffer),
//! depth-sorted billboards, particles, then the weapon overlay.

use macroquad::prelude::*;

use crate::rasterizer::{
    cast_ray, project, Color as RasterColor, DepthBuffer, Framebuffer, NoiseTable, Side, Texture as RasterTexture,
    Vec2 as MapVec, FOV, HALF_FOV, HEIGHT, MAX_DEPTH, WIDTH,
};
use crate::world::codes;
use super::config::{GameConfig, Palette};
use super::enemy::EnemyKind;
use super::projectile::{ProjectileKind, LOB_BASE_HEIGHT};
use super::sprites::{ArtAssets, SpriteKey};
use super::world::World;

/// Depth tolerance per billboard type
const ENEMY_TOLERANCE: f32 = 0.5;
const PICKUP_TOLERANCE: f32 = 0.3;
const PROJECTILE_TOLERANCE: f32 = 0.1;
const PARTICLE_TOLERANCE: f32 = 0.5;

/// Torch light reaches this squared distance in cells
const TORCH_RANGE_SQ: f32 = 9.0;

/// Billboards never grow past this many pixels per world unit
const MAX_SPRITE_SCALE: f32 = HEIGHT as f32 * 1.5;

fn enemy_height(kind: EnemyKind) -> f32 {
    match kind {
        EnemyKind::Spitter => 0.8,
        EnemyKind::Roller => 0.6,
        EnemyKind::Barrel => 1.0,
        EnemyKind::Boss => 1.6,
    }
}

#[derive(Debug, Clone, Copy)]
enum Billboard {
    Enemy(usize),
    Pickup(usize),
    Projectile(usize),
}

/// Owns the framebuffer, depth buffer and art
pub struct Renderer {
    pub fb: Framebuffer,
    depth: DepthBuffer,
    noise: NoiseTable,
    art: ArtAssets,
}

impl Renderer {
    pub fn new(art: ArtAssets) -> Self {
        Self {
            fb: Framebuffer::new(WIDTH, HEIGHT),
            depth: DepthBuffer::new(WIDTH, MAX_DEPTH),
            noise: NoiseTable::default(),
            art,
        }
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Render the world from the player's eye
    pub fn render(&mut self, world: &World, config: &GameConfig) {
        let player = &world.player;
        let eye = player.position + player.shake * (1.0 / 60.0);
        let angle = player.angle;

        self.fb.clear(RasterColor::BLACK);
        self.draw_floor_ceiling(&config.palette(world.level.palette));
        self.draw_walls(world, config, eye, angle);
        self.draw_billboards(world, eye, angle);
        self.draw_particles(world, eye, angle);
        self.draw_weapon(world);
    }

    fn draw_floor_ceiling(&mut self, palette: &Palette) {
        let h = self.fb.height as f32;
        let half = h / 2.0;
        let (ceil_a, ceil_b) = palette.ceiling_colors();
        let (floor_a, floor_b) = palette.floor_colors();

        for y in 0..self.fb.height {
            let yf = y as f32;
            let row_dist = half / ((yf - half).abs() + 0.001);
            let t = yf / h;
            let base = if yf < half {
                ceil_a.lerp(ceil_b, t * 2.0)
            } else {
                floor_a.lerp(floor_b, (t - 0.5) * 2.0)
            };
            let shade = (1.0 - row_dist / MAX_DEPTH * 0.6).max(0.05);
            self.fb.fill_row(y, base.shade(shade));
        }
    }

    fn torch_boost(&self, cell: (i32, i32), torches: &[(i32, i32)], time: f32, config: &GameConfig) -> f32 {
        let fx = &config.effects;
        torches
            .iter()
            .find_map(|&(tx, ty)| {
                let d2 = ((cell.0 - tx).pow(2) + (cell.1 - ty).pow(2)) as f32;
                (d2 < TORCH_RANGE_SQ).then(|| {
                    let flicker = self.noise.smooth(time * fx.torch_flicker_speed + tx as f32 * 3.7);
                    (1.0 - d2 / TORCH_RANGE_SQ) * (flicker * fx.torch_flicker_amp + 0.1)
                })
            })
            .unwrap_or(0.0)
    }

    fn draw_walls(&mut self, world: &World, config: &GameConfig, eye: MapVec, angle: f32) {
        let width = self.fb.width;
        let h = self.fb.height as f32;
        let half = h / 2.0;
        self.depth.reset();

        for col in 0..width {
            let ray_angle = angle - HALF_FOV + (col as f32 / width as f32) * FOV;
            let Some(hit) = cast_ray(&world.map, eye, ray_angle, MAX_DEPTH) else {
                self.depth.set(col, MAX_DEPTH);
                continue;
            };
            self.depth.set(col, hit.perp_dist);

            let wall_h = (h / hit.perp_dist).min(h * 2.0);
            let top = (half - wall_h / 2.0).max(0.0).floor();
            let bottom = (half + wall_h / 2.0).min(h - 1.0).floor();
            let Some(tex) = self.art.wall(hit.cell) else { continue };

            let torch = self.torch_boost((hit.map_x, hit.map_y), &world.level.torches, world.time, config);
            let mut shade = (1.0 - hit.perp_dist / MAX_DEPTH * 1.3).max(0.0) + torch;
            if hit.side == Side::Y {
                shade *= 0.72;
            }
            let shade = shade.clamp(0.0, 1.2);

            // Opening doors lift into the ceiling
            let lift = if hit.cell == codes::DOOR {
                world.map.door_progress(hit.map_x, hit.map_y) * (bottom - top)
            } else {
                0.0
            };
            self.fb.draw_texture_column(col as i32, top - lift, bottom - top, tex, hit.wall_x, shade, 1.0);
        }
    }

    fn draw_billboards(&mut self, world: &World, eye: MapVec, angle: f32) {
        let mut items = Vec::new();
        for (i, e) in world.enemies.iter().enumerate() {
            if let Some(p) = project(e.position, eye, angle) {
                items.push((p, Billboard::Enemy(i)));
            }
        }
        for (i, pk) in world.pickups.iter().enumerate().filter(|(_, p)| p.alive) {
            if let Some(p) = project(pk.position, eye, angle) {
                items.push((p, Billboard::Pickup(i)));
            }
        }
        for (i, pr) in world.projectiles.all().iter().enumerate() {
            // Anything already inside a wall would smear across its face
            if world.map.is_wall_at(pr.position) {
                continue;
            }
            if let Some(p) = project(pr.position, eye, angle) {
                items.push((p, Billboard::Projectile(i)));
            }
        }
        items.sort_by(|a, b| b.0.dist.total_cmp(&a.0.dist));

        let half = self.fb.height as f32 / 2.0;
        let pulse = 0.7 + (world.time * 3.0).sin() * 0.3;

        for (proj, item) in items {
            let scale = proj.scale.min(MAX_SPRITE_SCALE);
            let shade = (1.0 - proj.dist / MAX_DEPTH).max(0.25);
            match item {
                Billboard::Enemy(i) => {
                    let enemy = &world.enemies[i];
                    let Some(tex) = self.art.enemy_sprite(enemy) else { continue };
                    let world_h = enemy_height(enemy.kind);
                    let sprite_h = world_h * scale;
                    let sprite_w = sprite_h * tex.width as f32 / tex.height.max(1) as f32;
                    let top = half + scale - sprite_h;
                    draw_sprite(&mut self.fb, &self.depth, tex, proj.sx, top, sprite_w, sprite_h, proj.dist, ENEMY_TOLERANCE, shade, 1.0);

                    if !enemy.dead && enemy.hp < enemy.max_hp && self.depth.visible(proj.sx as i32, proj.dist, ENEMY_TOLERANCE) {
                        let bar_w = (sprite_w * 0.8).max(4.0);
                        let bar_x = (proj.sx - bar_w / 2.0) as i32;
                        let bar_y = (top - 4.0) as i32;
                        let fill = bar_w * enemy.hp as f32 / enemy.max_hp as f32;
                        self.fb.fill_rect(bar_x, bar_y, bar_w as i32, 2, RasterColor::new(64, 0, 0), 1.0);
                        self.fb.fill_rect(bar_x, bar_y, fill as i32, 2, RasterColor::new(0, 255, 0), 1.0);
                    }
                }
                Billboard::Pickup(i) => {
                    let pickup = &world.pickups[i];
                    let Some(tex) = self.art.sprite(SpriteKey::Pickup(pickup.kind)) else { continue };
                    let size = 0.35 * scale;
                    let centre_z = 0.3 + pickup.bob_offset();
                    let centre_y = half + scale * (1.0 - centre_z);
                    draw_sprite(&mut self.fb, &self.depth, tex, proj.sx, centre_y - size / 2.0, size, size, proj.dist, PICKUP_TOLERANCE, shade.max(0.6), pulse);
                }
                Billboard::Projectile(i) => {
                    let p = &world.projectiles.all()[i];
                    let (z, radius, color, glow) = match p.kind {
                        ProjectileKind::Shot => (0.75, 0.07, RasterColor::new(255, 200, 90), RasterColor::new(200, 100, 20)),
                        ProjectileKind::Beam => {
                            let flicker = 0.85 + (p.flicker.sin() * 0.15);
                            (0.8, 0.09 * flicker, RasterColor::new(220, 240, 255), RasterColor::new(90, 150, 255))
                        }
                        ProjectileKind::EnemyShot => (0.8, 0.1, RasterColor::new(150, 255, 150), RasterColor::new(0, 200, 0)),
                        ProjectileKind::Lobbed => {
                            (LOB_BASE_HEIGHT + p.z, 0.09, RasterColor::new(212, 160, 80), RasterColor::new(120, 80, 30))
                        }
                    };
                    let cy = half + scale * (1.0 - z);
                    let r = (radius * scale).clamp(1.5, 22.0);
                    draw_glow(&mut self.fb, &self.depth, proj.sx, cy, r * 2.0, glow, 0.6, proj.dist, PROJECTILE_TOLERANCE);
                    draw_glow(&mut self.fb, &self.depth, proj.sx, cy, r, color, 1.0, proj.dist, PROJECTILE_TOLERANCE);
                }
            }
        }
    }

    fn draw_particles(&mut self, world: &World, eye: MapVec, angle: f32) {
        let half = self.fb.height as f32 / 2.0;
        for pt in world.projectiles.particles().all() {
            if world.map.is_wall_at(pt.position) {
                continue;
            }
            let Some(proj) = project(pt.position, eye, angle) else { continue };
            let scale = proj.scale.min(MAX_SPRITE_SCALE);
            let cy = half + scale * (1.0 - pt.z);
            let r = (scale * pt.size).clamp(1.0, 4.0);
            if !self.depth.visible(proj.sx as i32, proj.dist, PARTICLE_TOLERANCE) {
                continue;
            }
            self.fb.fill_circle(proj.sx, cy, r, pt.color, pt.alpha());
        }
    }

    /// First-person mug cannon at the bottom of the screen
    fn draw_weapon(&mut self, world: &World) {
        let player = &world.player;
        let w = self.fb.width as f32;
        let h = self.fb.height as f32;
        let bob_x = player.bob_phase.sin() * 4.0;
        let bob_y = player.bob_phase.cos().abs() * 3.0;
        let cx = w / 2.0 + 30.0 + bob_x;
        let base = h + bob_y;

        if player.special_active {
            let pulse = (world.time * 11.0).sin() * 0.5 + 0.5;
            self.fb.fill_glow(cx, base - 34.0, 30.0 + pulse * 6.0, RasterColor::new(80, 160, 255), 0.5);
            self.fb.fill_rect((cx - 14.0) as i32, (base - 50.0) as i32, 28, 50, RasterColor::new(30, 60, 110), 1.0);
            self.fb.fill_rect((cx - 8.0) as i32, (base - 62.0) as i32, 16, 14, RasterColor::new(150, 210, 255), 1.0);
            self.fb.fill_glow(cx, base - 60.0, 10.0, RasterColor::new(230, 245, 255), 0.9);
            return;
        }

        if player.special_ready() {
            let pulse = (world.time * 6.0).sin() * 0.5 + 0.5;
            self.fb.fill_glow(cx, base - 34.0, 26.0, RasterColor::new(255, 230, 80), 0.25 + pulse * 0.3);
        }
        // Mug body, rim and handle
        self.fb.fill_rect((cx - 16.0) as i32, (base - 48.0) as i32, 32, 48, RasterColor::new(230, 215, 185), 1.0);
        self.fb.fill_rect((cx - 16.0) as i32, (base - 50.0) as i32, 32, 4, RasterColor::new(200, 185, 160), 1.0);
        self.fb.fill_rect((cx - 13.0) as i32, (base - 46.0) as i32, 26, 8, RasterColor::new(70, 35, 10), 1.0);
        self.fb.fill_rect((cx + 16.0) as i32, (base - 38.0) as i32, 8, 4, RasterColor::new(210, 195, 170), 1.0);
        self.fb.fill_rect((cx + 20.0) as i32, (base - 38.0) as i32, 4, 18, RasterColor::new(210, 195, 170), 1.0);
        self.fb.fill_rect((cx + 16.0) as i32, (base - 24.0) as i32, 8, 4, RasterColor::new(210, 195, 170), 1.0);
    }

    /// Upload the framebuffer and draw it letterboxed into the window.
    /// Returns the on-screen rectangle `(x, y, w, h)` of the game view.
    pub fn present(&self) -> (f32, f32, f32, f32) {
        let texture = Texture2D::from_rgba8(self.fb.width as u16, self.fb.height as u16, &self.fb.pixels);
        texture.set_filter(FilterMode::Nearest);

        let (sw, sh) = (screen_width(), screen_height());
        let fb_aspect = self.fb.width as f32 / self.fb.height as f32;
        let (draw_w, draw_h, draw_x, draw_y) = if fb_aspect > sw / sh {
            let h = sw / fb_aspect;
            (sw, h, 0.0, (sh - h) * 0.5)
        } else {
            let w = sh * fb_aspect;
            (w, sh, (sw - w) * 0.5, 0.0)
        };

        clear_background(Color::from_rgba(10, 10, 12, 255));
        draw_texture_ex(
            &texture,
            draw_x,
            draw_y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );
        (draw_x, draw_y, draw_w, draw_h)
    }
}

/// Scaled texture, column by column against the depth buffer
#[allow(clippy::too_many_arguments)]
fn draw_sprite(
    fb: &mut Framebuffer,
    depth: &DepthBuffer,
    tex: &RasterTexture,
    centre_x: f32,
    top: f32,
    w: f32,
    h: f32,
    dist: f32,
    tolerance: f32,
    shade: f32,
    alpha: f32,
) {
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let left = centre_x - w / 2.0;
    let x0 = left.floor().max(0.0) as i32;
    let x1 = (left + w).ceil().min(fb.width as f32) as i32;
    for x in x0..x1 {
        if !depth.visible(x, dist, tolerance) {
            continue;
        }
        let u = (x as f32 + 0.5 - left) / w;
        fb.draw_texture_column(x, top, h, tex, u, shade, alpha);
    }
}

/// Radial glow clipped per column against the depth buffer
#[allow(clippy::too_many_arguments)]
fn draw_glow(
    fb: &mut Framebuffer,
    depth: &DepthBuffer,
    cx: f32,
    cy: f32,
    r: f32,
    color: RasterColor,
    alpha: f32,
    dist: f32,
    tolerance: f32,
) {
    let x0 = (cx - r).floor().max(0.0) as i32;
    let x1 = (cx + r).ceil().min(fb.width as f32) as i32;
    let y0 = (cy - r).floor() as i32;
    let y1 = (cy + r).ceil() as i32;
    for x in x0..x1 {
        if !depth.visible(x, dist, tolerance) {
            continue;
        }
        for y in y0..y1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            if d <= r {
                fb.blend_pixel(x, y, color, alpha * (1.0 - d / r));
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::enemy::Enemy;
    use crate::world::{LevelDef, PlayerStart};

    fn corridor_level() -> LevelDef {
        // Player at x=1.5 looking east; wall slab at x=5
        let mut grid = vec![vec![0u8; 9]; 5];
        for x in 0..9 {
            grid[0][x] = 1;
            grid[4][x] = 1;
        }
        for row in grid.iter_mut() {
            row[0] = 1;
            row[8] = 1;
        }
        for row in grid.iter_mut().take(4).skip(1) {
            row[5] = 3;
        }
        LevelDef {
            name: "Render".into(),
            blurb: String::new(),
            palette: 0,
            grid,
            player_start: PlayerStart { x: 1.5, y: 2.5, angle: 0.0 },
            enemies: Vec::new(),
            pickups: Vec::new(),
            torches: Vec::new(),
        }
    }

    fn setup() -> (World, GameConfig, Renderer) {
        let config = GameConfig::default();
        let world = World::new(corridor_level(), &config, 1);
        (world, config, Renderer::new(ArtAssets::procedural(1)))
    }

    #[test]
    fn test_centre_column_depth() {
        let (world, config, mut renderer) = setup();
        renderer.render(&world, &config);
        let mid = (WIDTH / 2) as i32;
        assert!((renderer.depth().get(mid) - 3.5).abs() < 0.05);
        // Wall occupies the middle of the view, floor the bottom rows
        let wall = renderer.fb.get_pixel(WIDTH / 2, HEIGHT / 2).unwrap();
        let floor = renderer.fb.get_pixel(5, HEIGHT - 50).unwrap();
        assert_ne!(wall, floor);
    }

    #[test]
    fn test_enemy_behind_wall_hidden() {
        let (mut world, config, mut renderer) = setup();
        renderer.render(&world, &config);
        let empty = renderer.fb.pixels.clone();

        world.enemies.push(Enemy::new(EnemyKind::Barrel, MapVec::new(6.5, 2.5)));
        renderer.render(&world, &config);
        assert_eq!(renderer.fb.pixels, empty);

        world.enemies.clear();
        world.enemies.push(Enemy::new(EnemyKind::Barrel, MapVec::new(3.5, 2.5)));
        renderer.render(&world, &config);
        assert_ne!(renderer.fb.pixels, empty);
    }

    #[test]
    fn test_projectile_in_wall_is_culled() {
        let (mut world, config, mut renderer) = setup();
        renderer.render(&world, &config);
        let empty = renderer.fb.pixels.clone();
        world.projectiles.spawn_shot(MapVec::new(5.5, 2.5), 0.0, 10, 0.0);
        renderer.render(&world, &config);
        assert_eq!(renderer.fb.pixels, empty);
    }

    #[test]
    fn test_torch_boost_range() {
        let (_, config, renderer) = setup();
        let torches = [(5, 2)];
        assert!(renderer.torch_boost((5, 1), &torches, 0.0, &config) > 0.0);
        assert_eq!(renderer.torch_boost((9, 2), &torches, 0.0, &config), 0.0);
    }
}
