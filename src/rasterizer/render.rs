//! Software framebuffer
//! RGBA pixel buffer the raycaster and sprite passes draw into

use super::types::{Color, Texture};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Fill a whole row with one colour
    pub fn fill_row(&mut self, y: usize, color: Color) {
        if y >= self.height {
            return;
        }
        let bytes = color.to_bytes();
        let start = y * self.width * 4;
        for px in self.pixels[start..start + self.width * 4].chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            Some(Color::rgba(
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ))
        } else {
            None
        }
    }

    /// Alpha-blend `color` over the pixel. `alpha` scales the colour's own alpha.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = (color.a as f32 / 255.0) * alpha.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let mix = |dst: u8, src: u8| (dst as f32 + (src as f32 - dst as f32) * a) as u8;
        self.pixels[idx] = mix(self.pixels[idx], color.r);
        self.pixels[idx + 1] = mix(self.pixels[idx + 1], color.g);
        self.pixels[idx + 2] = mix(self.pixels[idx + 2], color.b);
        self.pixels[idx + 3] = 255;
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, alpha: f32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color, alpha);
            }
        }
    }

    /// Filled circle with a linear radial falloff to the edge
    pub fn fill_glow(&mut self, cx: f32, cy: f32, r: f32, color: Color, alpha: f32) {
        if r <= 0.0 {
            return;
        }
        let x0 = (cx - r).floor().max(0.0) as i32;
        let x1 = (cx + r).ceil().min(self.width as f32) as i32;
        let y0 = (cy - r).floor().max(0.0) as i32;
        let y1 = (cy + r).ceil().min(self.height as f32) as i32;
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d <= r {
                    self.blend_pixel(px, py, color, alpha * (1.0 - d / r));
                }
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color, alpha: f32) {
        let x0 = (cx - r).floor().max(0.0) as i32;
        let x1 = (cx + r).ceil().min(self.width as f32) as i32;
        let y0 = (cy - r).floor().max(0.0) as i32;
        let y1 = (cy + r).ceil().min(self.height as f32) as i32;
        let r2 = r * r;
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(px, py, color, alpha);
                }
            }
        }
    }

    /// Draw one screen column of a scaled texture.
    /// `u` picks the texture column, the texture spans `top..top+height` on screen.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_texture_column(
        &mut self,
        x: i32,
        top: f32,
        height: f32,
        tex: &Texture,
        u: f32,
        shade: f32,
        alpha: f32,
    ) {
        if height <= 0.0 || x < 0 || x as usize >= self.width {
            return;
        }
        let y0 = top.max(0.0) as i32;
        let y1 = (top + height).min(self.height as f32) as i32;
        for py in y0..y1 {
            let v = (py as f32 - top) / height;
            let texel = tex.sample(u, v);
            if texel.is_transparent() {
                continue;
            }
            self.blend_pixel(x, py, texel.shade(shade), alpha);
        }
    }
}
