//! Core types for the rasterizer

use serde::{Deserialize, Serialize};

use super::constants::TEXTURE_SIZE;

/// 8-bit RGBA colour. Alpha 0 marks a transparent texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from a 3-byte array (config/palette form)
    pub const fn from_rgb(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    /// Parse `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Linear interpolation between two colours (t clamped to 0..1)
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Multiply RGB by a brightness factor, saturating at 255
    pub fn shade(self, factor: f32) -> Color {
        let f = factor.max(0.0);
        let s = |c: u8| (c as f32 * f).min(255.0) as u8;
        Color { r: s(self.r), g: s(self.g), b: s(self.b), a: self.a }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Square or rectangular texel grid used for walls and sprites
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; width * height],
            name: String::new(),
        }
    }

    /// Build a texture by evaluating `f(x, y)` for every texel
    pub fn from_fn(width: usize, height: usize, name: &str, mut f: impl FnMut(usize, usize) -> Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels, name: name.to_string() }
    }

    /// Decode a PNG held in memory
    pub fn from_png_bytes(bytes: &[u8], name: &str) -> Result<Self, String> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|e| format!("Failed to decode {}: {}", name, e))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba.pixels().map(|p| Color::rgba(p[0], p[1], p[2], p[3])).collect();
        Ok(Self { width: width as usize, height: height as usize, pixels, name: name.to_string() })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Color {
        if x >= self.width || y >= self.height {
            return Color::TRANSPARENT;
        }
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Sample with normalised coordinates (nearest, clamped)
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::TRANSPARENT;
        }
        let x = ((u * self.width as f32) as isize).clamp(0, self.width as isize - 1) as usize;
        let y = ((v * self.height as f32) as isize).clamp(0, self.height as isize - 1) as usize;
        self.pixels[y * self.width + x]
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Color) {
        for yy in y..(y + h).min(self.height) {
            for xx in x..(x + w).min(self.width) {
                self.pixels[yy * self.width + xx] = color;
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) {
        let r2 = r * r;
        for y in 0..self.height {
            for x in 0..self.width {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.pixels[y * self.width + x] = color;
                }
            }
        }
    }

    /// Blank wall-sized texture
    pub fn wall(name: &str, base: Color) -> Self {
        Self::from_fn(TEXTURE_SIZE, TEXTURE_SIZE, name, |_, _| base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#8B6914"), Some(Color::new(0x8b, 0x69, 0x14)));
        assert_eq!(Color::from_hex("8B6914"), None);
        assert_eq!(Color::from_hex("#zz0000"), None);
        assert_eq!(Color::from_hex("#fff"), None);
    }

    #[test]
    fn test_shade_saturates() {
        let c = Color::new(200, 100, 0).shade(1.2);
        assert_eq!(c, Color::new(240, 120, 0));
        assert_eq!(Color::new(250, 10, 10).shade(2.0).r, 255);
        assert_eq!(Color::WHITE.shade(-1.0), Color::BLACK);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Color::new(0, 0, 0);
        let b = Color::new(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 5.0), b);
    }

    #[test]
    fn test_sample_clamps() {
        let tex = Texture::from_fn(4, 4, "t", |x, y| Color::new(x as u8, y as u8, 0));
        assert_eq!(tex.sample(0.0, 0.0), Color::new(0, 0, 0));
        assert_eq!(tex.sample(0.99, 0.99), Color::new(3, 3, 0));
        assert_eq!(tex.sample(1.5, -0.5), Color::new(3, 0, 0));
        assert_eq!(tex.get(10, 0), Color::TRANSPARENT);
    }

    #[test]
    fn test_png_roundtrip_through_image() {
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([10, 20, 30, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 0, 0]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();

        let tex = Texture::from_png_bytes(&bytes, "tiny").unwrap();
        assert_eq!((tex.width, tex.height), (2, 1));
        assert_eq!(tex.get(0, 0), Color::new(10, 20, 30));
        assert!(tex.get(1, 0).is_transparent());
    }
}
