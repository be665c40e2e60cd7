//! Level definitions
//!
//! Levels are RON documents (optionally brotli-compressed) describing the
//! tile grid, the player start, and spawn lists. Built-in levels are embedded
//! at compile time by `build.rs`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::game::enemy::EnemyKind;
use crate::game::pickup::PickupKind;
use crate::rasterizer::Vec2;
use super::tilemap::{Cell, TileMap};

/// Limits for level validation (prevents malicious files from causing DoS)
pub mod limits {
    /// Maximum grid dimension (width or height)
    pub const MAX_GRID_SIZE: usize = 128;
    /// Maximum spawn entries of each kind
    pub const MAX_SPAWNS: usize = 512;
    /// Maximum torch tiles
    pub const MAX_TORCHES: usize = 256;
    /// Maximum length for name and blurb
    pub const MAX_STRING_LEN: usize = 512;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStart {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupSpawn {
    pub kind: PickupKind,
    pub x: f32,
    pub y: f32,
}

/// One playable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    #[serde(default)]
    pub blurb: String,
    /// Index into the configured palettes (falls back to the first)
    #[serde(default)]
    pub palette: usize,
    /// Row-major tile codes
    pub grid: Vec<Vec<u8>>,
    pub player_start: PlayerStart,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub pickups: Vec<PickupSpawn>,
    /// Tiles whose neighbourhood gets flickering torch light
    #[serde(default)]
    pub torches: Vec<(i32, i32)>,
}

impl LevelDef {
    pub fn width(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.grid.len()
    }

    pub fn build_map(&self) -> TileMap {
        TileMap::new(&self.grid)
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        x.is_finite()
            && y.is_finite()
            && x >= 0.0
            && y >= 0.0
            && x < self.width() as f32
            && y < self.height() as f32
    }
}

/// Error type for level loading
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    DecodeError(String),
    ValidationError(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::DecodeError(e) => write!(f, "Decode error: {}", e),
            LevelError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::IoError(e) => Some(e),
            LevelError::ParseError(e) => Some(e),
            _ => None,
        }
    }
}

/// Validate a parsed level
pub fn validate_level(level: &LevelDef) -> Result<(), LevelError> {
    let fail = |msg: String| Err(LevelError::ValidationError(msg));

    if level.name.len() > limits::MAX_STRING_LEN || level.blurb.len() > limits::MAX_STRING_LEN {
        return fail("name or blurb too long".to_string());
    }

    let (w, h) = (level.width(), level.height());
    if w == 0 || h == 0 {
        return fail("grid is empty".to_string());
    }
    if w > limits::MAX_GRID_SIZE || h > limits::MAX_GRID_SIZE {
        return fail(format!("grid too large ({}x{} > {})", w, h, limits::MAX_GRID_SIZE));
    }
    for (y, row) in level.grid.iter().enumerate() {
        if row.len() != w {
            return fail(format!("row {} has {} cells, expected {}", y, row.len(), w));
        }
        if let Some((x, code)) = row.iter().enumerate().find(|(_, c)| Cell::from_code(**c).is_none()) {
            return fail(format!("unknown tile code {} at ({}, {})", code, x, y));
        }
    }

    let start = level.player_start;
    if !level.contains(start.x, start.y) || !start.angle.is_finite() {
        return fail(format!("player start ({}, {}) is outside the grid", start.x, start.y));
    }
    let (sx, sy) = (start.x.floor() as usize, start.y.floor() as usize);
    if matches!(Cell::from_code(level.grid[sy][sx]), Some(Cell::Wall(_)) | Some(Cell::Door)) {
        return fail(format!("player start ({}, {}) is inside a wall", start.x, start.y));
    }

    if level.enemies.len() > limits::MAX_SPAWNS || level.pickups.len() > limits::MAX_SPAWNS {
        return fail("too many spawns".to_string());
    }
    for e in &level.enemies {
        if !level.contains(e.x, e.y) {
            return fail(format!("{:?} spawn ({}, {}) is outside the grid", e.kind, e.x, e.y));
        }
    }
    for p in &level.pickups {
        if !level.contains(p.x, p.y) {
            return fail(format!("{:?} pickup ({}, {}) is outside the grid", p.kind, p.x, p.y));
        }
    }

    if level.torches.len() > limits::MAX_TORCHES {
        return fail("too many torches".to_string());
    }
    for &(tx, ty) in &level.torches {
        if tx < 0 || ty < 0 || tx as usize >= w || ty as usize >= h {
            return fail(format!("torch ({}, {}) is outside the grid", tx, ty));
        }
    }

    Ok(())
}

/// Warn about spawns that start embedded in walls. They still load.
fn warn_embedded_spawns(level: &LevelDef) {
    let map = level.build_map();
    for e in &level.enemies {
        if map.is_wall_at(Vec2::new(e.x, e.y)) {
            log::warn!("{}: {:?} spawn at ({}, {}) is inside a wall", level.name, e.kind, e.x, e.y);
        }
    }
    for p in &level.pickups {
        if map.is_wall_at(Vec2::new(p.x, p.y)) {
            log::warn!("{}: {:?} pickup at ({}, {}) is inside a wall", level.name, p.kind, p.x, p.y);
        }
    }
}

/// Parse and validate level text
pub fn load_level_from_str(s: &str) -> Result<LevelDef, LevelError> {
    let level: LevelDef = ron::from_str(s)?;
    validate_level(&level)?;
    warn_embedded_spawns(&level);
    Ok(level)
}

/// Parse level bytes: plain RON text or brotli-compressed RON
pub fn parse_level_data(bytes: &[u8]) -> Result<LevelDef, LevelError> {
    // RON text starts with '(', whitespace or a comment; brotli is binary
    let is_plain_ron = bytes
        .first()
        .map(|&b| b == b'(' || b == b'/' || b.is_ascii_whitespace())
        .unwrap_or(false);

    let contents = if is_plain_ron {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| LevelError::DecodeError(format!("invalid UTF-8: {}", e)))?
    } else {
        let mut decompressed = Vec::new();
        brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut decompressed)
            .map_err(|e| LevelError::DecodeError(format!("brotli decompression failed: {}", e)))?;
        String::from_utf8(decompressed)
            .map_err(|e| LevelError::DecodeError(format!("invalid UTF-8 after decompression: {}", e)))?
    };

    load_level_from_str(&contents)
}

/// Load a level file from disk
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<LevelDef, LevelError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    parse_level_data(&bytes).map_err(|e| {
        log::error!("failed to load level {}: {}", path.display(), e);
        e
    })
}

/// Load every `*.ron` / `*.ron.br` level in a directory, in file-name order
#[cfg(not(target_arch = "wasm32"))]
pub fn load_level_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<LevelDef>, LevelError> {
    let mut paths: Vec<_> = fs::read_dir(dir.as_ref())?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            let name = p.file_name().map(|n| n.to_string_lossy().to_ascii_lowercase()).unwrap_or_default();
            name.ends_with(".ron") || name.ends_with(".ron.br")
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(LevelError::ValidationError(format!(
            "no level files in {}",
            dir.as_ref().display()
        )));
    }

    paths.iter().map(load_level).collect()
}

/// `(file_name, contents)` for every level under assets/levels
const BUILTIN_LEVELS: &[(&str, &str)] = include!(concat!(env!("OUT_DIR"), "/builtin_levels.rs"));

/// Parse the levels embedded at build time
pub fn builtin_levels() -> Result<Vec<LevelDef>, LevelError> {
    BUILTIN_LEVELS
        .iter()
        .map(|(name, text)| {
            load_level_from_str(text).map_err(|e| {
                log::error!("built-in level {} is invalid: {}", name, e);
                e
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TINY: &str = r#"(
        name: "Tiny",
        grid: [
            [1, 1, 1, 1],
            [1, 0, 9, 1],
            [1, 1, 1, 1],
        ],
        player_start: (x: 1.5, y: 1.5),
        enemies: [(kind: Roller, x: 2.5, y: 1.5)],
        pickups: [(kind: Key, x: 1.5, y: 1.5)],
        torches: [(0, 0)],
    )"#;

    #[test]
    fn test_parse_minimal() {
        let level = load_level_from_str(TINY).unwrap();
        assert_eq!(level.name, "Tiny");
        assert_eq!((level.width(), level.height()), (4, 3));
        assert_eq!(level.palette, 0);
        assert_eq!(level.enemies[0].kind, EnemyKind::Roller);
        assert_eq!(level.pickups[0].kind, PickupKind::Key);
        assert_eq!(level.player_start.angle, 0.0);
    }

    #[test]
    fn test_builtin_levels_parse() {
        let levels = builtin_levels().unwrap();
        assert_eq!(levels.len(), 3);
        assert!(levels.iter().all(|l| l.width() == 20 && l.height() == 20));
        assert!(levels[2].enemies.iter().any(|e| e.kind == EnemyKind::Boss));
        assert!(levels.iter().all(|l| l.pickups.iter().any(|p| p.kind == PickupKind::Key)));
    }

    #[test]
    fn test_rejects_unknown_code() {
        let bad = TINY.replace("[1, 0, 9, 1]", "[1, 0, 7, 1]");
        assert!(matches!(load_level_from_str(&bad), Err(LevelError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_ragged_grid() {
        let bad = TINY.replace("[1, 0, 9, 1]", "[1, 0, 9]");
        assert!(matches!(load_level_from_str(&bad), Err(LevelError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_start_in_wall() {
        let bad = TINY.replace("player_start: (x: 1.5, y: 1.5)", "player_start: (x: 0.5, y: 0.5)");
        assert!(matches!(load_level_from_str(&bad), Err(LevelError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_spawn_outside() {
        let bad = TINY.replace("(kind: Roller, x: 2.5, y: 1.5)", "(kind: Roller, x: 42.0, y: 1.5)");
        assert!(matches!(load_level_from_str(&bad), Err(LevelError::ValidationError(_))));
    }

    #[test]
    fn test_parse_error_reported() {
        assert!(matches!(load_level_from_str("(name: "), Err(LevelError::ParseError(_))));
    }

    #[test]
    fn test_brotli_level_detected() {
        let mut compressed = Vec::new();
        {
            let mut writer = brotli::CompressorWriter::new(&mut compressed, 4096, 6, 22);
            writer.write_all(TINY.trim_start().as_bytes()).unwrap();
        }
        let level = parse_level_data(&compressed).unwrap();
        assert_eq!(level.name, "Tiny");
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(parse_level_data(&[0xff, 0x00, 0x13, 0x37]).is_err());
        assert!(parse_level_data(&[]).is_err());
    }

    #[test]
    fn test_load_level_dir_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.ron"), TINY.replace("Tiny", "Second")).unwrap();
        fs::write(dir.path().join("a.ron"), TINY).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let levels = load_level_dir(dir.path()).unwrap();
        assert_eq!(levels.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(), ["Tiny", "Second"]);
    }

    #[test]
    fn test_load_level_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_level(dir.path().join("nope.ron")), Err(LevelError::IoError(_))));
    }
}
