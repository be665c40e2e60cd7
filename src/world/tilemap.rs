//! Tile map and door state
//!
//! The level grid is immutable except for door cells, which latch open
//! 0.8 s after an actor holding the key touches them and never close again.

use std::collections::HashMap;

use crate::rasterizer::{clamp, ease_out_quad, RayGrid, Vec2};

/// Raw tile codes as stored in level files
pub mod codes {
    pub const EMPTY: u8 = 0;
    /// Code reported for anything outside the grid
    pub const OUT_OF_BOUNDS: u8 = 1;
    pub const DOOR: u8 = 6;
    pub const EXIT: u8 = 9;
    /// Highest plain wall material
    pub const MAX_WALL: u8 = 5;
}

/// Seconds a door spends opening before it becomes passable
pub const DOOR_OPEN_TIME: f32 = 0.8;

/// Samples used by the line-of-sight test
const LOS_SAMPLES: usize = 20;

/// Classified tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    /// Solid wall with material 1-5
    Wall(u8),
    Door,
    Exit,
}

impl Cell {
    pub fn from_code(code: u8) -> Option<Cell> {
        match code {
            codes::EMPTY => Some(Cell::Empty),
            1..=codes::MAX_WALL => Some(Cell::Wall(code)),
            codes::DOOR => Some(Cell::Door),
            codes::EXIT => Some(Cell::Exit),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => codes::EMPTY,
            Cell::Wall(m) => m,
            Cell::Door => codes::DOOR,
            Cell::Exit => codes::EXIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoorState {
    pub open: bool,
    pub opening: bool,
    /// Seconds spent opening
    pub timer: f32,
}

#[derive(Debug, Clone)]
pub struct TileMap {
    width: usize,
    height: usize,
    cells: Vec<u8>,
    doors: HashMap<(i32, i32), DoorState>,
}

impl TileMap {
    /// Build from row-major rows. Short rows are padded with wall.
    pub fn new(grid: &[Vec<u8>]) -> Self {
        let height = grid.len();
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut cells = vec![codes::OUT_OF_BOUNDS; width * height];
        for (y, row) in grid.iter().enumerate() {
            cells[y * width..y * width + row.len()].copy_from_slice(row);
        }
        Self { width, height, cells, doors: HashMap::new() }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Raw tile code; anything outside the grid reads as wall
    pub fn get_cell(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map_or(codes::OUT_OF_BOUNDS, |i| self.cells[i])
    }

    pub fn cell(&self, x: i32, y: i32) -> Cell {
        Cell::from_code(self.get_cell(x, y)).unwrap_or(Cell::Wall(codes::OUT_OF_BOUNDS))
    }

    pub fn is_door(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.get_cell(x, y) == codes::DOOR
    }

    pub fn is_exit(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.get_cell(x, y) == codes::EXIT
    }

    pub fn is_door_open(&self, x: i32, y: i32) -> bool {
        self.doors.get(&(x, y)).map_or(false, |d| d.open)
    }

    pub fn door_state(&self, x: i32, y: i32) -> Option<&DoorState> {
        self.doors.get(&(x, y))
    }

    /// Eased opening progress in 0..=1; 0 for untouched doors
    pub fn door_progress(&self, x: i32, y: i32) -> f32 {
        match self.doors.get(&(x, y)) {
            None => 0.0,
            Some(d) if d.open => 1.0,
            Some(d) => ease_out_quad(clamp(d.timer / DOOR_OPEN_TIME, 0.0, 1.0)),
        }
    }

    /// Blocks movement. Doors block until fully open; exits never block.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        match self.cell(x, y) {
            Cell::Empty | Cell::Exit => false,
            Cell::Door => !self.is_door_open(x, y),
            Cell::Wall(_) => true,
        }
    }

    pub fn is_wall_at(&self, pos: Vec2) -> bool {
        let (x, y) = pos.cell();
        self.is_wall(x, y)
    }

    /// Start opening a door. Returns false for non-doors, or when the door
    /// has never been touched and the caller has no key. A door that already
    /// has state reports true regardless of the key.
    pub fn try_open_door(&mut self, x: i32, y: i32, has_key: bool) -> bool {
        if !self.is_door(x, y) {
            return false;
        }
        if !self.doors.contains_key(&(x, y)) {
            if !has_key {
                return false;
            }
            self.doors.insert((x, y), DoorState { open: false, opening: true, timer: 0.0 });
        }
        true
    }

    /// Advance opening doors
    pub fn update(&mut self, dt: f32) {
        for door in self.doors.values_mut() {
            if door.opening {
                door.timer += dt;
                if door.timer > DOOR_OPEN_TIME {
                    door.open = true;
                    door.opening = false;
                }
            }
        }
    }

    /// Sampled line of sight: tests interior points between `from` and `to`
    pub fn line_of_sight(&self, from: Vec2, to: Vec2) -> bool {
        (1..LOS_SAMPLES).all(|i| {
            let t = i as f32 / LOS_SAMPLES as f32;
            !self.is_wall_at(from.lerp(to, t))
        })
    }
}

impl RayGrid for TileMap {
    fn ray_stop(&self, x: i32, y: i32) -> Option<u8> {
        let code = self.get_cell(x, y);
        if code == codes::EMPTY || (code == codes::DOOR && self.is_door_open(x, y)) {
            None
        } else {
            Some(code)
        }
    }
}
