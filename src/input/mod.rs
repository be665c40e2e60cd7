//! Input handling
//!
//! Keyboard and mouse are read once per frame into an `Intents` value; the
//! simulation only ever sees `Intents`.
//!
//! Mouse-look grabs the pointer on the first click and releases it on Escape.

use macroquad::prelude::*;

/// What the player wants to do this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intents {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Horizontal mouse motion in pixels
    pub turn_delta: f32,
    /// Held
    pub fire: bool,
    /// Pressed this frame
    pub lob: bool,
    /// Pressed this frame
    pub special: bool,
    /// Pressed this frame
    pub confirm: bool,
}

/// Convert macroquad's local mouse delta (previous minus current, window
/// width spanning 2 units) to rightward pixels
pub fn turn_pixels(local_dx: f32, window_width: f32) -> f32 {
    -local_dx * window_width / 2.0
}

/// Frame-to-frame input state (mouse tracking and pointer grab)
#[derive(Debug, Default)]
pub struct InputState {
    grabbed: bool,
    /// F3 pressed this frame
    pub toggle_debug: bool,
    /// F4 pressed this frame
    pub cycle_fps: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_grab(&mut self, grab: bool) {
        if self.grabbed != grab {
            self.grabbed = grab;
            set_cursor_grab(grab);
            show_mouse(!grab);
        }
    }

    /// Call once per frame before the simulation tick
    pub fn poll(&mut self) -> Intents {
        if is_mouse_button_pressed(MouseButton::Left) {
            self.set_grab(true);
        }
        if is_key_pressed(KeyCode::Escape) {
            self.set_grab(false);
        }
        self.toggle_debug = is_key_pressed(KeyCode::F3);
        self.cycle_fps = is_key_pressed(KeyCode::F4);

        // Raw motion keeps arriving while the pointer is confined
        let turn_delta = if self.grabbed {
            turn_pixels(mouse_delta_position().x, screen_width())
        } else {
            0.0
        };

        let confirm = is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::Space);

        Intents {
            forward: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            backward: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
            strafe_left: is_key_down(KeyCode::A),
            strafe_right: is_key_down(KeyCode::D),
            turn_left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::Q),
            turn_right: is_key_down(KeyCode::Right),
            turn_delta,
            fire: is_key_down(KeyCode::Space) || (self.grabbed && is_mouse_button_down(MouseButton::Left)),
            lob: is_key_pressed(KeyCode::G) || is_mouse_button_pressed(MouseButton::Right),
            special: is_key_pressed(KeyCode::E),
            confirm,
        }
    }
}
