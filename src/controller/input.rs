/// Platform-agnostic input handling
use glam::Vec2;

/// Logical navigation controls, decoupled from physical keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Left,
    Backward,
    Right,
    Up,
    Down,
}

impl Control {
    pub const ALL: [Control; 6] = [
        Control::Forward,
        Control::Left,
        Control::Backward,
        Control::Right,
        Control::Up,
        Control::Down,
    ];
}

/// Platform-independent input events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(u32),
    KeyUp(u32),
    /// Normalized pointer position plus whether the primary button is held
    PointerMove { x: f32, y: f32, primary_pressed: bool },
    Resized { width: u32, height: u32 },
}

/// Held/released flag per control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub forward: bool,
    pub left: bool,
    pub backward: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag_mut(&mut self, control: Control) -> &mut bool {
        match control {
            Control::Forward => &mut self.forward,
            Control::Left => &mut self.left,
            Control::Backward => &mut self.backward,
            Control::Right => &mut self.right,
            Control::Up => &mut self.up,
            Control::Down => &mut self.down,
        }
    }

    pub fn set(&mut self, control: Control, held: bool) {
        *self.flag_mut(control) = held;
    }

    pub fn is_held(&self, control: Control) -> bool {
        match control {
            Control::Forward => self.forward,
            Control::Left => self.left,
            Control::Backward => self.backward,
            Control::Right => self.right,
            Control::Up => self.up,
            Control::Down => self.down,
        }
    }
}

/// Last pointer position seen, used only to compute drag deltas
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseDragState {
    pub last: Vec2,
}

/// Map a client-space pointer position to [-1, 1] with +y pointing up
pub fn normalize_pointer(client_x: f32, client_y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        (client_x / width) * 2.0 - 1.0,
        -(client_y / height) * 2.0 + 1.0,
    )
}

/// Legacy DOM `keyCode` values
pub mod key_codes {
    pub const W: u32 = 87;
    pub const A: u32 = 65;
    pub const S: u32 = 83;
    pub const D: u32 = 68;
    pub const E: u32 = 69;
    pub const Q: u32 = 81;
}

/// Key mapping configuration: raw key code to logical control
#[derive(Debug, Clone)]
pub struct KeyBindings {
    table: Vec<(u32, Control)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            table: vec![
                (key_codes::W, Control::Forward),
                (key_codes::A, Control::Left),
                (key_codes::S, Control::Backward),
                (key_codes::D, Control::Right),
                (key_codes::E, Control::Up),
                (key_codes::Q, Control::Down),
            ],
        }
    }
}

impl KeyBindings {
    pub fn control_for(&self, code: u32) -> Option<Control> {
        self.table
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|(_, control)| *control)
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::{KeyboardEvent, MouseEvent, Window};

    pub fn keyboard_event_to_input(e: &KeyboardEvent, is_down: bool) -> InputEvent {
        let code = e.key_code();
        if is_down {
            InputEvent::KeyDown(code)
        } else {
            InputEvent::KeyUp(code)
        }
    }

    /// `buttons == 1` means exactly the primary button is held
    pub fn mouse_move_to_input(e: &MouseEvent, window: &Window) -> InputEvent {
        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(1.0) as f32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(1.0) as f32;
        let pos = normalize_pointer(e.client_x() as f32, e.client_y() as f32, width, height);
        InputEvent::PointerMove {
            x: pos.x,
            y: pos.y,
            primary_pressed: e.buttons() == 1,
        }
    }
}
