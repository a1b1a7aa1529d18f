//! Input event types and pressed-state tracking.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Pointer event with screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
    Wheel { position: Point, delta: Vec2 },
}

/// Keyboard event. Keys are named as the host surface reports them
/// (e.g. "Escape", "Delete", "z", " ").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Tracks pointer and keyboard state across events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Currently pressed mouse buttons.
    pressed_buttons: HashSet<MouseButton>,
    /// Currently pressed keys.
    pressed_keys: HashSet<String>,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a pointer event's effect on pressed state.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = *position;
                self.pressed_buttons.insert(*button);
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = *position;
                self.pressed_buttons.remove(button);
            }
            PointerEvent::Move { position } | PointerEvent::Wheel { position, .. } => {
                self.pointer_position = *position;
            }
        }
    }

    /// Track a key event's effect on pressed state.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        match event {
            KeyEvent::Pressed(key) => {
                self.pressed_keys.insert(key.clone());
            }
            KeyEvent::Released(key) => {
                self.pressed_keys.remove(key);
            }
        }
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    /// Release everything; used when the pointer leaves the surface.
    pub fn clear(&mut self) {
        self.pressed_buttons.clear();
        self.pressed_keys.clear();
    }
}
