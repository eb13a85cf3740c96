//! Normalised input events consumed by the navigation core.
//!
//! Events carry only what navigation needs. Windowing toolkits translate
//! their native events into these (see [`crate::iced_input`]).

use std::ops::BitOr;
use std::time::Duration;

use nalgebra::{Point2, Vector2, Vector3};

/// Keyboard modifier bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(1 << 1);
    pub const ALT: Modifiers = Modifiers(1 << 2);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Key symbols the navigation core reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    Up,
    Down,
    Left,
    Right,
    Shift,
    Enter,
    Return,
    Escape,
    F4,
    Other,
}

impl Key {
    /// Movement contribution of this key in camera axes:
    /// `x` right, `y` forward, `z` up.
    pub fn direction(self) -> Vector3<f32> {
        match self {
            Key::W | Key::Up => Vector3::new(0.0, 1.0, 0.0),
            Key::S | Key::Down => Vector3::new(0.0, -1.0, 0.0),
            Key::A | Key::Left => Vector3::new(-1.0, 0.0, 0.0),
            Key::D | Key::Right => Vector3::new(1.0, 0.0, 0.0),
            Key::E => Vector3::new(0.0, 0.0, 1.0),
            Key::Q => Vector3::new(0.0, 0.0, -1.0),
            _ => Vector3::zeros(),
        }
    }

    /// Speed-modifier contribution of this key.
    pub fn speed(self) -> i32 {
        match self {
            Key::Shift => 1,
            _ => 0,
        }
    }

    /// Whether holding this key influences FPS movement at all.
    pub fn is_movement_key(self) -> bool {
        self.speed() != 0 || self.direction() != Vector3::zeros()
    }
}

/// Opaque handle of a periodic tick scheduled through the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Viewport-local pixel position.
    pub position: Point2<f32>,
    /// Button that changed state; `None` for plain moves.
    pub button: Option<MouseButton>,
    pub modifiers: Modifiers,
    /// Set for events the windowing system generated itself, e.g. the echo
    /// of a cursor warp.
    pub synthetic: bool,
}

impl PointerEvent {
    pub fn moved(position: Point2<f32>) -> Self {
        Self {
            position,
            button: None,
            modifiers: Modifiers::NONE,
            synthetic: false,
        }
    }

    pub fn button(position: Point2<f32>, button: MouseButton, modifiers: Modifiers) -> Self {
        Self {
            position,
            button: Some(button),
            modifiers,
            synthetic: false,
        }
    }

    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Angle delta in eighths of a degree; one detent is 120.
    pub angle_delta: Vector2<i32>,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MouseMove(PointerEvent),
    MousePress(PointerEvent),
    MouseRelease(PointerEvent),
    Wheel(WheelEvent),
    KeyPress(KeyEvent),
    KeyRelease(KeyEvent),
    FocusOut,
    Tick(TimerId),
    /// The viewport finished rendering a frame that took this long.
    FrameRendered(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_combine_as_bitmask() {
        let both = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(both.contains(Modifiers::CTRL));
        assert!(both.contains(Modifiers::SHIFT));
        assert!(!both.contains(Modifiers::ALT));
        assert_ne!(both, Modifiers::CTRL);
        assert!(Modifiers::default().is_empty());
    }

    #[test]
    fn opposite_keys_cancel() {
        assert_eq!(Key::W.direction() + Key::S.direction(), Vector3::zeros());
        assert_eq!(Key::A.direction() + Key::Right.direction(), Vector3::zeros());
        assert_eq!(Key::Q.direction() + Key::E.direction(), Vector3::zeros());
    }

    #[test]
    fn only_shift_changes_speed() {
        assert_eq!(Key::Shift.speed(), 1);
        assert_eq!(Key::W.speed(), 0);
        assert!(!Key::Escape.is_movement_key());
        assert!(Key::Shift.is_movement_key());
    }
}
