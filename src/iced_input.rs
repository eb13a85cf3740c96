//! Translation of iced mouse and keyboard events into navigation input.

use iced::keyboard::{self, key::Named};
use iced::{Point, mouse};
use nalgebra::{Point2, Vector2};

use crate::input::{InputEvent, Key, KeyEvent, Modifiers, MouseButton, PointerEvent, WheelEvent};
use crate::sensitivity::WHEEL_DETENT;

pub fn modifiers(modifiers: keyboard::Modifiers) -> Modifiers {
    let mut result = Modifiers::NONE;
    if modifiers.shift() {
        result = result | Modifiers::SHIFT;
    }
    if modifiers.control() {
        result = result | Modifiers::CTRL;
    }
    if modifiers.alt() {
        result = result | Modifiers::ALT;
    }
    result
}

pub fn key(key: &keyboard::Key) -> Key {
    match key {
        keyboard::Key::Named(named) => match named {
            Named::ArrowUp => Key::Up,
            Named::ArrowDown => Key::Down,
            Named::ArrowLeft => Key::Left,
            Named::ArrowRight => Key::Right,
            Named::Shift => Key::Shift,
            Named::Enter => Key::Enter,
            Named::Escape => Key::Escape,
            Named::F4 => Key::F4,
            _ => Key::Other,
        },
        keyboard::Key::Character(c) => match c.as_str().to_ascii_lowercase().as_str() {
            "w" => Key::W,
            "a" => Key::A,
            "s" => Key::S,
            "d" => Key::D,
            "q" => Key::Q,
            "e" => Key::E,
            _ => Key::Other,
        },
        keyboard::Key::Unidentified => Key::Other,
    }
}

pub fn mouse_button(button: mouse::Button) -> MouseButton {
    match button {
        mouse::Button::Left => MouseButton::Left,
        mouse::Button::Right => MouseButton::Right,
        mouse::Button::Middle => MouseButton::Middle,
        mouse::Button::Back => MouseButton::Other(3),
        mouse::Button::Forward => MouseButton::Other(4),
        mouse::Button::Other(id) => MouseButton::Other(id),
    }
}

/// Scroll delta in wheel angle units: one line is one detent, pixel deltas
/// pass through unchanged.
pub fn wheel_angle_delta(delta: mouse::ScrollDelta) -> Vector2<i32> {
    let (x, y) = match delta {
        mouse::ScrollDelta::Lines { x, y } => (x * WHEEL_DETENT, y * WHEEL_DETENT),
        mouse::ScrollDelta::Pixels { x, y } => (x, y),
    };
    Vector2::new(x.round() as i32, y.round() as i32)
}

/// Translates a mouse event. `position` is the cursor in viewport-local
/// pixels; pointer events without a position are dropped.
pub fn translate_mouse(
    event: &mouse::Event,
    position: Option<Point>,
    modifiers: Modifiers,
) -> Option<InputEvent> {
    let local = position.map(|p| Point2::new(p.x, p.y));

    match *event {
        mouse::Event::CursorMoved { .. } => local.map(|p| {
            InputEvent::MouseMove(PointerEvent {
                modifiers,
                ..PointerEvent::moved(p)
            })
        }),
        mouse::Event::ButtonPressed(button) => local.map(|p| {
            InputEvent::MousePress(PointerEvent::button(p, mouse_button(button), modifiers))
        }),
        mouse::Event::ButtonReleased(button) => local.map(|p| {
            InputEvent::MouseRelease(PointerEvent::button(p, mouse_button(button), modifiers))
        }),
        mouse::Event::WheelScrolled { delta } => Some(InputEvent::Wheel(WheelEvent {
            angle_delta: wheel_angle_delta(delta),
            modifiers,
        })),
        mouse::Event::CursorEntered | mouse::Event::CursorLeft => None,
    }
}

/// Translates a key press or release. Keys navigation does not know about
/// are dropped.
pub fn translate_keyboard(event: &keyboard::Event) -> Option<InputEvent> {
    let (pressed, event) = match event {
        keyboard::Event::KeyPressed {
            key: k,
            modifiers: m,
            ..
        } => (true, KeyEvent::new(key(k), modifiers(*m))),
        keyboard::Event::KeyReleased {
            key: k,
            modifiers: m,
            ..
        } => (false, KeyEvent::new(key(k), modifiers(*m))),
        _ => return None,
    };

    if event.key == Key::Other {
        return None;
    }
    Some(if pressed {
        InputEvent::KeyPress(event)
    } else {
        InputEvent::KeyRelease(event)
    })
}
