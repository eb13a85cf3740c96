//! Interaction modes and the mouse-button dispatch table.

use std::fmt;

use crate::input::{Modifiers, MouseButton};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Idle,
    Fps,
    TurntableRotate,
    TurntableShift,
    TurntableZoom,
}

impl Mode {
    pub const TURNTABLE: [Mode; 3] = [
        Mode::TurntableRotate,
        Mode::TurntableShift,
        Mode::TurntableZoom,
    ];

    pub fn is_turntable(self) -> bool {
        Mode::TURNTABLE.contains(&self)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Idle => write!(f, "Idle"),
            Mode::Fps => write!(f, "FPS"),
            Mode::TurntableRotate => write!(f, "Turntable rotate"),
            Mode::TurntableShift => write!(f, "Turntable shift"),
            Mode::TurntableZoom => write!(f, "Turntable zoom"),
        }
    }
}

/// What a mouse-button press does in the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressAction {
    StopFps { keep_changes: bool },
    ResetTilt,
    /// Grab the pivot and enter the given turntable mode.
    EnterTurntable(Mode),
}

#[derive(Debug, Clone, Copy)]
enum ModifierMatch {
    Any,
    Exactly(Modifiers),
}

impl ModifierMatch {
    fn matches(self, modifiers: Modifiers) -> bool {
        match self {
            ModifierMatch::Any => true,
            ModifierMatch::Exactly(expected) => expected == modifiers,
        }
    }
}

const PRESS_TABLE: [(Mode, MouseButton, ModifierMatch, PressAction); 6] = [
    (
        Mode::Fps,
        MouseButton::Left,
        ModifierMatch::Any,
        PressAction::StopFps { keep_changes: true },
    ),
    (
        Mode::Fps,
        MouseButton::Right,
        ModifierMatch::Any,
        PressAction::StopFps {
            keep_changes: false,
        },
    ),
    (
        Mode::Fps,
        MouseButton::Middle,
        ModifierMatch::Exactly(Modifiers::CTRL),
        PressAction::ResetTilt,
    ),
    (
        Mode::Idle,
        MouseButton::Middle,
        ModifierMatch::Exactly(Modifiers::NONE),
        PressAction::EnterTurntable(Mode::TurntableRotate),
    ),
    (
        Mode::Idle,
        MouseButton::Middle,
        ModifierMatch::Exactly(Modifiers::SHIFT),
        PressAction::EnterTurntable(Mode::TurntableShift),
    ),
    (
        Mode::Idle,
        MouseButton::Middle,
        ModifierMatch::Exactly(Modifiers::CTRL),
        PressAction::EnterTurntable(Mode::TurntableZoom),
    ),
];

/// Looks up the action for a button press; unlisted combinations do nothing.
pub fn press_action(mode: Mode, button: MouseButton, modifiers: Modifiers) -> Option<PressAction> {
    PRESS_TABLE
        .iter()
        .find(|(m, b, mods, _)| *m == mode && *b == button && mods.matches(modifiers))
        .map(|(_, _, _, action)| *action)
}
