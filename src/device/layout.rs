//! Fixed index space for semantically mapped gamepads.
//!
//! A gamepad is opened with its controls placed at these indices, so it can be
//! read through the same `axis(i)` / `button(i)` / `hat(i)` view as a raw
//! joystick.

use super::snapshot::Capabilities;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadAxis {
    LeftStickX,
    /// Negative is up.
    LeftStickY,
    RightStickX,
    /// Negative is up.
    RightStickY,
    LeftTrigger,
    RightTrigger,
}

impl GamepadAxis {
    pub const ALL: [GamepadAxis; 6] = [
        GamepadAxis::LeftStickX,
        GamepadAxis::LeftStickY,
        GamepadAxis::RightStickX,
        GamepadAxis::RightStickY,
        GamepadAxis::LeftTrigger,
        GamepadAxis::RightTrigger,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadButton {
    /// Bottom face button (A on Xbox layouts)
    South,
    /// Right face button
    East,
    /// Left face button
    West,
    /// Top face button
    North,
    LeftShoulder,
    RightShoulder,
    Select,
    Start,
    Mode,
    LeftStick,
    RightStick,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl GamepadButton {
    pub const ALL: [GamepadButton; 15] = [
        GamepadButton::South,
        GamepadButton::East,
        GamepadButton::West,
        GamepadButton::North,
        GamepadButton::LeftShoulder,
        GamepadButton::RightShoulder,
        GamepadButton::Select,
        GamepadButton::Start,
        GamepadButton::Mode,
        GamepadButton::LeftStick,
        GamepadButton::RightStick,
        GamepadButton::DPadUp,
        GamepadButton::DPadDown,
        GamepadButton::DPadLeft,
        GamepadButton::DPadRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Gamepads expose one hat, synthesized from the d-pad buttons.
pub const GAMEPAD_HATS: usize = 1;

pub const GAMEPAD_CAPABILITIES: Capabilities = Capabilities {
    axes: GamepadAxis::ALL.len(),
    buttons: GamepadButton::ALL.len(),
    hats: GAMEPAD_HATS,
    balls: 0,
};
