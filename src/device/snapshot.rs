//! Per-frame device state and the previous-frame buffers used for edge detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the platform classified a device when it was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    /// Axes, buttons and hats are addressed by raw index only.
    Joystick,
    /// The platform knows a semantic mapping; controls are laid out in the
    /// fixed gamepad index space.
    Gamepad,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Joystick => write!(f, "joystick"),
            DeviceKind::Gamepad => write!(f, "gamepad"),
        }
    }
}

/// Control counts reported by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub axes: usize,
    pub buttons: usize,
    pub hats: usize,
    pub balls: usize,
}

/// One of the four turn directions. Also the components of a hat position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// 8-way hat switch position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HatState {
    #[default]
    Centered,
    Up,
    RightUp,
    Right,
    RightDown,
    Down,
    LeftDown,
    Left,
    LeftUp,
}

impl HatState {
    /// Builds a hat position from its four switches. Opposing switches cancel.
    pub fn from_switches(up: bool, down: bool, left: bool, right: bool) -> Self {
        let vertical = (up as i8) - (down as i8);
        let horizontal = (right as i8) - (left as i8);
        Self::from_components(horizontal, vertical)
    }

    /// Builds a hat position from signed components, positive meaning right/up.
    pub fn from_components(horizontal: i8, vertical: i8) -> Self {
        match (horizontal.signum(), vertical.signum()) {
            (0, 0) => HatState::Centered,
            (0, 1) => HatState::Up,
            (1, 1) => HatState::RightUp,
            (1, 0) => HatState::Right,
            (1, -1) => HatState::RightDown,
            (0, -1) => HatState::Down,
            (-1, -1) => HatState::LeftDown,
            (-1, 0) => HatState::Left,
            _ => HatState::LeftUp,
        }
    }

    pub fn is_centered(self) -> bool {
        self == HatState::Centered
    }

    /// True if this position asserts `direction`. Diagonals assert two.
    pub fn contains(self, direction: Direction) -> bool {
        use HatState::*;
        match direction {
            Direction::Up => matches!(self, Up | RightUp | LeftUp),
            Direction::Down => matches!(self, Down | RightDown | LeftDown),
            Direction::Left => matches!(self, Left | LeftUp | LeftDown),
            Direction::Right => matches!(self, Right | RightUp | RightDown),
        }
    }
}

/// Raw state of the active device for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSnapshot {
    pub kind: DeviceKind,
    pub axes: Vec<i16>,
    pub buttons: Vec<bool>,
    pub hats: Vec<HatState>,
}

impl DeviceSnapshot {
    pub fn joystick(axes: Vec<i16>, buttons: Vec<bool>, hats: Vec<HatState>) -> Self {
        Self {
            kind: DeviceKind::Joystick,
            axes,
            buttons,
            hats,
        }
    }

    pub fn gamepad(axes: Vec<i16>, buttons: Vec<bool>, hats: Vec<HatState>) -> Self {
        Self {
            kind: DeviceKind::Gamepad,
            axes,
            buttons,
            hats,
        }
    }
}

/// Button and hat state as of the previous frame.
///
/// Sized to the active device's capabilities when the device is opened and
/// discarded with it, so it is never read without an active device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousState {
    pub(crate) buttons: Vec<bool>,
    pub(crate) hats: Vec<HatState>,
}

impl PreviousState {
    /// All buttons released and all hats centered.
    pub fn for_capabilities(capabilities: &Capabilities) -> Self {
        Self {
            buttons: vec![false; capabilities.buttons],
            hats: vec![HatState::Centered; capabilities.hats],
        }
    }

    pub fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    pub fn hat(&self, index: usize) -> HatState {
        self.hats.get(index).copied().unwrap_or_default()
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    pub fn hat_count(&self) -> usize {
        self.hats.len()
    }

    /// Stores this frame's state for the next frame's comparison.
    pub(crate) fn remember(&mut self, snapshot: &DeviceSnapshot) {
        for (slot, pressed) in self.buttons.iter_mut().zip(&snapshot.buttons) {
            *slot = *pressed;
        }
        for (slot, hat) in self.hats.iter_mut().zip(&snapshot.hats) {
            *slot = *hat;
        }
    }
}
