//! Button bindings and the zoom axis policy.

use super::intent::{ButtonAction, Edge};
use crate::device::layout::{GamepadAxis, GamepadButton};
use serde::{Deserialize, Serialize};

/// Binds one button index to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonBinding {
    pub button: usize,
    pub action: ButtonAction,
    /// Ignored for level actions.
    #[serde(default)]
    pub edge: Edge,
}

impl ButtonBinding {
    pub fn level(button: usize, action: ButtonAction) -> Self {
        Self {
            button,
            action,
            edge: Edge::Release,
        }
    }

    pub fn on_release(button: usize, action: ButtonAction) -> Self {
        Self {
            button,
            action,
            edge: Edge::Release,
        }
    }

    pub fn on_press(button: usize, action: ButtonAction) -> Self {
        Self {
            button,
            action,
            edge: Edge::Press,
        }
    }
}

/// Raw joystick defaults: button 0 toggles the mount mode when released,
/// button 1 holds slow movement. Higher indices are unbound.
pub fn default_joystick_bindings() -> Vec<ButtonBinding> {
    vec![
        ButtonBinding::on_release(0, ButtonAction::ToggleMountMode),
        ButtonBinding::level(1, ButtonAction::MoveSlow),
    ]
}

/// Fixed gamepad bindings over the semantic button layout.
pub fn gamepad_bindings() -> Vec<ButtonBinding> {
    use GamepadButton::*;
    vec![
        ButtonBinding::on_release(South.index(), ButtonAction::ToggleMountMode),
        ButtonBinding::level(East.index(), ButtonAction::MoveSlow),
        ButtonBinding::level(LeftStick.index(), ButtonAction::MoveSlow),
        ButtonBinding::level(RightStick.index(), ButtonAction::MoveSlow),
        ButtonBinding::on_release(West.index(), ButtonAction::AutoZoomOut),
        ButtonBinding::on_release(North.index(), ButtonAction::SetTimeNow),
        ButtonBinding::on_release(LeftShoulder.index(), ButtonAction::DecreaseTimeSpeed),
        ButtonBinding::on_release(RightShoulder.index(), ButtonAction::IncreaseTimeSpeed),
    ]
}

/// Which axis drives zooming, per device kind.
///
/// Raw joysticks and gamepads have historically disagreed here, so both
/// choices are explicit. An inverted axis has its sign flipped before the
/// deadzone test; negative still means zoom in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomPolicy {
    /// Zoom axis for joysticks with three or more axes. A single-axis
    /// joystick always zooms with axis 0.
    pub joystick_axis: usize,
    pub joystick_inverted: bool,
    /// Index in the gamepad layout; right stick Y by default.
    pub gamepad_axis: usize,
    pub gamepad_inverted: bool,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            joystick_axis: 2,
            joystick_inverted: false,
            gamepad_axis: GamepadAxis::RightStickY.index(),
            gamepad_inverted: false,
        }
    }
}
