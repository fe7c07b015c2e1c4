//! Input interpreter
//!
//! Turns one frame's [`DeviceSnapshot`] plus the previous frame's button and
//! hat state into [`ControlIntent`]s for the motion collaborator.
//!
//! ```text
//! DeviceSnapshot ──► axes ──► buttons ──► hats ──► Vec<ControlIntent>
//!                              ▲            ▲
//!                              └ PreviousState (updated after each frame)
//! ```
//!
//! Joysticks and gamepads go through the same pipeline. They differ only in
//! which axis zooms and which button bindings apply.

pub mod axes;
pub mod bindings;
mod buttons;
mod hats;
pub mod intent;

pub use crate::device::snapshot::Direction;
pub use bindings::{ButtonBinding, ZoomPolicy};
pub use intent::{ButtonAction, ControlIntent, Edge, MotionControl};

use crate::device::snapshot::{DeviceKind, DeviceSnapshot, PreviousState};
use tracing::trace;

/// Default deadzone: a quarter of the signed 16-bit range.
pub const DEFAULT_AXIS_THRESHOLD: i16 = 8192;

#[derive(Clone, Debug)]
pub struct InterpreterSettings {
    /// Readings in `[-axis_threshold, axis_threshold]` are neutral.
    pub axis_threshold: i16,
    pub zoom: ZoomPolicy,
    pub joystick_buttons: Vec<ButtonBinding>,
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            axis_threshold: DEFAULT_AXIS_THRESHOLD,
            zoom: ZoomPolicy::default(),
            joystick_buttons: bindings::default_joystick_bindings(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Interpreter {
    settings: InterpreterSettings,
    gamepad_buttons: Vec<ButtonBinding>,
}

impl Interpreter {
    pub fn new(settings: InterpreterSettings) -> Self {
        Self {
            settings,
            gamepad_buttons: bindings::gamepad_bindings(),
        }
    }

    pub fn settings(&self) -> &InterpreterSettings {
        &self.settings
    }

    pub fn bindings_for(&self, kind: DeviceKind) -> &[ButtonBinding] {
        match kind {
            DeviceKind::Joystick => &self.settings.joystick_buttons,
            DeviceKind::Gamepad => &self.gamepad_buttons,
        }
    }

    /// Interprets one frame and stores its button and hat state in `previous`.
    pub fn interpret(
        &self,
        snapshot: &DeviceSnapshot,
        previous: &mut PreviousState,
    ) -> Vec<ControlIntent> {
        let mut intents = Vec::new();

        axes::interpret_axes(
            snapshot,
            self.settings.axis_threshold,
            &self.settings.zoom,
            &mut intents,
        );
        buttons::interpret_buttons(
            snapshot,
            previous,
            self.bindings_for(snapshot.kind),
            &mut intents,
        );
        hats::interpret_hats(snapshot, previous, &mut intents);

        previous.remember(snapshot);
        trace!("Interpreted {} snapshot: {:?}", snapshot.kind, intents);
        intents
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::layout::{GamepadButton, GAMEPAD_CAPABILITIES};
    use crate::device::snapshot::{Capabilities, HatState};

    fn joystick_state(buttons: usize, hats: usize) -> PreviousState {
        PreviousState::for_capabilities(&Capabilities {
            axes: 2,
            buttons,
            hats,
            balls: 0,
        })
    }

    #[test]
    fn centered_hat_does_not_clobber_axis_turns() {
        let interpreter = Interpreter::default();
        let mut previous = joystick_state(0, 1);
        let snapshot =
            DeviceSnapshot::joystick(vec![-20000, 0], vec![], vec![HatState::Centered]);

        let intents = interpreter.interpret(&snapshot, &mut previous);
        let last_left = intents
            .iter()
            .rev()
            .find(|i| matches!(i, ControlIntent::Turn { direction: Direction::Left, .. }));
        assert_eq!(last_left, Some(&ControlIntent::turn(Direction::Left, true)));
    }

    #[test]
    fn hat_release_clears_after_axes() {
        let interpreter = Interpreter::default();
        let mut previous = joystick_state(0, 1);

        let held = DeviceSnapshot::joystick(vec![0, 0], vec![], vec![HatState::Down]);
        interpreter.interpret(&held, &mut previous);

        let released = DeviceSnapshot::joystick(vec![0, 0], vec![], vec![HatState::Centered]);
        let intents = interpreter.interpret(&released, &mut previous);
        assert_eq!(
            &intents[4..],
            &Direction::ALL.map(|d| ControlIntent::turn(d, false))
        );
    }

    #[test]
    fn gamepad_face_button_toggles_on_release_only() {
        let interpreter = Interpreter::default();
        let mut previous = PreviousState::for_capabilities(&GAMEPAD_CAPABILITIES);
        let south = GamepadButton::South.index();

        let toggles: Vec<usize> = [false, true, true, false]
            .into_iter()
            .map(|pressed| {
                let mut buttons = vec![false; GAMEPAD_CAPABILITIES.buttons];
                buttons[south] = pressed;
                let snapshot = DeviceSnapshot::gamepad(
                    vec![0; GAMEPAD_CAPABILITIES.axes],
                    buttons,
                    vec![HatState::Centered],
                );
                interpreter
                    .interpret(&snapshot, &mut previous)
                    .into_iter()
                    .filter(|i| *i == ControlIntent::ToggleMountMode)
                    .count()
            })
            .collect();
        assert_eq!(toggles, vec![0, 0, 0, 1]);
    }

    #[test]
    fn gamepad_uses_fixed_bindings_not_joystick_bindings() {
        let settings = InterpreterSettings {
            joystick_buttons: vec![ButtonBinding::on_release(0, ButtonAction::SetTimeNow)],
            ..InterpreterSettings::default()
        };
        let interpreter = Interpreter::new(settings);
        assert_eq!(
            interpreter.bindings_for(DeviceKind::Gamepad)[0].action,
            ButtonAction::ToggleMountMode
        );
        assert_eq!(
            interpreter.bindings_for(DeviceKind::Joystick)[0].action,
            ButtonAction::SetTimeNow
        );
    }

    #[test]
    fn interpret_updates_previous_state() {
        let interpreter = Interpreter::default();
        let mut previous = joystick_state(2, 1);
        let snapshot =
            DeviceSnapshot::joystick(vec![0, 0], vec![true, false], vec![HatState::Left]);
        interpreter.interpret(&snapshot, &mut previous);
        assert!(previous.button(0));
        assert_eq!(previous.hat(0), HatState::Left);
    }
}
