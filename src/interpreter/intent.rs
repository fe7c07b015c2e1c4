//! Control intents and the motion collaborator that consumes them.

use crate::device::snapshot::Direction;
use serde::{Deserialize, Serialize};

/// The camera/movement side of the host application.
///
/// Level-triggered setters are called every frame their input is held and
/// must tolerate repeated calls with the same value.
pub trait MotionControl {
    fn turn_up(&mut self, active: bool);
    fn turn_down(&mut self, active: bool);
    fn turn_left(&mut self, active: bool);
    fn turn_right(&mut self, active: bool);
    fn zoom_in(&mut self, active: bool);
    fn zoom_out(&mut self, active: bool);
    fn move_slow(&mut self, active: bool);

    fn toggle_mount_mode(&mut self);
    fn auto_zoom_out(&mut self);
    fn set_time_now(&mut self);
    fn increase_time_speed(&mut self);
    fn decrease_time_speed(&mut self);

    fn turn(&mut self, direction: Direction, active: bool) {
        match direction {
            Direction::Up => self.turn_up(active),
            Direction::Down => self.turn_down(active),
            Direction::Left => self.turn_left(active),
            Direction::Right => self.turn_right(active),
        }
    }
}

/// One signal to the motion collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlIntent {
    Turn { direction: Direction, active: bool },
    ZoomIn(bool),
    ZoomOut(bool),
    MoveSlow(bool),
    ToggleMountMode,
    AutoZoomOut,
    SetTimeNow,
    IncreaseTimeSpeed,
    DecreaseTimeSpeed,
}

impl ControlIntent {
    pub fn turn(direction: Direction, active: bool) -> Self {
        ControlIntent::Turn { direction, active }
    }

    /// True for intents that fire once per transition.
    pub fn is_edge(&self) -> bool {
        !matches!(
            self,
            ControlIntent::Turn { .. }
                | ControlIntent::ZoomIn(_)
                | ControlIntent::ZoomOut(_)
                | ControlIntent::MoveSlow(_)
        )
    }

    pub fn apply(&self, motion: &mut dyn MotionControl) {
        match *self {
            ControlIntent::Turn { direction, active } => motion.turn(direction, active),
            ControlIntent::ZoomIn(active) => motion.zoom_in(active),
            ControlIntent::ZoomOut(active) => motion.zoom_out(active),
            ControlIntent::MoveSlow(active) => motion.move_slow(active),
            ControlIntent::ToggleMountMode => motion.toggle_mount_mode(),
            ControlIntent::AutoZoomOut => motion.auto_zoom_out(),
            ControlIntent::SetTimeNow => motion.set_time_now(),
            ControlIntent::IncreaseTimeSpeed => motion.increase_time_speed(),
            ControlIntent::DecreaseTimeSpeed => motion.decrease_time_speed(),
        }
    }
}

/// What a button can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    /// Level-triggered: follows the button every frame.
    MoveSlow,
    ToggleMountMode,
    AutoZoomOut,
    SetTimeNow,
    IncreaseTimeSpeed,
    DecreaseTimeSpeed,
}

impl ButtonAction {
    pub fn is_level(self) -> bool {
        matches!(self, ButtonAction::MoveSlow)
    }

    /// Intent for an edge action. `None` for level actions.
    pub fn edge_intent(self) -> Option<ControlIntent> {
        match self {
            ButtonAction::MoveSlow => None,
            ButtonAction::ToggleMountMode => Some(ControlIntent::ToggleMountMode),
            ButtonAction::AutoZoomOut => Some(ControlIntent::AutoZoomOut),
            ButtonAction::SetTimeNow => Some(ControlIntent::SetTimeNow),
            ButtonAction::IncreaseTimeSpeed => Some(ControlIntent::IncreaseTimeSpeed),
            ButtonAction::DecreaseTimeSpeed => Some(ControlIntent::DecreaseTimeSpeed),
        }
    }

    /// Intent for a level action at the given button level.
    pub fn level_intent(self, active: bool) -> Option<ControlIntent> {
        match self {
            ButtonAction::MoveSlow => Some(ControlIntent::MoveSlow(active)),
            _ => None,
        }
    }
}

/// Which transition fires an edge action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Press,
    #[default]
    Release,
}

impl Edge {
    pub fn fired(self, was_pressed: bool, is_pressed: bool) -> bool {
        match self {
            Edge::Press => !was_pressed && is_pressed,
            Edge::Release => was_pressed && !is_pressed,
        }
    }
}
