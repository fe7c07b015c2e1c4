use super::intent::ControlIntent;
use crate::device::snapshot::{DeviceSnapshot, Direction, HatState, PreviousState};

/// Hats drive the turn intents directly.
///
/// A held direction is re-asserted every frame. Directions the hat just left
/// are cleared. Returning to center clears all four turn intents only when the
/// hat was off-center last frame, so a resting hat never overrides turns the
/// axes set in the same frame.
pub(super) fn interpret_hats(
    snapshot: &DeviceSnapshot,
    previous: &PreviousState,
    out: &mut Vec<ControlIntent>,
) {
    for (index, &current) in snapshot.hats.iter().enumerate() {
        hat_intents(previous.hat(index), current, out);
    }
}

fn hat_intents(previous: HatState, current: HatState, out: &mut Vec<ControlIntent>) {
    if current.is_centered() {
        if !previous.is_centered() {
            out.extend(Direction::ALL.map(|d| ControlIntent::turn(d, false)));
        }
        return;
    }

    for direction in Direction::ALL {
        if current.contains(direction) {
            out.push(ControlIntent::turn(direction, true));
        } else if previous.contains(direction) {
            out.push(ControlIntent::turn(direction, false));
        }
    }
}
