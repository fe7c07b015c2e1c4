use super::bindings::ButtonBinding;
use super::intent::{ButtonAction, ControlIntent};
use crate::device::snapshot::{DeviceSnapshot, PreviousState};

/// Edge actions fire in binding order. Level actions follow, once each, as
/// the OR of every present button bound to them.
pub(super) fn interpret_buttons(
    snapshot: &DeviceSnapshot,
    previous: &PreviousState,
    bindings: &[ButtonBinding],
    out: &mut Vec<ControlIntent>,
) {
    let mut levels: Vec<(ButtonAction, bool)> = Vec::new();

    for binding in bindings {
        let Some(&pressed) = snapshot.buttons.get(binding.button) else {
            continue;
        };

        if binding.action.is_level() {
            match levels.iter_mut().find(|(action, _)| *action == binding.action) {
                Some((_, level)) => *level |= pressed,
                None => levels.push((binding.action, pressed)),
            }
            continue;
        }

        let was_pressed = previous.button(binding.button);
        if binding.edge.fired(was_pressed, pressed) {
            out.extend(binding.action.edge_intent());
        }
    }

    out.extend(
        levels
            .into_iter()
            .filter_map(|(action, level)| action.level_intent(level)),
    );
}
