use super::bindings::ZoomPolicy;
use super::intent::ControlIntent;
use crate::device::snapshot::{DeviceKind, DeviceSnapshot, Direction};

/// Which intents an axis drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRole {
    /// Negative turns left (counterclockwise), positive right.
    Horizontal,
    /// Negative turns up, positive down.
    Vertical,
    /// Negative zooms in, positive out.
    Zoom,
}

/// Negative and positive activation of an axis. Values on the threshold do
/// not count.
pub fn deflection(value: i16, threshold: i16) -> (bool, bool) {
    let value = i32::from(value);
    let threshold = i32::from(threshold);
    (value < -threshold, value > threshold)
}

/// Axis roles for a device, as `(index, role, inverted)`.
pub fn axis_roles(
    kind: DeviceKind,
    axis_count: usize,
    zoom: &ZoomPolicy,
) -> Vec<(usize, AxisRole, bool)> {
    let mut roles = Vec::with_capacity(3);
    match kind {
        DeviceKind::Joystick => {
            if axis_count == 1 {
                roles.push((0, AxisRole::Zoom, zoom.joystick_inverted));
                return roles;
            }
            if axis_count >= 2 {
                roles.push((0, AxisRole::Horizontal, false));
                roles.push((1, AxisRole::Vertical, false));
            }
            if zoom.joystick_axis >= 2 && zoom.joystick_axis < axis_count {
                roles.push((zoom.joystick_axis, AxisRole::Zoom, zoom.joystick_inverted));
            }
        }
        DeviceKind::Gamepad => {
            if axis_count >= 2 {
                roles.push((0, AxisRole::Horizontal, false));
                roles.push((1, AxisRole::Vertical, false));
            }
            if zoom.gamepad_axis < axis_count {
                roles.push((zoom.gamepad_axis, AxisRole::Zoom, zoom.gamepad_inverted));
            }
        }
    }
    roles
}

pub(super) fn interpret_axes(
    snapshot: &DeviceSnapshot,
    threshold: i16,
    zoom: &ZoomPolicy,
    out: &mut Vec<ControlIntent>,
) {
    for (index, role, inverted) in axis_roles(snapshot.kind, snapshot.axes.len(), zoom) {
        let raw = snapshot.axes[index];
        let value = if inverted { raw.saturating_neg() } else { raw };
        let (negative, positive) = deflection(value, threshold);

        match role {
            AxisRole::Horizontal => {
                out.push(ControlIntent::turn(Direction::Left, negative));
                out.push(ControlIntent::turn(Direction::Right, positive));
            }
            AxisRole::Vertical => {
                out.push(ControlIntent::turn(Direction::Up, negative));
                out.push(ControlIntent::turn(Direction::Down, positive));
            }
            AxisRole::Zoom => {
                out.push(ControlIntent::ZoomIn(negative));
                out.push(ControlIntent::ZoomOut(positive));
            }
        }
    }
}
