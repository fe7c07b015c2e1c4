//! In-memory backend and recording motion collaborator for unit tests.

use crate::device::backend::{DeviceDescription, DeviceHandle, InputBackend};
use crate::device::error::BackendError;
use crate::device::layout::GAMEPAD_CAPABILITIES;
use crate::device::snapshot::{Capabilities, DeviceKind, Direction, HatState};
use crate::interpreter::intent::{ControlIntent, MotionControl};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct ScriptedDevice {
    id: u32,
    pub name: String,
    pub kind: DeviceKind,
    pub axes: Vec<i16>,
    pub buttons: Vec<bool>,
    pub hats: Vec<HatState>,
}

impl ScriptedDevice {
    pub fn joystick(axes: usize, buttons: usize, hats: usize) -> Self {
        Self {
            id: 0,
            name: format!("Stick {}x{}x{}", axes, buttons, hats),
            kind: DeviceKind::Joystick,
            axes: vec![0; axes],
            buttons: vec![false; buttons],
            hats: vec![HatState::Centered; hats],
        }
    }

    pub fn gamepad() -> Self {
        Self {
            id: 0,
            name: "Pad".to_string(),
            kind: DeviceKind::Gamepad,
            axes: vec![0; GAMEPAD_CAPABILITIES.axes],
            buttons: vec![false; GAMEPAD_CAPABILITIES.buttons],
            hats: vec![HatState::Centered; GAMEPAD_CAPABILITIES.hats],
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            axes: self.axes.len(),
            buttons: self.buttons.len(),
            hats: self.hats.len(),
            balls: 0,
        }
    }
}

#[derive(Debug, Default)]
struct Platform {
    devices: Vec<ScriptedDevice>,
    next_id: u32,
    fail_enumeration: bool,
    fail_open: bool,
    open_handles: usize,
    total_opens: usize,
    updates: usize,
}

impl Platform {
    fn device(&self, id: u32) -> Option<&ScriptedDevice> {
        self.devices.iter().find(|d| d.id == id)
    }
}

/// Backend whose devices are edited directly by the test. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    platform: Rc<RefCell<Platform>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, mut device: ScriptedDevice) {
        let mut platform = self.platform.borrow_mut();
        platform.next_id += 1;
        device.id = platform.next_id;
        platform.devices.push(device);
    }

    pub fn disconnect(&self, index: usize) {
        self.platform.borrow_mut().devices.remove(index);
    }

    pub fn set_axes(&self, index: usize, axes: &[i16]) {
        self.platform.borrow_mut().devices[index].axes = axes.to_vec();
    }

    pub fn set_button(&self, index: usize, button: usize, pressed: bool) {
        self.platform.borrow_mut().devices[index].buttons[button] = pressed;
    }

    pub fn set_hat(&self, index: usize, hat: usize, state: HatState) {
        self.platform.borrow_mut().devices[index].hats[hat] = state;
    }

    pub fn fail_enumeration(&self, fail: bool) {
        self.platform.borrow_mut().fail_enumeration = fail;
    }

    pub fn fail_open(&self, fail: bool) {
        self.platform.borrow_mut().fail_open = fail;
    }

    pub fn open_handles(&self) -> usize {
        self.platform.borrow().open_handles
    }

    pub fn total_opens(&self) -> usize {
        self.platform.borrow().total_opens
    }

    pub fn updates(&self) -> usize {
        self.platform.borrow().updates
    }
}

impl InputBackend for ScriptedBackend {
    fn update(&mut self) {
        self.platform.borrow_mut().updates += 1;
    }

    fn device_count(&self) -> Result<usize, BackendError> {
        let platform = self.platform.borrow();
        if platform.fail_enumeration {
            return Err(BackendError::EnumerationError("scripted failure".into()));
        }
        Ok(platform.devices.len())
    }

    fn describe(&self, index: usize) -> Result<DeviceDescription, BackendError> {
        let platform = self.platform.borrow();
        let device = platform
            .devices
            .get(index)
            .ok_or(BackendError::NoSuchDevice(index))?;
        Ok(DeviceDescription {
            index,
            name: device.name.clone(),
            kind: device.kind,
            capabilities: device.capabilities(),
            vendor_id: None,
            product_id: None,
            guid: None,
        })
    }

    fn open(&mut self, index: usize) -> Result<Box<dyn DeviceHandle>, BackendError> {
        let mut platform = self.platform.borrow_mut();
        if platform.fail_open {
            return Err(BackendError::OpenError {
                index,
                reason: "scripted failure".into(),
            });
        }
        let device = platform
            .devices
            .get(index)
            .cloned()
            .ok_or(BackendError::NoSuchDevice(index))?;
        platform.open_handles += 1;
        platform.total_opens += 1;
        Ok(Box::new(ScriptedHandle {
            platform: Rc::clone(&self.platform),
            id: device.id,
            name: device.name.clone(),
            kind: device.kind,
            capabilities: device.capabilities(),
        }))
    }
}

#[derive(Debug)]
struct ScriptedHandle {
    platform: Rc<RefCell<Platform>>,
    id: u32,
    name: String,
    kind: DeviceKind,
    capabilities: Capabilities,
}

impl DeviceHandle for ScriptedHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DeviceKind {
        self.kind
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn is_attached(&self) -> bool {
        self.platform.borrow().device(self.id).is_some()
    }

    fn axis(&self, index: usize) -> i16 {
        let platform = self.platform.borrow();
        platform
            .device(self.id)
            .and_then(|d| d.axes.get(index).copied())
            .unwrap_or(0)
    }

    fn button(&self, index: usize) -> bool {
        let platform = self.platform.borrow();
        platform
            .device(self.id)
            .and_then(|d| d.buttons.get(index).copied())
            .unwrap_or(false)
    }

    fn hat(&self, index: usize) -> HatState {
        let platform = self.platform.borrow();
        platform
            .device(self.id)
            .and_then(|d| d.hats.get(index).copied())
            .unwrap_or_default()
    }
}

impl Drop for ScriptedHandle {
    fn drop(&mut self) {
        self.platform.borrow_mut().open_handles -= 1;
    }
}

/// Records every call in order as the equivalent intent.
#[derive(Debug, Default)]
pub struct RecordingMotion {
    pub calls: Vec<ControlIntent>,
}

impl RecordingMotion {
    pub fn count(&self, intent: ControlIntent) -> usize {
        self.calls.iter().filter(|c| **c == intent).count()
    }
}

impl MotionControl for RecordingMotion {
    fn turn_up(&mut self, active: bool) {
        self.calls.push(ControlIntent::turn(Direction::Up, active));
    }

    fn turn_down(&mut self, active: bool) {
        self.calls.push(ControlIntent::turn(Direction::Down, active));
    }

    fn turn_left(&mut self, active: bool) {
        self.calls.push(ControlIntent::turn(Direction::Left, active));
    }

    fn turn_right(&mut self, active: bool) {
        self.calls.push(ControlIntent::turn(Direction::Right, active));
    }

    fn zoom_in(&mut self, active: bool) {
        self.calls.push(ControlIntent::ZoomIn(active));
    }

    fn zoom_out(&mut self, active: bool) {
        self.calls.push(ControlIntent::ZoomOut(active));
    }

    fn move_slow(&mut self, active: bool) {
        self.calls.push(ControlIntent::MoveSlow(active));
    }

    fn toggle_mount_mode(&mut self) {
        self.calls.push(ControlIntent::ToggleMountMode);
    }

    fn auto_zoom_out(&mut self) {
        self.calls.push(ControlIntent::AutoZoomOut);
    }

    fn set_time_now(&mut self) {
        self.calls.push(ControlIntent::SetTimeNow);
    }

    fn increase_time_speed(&mut self) {
        self.calls.push(ControlIntent::IncreaseTimeSpeed);
    }

    fn decrease_time_speed(&mut self) {
        self.calls.push(ControlIntent::DecreaseTimeSpeed);
    }
}
