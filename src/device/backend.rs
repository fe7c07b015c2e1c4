//! Seams between the device manager and the platform input layer.

use super::error::BackendError;
use super::snapshot::{Capabilities, DeviceKind, DeviceSnapshot, HatState};
use std::fmt::Debug;

/// Platform input layer.
///
/// All reads see the state cached by the last [`InputBackend::update`] call,
/// so callers refresh once per frame before touching any device.
pub trait InputBackend: Debug {
    /// Drains pending platform events so cached device state is current.
    fn update(&mut self);

    /// Number of attached devices. Indices are not stable between calls.
    fn device_count(&self) -> Result<usize, BackendError>;

    /// Describes the device at `index` without keeping it open.
    fn describe(&self, index: usize) -> Result<DeviceDescription, BackendError>;

    /// Opens the device at `index`. Dropping the handle releases it.
    fn open(&mut self, index: usize) -> Result<Box<dyn DeviceHandle>, BackendError>;
}

/// An opened device, readable by index regardless of its kind.
///
/// Gamepads expose their semantic controls in a fixed index space chosen at
/// open time, so the interpreter never needs to know which kind it is reading
/// except to pick bindings.
pub trait DeviceHandle: Debug {
    fn name(&self) -> &str;

    fn kind(&self) -> DeviceKind;

    fn capabilities(&self) -> Capabilities;

    /// Cheap liveness check against the platform's cached state.
    fn is_attached(&self) -> bool;

    /// Signed 16-bit reading, 0 for indices the device lacks.
    fn axis(&self, index: usize) -> i16;

    fn button(&self, index: usize) -> bool;

    fn hat(&self, index: usize) -> HatState;

    /// Reads every control once.
    fn snapshot(&self) -> DeviceSnapshot {
        let capabilities = self.capabilities();
        DeviceSnapshot {
            kind: self.kind(),
            axes: (0..capabilities.axes).map(|i| self.axis(i)).collect(),
            buttons: (0..capabilities.buttons).map(|i| self.button(i)).collect(),
            hats: (0..capabilities.hats).map(|i| self.hat(i)).collect(),
        }
    }
}

/// What the platform reports about a connected device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescription {
    pub index: usize,
    pub name: String,
    pub kind: DeviceKind,
    pub capabilities: Capabilities,
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
    /// SDL-style GUID as 32 lowercase hex digits, if known.
    pub guid: Option<String>,
}
