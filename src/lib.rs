//! Joystick and gamepad support for a planetarium's camera controls.
//!
//! Once per rendered frame the host calls [`JoystickSupport::update`]. That
//! refreshes the platform input layer, keeps one device open, and turns its
//! axes, buttons and hats into calls on the host's [`MotionControl`].

pub mod config;
pub mod device;
pub mod interpreter;
pub mod service;
pub mod support;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, JoystickConfig};
pub use device::{DeviceKind, DeviceManager, DeviceSnapshot, GilrsBackend, InputBackend};
pub use interpreter::{ControlIntent, Direction, Interpreter, MotionControl};
pub use service::{FrameOutcome, InputService};
pub use support::{BackendConnector, JoystickSupport};
