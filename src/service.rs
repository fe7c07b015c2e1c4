//! Frame-driven input service.
//!
//! One call to [`InputService::poll_frame`] refreshes the platform, keeps the
//! active device consistent with what is attached, and either interprets the
//! device fully or skips the frame. Nothing blocks and nothing is retried
//! within a frame; a device that vanished is reopened on a later frame.

use crate::config::JoystickConfig;
use crate::device::backend::InputBackend;
use crate::device::manager::DeviceManager;
use crate::device::mapping_db::MappingDatabase;
use crate::device::snapshot::DeviceKind;
use crate::interpreter::intent::{ControlIntent, MotionControl};
use crate::interpreter::Interpreter;
use statum::{machine, state};
use tracing::{debug, info, warn};

/// Result of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The module has no input subsystem.
    Inactive,
    /// The platform could not list devices; nothing changed.
    EnumerationFailed,
    NoDevice,
    /// The active device went away and was closed.
    Disconnected,
    OpenFailed,
    Interpreted {
        kind: DeviceKind,
        intents: Vec<ControlIntent>,
    },
}

impl FrameOutcome {
    pub fn intents(&self) -> &[ControlIntent] {
        match self {
            FrameOutcome::Interpreted { intents, .. } => intents,
            _ => &[],
        }
    }
}

#[state]
#[derive(Debug, Clone)]
pub enum ServiceState {
    Initializing,
    Polling,
}

#[machine]
#[derive(Debug)]
pub struct InputService<S: ServiceState> {
    // Device selection and previous-state buffers
    manager: DeviceManager,

    interpreter: Interpreter,

    // Read-only after startup
    mappings: Option<MappingDatabase>,

    device_index: usize,

    devices_described: bool,
}

impl<S: ServiceState> InputService<S> {
    pub fn manager(&self) -> &DeviceManager {
        &self.manager
    }

    pub fn mappings(&self) -> Option<&MappingDatabase> {
        self.mappings.as_ref()
    }
}

impl InputService<Initializing> {
    pub fn create(
        config: &JoystickConfig,
        backend: Box<dyn InputBackend>,
        mappings: Option<MappingDatabase>,
    ) -> Self {
        let settings = config.interpreter_settings();
        debug!("Creating input service with settings: {:?}", settings);

        Self::new(
            DeviceManager::new(backend),
            Interpreter::new(settings),
            mappings,
            config.device_index,
            false,
        )
    }

    /// Resets device state and starts polling.
    pub fn initialize(mut self) -> InputService<Polling> {
        self.manager.close();
        self.devices_described = false;
        info!(
            "Input service ready, using device index {} ({} controller mappings)",
            self.device_index,
            self.mappings.as_ref().map(MappingDatabase::len).unwrap_or(0)
        );
        self.transition()
    }
}

impl InputService<Polling> {
    /// Runs one poll-and-interpret pass and applies the intents to `motion`.
    pub fn poll_frame(&mut self, motion: &mut dyn MotionControl) -> FrameOutcome {
        let device_count = match self.manager.refresh_device_list() {
            Ok(count) => count,
            Err(e) => {
                warn!("Error finding number of devices: {}", e);
                return FrameOutcome::EnumerationFailed;
            }
        };

        if !self.devices_described {
            self.devices_described = true;
            self.manager.log_device_descriptions(self.mappings.as_ref());
        }

        if device_count == 0 {
            self.manager.close();
            return FrameOutcome::NoDevice;
        }

        if self.manager.active().is_some() && !self.manager.is_attached() {
            warn!("Active device disconnected");
            self.manager.close();
            return FrameOutcome::Disconnected;
        }

        if self.manager.active().is_none() && !self.manager.select_and_open(self.device_index) {
            return FrameOutcome::OpenFailed;
        }

        let Some(active) = self.manager.active_mut() else {
            return FrameOutcome::OpenFailed;
        };
        let kind = active.kind();
        let (snapshot, previous) = active.read();
        let intents = self.interpreter.interpret(&snapshot, previous);

        for intent in &intents {
            intent.apply(motion);
        }

        FrameOutcome::Interpreted { kind, intents }
    }

    /// Closes the active device and releases the input subsystem.
    pub fn shutdown(self) {
        info!("Shutting down input service");
        self.manager.shutdown();
    }
}
