//! Host-facing module lifecycle: init, per-frame update, deinit.

use crate::config::JoystickConfig;
use crate::device::backend::InputBackend;
use crate::device::error::BackendError;
use crate::device::gilrs_backend::GilrsBackend;
use crate::device::mapping_db::MappingDatabase;
use crate::interpreter::intent::MotionControl;
use crate::service::{FrameOutcome, InputService, Polling};
use tracing::{debug, error, info};

/// Brings up the platform input layer, optionally seeded with controller
/// mappings.
pub type BackendConnector =
    Box<dyn FnMut(Option<&MappingDatabase>) -> Result<Box<dyn InputBackend>, BackendError>>;

/// Joystick support as a plug-in module of the host application.
///
/// If the input subsystem cannot be brought up the module stays inert:
/// [`update`](Self::update) does nothing and nothing is retried until the
/// next [`init`](Self::init).
pub struct JoystickSupport<M: MotionControl> {
    config: JoystickConfig,
    motion: M,
    connector: BackendConnector,
    service: Option<InputService<Polling>>,
}

impl<M: MotionControl> JoystickSupport<M> {
    pub fn new(config: JoystickConfig, motion: M, connector: BackendConnector) -> Self {
        Self {
            config,
            motion,
            connector,
            service: None,
        }
    }

    /// Uses gilrs for the platform layer.
    pub fn with_gilrs(config: JoystickConfig, motion: M) -> Self {
        Self::new(
            config,
            motion,
            Box::new(|mappings: Option<&MappingDatabase>| {
                GilrsBackend::connect(mappings)
                    .map(|backend| Box::new(backend) as Box<dyn InputBackend>)
            }),
        )
    }

    /// Initializes the input subsystem. Calling it again restarts it.
    pub fn init(&mut self) {
        self.deinit();

        let mappings = self
            .config
            .mapping_database_path()
            .and_then(|path| MappingDatabase::load_or_skip(&path));

        let backend = match (self.connector)(mappings.as_ref()) {
            Ok(backend) => backend,
            Err(e) => {
                error!("Could not initialize joystick support: {}", e);
                return;
            }
        };

        let service = InputService::create(&self.config, backend, mappings).initialize();
        self.service = Some(service);
        info!("Joystick support initialized");
    }

    /// Closes the active device and shuts the input subsystem down.
    pub fn deinit(&mut self) {
        if let Some(service) = self.service.take() {
            service.shutdown();
            info!("Joystick support shut down");
        }
    }

    /// Runs one frame. The elapsed time is not used; all inputs are sampled.
    pub fn update(&mut self, _delta_time: f64) -> FrameOutcome {
        match self.service.as_mut() {
            Some(service) => service.poll_frame(&mut self.motion),
            None => FrameOutcome::Inactive,
        }
    }

    /// There is no configuration dialog.
    pub fn configure_gui(&mut self, show: bool) -> bool {
        debug!("No configuration GUI (requested: {})", show);
        false
    }

    pub fn is_initialized(&self) -> bool {
        self.service.is_some()
    }

    pub fn config(&self) -> &JoystickConfig {
        &self.config
    }

    pub fn service(&self) -> Option<&InputService<Polling>> {
        self.service.as_ref()
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut M {
        &mut self.motion
    }
}

impl<M: MotionControl> Drop for JoystickSupport<M> {
    fn drop(&mut self) {
        self.deinit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::intent::ControlIntent;
    use crate::testing::{RecordingMotion, ScriptedBackend, ScriptedDevice};
    use std::cell::Cell;
    use std::rc::Rc;

    fn scripted(backend: &ScriptedBackend) -> BackendConnector {
        let backend = backend.clone();
        Box::new(move |_| Ok(Box::new(backend.clone()) as Box<dyn InputBackend>))
    }

    fn without_database() -> JoystickConfig {
        let mut config = JoystickConfig::default();
        config.mapping_database = None;
        config
    }

    #[test]
    fn update_before_init_is_inert() {
        let mut support = JoystickSupport::new(
            without_database(),
            RecordingMotion::default(),
            scripted(&ScriptedBackend::new()),
        );
        assert_eq!(support.update(0.016), FrameOutcome::Inactive);
        assert!(!support.is_initialized());
    }

    #[test]
    fn failed_subsystem_stays_inert_and_is_not_retried() {
        let attempts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&attempts);
        let connector: BackendConnector = Box::new(move |_| {
            counter.set(counter.get() + 1);
            Err(BackendError::Unavailable("no input subsystem".into()))
        });
        let mut support =
            JoystickSupport::new(without_database(), RecordingMotion::default(), connector);

        support.init();
        assert!(!support.is_initialized());
        for _ in 0..3 {
            assert_eq!(support.update(0.016), FrameOutcome::Inactive);
        }
        assert_eq!(attempts.get(), 1);
        assert!(support.motion().calls.is_empty());
    }

    #[test]
    fn frames_drive_the_motion_collaborator() {
        let backend = ScriptedBackend::new();
        backend.connect(ScriptedDevice::joystick(2, 2, 0));
        backend.set_axes(0, &[-20000, 0]);
        let mut support =
            JoystickSupport::new(without_database(), RecordingMotion::default(), scripted(&backend));

        support.init();
        support.update(0.016);
        assert_eq!(
            support.motion().count(ControlIntent::turn(
                crate::device::snapshot::Direction::Left,
                true
            )),
            1
        );
    }

    #[test]
    fn deinit_and_drop_release_the_device() {
        let backend = ScriptedBackend::new();
        backend.connect(ScriptedDevice::gamepad());
        let mut support =
            JoystickSupport::new(without_database(), RecordingMotion::default(), scripted(&backend));

        support.init();
        support.update(0.016);
        assert_eq!(backend.open_handles(), 1);

        support.deinit();
        assert_eq!(backend.open_handles(), 0);
        assert_eq!(support.update(0.016), FrameOutcome::Inactive);

        support.init();
        support.update(0.016);
        assert_eq!(backend.open_handles(), 1);
        drop(support);
        assert_eq!(backend.open_handles(), 0);
    }

    #[test]
    fn mapping_database_is_handed_to_the_connector() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("gamecontrollerdb.txt"),
            "030000005e0400008e02000014010000,X360 Controller,a:b0,b:b1,platform:Linux,\n",
        )
        .unwrap();
        let config = JoystickConfig::load(&dir.path().join("joystick.toml")).unwrap();

        let seen = Rc::new(Cell::new(0));
        let recorder = Rc::clone(&seen);
        let connector: BackendConnector = Box::new(move |mappings| {
            recorder.set(mappings.map(MappingDatabase::len).unwrap_or(0));
            Ok(Box::new(ScriptedBackend::new()) as Box<dyn InputBackend>)
        });

        let mut support = JoystickSupport::new(config, RecordingMotion::default(), connector);
        support.init();
        assert_eq!(seen.get(), 1);
        assert_eq!(
            support.service().and_then(|s| s.mappings()).map(MappingDatabase::len),
            Some(1)
        );
    }

    #[test]
    fn there_is_no_configuration_gui() {
        let mut support = JoystickSupport::new(
            without_database(),
            RecordingMotion::default(),
            scripted(&ScriptedBackend::new()),
        );
        assert!(!support.configure_gui(true));
    }
}
