use super::backend::{DeviceDescription, DeviceHandle, InputBackend};
use super::error::BackendError;
use super::layout::{GamepadAxis, GamepadButton, GAMEPAD_CAPABILITIES};
use super::mapping_db::MappingDatabase;
use super::snapshot::{Capabilities, DeviceKind, HatState};
use gilrs::ev::Code;
use gilrs::{Axis, Button, Gamepad, GamepadId, Gilrs, GilrsBuilder, MappingSource};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, error, info, trace};

/// Input backend on top of gilrs.
///
/// The gilrs context is shared with every opened [`GilrsDevice`] so a device
/// can be read by index without borrowing the backend.
pub struct GilrsBackend {
    gilrs: Rc<RefCell<Gilrs>>,
}

impl fmt::Debug for GilrsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GilrsBackend").finish_non_exhaustive()
    }
}

impl GilrsBackend {
    /// Starts gilrs, adding the database mappings to its built-in set.
    pub fn connect(mappings: Option<&MappingDatabase>) -> Result<Self, BackendError> {
        info!("Initializing gilrs controller interface");

        let mut builder = GilrsBuilder::new();
        if let Some(db) = mappings {
            debug!("Adding {} controller mappings to gilrs", db.len());
            builder = builder.add_mappings(&db.to_sdl_text());
        }

        let gilrs = match builder.build() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(BackendError::Unavailable(e.to_string()));
            }
        };

        Ok(Self {
            gilrs: Rc::new(RefCell::new(gilrs)),
        })
    }

    fn gamepad_id(&self, index: usize) -> Result<GamepadId, BackendError> {
        self.gilrs
            .borrow()
            .gamepads()
            .nth(index)
            .map(|(id, _)| id)
            .ok_or(BackendError::NoSuchDevice(index))
    }
}

impl InputBackend for GilrsBackend {
    fn update(&mut self) {
        let mut gilrs = self.gilrs.borrow_mut();
        while let Some(event) = gilrs.next_event() {
            trace!("gilrs event {:?} from {}", event.event, event.id);
        }
    }

    fn device_count(&self) -> Result<usize, BackendError> {
        Ok(self.gilrs.borrow().gamepads().count())
    }

    fn describe(&self, index: usize) -> Result<DeviceDescription, BackendError> {
        let id = self.gamepad_id(index)?;
        let gilrs = self.gilrs.borrow();
        let gamepad = gilrs.gamepad(id);
        let kind = classify(&gamepad);
        let capabilities = match kind {
            DeviceKind::Gamepad => GAMEPAD_CAPABILITIES,
            DeviceKind::Joystick => RawLayout::of(&gamepad).capabilities(),
        };

        Ok(DeviceDescription {
            index,
            name: gamepad.name().to_string(),
            kind,
            capabilities,
            vendor_id: gamepad.vendor_id(),
            product_id: gamepad.product_id(),
            guid: Some(gamepad.uuid().iter().map(|b| format!("{:02x}", b)).collect()),
        })
    }

    fn open(&mut self, index: usize) -> Result<Box<dyn DeviceHandle>, BackendError> {
        let id = self.gamepad_id(index)?;
        let (name, layout) = {
            let gilrs = self.gilrs.borrow();
            let gamepad = gilrs
                .connected_gamepad(id)
                .ok_or_else(|| BackendError::OpenError {
                    index,
                    reason: "device disconnected while opening".to_string(),
                })?;
            let layout = match classify(&gamepad) {
                DeviceKind::Gamepad => Layout::Gamepad,
                DeviceKind::Joystick => Layout::Raw(RawLayout::of(&gamepad)),
            };
            (gamepad.name().to_string(), layout)
        };

        debug!("Opened gilrs device {} ({}) as {:?}", index, name, id);
        Ok(Box::new(GilrsDevice {
            gilrs: Rc::clone(&self.gilrs),
            id,
            name,
            layout,
        }))
    }
}

fn classify(gamepad: &Gamepad<'_>) -> DeviceKind {
    kind_for(gamepad.mapping_source())
}

/// Only an SDL mapping gives a device semantic controls. gilrs reports
/// `Driver` for anything it merely passes through.
fn kind_for(source: MappingSource) -> DeviceKind {
    match source {
        MappingSource::SdlMappings => DeviceKind::Gamepad,
        _ => DeviceKind::Joystick,
    }
}

fn scale(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

fn hat_from_axes(horizontal: f32, vertical: f32) -> HatState {
    let sign = |v: f32| {
        if v > 0.5 {
            1
        } else if v < -0.5 {
            -1
        } else {
            0
        }
    };
    HatState::from_components(sign(horizontal), sign(vertical))
}

const RAW_AXES: [Axis; 6] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::LeftZ,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::RightZ,
];

const RAW_BUTTONS: [Button; 19] = [
    Button::South,
    Button::East,
    Button::North,
    Button::West,
    Button::C,
    Button::Z,
    Button::LeftTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

/// Ascending by `key`, duplicates dropped. Several gilrs elements can share
/// one native code.
fn sorted_codes<T, K: Ord>(codes: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut codes: Vec<T> = codes.collect();
    codes.sort_by_key(|code| key(code));
    codes.dedup_by(|a, b| key(a) == key(b));
    codes
}

/// Native controls of an unmapped device, in ascending code order.
#[derive(Debug, Clone)]
struct RawLayout {
    axes: Vec<Code>,
    buttons: Vec<Code>,
    hat: Option<(Option<Code>, Option<Code>)>,
}

impl RawLayout {
    /// Built from the driver's element codes, so the layout is complete
    /// before any control has moved.
    fn of(gamepad: &Gamepad<'_>) -> Self {
        let dpad_x = gamepad.axis_code(Axis::DPadX);
        let dpad_y = gamepad.axis_code(Axis::DPadY);

        let axes = sorted_codes(
            RAW_AXES
                .iter()
                .filter_map(|&axis| gamepad.axis_code(axis))
                .filter(|code| Some(*code) != dpad_x && Some(*code) != dpad_y),
            |code: &Code| code.into_u32(),
        );
        let buttons = sorted_codes(
            RAW_BUTTONS
                .iter()
                .filter_map(|&button| gamepad.button_code(button)),
            |code: &Code| code.into_u32(),
        );

        let hat = (dpad_x.is_some() || dpad_y.is_some()).then_some((dpad_x, dpad_y));

        Self { axes, buttons, hat }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            axes: self.axes.len(),
            buttons: self.buttons.len(),
            hats: usize::from(self.hat.is_some()),
            balls: 0,
        }
    }
}

#[derive(Debug, Clone)]
enum Layout {
    Gamepad,
    Raw(RawLayout),
}

/// A device opened through [`GilrsBackend`].
pub struct GilrsDevice {
    gilrs: Rc<RefCell<Gilrs>>,
    id: GamepadId,
    name: String,
    layout: Layout,
}

impl fmt::Debug for GilrsDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GilrsDevice")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("layout", &self.layout)
            .finish()
    }
}

impl GilrsDevice {
    fn with_gamepad<T>(&self, default: T, read: impl FnOnce(&Gamepad<'_>) -> T) -> T {
        let gilrs = self.gilrs.borrow();
        match gilrs.connected_gamepad(self.id) {
            Some(gamepad) => read(&gamepad),
            None => default,
        }
    }
}

impl DeviceHandle for GilrsDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DeviceKind {
        match self.layout {
            Layout::Gamepad => DeviceKind::Gamepad,
            Layout::Raw(_) => DeviceKind::Joystick,
        }
    }

    fn capabilities(&self) -> Capabilities {
        match &self.layout {
            Layout::Gamepad => GAMEPAD_CAPABILITIES,
            Layout::Raw(raw) => raw.capabilities(),
        }
    }

    fn is_attached(&self) -> bool {
        self.gilrs.borrow().connected_gamepad(self.id).is_some()
    }

    fn axis(&self, index: usize) -> i16 {
        match &self.layout {
            Layout::Gamepad => {
                let Some(axis) = GamepadAxis::ALL.get(index) else {
                    return 0;
                };
                // gilrs reports stick Y with up positive
                let value = self.with_gamepad(0.0, |gp| match axis {
                    GamepadAxis::LeftStickX => gp.value(Axis::LeftStickX),
                    GamepadAxis::LeftStickY => -gp.value(Axis::LeftStickY),
                    GamepadAxis::RightStickX => gp.value(Axis::RightStickX),
                    GamepadAxis::RightStickY => -gp.value(Axis::RightStickY),
                    GamepadAxis::LeftTrigger => trigger_value(gp, Button::LeftTrigger2),
                    GamepadAxis::RightTrigger => trigger_value(gp, Button::RightTrigger2),
                });
                scale(value)
            }
            Layout::Raw(raw) => {
                let Some(code) = raw.axes.get(index).copied() else {
                    return 0;
                };
                let value = self.with_gamepad(0.0, |gp| {
                    gp.state().axis_data(code).map(|d| d.value()).unwrap_or(0.0)
                });
                scale(value)
            }
        }
    }

    fn button(&self, index: usize) -> bool {
        match &self.layout {
            Layout::Gamepad => {
                let Some(button) = GamepadButton::from_index(index) else {
                    return false;
                };
                self.with_gamepad(false, |gp| gp.is_pressed(gilrs_button(button)))
            }
            Layout::Raw(raw) => {
                let Some(code) = raw.buttons.get(index).copied() else {
                    return false;
                };
                self.with_gamepad(false, |gp| {
                    gp.state()
                        .button_data(code)
                        .map(|d| d.is_pressed())
                        .unwrap_or(false)
                })
            }
        }
    }

    fn hat(&self, index: usize) -> HatState {
        if index != 0 {
            return HatState::Centered;
        }
        match &self.layout {
            Layout::Gamepad => self.with_gamepad(HatState::Centered, |gp| {
                HatState::from_switches(
                    gp.is_pressed(Button::DPadUp),
                    gp.is_pressed(Button::DPadDown),
                    gp.is_pressed(Button::DPadLeft),
                    gp.is_pressed(Button::DPadRight),
                )
            }),
            Layout::Raw(RawLayout {
                hat: Some((x, y)), ..
            }) => self.with_gamepad(HatState::Centered, |gp| {
                let read = |code: &Option<Code>| {
                    code.and_then(|c| gp.state().axis_data(c).map(|d| d.value()))
                        .unwrap_or(0.0)
                };
                hat_from_axes(read(x), read(y))
            }),
            Layout::Raw(_) => HatState::Centered,
        }
    }
}

impl Drop for GilrsDevice {
    fn drop(&mut self) {
        debug!("Released gilrs device {} ({})", self.id, self.name);
    }
}

/// Mapped triggers are analog buttons in gilrs, 0.0 released to 1.0 fully pulled.
fn trigger_value(gamepad: &Gamepad<'_>, trigger: Button) -> f32 {
    gamepad
        .button_data(trigger)
        .map(|data| data.value())
        .unwrap_or(0.0)
}

fn gilrs_button(button: GamepadButton) -> Button {
    match button {
        GamepadButton::South => Button::South,
        GamepadButton::East => Button::East,
        GamepadButton::West => Button::West,
        GamepadButton::North => Button::North,
        GamepadButton::LeftShoulder => Button::LeftTrigger,
        GamepadButton::RightShoulder => Button::RightTrigger,
        GamepadButton::Select => Button::Select,
        GamepadButton::Start => Button::Start,
        GamepadButton::Mode => Button::Mode,
        GamepadButton::LeftStick => Button::LeftThumb,
        GamepadButton::RightStick => Button::RightThumb,
        GamepadButton::DPadUp => Button::DPadUp,
        GamepadButton::DPadDown => Button::DPadDown,
        GamepadButton::DPadLeft => Button::DPadLeft,
        GamepadButton::DPadRight => Button::DPadRight,
    }
}
