//! Device subsystem
//!
//! Owns the platform input layer and the single active device:
//!
//! 1. [`backend`] - Seams to the platform (`InputBackend`, `DeviceHandle`)
//! 2. [`gilrs_backend`] - The gilrs implementation
//! 3. [`manager`] - Enumeration, open/close, liveness and previous-state buffers
//! 4. [`mapping_db`] - Optional SDL controller mapping database
//!
//! # Architecture
//!
//! ```text
//! gilrs ──► GilrsBackend ──► DeviceManager ──► ActiveDevice ──► DeviceSnapshot
//!                                              (handle + PreviousState)
//! ```

pub mod backend;
pub mod error;
pub mod gilrs_backend;
pub mod layout;
pub mod manager;
pub mod mapping_db;
pub mod snapshot;

pub use backend::{DeviceDescription, DeviceHandle, InputBackend};
pub use error::{BackendError, MappingDbError};
pub use gilrs_backend::GilrsBackend;
pub use layout::{GamepadAxis, GamepadButton};
pub use manager::{ActiveDevice, DeviceManager};
pub use mapping_db::{MappingDatabase, MappingEntry};
pub use snapshot::{Capabilities, DeviceKind, DeviceSnapshot, Direction, HatState, PreviousState};
