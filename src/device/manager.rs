//! Keeps exactly one active device consistent with what is connected.

use super::backend::{DeviceDescription, DeviceHandle, InputBackend};
use super::error::BackendError;
use super::mapping_db::MappingDatabase;
use super::snapshot::{DeviceKind, DeviceSnapshot, PreviousState};
use tracing::{debug, info, warn};

/// The opened device together with its previous-frame buffers.
///
/// Dropping it releases the platform handle, so every path that replaces or
/// clears the active device also releases it.
#[derive(Debug)]
pub struct ActiveDevice {
    index: usize,
    handle: Box<dyn DeviceHandle>,
    previous: PreviousState,
}

impl ActiveDevice {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> DeviceKind {
        self.handle.kind()
    }

    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn handle(&self) -> &dyn DeviceHandle {
        self.handle.as_ref()
    }

    pub fn previous(&self) -> &PreviousState {
        &self.previous
    }

    /// Reads the device and hands out the buffers the interpreter updates.
    pub fn read(&mut self) -> (DeviceSnapshot, &mut PreviousState) {
        (self.handle.snapshot(), &mut self.previous)
    }
}

#[derive(Debug)]
pub struct DeviceManager {
    backend: Box<dyn InputBackend>,
    active: Option<ActiveDevice>,
    open_failures: usize,
}

impl DeviceManager {
    pub fn new(backend: Box<dyn InputBackend>) -> Self {
        Self {
            backend,
            active: None,
            open_failures: 0,
        }
    }

    /// Refreshes the platform's cached state and counts attached devices.
    ///
    /// On error nothing is changed; the caller abandons the frame.
    pub fn refresh_device_list(&mut self) -> Result<usize, BackendError> {
        self.backend.update();
        let count = self.backend.device_count()?;
        debug!("Number of connected devices: {}", count);
        Ok(count)
    }

    /// Closes any active device, then opens `index`.
    ///
    /// The close happens even when `index` names the active device, so the
    /// state buffers always start clean. On failure no device is active.
    /// Only the first of a run of failures is logged as a warning.
    pub fn select_and_open(&mut self, index: usize) -> bool {
        self.close();

        match self.backend.open(index) {
            Ok(handle) => {
                let capabilities = handle.capabilities();
                info!(
                    "Opened device {} ({}) as {}: {} axes, {} buttons, {} hats",
                    index,
                    handle.name(),
                    handle.kind(),
                    capabilities.axes,
                    capabilities.buttons,
                    capabilities.hats
                );
                self.open_failures = 0;
                self.active = Some(ActiveDevice {
                    index,
                    previous: PreviousState::for_capabilities(&capabilities),
                    handle,
                });
                true
            }
            Err(e) => {
                self.open_failures += 1;
                if self.open_failures == 1 {
                    warn!("Unable to open device {}: {}", index, e);
                } else {
                    debug!(
                        "Unable to open device {} ({} attempts): {}",
                        index, self.open_failures, e
                    );
                }
                false
            }
        }
    }

    /// Releases the active device. Safe to call with none active.
    pub fn close(&mut self) {
        if let Some(active) = self.active.take() {
            info!("Closing device {} ({})", active.index, active.name());
        }
    }

    /// False when no device is active or the active one went away.
    pub fn is_attached(&self) -> bool {
        self.active
            .as_ref()
            .map(|active| active.handle.is_attached())
            .unwrap_or(false)
    }

    pub fn active(&self) -> Option<&ActiveDevice> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveDevice> {
        self.active.as_mut()
    }

    /// Failed opens since the last successful one.
    pub fn consecutive_open_failures(&self) -> usize {
        self.open_failures
    }

    pub fn active_kind(&self) -> Option<DeviceKind> {
        self.active.as_ref().map(ActiveDevice::kind)
    }

    /// Descriptions of every connected device. Devices that cannot be
    /// described are logged and left out.
    pub fn describe_devices(&self) -> Vec<DeviceDescription> {
        let count = match self.backend.device_count() {
            Ok(count) => count,
            Err(e) => {
                warn!("Error finding number of devices: {}", e);
                return Vec::new();
            }
        };

        (0..count)
            .filter_map(|index| match self.backend.describe(index) {
                Ok(description) => Some(description),
                Err(e) => {
                    debug!("Unable to describe device {}: {}", index, e);
                    None
                }
            })
            .collect()
    }

    /// Logs every connected device and whether the mapping database knows it.
    pub fn log_device_descriptions(&self, mappings: Option<&MappingDatabase>) {
        for d in self.describe_devices() {
            let known = mappings.and_then(|db| {
                d.guid
                    .as_deref()
                    .and_then(|guid| db.find_by_guid(guid))
                    .or_else(|| match (d.vendor_id, d.product_id) {
                        (Some(vendor), Some(product)) => db.find_by_ids(vendor, product),
                        _ => None,
                    })
            });
            info!(
                "Device {}: '{}' is a {} with {} axes, {} balls, {} buttons, {} hats (vendor {:04x?}, product {:04x?}){}",
                d.index,
                d.name,
                d.kind,
                d.capabilities.axes,
                d.capabilities.balls,
                d.capabilities.buttons,
                d.capabilities.hats,
                d.vendor_id,
                d.product_id,
                known
                    .map(|entry| format!(", mapped as '{}'", entry.name))
                    .unwrap_or_default()
            );
        }
    }

    /// Closes the active device and releases the backend.
    pub fn shutdown(mut self) {
        self.close();
        debug!("Releasing input backend {:?}", self.backend);
    }
}
