//! TOML configuration for the joystick module.
//!
//! Every field has a default, so an absent file or a partial file is fine.
//!
//! ```toml
//! device_index = 0
//! axis_threshold = 8192
//! mapping_database = "gamecontrollerdb.txt"
//!
//! [zoom]
//! joystick_axis = 2
//! joystick_inverted = false
//! gamepad_axis = 3
//! gamepad_inverted = false
//!
//! [[joystick_buttons]]
//! button = 0
//! action = "toggle_mount_mode"
//! edge = "release"
//!
//! [[joystick_buttons]]
//! button = 1
//! action = "move_slow"
//! ```

use crate::interpreter::bindings::{default_joystick_bindings, ButtonBinding, ZoomPolicy};
use crate::interpreter::intent::Edge;
use crate::interpreter::{InterpreterSettings, DEFAULT_AXIS_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const CONFIG_DIR: &str = "joystick-support";
const CONFIG_FILE: &str = "joystick.toml";
const MAPPING_DB_FILE: &str = "gamecontrollerdb.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct JoystickConfig {
    /// Logical index of the device to use. Enumeration order is up to the
    /// platform, so this is only stable with a single device attached.
    pub device_index: usize,

    /// Axis deadzone in raw signed 16-bit units.
    pub axis_threshold: i16,

    /// SDL mapping database. Relative paths resolve against the config file's
    /// directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_database: Option<PathBuf>,

    pub zoom: ZoomPolicy,

    /// Raw joystick button bindings. Gamepad bindings are fixed.
    pub joystick_buttons: Vec<ButtonBinding>,

    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            axis_threshold: DEFAULT_AXIS_THRESHOLD,
            mapping_database: Some(PathBuf::from(MAPPING_DB_FILE)),
            zoom: ZoomPolicy::default(),
            joystick_buttons: default_joystick_bindings(),
            base_dir: None,
        }
    }
}

impl JoystickConfig {
    /// `<config dir>/joystick-support/joystick.toml`, if the platform has a
    /// config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Parses and validates TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path`, falling back to defaults if it is missing.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(text) => {
                info!("Loading joystick config from {}", path.display());
                Self::from_toml(&text)?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Writes the default config to `path` unless a file already exists there.
    pub fn ensure_default(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().write(path)?;
        info!("Wrote default joystick config to {}", path.display());
        Ok(true)
    }

    /// Writes this config as pretty TOML, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.axis_threshold < 0 {
            return Err(ConfigError::Invalid(format!(
                "axis_threshold must be between 0 and {}, got {}",
                i16::MAX,
                self.axis_threshold
            )));
        }
        for binding in &self.joystick_buttons {
            if binding.action.is_level() && binding.edge != Edge::Release {
                return Err(ConfigError::Invalid(format!(
                    "button {} is bound to a level action and cannot fire on an edge",
                    binding.button
                )));
            }
        }
        Ok(())
    }

    /// Mapping database location with relative paths resolved.
    pub fn mapping_database_path(&self) -> Option<PathBuf> {
        let path = self.mapping_database.as_ref()?;
        if path.is_absolute() {
            return Some(path.clone());
        }
        Some(match &self.base_dir {
            Some(base) => base.join(path),
            None => path.clone(),
        })
    }

    pub fn interpreter_settings(&self) -> InterpreterSettings {
        InterpreterSettings {
            axis_threshold: self.axis_threshold,
            zoom: self.zoom,
            joystick_buttons: self.joystick_buttons.clone(),
        }
    }
}
