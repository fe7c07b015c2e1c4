//! Controller mapping database in the SDL `gamecontrollerdb.txt` format.
//!
//! Each non-comment line describes one controller:
//!
//! ```text
//! 030000005e0400008e02000014010000,Xbox 360 Controller,a:b0,b:b1,...,platform:Linux,
//! ```
//!
//! The database is read once at startup. The raw text of the valid lines is
//! handed to the platform layer, and the parsed entries are used to label
//! devices in the log. A missing file is not an error.

use super::error::MappingDbError;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const GUID_LEN: usize = 32;

/// One controller mapping line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub guid: String,
    pub name: String,
    pub platform: Option<String>,
    bindings: BTreeMap<String, String>,
    line: String,
}

impl MappingEntry {
    /// Parses a single mapping line. `line_no` is only used for error reporting.
    pub fn parse(line: &str, line_no: usize) -> Result<Self, MappingDbError> {
        let malformed = |reason: &str| MappingDbError::MalformedLine {
            line: line_no,
            reason: reason.to_string(),
        };

        let trimmed = line.trim();
        let mut fields = trimmed.split(',');

        let guid = fields.next().unwrap_or_default().trim().to_ascii_lowercase();
        if guid.len() != GUID_LEN || !guid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed("GUID must be 32 hex digits"));
        }

        let name = fields.next().unwrap_or_default().trim().to_string();
        if name.is_empty() {
            return Err(malformed("missing controller name"));
        }

        let mut bindings = BTreeMap::new();
        let mut platform = None;
        for field in fields.map(str::trim).filter(|f| !f.is_empty()) {
            let (target, source) = field
                .split_once(':')
                .ok_or_else(|| malformed(&format!("binding '{}' has no ':'", field)))?;
            if target == "platform" {
                platform = Some(source.to_string());
            } else {
                bindings.insert(target.to_string(), source.to_string());
            }
        }

        Ok(Self {
            guid,
            name,
            platform,
            bindings,
            line: trimmed.to_string(),
        })
    }

    /// Physical control bound to a semantic target such as `a` or `leftx`.
    pub fn binding(&self, target: &str) -> Option<&str> {
        self.bindings.get(target).map(String::as_str)
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Vendor and product id encoded in a modern SDL GUID.
    ///
    /// Layout: bus (2), crc (2), vendor (2), zero (2), product (2), zero (2),
    /// version (2), driver (2). All little endian.
    pub fn vendor_product(&self) -> Option<(u16, u16)> {
        guid_vendor_product(&self.guid)
    }
}

/// Decodes vendor/product ids from a 32-digit SDL GUID.
pub fn guid_vendor_product(guid: &str) -> Option<(u16, u16)> {
    if guid.len() != GUID_LEN {
        return None;
    }
    let word = |byte: usize| -> Option<u16> {
        let lo = u8::from_str_radix(guid.get(byte * 2..byte * 2 + 2)?, 16).ok()?;
        let hi = u8::from_str_radix(guid.get(byte * 2 + 2..byte * 2 + 4)?, 16).ok()?;
        Some(u16::from_le_bytes([lo, hi]))
    };
    if word(6)? != 0 || word(10)? != 0 {
        return None;
    }
    Some((word(4)?, word(8)?))
}

/// Read-only set of controller mappings.
#[derive(Debug, Clone, Default)]
pub struct MappingDatabase {
    entries: Vec<MappingEntry>,
    skipped: usize,
    source: Option<PathBuf>,
}

impl MappingDatabase {
    /// Parses database text, skipping comments, blank and malformed lines.
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();
        let mut skipped = 0;

        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match MappingEntry::parse(trimmed, idx + 1) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!("Skipping controller mapping: {}", e);
                    skipped += 1;
                }
            }
        }

        Self {
            entries,
            skipped,
            source: None,
        }
    }

    /// Loads the database from `path`.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, MappingDbError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No mapping database at {}", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(MappingDbError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut db = Self::parse(&text);
        db.source = Some(path.to_path_buf());
        info!(
            "Loaded {} controller mappings from {} ({} skipped)",
            db.len(),
            path.display(),
            db.skipped
        );
        Ok(Some(db))
    }

    /// Like [`MappingDatabase::load`], but unreadable files only log a warning.
    pub fn load_or_skip(path: &Path) -> Option<Self> {
        match Self::load(path) {
            Ok(db) => db,
            Err(e) => {
                warn!("Continuing without controller mappings: {}", e);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lines rejected while parsing.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn entries(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.iter()
    }

    pub fn find_by_guid(&self, guid: &str) -> Option<&MappingEntry> {
        self.entries
            .iter()
            .find(|e| e.guid.eq_ignore_ascii_case(guid))
    }

    pub fn find_by_ids(&self, vendor: u16, product: u16) -> Option<&MappingEntry> {
        self.entries
            .iter()
            .find(|e| e.vendor_product() == Some((vendor, product)))
    }

    /// Valid lines re-joined in SDL format, for the platform layer.
    pub fn to_sdl_text(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&entry.line);
            text.push('\n');
        }
        text
    }
}
