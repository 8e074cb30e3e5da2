//! Structure registry — maps client-facing structure keys to assistant IDs.
//!
//! The registry is built once at startup, either from the table bundled into
//! the binary or from a JSON file, and is read-only afterwards. The file
//! format is a flat object:
//!
//! ```json
//! { "structure_1": "asst_abc", "structure_2": "asst_def" }
//! ```

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::error::AskError;

const BUNDLED_STRUCTURES: &str = include_str!("../structures.json");

/// Errors raised while loading a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read structures file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid structures JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Structure key must not be empty")]
    EmptyKey,

    #[error("Structure '{0}' has an empty assistant id")]
    EmptyAssistantId(String),
}

/// Immutable structure key → assistant ID table.
#[derive(Debug, Clone, Default)]
pub struct StructureRegistry {
    entries: HashMap<String, String>,
}

impl StructureRegistry {
    /// Build a registry from key/assistant pairs, rejecting blank entries.
    pub fn new<I, K, V>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = HashMap::new();
        for (key, assistant_id) in entries {
            let key = key.into();
            let assistant_id = assistant_id.into();
            if key.trim().is_empty() {
                return Err(RegistryError::EmptyKey);
            }
            if assistant_id.trim().is_empty() {
                return Err(RegistryError::EmptyAssistantId(key));
            }
            map.insert(key, assistant_id);
        }
        Ok(Self { entries: map })
    }

    /// The table compiled into the binary.
    pub fn bundled() -> Result<Self, RegistryError> {
        Self::from_json(BUNDLED_STRUCTURES)
    }

    /// Parse a registry from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Load a registry from a JSON file on disk.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Look up the assistant ID registered for `key`.
    pub fn lookup(&self, key: &str) -> Result<&str, AskError> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| AskError::InvalidStructure(key.to_string()))
    }

    /// Resolve the assistant for an optional key, falling back to `default`
    /// when no key was supplied.
    pub fn resolve<'a>(&'a self, key: Option<&str>, default: &'a str) -> Result<&'a str, AskError> {
        match key {
            Some(key) => self.lookup(key),
            None => Ok(default),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
