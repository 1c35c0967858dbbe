//! Dependency records reported by `go list -m -u -json`

use serde::{Deserialize, Serialize};
use std::fmt;

/// A newer version available for a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleUpdate {
    /// Module path of the update (usually identical to the current one)
    #[serde(rename = "Path", alias = "path", default)]
    pub import_path: String,
    /// Newer version available
    #[serde(rename = "Version", alias = "version", default)]
    pub new_version: String,
}

/// One module entry from the listing stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Module path
    #[serde(rename = "Path", alias = "path", default)]
    pub import_path: String,
    /// Currently selected version (empty for the main module)
    #[serde(rename = "Version", alias = "version", default)]
    pub current_version: String,
    /// Available update, if any
    #[serde(rename = "Update", alias = "update", default, skip_serializing_if = "Option::is_none")]
    pub update: Option<ModuleUpdate>,
    /// Whether the module is only required indirectly
    #[serde(rename = "Indirect", alias = "indirect", default)]
    pub indirect: bool,
    /// Whether this entry is the main module itself
    #[serde(rename = "Main", alias = "main", default)]
    pub main: bool,
}

impl DependencyRecord {
    /// Creates a record with no update available
    pub fn new(import_path: impl Into<String>, current_version: impl Into<String>) -> Self {
        Self {
            import_path: import_path.into(),
            current_version: current_version.into(),
            update: None,
            indirect: false,
            main: false,
        }
    }

    /// Attaches an available update (builder pattern)
    pub fn with_update(mut self, new_version: impl Into<String>) -> Self {
        self.update = Some(ModuleUpdate {
            import_path: self.import_path.clone(),
            new_version: new_version.into(),
        });
        self
    }

    /// Marks the record as an indirect requirement (builder pattern)
    pub fn with_indirect(mut self, indirect: bool) -> Self {
        self.indirect = indirect;
        self
    }

    /// Returns true if a newer version is available
    pub fn has_update(&self) -> bool {
        self.update.is_some()
    }

    /// Returns the newer version, if any
    pub fn new_version(&self) -> Option<&str> {
        self.update.as_ref().map(|u| u.new_version.as_str())
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.update {
            Some(update) => write!(
                f,
                "{}: {} -> {}",
                self.import_path, self.current_version, update.new_version
            ),
            None => write!(f, "{}: {}", self.import_path, self.current_version),
        }
    }
}
