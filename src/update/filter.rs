//! Filter deciding which listed modules are reported as updatable
//!
//! A record is kept when it has an update and its path looks like an
//! external module: not relative, not absolute, and not containing the
//! workspace path itself.

use crate::domain::DependencyRecord;
use std::path::{Path, MAIN_SEPARATOR};

/// Filter configuration for update reporting
#[derive(Debug, Clone)]
pub struct UpdateFilter {
    /// Workspace path with forward-slash separators
    workspace: String,
}

impl UpdateFilter {
    /// Create a filter for modules listed from `workspace`
    pub fn new(workspace: &Path) -> Self {
        Self {
            workspace: to_slash(&workspace.to_string_lossy()),
        }
    }

    /// Returns the normalized workspace path used for self-exclusion
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Check if a module path refers to an external dependency
    pub fn is_external(&self, import_path: &str) -> bool {
        let path = to_slash(import_path);
        !path.starts_with('.') && !path.starts_with('/') && !path.contains(&self.workspace)
    }

    /// Check if a record should appear in the report
    pub fn should_report(&self, record: &DependencyRecord) -> bool {
        record.has_update() && self.is_external(&record.import_path)
    }
}

/// Replace the platform path separator with `/`
pub fn to_slash(path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(MAIN_SEPARATOR, "/")
    }
}
