//! Manifest location and parsing
//!
//! This module provides functionality to:
//! - Find the go.mod of a checked-out repository
//! - Parse the module path and Go version it declares

mod go_mod;
mod locator;

pub use go_mod::{normalize_line_endings, GoModFile, GoModParser, Requirement, SyntaxError};
pub use locator::{locate, MANIFEST_FILENAME};

use crate::domain::ModuleIdentity;
use crate::error::ManifestError;
use std::path::Path;

/// Parse the module identity from a go.mod path
pub fn parse_manifest(path: &Path) -> Result<ModuleIdentity, ManifestError> {
    let identity = GoModParser.parse_file(path)?;
    if !identity.has_go_version() {
        tracing::debug!("no go directive in {}", path.display());
    }
    Ok(identity)
}
