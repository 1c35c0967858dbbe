//! Module identity declared by a go.mod file

use serde::Serialize;
use std::fmt;

/// Go version reported when the manifest has no `go` directive
pub const UNKNOWN_GO_VERSION: &str = "unknown";

/// The module path and minimum Go version declared by a go.mod file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleIdentity {
    /// Module path from the `module` directive
    pub name: String,
    /// Version from the `go` directive, or `"unknown"`
    pub toolchain_version: String,
}

impl ModuleIdentity {
    /// Creates a new module identity
    pub fn new(name: impl Into<String>, toolchain_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            toolchain_version: toolchain_version.into(),
        }
    }

    /// Creates an identity whose Go version is not declared
    pub fn without_go_version(name: impl Into<String>) -> Self {
        Self::new(name, UNKNOWN_GO_VERSION)
    }

    /// Returns true if the manifest declared a `go` directive
    pub fn has_go_version(&self) -> bool {
        self.toolchain_version != UNKNOWN_GO_VERSION
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (go {})", self.name, self.toolchain_version)
    }
}
