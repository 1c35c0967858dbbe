//! Core domain models for gomod-outdated
//!
//! This module contains the fundamental types used throughout the application:
//! - Module identity parsed from go.mod
//! - Dependency records decoded from `go list -m -u -json` output

mod dependency;
mod module_identity;

pub use dependency::{DependencyRecord, ModuleUpdate};
pub use module_identity::{ModuleIdentity, UNKNOWN_GO_VERSION};
