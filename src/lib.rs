//! gomod-outdated - report outdated dependencies of a Go module
//!
//! This library clones a repository into a temporary workspace, finds and
//! parses its go.mod, asks `go list -m -u -json all` which modules have newer
//! versions, and renders the result.

pub mod cli;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod platform;
pub mod process;
pub mod update;
pub mod workspace;
