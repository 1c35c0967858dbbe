//! Dependency update reporting
//!
//! This module provides:
//! - Invocation of `go list -m -u -json all` inside the workspace
//! - Lazy decoding of the concatenated JSON stream it prints
//! - Filtering down to external modules that have an update

mod filter;
mod stream;

pub use filter::{to_slash, UpdateFilter};
pub use stream::decode_records;

use crate::domain::DependencyRecord;
use crate::error::{describe_exit, ReportError};
use crate::process::{CommandSpec, ProcessRunner};
use std::path::Path;

/// Arguments passed to the go tool to list modules with update information
pub const LIST_ARGS: [&str; 5] = ["list", "-m", "-u", "-json", "all"];

/// Queries the go tool for modules with newer versions
pub struct DependencyReporter<'a, R: ProcessRunner> {
    runner: &'a R,
    go: String,
}

impl<'a, R: ProcessRunner> DependencyReporter<'a, R> {
    /// Create a reporter that invokes `go` through `runner`
    pub fn new(runner: &'a R, go: impl Into<String>) -> Self {
        Self {
            runner,
            go: go.into(),
        }
    }

    /// List updatable external dependencies of the module checked out in `workspace`
    ///
    /// Records are returned in the order the go tool printed them.
    pub fn report(&self, workspace: &Path) -> Result<Vec<DependencyRecord>, ReportError> {
        let go = self
            .runner
            .find_program(&self.go)
            .map_err(|source| ReportError::ToolNotFound {
                tool: self.go.clone(),
                source,
            })?;

        let command = CommandSpec::new(go).args(LIST_ARGS).current_dir(workspace);
        tracing::info!(command = %command.display(), "listing module updates");

        let output = self
            .runner
            .run_captured(&command)
            .map_err(|e| ReportError::listing(command.display(), e.to_string()))?;

        if !output.status.is_success() {
            return Err(ReportError::listing(
                command.display(),
                format!("exited with {}", describe_exit(&output.status.code)),
            ));
        }

        let filter = UpdateFilter::new(workspace);
        tracing::debug!(workspace = filter.workspace(), "excluding paths under workspace");

        let mut updates = Vec::new();
        let mut listed = 0usize;
        for record in decode_records(&output.stdout) {
            let record = record?;
            listed += 1;
            if record.main {
                tracing::debug!(module = %record.import_path, "main module listed");
            }
            if filter.should_report(&record) {
                updates.push(record);
            }
        }

        tracing::debug!(listed, updatable = updates.len(), "decoded module list");
        Ok(updates)
    }
}
