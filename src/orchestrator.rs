//! Orchestrator for coordinating the whole report workflow
//!
//! Workflow: acquire workspace → clone → locate go.mod → parse → list updates
//! → render → release workspace. The workspace is released on every path.

use crate::domain::{DependencyRecord, ModuleIdentity};
use crate::error::AppError;
use crate::fetch::RepositoryFetcher;
use crate::manifest::{locate, parse_manifest};
use crate::output::ReportFormatter;
use crate::platform::Platform;
use crate::process::ProcessRunner;
use crate::update::DependencyReporter;
use crate::workspace::{Workspace, WorkspaceManager};
use std::io::Write;

/// Default git executable
pub const DEFAULT_GIT: &str = "git";

/// Default go executable
pub const DEFAULT_GO: &str = "go";

/// External tools used by the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// Version-control client
    pub git: String,
    /// Go toolchain used for `go list`
    pub go: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            git: DEFAULT_GIT.to_string(),
            go: DEFAULT_GO.to_string(),
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Identity declared by the repository's go.mod
    pub identity: ModuleIdentity,
    /// External dependencies with a newer version, in listing order
    pub updates: Vec<DependencyRecord>,
}

/// Orchestrator for coordinating the report workflow
pub struct Orchestrator<R: ProcessRunner> {
    /// Host platform capabilities
    platform: Platform,
    /// Workspace creation and removal
    workspaces: WorkspaceManager,
    /// External tool names or paths
    tools: ToolPaths,
    /// Process runner for git and go
    runner: R,
}

impl<R: ProcessRunner> Orchestrator<R> {
    /// Create an orchestrator using the platform's default workspace configuration
    pub fn new(platform: Platform, tools: ToolPaths, runner: R) -> Self {
        Self::with_workspaces(
            platform,
            WorkspaceManager::new(platform.workspace_config()),
            tools,
            runner,
        )
    }

    /// Create an orchestrator with a custom workspace manager
    pub fn with_workspaces(
        platform: Platform,
        workspaces: WorkspaceManager,
        tools: ToolPaths,
        runner: R,
    ) -> Self {
        Self {
            platform,
            workspaces,
            tools,
            runner,
        }
    }

    /// Run the workflow for `url`, writing the report with `formatter`
    pub fn run(
        &self,
        url: &str,
        formatter: &dyn ReportFormatter,
        writer: &mut dyn Write,
    ) -> Result<Report, AppError> {
        // Fresh directory for this run
        let workspace = self.workspaces.acquire()?;

        // Analyze and print while the checkout still exists
        let result = self
            .analyze(url, &workspace)
            .and_then(|report| {
                formatter.format(&report.identity, &report.updates, writer)?;
                writer.flush()?;
                Ok(report)
            });

        // Always clean up; a failed run keeps its own error
        match (result, workspace.release()) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(release_err)) => Err(release_err.into()),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(release_err)) => {
                tracing::error!("{}", release_err);
                Err(e)
            }
        }
    }

    /// Clone, locate, parse and list updates inside `workspace`
    fn analyze(&self, url: &str, workspace: &Workspace) -> Result<Report, AppError> {
        let dir = workspace.path();

        // Clone
        RepositoryFetcher::new(&self.runner, self.platform, self.tools.git.as_str())
            .fetch(url, dir)?;

        // Find and read go.mod
        let manifest = locate(dir)?;
        let identity = parse_manifest(&manifest)?;

        // Ask the go tool for newer versions
        let updates = DependencyReporter::new(&self.runner, self.tools.go.as_str()).report(dir)?;

        Ok(Report { identity, updates })
    }
}
