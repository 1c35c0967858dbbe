//! Repository fetcher: clones a remote repository into a workspace

use crate::error::FetchError;
use crate::platform::Platform;
use crate::process::ProcessRunner;
use std::path::Path;

/// Clones repositories with the system git client
pub struct RepositoryFetcher<'a, R: ProcessRunner> {
    runner: &'a R,
    platform: Platform,
    git: String,
}

impl<'a, R: ProcessRunner> RepositoryFetcher<'a, R> {
    /// Create a fetcher that invokes `git` through `runner`
    pub fn new(runner: &'a R, platform: Platform, git: impl Into<String>) -> Self {
        Self {
            runner,
            platform,
            git: git.into(),
        }
    }

    /// Clone `url` into `destination`, streaming git's output through
    pub fn fetch(&self, url: &str, destination: &Path) -> Result<(), FetchError> {
        let command = self.platform.clone_command(&self.git, url, destination);
        tracing::info!(url, destination = %destination.display(), "cloning repository");

        let status = self
            .runner
            .run_streaming(&command)
            .map_err(|source| FetchError::Spawn {
                command: command.display(),
                source,
            })?;

        if !status.is_success() {
            return Err(FetchError::Failed {
                url: url.to_string(),
                command: command.display(),
                code: status.code,
            });
        }
        Ok(())
    }
}
