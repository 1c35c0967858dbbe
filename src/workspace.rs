//! Temporary workspace for a single checkout
//!
//! The manager creates a uniquely named directory under a configured root and
//! hands out a `Workspace` guard. The guard removes the directory when it is
//! released explicitly, or when it is dropped on an early-exit path.

use crate::error::WorkspaceError;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix used for workspace directory names
pub const WORKSPACE_PREFIX: &str = "go-dep-analysis";

/// Function that deletes a workspace directory tree
pub type Remover = fn(&Path) -> io::Result<()>;

fn remove_tree(path: &Path) -> io::Result<()> {
    std::fs::remove_dir_all(path)
}

/// How many times to try removing a workspace, and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalPolicy {
    /// Total number of removal attempts (at least 1)
    pub attempts: u32,
    /// Fixed delay between two attempts
    pub delay: Duration,
}

impl RemovalPolicy {
    /// Remove once, fail immediately on error
    pub fn single() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Retry removal with a fixed delay
    pub fn retrying(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

/// Where workspaces are created and how they are removed
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Directory that holds workspaces
    pub root: PathBuf,
    /// Whether `root` must be created up front (a stable, pre-created location)
    pub stable_root: bool,
    /// Removal retry policy
    pub removal: RemovalPolicy,
    /// Deletes a workspace tree, `std::fs::remove_dir_all` by default
    pub remover: Remover,
}

impl WorkspaceConfig {
    /// Workspaces directly under `root`, removed in a single attempt
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stable_root: false,
            removal: RemovalPolicy::single(),
            remover: remove_tree,
        }
    }

    /// Require the root to be created before use (builder pattern)
    pub fn with_stable_root(mut self, stable: bool) -> Self {
        self.stable_root = stable;
        self
    }

    /// Set the removal policy (builder pattern)
    pub fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    /// Replace the function used to delete workspaces (builder pattern)
    pub fn with_remover(mut self, remover: Remover) -> Self {
        self.remover = remover;
        self
    }
}

/// Creates workspaces according to a `WorkspaceConfig`
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    config: WorkspaceConfig,
}

impl WorkspaceManager {
    /// Create a new manager
    pub fn new(config: WorkspaceConfig) -> Self {
        Self { config }
    }

    /// Create a new, empty, uniquely named workspace directory
    pub fn acquire(&self) -> Result<Workspace, WorkspaceError> {
        let root = &self.config.root;
        let create_error = |source| WorkspaceError::Create {
            root: root.clone(),
            source,
        };

        if self.config.stable_root {
            std::fs::create_dir_all(root).map_err(create_error)?;
        }

        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", WORKSPACE_PREFIX))
            .tempdir_in(root)
            .map_err(create_error)?;
        let path = dir.keep();

        tracing::debug!(path = %path.display(), "created workspace");
        Ok(Workspace {
            path,
            removal: self.config.removal,
            remover: self.config.remover,
            released: false,
        })
    }

    /// Remove a workspace and everything in it
    pub fn release(&self, workspace: Workspace) -> Result<(), WorkspaceError> {
        workspace.release()
    }
}

/// A workspace directory that is removed when released or dropped
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    removal: RemovalPolicy,
    remover: Remover,
    released: bool,
}

impl Workspace {
    /// Path of the workspace directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the workspace, reporting failure after the last attempt
    pub fn release(mut self) -> Result<(), WorkspaceError> {
        self.released = true;
        remove_with_retry(&self.path, self.removal, self.remover)?;
        tracing::debug!(path = %self.path.display(), "removed workspace");
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_with_retry(&self.path, self.removal, self.remover) {
            tracing::error!("{}", e);
        }
    }
}

/// Remove `path` with `remove`, retrying according to `policy`
///
/// A directory that no longer exists counts as removed.
pub(crate) fn remove_with_retry<F>(
    path: &Path,
    policy: RemovalPolicy,
    mut remove: F,
) -> Result<(), WorkspaceError>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match remove(path) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) if attempt >= attempts => {
                return Err(WorkspaceError::Remove {
                    path: path.to_path_buf(),
                    attempts,
                    source: e,
                });
            }
            Err(e) => {
                tracing::warn!(
                    attempt,
                    attempts,
                    "failed to remove {}: {}; retrying",
                    path.display(),
                    e
                );
                std::thread::sleep(policy.delay);
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn manager_in(root: &Path) -> WorkspaceManager {
        WorkspaceManager::new(WorkspaceConfig::new(root))
    }

    #[test]
    fn test_acquire_creates_empty_unique_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = manager_in(temp_dir.path());

        let first = manager.acquire().unwrap();
        let second = manager.acquire().unwrap();

        assert!(first.path().is_dir());
        assert!(second.path().is_dir());
        assert_ne!(first.path(), second.path());
        assert!(first.path().starts_with(temp_dir.path()));
        assert_eq!(std::fs::read_dir(first.path()).unwrap().count(), 0);

        let name = first.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(WORKSPACE_PREFIX));
    }

    #[test]
    fn test_acquire_creates_stable_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join(WORKSPACE_PREFIX);
        let manager =
            WorkspaceManager::new(WorkspaceConfig::new(&root).with_stable_root(true));

        let workspace = manager.acquire().unwrap();
        assert!(root.is_dir());
        assert!(workspace.path().starts_with(&root));
        workspace.release().unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_acquire_missing_root_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = manager_in(&temp_dir.path().join("missing"));
        let err = manager.acquire().unwrap_err();
        assert!(matches!(err, WorkspaceError::Create { .. }));
    }

    #[test]
    fn test_release_removes_contents() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = manager_in(temp_dir.path());
        let workspace = manager.acquire().unwrap();
        let path = workspace.path().to_path_buf();
        std::fs::create_dir_all(path.join("nested/deeper")).unwrap();
        std::fs::write(path.join("nested/deeper/go.mod"), "module x\n").unwrap();

        manager.release(workspace).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_workspace() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = manager_in(temp_dir.path());
        let path = {
            let workspace = manager.acquire().unwrap();
            workspace.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_release_already_removed_is_ok() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = manager_in(temp_dir.path());
        let workspace = manager.acquire().unwrap();
        std::fs::remove_dir_all(workspace.path()).unwrap();
        assert!(workspace.release().is_ok());
    }

    fn locked(_: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
    }

    #[test]
    fn test_release_reports_removal_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = WorkspaceConfig::new(temp_dir.path())
            .with_removal(RemovalPolicy::retrying(2, Duration::ZERO))
            .with_remover(locked);
        let manager = WorkspaceManager::new(config);
        let workspace = manager.acquire().unwrap();
        let path = workspace.path().to_path_buf();

        let err = manager.release(workspace).unwrap_err();
        assert!(matches!(err, WorkspaceError::Remove { attempts: 2, .. }));
        assert!(err.to_string().contains("locked"));
        assert!(path.exists());
    }

    #[test]
    fn test_drop_survives_removal_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager =
            WorkspaceManager::new(WorkspaceConfig::new(temp_dir.path()).with_remover(locked));
        let path = {
            let workspace = manager.acquire().unwrap();
            workspace.path().to_path_buf()
        };
        assert!(path.exists());
    }

    #[test]
    fn test_retry_until_success() {
        let calls = Cell::new(0);
        let policy = RemovalPolicy::retrying(3, Duration::ZERO);
        let result = remove_with_retry(Path::new("/ws"), policy, |_| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(io::Error::other("in use"))
            } else {
                Ok(())
            }
        });
        assert!(result.is_ok());
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_retry_gives_up_after_attempts() {
        let calls = Cell::new(0);
        let policy = RemovalPolicy::retrying(3, Duration::ZERO);
        let err = remove_with_retry(Path::new("/ws"), policy, |_| {
            calls.set(calls.get() + 1);
            Err(io::Error::other("in use"))
        })
        .unwrap_err();
        assert_eq!(calls.get(), 3);
        assert!(matches!(err, WorkspaceError::Remove { attempts: 3, .. }));
    }

    #[test]
    fn test_single_policy_does_not_retry() {
        let calls = Cell::new(0);
        let result = remove_with_retry(Path::new("/ws"), RemovalPolicy::single(), |_| {
            calls.set(calls.get() + 1);
            Err(io::Error::other("in use"))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_retrying_clamps_zero_attempts() {
        assert_eq!(RemovalPolicy::retrying(0, Duration::ZERO).attempts, 1);
    }
}
