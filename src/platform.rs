//! Host platform capabilities
//!
//! Everything that differs between Windows and Unix-like hosts lives here:
//! the shape of the clone command, where workspaces are created and how
//! their removal is retried. The platform is detected once in `main` and
//! passed down explicitly.

use crate::process::CommandSpec;
use crate::workspace::{RemovalPolicy, WorkspaceConfig, WORKSPACE_PREFIX};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Number of removal attempts on Windows
pub const WINDOWS_REMOVAL_ATTEMPTS: u32 = 3;

/// Delay between removal attempts on Windows
pub const WINDOWS_REMOVAL_DELAY: Duration = Duration::from_millis(200);

/// Host platform family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Linux, macOS and other Unix-like systems
    Unix,
    /// Windows, where directory removal can fail while handles are closing
    Windows,
}

impl Platform {
    /// Detect the platform this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Returns the display name of the platform
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Unix => "unix",
            Platform::Windows => "windows",
        }
    }

    /// Build the command that clones `url` into `destination`
    pub fn clone_command(&self, git: &str, url: &str, destination: &Path) -> CommandSpec {
        let base = match self {
            Platform::Unix => CommandSpec::new(git),
            Platform::Windows => CommandSpec::new("cmd").args(["/C", git]),
        };
        base.args(["clone", url]).arg(destination)
    }

    /// Workspace configuration rooted at the system temporary directory
    pub fn workspace_config(&self) -> WorkspaceConfig {
        self.workspace_config_in(std::env::temp_dir())
    }

    /// Workspace configuration rooted at `temp_root`
    pub fn workspace_config_in(&self, temp_root: impl Into<PathBuf>) -> WorkspaceConfig {
        let temp_root = temp_root.into();
        match self {
            Platform::Unix => WorkspaceConfig::new(temp_root),
            Platform::Windows => WorkspaceConfig::new(temp_root.join(WORKSPACE_PREFIX))
                .with_stable_root(true)
                .with_removal(RemovalPolicy::retrying(
                    WINDOWS_REMOVAL_ATTEMPTS,
                    WINDOWS_REMOVAL_DELAY,
                )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_current_matches_target() {
        let platform = Platform::current();
        if cfg!(windows) {
            assert_eq!(platform, Platform::Windows);
        } else {
            assert_eq!(platform, Platform::Unix);
        }
    }

    #[test]
    fn test_unix_clone_command() {
        let cmd =
            Platform::Unix.clone_command("git", "https://example.com/r.git", Path::new("/tmp/ws"));
        assert_eq!(cmd.program, OsString::from("git"));
        assert_eq!(
            cmd.args,
            vec![
                OsString::from("clone"),
                OsString::from("https://example.com/r.git"),
                OsString::from("/tmp/ws"),
            ]
        );
        assert!(cmd.cwd.is_none());
    }

    #[test]
    fn test_windows_clone_command() {
        let cmd =
            Platform::Windows.clone_command("git", "https://example.com/r.git", Path::new("ws"));
        assert_eq!(cmd.program, OsString::from("cmd"));
        assert_eq!(cmd.display(), "cmd /C git clone https://example.com/r.git ws");
    }

    #[test]
    fn test_unix_workspace_config() {
        let config = Platform::Unix.workspace_config_in("/tmp");
        assert_eq!(config.root, PathBuf::from("/tmp"));
        assert!(!config.stable_root);
        assert_eq!(config.removal, RemovalPolicy::single());
    }

    #[test]
    fn test_windows_workspace_config() {
        let config = Platform::Windows.workspace_config_in("C:\\Temp");
        assert_eq!(config.root, PathBuf::from("C:\\Temp").join("go-dep-analysis"));
        assert!(config.stable_root);
        assert_eq!(config.removal.attempts, 3);
        assert_eq!(config.removal.delay, Duration::from_millis(200));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Platform::Unix.display_name(), "unix");
        assert_eq!(Platform::Windows.display_name(), "windows");
    }
}
