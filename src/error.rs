//! Application error types using thiserror
//!
//! Error hierarchy:
//! - WorkspaceError: Temporary checkout directory creation/removal
//! - FetchError: Repository clone failures
//! - ManifestError: go.mod location and parsing
//! - ReportError: `go list` invocation and output decoding

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Workspace lifecycle errors
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Repository clone errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Manifest location and parsing errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Dependency listing errors
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Failure writing the rendered report
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors related to the temporary workspace directory
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Failed to create the workspace (or its stable root)
    #[error("failed to create temporary directory under {root}: {source}")]
    Create {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove the workspace after all attempts
    #[error("failed to remove temporary directory {path} after {attempts} attempt(s): {source}")]
    Remove {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to cloning the repository
#[derive(Error, Debug)]
pub enum FetchError {
    /// The clone command could not be started
    #[error("failed to run clone command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The clone command exited unsuccessfully
    #[error("failed to clone {url}: `{command}` exited with {}", describe_exit(.code))]
    Failed {
        url: String,
        command: String,
        code: Option<i32>,
    },
}

/// Errors related to go.mod location and parsing
#[derive(Error, Debug)]
pub enum ManifestError {
    /// No go.mod anywhere under the searched root
    #[error("could not find go.mod in {root}")]
    NotFound { root: PathBuf },

    /// Directory traversal failed
    #[error("failed to search {root} for go.mod: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// go.mod syntax error
    #[error("failed to parse {path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// go.mod has no module directive
    #[error("module declaration not found in {path}")]
    MissingModuleDeclaration { path: PathBuf },
}

/// Errors related to the dependency listing command
#[derive(Error, Debug)]
pub enum ReportError {
    /// The listing tool is not on the search path
    #[error("{tool} command not found: {source}")]
    ToolNotFound {
        tool: String,
        #[source]
        source: which::Error,
    },

    /// The listing tool could not run or exited unsuccessfully
    #[error("error listing dependencies with `{command}`: {message}")]
    Listing { command: String, message: String },

    /// A JSON object in the listing stream could not be decoded
    #[error("error decoding dependencies: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
}

pub(crate) fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(root: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { root: root.into() }
    }

    /// Creates a new Parse error
    pub fn parse_error(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        ManifestError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

impl ReportError {
    /// Creates a new Listing error
    pub fn listing(command: impl Into<String>, message: impl Into<String>) -> Self {
        ReportError::Listing {
            command: command.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("/tmp/checkout");
        let msg = format!("{}", err);
        assert!(msg.contains("could not find go.mod"));
        assert!(msg.contains("/tmp/checkout"));
    }

    #[test]
    fn test_manifest_error_parse_has_line() {
        let err = ManifestError::parse_error("/repo/go.mod", 3, "unknown directive: modul");
        let msg = format!("{}", err);
        assert!(msg.contains("go.mod:3"));
        assert!(msg.contains("unknown directive"));
    }

    #[test]
    fn test_missing_module_declaration() {
        let err = ManifestError::MissingModuleDeclaration {
            path: PathBuf::from("/repo/go.mod"),
        };
        assert!(err.to_string().contains("module declaration not found"));
    }

    #[test]
    fn test_fetch_error_failed_with_code() {
        let err = FetchError::Failed {
            url: "https://example.com/repo.git".to_string(),
            command: "git clone".to_string(),
            code: Some(128),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("failed to clone https://example.com/repo.git"));
        assert!(msg.contains("exit code 128"));
    }

    #[test]
    fn test_fetch_error_failed_without_code() {
        let err = FetchError::Failed {
            url: "u".to_string(),
            command: "git clone".to_string(),
            code: None,
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_workspace_error_remove() {
        let err = WorkspaceError::Remove {
            path: PathBuf::from("/tmp/ws"),
            attempts: 3,
            source: std::io::Error::other("busy"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("after 3 attempt(s)"));
        assert!(msg.contains("busy"));
    }

    #[test]
    fn test_report_error_listing() {
        let err = ReportError::listing("go list -m -u -json all", "exit code 1");
        let msg = format!("{}", err);
        assert!(msg.contains("error listing dependencies"));
        assert!(msg.contains("exit code 1"));
    }

    #[test]
    fn test_report_error_decode() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ReportError::Decode { source };
        assert!(err.to_string().contains("error decoding dependencies"));
    }

    #[test]
    fn test_app_error_from_manifest_error() {
        let app_err: AppError = ManifestError::not_found("/path").into();
        assert!(matches!(
            app_err,
            AppError::Manifest(ManifestError::NotFound { .. })
        ));
        assert!(app_err.to_string().contains("could not find go.mod"));
    }

    #[test]
    fn test_app_error_from_report_error() {
        let app_err: AppError = ReportError::listing("go list", "boom").into();
        assert!(app_err.to_string().contains("boom"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ManifestError::not_found("/test");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
