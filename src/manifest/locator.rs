//! go.mod location inside a checked-out repository
//!
//! The walk is depth-first with entries sorted by file name, so the result is
//! deterministic for a given tree. The first match wins.

use crate::error::ManifestError;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// File name of the Go module manifest
pub const MANIFEST_FILENAME: &str = "go.mod";

/// VCS metadata directory, never searched
const GIT_DIR: &str = ".git";

/// Find the first go.mod under `root`
pub fn locate(root: &Path) -> Result<PathBuf, ManifestError> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_git_dir(entry));

    for entry in walker {
        let entry = entry.map_err(|source| ManifestError::Walk {
            root: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_dir() && entry.file_name() == MANIFEST_FILENAME {
            tracing::debug!(path = %entry.path().display(), "found manifest");
            return Ok(entry.into_path());
        }
    }

    Err(ManifestError::not_found(root))
}

fn is_git_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == GIT_DIR
}
