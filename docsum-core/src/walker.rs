//! Depth-first enumeration of the files under a root directory.
//!
//! Every pass in this crate (summarise, aggregate, clean) sees the tree through
//! [`walk`], so exclusion rules and traversal order are identical everywhere.
//! Entries are visited in file-name order and symlinks are never followed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, error};
use walkdir::{DirEntry, WalkDir};

/// Names to leave out of a walk.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Directory names whose whole subtree is pruned (e.g. `node_modules`).
    pub excluded_dirs: HashSet<String>,
    /// File names that are never yielded (e.g. `package.json`).
    pub excluded_files: HashSet<String>,
}

impl WalkOptions {
    pub fn new<D, F>(excluded_dirs: D, excluded_files: F) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            excluded_dirs: excluded_dirs.into_iter().map(Into::into).collect(),
            excluded_files: excluded_files.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("cannot read root directory {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error while walking {root}: {source}")]
    Entry {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Lazily yields every file under `root`, depth first.
///
/// The root is checked up front: a missing or unreadable root fails here,
/// before anything is yielded. Errors met deeper in the tree are yielded
/// in place and callers treat them as fatal.
pub fn walk(
    root: &Path,
    options: &WalkOptions,
) -> Result<impl Iterator<Item = Result<PathBuf, WalkError>>, WalkError> {
    if let Err(e) = std::fs::read_dir(root) {
        error!(error = ?e, root = %root.display(), "Cannot read walk root");
        return Err(WalkError::Root {
            path: root.to_path_buf(),
            source: e,
        });
    }

    let excluded_dirs = options.excluded_dirs.clone();
    let excluded_files = options.excluded_files.clone();
    let root_buf = root.to_path_buf();

    let entries = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            let pruned = is_excluded_dir(entry, &excluded_dirs);
            if pruned {
                debug!(path = %entry.path().display(), "Skipping excluded directory");
            }
            !pruned
        })
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    return None;
                }
                if excluded_files.contains(entry.file_name().to_string_lossy().as_ref()) {
                    debug!(path = %entry.path().display(), "Skipping excluded file");
                    return None;
                }
                Some(Ok(entry.into_path()))
            }
            Err(e) => Some(Err(WalkError::Entry {
                root: root_buf.clone(),
                source: e,
            })),
        });

    Ok(entries)
}

fn is_excluded_dir(entry: &DirEntry, excluded_dirs: &HashSet<String>) -> bool {
    // The root itself is never pruned, whatever its name.
    entry.depth() > 0
        && entry.file_type().is_dir()
        && excluded_dirs.contains(entry.file_name().to_string_lossy().as_ref())
}
