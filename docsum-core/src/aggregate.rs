//! Combines a tree of summaries into plain-text bundles.
//!
//! Output, all in [`AggregateConfig::output_dir`]:
//! - `combined_docs.txt`: every file in walk order, each followed by a blank line, trimmed.
//! - `combined_<dir>.txt`: the same, restricted to the files directly inside one
//!   directory. `<dir>` is the directory's path relative to the input root with
//!   separators replaced by `_`; files at the root itself go to `combined_root.txt`.
//!
//! Output names are checked before anything is written: two directories that map
//! to the same file (`a_b/` and `a/b/`, or a `docs/` directory against the global
//! bundle) fail the run with [`AggregateError::NameClash`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::config::AggregateConfig;
use crate::walker::{walk, WalkError, WalkOptions};

pub const GLOBAL_FILE_NAME: &str = "combined_docs.txt";
const ROOT_KEY: &str = "root";
const GLOBAL_KEY: &str = "<all documents>";

#[derive(Debug)]
pub struct AggregateReport {
    pub files_read: usize,
    pub global: PathBuf,
    pub directories: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{first} and {second} would both be written to {file_name}")]
    NameClash {
        file_name: String,
        first: String,
        second: String,
    },
}

/// File name for a directory bundle, e.g. `guides/advanced` -> `combined_guides_advanced.txt`.
/// The empty key is the input root.
pub fn directory_file_name(key: &str) -> String {
    let stem = if key.is_empty() { ROOT_KEY } else { key };
    format!("combined_{}.txt", stem.replace(['/', '\\'], "_"))
}

fn display_key(key: &str) -> String {
    if key.is_empty() {
        ".".to_string()
    } else {
        key.to_string()
    }
}

/// Derives every bundle's file name, failing on the first name two bundles share.
fn plan_outputs(
    per_directory: &BTreeMap<String, String>,
) -> Result<Vec<(String, &str)>, AggregateError> {
    let mut owners: BTreeMap<String, String> = BTreeMap::new();
    owners.insert(GLOBAL_FILE_NAME.to_string(), GLOBAL_KEY.to_string());

    let mut outputs = Vec::with_capacity(per_directory.len());
    for (key, content) in per_directory {
        let file_name = directory_file_name(key);
        if let Some(first) = owners.get(&file_name) {
            error!(file_name = %file_name, first = %first, second = %display_key(key), "Combined file names clash");
            return Err(AggregateError::NameClash {
                file_name,
                first: first.clone(),
                second: display_key(key),
            });
        }
        owners.insert(file_name.clone(), display_key(key));
        outputs.push((file_name, content.as_str()));
    }
    Ok(outputs)
}

pub fn aggregate(config: &AggregateConfig) -> Result<AggregateReport, AggregateError> {
    info!(input_dir = %config.input_dir.display(), "Combining documents");

    let mut global = String::new();
    let mut per_directory: BTreeMap<String, String> = BTreeMap::new();
    let mut files_read = 0usize;

    for file in walk(&config.input_dir, &WalkOptions::default())? {
        let file = file?;
        let content = std::fs::read_to_string(&file).map_err(|e| {
            error!(error = ?e, path = %file.display(), "Failed to read document");
            AggregateError::Read {
                path: file.clone(),
                source: e,
            }
        })?;

        let key = directory_key(&config.input_dir, &file);
        debug!(path = %file.display(), directory = %key, "Appending document");

        global.push_str(&content);
        global.push_str("\n\n");
        let bucket = per_directory.entry(key).or_default();
        bucket.push_str(&content);
        bucket.push_str("\n\n");
        files_read += 1;
    }

    let outputs = plan_outputs(&per_directory)?;

    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        error!(error = ?e, path = %config.output_dir.display(), "Failed to create output directory");
        AggregateError::Write {
            path: config.output_dir.clone(),
            source: e,
        }
    })?;

    let global_path = config.output_dir.join(GLOBAL_FILE_NAME);
    write_trimmed(&global_path, &global)?;

    let mut directories = Vec::with_capacity(outputs.len());
    for (file_name, content) in outputs {
        let path = config.output_dir.join(file_name);
        write_trimmed(&path, content)?;
        directories.push(path);
    }

    info!(
        files_read,
        directories = directories.len(),
        "Successfully combined all documents"
    );
    Ok(AggregateReport {
        files_read,
        global: global_path,
        directories,
    })
}

fn directory_key(input_dir: &Path, file: &Path) -> String {
    file.parent()
        .and_then(|parent| parent.strip_prefix(input_dir).ok())
        .map(|rel| rel.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_trimmed(path: &Path, content: &str) -> Result<(), AggregateError> {
    std::fs::write(path, content.trim()).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to write combined file");
        AggregateError::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })
}
