//! Batch pipeline: walk a source tree, summarise each file, mirror the results.
//!
//! For every file under [`SummariseConfig::source_dir`] the pipeline
//!   - reads the file as UTF-8 text,
//!   - appends it to the last turn of the configured conversation template,
//!   - skips it when resuming and its destination already exists,
//!   - otherwise asks the [`Completer`] for a summary and writes it to the same
//!     relative path under [`SummariseConfig::output_dir`],
//!   - then waits [`SummariseConfig::delay`] before the next call.
//!
//! # Error Handling
//! Fail-fast. The first read, completion or write error ends the run and is
//! returned to the caller. Summaries already written stay on disk, and with
//! `skip_existing` a re-run resumes after them.
//!
//! # Concurrency
//! One request at a time. The fixed delay after each successful call is the
//! only rate limiting.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::config::SummariseConfig;
use crate::contract::{Completer, CompletionError};
use crate::walker::{walk, WalkError};

/// One source file and where its summary goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub source: PathBuf,
    pub destination: PathBuf,
}

#[derive(Debug, Default)]
pub struct SummariseReport {
    pub summarised: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum SummariseError {
    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("{path} is not under source directory {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

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

    #[error("completion failed for {path}: {source}")]
    Completion {
        path: PathBuf,
        #[source]
        source: CompletionError,
    },
}

/// Maps every file under the source directory to its mirrored destination.
pub fn plan_tasks(
    config: &SummariseConfig,
) -> Result<impl Iterator<Item = Result<FileTask, SummariseError>> + '_, SummariseError> {
    let files = walk(&config.source_dir, &config.walk)?;
    Ok(files.map(move |file| {
        let source = file?;
        let destination = mirror_path(&config.source_dir, &config.output_dir, &source)?;
        Ok(FileTask {
            source,
            destination,
        })
    }))
}

fn mirror_path(
    source_dir: &Path,
    output_dir: &Path,
    source: &Path,
) -> Result<PathBuf, SummariseError> {
    source
        .strip_prefix(source_dir)
        .map(|relative| output_dir.join(relative))
        .map_err(|_| SummariseError::OutsideRoot {
            path: source.to_path_buf(),
            root: source_dir.to_path_buf(),
        })
}

/// Runs the pipeline to completion or to the first error.
pub async fn summarise<C>(
    config: &SummariseConfig,
    completer: &C,
) -> Result<SummariseReport, SummariseError>
where
    C: Completer + ?Sized,
{
    info!(
        source_dir = %config.source_dir.display(),
        output_dir = %config.output_dir.display(),
        skip_existing = config.skip_existing,
        "[SUMMARISE] Starting summarisation pipeline"
    );

    let mut report = SummariseReport::default();

    for task in plan_tasks(config)? {
        let task = task?;

        // --- Step 1: Read the source ---
        let content = tokio::fs::read_to_string(&task.source).await.map_err(|e| {
            error!(error = ?e, path = %task.source.display(), "[SUMMARISE][ERROR] Failed to read source file");
            SummariseError::Read {
                path: task.source.clone(),
                source: e,
            }
        })?;

        // --- Step 2: Build the conversation ---
        let conversation = config.template.with_appended(&content);

        // --- Step 3: Resume check ---
        if config.skip_existing && destination_exists(&task.destination).await? {
            debug!(path = %task.source.display(), "[SUMMARISE] Destination exists, skipping");
            report.skipped.push(task.source);
            continue;
        }

        // --- Step 4: Complete and write ---
        info!(path = %task.source.display(), bytes = content.len(), "[SUMMARISE] Requesting summary");
        let summary = completer.complete(&conversation).await.map_err(|e| {
            error!(error = %e, path = %task.source.display(), "[SUMMARISE][ERROR] Completion failed");
            SummariseError::Completion {
                path: task.source.clone(),
                source: e,
            }
        })?;

        write_summary(&task.destination, &summary).await?;
        info!(
            source = %task.source.display(),
            destination = %task.destination.display(),
            "[SUMMARISE] Summary written"
        );
        report.summarised.push(task.source);

        // --- Step 5: Static rate limit ---
        tokio::time::sleep(config.delay).await;
    }

    info!(
        summarised = report.summarised.len(),
        skipped = report.skipped.len(),
        "[SUMMARISE] Pipeline complete"
    );
    Ok(report)
}

async fn destination_exists(path: &Path) -> Result<bool, SummariseError> {
    tokio::fs::try_exists(path).await.map_err(|e| {
        error!(error = ?e, path = %path.display(), "[SUMMARISE][ERROR] Cannot check destination");
        SummariseError::Read {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

async fn write_summary(destination: &Path, summary: &str) -> Result<(), SummariseError> {
    let to_write_error = |e: std::io::Error| {
        error!(error = ?e, path = %destination.display(), "[SUMMARISE][ERROR] Failed to write summary");
        SummariseError::Write {
            path: destination.to_path_buf(),
            source: e,
        }
    };

    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(to_write_error)?;
    }
    tokio::fs::write(destination, summary)
        .await
        .map_err(to_write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, write};
    use tempfile::tempdir;

    #[test]
    fn plans_mirrored_destinations() {
        let tmp = tempdir().unwrap();
        let source_dir = tmp.path().join("oldDocs");
        create_dir_all(source_dir.join("hooks")).unwrap();
        write(source_dir.join("hooks/use-state.md"), "x").unwrap();
        write(source_dir.join("intro.md"), "x").unwrap();

        let config = SummariseConfig::new(&source_dir, tmp.path().join("newDocs"));
        let tasks: Vec<FileTask> = plan_tasks(&config)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            tasks,
            vec![
                FileTask {
                    source: source_dir.join("hooks/use-state.md"),
                    destination: tmp.path().join("newDocs/hooks/use-state.md"),
                },
                FileTask {
                    source: source_dir.join("intro.md"),
                    destination: tmp.path().join("newDocs/intro.md"),
                },
            ]
        );
    }

    #[test]
    fn missing_source_dir_is_a_walk_error() {
        let tmp = tempdir().unwrap();
        let config = SummariseConfig::new(tmp.path().join("nope"), tmp.path().join("out"));
        assert!(matches!(plan_tasks(&config), Err(SummariseError::Walk(_))));
    }
}
