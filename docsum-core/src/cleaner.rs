//! Strips Next.js page boilerplate (static-path helpers, `meta` exports,
//! `getStaticProps`) from a documentation tree before it is summarised.
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};

use crate::config::CleanConfig;
use crate::walker::{walk, WalkError};

/// Boilerplate blocks, applied in order. Each removes at most its first match.
const BOILERPLATE_PATTERNS: &[&str] = &[
    // import { getCustomStaticPath } from '@/utils/getCustomStaticPath';
    r#"^import\s+\{\s*getCustomStaticPath\s*\}\s+from\s+['"]@/utils/getCustomStaticPath['"]\s*;?\n?"#,
    // export const meta = { ... };
    r"^export\s+const\s+meta\s*=\s*\{[\s\S]*?\}\s*;?\n?",
    // export const getStaticPaths = async () => { ... };  |  export function getStaticProps(...) { ... };
    r"^export\s+(?:const\s+getStaticPaths\s*=\s*async\s*\(\)\s*=>\s*\{[\s\S]*?\}\s*;?|function\s+getStaticProps\s*\([^)]*\)\s*\{[\s\S]*?\}\s*;?)\s*\n?",
    r"^export\s+async\s+function\s+getStaticProps\s*\([^)]*\)\s*\{[\s\S]*?\}\s*\n?",
    r"^export\s+function\s+getStaticProps\s*\([^)]*\)\s*\{[\s\S]*?\}\s*\n?",
];

static COMPILED_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn patterns() -> &'static [Regex] {
    COMPILED_PATTERNS.get_or_init(|| {
        BOILERPLATE_PATTERNS
            .iter()
            .filter_map(|pattern| {
                match RegexBuilder::new(pattern).multi_line(true).build() {
                    Ok(re) => Some(re),
                    Err(e) => {
                        error!(error = %e, pattern, "Invalid boilerplate pattern, ignoring it");
                        None
                    }
                }
            })
            .collect()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    /// Boilerplate was removed and the file rewritten.
    Cleaned,
    /// Nothing matched; the file was not written.
    Unchanged,
    /// Not UTF-8 text; left alone.
    NotText,
}

#[derive(Debug, Default)]
pub struct CleanReport {
    pub scanned: usize,
    pub cleaned: Vec<PathBuf>,
    pub not_text: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum CleanError {
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
}

/// Removes the first match of each boilerplate pattern from `content`.
pub fn strip_boilerplate(content: &str) -> String {
    let mut result = content.to_string();
    for re in patterns() {
        result = re.replace(&result, "").into_owned();
    }
    result
}

/// Cleans a single file, writing it back only if its content changed.
pub fn clean_file(path: &Path) -> Result<CleanOutcome, CleanError> {
    let bytes = std::fs::read(path).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to read file for cleaning");
        CleanError::Read {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(_) => {
            warn!(path = %path.display(), "Skipping non-UTF-8 file");
            return Ok(CleanOutcome::NotText);
        }
    };

    let cleaned = strip_boilerplate(&content);
    if cleaned == content {
        return Ok(CleanOutcome::Unchanged);
    }

    std::fs::write(path, cleaned).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to write cleaned file");
        CleanError::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    debug!(path = %path.display(), "Removed boilerplate");
    Ok(CleanOutcome::Cleaned)
}

pub fn clean_tree(config: &CleanConfig) -> Result<CleanReport, CleanError> {
    info!(root = %config.root.display(), "Cleaning boilerplate");
    let mut report = CleanReport::default();

    for file in walk(&config.root, &config.walk)? {
        let file = file?;
        report.scanned += 1;
        match clean_file(&file)? {
            CleanOutcome::Cleaned => report.cleaned.push(file),
            CleanOutcome::NotText => report.not_text.push(file),
            CleanOutcome::Unchanged => {}
        }
    }

    info!(
        scanned = report.scanned,
        cleaned = report.cleaned.len(),
        "Cleaning complete"
    );
    Ok(report)
}
