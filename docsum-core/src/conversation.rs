//! Role-tagged turns sent to a chat-completion endpoint.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

const DEFAULT_SYSTEM_PROMPT: &str = "Your job is to summarize the documentation. Do not include any other text than the summary. Reply in plain text, do not use any markdown. Only reference react code.";
const DEFAULT_USER_PREFIX: &str = "Summarize the following documentation:\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// An ordered, non-empty list of turns.
///
/// Serialises transparently as the JSON array the completion API expects
/// under `messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    turns: Vec<Turn>,
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to read conversation template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse conversation template {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("conversation must contain at least one turn")]
    Empty,
}

impl Conversation {
    pub fn new(turns: Vec<Turn>) -> Result<Self, TemplateError> {
        if turns.is_empty() {
            return Err(TemplateError::Empty);
        }
        Ok(Self { turns })
    }

    /// Built-in two-turn summarisation prompt; file content goes after the user prefix.
    pub fn summary_template() -> Self {
        Self {
            turns: vec![
                Turn::system(DEFAULT_SYSTEM_PROMPT),
                Turn::user(DEFAULT_USER_PREFIX),
            ],
        }
    }

    /// Loads a template from a JSON file holding an array of `{role, content}` turns.
    pub fn from_template_file<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        info!(template_path = %path.display(), "Loading conversation template");

        let raw = std::fs::read_to_string(path).map_err(|e| {
            error!(error = ?e, template_path = %path.display(), "Failed to read conversation template");
            TemplateError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        let turns: Vec<Turn> = serde_json::from_str(&raw).map_err(|e| {
            error!(error = ?e, template_path = %path.display(), "Failed to parse conversation template");
            TemplateError::Parse {
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        debug!(turns = turns.len(), "Conversation template parsed");
        Self::new(turns)
    }

    /// Returns a copy of this conversation with `content` appended to the last turn.
    pub fn with_appended(&self, content: &str) -> Self {
        let mut turns = self.turns.clone();
        if let Some(last) = turns.last_mut() {
            last.content.push_str(content);
        }
        Self { turns }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}
