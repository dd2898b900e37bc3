// docsum-core/src/config.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::conversation::Conversation;
use crate::walker::WalkOptions;

pub const DEFAULT_ENDPOINT: &str = "https://api.cerebras.ai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b";
pub const API_KEY_ENV: &str = "CEREBRAS_API_KEY";
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Where and as whom the completion client talks.
#[derive(Clone)]
pub struct CompletionConfig {
    /// Full URL of the chat-completions route.
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
}

impl CompletionConfig {
    /// Default endpoint and model with the given credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Reads the credential from `CEREBRAS_API_KEY`.
    pub fn from_env() -> Result<Self, std::env::VarError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) => {
                info!("{} found in env", API_KEY_ENV);
                Ok(Self::new(key))
            }
            Err(e) => {
                error!(error = ?e, "{} environment variable not set", API_KEY_ENV);
                Err(e)
            }
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            endpoint = %self.endpoint,
            model = %self.model,
            api_key_set = !self.api_key.is_empty(),
            "Loaded CompletionConfig"
        );
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Settings for one summarisation run.
#[derive(Debug, Clone)]
pub struct SummariseConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Treat an existing destination file as proof the source was already summarised.
    pub skip_existing: bool,
    /// Pause after every completion call.
    pub delay: Duration,
    pub template: Conversation,
    pub walk: WalkOptions,
}

impl SummariseConfig {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            skip_existing: true,
            delay: DEFAULT_DELAY,
            template: Conversation::summary_template(),
            walk: WalkOptions::default(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            source_dir = %self.source_dir.display(),
            output_dir = %self.output_dir.display(),
            skip_existing = self.skip_existing,
            delay_ms = self.delay.as_millis() as u64,
            template_turns = self.template.turns().len(),
            "Loaded SummariseConfig"
        );
        debug!(?self, "SummariseConfig loaded (full debug)");
    }
}

/// Settings for combining a summary tree into text files.
#[derive(Debug, Clone)]
pub struct AggregateConfig {
    pub input_dir: PathBuf,
    /// Directory the `combined_*.txt` files are written into.
    pub output_dir: PathBuf,
}

impl AggregateConfig {
    pub fn trace_loaded(&self) {
        info!(
            input_dir = %self.input_dir.display(),
            output_dir = %self.output_dir.display(),
            "Loaded AggregateConfig"
        );
    }
}

/// Settings for a boilerplate-cleaning pass.
#[derive(Debug, Clone)]
pub struct CleanConfig {
    pub root: PathBuf,
    pub walk: WalkOptions,
}

impl CleanConfig {
    /// Cleans `root`, leaving dependency caches, manifests and ignore files alone.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            walk: WalkOptions::new(["node_modules"], ["package.json", ".gitignore"]),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            root = %self.root.display(),
            excluded_dirs = ?self.walk.excluded_dirs,
            excluded_files = ?self.walk.excluded_files,
            "Loaded CleanConfig"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn debug_output_hides_api_key() {
        let config = CompletionConfig::new("sk-very-secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-very-secret"));
        assert!(printed.contains(DEFAULT_MODEL));
    }

    #[test]
    fn summarise_defaults_resume_and_wait_one_second() {
        let config = SummariseConfig::new("oldDocs", "newDocs");
        assert!(config.skip_existing);
        assert_eq!(config.delay, Duration::from_secs(1));
        assert_eq!(config.template, Conversation::summary_template());
    }

    #[test]
    #[serial]
    fn from_env_reads_key_and_keeps_defaults() {
        std::env::set_var(API_KEY_ENV, "env-key");
        let config = CompletionConfig::from_env().expect("key is set");
        std::env::remove_var(API_KEY_ENV);

        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    #[serial]
    fn from_env_without_key_is_an_error() {
        std::env::remove_var(API_KEY_ENV);
        assert!(matches!(
            CompletionConfig::from_env(),
            Err(std::env::VarError::NotPresent)
        ));
    }
}
