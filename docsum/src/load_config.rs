/// `load_config` module: turns a static YAML file plus environment secrets into the
/// explicit [`RunConfig`] the summarisation pipeline is built from.
///
/// # Responsibilities
/// - Parse the user-supplied YAML into intermediate, loosely-typed sections
/// - Fill in defaults (resume on, one-second delay, built-in prompt, fixed endpoint/model)
/// - Read the API credential from `CEREBRAS_API_KEY`; secrets never live in the YAML
/// - Load an external conversation template when one is named
///
/// # Errors
/// Everything surfaces as `anyhow::Error` at the CLI boundary with a message naming
/// the file or variable involved.
use anyhow::{Context, Result};
use docsum_core::config::{CompletionConfig, SummariseConfig, API_KEY_ENV};
use docsum_core::conversation::Conversation;
use docsum_core::walker::WalkOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

/// Everything `docsum summarise` needs.
#[derive(Debug)]
pub struct RunConfig {
    pub summarise: SummariseConfig,
    pub completion: CompletionConfig,
}

#[derive(Deserialize)]
struct StaticConfig {
    summarise: SummariseSection,
    #[serde(default)]
    completion: CompletionSection,
}

#[derive(Deserialize)]
struct SummariseSection {
    source_dir: PathBuf,
    output_dir: PathBuf,
    #[serde(default = "default_skip_existing")]
    skip_existing: bool,
    #[serde(default = "default_delay_ms")]
    delay_ms: u64,
    #[serde(default)]
    template: Option<PathBuf>,
    #[serde(default)]
    exclude_dirs: Vec<String>,
}

#[derive(Deserialize, Default)]
struct CompletionSection {
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

fn default_skip_existing() -> bool {
    true
}

fn default_delay_ms() -> u64 {
    1000
}

/// Loads a static YAML config file (no secrets) and injects the API key from the environment.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let mut completion = CompletionConfig::from_env()
        .with_context(|| format!("{API_KEY_ENV} environment variable not set"))?;
    if let Some(endpoint) = static_conf.completion.endpoint {
        completion.endpoint = endpoint;
    }
    if let Some(model) = static_conf.completion.model {
        completion.model = model;
    }

    let section = static_conf.summarise;
    let template = match &section.template {
        Some(template_path) => Conversation::from_template_file(template_path)
            .with_context(|| format!("Failed to load template {}", template_path.display()))?,
        None => Conversation::summary_template(),
    };

    let summarise = SummariseConfig {
        source_dir: section.source_dir,
        output_dir: section.output_dir,
        skip_existing: section.skip_existing,
        delay: Duration::from_millis(section.delay_ms),
        template,
        walk: WalkOptions::new(section.exclude_dirs, Vec::<String>::new()),
    };

    summarise.trace_loaded();
    completion.trace_loaded();
    info!("Config loaded and merged successfully");

    Ok(RunConfig {
        summarise,
        completion,
    })
}
