///
/// This module implements the CLI interface for docsum: command parsing,
/// argument defaults and the user-visible output of each subcommand.
///
/// All pipelines (walking, cleaning, summarising, aggregating) live in the
/// [`docsum-core`] crate; this module only wires configuration into them.
///
/// ## How To Use
/// - For command-line users: run the installed `docsum` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`docsum-core`]: ../../docsum-core/
use crate::load_config::load_config;
use anyhow::Result;
use clap::{Parser, Subcommand};
use docsum_core::aggregate::aggregate;
use docsum_core::cleaner::clean_tree;
use docsum_core::completion::CompletionClient;
use docsum_core::config::{AggregateConfig, CleanConfig};
use docsum_core::summarise::summarise;
use std::path::PathBuf;

/// CLI for docsum: clean, summarise and combine documentation trees.
#[derive(Parser)]
#[clap(
    name = "docsum",
    version,
    about = "Clean a documentation tree, summarise each file with an LLM, and combine the summaries"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarise every file under the configured source directory
    Summarise {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Combine a tree of summaries into combined_*.txt files
    Aggregate {
        /// Directory holding the summaries
        #[clap(long, default_value = "newDocs")]
        input_dir: PathBuf,
        /// Directory to write the combined files into
        #[clap(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Strip page boilerplate from every file under a directory, in place
    Clean {
        #[clap(long, default_value = ".")]
        root: PathBuf,
    },
}

/// Async CLI entrypoint shared by main() and integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Summarise { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "summarise", "Starting summarisation");
            let client = CompletionClient::new(config.completion)?;
            match summarise(&config.summarise, &client).await {
                Ok(report) => {
                    tracing::info!(command = "summarise", ?report, "Summarisation complete");
                    println!(
                        "Summarised {} files, skipped {} already done.",
                        report.summarised.len(),
                        report.skipped.len()
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "summarise", error = %e, "Summarisation failed");
                    Err(e.into())
                }
            }
        }
        Commands::Aggregate {
            input_dir,
            output_dir,
        } => {
            let config = AggregateConfig {
                input_dir,
                output_dir,
            };
            config.trace_loaded();
            let report = aggregate(&config)?;
            tracing::info!(command = "aggregate", ?report, "Aggregation complete");
            println!("Successfully combined all documents");
            Ok(())
        }
        Commands::Clean { root } => {
            let config = CleanConfig::new(root);
            config.trace_loaded();
            let report = clean_tree(&config)?;
            println!(
                "Cleaned {} of {} files.",
                report.cleaned.len(),
                report.scanned
            );
            Ok(())
        }
    }
}
