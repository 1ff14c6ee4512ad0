//! CLI for mediadex.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mediadex_core::config;
use mediadex_core::report::Verbosity;
use std::path::PathBuf;

use commands::{run_fetch, run_search, FetchOptions};

/// Top-level CLI for mediadex.
#[derive(Debug, Parser)]
#[command(name = "mediadex")]
#[command(
    about = "mediadex: catalog media files from HTTP directory listings and search them",
    long_about = None
)]
pub struct Cli {
    /// Print per-listing progress diagnostics.
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress normal progress output.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Catalog file to write/read (overrides `catalog_path` from config).
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Root listing URL, ending with '/' (overrides `base_url` from config).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Walk the listing tree and rebuild the catalog.
    Fetch {
        /// Only walk these top-level directories (e.g. 2019 2020).
        #[arg(long, num_args = 0.., value_name = "YEAR")]
        years: Vec<String>,
        /// Fetch up to N listings concurrently (default from config, 1 = sequential).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
        /// Skip listings that fail to load instead of aborting; writes a partial catalog.
        #[arg(long)]
        keep_going: bool,
    },

    /// Print catalog urls that contain every token.
    Search {
        /// Case-sensitive substrings; all must match.
        tokens: Vec<String>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::new(self.verbose, self.quiet)
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        tracing::debug!("parsed cli: {:?}", cli);

        let verbosity = cli.verbosity();
        let catalog_path = cli.catalog.clone().unwrap_or_else(|| cfg.catalog_path.clone());
        let base_url = cli.base_url.clone().unwrap_or_else(|| cfg.base_url.clone());
        config::validate_base_url(&base_url)?;

        match cli.command {
            CliCommand::Fetch {
                years,
                jobs,
                keep_going,
            } => {
                let opts = FetchOptions {
                    years,
                    jobs,
                    keep_going,
                };
                run_fetch(&cfg, &base_url, &catalog_path, &opts, verbosity).await?;
            }
            CliCommand::Search { tokens } => run_search(&catalog_path, &tokens).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
