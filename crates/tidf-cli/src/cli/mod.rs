//! CLI for the TIDF feed puller.

mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tidf_core::config::{self, TidfConfig};
use tidf_core::feed::parse_date;
use tidf_core::settings::Overrides;

use commands::{run_completions, run_list, run_pull};

/// Configuration or startup failure.
pub const EXIT_ERROR: i32 = 1;
/// The run finished but at least one feed failed.
pub const EXIT_PARTIAL_FAILURE: i32 = 2;

/// Top-level CLI for downloading daily Threat Intelligence Data Feed files.
#[derive(Debug, Parser)]
#[command(name = "tidf")]
#[command(about = "Download daily Threat Intelligence Data Feed files", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/tidf/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download yesterday's feed files (all at once).
    Pull {
        #[command(flatten)]
        feeds: FeedArgs,

        /// Exit 0 even if some feeds failed.
        #[arg(long)]
        always_succeed: bool,

        /// Disable coloured output.
        #[arg(long)]
        no_color: bool,
    },

    /// Show the URLs and local paths a pull would use, without downloading.
    List {
        #[command(flatten)]
        feeds: FeedArgs,
    },

    /// Print a shell completion script to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

/// Options shared by `pull` and `list`; each overrides the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct FeedArgs {
    /// Directory to write the feed files to.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Feed date (YYYY-MM-DD). Defaults to yesterday (UTC).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    /// Feed identifier to fetch; repeat to fetch several. Replaces the configured list.
    #[arg(long = "feed", value_name = "ID")]
    pub feeds: Vec<String>,

    /// Base URL of the feed files.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

impl FeedArgs {
    pub fn overrides(&self, always_succeed: bool) -> Result<Overrides> {
        let date = self
            .date
            .as_deref()
            .map(|d| {
                parse_date(d)
                    .with_context(|| format!("invalid --date {:?}, expected YYYY-MM-DD", d))
            })
            .transpose()?;
        Ok(Overrides {
            download_dir: self.dir.clone(),
            base_url: self.base_url.clone(),
            feeds: self.feeds.clone(),
            date,
            always_succeed,
        })
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<TidfConfig> {
    let cfg = match path {
        Some(p) => config::load_from(p)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl Cli {
    /// Parses arguments and runs the command. Returns the process exit code.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Pull {
                feeds,
                always_succeed,
                no_color,
            } => {
                let cfg = load_config(cli.config.as_deref())?;
                run_pull(&cfg, &feeds.overrides(always_succeed)?, no_color).await
            }
            CliCommand::List { feeds } => {
                let cfg = load_config(cli.config.as_deref())?;
                run_list(&cfg, &feeds.overrides(false)?)?;
                Ok(0)
            }
            CliCommand::Completions { shell } => {
                run_completions(shell);
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests;
