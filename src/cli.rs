use crate::analyze::AnalyzeArgs;
use crate::config::Config;
use crate::deps::exec::DepsArgs;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repohealth")]
#[command(about = "Repository health: commit activity, dependency freshness and a maintenance score")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze commit and merge activity of a local repository
    Activity {
        #[arg(help = "Path to a local git repository")]
        repo: PathBuf,

        #[arg(long, default_value_t = 365, help = "Analysis window in days")]
        since_days: u32,

        #[arg(long, help = "Write the report as JSON to this file")]
        json_out: Option<PathBuf>,
    },
    /// Find outdated and vulnerable dependencies (requirements.txt / pyproject.toml)
    Deps {
        #[arg(default_value = ".", help = "Project path or http(s) URL to clone")]
        repo: String,

        #[arg(long, help = "Write the report as JSON to this file")]
        json_out: Option<PathBuf>,

        #[arg(long, help = "Write the package list as CSV to this file")]
        csv_out: Option<PathBuf>,

        #[arg(long, help = "Do not query the network, only parse manifests")]
        offline: bool,

        #[arg(long, help = "Refuse remote URLs instead of cloning them")]
        no_clone: bool,
    },
    /// Combined activity and dependency analysis with a maintenance score
    Analyze {
        #[arg(default_value = ".", help = "Project path or http(s) URL to clone")]
        repo: String,

        #[arg(long, default_value_t = 365, help = "Activity window in days")]
        since_days: u32,

        #[arg(long, help = "Write the report as JSON to this file")]
        json_out: Option<PathBuf>,

        #[arg(long, help = "Do not query the network, only parse manifests")]
        offline: bool,

        #[arg(long, help = "Refuse remote URLs instead of cloning them")]
        no_clone: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let config = Config::load(self.common.config.as_deref()).context("Failed to load config")?;

        match self.command {
            Commands::Activity { repo, since_days, json_out } => {
                crate::activity::exec(&repo, since_days, json_out.as_deref())
            }
            Commands::Deps { repo, json_out, csv_out, offline, no_clone } => crate::deps::exec::exec(
                &config,
                DepsArgs {
                    repo: &repo,
                    json_out: json_out.as_deref(),
                    csv_out: csv_out.as_deref(),
                    offline,
                    auto_clone: !no_clone,
                },
            ),
            Commands::Analyze { repo, since_days, json_out, offline, no_clone } => crate::analyze::exec(
                &config,
                AnalyzeArgs {
                    repo: &repo,
                    since_days,
                    json_out: json_out.as_deref(),
                    offline,
                    auto_clone: !no_clone,
                },
            ),
        }
    }
}
