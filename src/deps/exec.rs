use super::{analyze_dependencies, Registries};
use crate::config::Config;
use crate::export::{export_csv, export_json, to_rows};
use crate::git::RepoSource;
use anyhow::Context;
use std::path::Path;
use tracing::info;

pub struct DepsArgs<'a> {
    pub repo: &'a str,
    pub json_out: Option<&'a Path>,
    pub csv_out: Option<&'a Path>,
    pub offline: bool,
    pub auto_clone: bool,
}

pub fn exec(config: &Config, args: DepsArgs<'_>) -> anyhow::Result<()> {
    let source = RepoSource::resolve(args.repo, args.auto_clone)
        .with_context(|| format!("Failed to prepare {}", args.repo))?;
    let registries =
        Registries::from_config(&config.registry).context("Failed to set up registry clients")?;

    info!("Analyzing dependencies of {}", source.label());
    let report = analyze_dependencies(source.path(), args.offline, &registries)
        .context("Failed to analyze dependencies")?;

    if let Some(path) = args.json_out {
        export_json(&report, path).context("Failed to write JSON output")?;
        println!("JSON saved to {}", path.display());
    }
    if let Some(path) = args.csv_out {
        let rows = to_rows(&report.packages)?;
        export_csv(&rows, path).context("Failed to write CSV output")?;
        println!("CSV saved to {}", path.display());
    }
    if args.json_out.is_none() && args.csv_out.is_none() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
