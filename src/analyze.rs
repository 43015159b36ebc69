use crate::activity::analyze_activity;
use crate::config::Config;
use crate::deps::{analyze_dependencies, Registries};
use crate::export::export_json;
use crate::git::RepoSource;
use crate::model::AnalysisReport;
use crate::score::maintenance_score;
use anyhow::Context;
use chrono::Utc;
use std::path::Path;
use tracing::info;

pub struct AnalyzeArgs<'a> {
    pub repo: &'a str,
    pub since_days: u32,
    pub json_out: Option<&'a Path>,
    pub offline: bool,
    pub auto_clone: bool,
}

pub fn exec(config: &Config, args: AnalyzeArgs<'_>) -> anyhow::Result<()> {
    let now = Utc::now();
    let source = RepoSource::resolve(args.repo, args.auto_clone)
        .with_context(|| format!("Failed to prepare {}", args.repo))?;
    let registries =
        Registries::from_config(&config.registry).context("Failed to set up registry clients")?;

    info!("Analyzing {}", source.label());
    let activity = analyze_activity(source.path(), args.since_days, now)
        .with_context(|| format!("Failed to analyze activity of {}", source.label()))?;
    let dependencies = analyze_dependencies(source.path(), args.offline, &registries)
        .context("Failed to analyze dependencies")?;

    let report = AnalysisReport {
        maintenance_score: maintenance_score(&activity, &dependencies),
        activity,
        dependencies,
    };

    if let Some(path) = args.json_out {
        export_json(&report, path).context("Failed to write JSON output")?;
        println!("JSON saved to {}", path.display());
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
