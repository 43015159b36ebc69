//! Repository health signals: commit activity mined from git history and
//! dependency freshness mined from Python manifests plus PyPI and OSV.

pub mod activity;
pub mod analyze;
pub mod cli;
pub mod config;
pub mod deps;
pub mod error;
pub mod export;
pub mod git;
pub mod model;
pub mod score;

pub use activity::aggregate;
pub use deps::analyze_dependencies;
pub use error::{HealthError, Result};
pub use model::{ActivityReport, CommitRecord, DependencyReport};
