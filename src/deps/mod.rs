pub mod exec;
pub mod manifest;
pub mod registry;
pub mod version;

pub use manifest::{parse_pyproject, parse_requirements, Requirement};
pub use registry::{OsvClient, PackageIndex, PypiClient, Registries, VulnerabilityFeed};
pub use version::is_outdated;

use crate::error::{HealthError, Result};
use crate::model::{DependencyReport, DependencySummary, PackageInfo};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

pub const REQUIREMENTS_FILE: &str = "requirements.txt";
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Collect the declared dependencies of `project` and, unless `offline`,
/// look each one up in the package index and the vulnerability feed.
///
/// A failed lookup only blanks that package's `latest_version` or
/// `vulnerabilities`; it never fails the report.
pub fn analyze_dependencies(
    project: &Path,
    offline: bool,
    registries: &Registries,
) -> Result<DependencyReport> {
    let requirements_path = project.join(REQUIREMENTS_FILE);
    let pyproject_path = project.join(PYPROJECT_FILE);

    if !requirements_path.exists() && !pyproject_path.exists() {
        let message = format!(
            "no {REQUIREMENTS_FILE} or {PYPROJECT_FILE} found in {}",
            project.display()
        );
        warn!("{}", message);
        return Ok(DependencyReport {
            summary: DependencySummary::default(),
            packages: Vec::new(),
            warning: Some(message),
        });
    }

    let mut warning = None;
    let from_requirements = parse_requirements(&requirements_path)?;
    let from_pyproject = match parse_pyproject(&pyproject_path) {
        Ok(pkgs) => pkgs,
        Err(HealthError::Manifest(e)) => {
            let message = format!("skipped unparsable {}: {e}", pyproject_path.display());
            warn!("{}", message);
            warning = Some(message);
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let merged = merge_requirements(from_requirements, from_pyproject);
    info!("Found {} declared dependencies", merged.len());

    let packages: Vec<PackageInfo> = if offline {
        merged.into_iter().map(offline_package).collect()
    } else {
        let pb = ProgressBar::new(merged.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        let packages = merged
            .into_iter()
            .map(|req| {
                pb.set_message(req.name.clone());
                let pkg = lookup_package(req, registries);
                pb.inc(1);
                pkg
            })
            .collect();
        pb.finish_and_clear();
        packages
    };

    Ok(DependencyReport {
        summary: DependencySummary::from_packages(&packages),
        packages,
        warning,
    })
}

/// One entry per lower-cased name, ordered by that name; later lists win.
fn merge_requirements(
    from_requirements: Vec<Requirement>,
    from_pyproject: Vec<Requirement>,
) -> Vec<Requirement> {
    let mut by_name: BTreeMap<String, Requirement> = BTreeMap::new();
    for req in from_requirements.into_iter().chain(from_pyproject) {
        by_name.insert(req.name.to_lowercase(), req);
    }
    by_name.into_values().collect()
}

fn offline_package(req: Requirement) -> PackageInfo {
    PackageInfo {
        name: req.name,
        current_version: req.version,
        latest_version: None,
        is_outdated: false,
        vulnerabilities: Vec::new(),
    }
}

fn lookup_package(req: Requirement, registries: &Registries) -> PackageInfo {
    let latest_version = registries
        .index
        .latest_version(&req.name)
        .unwrap_or_else(|e| {
            warn!(package = %req.name, error = %e, "latest version lookup failed");
            None
        });

    let vulnerabilities = registries
        .feed
        .vulnerabilities(&req.name, req.version.as_deref())
        .unwrap_or_else(|e| {
            warn!(package = %req.name, error = %e, "vulnerability lookup failed");
            Vec::new()
        });

    PackageInfo {
        is_outdated: is_outdated(req.version.as_deref(), latest_version.as_deref()),
        name: req.name,
        current_version: req.version,
        latest_version,
        vulnerabilities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vulnerability;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::fs;
    use std::rc::Rc;
    use tempfile::tempdir;

    struct FakeIndex {
        latest: HashMap<&'static str, &'static str>,
        calls: Rc<Cell<usize>>,
    }

    impl PackageIndex for FakeIndex {
        fn latest_version(&self, name: &str) -> Result<Option<String>> {
            self.calls.set(self.calls.get() + 1);
            if name == "broken" {
                return Err(HealthError::Registry("connection reset".into()));
            }
            Ok(self.latest.get(name).map(|v| v.to_string()))
        }
    }

    struct FakeFeed {
        calls: Rc<Cell<usize>>,
    }

    impl VulnerabilityFeed for FakeFeed {
        fn vulnerabilities(&self, name: &str, version: Option<&str>) -> Result<Vec<Vulnerability>> {
            self.calls.set(self.calls.get() + 1);
            match (name, version) {
                ("broken", _) => Err(HealthError::Registry("timed out".into())),
                ("requests", Some("2.0.0")) => Ok(vec![Vulnerability {
                    id: "OSV-1".into(),
                    summary: Some("bad".into()),
                    severity: vec![],
                    aliases: vec![],
                    references: vec![],
                }]),
                _ => Ok(vec![]),
            }
        }
    }

    fn fake_registries() -> Registries {
        let latest = HashMap::from([("requests", "2.31.0"), ("flask", "3.0.0"), ("numpy", "1.26.4")]);
        Registries::new(
            Box::new(FakeIndex {
                latest,
                calls: Rc::default(),
            }),
            Box::new(FakeFeed { calls: Rc::default() }),
        )
    }

    #[test]
    fn offline_run_parses_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(REQUIREMENTS_FILE), "a_pkg==1.0.0\n").unwrap();

        let report = analyze_dependencies(dir.path(), true, &fake_registries()).unwrap();
        assert_eq!(report.summary.packages_total, 1);
        assert_eq!(report.packages[0].name, "a_pkg");
        assert_eq!(report.packages[0].current_version.as_deref(), Some("1.0.0"));
        assert_eq!(report.packages[0].latest_version, None);
        assert!(!report.packages[0].is_outdated);
        assert!(report.warning.is_none());
    }

    #[test]
    fn offline_run_makes_no_lookups() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(REQUIREMENTS_FILE), "requests==2.0.0\nflask\n").unwrap();

        let index_calls = Rc::new(Cell::new(0));
        let feed_calls = Rc::new(Cell::new(0));
        let registries = Registries::new(
            Box::new(FakeIndex {
                latest: HashMap::new(),
                calls: Rc::clone(&index_calls),
            }),
            Box::new(FakeFeed {
                calls: Rc::clone(&feed_calls),
            }),
        );

        let report = analyze_dependencies(dir.path(), true, &registries).unwrap();
        assert_eq!(report.summary.packages_total, 2);
        assert_eq!(index_calls.get(), 0);
        assert_eq!(feed_calls.get(), 0);

        analyze_dependencies(dir.path(), false, &registries).unwrap();
        assert_eq!(index_calls.get(), 2);
        assert_eq!(feed_calls.get(), 2);
    }

    #[test]
    fn online_run_flags_outdated_and_vulnerable() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(REQUIREMENTS_FILE),
            "requests==2.0.0\nflask==3.0.0\nunknown-pkg==0.1\n",
        )
        .unwrap();

        let report = analyze_dependencies(dir.path(), false, &fake_registries()).unwrap();
        assert_eq!(
            report.summary,
            DependencySummary {
                packages_total: 3,
                outdated_total: 1,
                vulnerable_total: 1
            }
        );
        let requests = report.packages.iter().find(|p| p.name == "requests").unwrap();
        assert!(requests.is_outdated);
        assert_eq!(requests.latest_version.as_deref(), Some("2.31.0"));
        assert_eq!(requests.vulnerabilities[0].id, "OSV-1");

        let unknown = report.packages.iter().find(|p| p.name == "unknown-pkg").unwrap();
        assert_eq!(unknown.latest_version, None);
        assert!(!unknown.is_outdated);
    }

    #[test]
    fn failing_lookup_degrades_one_package_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(REQUIREMENTS_FILE), "broken==1.0\nnumpy==1.0.0\n").unwrap();

        let report = analyze_dependencies(dir.path(), false, &fake_registries()).unwrap();
        assert_eq!(report.packages.len(), 2);

        let broken = &report.packages[0];
        assert_eq!(broken.name, "broken");
        assert_eq!(broken.latest_version, None);
        assert!(broken.vulnerabilities.is_empty());
        assert!(!broken.is_outdated);

        let numpy = &report.packages[1];
        assert_eq!(numpy.latest_version.as_deref(), Some("1.26.4"));
        assert!(numpy.is_outdated);
    }

    #[test]
    fn pyproject_wins_over_requirements_and_output_is_sorted() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(REQUIREMENTS_FILE), "Zeta==1.0\nRequests==1.0.0\n").unwrap();
        fs::write(
            dir.path().join(PYPROJECT_FILE),
            "[project]\nname = \"x\"\ndependencies = [\"requests==2.0.0\", \"alpha\"]\n",
        )
        .unwrap();

        let report = analyze_dependencies(dir.path(), true, &fake_registries()).unwrap();
        let names: Vec<&str> = report.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "requests", "Zeta"]);
        assert_eq!(report.packages[1].current_version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn no_manifest_gives_zero_summary_and_warning() {
        let dir = tempdir().unwrap();
        let report = analyze_dependencies(dir.path(), false, &fake_registries()).unwrap();
        assert_eq!(report.summary, DependencySummary::default());
        assert!(report.packages.is_empty());
        assert!(report.warning.unwrap().contains(REQUIREMENTS_FILE));
    }

    #[test]
    fn broken_pyproject_is_a_warning_not_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(REQUIREMENTS_FILE), "flask==3.0.0\n").unwrap();
        fs::write(dir.path().join(PYPROJECT_FILE), "[project\n").unwrap();

        let report = analyze_dependencies(dir.path(), true, &fake_registries()).unwrap();
        assert_eq!(report.summary.packages_total, 1);
        assert!(report.warning.is_some());
    }
}
