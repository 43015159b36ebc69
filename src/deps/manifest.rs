use crate::error::Result;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use toml::{Table, Value};

/// One declared dependency, with its `==` pin if there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub version: Option<String>,
}

fn requirement_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z0-9_.\-]+)\s*(?:==\s*([A-Za-z0-9!+_.\-]+))?.*$")
            .expect("requirement pattern is valid")
    })
}

pub fn parse_requirement_line(line: &str) -> Option<Requirement> {
    let caps = requirement_regex().captures(line)?;
    Some(Requirement {
        name: caps.get(1)?.as_str().to_string(),
        version: caps.get(2).map(|m| m.as_str().to_string()),
    })
}

/// Entries of a `requirements.txt`. A missing file has no entries.
pub fn parse_requirements(path: &Path) -> Result<Vec<Requirement>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_requirement_line)
        .collect())
}

/// PEP 621 `project.dependencies` followed by `tool.poetry.dependencies`.
pub fn parse_pyproject(path: &Path) -> Result<Vec<Requirement>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)?;
    let doc: Table = toml::from_str(&text)?;

    let mut lines: Vec<String> = Vec::new();

    if let Some(deps) = doc
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(Value::as_array)
    {
        lines.extend(deps.iter().filter_map(Value::as_str).map(str::to_string));
    }

    if let Some(poetry) = doc
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(Value::as_table)
    {
        for (name, spec) in poetry {
            if name.eq_ignore_ascii_case("python") {
                continue;
            }
            let constraint = match spec {
                Value::String(s) => Some(s.as_str()),
                Value::Table(t) => t.get("version").and_then(Value::as_str),
                _ => None,
            };
            if let Some(constraint) = constraint {
                lines.push(poetry_line(name, constraint));
            }
        }
    }

    Ok(lines
        .iter()
        .filter_map(|l| parse_requirement_line(l))
        .collect())
}

/// Poetry writes bare versions (`"2.31.0"`) for exact pins and operators
/// (`"^2.0"`, `">=1"`) for ranges; only the former counts as a pin.
fn poetry_line(name: &str, constraint: &str) -> String {
    let constraint = constraint.trim();
    if constraint.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{name}=={constraint}")
    } else {
        format!("{name}{constraint}")
    }
}
