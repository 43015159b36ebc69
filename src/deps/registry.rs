use super::version::{compare_versions, is_prerelease};
use crate::config::RegistryConfig;
use crate::error::{HealthError, Result};
use crate::model::Vulnerability;
use serde_json::{json, Value};
use tracing::debug;

/// Source of the newest published version of a package.
pub trait PackageIndex {
    fn latest_version(&self, name: &str) -> Result<Option<String>>;
}

/// Source of known vulnerabilities for a pinned package version.
pub trait VulnerabilityFeed {
    fn vulnerabilities(&self, name: &str, version: Option<&str>) -> Result<Vec<Vulnerability>>;
}

/// The two lookup services used by one dependency run.
pub struct Registries {
    pub index: Box<dyn PackageIndex>,
    pub feed: Box<dyn VulnerabilityFeed>,
}

impl Registries {
    pub fn new(index: Box<dyn PackageIndex>, feed: Box<dyn VulnerabilityFeed>) -> Self {
        Self { index, feed }
    }

    /// PyPI and OSV clients sharing one HTTP agent.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout()?)
            .user_agent(&config.user_agent)
            .build();
        Ok(Self::new(
            Box::new(PypiClient::new(agent.clone(), &config.pypi_url)),
            Box::new(OsvClient::new(agent, &config.osv_url)),
        ))
    }
}

pub struct PypiClient {
    agent: ureq::Agent,
    base_url: String,
}

impl PypiClient {
    pub fn new(agent: ureq::Agent, base_url: &str) -> Self {
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl PackageIndex for PypiClient {
    fn latest_version(&self, name: &str) -> Result<Option<String>> {
        let url = format!("{}/{}/json", self.base_url, name);
        match self.agent.get(&url).call() {
            Ok(resp) => {
                let doc: Value = resp.into_json()?;
                if !doc.is_object() {
                    return Err(HealthError::Registry(format!(
                        "unexpected index document for {name}"
                    )));
                }
                Ok(latest_from_index_document(&doc))
            }
            Err(ureq::Error::Status(code, _)) => {
                debug!("{} answered {} for {}", self.base_url, code, name);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// `info.version` of a PyPI JSON document, or else the highest release key
/// that is not a pre-release.
pub fn latest_from_index_document(doc: &Value) -> Option<String> {
    if let Some(version) = doc
        .pointer("/info/version")
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
    {
        return Some(version.to_string());
    }
    doc.get("releases")
        .and_then(Value::as_object)?
        .keys()
        .filter(|v| !is_prerelease(v))
        .max_by(|a, b| compare_versions(a, b))
        .cloned()
}

pub struct OsvClient {
    agent: ureq::Agent,
    url: String,
}

impl OsvClient {
    pub fn new(agent: ureq::Agent, url: &str) -> Self {
        Self {
            agent,
            url: url.to_string(),
        }
    }
}

impl VulnerabilityFeed for OsvClient {
    fn vulnerabilities(&self, name: &str, version: Option<&str>) -> Result<Vec<Vulnerability>> {
        let Some(version) = version else {
            return Ok(Vec::new());
        };
        let payload = json!({
            "package": { "name": name, "ecosystem": "PyPI" },
            "version": version,
        });
        match self.agent.post(&self.url).send_json(payload) {
            Ok(resp) => {
                let doc: Value = resp.into_json()?;
                Ok(vulnerabilities_from_response(&doc))
            }
            Err(ureq::Error::Status(code, _)) => {
                debug!("{} answered {} for {}=={}", self.url, code, name, version);
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Entries of `vulns` (or `vulnerabilities`) that carry at least an id.
pub fn vulnerabilities_from_response(doc: &Value) -> Vec<Vulnerability> {
    let entries = doc
        .get("vulns")
        .or_else(|| doc.get("vulnerabilities"))
        .and_then(Value::as_array);
    entries
        .map(|list| {
            list.iter()
                .filter_map(|v| serde_json::from_value::<Vulnerability>(v.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
