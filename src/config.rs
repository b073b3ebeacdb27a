//! Probe configuration.
//!
//! Values come from an optional YAML file and are then overridden by
//! command-line flags. Every field has a default, so an empty file (or none
//! at all) is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostics::{to_error_source, ProbeError, Span};
use crate::{err_msg, err_src};

/// How patiently a query is retried before it counts as a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPolicy {
    /// Seconds between attempts.
    pub interval: u64,
    pub retries: u32,
}

impl SearchPolicy {
    pub const fn new(interval: u64, retries: u32) -> Self {
        Self { interval, retries }
    }
}

/// Retry policies per probe kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPolicies {
    /// Field probes wait for search-time extraction to settle.
    pub fields: SearchPolicy,
    /// Sourcetype, eventtype and internal-error probes.
    pub basic: SearchPolicy,
}

impl Default for SearchPolicies {
    fn default() -> Self {
        Self {
            fields: SearchPolicy::new(2, 5),
            basic: SearchPolicy::new(1, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// Path to the add-on package.
    pub splunk_app: PathBuf,
    pub splunk_host: String,
    /// Management (REST) port.
    pub splunk_port: u16,
    pub splunk_user: String,
    pub splunk_password: String,
    pub search: SearchPolicies,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            splunk_app: PathBuf::from("package"),
            splunk_host: "127.0.0.1".to_string(),
            splunk_port: 8089,
            splunk_user: "admin".to_string(),
            splunk_password: "changeme".to_string(),
            search: SearchPolicies::default(),
        }
    }
}

impl ProbeConfig {
    pub fn load(path: &Path) -> Result<Self, ProbeError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            err_msg!(Io, "Failed to read config '{}'", path.display()).with_cause(e)
        })?;
        Self::from_yaml(&path.display().to_string(), &text)
    }

    /// Parses YAML; an empty document yields the defaults.
    pub fn from_yaml(name: &str, text: &str) -> Result<Self, ProbeError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| {
            let source = to_error_source(name, text);
            let offset = e.location().map(|l| l.index()).unwrap_or(0);
            err_src!(Config, e.to_string(), &source, Span { start: offset, end: offset })
        })
    }

    pub fn to_yaml(&self) -> Result<String, ProbeError> {
        serde_yaml::to_string(self)
            .map_err(|e| err_msg!(Internal, "Failed to serialize configuration").with_cause(e))
    }
}
