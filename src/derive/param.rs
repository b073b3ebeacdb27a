//! The unit of output: a stably identified test parameter.

use serde::{Deserialize, Serialize};

/// Prefix marking a source-pattern stanza in `props.conf`.
pub const SOURCE_PREFIX: &str = "source::";

/// Which search key a parameter asserts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Sourcetype,
    Source,
    Eventtype,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Sourcetype => "sourcetype",
            Classification::Source => "source",
            Classification::Eventtype => "eventtype",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a parameter asserts: a stanza plus the fields (or literal value) it
/// should populate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub classification: Classification,
    /// Concrete stanza name, `source::` prefix included for source stanzas.
    pub stanza: String,
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Payload {
    /// The value searched for under [`Payload::classification`].
    pub fn search_target(&self) -> &str {
        match self.classification {
            Classification::Source => self
                .stanza
                .strip_prefix(SOURCE_PREFIX)
                .unwrap_or(&self.stanza),
            _ => &self.stanza,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestParameter {
    pub id: String,
    pub payload: Payload,
}

/// A stanza after classification and pattern expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteStanza {
    pub classification: Classification,
    pub name: String,
}

impl ConcreteStanza {
    pub fn new(classification: Classification, name: impl Into<String>) -> Self {
        Self {
            classification,
            name: name.into(),
        }
    }

    pub fn parameter(&self, id: String, fields: Vec<String>, value: Option<String>) -> TestParameter {
        TestParameter {
            id,
            payload: Payload {
                classification: self.classification,
                stanza: self.name.clone(),
                fields,
                value,
            },
        }
    }
}

// Identifiers are plain `::` joins so they stay readable in test reports and
// can be referenced from dependency markers.

pub fn direct_id(stanza: &str, setting: &str) -> String {
    format!("{stanza}::{setting}")
}

pub fn granular_id(stanza: &str, section: &str, property: &str) -> String {
    format!("{stanza}::{section}::{property}")
}

pub fn aggregate_id(stanza: &str, setting: &str, section: &str) -> String {
    format!("{stanza}::{setting}::{section}")
}
