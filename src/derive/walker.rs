//! Walks `props.conf` and dispatches each setting to the right extractor.

use tracing::trace;

use super::expand::expand_pattern;
use super::extract::{alias_sources, lookup_inputs, regex_captures};
use super::param::{direct_id, Classification, ConcreteStanza, TestParameter, SOURCE_PREFIX};
use super::resolve::Resolver;
use crate::conf::{parser::DEFAULT_SECTION, ConfFile, Section, Setting};

/// Stanza name prefixes that never describe searchable data.
const EXCLUDED_PREFIXES: [&str; 3] = ["host::", "rule::", "delayedrule::"];

/// How a `props.conf` stanza is treated, decided purely from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StanzaClass {
    /// Keyed directly by a sourcetype name.
    Type,
    /// `source::` pattern naming one or more concrete sources.
    PatternAlternate,
    Excluded,
}

pub fn classify(name: &str) -> StanzaClass {
    if name == DEFAULT_SECTION || EXCLUDED_PREFIXES.iter().any(|p| name.starts_with(p)) {
        StanzaClass::Excluded
    } else if name.starts_with(SOURCE_PREFIX) {
        StanzaClass::PatternAlternate
    } else {
        StanzaClass::Type
    }
}

/// Expands one section into the concrete stanzas it stands for.
pub fn concrete_stanzas(section: &Section) -> Box<dyn Iterator<Item = ConcreteStanza>> {
    let name = section.name();
    match classify(name) {
        StanzaClass::Excluded => Box::new(std::iter::empty()),
        StanzaClass::Type => Box::new(std::iter::once(ConcreteStanza::new(
            Classification::Sourcetype,
            name,
        ))),
        StanzaClass::PatternAlternate => {
            let template = &name[SOURCE_PREFIX.len()..];
            Box::new(expand_pattern(template).map(|source| {
                ConcreteStanza::new(Classification::Source, format!("{SOURCE_PREFIX}{source}"))
            }))
        }
    }
}

/// Setting families the walker recognizes, by name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    /// `REPORT-`: cross-reference into transforms.
    Report,
    Extract,
    FieldAlias,
    Lookup,
    /// Exact `sourcetype`: assigns a sourcetype to matching sources.
    SourcetypeAssignment,
    /// `EVAL-`: recognized but not dispatched yet.
    Eval,
}

pub const EVAL_PREFIX: &str = "EVAL-";

pub fn classify_setting(name: &str) -> Option<SettingKind> {
    if name == "sourcetype" {
        return Some(SettingKind::SourcetypeAssignment);
    }
    let kind = match name.split_once('-')?.0 {
        "REPORT" => SettingKind::Report,
        "EXTRACT" => SettingKind::Extract,
        "FIELDALIAS" => SettingKind::FieldAlias,
        "LOOKUP" => SettingKind::Lookup,
        "EVAL" => SettingKind::Eval,
        _ => return None,
    };
    Some(kind)
}

/// Derives test parameters from a props/transforms pair.
///
/// The walker holds nothing but borrowed configuration; every call to
/// [`Walker::walk`] recomputes the same sequence.
#[derive(Debug, Clone, Copy)]
pub struct Walker<'a> {
    props: &'a ConfFile,
    resolver: Resolver<'a>,
}

impl<'a> Walker<'a> {
    pub fn new(props: &'a ConfFile, transforms: &'a ConfFile) -> Self {
        Self {
            props,
            resolver: Resolver::new(transforms),
        }
    }

    /// Lazily yields parameters section by section, in declaration order.
    /// Duplicates are left for [`super::dedup::Dedup`].
    pub fn walk(self) -> impl Iterator<Item = TestParameter> + 'a {
        self.props.sections().flat_map(move |section| {
            concrete_stanzas(section).flat_map(move |stanza| self.stanza_params(section, &stanza))
        })
    }

    fn stanza_params(&self, section: &Section, stanza: &ConcreteStanza) -> Vec<TestParameter> {
        section
            .settings()
            .flat_map(|setting| self.setting_params(stanza, setting))
            .collect()
    }

    fn setting_params(&self, stanza: &ConcreteStanza, setting: &Setting) -> Vec<TestParameter> {
        let Some(kind) = classify_setting(&setting.name) else {
            trace!(stanza = %stanza.name, setting = %setting.name, "ignoring setting");
            return Vec::new();
        };

        let id = direct_id(&stanza.name, &setting.name);
        match kind {
            SettingKind::Report => self.resolver.resolve(stanza, setting),
            SettingKind::Extract => vec![stanza.parameter(id, regex_captures(&setting.value), None)],
            SettingKind::FieldAlias => vec![stanza.parameter(id, alias_sources(&setting.value), None)],
            SettingKind::Lookup => vec![stanza.parameter(id, lookup_inputs(&setting.value), None)],
            SettingKind::SourcetypeAssignment => vec![stanza.parameter(
                id,
                vec!["sourcetype".to_string()],
                Some(setting.value.trim().to_string()),
            )],
            // Evaluated fields need a manual test per code path; `declared_name`
            // recovers the field once this is wired in.
            SettingKind::Eval => Vec::new(),
        }
    }
}
