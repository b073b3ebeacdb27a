//! Resolution of `REPORT-` settings into `transforms.conf` sections.

use tracing::{debug, warn};

use super::extract::{comma_list, format_fields, regex_captures, source_key_field};
use super::param::{aggregate_id, granular_id, ConcreteStanza, TestParameter};
use crate::conf::{ConfFile, Setting};

type Extractor = fn(&str) -> Vec<String>;

/// Transform properties that contribute fields, in processing order.
pub const CONTRIBUTING_PROPERTIES: [(&str, Extractor); 4] = [
    ("SOURCE_KEY", source_key_field),
    ("REGEX", regex_captures),
    ("FIELDS", comma_list),
    ("FORMAT", format_fields),
];

/// Looks up referenced transforms and turns their properties into parameters.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    transforms: &'a ConfFile,
}

impl<'a> Resolver<'a> {
    pub fn new(transforms: &'a ConfFile) -> Self {
        Self { transforms }
    }

    /// Resolves every transform named in `setting`'s value.
    ///
    /// Each present transform yields one granular parameter per non-empty
    /// contributing property, followed by one aggregate parameter carrying all
    /// of them. Unknown transforms are logged and skipped.
    pub fn resolve(&self, stanza: &ConcreteStanza, setting: &Setting) -> Vec<TestParameter> {
        let mut params = Vec::new();
        for reference in comma_list(&setting.value) {
            self.resolve_reference(stanza, setting, &reference, &mut params);
        }
        params
    }

    fn resolve_reference(
        &self,
        stanza: &ConcreteStanza,
        setting: &Setting,
        reference: &str,
        params: &mut Vec<TestParameter>,
    ) {
        let Some(section) = self.transforms.section(reference) else {
            warn!(
                stanza = %stanza.name,
                setting = %setting.name,
                transform = reference,
                "referenced stanza does not exist in {}",
                self.transforms.name()
            );
            return;
        };

        let mut accumulated = Vec::new();
        for (property, extract) in CONTRIBUTING_PROPERTIES {
            let Some(value) = section.value(property).filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            let fields = extract(value);
            debug!(transform = reference, property, count = fields.len(), "extracted fields");
            accumulated.extend(fields.iter().cloned());
            params.push(stanza.parameter(granular_id(&stanza.name, reference, property), fields, None));
        }

        params.push(stanza.parameter(
            aggregate_id(&stanza.name, &setting.name, reference),
            accumulated,
            None,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::Section;
    use crate::derive::param::Classification;

    fn alpha() -> ConcreteStanza {
        ConcreteStanza::new(Classification::Sourcetype, "alpha")
    }

    fn report(value: &str) -> Setting {
        Setting {
            name: "REPORT-x".into(),
            value: value.into(),
        }
    }

    #[test]
    fn aggregate_follows_property_order() {
        let transforms = ConfFile::new("transforms.conf").with_section(
            Section::new("t1")
                .with("FIELDS", "f1, f2")
                .with("REGEX", r"(?<g1>\d+)"),
        );
        let params = Resolver::new(&transforms).resolve(&alpha(), &report("t1"));
        let ids: Vec<_> = params.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha::t1::REGEX", "alpha::t1::FIELDS", "alpha::REPORT-x::t1"]);

        let aggregate = params.last().unwrap();
        assert_eq!(aggregate.payload.fields, vec!["g1", "f1", "f2"]);
    }

    #[test]
    fn missing_reference_is_skipped() {
        let transforms = ConfFile::new("transforms.conf")
            .with_section(Section::new("t2").with("FIELDS", "x"));
        let params = Resolver::new(&transforms).resolve(&alpha(), &report("nope, t2"));
        let ids: Vec<_> = params.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha::t2::FIELDS", "alpha::REPORT-x::t2"]);
    }

    #[test]
    fn empty_properties_contribute_nothing() {
        let transforms = ConfFile::new("transforms.conf").with_section(
            Section::new("t1")
                .with("REGEX", "  ")
                .with("FORMAT", "$1::$2")
                .with("DEST_KEY", "_meta"),
        );
        let params = Resolver::new(&transforms).resolve(&alpha(), &report("t1"));
        let ids: Vec<_> = params.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha::t1::FORMAT", "alpha::REPORT-x::t1"]);
        assert!(params.iter().all(|p| p.payload.fields.is_empty()));
    }

    #[test]
    fn all_properties_contribute() {
        let transforms = ConfFile::new("transforms.conf").with_section(
            Section::new("t1")
                .with("FORMAT", "status::$1")
                .with("SOURCE_KEY", "field:uri")
                .with("REGEX", r"(?<code>\d+)")
                .with("FIELDS", "a"),
        );
        let params = Resolver::new(&transforms).resolve(&alpha(), &report("t1"));
        assert_eq!(params.len(), 5);
        assert_eq!(
            params[4].payload.fields,
            vec!["uri", "code", "a", "status"]
        );
    }
}
