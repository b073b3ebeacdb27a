//! Stanza/key/value configuration model.
//!
//! This is the narrow interface the derivation engine reads: a [`ConfFile`] is an
//! ordered collection of [`Section`]s, each an ordered collection of raw
//! [`Setting`]s. Nothing here interprets values; escaping, layering and
//! inheritance are left to whoever produced the file.

use std::collections::HashMap;

pub mod parser;

pub use parser::{parse_conf, read_conf};

/// A single `key = value` line, exactly as declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub name: String,
    pub value: String,
}

/// A named `[stanza]` and its settings in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    settings: Vec<Setting>,
    index: HashMap<String, usize>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builder-style helper, mostly for tests and embedders.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores a setting. Redeclaring a name replaces its value but keeps the
    /// position of the first declaration.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.index.get(&name) {
            Some(&slot) => self.settings[slot].value = value,
            None => {
                self.index.insert(name.clone(), self.settings.len());
                self.settings.push(Setting { name, value });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Setting> {
        self.index.get(name).map(|&slot| &self.settings[slot])
    }

    /// The raw value of `name`, if declared.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|s| s.value.as_str())
    }

    pub fn settings(&self) -> impl Iterator<Item = &Setting> {
        self.settings.iter()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

/// An ordered mapping from stanza name to [`Section`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfFile {
    name: String,
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl ConfFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.insert(section);
        self
    }

    /// The file name this configuration was read from (e.g. `props.conf`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a section. A section whose name was already declared is merged into
    /// the earlier one.
    pub fn insert(&mut self, section: Section) {
        match self.index.get(section.name()) {
            Some(&slot) => {
                let existing = &mut self.sections[slot];
                for setting in section.settings {
                    existing.set(setting.name, setting.value);
                }
            }
            None => {
                self.index
                    .insert(section.name.clone(), self.sections.len());
                self.sections.push(section);
            }
        }
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.index.get(name).map(|&slot| &self.sections[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeclared_setting_keeps_first_position() {
        let section = Section::new("alpha")
            .with("EXTRACT-a", "one")
            .with("REPORT-b", "two")
            .with("EXTRACT-a", "three");
        let names: Vec<_> = section.settings().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["EXTRACT-a", "REPORT-b"]);
        assert_eq!(section.value("EXTRACT-a"), Some("three"));
    }

    #[test]
    fn duplicate_sections_merge_into_first() {
        let conf = ConfFile::new("props.conf")
            .with_section(Section::new("alpha").with("a", "1"))
            .with_section(Section::new("beta"))
            .with_section(Section::new("alpha").with("b", "2"));
        assert_eq!(conf.len(), 2);
        let alpha = conf.section("alpha").unwrap();
        assert_eq!(alpha.value("a"), Some("1"));
        assert_eq!(alpha.value("b"), Some("2"));
        let order: Vec<_> = conf.sections().map(Section::name).collect();
        assert_eq!(order, vec!["alpha", "beta"]);
    }
}
