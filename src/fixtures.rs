//! Named fixtures and the registration capability they are handed to.
//!
//! A test runner asks for fixtures by name; [`generate`] derives the
//! parameters for each requested one and registers them.

use std::str::FromStr;

use tracing::debug;

use crate::conf::parser::DEFAULT_SECTION;
use crate::derive::{
    classify, emit, walker::concrete_stanzas, Classification, ConcreteStanza, DedupExt,
    StanzaClass, TestParameter, Walker,
};
use crate::diagnostics::ProbeError;
use crate::err_msg;
use crate::package::AddonPackage;

/// Receives a fixture's final, deduplicated parameter list.
pub trait FixtureRegistry {
    fn register(&mut self, fixture: &str, params: Vec<TestParameter>);
}

/// In-memory registry that keeps fixtures in registration order.
#[derive(Debug, Default)]
pub struct CollectedFixtures {
    fixtures: Vec<(String, Vec<TestParameter>)>,
}

impl CollectedFixtures {
    pub fn get(&self, fixture: &str) -> Option<&[TestParameter]> {
        self.fixtures
            .iter()
            .find(|(name, _)| name == fixture)
            .map(|(_, params)| params.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TestParameter])> {
        self.fixtures
            .iter()
            .map(|(name, params)| (name.as_str(), params.as_slice()))
    }

    pub fn into_inner(self) -> Vec<(String, Vec<TestParameter>)> {
        self.fixtures
    }
}

impl FixtureRegistry for CollectedFixtures {
    fn register(&mut self, fixture: &str, params: Vec<TestParameter>) {
        self.fixtures.push((fixture.to_string(), params));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum Fixture {
    /// Every sourcetype the package defines.
    Sourcetypes,
    /// Every eventtype in eventtypes.conf.
    Eventtypes,
    /// Fields and values derived from props/transforms.
    PropElements,
}

impl Fixture {
    pub const ALL: [Fixture; 3] = [Fixture::Sourcetypes, Fixture::Eventtypes, Fixture::PropElements];

    pub fn name(&self) -> &'static str {
        match self {
            Fixture::Sourcetypes => "sourcetypes",
            Fixture::Eventtypes => "eventtypes",
            Fixture::PropElements => "prop_elements",
        }
    }

    /// The deduplicated parameters for this fixture.
    pub fn parameters(&self, package: &AddonPackage) -> Vec<TestParameter> {
        self.raw_parameters(package).dedup_by_id().collect()
    }

    /// Parameters in derivation order, duplicates included.
    fn raw_parameters<'a>(
        &self,
        package: &'a AddonPackage,
    ) -> Box<dyn Iterator<Item = TestParameter> + 'a> {
        match self {
            Fixture::Sourcetypes => Box::new(sourcetypes(package)),
            Fixture::Eventtypes => Box::new(eventtypes(package)),
            Fixture::PropElements => {
                Box::new(Walker::new(&package.props, &package.transforms).walk())
            }
        }
    }
}

impl FromStr for Fixture {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fixture::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| err_msg!(Config, "Unknown fixture '{}'", s))
    }
}

impl std::fmt::Display for Fixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Registers parameters for each requested fixture name the package knows.
/// Names that are not fixtures (ordinary test arguments) are ignored.
pub fn generate<R>(requested: &[&str], package: &AddonPackage, registry: &mut R)
where
    R: FixtureRegistry + ?Sized,
{
    for name in requested {
        let Ok(fixture) = name.parse::<Fixture>() else {
            debug!(name, "not a derived fixture");
            continue;
        };
        emit(registry, fixture.name(), fixture.raw_parameters(package));
    }
}

/// Sourcetypes worth probing: every props stanza except excluded ones and
/// `source::` stanzas that assign a sourcetype (those only rename data).
fn sourcetypes(package: &AddonPackage) -> impl Iterator<Item = TestParameter> + '_ {
    package
        .props
        .sections()
        .filter(|section| match classify(section.name()) {
            StanzaClass::Excluded => false,
            StanzaClass::PatternAlternate => section
                .value("sourcetype")
                .map_or(true, |v| v.trim().is_empty()),
            StanzaClass::Type => true,
        })
        .flat_map(concrete_stanzas)
        .map(|stanza| {
            let id = stanza.name.clone();
            stanza.parameter(id, Vec::new(), None)
        })
}

fn eventtypes(package: &AddonPackage) -> impl Iterator<Item = TestParameter> + '_ {
    package
        .eventtypes
        .sections()
        .filter(|section| section.name() != DEFAULT_SECTION)
        .map(|section| {
            let stanza = ConcreteStanza::new(Classification::Eventtype, section.name());
            stanza.parameter(section.name().to_string(), Vec::new(), None)
        })
}
