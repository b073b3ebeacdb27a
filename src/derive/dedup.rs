//! First-seen-wins deduplication by parameter id, and hand-off to a registry.

use std::collections::HashSet;

use tracing::debug;

use super::param::TestParameter;
use crate::fixtures::FixtureRegistry;

/// Iterator adapter dropping every parameter whose id was already yielded.
#[derive(Debug)]
pub struct Dedup<I> {
    inner: I,
    seen: HashSet<String>,
}

impl<I> Iterator for Dedup<I>
where
    I: Iterator<Item = TestParameter>,
{
    type Item = TestParameter;

    fn next(&mut self) -> Option<TestParameter> {
        for param in self.inner.by_ref() {
            if self.seen.insert(param.id.clone()) {
                return Some(param);
            }
            debug!(id = %param.id, "dropping duplicate parameter");
        }
        None
    }
}

pub trait DedupExt: Iterator<Item = TestParameter> + Sized {
    fn dedup_by_id(self) -> Dedup<Self> {
        Dedup {
            inner: self,
            seen: HashSet::new(),
        }
    }
}

impl<I: Iterator<Item = TestParameter>> DedupExt for I {}

/// Deduplicates `params` and registers the result under `fixture`.
pub fn emit<R>(registry: &mut R, fixture: &str, params: impl IntoIterator<Item = TestParameter>)
where
    R: FixtureRegistry + ?Sized,
{
    let params: Vec<_> = params.into_iter().dedup_by_id().collect();
    debug!(fixture, count = params.len(), "registering parameters");
    registry.register(fixture, params);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::param::{Classification, ConcreteStanza};
    use crate::fixtures::CollectedFixtures;

    fn param(id: &str, field: &str) -> TestParameter {
        ConcreteStanza::new(Classification::Sourcetype, "alpha").parameter(
            id.to_string(),
            vec![field.to_string()],
            None,
        )
    }

    #[test]
    fn first_occurrence_wins() {
        let input = vec![param("X", "first"), param("X", "second"), param("Y", "y")];
        let out: Vec<_> = input.into_iter().dedup_by_id().collect();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "X");
        assert_eq!(out[0].payload.fields, vec!["first"]);
        assert_eq!(out[1].id, "Y");
    }

    #[test]
    fn emit_registers_deduplicated_sequence() {
        let mut registry = CollectedFixtures::default();
        emit(
            &mut registry,
            "prop_elements",
            vec![param("A", "a"), param("B", "b"), param("A", "c")],
        );
        let ids: Vec<_> = registry
            .get("prop_elements")
            .unwrap()
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "B"]);
    }
}
