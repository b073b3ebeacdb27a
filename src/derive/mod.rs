//! Configuration-to-test-parameter derivation.
//!
//! Data flows one way:
//!
//! ```text
//! props.conf ──► Walker ──► expand / extract / Resolver ──► Dedup ──► registry
//!                                      ▲
//!                       transforms.conf┘
//! ```
//!
//! Nothing in here fails: missing cross-references are logged and skipped,
//! malformed values yield empty field lists, and unknown settings are ignored.

pub mod dedup;
pub mod expand;
pub mod extract;
pub mod param;
pub mod resolve;
pub mod walker;

pub use dedup::{emit, Dedup, DedupExt};
pub use expand::expand_pattern;
pub use param::{Classification, ConcreteStanza, Payload, TestParameter};
pub use resolve::Resolver;
pub use walker::{classify, StanzaClass, Walker};

use crate::conf::ConfFile;

/// The deduplicated parameter sequence for a props/transforms pair.
pub fn derive_parameters<'a>(
    props: &'a ConfFile,
    transforms: &'a ConfFile,
) -> Dedup<impl Iterator<Item = TestParameter> + 'a> {
    Walker::new(props, transforms).walk().dedup_by_id()
}
