//! Derives search-time regression probes from an add-on's declarative
//! configuration.
//!
//! `props.conf` and `transforms.conf` are walked into a deduplicated sequence of
//! [`TestParameter`]s, each asserting that a declared extraction, alias,
//! lookup or sourcetype assignment actually produces data. A test runner
//! consumes them through [`fixtures::FixtureRegistry`]; a live engine is
//! reached through [`search::SearchUtil`].

pub use crate::diagnostics::{ErrorContext, ErrorType, ProbeError, Span};
pub use crate::derive::{derive_parameters, Classification, Payload, TestParameter};

pub mod cli;
pub mod conf;
pub mod config;
pub mod derive;
pub mod diagnostics;
pub mod fixtures;
pub mod package;
pub mod search;
