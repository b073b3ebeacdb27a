//! Shared helpers for integration tests.

use std::path::PathBuf;

use stanza_probe::package::AddonPackage;
use stanza_probe::TestParameter;

/// Root of the demo add-on shipped with the tests.
pub fn demo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/TA-demo")
}

pub fn demo_package() -> AddonPackage {
    AddonPackage::open(demo_root()).expect("demo package should load")
}

pub fn ids(params: &[TestParameter]) -> Vec<&str> {
    params.iter().map(|p| p.id.as_str()).collect()
}
