// CLI regression tests: commands run against the demo add-on and errors are
// rendered as miette diagnostics.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn probe() -> Command {
    let mut cmd = Command::cargo_bin("stanza-probe").unwrap();
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

#[test]
fn params_json_lists_prop_elements() {
    probe()
        .args(["params", "prop_elements", "--json", "--splunk-app", "tests/fixtures/TA-demo"])
        .assert()
        .success()
        .stdout(
            contains("\"id\": \"demo:access::REPORT-status::demo_status\"")
                .and(contains("\"classification\": \"source\","))
                .and(contains("session_id"))
                .and(contains("EVAL-action").not()),
        );
}

#[test]
fn params_text_lists_eventtypes() {
    probe()
        .args(["params", "eventtypes", "--splunk-app", "tests/fixtures/TA-demo"])
        .assert()
        .success()
        .stdout(contains("demo_login").and(contains("demo_failure")));
}

#[test]
fn params_text_reports_empty_package() {
    // tests/fixtures has no default/ directory, so every conf file loads empty.
    probe()
        .args(["params", "prop_elements", "--splunk-app", "tests/fixtures"])
        .assert()
        .success()
        .stdout(contains("No parameters derived."));
}

#[test]
fn queries_show_search_and_policy() {
    probe()
        .args(["queries", "prop_elements", "--splunk-app", "tests/fixtures/TA-demo"])
        .assert()
        .success()
        .stdout(
            contains("sourcetype=\"demo:access\"")
                .and(contains("interval=2s, retries=5"))
                .and(contains("source=\"*/demo/error.log\"")),
        );
}

#[test]
fn inspect_counts_files_and_fixtures() {
    probe()
        .args(["inspect", "--splunk-app", "tests/fixtures/TA-demo"])
        .assert()
        .success()
        .stdout(
            contains("Found 4 configuration files")
                .and(contains("props.conf"))
                .and(contains("prop_elements")),
        );
}

#[test]
fn config_merges_file_and_flags() {
    probe()
        .args(["config", "--config", "tests/fixtures/probe.yaml", "--splunk-port", "9089"])
        .assert()
        .success()
        .stdout(
            contains("splunk.example.test")
                .and(contains("interval: 3"))
                .and(contains("retries: 7"))
                .and(contains("9089")),
        );
}

#[test]
fn missing_app_reports_io_diagnostic() {
    probe()
        .args(["params", "sourcetypes", "--splunk-app", "tests/fixtures/no-such-app"])
        .assert()
        .failure()
        .stderr(contains("stanza_probe::io"));
}

#[test]
fn malformed_config_reports_config_diagnostic() {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("malformed-probe.yaml");
    fs::write(&path, "splunk_port: not-a-number\n").unwrap();

    probe()
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(contains("stanza_probe::config"));

    let _ = fs::remove_file(&path);
}

#[test]
fn unknown_fixture_is_rejected_by_argument_parsing() {
    probe()
        .args(["params", "splunk_search_util"])
        .assert()
        .failure()
        .stderr(contains("invalid value"));
}
