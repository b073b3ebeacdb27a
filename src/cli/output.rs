//! Handles all user-facing output for the CLI.
//!
//! Colour is decided by termcolor (`ColorChoice::Auto`), so piped output stays
//! plain.

use std::io::Write;
use std::path::Path;

use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::config::SearchPolicy;
use crate::derive::TestParameter;
use crate::diagnostics::ProbeError;

pub fn print_error(error: ProbeError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}

/// One line per parameter: id, then its fields or asserted value.
pub fn print_params(params: &[TestParameter]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    if params.is_empty() {
        let _ = writeln!(stdout, "  No parameters derived.");
        return;
    }
    for param in params {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        let _ = write!(stdout, "{}", param.id);
        let _ = stdout.reset();
        let payload = &param.payload;
        let detail = match &payload.value {
            Some(value) => format!("{}=\"{}\"", payload.fields.join(","), value),
            None if payload.fields.is_empty() => "-".to_string(),
            None => payload.fields.join(", "),
        };
        let _ = writeln!(stdout, "  [{}] {}", payload.classification, detail);
    }
}

pub fn print_query(id: &str, query: &str, policy: SearchPolicy) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    let _ = writeln!(
        stdout,
        "--- {} (interval={}s, retries={}) ---",
        id, policy.interval, policy.retries
    );
    let _ = stdout.reset();
    let _ = writeln!(stdout, "{}", query);
}

pub fn print_conf_summary(path: &Path, sections: Result<usize, ProbeError>) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    match sections {
        Ok(count) => {
            let _ = writeln!(stdout, "  {:<48} {:>5} stanzas", path.display(), count);
        }
        Err(e) => {
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
            let _ = writeln!(stdout, "  {:<48} unreadable", path.display());
            let _ = stdout.reset();
            print_error(e);
        }
    }
}
