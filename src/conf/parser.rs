//! `.conf` reader - turns raw text into a [`ConfFile`].
//!
//! Lines the reader does not understand are logged and skipped.

use std::path::Path;

use pest::{error::InputLocation, iterators::Pair, Parser};
use pest_derive::Parser;
use tracing::{debug, warn};

use super::{ConfFile, Section};
use crate::diagnostics::{to_error_source, ProbeError, Span};
use crate::{err_msg, err_src};

#[derive(Parser)]
#[grammar = "conf/grammar.pest"]
struct ConfParser;

/// Name of the implicit section holding settings declared before any header.
pub const DEFAULT_SECTION: &str = "default";

// ============================================================================
// PUBLIC API
// ============================================================================

/// Reads and parses a `.conf` file from disk.
pub fn read_conf(path: &Path) -> Result<ConfFile, ProbeError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        err_msg!(Io, "Failed to read '{}'", path.display()).with_cause(e)
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_conf(&name, &text)
}

/// Parses `.conf` text. `name` is only used for diagnostics and
/// [`ConfFile::name`].
pub fn parse_conf(name: &str, text: &str) -> Result<ConfFile, ProbeError> {
    let mut pairs = ConfParser::parse(Rule::conf, text).map_err(|e| {
        let source = to_error_source(name, text);
        let span = match e.location {
            InputLocation::Pos(pos) => Span { start: pos, end: pos },
            InputLocation::Span((start, end)) => Span { start, end },
        };
        err_src!(Parse, format!("invalid {} syntax", name), &source, span)
            .with_help("expected `[stanza]`, `key = value` or a `#` comment")
    })?;

    let mut conf = ConfFile::new(name);
    let mut current = Section::new(DEFAULT_SECTION);
    let Some(root) = pairs.next() else {
        return Ok(conf);
    };

    for pair in root.into_inner() {
        match pair.as_rule() {
            Rule::stanza => {
                flush(&mut conf, current);
                current = Section::new(stanza_name(pair));
            }
            Rule::setting => {
                let line = pair.line_col().0;
                match split_setting(pair) {
                    Some((key, value)) => current.set(key, value),
                    None => warn!(file = name, line, "ignoring setting with an empty key"),
                }
            }
            Rule::invalid => {
                let (line, _) = pair.line_col();
                warn!(file = name, line, text = pair.as_str(), "ignoring unrecognized line");
            }
            _ => {}
        }
    }
    flush(&mut conf, current);

    debug!(file = name, sections = conf.len(), "parsed configuration file");
    Ok(conf)
}

// ============================================================================
// PAIR HELPERS
// ============================================================================

/// Pushes a finished section. The implicit default section is only kept when
/// something was actually declared in it.
fn flush(conf: &mut ConfFile, section: Section) {
    if section.name() == DEFAULT_SECTION && section.is_empty() && !conf.contains(DEFAULT_SECTION) {
        return;
    }
    conf.insert(section);
}

fn stanza_name(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::stanza_name)
        .map(|p| p.as_str().trim().to_string())
        .unwrap_or_default()
}

fn split_setting(pair: Pair<Rule>) -> Option<(String, String)> {
    let mut key = None;
    let mut value = String::new();
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::key => key = Some(part.as_str().trim().to_string()),
            Rule::value => value = join_continuations(part.as_str()),
            _ => {}
        }
    }
    key.filter(|k| !k.is_empty()).map(|k| (k, value))
}

/// Folds backslash-newline continuations into plain newlines.
fn join_continuations(raw: &str) -> String {
    raw.replace("\\\r\n", "\n")
        .replace("\\\n", "\n")
        .trim()
        .to_string()
}
