//! Field-name extractors, one per embedded configuration mini-language.
//!
//! These micro-grammars are ad hoc, so each one is a regex or a split behind a
//! named function. Every extractor accepts any input: empty or malformed
//! values simply yield no fields.

use once_cell::sync::Lazy;
use regex::Regex;

/// `(?<name>`, `(?P<name>` and `(?'name'`; lookbehinds like `(?<=` never match.
static NAMED_CAPTURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\?(?:P?<|')([A-Za-z_][A-Za-z0-9_]*)[>']").unwrap());

static LOOKUP_KEYS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^\s*\S+\s+(.+?)\s+OUTPUT(?:NEW)?(?:\s|$)").unwrap());

static ALIAS_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)("[^"]*"|'[^']*'|[^\s,"']+)\s+AS(?:NEW)?\s+("[^"]*"|'[^']*'|[^\s,"']+)"#)
        .unwrap()
});

static LOOKUP_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*"|'[^']*'|[^\s,]+"#).unwrap());

/// `_KEY_n`/`_VAL_n` groups name fields dynamically; they are not field names.
const DYNAMIC_CAPTURE_PREFIXES: [&str; 2] = ["_KEY_", "_VAL_"];

static FORMAT_TARGET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\S+?)::").unwrap());

// ============================================================================
// EXTRACTORS
// ============================================================================

/// Names of the named capture groups in a regex, in order of appearance.
pub fn regex_captures(value: &str) -> Vec<String> {
    NAMED_CAPTURE
        .captures_iter(value)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !DYNAMIC_CAPTURE_PREFIXES.iter().any(|prefix| name.starts_with(*prefix)))
        .map(str::to_string)
        .collect()
}

/// Comma-separated names, trimmed, empties dropped.
pub fn comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Input fields of a lookup invocation:
/// `lookup_name key1, key2 AS alias OUTPUT out1`. Renames keep the left-hand
/// (event-side) name. A value without `OUTPUT`/`OUTPUTNEW` yields nothing.
pub fn lookup_inputs(value: &str) -> Vec<String> {
    let Some(keys) = LOOKUP_KEYS.captures(value).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };

    let tokens: Vec<&str> = LOOKUP_TOKEN
        .find_iter(keys.as_str())
        .map(|m| m.as_str())
        .collect();

    let mut fields = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if token.eq_ignore_ascii_case("as") {
            // Dangling or repeated rename; skip the keyword and its alias.
            i += 2;
            continue;
        }
        fields.push(unquote(token).to_string());
        let renamed = tokens
            .get(i + 1)
            .is_some_and(|next| next.eq_ignore_ascii_case("as"));
        i += if renamed { 3 } else { 1 };
    }
    fields
}

/// Source fields of `FIELDALIAS` pairs: `src AS dst, "src 2" ASNEW dst2`.
pub fn alias_sources(value: &str) -> Vec<String> {
    ALIAS_PAIR
        .captures_iter(value)
        .filter_map(|caps| caps.get(1))
        .map(|m| unquote(m.as_str()).to_string())
        .collect()
}

/// Target fields of a transforms `FORMAT`: `name::$1 other::$2`. Dynamic
/// targets such as `$1::$2` are skipped.
pub fn format_fields(value: &str) -> Vec<String> {
    FORMAT_TARGET
        .captures_iter(value)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !name.contains('$'))
        .map(|name| unquote(name).to_string())
        .collect()
}

/// The field a transform reads from via `SOURCE_KEY`. Internal keys such as
/// `_raw` or `MetaData:Source` are not fields.
pub fn source_key_field(value: &str) -> Vec<String> {
    let key = value.trim();
    let key = key.strip_prefix("field:").unwrap_or(key).trim();
    if key.is_empty() || key.starts_with('_') || key.starts_with("MetaData:") {
        return Vec::new();
    }
    vec![key.to_string()]
}

/// Field name encoded in the setting's own name, e.g. `EVAL-status` -> `status`.
pub fn declared_name(setting_name: &str, prefix: &str) -> Vec<String> {
    setting_name
        .strip_prefix(prefix)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| vec![name.to_string()])
        .unwrap_or_default()
}

fn unquote(token: &str) -> &str {
    let trimmed = token.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    trimmed
}
