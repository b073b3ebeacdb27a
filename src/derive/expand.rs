//! Expansion of templated `source::` stanza names.
//!
//! `...(a|b)...` style names denote several concrete sources. Each
//! parenthesized group contributes one alternative per combination and every
//! `...` becomes a single `*` glob.

use once_cell::sync::Lazy;
use regex::Regex;

static GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^()]*)\)").unwrap());

/// Lazily yields every concrete name `template` denotes, group 1 varying
/// slowest. No deduplication happens here.
pub fn expand_pattern(template: &str) -> Expansion {
    let normalized = template.replace("...", "*");

    let mut literals = Vec::new();
    let mut groups = Vec::new();
    let mut last = 0;
    for caps in GROUP.captures_iter(&normalized) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        literals.push(normalized[last..whole.start()].to_string());
        groups.push(inner.as_str().split('|').map(str::to_string).collect::<Vec<_>>());
        last = whole.end();
    }
    literals.push(normalized[last..].to_string());

    let cursor = Some(vec![0; groups.len()]);
    Expansion {
        literals,
        groups,
        cursor,
    }
}

/// Iterator over the combinations of one template.
#[derive(Debug, Clone)]
pub struct Expansion {
    /// Always one longer than `groups`.
    literals: Vec<String>,
    groups: Vec<Vec<String>>,
    cursor: Option<Vec<usize>>,
}

impl Expansion {
    fn render(&self, picks: &[usize]) -> String {
        let mut out = self.literals[0].clone();
        for (group, (&pick, literal)) in self.groups.iter().zip(picks.iter().zip(&self.literals[1..])) {
            out.push_str(&group[pick]);
            out.push_str(literal);
        }
        out
    }

    /// Odometer step: the last group turns fastest.
    fn advance(&mut self) {
        let Some(picks) = self.cursor.as_mut() else {
            return;
        };
        for slot in (0..picks.len()).rev() {
            picks[slot] += 1;
            if picks[slot] < self.groups[slot].len() {
                return;
            }
            picks[slot] = 0;
        }
        self.cursor = None;
    }
}

impl Iterator for Expansion {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let picks = self.cursor.as_ref()?;
        let name = self.render(picks);
        self.advance();
        Some(name)
    }
}
