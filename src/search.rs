//! Search-time probes built on top of derived parameters.
//!
//! The live query engine is an external collaborator reached through
//! [`SearchUtil`]. This module only decides *what* to ask it and how to score
//! the answers.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{SearchPolicies, SearchPolicy};
use crate::derive::{Classification, TestParameter};
use crate::diagnostics::ProbeError;

/// Events from every index the probe user can read.
const ALL_INDEXES: &str = "(index=_internal OR index=*)";

/// Splunk-internal errors from anything but the web/access sourcetypes.
pub const INTERNAL_ERRORS_QUERY: &str = "search index=_internal CASE(ERROR) \
sourcetype!=splunkd_ui_access AND sourcetype!=splunk_web_access AND \
sourcetype!=splunk_web_service AND sourcetype!=splunkd_access AND sourcetype!=splunkd\
| dedup sourcetype| table sourcetype";

/// Runs count queries against a live engine.
pub trait SearchUtil {
    /// True when `query` returns at least one result within `retries`
    /// attempts spaced `interval` seconds apart.
    fn check_query_count_is_greater_than_zero(
        &self,
        query: &str,
        interval: u64,
        retries: u32,
    ) -> Result<bool, ProbeError>;
}

// ============================================================================
// QUERY BUILDERS
// ============================================================================

/// `(f=* AND NOT f="-" AND NOT f="")`: the field exists and is not a
/// placeholder.
pub fn field_condition(field: &str) -> String {
    format!("({field}=* AND NOT {field}=\"-\" AND NOT {field}=\"\")")
}

/// All fields populated at once, or `None` for an empty list.
pub fn fields_condition(fields: &[String]) -> Option<String> {
    if fields.is_empty() {
        return None;
    }
    let terms: Vec<_> = fields.iter().map(|f| field_condition(f)).collect();
    Some(format!("( {} )", terms.join(" AND ")))
}

/// The query asserting one parameter.
///
/// Literal values assert `field="value"`, field lists assert every field is
/// populated, and an empty list only asserts that the stanza has data.
pub fn parameter_query(param: &TestParameter) -> String {
    let payload = &param.payload;
    let mut query = format!(
        "search {ALL_INDEXES} AND {}=\"{}\"",
        payload.classification,
        escape(payload.search_target())
    );
    match &payload.value {
        Some(value) => {
            let field = payload.fields.first().map(String::as_str).unwrap_or("sourcetype");
            query.push_str(&format!(" AND {field}=\"{}\"", escape(value)));
        }
        None => {
            if let Some(condition) = fields_condition(&payload.fields) {
                query.push_str(" AND ");
                query.push_str(&condition);
            }
        }
    }
    query
}

/// Picks the retry policy for a parameter: field assertions get the patient
/// one.
pub fn policy_for(param: &TestParameter, policies: &SearchPolicies) -> SearchPolicy {
    let asserts_fields = param.payload.value.is_none() && !param.payload.fields.is_empty();
    if asserts_fields && param.payload.classification != Classification::Eventtype {
        policies.fields
    } else {
        policies.basic
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

// ============================================================================
// PROBER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub id: String,
    pub query: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Pass/fail tally for a probe run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeSummary {
    pub passed: usize,
    pub failed: usize,
}

impl ProbeSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        (self.passed as f64 / self.total() as f64) * 100.0
    }

    fn record(&mut self, passed: bool) {
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Runs parameters through a [`SearchUtil`].
pub struct Prober<'s, S: SearchUtil + ?Sized> {
    search: &'s S,
    policies: SearchPolicies,
}

impl<'s, S: SearchUtil + ?Sized> Prober<'s, S> {
    pub fn new(search: &'s S, policies: SearchPolicies) -> Self {
        Self { search, policies }
    }

    /// Probes each parameter in order. A failing query marks that parameter
    /// failed; it never stops the run.
    pub fn run(&self, params: &[TestParameter]) -> (Vec<ProbeOutcome>, ProbeSummary) {
        let mut summary = ProbeSummary::default();
        let outcomes: Vec<_> = params
            .iter()
            .map(|param| {
                let outcome = self.probe(param);
                summary.record(outcome.passed);
                outcome
            })
            .collect();
        info!(
            passed = summary.passed,
            failed = summary.failed,
            "probe run finished"
        );
        (outcomes, summary)
    }

    pub fn probe(&self, param: &TestParameter) -> ProbeOutcome {
        let query = parameter_query(param);
        let policy = policy_for(param, &self.policies);
        let result = self
            .search
            .check_query_count_is_greater_than_zero(&query, policy.interval, policy.retries);
        let (passed, error) = match result {
            Ok(found) => (found, None),
            Err(e) => {
                warn!(id = %param.id, error = %e, "search failed");
                (false, Some(e.to_string()))
            }
        };
        ProbeOutcome {
            id: param.id.clone(),
            query,
            passed,
            error,
        }
    }

    /// Passes when Splunk logged no internal errors.
    pub fn internal_errors(&self) -> ProbeOutcome {
        let policy = self.policies.basic;
        let result = self.search.check_query_count_is_greater_than_zero(
            INTERNAL_ERRORS_QUERY,
            policy.interval,
            policy.retries,
        );
        let (passed, error) = match result {
            Ok(found) => (!found, None),
            Err(e) => (false, Some(e.to_string())),
        };
        ProbeOutcome {
            id: "splunk_internal_errors".to_string(),
            query: INTERNAL_ERRORS_QUERY.to_string(),
            passed,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::derive::ConcreteStanza;
    use crate::err_msg;

    /// Answers from a fixed table and records the policy used per query.
    struct ScriptedSearch {
        hits: Vec<&'static str>,
        calls: RefCell<Vec<(String, u64, u32)>>,
    }

    impl SearchUtil for ScriptedSearch {
        fn check_query_count_is_greater_than_zero(
            &self,
            query: &str,
            interval: u64,
            retries: u32,
        ) -> Result<bool, ProbeError> {
            self.calls
                .borrow_mut()
                .push((query.to_string(), interval, retries));
            if query.contains("broken") {
                return Err(err_msg!(Search, "job failed"));
            }
            Ok(self.hits.iter().any(|hit| query.contains(hit)))
        }
    }

    fn param(class: Classification, stanza: &str, fields: &[&str], value: Option<&str>) -> TestParameter {
        ConcreteStanza::new(class, stanza).parameter(
            format!("{stanza}::p"),
            fields.iter().map(|f| f.to_string()).collect(),
            value.map(str::to_string),
        )
    }

    #[test]
    fn field_query_shape() {
        let p = param(Classification::Sourcetype, "alpha", &["user", "action"], None);
        assert_eq!(
            parameter_query(&p),
            "search (index=_internal OR index=*) AND sourcetype=\"alpha\" AND \
( (user=* AND NOT user=\"-\" AND NOT user=\"\") AND (action=* AND NOT action=\"-\" AND NOT action=\"\") )"
        );
    }

    #[test]
    fn source_value_query_strips_prefix() {
        let p = param(Classification::Source, "source::/var/log/*.log", &["sourcetype"], Some("alpha"));
        assert_eq!(
            parameter_query(&p),
            "search (index=_internal OR index=*) AND source=\"/var/log/*.log\" AND sourcetype=\"alpha\""
        );
    }

    #[test]
    fn empty_field_list_asserts_stanza_only() {
        let p = param(Classification::Eventtype, "login", &[], None);
        assert_eq!(
            parameter_query(&p),
            "search (index=_internal OR index=*) AND eventtype=\"login\""
        );
    }

    #[test]
    fn quotes_are_escaped() {
        let p = param(Classification::Sourcetype, "we\"ird", &[], None);
        assert!(parameter_query(&p).ends_with("sourcetype=\"we\\\"ird\""));
    }

    #[test]
    fn prober_uses_policies_and_tallies() {
        let search = ScriptedSearch {
            hits: vec!["user=*", "eventtype=\"login\""],
            calls: RefCell::new(Vec::new()),
        };
        let params = vec![
            param(Classification::Sourcetype, "alpha", &["user"], None),
            param(Classification::Eventtype, "login", &[], None),
            param(Classification::Sourcetype, "beta", &["missing"], None),
            param(Classification::Sourcetype, "broken", &[], None),
        ];
        let prober = Prober::new(&search, SearchPolicies::default());
        let (outcomes, summary) = prober.run(&params);

        let passed: Vec<_> = outcomes.iter().map(|o| o.passed).collect();
        assert_eq!(passed, vec![true, true, false, false]);
        assert_eq!(outcomes[3].error.as_deref(), Some("Search error: job failed"));
        assert_eq!(summary, ProbeSummary { passed: 2, failed: 2 });
        assert!(summary.has_failures());
        assert!((summary.success_rate() - 50.0).abs() < f64::EPSILON);

        let calls = search.calls.borrow();
        assert_eq!((calls[0].1, calls[0].2), (2, 5));
        assert_eq!((calls[1].1, calls[1].2), (1, 1));
    }

    #[test]
    fn internal_errors_pass_on_zero_count() {
        let quiet = ScriptedSearch {
            hits: vec![],
            calls: RefCell::new(Vec::new()),
        };
        assert!(Prober::new(&quiet, SearchPolicies::default()).internal_errors().passed);

        let noisy = ScriptedSearch {
            hits: vec!["CASE(ERROR)"],
            calls: RefCell::new(Vec::new()),
        };
        assert!(!Prober::new(&noisy, SearchPolicies::default()).internal_errors().passed);
    }
}
