//! Review phase: static rule checks over a parsed job.
//!
//! Results are grouped as rule id → job name → violations. Rule ids appear in
//! [`RULE_ORDER`]; violations keep node (or connection) document order.

pub mod job_rules;
pub mod node_rules;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::document::JobDocument;

pub const ON_COMPONENT_ERROR: &str = "ON_COMPONENT_ERROR";
pub const CONTEXT: &str = "CONTEXT";

/// Every rule id, in report order.
pub const RULE_ORDER: [&str; 14] = [
    "DIE_ON_ERROR",
    "DIE_ON_CHILD_ERROR",
    "USE_INDEPENDENT_PROCESS",
    "TRANSMIT_ORIGINAL_CONTEXT",
    "TRANSMIT_WHOLE_CONTEXT",
    "HOST",
    "USER",
    "PASS",
    "CREATEDIR",
    "CREATE",
    "MKDIR",
    "CREATE_DIRECTORY",
    ON_COMPONENT_ERROR,
    CONTEXT,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub component: String,
    pub message: String,
    /// Database type of the offending component, for credential rules.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
}

impl Violation {
    pub fn new(component: impl Into<String>, message: impl Into<String>) -> Self {
        Violation {
            component: component.into(),
            message: message.into(),
            component_type: None,
        }
    }
}

/// rule id → job name → violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewReport(IndexMap<String, IndexMap<String, Vec<Violation>>>);

impl ReviewReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: &str, job: &str, violation: Violation) {
        self.0
            .entry(rule.to_string())
            .or_default()
            .entry(job.to_string())
            .or_default()
            .push(violation);
    }

    /// Append `other`, concatenating lists of the same rule and job.
    pub fn merge(&mut self, other: ReviewReport) {
        for (rule, jobs) in other.0 {
            let target = self.0.entry(rule).or_default();
            for (job, violations) in jobs {
                target.entry(job).or_default().extend(violations);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Jobs with at least one violation of `rule`.
    pub fn jobs(&self, rule: &str) -> impl Iterator<Item = &str> {
        self.0
            .get(rule)
            .into_iter()
            .flat_map(|jobs| jobs.keys().map(String::as_str))
    }

    pub fn violations(&self, rule: &str, job: &str) -> &[Violation] {
        self.0
            .get(rule)
            .and_then(|jobs| jobs.get(job))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.0
            .values()
            .flat_map(|jobs| jobs.values())
            .map(Vec::len)
            .sum()
    }
}

/// Run every rule against `doc`. Empty rules are left out of the report.
pub fn review_document(job: &str, doc: &JobDocument) -> ReviewReport {
    let mut findings: IndexMap<&'static str, Vec<Violation>> =
        RULE_ORDER.iter().map(|rule| (*rule, Vec::new())).collect();

    for node in doc.nodes.values() {
        // Parsing already drops disabled nodes.
        if node.is_disabled() {
            continue;
        }
        node_rules::check_node(node, doc, &mut findings);
    }

    job_rules::check_context(doc, &mut findings);
    job_rules::check_connections(doc, &mut findings);

    let mut report = ReviewReport::new();
    for (rule, violations) in findings {
        for violation in violations {
            report.push(rule, job, violation);
        }
    }
    report
}

/// Push into the list of a known rule id.
pub(crate) fn record(
    findings: &mut IndexMap<&'static str, Vec<Violation>>,
    rule: &'static str,
    violation: Violation,
) {
    findings.entry(rule).or_default().push(violation);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(component: &str) -> Violation {
        Violation::new(component, "msg")
    }

    #[test]
    fn merge_concatenates_without_dedup() {
        let mut a = ReviewReport::new();
        a.push("DIE_ON_ERROR", "A", v("n1"));
        let mut b = ReviewReport::new();
        b.push("DIE_ON_ERROR", "A", v("n1"));
        b.push("HOST", "B", v("n2"));
        a.merge(b);

        assert_eq!(a.violations("DIE_ON_ERROR", "A").len(), 2);
        assert_eq!(a.violations("HOST", "B").len(), 1);
        assert_eq!(a.rules().collect::<Vec<_>>(), vec!["DIE_ON_ERROR", "HOST"]);
        assert_eq!(a.total(), 3);
    }

    #[test]
    fn empty_document_yields_empty_report() {
        let report = review_document("A", &JobDocument::default());
        assert!(report.is_empty());
        assert_eq!(serde_json::to_string(&report).unwrap(), "{}");
    }

    #[test]
    fn violation_type_is_omitted_when_absent() {
        let json = serde_json::to_value(v("n")).unwrap();
        assert_eq!(json, serde_json::json!({"component": "n", "message": "msg"}));
    }
}
