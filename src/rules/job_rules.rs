//! Job-level rules: context completeness and deprecated triggers.

use indexmap::IndexMap;

use super::{CONTEXT, ON_COMPONENT_ERROR, Violation, record};
use crate::document::JobDocument;

/// Context keys a Teradata job must define.
pub const REQUIRED_CONTEXT: [&str; 3] = ["EDW_HOST", "EDW_USER", "EDW_PASS"];

/// Connector types of the "on component error" trigger family.
pub const COMPONENT_ERROR_CONNECTORS: [&str; 2] = ["COMPONENT_ERROR", "ON_COMPONENT_ERROR"];

/// Component name reported for context violations.
pub const CONTEXT_COMPONENT: &str = "Context";

/// Only the first context group is inspected.
pub fn check_context(doc: &JobDocument, findings: &mut IndexMap<&'static str, Vec<Violation>>) {
    if !doc.uses_teradata {
        return;
    }
    let first_group = doc.context.values().next();

    for key in REQUIRED_CONTEXT {
        let present = first_group.is_some_and(|params| params.contains_key(key));
        if !present {
            record(
                findings,
                CONTEXT,
                Violation::new(
                    CONTEXT_COMPONENT,
                    format!(
                        "Teradata job detected but missing context parameter '{}'",
                        key
                    ),
                ),
            );
        }
    }
}

pub fn check_connections(
    doc: &JobDocument,
    findings: &mut IndexMap<&'static str, Vec<Violation>>,
) {
    for (name, connector) in &doc.connections {
        if COMPONENT_ERROR_CONNECTORS.contains(&connector.as_str()) {
            record(
                findings,
                ON_COMPONENT_ERROR,
                Violation::new(
                    name,
                    "'OnComponentError' trigger deprecated. Use 'if' trigger instead.",
                ),
            );
        }
    }
}
