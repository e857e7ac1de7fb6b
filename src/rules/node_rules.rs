//! Per-node parameter rules.

use indexmap::IndexMap;

use super::{Violation, record};
use crate::document::{JobDocument, Node};

/// Parameters with one required value on every node that defines them.
pub const PARAMETER_RULES: [(&str, &str); 5] = [
    ("DIE_ON_ERROR", "true"),
    ("DIE_ON_CHILD_ERROR", "true"),
    ("USE_INDEPENDENT_PROCESS", "false"),
    ("TRANSMIT_ORIGINAL_CONTEXT", "true"),
    ("TRANSMIT_WHOLE_CONTEXT", "true"),
];

/// Accepted values of Teradata connection parameters. The first entry is reported as expected.
pub const CREDENTIAL_RULES: [(&str, &[&str]); 3] = [
    ("HOST", &["context.EDW_HOST"]),
    ("USER", &["context.EDW_USER"]),
    (
        "PASS",
        &["context.EDW_PASS", "4D9onkGJm3fNdrQLmTZZevT3q6F0Z4TqEncrypt"],
    ),
];

/// Directory/file creation flags on file components.
// FAILON=true (tFileDelete) is not enforced.
pub const FILE_RULES: [(&str, &str); 4] = [
    ("CREATEDIR", "false"),
    ("CREATE", "false"),
    ("MKDIR", "false"),
    ("CREATE_DIRECTORY", "false"),
];

/// Values containing this marker are encrypted secrets.
pub const ENCRYPTED_MARKER: &str = "Encrypt";
pub const MASKED_VALUE: &str = "*ENCRYPTED*";

pub fn mismatch_message(param: &str, expected: &str, actual: &str) -> String {
    format!(
        "Value '{}' must be set to '{}' (actual: '{}')",
        param, expected, actual
    )
}

pub fn check_node(
    node: &Node,
    doc: &JobDocument,
    findings: &mut IndexMap<&'static str, Vec<Violation>>,
) {
    check_parameters(node, &PARAMETER_RULES, findings);

    if doc.uses_teradata && node.is_teradata() && !node.uses_existing_connection() {
        check_credentials(node, findings);
    }

    if doc.uses_files {
        check_parameters(node, &FILE_RULES, findings);
    }
}

fn check_parameters(
    node: &Node,
    rules: &[(&'static str, &'static str)],
    findings: &mut IndexMap<&'static str, Vec<Violation>>,
) {
    for &(param, expected) in rules {
        match node.param(param) {
            Some(actual) if actual != expected => record(
                findings,
                param,
                Violation::new(&node.unique_name, mismatch_message(param, expected, actual)),
            ),
            _ => {}
        }
    }
}

fn check_credentials(node: &Node, findings: &mut IndexMap<&'static str, Vec<Violation>>) {
    for &(param, accepted) in &CREDENTIAL_RULES {
        let Some(actual) = node.param(param) else {
            continue;
        };
        if accepted.contains(&actual) {
            continue;
        }
        let shown = if actual.contains(ENCRYPTED_MARKER) {
            MASKED_VALUE
        } else {
            actual
        };
        record(
            findings,
            param,
            Violation {
                component: node.unique_name.clone(),
                message: mismatch_message(param, accepted[0], shown),
                component_type: node.param("TYPE").map(str::to_string),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{COMPONENT_KEY, Params};

    fn node(component: &str, params: &[(&str, &str)]) -> Node {
        let mut map = Params::new();
        map.insert("UNIQUE_NAME".into(), format!("{}_1", component));
        for (k, v) in params {
            map.insert((*k).into(), (*v).into());
        }
        map.insert(COMPONENT_KEY.into(), component.into());
        Node {
            unique_name: format!("{}_1", component),
            params: map,
        }
    }

    fn run(node: &Node, doc: &JobDocument) -> IndexMap<&'static str, Vec<Violation>> {
        let mut findings = IndexMap::new();
        check_node(node, doc, &mut findings);
        findings
    }

    #[test]
    fn uniform_rule_quotes_expected_and_actual() {
        let n = node("tRunJob", &[("DIE_ON_CHILD_ERROR", "false"), ("DIE_ON_ERROR", "true")]);
        let findings = run(&n, &JobDocument::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings["DIE_ON_CHILD_ERROR"][0].message,
            "Value 'DIE_ON_CHILD_ERROR' must be set to 'true' (actual: 'false')"
        );
    }

    #[test]
    fn credentials_need_teradata_job() {
        let n = node("tTeradataInput", &[("HOST", "edw.example.com")]);
        assert!(run(&n, &JobDocument::default()).is_empty());

        let doc = JobDocument {
            uses_teradata: true,
            ..Default::default()
        };
        let findings = run(&n, &doc);
        assert_eq!(
            findings["HOST"][0].message,
            "Value 'HOST' must be set to 'context.EDW_HOST' (actual: 'edw.example.com')"
        );
    }

    #[test]
    fn shared_connection_skips_credentials() {
        let doc = JobDocument {
            uses_teradata: true,
            ..Default::default()
        };
        let n = node(
            "tTeradataRow",
            &[("USE_EXISTING_CONNECTION", "true"), ("USER", "dbc")],
        );
        assert!(run(&n, &doc).is_empty());
    }

    #[test]
    fn encrypted_password_is_masked() {
        let doc = JobDocument {
            uses_teradata: true,
            ..Default::default()
        };
        let secret = "Zm9vYmFyEncrypt";
        let n = node(
            "tTeradataConnection",
            &[("PASS", secret), ("TYPE", "Teradata")],
        );
        let findings = run(&n, &doc);
        let violation = &findings["PASS"][0];
        assert!(!violation.message.contains(secret));
        assert!(violation.message.contains(MASKED_VALUE));
        assert_eq!(violation.component_type.as_deref(), Some("Teradata"));
    }

    #[test]
    fn approved_encrypted_password_passes() {
        let doc = JobDocument {
            uses_teradata: true,
            ..Default::default()
        };
        let n = node(
            "tTeradataConnection",
            &[("PASS", "4D9onkGJm3fNdrQLmTZZevT3q6F0Z4TqEncrypt")],
        );
        assert!(run(&n, &doc).is_empty());
    }

    #[test]
    fn file_rules_need_file_job() {
        let n = node("tFileOutputDelimited", &[("CREATE", "true")]);
        assert!(run(&n, &JobDocument::default()).is_empty());

        let doc = JobDocument {
            uses_files: true,
            ..Default::default()
        };
        let findings = run(&n, &doc);
        assert_eq!(findings["CREATE"].len(), 1);
    }
}
