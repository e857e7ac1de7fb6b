#![allow(dead_code)]

use std::sync::Arc;

use talend_review::config::ProjectOptions;
use talend_review::project::Project;
use talend_review::sink::CollectingSink;
use talend_review::source::{InMemorySource, PROJECT_DESCRIPTOR};

pub const DESCRIPTOR: &str = include_str!("../fixtures/talend.project");
pub const AUTHOR: &str = "Jane Doe <jane.doe@example.com>";

// =============================================================================
// Job document builder
// =============================================================================

/// Builds the XML of a `.item` job file.
#[derive(Debug, Default)]
pub struct JobXml {
    body: String,
}

impl JobXml {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active node with the given parameters; `UNIQUE_NAME` is added first.
    pub fn node(mut self, component: &str, unique_name: &str, params: &[(&str, &str)]) -> Self {
        self.body
            .push_str(&format!("  <node componentName=\"{}\">\n", escape(component)));
        self.body.push_str(&parameter("UNIQUE_NAME", unique_name));
        for (name, value) in params {
            self.body.push_str(&parameter(name, value));
        }
        self.body.push_str("  </node>\n");
        self
    }

    /// `tRunJob` invoking `child` with every invocation flag set correctly.
    pub fn run_job(self, unique_name: &str, child: &str) -> Self {
        self.node(
            "tRunJob",
            unique_name,
            &[
                ("PROCESS", child),
                ("DIE_ON_CHILD_ERROR", "true"),
                ("USE_INDEPENDENT_PROCESS", "false"),
                ("TRANSMIT_WHOLE_CONTEXT", "true"),
            ],
        )
    }

    pub fn connection(mut self, connector: &str, unique_name: &str, active: bool) -> Self {
        self.body.push_str(&format!(
            "  <connection connectorName=\"{}\" source=\"a\" target=\"b\">\n",
            escape(connector)
        ));
        self.body
            .push_str(&parameter("ACTIVATE", if active { "true" } else { "false" }));
        self.body.push_str(&parameter("UNIQUE_NAME", unique_name));
        self.body.push_str("  </connection>\n");
        self
    }

    pub fn context(mut self, group: &str, params: &[(&str, &str)]) -> Self {
        self.body
            .push_str(&format!("  <context name=\"{}\">\n", escape(group)));
        for (name, value) in params {
            self.body.push_str(&format!(
                "    <contextParameter name=\"{}\" value=\"{}\"/>\n",
                escape(name),
                escape(value)
            ));
        }
        self.body.push_str("  </context>\n");
        self
    }

    /// Default context group with every EDW key a Teradata job needs.
    pub fn edw_context(self) -> Self {
        self.context(
            "Default",
            &[
                ("EDW_HOST", "edw.example.com"),
                ("EDW_USER", "etl"),
                ("EDW_PASS", "secretEncrypt"),
            ],
        )
    }

    pub fn build(self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<talendfile:ProcessType xmlns:talendfile=\"platform:/resource/org.talend.model/model/TalendFile.xsd\">\n{}</talendfile:ProcessType>\n",
            self.body
        )
    }
}

fn parameter(name: &str, value: &str) -> String {
    format!(
        "    <elementParameter name=\"{}\" value=\"{}\"/>\n",
        escape(name),
        escape(value)
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// =============================================================================
// Project builders
// =============================================================================

pub fn job_path(name: &str, version: &str) -> String {
    format!("DWH/process/{}_{}.item", name, version)
}

pub struct Fixture {
    pub project: Project,
    pub source: Arc<InMemorySource>,
    pub sink: Arc<CollectingSink>,
}

/// Project over `(job name, version, xml)` triples plus the project descriptor.
pub fn project(jobs: Vec<(&str, &str, String)>) -> Fixture {
    let mut source = InMemorySource::new()
        .with_file(PROJECT_DESCRIPTOR, DESCRIPTOR)
        .with_tags(["release-2024.03"])
        .with_author(AUTHOR);
    for (name, version, xml) in jobs {
        source.insert(job_path(name, version), xml);
    }
    load(source)
}

pub fn load(source: InMemorySource) -> Fixture {
    let source = Arc::new(source);
    let sink = Arc::new(CollectingSink::new());
    let project = Project::load(
        &ProjectOptions::new("/srv/git/dwh.git"),
        source.clone(),
        sink.clone(),
    )
    .expect("project should load");
    Fixture {
        project,
        source,
        sink,
    }
}

/// The sales project from `tests/fixtures`: Load_Sales invokes Publish_Sales (two versions).
pub fn sales_project() -> Fixture {
    project(vec![
        (
            "Load_Sales",
            "0.1",
            include_str!("../fixtures/Load_Sales_0.1.item").to_string(),
        ),
        (
            "Publish_Sales",
            "0.2",
            include_str!("../fixtures/Publish_Sales_0.2.item").to_string(),
        ),
        (
            "Publish_Sales",
            "0.1",
            include_str!("../fixtures/Publish_Sales_0.1.item").to_string(),
        ),
    ])
}
