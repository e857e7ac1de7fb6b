//! Parsed model of a single Talend job document.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

/// Reserved parameter key holding the component type of a node.
pub const COMPONENT_KEY: &str = "_componentName";

/// Component type that invokes another job.
pub const JOB_INVOCATION_COMPONENT: &str = "tRunJob";

pub type Params = IndexMap<String, String>;

/// Context group name → parameters, in document order.
pub type ContextGroups = IndexMap<String, Params>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub unique_name: String,
    /// Element parameters plus [`COMPONENT_KEY`].
    pub params: Params,
}

impl Node {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn component_name(&self) -> &str {
        self.param(COMPONENT_KEY).unwrap_or_default()
    }

    pub fn is_disabled(&self) -> bool {
        self.param("ACTIVATE") == Some("false")
    }

    pub fn uses_existing_connection(&self) -> bool {
        self.param("USE_EXISTING_CONNECTION") == Some("true")
    }

    pub fn is_teradata(&self) -> bool {
        self.component_name().to_lowercase().contains("teradata")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobDocument {
    /// Active nodes by `UNIQUE_NAME`.
    pub nodes: IndexMap<String, Node>,
    /// Active connections: `UNIQUE_NAME` → connector type.
    pub connections: IndexMap<String, String>,
    pub context: ContextGroups,
    /// Jobs invoked through `tRunJob`, duplicates kept.
    pub children: Vec<String>,
    /// `schema.table` names referenced by nodes.
    pub tables: BTreeSet<String>,
    pub uses_teradata: bool,
    pub uses_files: bool,
}
