use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Nested view of job invocations: job name → tree of its children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobTree(IndexMap<String, JobTree>);

impl JobTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `name`, keeping its original position.
    pub fn insert(&mut self, name: impl Into<String>, subtree: JobTree) {
        self.0.insert(name.into(), subtree);
    }

    pub fn get(&self, name: &str) -> Option<&JobTree> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge `other` into this tree; equal top-level names are overwritten.
    pub fn extend(&mut self, other: JobTree) {
        self.0.extend(other.0);
    }
}
