//! Options for opening a project.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::source::GitSource;

pub const DEFAULT_REFERENCE: &str = "HEAD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectOptions {
    pub repository: PathBuf,
    /// Commit-ish to review; `None` reads the working tree.
    pub reference: Option<String>,
    /// `false` when `repository` is a work tree containing `.git`.
    pub bare: bool,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        ProjectOptions {
            repository: PathBuf::from("."),
            reference: Some(DEFAULT_REFERENCE.to_string()),
            bare: true,
        }
    }
}

impl ProjectOptions {
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        ProjectOptions {
            repository: repository.into(),
            ..Default::default()
        }
    }

    pub fn with_reference(mut self, reference: Option<String>) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_bare(mut self, bare: bool) -> Self {
        self.bare = bare;
        self
    }

    pub fn git_source(&self) -> GitSource {
        GitSource::new(self.repository.clone(), self.bare)
    }
}
