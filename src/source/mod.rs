//! Source providers: where job files and repository metadata come from.
//!
//! The project registry only talks to the [`SourceProvider`] trait. `GitSource`
//! reads a git repository through the `git` executable, `InMemorySource` serves
//! a fixed set of files (tests, WASM).

pub mod git;
pub mod memory;

pub use git::GitSource;
pub use memory::InMemorySource;

use std::io::Read;

/// Placeholder returned by [`SourceProvider::author_of`] when the author cannot be read.
pub const AUTHOR_PLACEHOLDER: &str = "Error reading author";

/// Project descriptor at the repository root.
pub const PROJECT_DESCRIPTOR: &str = "talend.project";

/// Extension of job definition files.
pub const JOB_FILE_SUFFIX: &str = ".item";

pub type ContentStream = Box<dyn Read + Send>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("io error: {op} {path} ({detail})")]
    Io {
        op: &'static str,
        path: String,
        detail: String,
    },
    #[error("git error: `git {command}` ({detail})")]
    Git { command: String, detail: String },
    #[error("no such file: {path}")]
    Missing { path: String },
}

pub trait SourceProvider: Send + Sync {
    /// Tracked file paths at `reference` accepted by `filter`, in listing order.
    fn list_tracked_files(
        &self,
        reference: Option<&str>,
        filter: &dyn Fn(&str) -> bool,
    ) -> Result<Vec<String>, SourceError>;

    /// Tags pointing at `reference`. Never fails: any error yields an empty list.
    fn tags_at(&self, reference: Option<&str>) -> Vec<String>;

    /// `Name <email>` of the author of `reference`, or [`AUTHOR_PLACEHOLDER`].
    fn author_of(&self, reference: Option<&str>) -> String;

    /// Content of `path` at `reference`; `None` reads the working tree.
    fn open_content(
        &self,
        path: &str,
        reference: Option<&str>,
    ) -> Result<ContentStream, SourceError>;
}

/// Job discovery filter: `.item` files below a `process` directory.
pub fn is_job_file(path: &str) -> bool {
    path.contains("process") && path.ends_with(JOB_FILE_SUFFIX)
}
