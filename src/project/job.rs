//! One versioned job file with its one-shot parse state.

use std::sync::{Arc, OnceLock};

use crate::document::{self, JobDocument};
use crate::error::ReviewError;
use crate::rules::{self, ReviewReport};
use crate::sink::{ReportEvent, ReportSink};
use crate::source::SourceProvider;

/// A job starts unparsed. The first [`Job::parse`] reads its content once and
/// stores either the document or the error; later calls return the stored outcome.
pub struct Job {
    name: String,
    id: String,
    version: f64,
    reference: Option<String>,
    source: Arc<dyn SourceProvider>,
    sink: Arc<dyn ReportSink>,
    state: OnceLock<Result<JobDocument, ReviewError>>,
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("version", &self.version)
            .field("parsed", &self.is_parsed())
            .finish()
    }
}

impl Job {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        version: f64,
        reference: Option<String>,
        source: Arc<dyn SourceProvider>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Job {
            name: name.into(),
            id: id.into(),
            version,
            reference,
            source,
            sink,
            state: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Repository path of the job file.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> f64 {
        self.version
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self.state.get(), Some(Ok(_)))
    }

    pub fn has_failed(&self) -> bool {
        matches!(self.state.get(), Some(Err(_)))
    }

    pub fn parse(&self) -> Result<&JobDocument, ReviewError> {
        self.state
            .get_or_init(|| self.load())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn load(&self) -> Result<JobDocument, ReviewError> {
        let stream = self
            .source
            .open_content(&self.id, self.reference.as_deref())
            .map_err(|e| ReviewError::from(e).in_job(&self.name))?;
        let doc = document::parse_job(stream).map_err(|e| e.in_job(&self.name))?;

        self.sink.report(ReportEvent::JobParsed {
            name: self.name.clone(),
            nodes: doc.nodes.len(),
            children: doc.children.len(),
        });
        Ok(doc)
    }

    /// Rule results for this job alone.
    pub fn review(&self) -> Result<ReviewReport, ReviewError> {
        Ok(rules::review_document(&self.name, self.parse()?))
    }
}
