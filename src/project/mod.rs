//! Project registry: every job file at one reference of a repository.
//!
//! Jobs are discovered once at load time and parsed lazily. Aggregations that
//! follow `tRunJob` references live in `aggregate`.

pub mod aggregate;
pub mod descriptor;
pub mod graph;
pub mod job;
pub mod tree;
pub mod versions;

pub use aggregate::JobSummary;
pub use graph::DependencyGraph;
pub use job::Job;
pub use tree::JobTree;
pub use versions::{JobVersion, JobVersions};

use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::ProjectOptions;
use crate::error::ReviewError;
use crate::sink::{ReportEvent, ReportSink};
use crate::source::{PROJECT_DESCRIPTOR, SourceProvider, is_job_file};

pub struct Project {
    name: String,
    product_version: String,
    author: String,
    tags: Vec<String>,
    repository_path: String,
    reference: Option<String>,
    /// Job name → versions, in discovery order.
    versions: IndexMap<String, JobVersions>,
    /// Job id → job, every version.
    jobs: IndexMap<String, Job>,
    sink: Arc<dyn ReportSink>,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("name", &self.name)
            .field("repository_path", &self.repository_path)
            .field("reference", &self.reference)
            .field("jobs", &self.versions.len())
            .finish()
    }
}

impl Project {
    /// Open the git repository described by `options`.
    pub fn open(options: &ProjectOptions, sink: Arc<dyn ReportSink>) -> Result<Self, ReviewError> {
        Self::load(options, Arc::new(options.git_source()), sink)
    }

    pub fn load(
        options: &ProjectOptions,
        source: Arc<dyn SourceProvider>,
        sink: Arc<dyn ReportSink>,
    ) -> Result<Self, ReviewError> {
        let reference = options.reference.as_deref();

        let items = source.list_tracked_files(reference, &is_job_file)?;
        let tags = source.tags_at(reference);
        let author = source.author_of(reference);
        let descriptor =
            descriptor::read_descriptor(source.open_content(PROJECT_DESCRIPTOR, reference)?)?;

        let mut registry: IndexMap<String, JobVersions> = IndexMap::new();
        let mut jobs = IndexMap::new();
        for item in items {
            let (name, version) = versions::split_job_path(&item)?;
            match registry.get_mut(&name) {
                Some(known) => known.register(version, &item),
                None => {
                    registry.insert(name.clone(), JobVersions::new(version, &item));
                }
            }
            sink.report(ReportEvent::JobDiscovered {
                name: name.clone(),
                version,
                id: item.clone(),
            });
            let job = Job::new(
                name,
                item.clone(),
                version,
                options.reference.clone(),
                Arc::clone(&source),
                Arc::clone(&sink),
            );
            jobs.insert(item, job);
        }

        Ok(Project {
            name: descriptor.name,
            product_version: descriptor.product_version,
            author,
            tags,
            repository_path: options.repository.display().to_string(),
            reference: options.reference.clone(),
            versions: registry,
            jobs,
            sink,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn product_version(&self) -> &str {
        &self.product_version
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn repository_path(&self) -> &str {
        &self.repository_path
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub(crate) fn sink(&self) -> &dyn ReportSink {
        self.sink.as_ref()
    }

    /// Job by repository path, any version.
    pub fn by_id(&self, id: &str) -> Result<&Job, ReviewError> {
        self.jobs.get(id).ok_or_else(|| ReviewError::unknown_job(id))
    }

    /// Latest version of the job called `name`.
    pub fn by_name(&self, name: &str) -> Result<&Job, ReviewError> {
        let id = self
            .versions
            .get(name)
            .and_then(JobVersions::latest_id)
            .ok_or_else(|| ReviewError::unknown_job(name))?;
        self.by_id(id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.versions.contains_key(name)
    }

    pub fn versions(&self, name: &str) -> Option<&JobVersions> {
        self.versions.get(name)
    }

    pub fn job_names(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    /// Latest version of every job, in discovery order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.versions
            .values()
            .filter_map(JobVersions::latest_id)
            .filter_map(|id| self.jobs.get(id))
    }

    /// Every job file, all versions.
    pub fn all_versions(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    /// Number of distinct job names.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Dependency graph over the latest version of every job. Parses every job.
    pub fn dependency_graph(&self) -> Result<DependencyGraph, ReviewError> {
        let mut graph = DependencyGraph::new();
        for job in self.jobs() {
            graph.add_job(job.name(), &job.parse()?.children);
        }
        Ok(graph)
    }

    /// Jobs no other job invokes directly.
    pub fn master_jobs(&self) -> Result<Vec<String>, ReviewError> {
        Ok(self.dependency_graph()?.masters())
    }

    pub fn dependency_cycles(&self) -> Result<Vec<Vec<String>>, ReviewError> {
        Ok(self.dependency_graph()?.cycles())
    }

    /// Sorted union of the tables referenced by every job.
    pub fn all_tables(&self) -> Result<Vec<String>, ReviewError> {
        let mut tables = BTreeSet::new();
        for job in self.jobs() {
            tables.extend(job.parse()?.tables.iter().cloned());
        }
        Ok(tables.into_iter().collect())
    }
}
