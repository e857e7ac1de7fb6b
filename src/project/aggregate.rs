//! Aggregations over the job invocation graph.
//!
//! Traversals carry the names of the jobs on the current path. Reaching a job
//! that is already on the path reports a cycle to the sink and stops that
//! branch; the same job reached through two different paths is visited twice.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use super::{JobTree, Project};
use crate::document::{ContextGroups, DatabaseEndpoint, SqlStatement};
use crate::error::ReviewError;
use crate::rules::ReviewReport;
use crate::sink::ReportEvent;

/// Review of one job with the project metadata around it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    pub project_name: String,
    pub author: String,
    pub git_tags: Vec<String>,
    pub talend_version: String,
    pub job_name: String,
    pub repo_path: String,
    pub commit_ref: Option<String>,
    pub errors: ReviewReport,
    /// Distinct endpoints, first occurrence order.
    pub dbinfo: Vec<DatabaseEndpoint>,
    pub context: ContextGroups,
    pub tree: JobTree,
    pub job_version: f64,
}

impl Project {
    /// True (and reported) when `child` is already on `path`.
    fn closes_cycle(&self, path: &[String], child: &str) -> bool {
        let Some(start) = path.iter().position(|p| p == child) else {
            return false;
        };
        let mut cycle = path[start..].to_vec();
        cycle.push(child.to_string());
        self.sink().report(ReportEvent::CycleDetected { path: cycle });
        true
    }

    /// Rule results of `name`, merged with those of every job it invokes when
    /// `include_children` is set. Lists for the same rule and job are concatenated.
    pub fn review_job(
        &self,
        name: &str,
        include_children: bool,
    ) -> Result<ReviewReport, ReviewError> {
        self.review_path(name, include_children, &mut Vec::new())
    }

    fn review_path(
        &self,
        name: &str,
        include_children: bool,
        path: &mut Vec<String>,
    ) -> Result<ReviewReport, ReviewError> {
        let job = self.by_name(name)?;
        let mut report = job.review()?;
        if !include_children {
            return Ok(report);
        }

        path.push(name.to_string());
        for child in &job.parse()?.children {
            if self.closes_cycle(path, child) {
                continue;
            }
            report.merge(self.review_path(child, true, path)?);
        }
        path.pop();
        Ok(report)
    }

    /// Each job reviewed on its own, keyed by job name.
    pub fn review_all(&self) -> Result<IndexMap<String, ReviewReport>, ReviewError> {
        self.jobs()
            .map(|job| Ok((job.name().to_string(), job.review()?)))
            .collect()
    }

    /// Context groups of `name` completed with those of the jobs it invokes.
    /// Parameters already present are never overwritten.
    pub fn merged_context(&self, name: &str) -> Result<ContextGroups, ReviewError> {
        self.context_path(name, &mut Vec::new())
    }

    fn context_path(&self, name: &str, path: &mut Vec<String>) -> Result<ContextGroups, ReviewError> {
        let doc = self.by_name(name)?.parse()?;
        let mut merged = doc.context.clone();

        path.push(name.to_string());
        for child in &doc.children {
            if self.closes_cycle(path, child) {
                continue;
            }
            for (group, params) in self.context_path(child, path)? {
                match merged.get_mut(&group) {
                    Some(existing) => {
                        for (key, value) in params {
                            existing.entry(key).or_insert(value);
                        }
                    }
                    None => {
                        merged.insert(group, params);
                    }
                }
            }
        }
        path.pop();
        Ok(merged)
    }

    /// Database endpoints of `job` (and its children), or of every job when `job` is `None`.
    /// Not deduplicated.
    pub fn database_info(
        &self,
        job: Option<&str>,
        include_children: bool,
    ) -> Result<Vec<DatabaseEndpoint>, ReviewError> {
        let mut endpoints = Vec::new();
        match job {
            Some(name) => {
                self.endpoints_path(name, include_children, &mut Vec::new(), &mut endpoints)?
            }
            None => {
                for job in self.jobs() {
                    endpoints.extend(job.parse()?.database_endpoints());
                }
            }
        }
        Ok(endpoints)
    }

    fn endpoints_path(
        &self,
        name: &str,
        include_children: bool,
        path: &mut Vec<String>,
        endpoints: &mut Vec<DatabaseEndpoint>,
    ) -> Result<(), ReviewError> {
        let doc = self.by_name(name)?.parse()?;
        endpoints.extend(doc.database_endpoints());
        if !include_children {
            return Ok(());
        }

        path.push(name.to_string());
        for child in &doc.children {
            if self.closes_cycle(path, child) {
                continue;
            }
            self.endpoints_path(child, true, path, endpoints)?;
        }
        path.pop();
        Ok(())
    }

    /// `{root: children…}` for a known root, an empty tree for an unknown one,
    /// and the forest of all master jobs for `None`.
    pub fn tree_view(&self, root: Option<&str>) -> Result<JobTree, ReviewError> {
        let mut tree = JobTree::new();
        match root {
            Some(root) => {
                if self.contains(root) {
                    tree.insert(root, self.subtree(root, &mut Vec::new())?);
                }
            }
            None => {
                for master in self.master_jobs()? {
                    let mut single = JobTree::new();
                    let subtree = self.subtree(&master, &mut Vec::new())?;
                    single.insert(master, subtree);
                    tree.extend(single);
                }
            }
        }
        Ok(tree)
    }

    fn subtree(&self, name: &str, path: &mut Vec<String>) -> Result<JobTree, ReviewError> {
        let doc = self.by_name(name)?.parse()?;
        let mut tree = JobTree::new();

        path.push(name.to_string());
        for child in &doc.children {
            if !self.contains(child) {
                self.sink().report(ReportEvent::UnknownChild {
                    parent: name.to_string(),
                    child: child.clone(),
                });
                tree.insert(child.as_str(), JobTree::new());
                continue;
            }
            if self.closes_cycle(path, child) {
                tree.insert(child.as_str(), JobTree::new());
                continue;
            }
            let subtree = self.subtree(child, path)?;
            tree.insert(child.as_str(), subtree);
        }
        path.pop();
        Ok(tree)
    }

    /// SQL text of `job` (and its children), or of every job when `job` is `None`.
    /// One section per visited job, sections joined by newlines.
    pub fn dump_sql(
        &self,
        job: Option<&str>,
        include_children: bool,
        header: bool,
    ) -> Result<String, ReviewError> {
        let mut sections = Vec::new();
        match job {
            Some(name) => {
                self.sql_path(name, include_children, header, &mut Vec::new(), &mut sections)?
            }
            None => {
                for job in self.jobs() {
                    sections.push(job.parse()?.sql_dump(job.name(), header));
                }
            }
        }
        Ok(sections.join("\n"))
    }

    fn sql_path(
        &self,
        name: &str,
        include_children: bool,
        header: bool,
        path: &mut Vec<String>,
        sections: &mut Vec<String>,
    ) -> Result<(), ReviewError> {
        let job = self.by_name(name)?;
        let doc = job.parse()?;
        sections.push(doc.sql_dump(job.name(), header));
        if !include_children {
            return Ok(());
        }

        path.push(name.to_string());
        for child in &doc.children {
            if self.closes_cycle(path, child) {
                continue;
            }
            self.sql_path(child, true, header, path, sections)?;
        }
        path.pop();
        Ok(())
    }

    /// Job name → node name → statement, for every job.
    pub fn dump_sql_structured(
        &self,
    ) -> Result<IndexMap<String, IndexMap<String, SqlStatement>>, ReviewError> {
        self.jobs()
            .map(|job| Ok((job.name().to_string(), job.parse()?.sql_statements())))
            .collect()
    }

    pub fn summary(&self, name: &str, include_children: bool) -> Result<JobSummary, ReviewError> {
        let job = self.by_name(name)?;
        let dbinfo: IndexSet<DatabaseEndpoint> = self
            .database_info(Some(name), include_children)?
            .into_iter()
            .collect();

        Ok(JobSummary {
            project_name: self.name().to_string(),
            author: self.author().to_string(),
            git_tags: self.tags().to_vec(),
            talend_version: self.product_version().to_string(),
            job_name: job.name().to_string(),
            repo_path: self.repository_path().to_string(),
            commit_ref: self.reference().map(str::to_string),
            errors: self.review_job(name, include_children)?,
            dbinfo: dbinfo.into_iter().collect(),
            context: self.merged_context(name)?,
            tree: self.tree_view(Some(job.name()))?,
            job_version: job.version(),
        })
    }
}
