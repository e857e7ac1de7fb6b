//! Job file naming and the per-name version registry.

use serde::Serialize;

use crate::error::ReviewError;
use crate::source::JOB_FILE_SUFFIX;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobVersion {
    pub version: f64,
    pub job_id: String,
}

/// Versions stored for one job name. `latest` is the greatest version registered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobVersions {
    entries: Vec<JobVersion>,
    latest: f64,
}

impl JobVersions {
    pub fn new(version: f64, job_id: impl Into<String>) -> Self {
        JobVersions {
            entries: vec![JobVersion {
                version,
                job_id: job_id.into(),
            }],
            latest: version,
        }
    }

    /// Add a version; re-registering a version replaces its job id.
    pub fn register(&mut self, version: f64, job_id: impl Into<String>) {
        let job_id = job_id.into();
        match self.entries.iter_mut().find(|e| e.version == version) {
            Some(entry) => entry.job_id = job_id,
            None => self.entries.push(JobVersion { version, job_id }),
        }
        if version > self.latest {
            self.latest = version;
        }
    }

    pub fn latest(&self) -> f64 {
        self.latest
    }

    pub fn latest_id(&self) -> Option<&str> {
        self.get(self.latest)
    }

    pub fn get(&self, version: f64) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.version == version)
            .map(|e| e.job_id.as_str())
    }

    /// Registered versions in discovery order.
    pub fn versions(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.version)
    }
}

/// Split `…/<name>_<version>.item` into job name and version.
pub fn split_job_path(path: &str) -> Result<(String, f64), ReviewError> {
    let invalid = |why: &str| {
        ReviewError::parse(
            "P005",
            format!("Job file '{}' does not follow <name>_<version>.item: {}", path, why),
        )
    };

    let file = path.rsplit('/').next().unwrap_or(path);
    let stem = file
        .strip_suffix(JOB_FILE_SUFFIX)
        .ok_or_else(|| invalid("wrong extension"))?;
    let (name, version) = stem
        .rsplit_once('_')
        .ok_or_else(|| invalid("no version suffix"))?;
    if name.is_empty() {
        return Err(invalid("empty job name"));
    }
    let version: f64 = version
        .parse()
        .map_err(|_| invalid("version is not a number"))?;
    if !version.is_finite() {
        return Err(invalid("version is not a number"));
    }
    Ok((name.to_string(), version))
}
