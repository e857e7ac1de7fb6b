//! Unified review error type used across loading, parsing and lookup.

use crate::source::SourceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Source,
    Parse,
    Lookup,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Source => write!(f, "Source"),
            Phase::Parse => write!(f, "Parse"),
            Phase::Lookup => write!(f, "Lookup"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    /// Job the error belongs to, when known.
    pub job: Option<String>,
}

impl std::fmt::Display for ReviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.job {
            Some(job) => write!(
                f,
                "[{}:{}] {} (job '{}')",
                self.phase, self.code, self.message, job
            ),
            None => write!(f, "[{}:{}] {}", self.phase, self.code, self.message),
        }
    }
}

impl std::error::Error for ReviewError {}

impl From<SourceError> for ReviewError {
    fn from(e: SourceError) -> Self {
        ReviewError::source(e.to_string())
    }
}

impl ReviewError {
    pub fn source(message: impl Into<String>) -> Self {
        ReviewError {
            code: "S001".into(),
            phase: Phase::Source,
            message: message.into(),
            job: None,
        }
    }

    pub fn parse(code: &str, message: impl Into<String>) -> Self {
        ReviewError {
            code: code.into(),
            phase: Phase::Parse,
            message: message.into(),
            job: None,
        }
    }

    pub fn unknown_job(name: &str) -> Self {
        ReviewError {
            code: "R001".into(),
            phase: Phase::Lookup,
            message: format!("Unknown job '{}'", name),
            job: Some(name.to_string()),
        }
    }

    /// Attach the job the error occurred in, keeping an already recorded one.
    pub fn in_job(mut self, job: &str) -> Self {
        if self.job.is_none() {
            self.job = Some(job.to_string());
        }
        self
    }
}
