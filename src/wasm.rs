//! WASM entry points for browser use.

use std::sync::Arc;

use indexmap::IndexMap;
use wasm_bindgen::prelude::*;

use crate::config::ProjectOptions;
use crate::error::ReviewError;
use crate::project::{JobSummary, Project};
use crate::rules::ReviewReport;
use crate::sink::NoopSink;
use crate::source::InMemorySource;

/// Review a single job document.
/// Returns `{status: "success", report}` or `{status: "errors", errors}`.
#[wasm_bindgen]
pub fn review_job_xml(job_name: &str, xml: &str) -> JsValue {
    let result = review_job_xml_inner(job_name, xml);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn review_job_xml_inner(job_name: &str, xml: &str) -> ReviewResult {
    match crate::document::parse_job(xml.as_bytes()) {
        Ok(doc) => ReviewResult::Success {
            report: crate::rules::review_document(job_name, &doc),
        },
        Err(e) => ReviewResult::Errors {
            errors: vec![ErrorDto::from(e.in_job(job_name))],
        },
    }
}

/// Summarize `job` within a project given as a JSON object of path → file content.
/// The object must contain `talend.project` and the `.item` files.
#[wasm_bindgen]
pub fn review_project(files_json: &str, job: &str) -> JsValue {
    let result = review_project_inner(files_json, job);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn review_project_inner(files_json: &str, job: &str) -> SummaryResult {
    let files = match serde_json::from_str::<IndexMap<String, String>>(files_json) {
        Ok(files) => files,
        Err(e) => {
            return SummaryResult::Errors {
                errors: vec![ErrorDto {
                    code: "P001".into(),
                    phase: "Parse".into(),
                    message: format!("Failed to parse project files JSON: {}", e),
                    job: None,
                }],
            };
        }
    };

    let mut source = InMemorySource::new();
    for (path, content) in files {
        source.insert(path, content);
    }

    let summary = Project::load(
        &ProjectOptions::default(),
        Arc::new(source),
        Arc::new(NoopSink),
    )
    .and_then(|project| project.summary(job, true));

    match summary {
        Ok(summary) => SummaryResult::Success {
            summary: Box::new(summary),
        },
        Err(e) => SummaryResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    job: Option<String>,
}

impl From<ReviewError> for ErrorDto {
    fn from(e: ReviewError) -> Self {
        ErrorDto {
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            job: e.job,
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum ReviewResult {
    #[serde(rename = "success")]
    Success { report: ReviewReport },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum SummaryResult {
    #[serde(rename = "success")]
    Success { summary: Box<JobSummary> },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}
