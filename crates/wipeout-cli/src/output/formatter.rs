//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use wipeout_core::BatchPlan;
use wipeout_core::BatchReport;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the dry-run preview of a batch
    fn format_plan(&self, plan: &BatchPlan) -> Result<()>;

    /// Format the outcome of a batch
    fn format_report(&self, report: &BatchReport) -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);

    /// Format success message
    fn format_success(&self, message: &str);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    /// Error envelope that still carries the data, for partial results.
    pub fn partial(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: Some(data),
            error: Some(error.into()),
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
