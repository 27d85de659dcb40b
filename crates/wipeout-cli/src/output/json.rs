//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io;
use std::io::Write;
use wipeout_core::BatchPlan;
use wipeout_core::BatchReport;
use wipeout_core::DirectoryOutcome;
use wipeout_core::DirectoryRemoval;
use wipeout_core::OverwriteResult;
use wipeout_core::PlannedTarget;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct PlanOutput {
    passes: usize,
    total_files: usize,
    total_bytes: u64,
    bytes_to_write: u64,
    targets: Vec<PlannedTargetOutput>,
}

#[derive(Serialize)]
struct PlannedTargetOutput {
    path: String,
    kind: &'static str,
    files: usize,
    bytes: u64,
    skipped_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_reason: Option<String>,
}

impl From<&PlannedTarget> for PlannedTargetOutput {
    fn from(target: &PlannedTarget) -> Self {
        Self {
            path: target.path.display().to_string(),
            kind: target.kind.as_str(),
            files: target.files,
            bytes: target.bytes,
            skipped_entries: target.skipped_entries,
            skip_reason: target.skip.as_ref().map(ToString::to_string),
        }
    }
}

#[derive(Serialize)]
struct ReportOutput {
    succeeded: usize,
    failed: usize,
    skipped: usize,
    directories_removed: usize,
    directories_retained: usize,
    directories_failed: usize,
    bytes_overwritten: u64,
    duration_ms: u128,
    interrupted: bool,
    targets: Vec<TargetOutput>,
    directories: Vec<DirectoryOutput>,
}

#[derive(Serialize)]
struct TargetOutput {
    path: String,
    status: &'static str,
    passes_completed: usize,
    bytes_overwritten: u64,
    removed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    content_destroyed: bool,
}

impl From<&OverwriteResult> for TargetOutput {
    fn from(result: &OverwriteResult) -> Self {
        let error = result.error();
        Self {
            path: result.path().display().to_string(),
            status: result.status().as_str(),
            passes_completed: result.passes_completed(),
            bytes_overwritten: result.bytes_overwritten(),
            removed: result.removed(),
            error_code: error.map(wipeout_core::ShredError::code),
            error: error.map(ToString::to_string),
            content_destroyed: result.is_success()
                || error.is_some_and(wipeout_core::ShredError::content_destroyed),
        }
    }
}

#[derive(Serialize)]
struct DirectoryOutput {
    path: String,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&DirectoryRemoval> for DirectoryOutput {
    fn from(dir: &DirectoryRemoval) -> Self {
        let (outcome, error) = match &dir.outcome {
            DirectoryOutcome::Removed => ("removed", None),
            DirectoryOutcome::Retained => ("retained", None),
            DirectoryOutcome::Failed(err) => ("failed", Some(err.to_string())),
        };
        Self {
            path: dir.path.display().to_string(),
            outcome,
            error,
        }
    }
}

fn report_output(report: &BatchReport) -> ReportOutput {
    let summary = report.summary();
    ReportOutput {
        succeeded: summary.succeeded,
        failed: summary.failed,
        skipped: summary.skipped,
        directories_removed: summary.directories_removed,
        directories_retained: summary.directories_retained,
        directories_failed: summary.directories_failed,
        bytes_overwritten: report.bytes_overwritten(),
        duration_ms: report.duration.as_millis(),
        interrupted: report.interrupted,
        targets: report.results.iter().map(TargetOutput::from).collect(),
        directories: report.directories.iter().map(DirectoryOutput::from).collect(),
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_plan(&self, plan: &BatchPlan) -> Result<()> {
        let data = PlanOutput {
            passes: plan.passes.get(),
            total_files: plan.total_files(),
            total_bytes: plan.total_bytes(),
            bytes_to_write: plan.bytes_to_write(),
            targets: plan.targets.iter().map(PlannedTargetOutput::from).collect(),
        };
        Self::output(&JsonOutput::success("plan", data))
    }

    fn format_report(&self, report: &BatchReport) -> Result<()> {
        let data = report_output(report);
        if report.is_success() {
            return Self::output(&JsonOutput::success("shred", data));
        }

        let message = if report.interrupted {
            "interrupted".to_string()
        } else {
            format!(
                "{} of {} targets not destroyed",
                data.failed + data.skipped,
                data.targets.len()
            )
        };
        Self::output(&JsonOutput::partial("shred", data, message))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("unknown", format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_success(&self, message: &str) {
        #[derive(Serialize)]
        struct SuccessData {
            message: String,
        }

        let output = JsonOutput::success(
            "unknown",
            SuccessData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        // Keep stdout a single JSON document.
        let _ = writeln!(io::stderr(), "warning: {message}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use wipeout_core::ShredError;

    #[test]
    fn test_report_output_structure() {
        let report = BatchReport {
            directories: vec![DirectoryRemoval {
                path: PathBuf::from("root"),
                outcome: DirectoryOutcome::Retained,
            }],
            ..BatchReport::default()
        };
        let json = serde_json::to_value(report_output(&report)).unwrap();

        assert_eq!(json["succeeded"], 0);
        assert_eq!(json["directories_retained"], 1);
        assert_eq!(json["directories"][0]["outcome"], "retained");
        assert!(json["directories"][0].get("error").is_none());
    }

    #[test]
    fn test_envelope_error_keeps_data() {
        let output = JsonOutput::partial("shred", 5, "1 of 2 targets not destroyed");
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["data"], 5);

        let skipped = ShredError::NotFound {
            path: PathBuf::from("gone"),
        };
        assert_eq!(skipped.code(), "NOT_FOUND");
    }
}
