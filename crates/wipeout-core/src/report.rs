//! Per-target results and batch reporting.

use crate::ShredError;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Derived outcome of one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetStatus {
    /// Every pass completed and the entry was removed.
    Succeeded,
    /// The target was deliberately left untouched.
    Skipped,
    /// Destruction was attempted and did not fully succeed.
    Failed,
}

impl TargetStatus {
    /// Lowercase name, for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

/// Result of destroying one file target.
///
/// Produced once by the engine (or by the orchestrator for targets it never
/// hands to the engine) and read only through accessors afterwards.
#[derive(Debug)]
pub struct OverwriteResult {
    path: PathBuf,
    passes_completed: usize,
    bytes_overwritten: u64,
    removed: bool,
    error: Option<ShredError>,
    duration: Duration,
}

impl OverwriteResult {
    pub(crate) fn new(
        path: PathBuf,
        passes_completed: usize,
        bytes_overwritten: u64,
        removed: bool,
        error: Option<ShredError>,
        duration: Duration,
    ) -> Self {
        Self {
            path,
            passes_completed,
            bytes_overwritten,
            removed,
            error,
            duration,
        }
    }

    /// Result for a target that was rejected before any pass ran.
    pub(crate) fn rejected(path: &Path, error: ShredError) -> Self {
        let passes_completed = error.passes_completed().unwrap_or(0);
        Self::new(
            path.to_path_buf(),
            passes_completed,
            0,
            false,
            Some(error),
            Duration::ZERO,
        )
    }

    /// Path the caller asked to destroy.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Passes that reached their durability barrier.
    #[must_use]
    pub const fn passes_completed(&self) -> usize {
        self.passes_completed
    }

    /// Total bytes written across all completed passes.
    #[must_use]
    pub const fn bytes_overwritten(&self) -> u64 {
        self.bytes_overwritten
    }

    /// Whether the final unlink succeeded.
    #[must_use]
    pub const fn removed(&self) -> bool {
        self.removed
    }

    /// Error that ended processing, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ShredError> {
        self.error.as_ref()
    }

    /// Wall-clock time spent on this target.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Outcome classification.
    #[must_use]
    pub const fn status(&self) -> TargetStatus {
        match &self.error {
            None if self.removed => TargetStatus::Succeeded,
            None => TargetStatus::Failed,
            Some(err) if err.is_skip() => TargetStatus::Skipped,
            Some(_) => TargetStatus::Failed,
        }
    }

    /// Shorthand for `status() == TargetStatus::Succeeded`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status(), TargetStatus::Succeeded)
    }
}

/// What happened to a directory after its contents were processed.
#[derive(Debug)]
pub enum DirectoryOutcome {
    /// The directory was empty and has been removed.
    Removed,
    /// Left in place because some content was not destroyed or the batch
    /// was interrupted.
    Retained,
    /// Removal was attempted and failed.
    Failed(ShredError),
}

/// Removal outcome of one directory, reported bottom-up.
#[derive(Debug)]
pub struct DirectoryRemoval {
    /// Directory path.
    pub path: PathBuf,
    /// Outcome.
    pub outcome: DirectoryOutcome,
}

impl DirectoryRemoval {
    /// Returns `true` if the directory is gone.
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        matches!(self.outcome, DirectoryOutcome::Removed)
    }
}

/// Summary counts of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// File targets destroyed and removed.
    pub succeeded: usize,
    /// File targets that failed.
    pub failed: usize,
    /// File targets skipped.
    pub skipped: usize,
    /// Directories removed.
    pub directories_removed: usize,
    /// Directories left in place.
    pub directories_retained: usize,
    /// Directories whose removal failed.
    pub directories_failed: usize,
}

/// Aggregated outcome of a batch run.
///
/// File results are in input order, then walk order within a directory.
/// Directory removals are in bottom-up order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per file target.
    pub results: Vec<OverwriteResult>,

    /// One entry per directory encountered under a recursive root.
    pub directories: Vec<DirectoryRemoval>,

    /// Duration of the whole batch.
    pub duration: Duration,

    /// Whether cancellation was requested while the batch ran.
    pub interrupted: bool,
}

impl BatchReport {
    /// Counts outcomes by status.
    #[must_use]
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for result in &self.results {
            match result.status() {
                TargetStatus::Succeeded => summary.succeeded += 1,
                TargetStatus::Skipped => summary.skipped += 1,
                TargetStatus::Failed => summary.failed += 1,
            }
        }
        for dir in &self.directories {
            match dir.outcome {
                DirectoryOutcome::Removed => summary.directories_removed += 1,
                DirectoryOutcome::Retained => summary.directories_retained += 1,
                DirectoryOutcome::Failed(_) => summary.directories_failed += 1,
            }
        }
        summary
    }

    /// Returns `true` only when every target and directory was destroyed
    /// and the batch was not interrupted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.interrupted
            && self.results.iter().all(OverwriteResult::is_success)
            && self.directories.iter().all(DirectoryRemoval::is_removed)
    }

    /// Total bytes written across every target.
    #[must_use]
    pub fn bytes_overwritten(&self) -> u64 {
        self.results.iter().map(OverwriteResult::bytes_overwritten).sum()
    }

    /// Results that were not successful.
    pub fn problems(&self) -> impl Iterator<Item = &OverwriteResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

/// Callback trait for progress reporting during a batch.
///
/// Callbacks are invoked only on the thread that called
/// [`Shredder::run_with_progress`](crate::Shredder::run_with_progress), even
/// when files are overwritten by several workers.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use wipeout_core::OverwriteResult;
/// use wipeout_core::ProgressCallback;
///
/// struct Printer;
///
/// impl ProgressCallback for Printer {
///     fn on_target_start(&mut self, path: &Path) {
///         println!("shredding {}", path.display());
///     }
///
///     fn on_pass_complete(&mut self, path: &Path, pass: usize, total: usize) {
///         println!("  {} pass {pass}/{total}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_target_complete(&mut self, result: &OverwriteResult) {
///         println!("  {}", result.status().as_str());
///     }
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called when a worker starts on a file.
    fn on_target_start(&mut self, path: &Path);

    /// Called after pass `pass` (1-based) of `total` reached its durability
    /// barrier.
    fn on_pass_complete(&mut self, path: &Path, pass: usize, total: usize);

    /// Called with the number of bytes written by a completed pass.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called once per target, including skipped ones.
    fn on_target_complete(&mut self, result: &OverwriteResult);

    /// Called when the whole batch is finished.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_target_start(&mut self, _path: &Path) {}

    fn on_pass_complete(&mut self, _path: &Path, _pass: usize, _total: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_target_complete(&mut self, _result: &OverwriteResult) {}

    fn on_complete(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn succeeded(path: &str) -> OverwriteResult {
        OverwriteResult::new(PathBuf::from(path), 3, 300, true, None, Duration::ZERO)
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(succeeded("a").status(), TargetStatus::Succeeded);

        let skipped = OverwriteResult::rejected(
            Path::new("b"),
            ShredError::NotFound {
                path: PathBuf::from("b"),
            },
        );
        assert_eq!(skipped.status(), TargetStatus::Skipped);
        assert_eq!(skipped.passes_completed(), 0);

        let failed = OverwriteResult::new(
            PathBuf::from("c"),
            2,
            200,
            false,
            Some(ShredError::Io {
                path: PathBuf::from("c"),
                passes_completed: 2,
                source: io::Error::other("boom"),
            }),
            Duration::ZERO,
        );
        assert_eq!(failed.status(), TargetStatus::Failed);
    }

    #[test]
    fn test_removal_failure_keeps_passes() {
        let result = OverwriteResult::new(
            PathBuf::from("d"),
            7,
            700,
            false,
            Some(ShredError::RemovalFailed {
                path: PathBuf::from("d"),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            }),
            Duration::ZERO,
        );
        assert_eq!(result.status(), TargetStatus::Failed);
        assert_eq!(result.passes_completed(), 7);
        assert!(result.error().is_some_and(ShredError::content_destroyed));
    }

    #[test]
    fn test_summary_and_success() {
        let mut report = BatchReport {
            results: vec![succeeded("a"), succeeded("b")],
            directories: vec![DirectoryRemoval {
                path: PathBuf::from("root"),
                outcome: DirectoryOutcome::Removed,
            }],
            ..BatchReport::default()
        };
        assert!(report.is_success());
        assert_eq!(report.bytes_overwritten(), 600);
        assert_eq!(report.summary().succeeded, 2);
        assert_eq!(report.summary().directories_removed, 1);

        report.directories.push(DirectoryRemoval {
            path: PathBuf::from("other"),
            outcome: DirectoryOutcome::Retained,
        });
        assert!(!report.is_success());
        assert_eq!(report.summary().directories_retained, 1);
    }

    #[test]
    fn test_interrupted_is_not_success() {
        let report = BatchReport {
            interrupted: true,
            ..BatchReport::default()
        };
        assert!(!report.is_success());
    }
}
