//! Error types for secure destruction operations.

use std::io;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ShredError`.
pub type Result<T> = std::result::Result<T, ShredError>;

/// Errors that can occur while destroying a target.
///
/// Every variant that concerns a filesystem entry carries its path, so an
/// error can be attached to its target in a [`BatchReport`] without extra
/// bookkeeping.
///
/// [`BatchReport`]: crate::BatchReport
#[derive(Error, Debug)]
pub enum ShredError {
    /// The target vanished between resolution and use.
    #[error("not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The process lacks permission to open or modify the target.
    #[error("permission denied: {path}")]
    PermissionDenied {
        /// The inaccessible path.
        path: PathBuf,
    },

    /// The target is a symlink and following symlinks was not permitted, or
    /// the link does not resolve to a regular file within one hop.
    #[error("symlink skipped: {path}")]
    SymlinkSkipped {
        /// The symlink path.
        path: PathBuf,
    },

    /// A directory was given without the recursion flag.
    #[error("directory without recursion: {path}")]
    DirectoryWithoutRecursion {
        /// The directory path.
        path: PathBuf,
    },

    /// The target is not a regular file (FIFO, socket, device, ...).
    #[error("unsupported file type: {path}")]
    Unsupported {
        /// The path of the unsupported entry.
        path: PathBuf,
    },

    /// Another process holds an incompatible lock on the file.
    #[error("file is locked by another process: {path}")]
    LockConflict {
        /// The locked file.
        path: PathBuf,
    },

    /// The entry at the path is no longer the one that was resolved.
    #[error("target changed after it was resolved: {path}")]
    TargetChanged {
        /// The path whose identity changed.
        path: PathBuf,
    },

    /// An I/O operation failed while overwriting.
    ///
    /// The file is left in place. `passes_completed` passes reached their
    /// durability barrier before the failure.
    #[error("I/O error on {path} after {passes_completed} completed passes: {source}")]
    Io {
        /// The file being overwritten.
        path: PathBuf,
        /// Number of passes that were fully written and synced.
        passes_completed: usize,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// All passes completed but the entry could not be unlinked.
    #[error("content destroyed but removal failed for {path}: {source}")]
    RemovalFailed {
        /// The path that could not be removed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Cancellation was observed between passes or before the file started.
    #[error("interrupted after {passes_completed} completed passes: {path}")]
    Interrupted {
        /// The file that was left in place.
        path: PathBuf,
        /// Number of passes that were fully written and synced.
        passes_completed: usize,
    },

    /// A directory could not be traversed.
    #[error("cannot traverse {path}: {source}")]
    Walk {
        /// The entry the walker failed on.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A pass count of zero was requested.
    #[error("pass count must be at least 1")]
    InvalidPassCount,

    /// A custom pass sequence is not executable.
    #[error("invalid pass specification: {reason}")]
    InvalidPassSpec {
        /// Why the sequence was rejected.
        reason: String,
    },
}

impl ShredError {
    /// Maps an I/O error raised before any pass started.
    ///
    /// `NotFound` and `PermissionDenied` keep their own variants so callers
    /// can distinguish them from genuine device failures.
    pub(crate) fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                passes_completed: 0,
                source: err,
            },
        }
    }

    /// Returns `true` if the target was deliberately not touched.
    ///
    /// Skips are not failures of the engine, but the launcher still treats
    /// them as "not a full success".
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use wipeout_core::ShredError;
    ///
    /// let err = ShredError::NotFound {
    ///     path: PathBuf::from("gone.txt"),
    /// };
    /// assert!(err.is_skip());
    ///
    /// let err = ShredError::LockConflict {
    ///     path: PathBuf::from("busy.db"),
    /// };
    /// assert!(!err.is_skip());
    /// ```
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        match self {
            Self::NotFound { .. }
            | Self::SymlinkSkipped { .. }
            | Self::DirectoryWithoutRecursion { .. }
            | Self::Unsupported { .. } => true,
            Self::Interrupted {
                passes_completed, ..
            } => *passes_completed == 0,
            _ => false,
        }
    }

    /// Returns `true` if every pass completed and only the final unlink
    /// failed.
    ///
    /// This is the only error that guarantees the content is gone.
    #[must_use]
    pub const fn content_destroyed(&self) -> bool {
        matches!(self, Self::RemovalFailed { .. })
    }

    /// Returns the number of passes that reached their durability barrier,
    /// if the error happened during the pass sequence.
    #[must_use]
    pub const fn passes_completed(&self) -> Option<usize> {
        match self {
            Self::Io {
                passes_completed, ..
            }
            | Self::Interrupted {
                passes_completed, ..
            } => Some(*passes_completed),
            _ => None,
        }
    }

    /// Returns the path this error is attached to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::SymlinkSkipped { path }
            | Self::DirectoryWithoutRecursion { path }
            | Self::Unsupported { path }
            | Self::LockConflict { path }
            | Self::TargetChanged { path }
            | Self::Io { path, .. }
            | Self::RemovalFailed { path, .. }
            | Self::Interrupted { path, .. }
            | Self::Walk { path, .. } => Some(path),
            Self::InvalidPassCount | Self::InvalidPassSpec { .. } => None,
        }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::SymlinkSkipped { .. } => "SYMLINK_SKIPPED",
            Self::DirectoryWithoutRecursion { .. } => "DIRECTORY_WITHOUT_RECURSION",
            Self::Unsupported { .. } => "UNSUPPORTED",
            Self::LockConflict { .. } => "LOCK_CONFLICT",
            Self::TargetChanged { .. } => "TARGET_CHANGED",
            Self::Io { .. } => "IO_ERROR",
            Self::RemovalFailed { .. } => "REMOVAL_FAILED",
            Self::Interrupted { .. } => "INTERRUPTED",
            Self::Walk { .. } => "WALK_ERROR",
            Self::InvalidPassCount => "INVALID_PASS_COUNT",
            Self::InvalidPassSpec { .. } => "INVALID_PASS_SPEC",
        }
    }
}
