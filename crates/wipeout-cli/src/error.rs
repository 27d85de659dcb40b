//! User-facing explanations for core errors.
//!
//! Turns wipeout-core's typed errors into a message plus a `HINT:` line
//! where there is something the user can do about it.

use wipeout_core::ShredError;

/// Explains `err` for the terminal, one problem per call.
pub fn explain(err: &ShredError) -> String {
    match err {
        ShredError::PermissionDenied { path } => format!(
            "Permission denied: {}\n\
             HINT: Check ownership and write permission on the file and its directory.",
            path.display()
        ),
        ShredError::LockConflict { path } => format!(
            "File is in use: {}\n\
             HINT: Another process holds a lock on it. Close it and run again.",
            path.display()
        ),
        ShredError::SymlinkSkipped { path } => format!(
            "Symlink skipped: {}\n\
             HINT: Use --follow-symlinks to destroy the file a top-level link points to.",
            path.display()
        ),
        ShredError::DirectoryWithoutRecursion { path } => format!(
            "Is a directory: {}\n\
             HINT: Use -r to destroy directories and their contents.",
            path.display()
        ),
        ShredError::Io {
            path,
            passes_completed,
            source,
        } => format!(
            "I/O error on {} after {passes_completed} completed passes: {source}\n\
             HINT: The file was left in place and may still hold readable data.",
            path.display()
        ),
        ShredError::RemovalFailed { path, source } => format!(
            "Could not remove {}: {source}\n\
             HINT: Its contents were already overwritten; delete the entry manually.",
            path.display()
        ),
        ShredError::TargetChanged { path } => format!(
            "Target changed while it was being processed: {}\n\
             HINT: Something replaced the entry; inspect it before running again.",
            path.display()
        ),
        ShredError::Interrupted {
            path,
            passes_completed,
        } => format!(
            "Interrupted after {passes_completed} completed passes: {}\n\
             HINT: The file was left in place. Run again to finish.",
            path.display()
        ),
        other => {
            let mut text = other.to_string();
            if let Some(first) = text.get(..1) {
                let upper = first.to_uppercase();
                text.replace_range(..1, &upper);
            }
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_explain_symlink_hint() {
        let msg = explain(&ShredError::SymlinkSkipped {
            path: PathBuf::from("link"),
        });
        assert!(msg.contains("link"));
        assert!(msg.contains("--follow-symlinks"));
    }

    #[test]
    fn test_explain_directory_hint() {
        let msg = explain(&ShredError::DirectoryWithoutRecursion {
            path: PathBuf::from("dir"),
        });
        assert!(msg.contains("HINT: Use -r"));
    }

    #[test]
    fn test_explain_removal_failed_mentions_overwritten() {
        let msg = explain(&ShredError::RemovalFailed {
            path: PathBuf::from("f"),
            source: io::Error::other("busy"),
        });
        assert!(msg.contains("already overwritten"));
        assert!(msg.contains("busy"));
    }

    #[test]
    fn test_explain_io_reports_passes() {
        let msg = explain(&ShredError::Io {
            path: PathBuf::from("f"),
            passes_completed: 2,
            source: io::Error::other("device gone"),
        });
        assert!(msg.contains("after 2 completed passes"));
        assert!(msg.contains("left in place"));
    }

    #[test]
    fn test_explain_fallback_capitalizes() {
        let msg = explain(&ShredError::NotFound {
            path: PathBuf::from("gone"),
        });
        assert_eq!(msg, "Not found: gone");
    }
}
