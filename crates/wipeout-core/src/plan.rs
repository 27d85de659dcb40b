//! Dry run: what a batch would destroy.
//!
//! [`plan`] resolves and walks inputs exactly like [`run`](crate::run) but
//! only reads metadata. Nothing is opened for writing and nothing is
//! removed.

use crate::PassCount;
use crate::ShredConfig;
use crate::ShredError;
use crate::Target;
use crate::TargetKind;
use crate::walker::enumerate;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

/// What would happen to one input path.
#[derive(Debug)]
pub struct PlannedTarget {
    /// The input path.
    pub path: PathBuf,
    /// Kind of entry at the path.
    pub kind: TargetKind,
    /// Regular files that would be overwritten.
    pub files: usize,
    /// Bytes those files hold.
    pub bytes: u64,
    /// Entries under a directory that would be skipped (symlinks, special
    /// files, unreadable entries); their ancestors would be retained.
    pub skipped_entries: usize,
    /// Why the whole target would be skipped, if it would.
    pub skip: Option<ShredError>,
}

impl PlannedTarget {
    fn new(path: &Path, kind: TargetKind) -> Self {
        Self {
            path: path.to_path_buf(),
            kind,
            files: 0,
            bytes: 0,
            skipped_entries: 0,
            skip: None,
        }
    }

    fn skipped(path: &Path, kind: TargetKind, reason: ShredError) -> Self {
        Self {
            skip: Some(reason),
            ..Self::new(path, kind)
        }
    }

    /// Returns `true` if the target would be processed.
    #[must_use]
    pub const fn will_process(&self) -> bool {
        self.skip.is_none()
    }
}

/// Dry-run result for a batch.
#[derive(Debug)]
pub struct BatchPlan {
    /// One entry per input path, in input order.
    pub targets: Vec<PlannedTarget>,
    /// Passes each file would receive.
    pub passes: PassCount,
}

impl BatchPlan {
    /// Files that would be overwritten.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.targets.iter().map(|t| t.files).sum()
    }

    /// Bytes held by those files.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.targets.iter().map(|t| t.bytes).sum()
    }

    /// Bytes that all passes together would write.
    #[must_use]
    pub fn bytes_to_write(&self) -> u64 {
        self.total_bytes()
            .saturating_mul(self.passes.get() as u64)
    }

    /// Returns `true` if at least one target would be processed.
    #[must_use]
    pub fn has_work(&self) -> bool {
        self.targets.iter().any(PlannedTarget::will_process)
    }
}

/// Describes what [`run`](crate::run) would do with `paths` and `config`.
///
/// A symlink input counts as one file only when `follow_symlinks` is set and
/// the link points directly at a regular file.
///
/// # Examples
///
/// ```no_run
/// use wipeout_core::ShredConfig;
/// use wipeout_core::plan;
///
/// let config = ShredConfig::default().with_recursive(true);
/// let plan = plan(&["old-project"], &config);
/// println!(
///     "{} files, {} bytes, {} bytes to write",
///     plan.total_files(),
///     plan.total_bytes(),
///     plan.bytes_to_write()
/// );
/// ```
pub fn plan<P: AsRef<Path>>(paths: &[P], config: &ShredConfig) -> BatchPlan {
    let targets = paths
        .iter()
        .map(|path| plan_one(path.as_ref(), config))
        .collect();
    BatchPlan {
        targets,
        passes: config.passes,
    }
}

fn plan_one(path: &Path, config: &ShredConfig) -> PlannedTarget {
    let target = match Target::resolve(path) {
        Ok(target) => target,
        Err(err) => return PlannedTarget::skipped(path, TargetKind::Missing, err),
    };
    let kind = target.kind();
    let owned = || path.to_path_buf();

    match kind {
        TargetKind::File => PlannedTarget {
            files: 1,
            bytes: target.len(),
            ..PlannedTarget::new(path, kind)
        },
        TargetKind::Symlink => plan_symlink(&target, config.follow_symlinks),
        TargetKind::Directory if config.recursive => plan_tree(&target),
        TargetKind::Directory => PlannedTarget::skipped(
            path,
            kind,
            ShredError::DirectoryWithoutRecursion { path: owned() },
        ),
        TargetKind::Missing => {
            PlannedTarget::skipped(path, kind, ShredError::NotFound { path: owned() })
        }
        TargetKind::Other => {
            PlannedTarget::skipped(path, kind, ShredError::Unsupported { path: owned() })
        }
    }
}

fn plan_symlink(link: &Target, follow: bool) -> PlannedTarget {
    let path = link.path();
    let skipped = || {
        PlannedTarget::skipped(
            path,
            TargetKind::Symlink,
            ShredError::SymlinkSkipped {
                path: path.to_path_buf(),
            },
        )
    };
    if !follow {
        return skipped();
    }

    let Ok(destination) = std::fs::read_link(path) else {
        return skipped();
    };
    let destination = match path.parent() {
        Some(parent) if destination.is_relative() => parent.join(destination),
        _ => destination,
    };
    match Target::resolve(destination) {
        Ok(resolved) if resolved.kind() == TargetKind::File => PlannedTarget {
            files: 1,
            bytes: resolved.len(),
            ..PlannedTarget::new(path, TargetKind::Symlink)
        },
        _ => skipped(),
    }
}

fn plan_tree(root: &Target) -> PlannedTarget {
    let mut planned = PlannedTarget::new(root.path(), TargetKind::Directory);
    let walker = match enumerate(root.path(), true) {
        Ok(walker) => walker,
        Err(err) => {
            planned.skip = Some(err);
            return planned;
        }
    };

    for item in walker {
        match item {
            Ok(entry) => match entry.kind() {
                TargetKind::File => {
                    planned.files += 1;
                    planned.bytes += entry.len();
                }
                TargetKind::Directory => {}
                _ => planned.skipped_entries += 1,
            },
            Err(err) => {
                debug!(error = %err, "entry unreadable during planning");
                planned.skipped_entries += 1;
            }
        }
    }
    planned
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_plan_counts_files_and_bytes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("a"), [0u8; 10]).unwrap();
        fs::write(root.join("sub/b"), [0u8; 5]).unwrap();
        let single = temp.path().join("single");
        fs::write(&single, [0u8; 3]).unwrap();

        let config = ShredConfig::default()
            .with_recursive(true)
            .with_passes(PassCount::QUICK);
        let plan = plan(&[&root, &single], &config);

        assert_eq!(plan.targets.len(), 2);
        assert_eq!(plan.targets[0].files, 2);
        assert_eq!(plan.targets[0].bytes, 15);
        assert_eq!(plan.total_files(), 3);
        assert_eq!(plan.total_bytes(), 18);
        assert_eq!(plan.bytes_to_write(), 54);
        assert!(plan.has_work());
        assert!(root.join("sub/b").exists());
    }

    #[test]
    fn test_plan_reports_skips() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();

        let plan = plan(&[dir, temp.path().join("gone")], &ShredConfig::default());
        assert!(matches!(
            plan.targets[0].skip,
            Some(ShredError::DirectoryWithoutRecursion { .. })
        ));
        assert!(matches!(
            plan.targets[1].skip,
            Some(ShredError::NotFound { .. })
        ));
        assert!(!plan.has_work());
    }

    #[cfg(unix)]
    #[test]
    fn test_plan_symlink_depends_on_follow() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("real");
        let link = temp.path().join("link");
        fs::write(&file, [1u8; 4]).unwrap();
        std::os::unix::fs::symlink("real", &link).unwrap();

        let skipped = plan(&[&link], &ShredConfig::default());
        assert!(!skipped.targets[0].will_process());

        let followed = plan(&[&link], &ShredConfig::default().with_follow_symlinks(true));
        assert_eq!(followed.targets[0].files, 1);
        assert_eq!(followed.targets[0].bytes, 4);
    }
}
