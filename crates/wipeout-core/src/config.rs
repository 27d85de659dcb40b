//! Batch configuration.

use crate::PassCount;
use crate::pattern::PassSpec;
use crate::pattern::patterns_for;

/// Options applied uniformly to every target of a batch.
///
/// # Examples
///
/// ```
/// use wipeout_core::PassCount;
/// use wipeout_core::ShredConfig;
///
/// // Secure defaults: 7 passes, no recursion, symlinks skipped
/// let config = ShredConfig::default();
/// assert_eq!(config.passes, PassCount::STANDARD);
///
/// let custom = ShredConfig::default()
///     .with_recursive(true)
///     .with_passes(PassCount::PARANOID)
///     .with_workers(4);
/// assert_eq!(custom.workers, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShredConfig {
    /// Number of overwrite passes per file.
    ///
    /// Default: [`PassCount::STANDARD`] (7).
    pub passes: PassCount,

    /// Descend into directories given as input.
    ///
    /// Default: `false`. A directory given without recursion is skipped.
    pub recursive: bool,

    /// Follow one layer of symlink when the link points at a regular file.
    ///
    /// Default: `false` (symlinks are skipped and their targets untouched).
    /// Symlinks met inside a directory tree are never followed.
    pub follow_symlinks: bool,

    /// Rename each file to a random name before unlinking it, so the
    /// original name does not survive in the directory entry.
    ///
    /// Default: `true`.
    pub rename_before_unlink: bool,

    /// Number of files overwritten concurrently.
    ///
    /// Default: `1`. Values below 1 are treated as 1.
    pub workers: usize,
}

impl Default for ShredConfig {
    fn default() -> Self {
        Self {
            passes: PassCount::STANDARD,
            recursive: false,
            follow_symlinks: false,
            rename_before_unlink: true,
            workers: 1,
        }
    }
}

impl ShredConfig {
    /// Sets the pass count.
    #[must_use]
    pub fn with_passes(mut self, passes: PassCount) -> Self {
        self.passes = passes;
        self
    }

    /// Enables or disables recursion into directories.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Enables or disables following symlinked inputs.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Enables or disables the random rename before unlink.
    #[must_use]
    pub fn with_rename_before_unlink(mut self, rename: bool) -> Self {
        self.rename_before_unlink = rename;
        self
    }

    /// Sets the worker count (clamped to at least 1).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Pass sequence derived from [`passes`](Self::passes).
    #[must_use]
    pub fn pass_spec(&self) -> PassSpec {
        patterns_for(self.passes)
    }

    pub(crate) fn effective_workers(&self) -> usize {
        self.workers.max(1)
    }
}
