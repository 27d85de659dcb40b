//! Resolved destruction targets.

use crate::Result;
use crate::ShredError;
use std::fs;
use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// Filesystem type of a target, as observed without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (never followed during resolution).
    Symlink,
    /// Nothing exists at the path.
    Missing,
    /// FIFO, socket, block or character device.
    Other,
}

impl TargetKind {
    fn of(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }

    /// Short lowercase name, for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Missing => "missing",
            Self::Other => "other",
        }
    }
}

/// Device/inode pair identifying a filesystem object on Unix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FileIdentity {
    dev: u64,
    ino: u64,
}

impl FileIdentity {
    #[cfg(unix)]
    fn of(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    fn of(_metadata: &Metadata) -> Option<Self> {
        None
    }
}

/// A path plus the kind of entry found there when it was resolved.
///
/// Targets are resolved once, when a batch starts or when the walker reaches
/// them, and re-validated immediately before anything destructive happens.
/// On Unix the device and inode number are captured so a path that has been
/// swapped for a different file is detected.
///
/// # Examples
///
/// ```
/// use wipeout_core::Target;
/// use wipeout_core::TargetKind;
///
/// let target = Target::resolve("/definitely/not/here")?;
/// assert_eq!(target.kind(), TargetKind::Missing);
/// # Ok::<(), wipeout_core::ShredError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    path: PathBuf,
    kind: TargetKind,
    len: u64,
    identity: Option<FileIdentity>,
}

impl Target {
    /// Resolves the entry at `path` without following symlinks.
    ///
    /// A missing path is not an error: it resolves to
    /// [`TargetKind::Missing`].
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` or `Io` if the entry cannot be inspected.
    pub fn resolve(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match fs::symlink_metadata(&path) {
            Ok(metadata) => Ok(Self::from_metadata(path, &metadata)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::missing(path)),
            Err(err) => Err(ShredError::from_io(&path, err)),
        }
    }

    /// Builds a target from metadata that was obtained without following
    /// symlinks.
    pub(crate) fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        let kind = TargetKind::of(metadata);
        let len = if kind == TargetKind::File {
            metadata.len()
        } else {
            0
        };
        Self {
            path,
            kind,
            len,
            identity: FileIdentity::of(metadata),
        }
    }

    fn missing(path: PathBuf) -> Self {
        Self {
            path,
            kind: TargetKind::Missing,
            len: 0,
            identity: None,
        }
    }

    /// Path of the target.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Kind observed at resolution time.
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Size in bytes at resolution time (0 for anything but regular files).
    ///
    /// Informational only: the engine uses the size observed on the open
    /// handle for the actual passes.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` if the target had no payload at resolution time.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Checks that the path still refers to the entry that was resolved.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the entry disappeared
    /// - `TargetChanged` if its kind or identity differ
    pub fn revalidate(&self) -> Result<()> {
        let metadata = fs::symlink_metadata(&self.path)
            .map_err(|err| ShredError::from_io(&self.path, err))?;
        if self.matches(&metadata) {
            Ok(())
        } else {
            Err(ShredError::TargetChanged {
                path: self.path.clone(),
            })
        }
    }

    /// Returns `true` if `metadata` describes the same entry.
    pub(crate) fn matches(&self, metadata: &Metadata) -> bool {
        TargetKind::of(metadata) == self.kind && FileIdentity::of(metadata) == self.identity
    }
}
