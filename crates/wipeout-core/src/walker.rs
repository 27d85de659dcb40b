//! Contents-first directory enumeration.
//!
//! The walker yields every entry under a root exactly once, children before
//! the directory that contains them, so a consumer that destroys files as
//! they arrive can remove each directory once it is reached. Symlinks are
//! yielded as [`TargetKind::Symlink`] and never followed, including a
//! symlinked root.

use crate::Result;
use crate::ShredError;
use crate::Target;
use crate::TargetKind;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Lazy depth-first iterator over the entries of a tree.
///
/// Entries within a directory are sorted by file name, so the order is
/// deterministic. Traversal errors are yielded as [`ShredError::Walk`]
/// attached to the offending path and do not end the iteration.
///
/// # Examples
///
/// ```no_run
/// use wipeout_core::walker::enumerate;
///
/// for target in enumerate("./old-project", true)? {
///     let target = target?;
///     println!("{} {}", target.kind().as_str(), target.path().display());
/// }
/// # Ok::<(), wipeout_core::ShredError>(())
/// ```
pub struct TreeWalker {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl TreeWalker {
    fn new(root: &Path) -> Self {
        let inner = WalkDir::new(root)
            .follow_links(false)
            .follow_root_links(false)
            .contents_first(true)
            .sort_by_file_name()
            .into_iter();
        Self {
            root: root.to_path_buf(),
            inner,
        }
    }

    /// Root the walk started from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn walk_error(&self, err: walkdir::Error) -> ShredError {
        let path = err
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        ShredError::Walk {
            path,
            source: io::Error::from(err),
        }
    }
}

impl Iterator for TreeWalker {
    type Item = Result<Target>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.inner.next()? {
            Ok(entry) => entry,
            Err(err) => return Some(Err(self.walk_error(err))),
        };

        // Without link following, DirEntry::metadata does not traverse symlinks.
        Some(match entry.metadata() {
            Ok(metadata) => Ok(Target::from_metadata(entry.into_path(), &metadata)),
            Err(err) => Err(self.walk_error(err)),
        })
    }
}

impl std::fmt::Debug for TreeWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWalker")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Starts enumerating `root`.
///
/// A regular file or symlink root yields itself only. A directory root is
/// walked fully.
///
/// # Errors
///
/// - `NotFound` if nothing exists at `root`
/// - `DirectoryWithoutRecursion` if `root` is a directory and `recursive` is
///   false; the directory is not read
/// - `PermissionDenied` or `Io` if `root` cannot be inspected
pub fn enumerate(root: impl AsRef<Path>, recursive: bool) -> Result<TreeWalker> {
    let root = root.as_ref();
    let target = Target::resolve(root)?;
    match target.kind() {
        TargetKind::Missing => Err(ShredError::NotFound {
            path: root.to_path_buf(),
        }),
        TargetKind::Directory if !recursive => Err(ShredError::DirectoryWithoutRecursion {
            path: root.to_path_buf(),
        }),
        _ => Ok(TreeWalker::new(root)),
    }
}
