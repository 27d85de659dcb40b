//! Multi-pass overwrite of a single file followed by removal.
//!
//! [`overwrite_passes`] is the storage-agnostic pass loop: for every pass it
//! seeks to offset 0, writes the whole logical length in fixed-size chunks,
//! then flushes and syncs before the next pass may start. [`OverwriteEngine`]
//! wraps it with everything that touches the real filesystem: re-validation,
//! opening without following symlinks, locking, truncation, the optional
//! rename and the final unlink.

use crate::CancelToken;
use crate::ShredConfig;
use crate::ShredError;
use crate::Target;
use crate::TargetKind;
use crate::io::SyncWrite;
use crate::pattern::PassSpec;
use crate::pattern::PatternSource;
use crate::report::NoopProgress;
use crate::report::OverwriteResult;
use crate::report::ProgressCallback;
use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::fs::TryLockError;
use std::io;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;
use tracing::info;
use tracing::warn;
use zeroize::Zeroizing;

/// Size of the buffer each pass is written in.
pub(crate) const CHUNK_SIZE: usize = 1024 * 1024;

/// Attempts at finding an unused random name before giving up on the rename.
const RENAME_ATTEMPTS: usize = 8;

/// Why a pass sequence stopped early.
#[derive(Debug)]
pub enum PassStop {
    /// A seek, write, flush or sync failed.
    Io(io::Error),
    /// Cancellation was observed after a durability barrier.
    Interrupted,
}

/// A pass sequence that did not complete.
#[derive(Debug)]
pub struct PassFailure {
    /// Passes whose durability barrier completed.
    pub passes_completed: usize,
    /// Bytes written by the completed passes.
    pub bytes_written: u64,
    /// What stopped the sequence.
    pub stop: PassStop,
}

/// Writes every pass of `spec` over the first `size` bytes of `sink`.
///
/// Each pass seeks to 0, writes `size` bytes and then calls
/// [`SyncWrite::sync`]; the next pass does not start before that barrier
/// returns. `on_pass` is called after each barrier with the 1-based pass
/// number and the bytes written by that pass. Cancellation is only checked
/// between passes. With `size == 0` nothing is written and no pass runs.
///
/// Returns the total number of bytes written.
///
/// # Errors
///
/// Returns a [`PassFailure`] carrying the number of passes that completed
/// before an I/O error or a cancellation stopped the sequence.
///
/// # Examples
///
/// ```
/// use wipeout_core::CancelToken;
/// use wipeout_core::PassCount;
/// use wipeout_core::engine::overwrite_passes;
/// use wipeout_core::io::RecordingSink;
/// use wipeout_core::pattern::patterns_for;
///
/// let mut sink = RecordingSink::new(b"secret".to_vec());
/// let spec = patterns_for(PassCount::QUICK);
/// let written = overwrite_passes(&mut sink, 6, &spec, &CancelToken::new(), |_, _| {}).ok();
/// assert_eq!(written, Some(18));
/// assert_ne!(sink.contents(), b"secret");
/// ```
pub fn overwrite_passes<W: SyncWrite>(
    sink: &mut W,
    size: u64,
    spec: &PassSpec,
    cancel: &CancelToken,
    mut on_pass: impl FnMut(usize, u64),
) -> Result<u64, PassFailure> {
    if size == 0 {
        return Ok(0);
    }

    let chunk = usize::try_from(size).map_or(CHUNK_SIZE, |s| s.min(CHUNK_SIZE));
    let mut buf = Zeroizing::new(vec![0u8; chunk]);
    let mut previous: Option<PatternSource> = None;
    let mut completed = 0;
    let mut written = 0u64;
    let total = spec.len();

    for pattern in spec.iter() {
        let fail = |err: io::Error, completed: usize, written: u64| PassFailure {
            passes_completed: completed,
            bytes_written: written,
            stop: PassStop::Io(err),
        };

        let mut source = PatternSource::for_pass(pattern, previous.as_ref())
            .map_err(|e| fail(e, completed, written))?;

        sink.seek(SeekFrom::Start(0))
            .map_err(|e| fail(e, completed, written))?;

        let mut remaining = size;
        while remaining > 0 {
            let n = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
            let block = &mut buf[..n];
            source.fill(block);
            sink.write_all(block)
                .map_err(|e| fail(e, completed, written))?;
            remaining -= n as u64;
        }

        sink.flush().map_err(|e| fail(e, completed, written))?;
        sink.sync().map_err(|e| fail(e, completed, written))?;

        completed += 1;
        written += size;
        on_pass(completed, size);
        previous = Some(source);

        if completed < total && cancel.is_cancelled() {
            return Err(PassFailure {
                passes_completed: completed,
                bytes_written: written,
                stop: PassStop::Interrupted,
            });
        }
    }

    Ok(written)
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    passes: usize,
    bytes: u64,
}

/// Destroys individual files.
///
/// The engine carries the batch-wide options and the cancellation token;
/// it is cheap to clone and can be shared by reference between worker
/// threads.
///
/// # Examples
///
/// ```no_run
/// use wipeout_core::OverwriteEngine;
/// use wipeout_core::ShredConfig;
///
/// let config = ShredConfig::default();
/// let engine = OverwriteEngine::new(&config);
/// let result = engine.destroy("secret.txt", &config.pass_spec());
/// assert!(result.is_success());
/// ```
#[derive(Debug, Clone)]
pub struct OverwriteEngine {
    follow_symlinks: bool,
    rename_before_unlink: bool,
    cancel: CancelToken,
    remove_file: fn(&Path) -> io::Result<()>,
}

impl OverwriteEngine {
    /// Creates an engine with the symlink and rename options of `config`.
    #[must_use]
    pub fn new(config: &ShredConfig) -> Self {
        Self {
            follow_symlinks: config.follow_symlinks,
            rename_before_unlink: config.rename_before_unlink,
            cancel: CancelToken::new(),
            remove_file: |path| fs::remove_file(path),
        }
    }

    /// Uses `cancel` to stop between passes.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Replaces the final unlink.
    #[cfg(test)]
    fn with_remove_file(mut self, remove_file: fn(&Path) -> io::Result<()>) -> Self {
        self.remove_file = remove_file;
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Overwrites and removes the file at `path`.
    pub fn destroy(&self, path: impl AsRef<Path>, spec: &PassSpec) -> OverwriteResult {
        self.destroy_with_progress(path, spec, &mut NoopProgress)
    }

    /// Like [`destroy`](Self::destroy), reporting passes to `progress`.
    pub fn destroy_with_progress(
        &self,
        path: impl AsRef<Path>,
        spec: &PassSpec,
        progress: &mut dyn ProgressCallback,
    ) -> OverwriteResult {
        let path = path.as_ref();
        let target = match Target::resolve(path) {
            Ok(target) => target,
            Err(err) => return OverwriteResult::rejected(path, err),
        };

        progress.on_target_start(path);
        let total = spec.len();
        let result = self.destroy_target(&target, spec, |pass, bytes| {
            progress.on_pass_complete(path, pass, total);
            progress.on_bytes_written(bytes);
        });
        progress.on_target_complete(&result);
        result
    }

    /// Destroys an already-resolved target.
    pub(crate) fn destroy_target(
        &self,
        target: &Target,
        spec: &PassSpec,
        mut on_pass: impl FnMut(usize, u64),
    ) -> OverwriteResult {
        let path = target.path();
        if self.cancel.is_cancelled() {
            return OverwriteResult::rejected(
                path,
                ShredError::Interrupted {
                    path: path.to_path_buf(),
                    passes_completed: 0,
                },
            );
        }

        let started = Instant::now();
        let mut tally = Tally::default();
        let outcome = match target.kind() {
            TargetKind::File => self.shred_file(target, spec, &mut tally, &mut on_pass),
            TargetKind::Symlink if self.follow_symlinks => {
                self.shred_through_link(target, spec, &mut tally, &mut on_pass)
            }
            TargetKind::Symlink => Err(ShredError::SymlinkSkipped {
                path: path.to_path_buf(),
            }),
            TargetKind::Missing => Err(ShredError::NotFound {
                path: path.to_path_buf(),
            }),
            TargetKind::Directory | TargetKind::Other => Err(ShredError::Unsupported {
                path: path.to_path_buf(),
            }),
        };

        match outcome {
            Ok(()) => {
                info!(
                    path = %path.display(),
                    passes = tally.passes,
                    bytes = tally.bytes,
                    "file destroyed"
                );
                OverwriteResult::new(
                    path.to_path_buf(),
                    tally.passes,
                    tally.bytes,
                    true,
                    None,
                    started.elapsed(),
                )
            }
            Err(err) => {
                if err.is_skip() {
                    debug!(path = %path.display(), reason = err.code(), "target skipped");
                } else {
                    warn!(path = %path.display(), passes = tally.passes, "{err}");
                }
                OverwriteResult::new(
                    path.to_path_buf(),
                    tally.passes,
                    tally.bytes,
                    false,
                    Some(err),
                    started.elapsed(),
                )
            }
        }
    }

    fn shred_file(
        &self,
        target: &Target,
        spec: &PassSpec,
        tally: &mut Tally,
        on_pass: &mut impl FnMut(usize, u64),
    ) -> crate::Result<()> {
        let path = target.path();
        target.revalidate()?;

        let mut file = open_for_overwrite(path)?;
        let metadata = file
            .metadata()
            .map_err(|err| ShredError::from_io(path, err))?;
        if !metadata.is_file() || !target.matches(&metadata) {
            return Err(ShredError::TargetChanged {
                path: path.to_path_buf(),
            });
        }
        lock_exclusive(&file, path)?;

        let size = metadata.len();
        let total = spec.len();
        if size == 0 {
            debug!(path = %path.display(), "empty file, no passes needed");
        }

        let written = overwrite_passes(&mut file, size, spec, &self.cancel, |pass, bytes| {
            debug!(path = %path.display(), pass, total, "pass synced");
            on_pass(pass, bytes);
        });
        match written {
            Ok(bytes) => {
                tally.passes = if size == 0 { 0 } else { total };
                tally.bytes = bytes;
            }
            Err(failure) => {
                tally.passes = failure.passes_completed;
                tally.bytes = failure.bytes_written;
                return Err(match failure.stop {
                    PassStop::Io(source) => ShredError::Io {
                        path: path.to_path_buf(),
                        passes_completed: failure.passes_completed,
                        source,
                    },
                    PassStop::Interrupted => ShredError::Interrupted {
                        path: path.to_path_buf(),
                        passes_completed: failure.passes_completed,
                    },
                });
            }
        }

        SyncWrite::truncate(&mut file)
            .and_then(|()| file.sync())
            .map_err(|source| ShredError::Io {
                path: path.to_path_buf(),
                passes_completed: tally.passes,
                source,
            })?;
        drop(file);

        self.unlink(path).map_err(|source| ShredError::RemovalFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    fn shred_through_link(
        &self,
        link: &Target,
        spec: &PassSpec,
        tally: &mut Tally,
        on_pass: &mut impl FnMut(usize, u64),
    ) -> crate::Result<()> {
        let path = link.path();
        link.revalidate()?;

        let skipped = || ShredError::SymlinkSkipped {
            path: path.to_path_buf(),
        };
        let destination = fs::read_link(path).map_err(|err| ShredError::from_io(path, err))?;
        let destination = match path.parent() {
            Some(parent) if destination.is_relative() => parent.join(destination),
            _ => destination,
        };
        let resolved = Target::resolve(destination).map_err(|_| skipped())?;
        if resolved.kind() != TargetKind::File {
            return Err(skipped());
        }

        debug!(
            link = %path.display(),
            target = %resolved.path().display(),
            "following symlink"
        );
        self.shred_file(&resolved, spec, tally, on_pass)?;

        fs::remove_file(path).map_err(|source| ShredError::RemovalFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Removes `path`, renaming it to a random name first when configured.
    fn unlink(&self, path: &Path) -> io::Result<()> {
        let victim = if self.rename_before_unlink {
            match obscure_name(path) {
                Ok(renamed) => renamed,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "rename before unlink failed");
                    path.to_path_buf()
                }
            }
        } else {
            path.to_path_buf()
        };
        (self.remove_file)(&victim)
    }
}

/// Renames `path` to an unused random 32-hex-digit name in the same
/// directory and returns the new path.
fn obscure_name(path: &Path) -> io::Result<PathBuf> {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    for _ in 0..RENAME_ATTEMPTS {
        let candidate = parent.join(hex::encode(rand::random::<[u8; 16]>()));
        match fs::symlink_metadata(&candidate) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::rename(path, &candidate)?;
                return Ok(candidate);
            }
            Err(err) => return Err(err),
            Ok(_) => {}
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "no unused random name found",
    ))
}

#[cfg(unix)]
fn open_for_overwrite(path: &Path) -> crate::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOFOLLOW)
        .open(path)
        .map_err(|err| {
            if err.raw_os_error() == Some(libc::ELOOP) {
                ShredError::TargetChanged {
                    path: path.to_path_buf(),
                }
            } else {
                ShredError::from_io(path, err)
            }
        })
}

#[cfg(not(unix))]
fn open_for_overwrite(path: &Path) -> crate::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|err| ShredError::from_io(path, err))
}

fn lock_exclusive(file: &File, path: &Path) -> crate::Result<()> {
    match file.try_lock() {
        Ok(()) => Ok(()),
        Err(TryLockError::WouldBlock) => Err(ShredError::LockConflict {
            path: path.to_path_buf(),
        }),
        Err(TryLockError::Error(err)) if err.kind() == io::ErrorKind::Unsupported => {
            debug!(path = %path.display(), "file locking unsupported, continuing");
            Ok(())
        }
        Err(TryLockError::Error(err)) => Err(ShredError::from_io(path, err)),
    }
}
