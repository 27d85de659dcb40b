//! Batch orchestration.
//!
//! A batch applies one [`ShredConfig`] to every input path. Files are
//! overwritten by a small pool of scoped worker threads fed through a
//! bounded channel; the thread that called [`Shredder::run`] owns all
//! bookkeeping (the report, the progress callback, the set of directories
//! that must be kept) and is the only one that removes directories.

use crate::CancelToken;
use crate::OverwriteEngine;
use crate::ShredConfig;
use crate::ShredError;
use crate::Target;
use crate::TargetKind;
use crate::pattern::PassSpec;
use crate::report::BatchReport;
use crate::report::DirectoryOutcome;
use crate::report::DirectoryRemoval;
use crate::report::NoopProgress;
use crate::report::OverwriteResult;
use crate::report::ProgressCallback;
use crate::report::TargetStatus;
use crate::walker::enumerate;
use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::TrySendError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Destroys batches of paths with a shared configuration.
///
/// # Examples
///
/// ```no_run
/// use wipeout_core::ShredConfig;
/// use wipeout_core::Shredder;
///
/// let shredder = Shredder::new(ShredConfig::default().with_recursive(true));
/// let cancel = shredder.cancel_token();
/// // hand `cancel` to a signal handler ...
///
/// let report = shredder.run(&["old-keys/", "notes.txt"]);
/// for result in report.problems() {
///     eprintln!("{}: {:?}", result.path().display(), result.error());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Shredder {
    config: ShredConfig,
    cancel: CancelToken,
}

impl Shredder {
    /// Creates a shredder with its own cancellation token.
    #[must_use]
    pub fn new(config: ShredConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Replaces the cancellation token.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops running batches when cancelled.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Configuration applied to every target.
    #[must_use]
    pub const fn config(&self) -> &ShredConfig {
        &self.config
    }

    /// Destroys every path and returns the aggregated report.
    ///
    /// One target's failure never stops the others. The report lists file
    /// results in input order (walk order inside a directory), whatever
    /// the worker count.
    pub fn run<P: AsRef<Path>>(&self, paths: &[P]) -> BatchReport {
        self.run_with_progress(paths, &mut NoopProgress)
    }

    /// Like [`run`](Self::run), reporting progress to `progress` on the
    /// calling thread.
    pub fn run_with_progress<P: AsRef<Path>>(
        &self,
        paths: &[P],
        progress: &mut dyn ProgressCallback,
    ) -> BatchReport {
        let started = Instant::now();
        let spec = self.config.pass_spec();
        let engine = OverwriteEngine::new(&self.config).with_cancel(self.cancel.clone());
        let workers = self.config.effective_workers();

        info!(
            targets = paths.len(),
            passes = spec.len(),
            workers,
            recursive = self.config.recursive,
            "batch started"
        );

        let (job_tx, job_rx) = crossbeam_channel::bounded::<Job>(workers * 2);
        let (event_tx, event_rx) = crossbeam_channel::unbounded::<Event>();
        let mut owner = Owner::new(&self.config, &self.cancel, progress, event_rx);

        thread::scope(|scope| {
            for id in 0..workers {
                let jobs = job_rx.clone();
                let events = event_tx.clone();
                let engine = &engine;
                let spec = &spec;
                scope.spawn(move || worker_loop(id, engine, spec, &jobs, &events));
            }
            drop(job_rx);
            drop(event_tx);

            for path in paths {
                owner.process_input(path.as_ref(), &job_tx);
            }
            drop(job_tx);
            owner.drain();
        });

        let report = owner.finish(started);
        let summary = report.summary();
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            directories_removed = summary.directories_removed,
            bytes = report.bytes_overwritten(),
            interrupted = report.interrupted,
            "batch finished"
        );
        report
    }
}

/// Destroys `paths` with `config`.
///
/// Equivalent to `Shredder::new(config.clone()).run(paths)`.
pub fn run<P: AsRef<Path>>(paths: &[P], config: &ShredConfig) -> BatchReport {
    Shredder::new(config.clone()).run(paths)
}

struct Job {
    seq: u64,
    target: Target,
}

enum Event {
    Started {
        path: PathBuf,
    },
    Pass {
        path: PathBuf,
        pass: usize,
        total: usize,
        bytes: u64,
    },
    Finished {
        seq: u64,
        result: OverwriteResult,
    },
}

fn worker_loop(
    id: usize,
    engine: &OverwriteEngine,
    spec: &PassSpec,
    jobs: &Receiver<Job>,
    events: &Sender<Event>,
) {
    debug!(worker = id, "worker started");
    for job in jobs {
        let path = job.target.path().to_path_buf();
        let result = if engine.is_cancelled() {
            OverwriteResult::rejected(
                &path,
                ShredError::Interrupted {
                    path: path.clone(),
                    passes_completed: 0,
                },
            )
        } else {
            let _ = events.send(Event::Started { path: path.clone() });
            let total = spec.len();
            engine.destroy_target(&job.target, spec, |pass, bytes| {
                let _ = events.send(Event::Pass {
                    path: path.clone(),
                    pass,
                    total,
                    bytes,
                });
            })
        };
        if events
            .send(Event::Finished {
                seq: job.seq,
                result,
            })
            .is_err()
        {
            break;
        }
    }
    debug!(worker = id, "worker stopped");
}

/// Bookkeeping owned by the thread that runs the batch.
struct Owner<'a> {
    config: &'a ShredConfig,
    cancel: &'a CancelToken,
    progress: &'a mut dyn ProgressCallback,
    events: Receiver<Event>,
    results: Vec<(u64, OverwriteResult)>,
    directories: Vec<DirectoryRemoval>,
    dirty: HashSet<PathBuf>,
    next_seq: u64,
    in_flight: usize,
}

impl<'a> Owner<'a> {
    fn new(
        config: &'a ShredConfig,
        cancel: &'a CancelToken,
        progress: &'a mut dyn ProgressCallback,
        events: Receiver<Event>,
    ) -> Self {
        Self {
            config,
            cancel,
            progress,
            events,
            results: Vec::new(),
            directories: Vec::new(),
            dirty: HashSet::new(),
            next_seq: 0,
            in_flight: 0,
        }
    }

    fn process_input(&mut self, path: &Path, jobs: &Sender<Job>) {
        if self.cancel.is_cancelled() {
            self.record_interrupted(path);
            return;
        }

        let target = match Target::resolve(path) {
            Ok(target) => target,
            Err(err) => {
                self.record_rejected(path, err);
                return;
            }
        };

        match target.kind() {
            TargetKind::File | TargetKind::Symlink => self.submit(target, jobs),
            TargetKind::Directory if self.config.recursive => self.process_tree(&target, jobs),
            TargetKind::Directory => self.record_rejected(
                path,
                ShredError::DirectoryWithoutRecursion {
                    path: path.to_path_buf(),
                },
            ),
            TargetKind::Missing => self.record_rejected(
                path,
                ShredError::NotFound {
                    path: path.to_path_buf(),
                },
            ),
            TargetKind::Other => self.record_rejected(
                path,
                ShredError::Unsupported {
                    path: path.to_path_buf(),
                },
            ),
        }
    }

    fn process_tree(&mut self, root: &Target, jobs: &Sender<Job>) {
        // Survivors are rediscovered by this walk; earlier inputs must not
        // keep its directories alive.
        self.wait_idle();
        self.dirty.clear();

        let walker = match enumerate(root.path(), true) {
            Ok(walker) => walker,
            Err(err) => {
                self.record_rejected(root.path(), err);
                return;
            }
        };

        let mut directories = Vec::new();
        for item in walker {
            match item {
                Ok(target) => match target.kind() {
                    TargetKind::Directory => directories.push(target.path().to_path_buf()),
                    TargetKind::File if self.cancel.is_cancelled() => {
                        self.record_interrupted(target.path());
                    }
                    TargetKind::File => self.submit(target, jobs),
                    // Links inside a tree are never followed.
                    TargetKind::Symlink => self.record_rejected(
                        target.path(),
                        ShredError::SymlinkSkipped {
                            path: target.path().to_path_buf(),
                        },
                    ),
                    TargetKind::Other | TargetKind::Missing => self.record_rejected(
                        target.path(),
                        ShredError::Unsupported {
                            path: target.path().to_path_buf(),
                        },
                    ),
                },
                Err(err) => {
                    let path = err
                        .path()
                        .map_or_else(|| root.path().to_path_buf(), Path::to_path_buf);
                    warn!(path = %path.display(), "{err}");
                    self.record_rejected(&path, err);
                }
            }
        }

        self.wait_idle();
        self.remove_directories(directories);
    }

    /// Removes `directories` (already in bottom-up order) unless something
    /// below them survived.
    fn remove_directories(&mut self, directories: Vec<PathBuf>) {
        let interrupted = self.cancel.is_cancelled();
        for path in directories {
            let outcome = if interrupted || self.dirty.contains(&path) {
                warn!(path = %path.display(), "directory retained");
                DirectoryOutcome::Retained
            } else {
                match fs::remove_dir(&path) {
                    Ok(()) => {
                        debug!(path = %path.display(), "directory removed");
                        DirectoryOutcome::Removed
                    }
                    Err(source) => {
                        warn!(path = %path.display(), error = %source, "directory removal failed");
                        self.mark_dirty(&path);
                        DirectoryOutcome::Failed(ShredError::RemovalFailed {
                            path: path.clone(),
                            source,
                        })
                    }
                }
            };
            self.directories.push(DirectoryRemoval { path, outcome });
        }
    }

    fn submit(&mut self, target: Target, jobs: &Sender<Job>) {
        let mut job = Job {
            seq: self.take_seq(),
            target,
        };
        loop {
            match jobs.try_send(job) {
                Ok(()) => {
                    self.in_flight += 1;
                    self.pump();
                    return;
                }
                Err(TrySendError::Full(back)) => {
                    job = back;
                    if !self.wait_event() {
                        break;
                    }
                }
                Err(TrySendError::Disconnected(back)) => {
                    job = back;
                    break;
                }
            }
        }
        // Every worker is gone; nothing can run this job.
        let path = job.target.path().to_path_buf();
        let result = OverwriteResult::rejected(
            &path,
            ShredError::Interrupted {
                path: path.clone(),
                passes_completed: 0,
            },
        );
        self.complete(job.seq, result);
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn record_rejected(&mut self, path: &Path, err: ShredError) {
        let seq = self.take_seq();
        self.complete(seq, OverwriteResult::rejected(path, err));
    }

    fn record_interrupted(&mut self, path: &Path) {
        self.record_rejected(
            path,
            ShredError::Interrupted {
                path: path.to_path_buf(),
                passes_completed: 0,
            },
        );
    }

    fn complete(&mut self, seq: u64, result: OverwriteResult) {
        if result.status() != TargetStatus::Succeeded {
            self.mark_dirty(result.path());
        }
        self.progress.on_target_complete(&result);
        self.results.push((seq, result));
    }

    /// Marks every ancestor of `path` as one that must not be removed.
    fn mark_dirty(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if !self.dirty.insert(ancestor.to_path_buf()) {
                break;
            }
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Started { path } => self.progress.on_target_start(&path),
            Event::Pass {
                path,
                pass,
                total,
                bytes,
            } => {
                self.progress.on_pass_complete(&path, pass, total);
                self.progress.on_bytes_written(bytes);
            }
            Event::Finished { seq, result } => {
                self.in_flight -= 1;
                self.complete(seq, result);
            }
        }
    }

    /// Handles queued events without blocking.
    fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.handle(event);
        }
    }

    /// Blocks for one event. Returns `false` once every worker has exited.
    fn wait_event(&mut self) -> bool {
        match self.events.recv() {
            Ok(event) => {
                self.handle(event);
                true
            }
            Err(_) => false,
        }
    }

    fn wait_idle(&mut self) {
        while self.in_flight > 0 && self.wait_event() {}
    }

    /// Handles every remaining event; workers exit once the job channel
    /// is closed and drained.
    fn drain(&mut self) {
        while self.wait_event() {}
    }

    fn finish(mut self, started: Instant) -> BatchReport {
        self.progress.on_complete();
        self.results.sort_by_key(|(seq, _)| *seq);
        BatchReport {
            results: self.results.into_iter().map(|(_, result)| result).collect(),
            directories: self.directories,
            duration: started.elapsed(),
            interrupted: self.cancel.is_cancelled(),
        }
    }
}
