//! Secure multi-pass file destruction.
//!
//! `wipeout-core` overwrites the contents of files with a sequence of byte
//! patterns, forcing every pass to stable storage before the next one
//! starts, then removes them. Directory trees are walked contents-first so
//! a directory is only removed once everything in it has been destroyed.
//!
//! Only the logical byte range of each file is overwritten. Wear-levelled
//! flash, copy-on-write and journaling filesystems may keep older copies of
//! the data elsewhere on the device.
//!
//! # Examples
//!
//! ```no_run
//! use wipeout_core::PassCount;
//! use wipeout_core::ShredConfig;
//!
//! let config = ShredConfig::default()
//!     .with_passes(PassCount::QUICK)
//!     .with_recursive(true);
//!
//! let report = wipeout_core::run(&["secrets/", "id_rsa.bak"], &config);
//! let summary = report.summary();
//! println!("{} destroyed, {} failed", summary.succeeded, summary.failed);
//! assert!(report.is_success());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod pattern;
pub mod plan;
pub mod report;
pub mod types;
pub mod walker;

// Re-export main API types
pub use batch::Shredder;
pub use batch::run;
pub use cancel::CancelToken;
pub use config::ShredConfig;
pub use engine::OverwriteEngine;
pub use error::Result;
pub use error::ShredError;
pub use pattern::PassSpec;
pub use pattern::Pattern;
pub use pattern::patterns_for;
pub use plan::BatchPlan;
pub use plan::PlannedTarget;
pub use plan::plan;
pub use report::BatchReport;
pub use report::BatchSummary;
pub use report::DirectoryOutcome;
pub use report::DirectoryRemoval;
pub use report::NoopProgress;
pub use report::OverwriteResult;
pub use report::ProgressCallback;
pub use report::TargetStatus;
pub use types::PassCount;
pub use types::Target;
pub use types::TargetKind;
pub use walker::TreeWalker;
pub use walker::enumerate;
