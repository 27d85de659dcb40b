//! Progress bar implementation for CLI operations.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use std::fmt::Write;
use std::path::Path;
use wipeout_core::OverwriteResult;
use wipeout_core::ProgressCallback;

// Renders as "report.pdf [████████░░░░] 15.2 MB/40.0 MB (5.1 MB/s, 12s)"
const TEMPLATE: &str = "{msg:20!} [{bar:40.red/white}] {bytes}/{total} ({bytes_per_sec}, {eta})";

/// CLI progress bar wrapper implementing `ProgressCallback`.
///
/// Tracks bytes written across every pass of every file, with the current
/// file name as the message. Automatically cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
    bytes_written: u64,
    current: String,
}

impl CliProgress {
    /// Creates a new CLI progress bar.
    ///
    /// # Arguments
    ///
    /// * `total_bytes` - Bytes all passes together will write
    /// * `message` - Message to display until the first file starts
    #[must_use]
    pub fn new(total_bytes: u64, message: &str) -> Self {
        let bar = ProgressBar::new(total_bytes);

        bar.set_style(
            ProgressStyle::default_bar()
                .template(TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .with_key("bytes", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_bytes(state.pos())).unwrap_or(());
                })
                .with_key("total", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_bytes(state.len().unwrap_or(0))).unwrap_or(());
                })
                .with_key("bytes_per_sec", |state: &ProgressState, w: &mut dyn Write| {
                    let per_sec = state.per_sec();
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let bytes_per_sec = per_sec as u64;
                    write!(w, "{}/s", humanize_bytes(bytes_per_sec)).unwrap_or(());
                })
                .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_duration(state.eta())).unwrap_or(());
                })
                .progress_chars("█▓░"),
        );

        bar.set_message(message.to_string());

        Self {
            bar,
            bytes_written: 0,
            current: String::new(),
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_target_start(&mut self, path: &Path) {
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        self.bar.set_message(name.clone());
        self.current = name;
    }

    fn on_pass_complete(&mut self, _path: &Path, pass: usize, total: usize) {
        if pass < total {
            self.bar.set_message(format!("{} ({}/{total})", self.current, pass + 1));
        }
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes_written += bytes;
        self.bar.set_position(self.bytes_written);
    }

    fn on_target_complete(&mut self, _result: &OverwriteResult) {}

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Converts duration to human-readable format.
fn humanize_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}
