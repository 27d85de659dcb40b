//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::error::explain;
use crate::progress::humanize_bytes;
use anyhow::Result;
use console::Term;
use console::style;
use wipeout_core::BatchPlan;
use wipeout_core::BatchReport;
use wipeout_core::DirectoryOutcome;
use wipeout_core::PlannedTarget;
use wipeout_core::TargetKind;
use wipeout_core::TargetStatus;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn mark(&self, status: TargetStatus) -> String {
        let (symbol, plain) = match status {
            TargetStatus::Succeeded => ("✓", "ok"),
            TargetStatus::Skipped => ("-", "skip"),
            TargetStatus::Failed => ("✗", "FAIL"),
        };
        if !self.use_colors {
            return format!("[{plain}]");
        }
        match status {
            TargetStatus::Succeeded => style(symbol).green().bold().to_string(),
            TargetStatus::Skipped => style(symbol).yellow().bold().to_string(),
            TargetStatus::Failed => style(symbol).red().bold().to_string(),
        }
    }

    fn describe_planned(target: &PlannedTarget) -> String {
        if let Some(reason) = &target.skip {
            return format!("skipped: {reason}");
        }
        match target.kind {
            TargetKind::Directory => {
                let mut text = format!(
                    "directory, {} files, {}",
                    format_number(target.files),
                    humanize_bytes(target.bytes)
                );
                if target.skipped_entries > 0 {
                    text.push_str(&format!(", {} entries kept", target.skipped_entries));
                }
                text
            }
            TargetKind::Symlink => format!("symlink to file, {}", humanize_bytes(target.bytes)),
            _ => humanize_bytes(target.bytes),
        }
    }

    fn header(&self, ok: bool, text: &str) {
        if self.use_colors {
            let symbol = if ok {
                style("✓").green().bold()
            } else {
                style("✗").red().bold()
            };
            self.line(&format!("{symbol} {text}"));
        } else {
            self.line(text);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_plan(&self, plan: &BatchPlan) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let title = format!("Targets ({} passes):", plan.passes);
        if self.use_colors {
            self.line(&style(title).bold().to_string());
        } else {
            self.line(&title);
        }

        for target in &plan.targets {
            let status = if target.will_process() {
                TargetStatus::Succeeded
            } else {
                TargetStatus::Skipped
            };
            self.line(&format!(
                "  {} {}  ({})",
                self.mark(status),
                target.path.display(),
                Self::describe_planned(target)
            ));
        }

        self.line("");
        self.line(&format!(
            "Total: {} files, {} ({} to write)",
            format_number(plan.total_files()),
            humanize_bytes(plan.total_bytes()),
            humanize_bytes(plan.bytes_to_write())
        ));
        Ok(())
    }

    fn format_report(&self, report: &BatchReport) -> Result<()> {
        let summary = report.summary();
        let ok = report.is_success();

        if !self.quiet {
            let headline = if report.interrupted {
                "Interrupted".to_string()
            } else if ok {
                "Shredding complete".to_string()
            } else {
                "Shredding finished with problems".to_string()
            };
            self.header(ok, &headline);

            self.line(&format!(
                "  Destroyed:        {}",
                format_number(summary.succeeded)
            ));
            if summary.failed > 0 {
                self.line(&format!("  Failed:           {}", summary.failed));
            }
            if summary.skipped > 0 {
                self.line(&format!("  Skipped:          {}", summary.skipped));
            }
            if !report.directories.is_empty() {
                self.line(&format!(
                    "  Directories:      {} removed, {} kept",
                    summary.directories_removed,
                    summary.directories_retained + summary.directories_failed
                ));
            }
            self.line(&format!(
                "  Overwritten:      {}",
                humanize_bytes(report.bytes_overwritten())
            ));

            if self.verbose {
                self.line(&format!("  Duration:         {:?}", report.duration));
                self.line("");
                for result in &report.results {
                    self.line(&format!(
                        "  {} {} ({} passes)",
                        self.mark(result.status()),
                        result.path().display(),
                        result.passes_completed()
                    ));
                }
                for dir in &report.directories {
                    let status = match dir.outcome {
                        DirectoryOutcome::Removed => TargetStatus::Succeeded,
                        DirectoryOutcome::Retained => TargetStatus::Skipped,
                        DirectoryOutcome::Failed(_) => TargetStatus::Failed,
                    };
                    self.line(&format!("  {} {}/", self.mark(status), dir.path.display()));
                }
            }
        }

        // Problems are always shown, even in quiet mode
        let problems: Vec<_> = report.problems().collect();
        let failed_dirs: Vec<_> = report
            .directories
            .iter()
            .filter_map(|d| match &d.outcome {
                DirectoryOutcome::Failed(err) => Some(err),
                _ => None,
            })
            .collect();
        if problems.is_empty() && failed_dirs.is_empty() {
            return Ok(());
        }

        let _ = Term::stderr().write_line("");
        for result in problems {
            if let Some(err) = result.error() {
                self.problem(result.status(), &explain(err));
            }
        }
        for err in failed_dirs {
            self.problem(TargetStatus::Failed, &explain(err));
        }
        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let stderr = Term::stderr();
        if self.use_colors {
            let _ = stderr.write_line(&format!("{} {error:#}", style("ERROR:").red().bold()));
        } else {
            let _ = stderr.write_line(&format!("ERROR: {error:#}"));
        }
    }

    fn format_success(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            self.line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            self.line(message);
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let stderr = Term::stderr();
        if self.use_colors {
            let _ = stderr.write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = stderr.write_line(&format!("WARNING: {message}"));
        }
    }
}

impl HumanFormatter {
    fn problem(&self, status: TargetStatus, message: &str) {
        let stderr = Term::stderr();
        let mut lines = message.lines();
        if let Some(first) = lines.next() {
            let _ = stderr.write_line(&format!("{} {first}", self.mark(status)));
        }
        for rest in lines {
            let _ = stderr.write_line(&format!("    {rest}"));
        }
    }
}

fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use wipeout_core::ShredError;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_describe_planned() {
        let dir = PlannedTarget {
            path: PathBuf::from("root"),
            kind: TargetKind::Directory,
            files: 1200,
            bytes: 2048,
            skipped_entries: 1,
            skip: None,
        };
        assert_eq!(
            HumanFormatter::describe_planned(&dir),
            "directory, 1,200 files, 2.0 KB, 1 entries kept"
        );

        let skipped = PlannedTarget {
            skip: Some(ShredError::NotFound {
                path: PathBuf::from("gone"),
            }),
            files: 0,
            bytes: 0,
            skipped_entries: 0,
            kind: TargetKind::Missing,
            path: PathBuf::from("gone"),
        };
        assert_eq!(
            HumanFormatter::describe_planned(&skipped),
            "skipped: not found: gone"
        );
    }

    #[test]
    fn test_plain_marks() {
        let formatter = HumanFormatter {
            verbose: false,
            quiet: false,
            use_colors: false,
            term: Term::stdout(),
        };
        assert_eq!(formatter.mark(TargetStatus::Succeeded), "[ok]");
        assert_eq!(formatter.mark(TargetStatus::Failed), "[FAIL]");
    }
}
