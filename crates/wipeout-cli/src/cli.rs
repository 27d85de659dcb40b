//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use std::path::PathBuf;
use wipeout_core::PassCount;
use wipeout_core::ShredConfig;

#[derive(Parser)]
#[command(name = "wipeout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Overwrite files several times, then remove them
    Shred(ShredArgs),
    /// Show what would be destroyed without touching anything
    Plan(PlanArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Paths and traversal options shared by `shred` and `plan`.
#[derive(clap::Args)]
pub struct TargetArgs {
    /// Files or directories to destroy
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Descend into directories and remove them once empty
    #[arg(short, long)]
    pub recursive: bool,

    /// Destroy the file a symlink argument points to (one level only)
    #[arg(long)]
    pub follow_symlinks: bool,
}

/// Pass count selection shared by `shred` and `plan`.
#[derive(clap::Args)]
pub struct PassArgs {
    /// Number of overwrite passes (default: 7)
    #[arg(short, long, value_parser = parse_pass_count, conflicts_with = "level")]
    pub passes: Option<PassCount>,

    /// Pass count preset
    #[arg(short, long, value_enum)]
    pub level: Option<Level>,
}

impl PassArgs {
    /// Explicit count, then preset, then the standard default.
    pub fn pass_count(&self) -> PassCount {
        self.passes
            .or_else(|| self.level.map(Level::passes))
            .unwrap_or_default()
    }
}

#[derive(clap::Args)]
pub struct ShredArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    #[command(flatten)]
    pub passes: PassArgs,

    /// Skip the preview and confirmation prompt
    #[arg(short, long)]
    pub force: bool,

    /// Keep the original file name until unlink instead of renaming first
    #[arg(long)]
    pub no_rename: bool,

    /// Number of files overwritten in parallel
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..=256))]
    pub jobs: u16,
}

impl ShredArgs {
    pub fn config(&self) -> ShredConfig {
        ShredConfig::default()
            .with_passes(self.passes.pass_count())
            .with_recursive(self.targets.recursive)
            .with_follow_symlinks(self.targets.follow_symlinks)
            .with_rename_before_unlink(!self.no_rename)
            .with_workers(usize::from(self.jobs))
    }
}

#[derive(clap::Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    #[command(flatten)]
    pub passes: PassArgs,
}

impl PlanArgs {
    pub fn config(&self) -> ShredConfig {
        ShredConfig::default()
            .with_passes(self.passes.pass_count())
            .with_recursive(self.targets.recursive)
            .with_follow_symlinks(self.targets.follow_symlinks)
    }
}

/// Pass count presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Level {
    /// 3 passes
    Quick,
    /// 7 passes
    Standard,
    /// 35 passes
    Paranoid,
}

impl Level {
    pub const fn passes(self) -> PassCount {
        match self {
            Self::Quick => PassCount::QUICK,
            Self::Standard => PassCount::STANDARD,
            Self::Paranoid => PassCount::PARANOID,
        }
    }
}

/// Parse a positive pass count
fn parse_pass_count(s: &str) -> Result<PassCount, String> {
    let n = s
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid pass count: {s}"))?;
    PassCount::new(n).map_err(|e| e.to_string())
}
