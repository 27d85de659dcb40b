//! Shred command implementation.

use super::Outcome;
use crate::cli::ShredArgs;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use console::Term;
use console::style;
use std::io;
use std::io::BufRead;
use tracing::debug;
use tracing::warn;
use wipeout_core::PassCount;
use wipeout_core::Shredder;

pub fn execute(
    args: &ShredArgs,
    formatter: &dyn OutputFormatter,
    json: bool,
    quiet: bool,
) -> Result<Outcome> {
    let config = args.config();
    let paths = &args.targets.paths;

    if json && !args.force {
        bail!(
            "Refusing to shred without confirmation\n\
             HINT: --json output cannot prompt; add --force to proceed."
        );
    }

    if config.passes.exceeds_presets() {
        formatter.format_warning(&format!(
            "{} passes is more than the paranoid preset ({}); this will take a long time",
            config.passes,
            PassCount::PARANOID
        ));
    }

    debug!(?config, "shred configuration");
    let plan = wipeout_core::plan(paths, &config);
    if !args.force {
        formatter.format_plan(&plan)?;
        if plan.has_work() && !confirm()? {
            formatter.format_success("Cancelled.");
            return Ok(Outcome::Success);
        }
    }

    let shredder = Shredder::new(config);
    let cancel = shredder.cancel_token();
    ctrlc::set_handler(move || {
        warn!("interrupt received, stopping at the next pass boundary");
        cancel.cancel();
    })
    .context("failed to install Ctrl-C handler")?;

    let report = if !json && !quiet && CliProgress::should_show() {
        let mut progress = CliProgress::new(plan.bytes_to_write(), "Shredding");
        shredder.run_with_progress(paths, &mut progress)
    } else {
        shredder.run(paths)
    };

    formatter.format_report(&report)?;
    Ok(Outcome::from_report(&report))
}

/// Asks on stderr and reads the answer from stdin. Only `y`/`yes` confirm.
fn confirm() -> Result<bool> {
    let term = Term::stderr();
    term.write_str(&format!(
        "\n{} ",
        style("Are you absolutely sure? [y/N]").red().bold()
    ))?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
