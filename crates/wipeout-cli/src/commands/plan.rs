//! Plan command implementation.

use super::Outcome;
use crate::cli::PlanArgs;
use crate::output::OutputFormatter;
use anyhow::Result;

pub fn execute(args: &PlanArgs, formatter: &dyn OutputFormatter) -> Result<Outcome> {
    let plan = wipeout_core::plan(&args.targets.paths, &args.config());
    formatter.format_plan(&plan)?;
    Ok(Outcome::Success)
}
