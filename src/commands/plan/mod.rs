//! Implementation of the `packfuse plan` command.
//!
//! Runs the whole planning pipeline:
//! - cluster folders (unless clusters are given)
//! - classify clusters and build fusion groups, merging conflicting groups
//! - plan fusion operations and standard file operations onto the target
//!
//! # Safety
//!
//! Planning only reads the source trees. The plan is written with an atomic
//! write and nothing moves until `packfuse execute --yes`.

mod display;
mod pipeline;


use crate::cli::PlanArgs;
use crate::config::Config;
use crate::error::{PackfuseError, Result};
use crate::model::{ClassifiedPack, read_json};

use display::print_plan_summary;
pub use pipeline::{PlanRun, build_plan, load_clusters};

/// Execute the `packfuse plan` command.
///
/// Unresolved fusion conflicts do not stop the plan from being written, but
/// the command then fails with a conflict error so scripts notice.
pub fn cmd_plan(args: PlanArgs, config: &Config) -> Result<()> {
    let packs: Vec<ClassifiedPack> = read_json(&args.packs)?;
    let clusters = load_clusters(args.clusters.as_deref(), args.folders.as_deref(), config)?;

    let run = build_plan(config, &packs, &clusters, &args.target)?;
    print_plan_summary(&run);

    match &args.output {
        Some(output) => {
            run.plan.save(output)?;
            println!();
            println!("Plan written to {}", output.display());
            println!("Run `packfuse execute --plan {}` to review it.", output.display());
        }
        None => {
            println!();
            println!("Pass --output <file> to save the plan for execution.");
        }
    }

    if !run.fusion.unresolved.is_empty() {
        return Err(PackfuseError::ConflictError(format!(
            "{} fusion conflict(s) need a manual decision",
            run.fusion.unresolved.len()
        )));
    }

    Ok(())
}
