//! Implementation of the `packfuse execute` command.
//!
//! # Safety
//!
//! - Default behavior is dry-run (prints what would be done)
//! - Requires `--yes` to touch the filesystem
//! - The plan is validated before the first operation runs
//! - On abort, completed steps are rolled back unless `--no-rollback`

mod display;


use crate::cli::ExecuteArgs;
use crate::commands::write_json;
use crate::config::Config;
use crate::error::{PackfuseError, Result};
use crate::execute::{ExecutionOptions, OrganizationExecutor, OrganizationResult};
use crate::plan::OrganizationPlan;
use tracing::info;

use display::{print_dry_run, print_result};

/// Execution options from config, with command-line overrides applied.
pub fn execution_options(config: &Config, args: &ExecuteArgs) -> ExecutionOptions {
    let mut options = ExecutionOptions::from_config(config);
    if let Some(strategy) = args.conflict {
        options.conflict_strategy = strategy;
    }
    if args.no_rollback {
        options.enable_rollback = false;
    }
    options
}

/// Execute the `packfuse execute` command.
///
/// # Behavior
///
/// - Without `--yes`: validates and prints the plan, changes nothing
/// - With `--yes`: runs the plan and prints the result
/// - `--report <file>`: also writes the full result as JSON
pub fn cmd_execute(args: ExecuteArgs, config: &Config) -> Result<()> {
    let plan = OrganizationPlan::load(&args.plan)?;
    let options = execution_options(config, &args);

    if !args.yes {
        plan.validate()?;
        print_dry_run(&plan, &options);
        println!();
        println!("Dry-run mode: no changes made.");
        println!("Run with --yes to execute the plan.");
        return Ok(());
    }

    let mut executor = OrganizationExecutor::new(options).with_progress(|progress| {
        info!(
            phase = %progress.phase,
            percent = progress.percent,
            "{}",
            progress.message
        );
    });
    let result = executor.execute(&plan)?;

    print_result(&result, &plan);

    if let Some(report) = &args.report {
        write_json(&result, Some(report.as_path()))?;
        println!("Report written to {}", report.display());
    }

    outcome_error(&result).map_or(Ok(()), Err)
}

/// The error a failed run exits with, if any.
fn outcome_error(result: &OrganizationResult) -> Option<PackfuseError> {
    if result.success {
        return None;
    }
    let errors = result.errors.iter().filter(|e| e.is_error()).count();
    if result.fusion.groups_failed > 0 && errors == result.fusion.groups_failed {
        Some(PackfuseError::FusionError(format!(
            "{} fusion group(s) failed",
            result.fusion.groups_failed
        )))
    } else {
        Some(PackfuseError::FilesystemError(format!(
            "{} error(s) during execution, ended in phase {}",
            errors, result.final_phase
        )))
    }
}
