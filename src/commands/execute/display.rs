//! Display and formatting utilities for execute command output.

use crate::commands::make_relative;
use crate::execute::{ExecutionOptions, OrganizationResult};
use crate::plan::{OperationKind, OrganizationPlan};

/// Print what a run of `plan` would do.
pub fn print_dry_run(plan: &OrganizationPlan, options: &ExecutionOptions) {
    let root = &plan.target_root;
    println!("Execution plan for {}:", root.display());
    println!(
        "  conflicts: {:?}, rollback: {}",
        options.conflict_strategy,
        if options.enable_rollback { "on" } else { "off" }
    );
    println!();

    if !plan.fusion_operations.is_empty() {
        println!("Fusions ({}):", plan.fusion_operations.len());
        for fusion in &plan.fusion_operations {
            println!("  - {}", make_relative(&fusion.target, root));
            for source in &fusion.sources {
                println!(
                    "      <- {} [{}]",
                    source.source_path.display(),
                    source.pack_name
                );
            }
        }
        println!();
    }

    let creates = plan
        .operations
        .iter()
        .filter(|op| op.kind == OperationKind::CreateFolder)
        .count();
    println!("Folders to create: {}", creates);

    let file_ops: Vec<_> = plan
        .operations
        .iter()
        .filter(|op| op.kind.needs_source())
        .collect();
    if !file_ops.is_empty() {
        println!("File operations ({}):", file_ops.len());
        for op in file_ops {
            let source = op
                .source
                .as_deref()
                .map(|s| s.display().to_string())
                .unwrap_or_default();
            println!(
                "  - {} {} -> {}",
                op.kind.label(),
                source,
                make_relative(&op.target, root)
            );
        }
    }
}

/// Print the outcome of a run.
pub fn print_result(result: &OrganizationResult, plan: &OrganizationPlan) {
    let metrics = &result.metrics;
    let status = if result.success { "succeeded" } else { "failed" };

    println!("Execution {} ({} ms)", status, result.duration_ms);
    println!();
    println!("  Folders created: {}", metrics.folders_created);
    println!("  Files moved:     {}", metrics.files_moved);
    println!("  Files copied:    {}", metrics.files_copied);
    if metrics.files_deleted > 0 {
        println!("  Files deleted:   {}", metrics.files_deleted);
    }
    println!("  Skipped:         {}", metrics.skipped);
    println!("  Failed:          {}", metrics.failed);

    let fusion = &result.fusion;
    if fusion.groups_processed > 0 {
        println!(
            "  Fusions:         {} processed, {} failed, {} files, {} duplicates left, {} renamed",
            fusion.groups_processed,
            fusion.groups_failed,
            fusion.files_moved,
            fusion.duplicates_skipped,
            fusion.conflicts_renamed
        );
    }

    if !result.errors.is_empty() {
        println!();
        println!("Errors ({}):", result.errors.len());
        for error in &result.errors {
            let op = error.operation_id.as_deref().unwrap_or("-");
            let path = error
                .path
                .as_deref()
                .map(|p| format!(" [{}]", make_relative(p, &plan.target_root)))
                .unwrap_or_default();
            println!(
                "  - {:?} {:?} {}: {}{}",
                error.severity, error.category, op, error.message, path
            );
        }
    }

    if let Some(rollback) = &result.rollback {
        println!();
        println!(
            "Rollback: {} of {} step(s) undone, {} failed",
            rollback.succeeded, rollback.attempted, rollback.failed
        );
        for line in rollback
            .warnings
            .iter()
            .chain(&rollback.errors)
            .chain(&rollback.irreversible)
        {
            println!("  - {}", line);
        }
    }
}
