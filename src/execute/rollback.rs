//! Best-effort undo of an aborted run.

use super::types::{FusionGroupResult, OperationResult, RollbackReport};
use crate::fs::move_file;
use crate::plan::OperationKind;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// One undoable step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JournalEntry {
    /// Index into the operation results.
    Operation(usize),
    /// Index into the fusion group results.
    Fusion(usize),
}

/// Undo journaled steps in reverse order, continuing past failures.
///
/// Never removes anything that existed before the run: folders are removed
/// only when this run created them and they are empty, and overwritten files
/// are restored from the holding area.
pub(crate) fn rollback(
    journal: &[JournalEntry],
    results: &[OperationResult],
    fusions: &[FusionGroupResult],
) -> RollbackReport {
    let mut report = RollbackReport::default();

    for entry in journal.iter().rev() {
        match *entry {
            JournalEntry::Operation(i) => {
                if let Some(result) = results.get(i) {
                    undo_operation(result, &mut report);
                }
            }
            JournalEntry::Fusion(i) => {
                if let Some(fusion) = fusions.get(i) {
                    undo_fusion(fusion, &mut report);
                }
            }
        }
    }

    info!(
        attempted = report.attempted,
        succeeded = report.succeeded,
        failed = report.failed,
        irreversible = report.irreversible.len(),
        "Rollback finished"
    );

    report
}

fn fail(report: &mut RollbackReport, message: String) {
    warn!("{}", message);
    report.failed += 1;
    report.errors.push(message);
}

fn undo_operation(result: &OperationResult, report: &mut RollbackReport) {
    if !result.success || result.skipped {
        return;
    }

    match result.kind {
        OperationKind::CreateFolder => {
            if result.pre_existing {
                return;
            }
            report.attempted += 1;
            remove_created_folder(&result.target, &result.operation_id, report);
        }
        OperationKind::MoveFile => {
            report.attempted += 1;
            let Some(source) = &result.source else {
                fail(report, format!("{}: no source recorded", result.operation_id));
                return;
            };
            if !result.target.exists() {
                fail(
                    report,
                    format!(
                        "{}: '{}' is no longer at its target",
                        result.operation_id,
                        result.target.display()
                    ),
                );
            } else if source.exists() {
                fail(
                    report,
                    format!(
                        "{}: '{}' is occupied, not moving back",
                        result.operation_id,
                        source.display()
                    ),
                );
            } else {
                match move_file(&result.target, source) {
                    Ok(()) => {
                        debug!(op = %result.operation_id, "Moved file back");
                        report.succeeded += 1;
                    }
                    Err(e) => fail(report, format!("{}: {}", result.operation_id, e)),
                }
            }
            restore_displaced(result, report);
        }
        OperationKind::CopyFile => {
            report.attempted += 1;
            match fs::remove_file(&result.target) {
                Ok(()) => report.succeeded += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => report.succeeded += 1,
                Err(e) => fail(
                    report,
                    format!(
                        "{}: failed to remove copy '{}': {}",
                        result.operation_id,
                        result.target.display(),
                        e
                    ),
                ),
            }
            restore_displaced(result, report);
        }
        OperationKind::DeleteFile => {
            report.attempted += 1;
            report.irreversible.push(format!(
                "{}: deleted '{}' cannot be restored",
                result.operation_id,
                result
                    .source
                    .as_deref()
                    .unwrap_or(result.target.as_path())
                    .display()
            ));
        }
    }
}

fn remove_created_folder(path: &Path, operation_id: &str, report: &mut RollbackReport) {
    if !path.exists() {
        report.succeeded += 1;
        return;
    }
    let is_empty = fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);
    if !is_empty {
        let message = format!(
            "{}: left non-empty folder '{}' in place",
            operation_id,
            path.display()
        );
        warn!("{}", message);
        report.warnings.push(message);
        return;
    }
    match fs::remove_dir(path) {
        Ok(()) => report.succeeded += 1,
        Err(e) => fail(
            report,
            format!(
                "{}: failed to remove folder '{}': {}",
                operation_id,
                path.display(),
                e
            ),
        ),
    }
}

/// Put an overwritten file back from the holding area.
fn restore_displaced(result: &OperationResult, report: &mut RollbackReport) {
    let Some(parked) = &result.displaced else {
        return;
    };
    report.attempted += 1;

    if result.target.exists() {
        fail(
            report,
            format!(
                "{}: cannot restore '{}', target is occupied",
                result.operation_id,
                result.target.display()
            ),
        );
        return;
    }

    match move_file(parked, &result.target) {
        Ok(()) => {
            report.succeeded += 1;
            // Drop the now-empty parking folders.
            if let Some(op_dir) = parked.parent() {
                let _ = fs::remove_dir(op_dir);
                if let Some(holding) = op_dir.parent() {
                    let _ = fs::remove_dir(holding);
                }
            }
        }
        Err(e) => fail(report, format!("{}: {}", result.operation_id, e)),
    }
}

fn undo_fusion(fusion: &FusionGroupResult, report: &mut RollbackReport) {
    if fusion.files_moved == 0 && !fusion.target_created {
        return;
    }
    report.attempted += 1;

    let Some(moves) = &fusion.backup else {
        if fusion.files_moved > 0 {
            fail(
                report,
                format!(
                    "{}: no backup captured, {} fused file(s) stay in '{}'",
                    fusion.fusion_id,
                    fusion.files_moved,
                    fusion.target.display()
                ),
            );
        } else {
            remove_created_dirs(fusion);
            report.succeeded += 1;
        }
        return;
    };

    let mut restored = true;
    for file_move in moves.iter().rev() {
        let outcome = if file_move.to.exists() && !file_move.from.exists() {
            move_file(&file_move.to, &file_move.from).map_err(|e| e.to_string())
        } else {
            Err(format!(
                "cannot move '{}' back to '{}'",
                file_move.to.display(),
                file_move.from.display()
            ))
        };
        if let Err(message) = outcome {
            restored = false;
            report
                .errors
                .push(format!("{}: {}", fusion.fusion_id, message));
        }
    }

    remove_created_dirs(fusion);

    if restored {
        debug!(fusion = %fusion.fusion_id, files = moves.len(), "Reverted fusion");
        report.succeeded += 1;
    } else {
        warn!(fusion = %fusion.fusion_id, "Fusion only partially reverted");
        report.failed += 1;
    }
}

/// Remove the folders a fusion created, deepest first, when they are empty.
fn remove_created_dirs(fusion: &FusionGroupResult) {
    for dir in fusion.created_dirs.iter().rev() {
        let _ = fs::remove_dir(dir);
    }
    if fusion.target_created {
        let _ = fs::remove_dir(&fusion.target);
    }
}
