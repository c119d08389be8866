//! Sequential, phase-ordered plan execution.

use super::rollback::{JournalEntry, rollback};
use super::types::{
    ErrorCategory, ErrorSeverity, ExecutionError, ExecutionMetrics, ExecutionOptions,
    ExecutionPhase, FileMove, FusionGroupResult, FusionResult, OperationResult,
    OrganizationResult, Progress,
};
use crate::config::ConflictStrategy;
use crate::error::Result;
use crate::fs::{FileFilter, copy_file, list_files, move_file, path_depth, unique_path};
use crate::plan::{FusionOperation, Operation, OperationKind, OrganizationPlan};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Holding area, below the target root, for files replaced by `overwrite`.
pub const DISPLACED_DIR: &str = ".packfuse-displaced";

pub type ProgressCallback<'a> = Box<dyn FnMut(&Progress) + 'a>;

/// Runs an [`OrganizationPlan`] against the filesystem.
///
/// Phases run strictly in order: folder creation, fusion, then file
/// operations. Individual failures are recorded and execution continues
/// until a critical error or the configured error threshold is reached, at
/// which point the remaining plan is abandoned and, when enabled, the
/// completed steps are rolled back.
pub struct OrganizationExecutor<'a> {
    options: ExecutionOptions,
    progress: Option<ProgressCallback<'a>>,
}

/// Mutable state of one run.
struct Run<'p> {
    plan: &'p OrganizationPlan,
    phase: ExecutionPhase,
    results: Vec<OperationResult>,
    journal: Vec<JournalEntry>,
    errors: Vec<ExecutionError>,
    metrics: ExecutionMetrics,
    fusion: FusionResult,
    units_total: usize,
    units_done: usize,
    percent: f64,
    aborted: bool,
}

impl<'p> Run<'p> {
    fn new(plan: &'p OrganizationPlan) -> Self {
        Self {
            plan,
            phase: ExecutionPhase::Idle,
            results: Vec::new(),
            journal: Vec::new(),
            errors: Vec::new(),
            metrics: ExecutionMetrics {
                operations_total: plan.operations.len(),
                ..ExecutionMetrics::default()
            },
            fusion: FusionResult::default(),
            units_total: plan.operations.len() + plan.fusion_operations.len(),
            units_done: 0,
            percent: 0.0,
            aborted: false,
        }
    }

    fn record(&mut self, result: OperationResult) {
        if result.skipped {
            self.metrics.skipped += 1;
        } else if result.success {
            self.metrics.completed += 1;
        } else {
            self.metrics.failed += 1;
        }
        self.journal.push(JournalEntry::Operation(self.results.len()));
        self.results.push(result);
    }

    fn push_error(&mut self, error: ExecutionError) {
        warn!(
            op = error.operation_id.as_deref().unwrap_or("-"),
            category = ?error.category,
            severity = ?error.severity,
            "{}",
            error.message
        );
        self.errors.push(error);
    }

    /// Errors counted against the abort threshold.
    ///
    /// A failed fusion group counts once, however many of its sources or
    /// files failed, so one bad group cannot abandon its siblings.
    fn error_count(&self) -> usize {
        let standard = self
            .errors
            .iter()
            .filter(|e| e.is_error() && e.category != ErrorCategory::Fusion)
            .count();
        standard + self.fusion.groups_failed
    }

    fn has_critical(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.severity == ErrorSeverity::Critical)
    }
}

fn failed_result(op: &Operation) -> OperationResult {
    OperationResult {
        operation_id: op.id.clone(),
        kind: op.kind,
        success: false,
        source: op.source.clone(),
        target: op.target.clone(),
        skipped: false,
        pre_existing: false,
        displaced: None,
    }
}

impl<'a> OrganizationExecutor<'a> {
    pub fn new(options: ExecutionOptions) -> Self {
        Self {
            options,
            progress: None,
        }
    }

    /// Receive a [`Progress`] update at each phase boundary, after each
    /// fusion group and at each checkpoint.
    pub fn with_progress(mut self, callback: impl FnMut(&Progress) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }

    /// Execute `plan`.
    ///
    /// An invalid plan is rejected with a validation error before anything
    /// touches the filesystem. Otherwise the outcome, including failures,
    /// is reported on the returned [`OrganizationResult`].
    pub fn execute(&mut self, plan: &OrganizationPlan) -> Result<OrganizationResult> {
        plan.validate()?;

        let started_at = Utc::now();
        let clock = Instant::now();
        let mut run = Run::new(plan);

        info!(
            operations = plan.operations.len(),
            fusions = plan.fusion_operations.len(),
            target = %plan.target_root.display(),
            "Executing plan"
        );

        for phase in [
            ExecutionPhase::CreatingFolders,
            ExecutionPhase::FusingSources,
            ExecutionPhase::MovingFiles,
        ] {
            if self.should_abort(&run) {
                run.aborted = true;
                break;
            }
            run.phase = phase;
            self.report(&mut run, format!("Entering {}", phase));
            match phase {
                ExecutionPhase::CreatingFolders => self.create_folders(&mut run),
                ExecutionPhase::FusingSources => self.fuse_sources(&mut run),
                _ => self.run_file_operations(&mut run),
            }
            if run.aborted {
                break;
            }
        }
        if !run.aborted && self.should_abort(&run) {
            run.aborted = true;
        }

        run.fusion.success = run.fusion.groups_failed == 0;

        let rollback_report = if run.aborted {
            warn!(
                phase = %run.phase,
                errors = run.error_count(),
                "Execution aborted"
            );
            if self.options.enable_rollback {
                run.phase = ExecutionPhase::RollingBack;
                self.report(&mut run, "Rolling back".to_string());
                Some(rollback(&run.journal, &run.results, &run.fusion.groups))
            } else {
                None
            }
        } else {
            run.phase = ExecutionPhase::Finalized;
            purge_displaced(&plan.target_root);
            run.units_done = run.units_total;
            self.report(&mut run, "Finished".to_string());
            None
        };

        let success = !run.aborted && run.error_count() == 0 && run.fusion.success;
        let finished_at = Utc::now();
        let duration_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            success,
            completed = run.metrics.completed,
            failed = run.metrics.failed,
            skipped = run.metrics.skipped,
            duration_ms,
            "Execution finished"
        );

        Ok(OrganizationResult {
            success,
            final_phase: run.phase,
            started_at,
            finished_at,
            duration_ms,
            metrics: run.metrics,
            fusion: run.fusion,
            results: run.results,
            errors: run.errors,
            rollback: rollback_report,
        })
    }

    /// Abort once the error count reaches the threshold.
    fn should_abort(&self, run: &Run<'_>) -> bool {
        run.has_critical() || run.error_count() >= self.options.critical_error_threshold
    }

    fn report(&mut self, run: &mut Run<'_>, message: String) {
        let raw = if run.units_total == 0 {
            100.0
        } else {
            run.units_done as f64 * 100.0 / run.units_total as f64
        };
        run.percent = run.percent.max(raw.min(100.0));
        if let Some(callback) = self.progress.as_mut() {
            callback(&Progress {
                phase: run.phase,
                percent: run.percent,
                message,
            });
        }
    }

    fn create_folders(&mut self, run: &mut Run<'_>) {
        let plan = run.plan;
        let mut creates: Vec<&Operation> = plan
            .operations
            .iter()
            .filter(|op| op.kind == OperationKind::CreateFolder)
            .collect();
        creates.sort_by_key(|op| path_depth(&op.target));

        for op in creates {
            let pre_existing = op.target.is_dir();
            let outcome = if pre_existing {
                Ok(())
            } else {
                fs::create_dir_all(&op.target)
            };

            match outcome {
                Ok(()) => {
                    if !pre_existing {
                        run.metrics.folders_created += 1;
                    }
                    debug!(op = %op.id, path = %op.target.display(), pre_existing, "Folder ready");
                    run.record(OperationResult {
                        success: true,
                        pre_existing,
                        ..failed_result(op)
                    });
                }
                Err(e) => {
                    run.record(failed_result(op));
                    run.push_error(
                        ExecutionError::new(
                            ErrorCategory::Filesystem,
                            ErrorSeverity::Critical,
                            format!("failed to create folder: {}", e),
                        )
                        .for_operation(&op.id)
                        .at(&op.target),
                    );
                    run.aborted = true;
                    return;
                }
            }

            run.units_done += 1;
        }
    }

    fn fuse_sources(&mut self, run: &mut Run<'_>) {
        let plan = run.plan;
        for fusion in &plan.fusion_operations {
            let result = self.fuse_group(fusion, run);

            run.fusion.groups_processed += 1;
            if !result.success {
                run.fusion.groups_failed += 1;
            }
            run.fusion.files_moved += result.files_moved;
            run.fusion.duplicates_skipped += result.duplicates_skipped;
            run.fusion.conflicts_renamed += result.conflicts_renamed;
            run.metrics.bytes_processed += result.bytes_moved;
            run.journal.push(JournalEntry::Fusion(run.fusion.groups.len()));
            run.fusion.groups.push(result);

            run.units_done += 1;
            self.report(run, format!("Fused {}", fusion.canonical));

            if self.should_abort(run) {
                run.aborted = true;
                return;
            }
        }
    }

    /// Consolidate every source of one fusion into its target.
    ///
    /// Sources are processed in priority order. A file whose relative path
    /// already exists in the target with the same size is a duplicate and is
    /// left where it was; any other name clash is renamed with `_N`.
    fn fuse_group(&self, fusion: &FusionOperation, run: &mut Run<'_>) -> FusionGroupResult {
        let mut result = FusionGroupResult {
            fusion_id: fusion.id.clone(),
            group_id: fusion.group_id.clone(),
            target: fusion.target.clone(),
            success: true,
            target_created: !fusion.target.is_dir(),
            files_moved: 0,
            duplicates_skipped: 0,
            conflicts_renamed: 0,
            bytes_moved: 0,
            backup: self.options.capture_fusion_backup.then(Vec::new),
            created_dirs: Vec::new(),
        };

        if let Err(e) = fs::create_dir_all(&fusion.target) {
            result.success = false;
            result.target_created = false;
            run.push_error(
                ExecutionError::new(
                    ErrorCategory::Fusion,
                    ErrorSeverity::Error,
                    format!("failed to create fusion target: {}", e),
                )
                .for_operation(&fusion.id)
                .at(&fusion.target),
            );
            return result;
        }

        let mut sources: Vec<_> = fusion.sources.iter().collect();
        sources.sort_by_key(|s| s.priority);
        let filter = FileFilter::allow_all();

        for source in sources {
            if !source.source_path.is_dir() {
                result.success = false;
                run.push_error(
                    ExecutionError::new(
                        ErrorCategory::Fusion,
                        ErrorSeverity::Error,
                        format!("source folder of '{}' is missing", source.pack_name),
                    )
                    .for_operation(&fusion.id)
                    .at(&source.source_path),
                );
                continue;
            }

            let files = match list_files(&source.source_path, &filter) {
                Ok(files) => files,
                Err(e) => {
                    result.success = false;
                    run.push_error(
                        ExecutionError::new(ErrorCategory::Fusion, ErrorSeverity::Error, e.to_string())
                            .for_operation(&fusion.id)
                            .at(&source.source_path),
                    );
                    continue;
                }
            };

            for file in files {
                let mut destination = fusion.target.join(&file.relative);
                if destination.exists() {
                    let existing = fs::metadata(&destination).map(|m| m.len()).ok();
                    if existing == Some(file.size) {
                        debug!(file = %file.path.display(), "Duplicate left in place");
                        result.duplicates_skipped += 1;
                        continue;
                    }
                    destination = unique_path(&destination);
                    result.conflicts_renamed += 1;
                }

                let new_dirs = missing_dirs_below(&fusion.target, &destination);
                match move_file(&file.path, &destination) {
                    Ok(()) => {
                        result.created_dirs.extend(new_dirs);
                        result.files_moved += 1;
                        result.bytes_moved += file.size;
                        if let Some(backup) = result.backup.as_mut() {
                            backup.push(FileMove {
                                from: file.path,
                                to: destination,
                            });
                        }
                    }
                    Err(e) => {
                        result.success = false;
                        run.push_error(
                            ExecutionError::new(
                                ErrorCategory::Fusion,
                                ErrorSeverity::Error,
                                e.to_string(),
                            )
                            .for_operation(&fusion.id)
                            .at(&file.path),
                        );
                    }
                }
            }
        }

        info!(
            fusion = %fusion.id,
            moved = result.files_moved,
            duplicates = result.duplicates_skipped,
            renamed = result.conflicts_renamed,
            "Fused {}",
            fusion.canonical
        );

        result
    }

    fn run_file_operations(&mut self, run: &mut Run<'_>) {
        let plan = run.plan;
        for op in plan.operations.iter().filter(|op| op.kind.needs_source()) {
            let result = self.run_file_operation(op, run);
            run.record(result);
            run.units_done += 1;

            if plan.checkpoints.contains(&op.id) {
                run.metrics.checkpoints_reached += 1;
                debug!(op = %op.id, "Checkpoint reached");
                self.report(run, format!("Checkpoint {}", op.id));
            }

            if self.should_abort(run) {
                run.aborted = true;
                return;
            }
        }
    }

    fn run_file_operation(&self, op: &Operation, run: &mut Run<'_>) -> OperationResult {
        let Some(source) = op.source.as_deref() else {
            run.push_error(
                ExecutionError::new(
                    ErrorCategory::Validation,
                    ErrorSeverity::Error,
                    "operation has no source",
                )
                .for_operation(&op.id)
                .unrecoverable(),
            );
            return failed_result(op);
        };

        if !source.is_file() {
            run.push_error(
                ExecutionError::new(
                    ErrorCategory::Filesystem,
                    ErrorSeverity::Error,
                    "source file is missing",
                )
                .for_operation(&op.id)
                .at(source),
            );
            return failed_result(op);
        }

        if op.kind == OperationKind::DeleteFile {
            return match fs::remove_file(source) {
                Ok(()) => {
                    run.metrics.files_deleted += 1;
                    OperationResult {
                        success: true,
                        ..failed_result(op)
                    }
                }
                Err(e) => {
                    run.push_error(
                        ExecutionError::new(
                            ErrorCategory::Filesystem,
                            ErrorSeverity::Error,
                            format!("failed to delete: {}", e),
                        )
                        .for_operation(&op.id)
                        .at(source),
                    );
                    failed_result(op)
                }
            };
        }

        let size = fs::metadata(source)
            .map(|m| m.len())
            .unwrap_or(op.estimated_size);
        let mut target = op.target.clone();
        let mut displaced = None;

        if target.exists() {
            match self.options.conflict_strategy.effective() {
                ConflictStrategy::Skip => {
                    debug!(op = %op.id, target = %target.display(), "Target exists, skipping");
                    return OperationResult {
                        success: true,
                        skipped: true,
                        ..failed_result(op)
                    };
                }
                ConflictStrategy::Overwrite => {
                    let parked = displaced_path(&run.plan.target_root, &op.id, &target);
                    if let Err(e) = move_file(&target, &parked) {
                        run.push_error(
                            ExecutionError::new(
                                ErrorCategory::Conflict,
                                ErrorSeverity::Error,
                                format!("failed to displace existing target: {}", e),
                            )
                            .for_operation(&op.id)
                            .at(&target),
                        );
                        return failed_result(op);
                    }
                    displaced = Some(parked);
                }
                ConflictStrategy::Rename | ConflictStrategy::Ask => {
                    target = unique_path(&target);
                    debug!(op = %op.id, target = %target.display(), "Target exists, renamed");
                }
            }
        }

        let outcome = match op.kind {
            OperationKind::CopyFile => copy_file(source, &target).map(|_| ()),
            _ => move_file(source, &target),
        };

        match outcome {
            Ok(()) => {
                if op.kind == OperationKind::CopyFile {
                    run.metrics.files_copied += 1;
                } else {
                    run.metrics.files_moved += 1;
                }
                run.metrics.bytes_processed += size;
                OperationResult {
                    success: true,
                    target,
                    displaced,
                    ..failed_result(op)
                }
            }
            Err(e) => {
                if let Some(parked) = &displaced
                    && let Err(restore) = move_file(parked, &op.target)
                {
                    warn!(op = %op.id, "Failed to restore displaced file: {}", restore);
                }
                run.push_error(
                    ExecutionError::new(ErrorCategory::Filesystem, ErrorSeverity::Error, e.to_string())
                        .for_operation(&op.id)
                        .at(source),
                );
                failed_result(op)
            }
        }
    }
}

/// Directories between `root` and `file` that do not exist yet, outermost first.
fn missing_dirs_below(root: &Path, file: &Path) -> Vec<PathBuf> {
    let mut missing: Vec<PathBuf> = file
        .ancestors()
        .skip(1)
        .take_while(|dir| *dir != root && dir.starts_with(root))
        .filter(|dir| !dir.exists())
        .map(Path::to_path_buf)
        .collect();
    missing.reverse();
    missing
}

fn displaced_path(target_root: &Path, operation_id: &str, target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("displaced"));
    target_root.join(DISPLACED_DIR).join(operation_id).join(name)
}

/// Drop the holding area once overwritten files are no longer needed.
fn purge_displaced(target_root: &Path) {
    let holding = target_root.join(DISPLACED_DIR);
    if holding.exists()
        && let Err(e) = fs::remove_dir_all(&holding)
    {
        warn!(path = %holding.display(), "Failed to purge displaced files: {}", e);
    }
}
