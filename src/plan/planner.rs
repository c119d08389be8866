//! Build an organization plan from packs and fusion groups.

use super::risk::assess_risks;
use super::structure::{FileInfo, FolderStructureBuilder};
use super::types::{
    ConflictHandling, EstimatedStats, FusionOperation, FusionSource, MergeStrategy, Operation,
    OperationKind, OrganizationPlan,
};
use crate::cluster::DEFAULT_TYPE;
use crate::config::{Config, HierarchyLevel, HierarchyTemplate, OperationMode};
use crate::error::Result;
use crate::fs::{FileFilter, WalkedFile, list_files};
use crate::fusion::sanitize_segment;
use crate::model::{ClassifiedPack, FusionGroup};
use crate::similarity::normalize;
use crate::taxonomy::Taxonomy;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Function used when no taxonomy function matches.
pub const DEFAULT_FUNCTION: &str = "Misc";
/// Top-level folder for packs too uncertain to classify.
pub const QUARANTINE_DIR: &str = "Quarantine";

/// Share of fused files expected to be exact duplicates.
const DUPLICATE_RATE: f64 = 0.10;
/// Share of fused files expected to need a rename.
const RENAME_RATE: f64 = 0.05;
/// Retries allowed for a retryable operation.
const DEFAULT_MAX_RETRIES: u32 = 3;

const CREATE_PRIORITY: u32 = 10;
const FILE_PRIORITY: u32 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerOptions {
    pub template: HierarchyTemplate,
    pub operation_mode: OperationMode,
    pub ignore_patterns: Vec<String>,
    pub throughput_bytes_per_sec: u64,
    /// Base for the `<working dir>/<pack name>` source fallback.
    pub working_dir: PathBuf,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PlannerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            template: config.hierarchy_template,
            operation_mode: config.operation_mode,
            ignore_patterns: config.ignore_patterns.clone(),
            throughput_bytes_per_sec: config.throughput_bytes_per_sec,
            working_dir: PathBuf::from("."),
        }
    }

    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }
}

/// Plans fusion and standard file operations onto a target hierarchy.
pub struct OrganizationPlanner {
    options: PlannerOptions,
    taxonomy: Taxonomy,
    filter: FileFilter,
}

/// A standard file placement before ids are assigned.
struct Placement {
    source: PathBuf,
    target: PathBuf,
    size: u64,
}

impl OrganizationPlanner {
    pub fn new(options: PlannerOptions, taxonomy: Taxonomy) -> Result<Self> {
        let filter = FileFilter::new(&options.ignore_patterns)?;
        Ok(Self {
            options,
            taxonomy,
            filter,
        })
    }

    /// Produce a complete plan. Reads the source trees but never modifies
    /// anything.
    pub fn plan(
        &self,
        packs: &[ClassifiedPack],
        groups: &[FusionGroup],
        target_root: &Path,
    ) -> Result<OrganizationPlan> {
        let mut warnings = Vec::new();

        let source_dirs: HashMap<&str, PathBuf> = packs
            .iter()
            .filter_map(|pack| match self.resolve_source_dir(pack) {
                Some(dir) => Some((pack.pack_id.as_str(), dir)),
                None => {
                    let message = format!(
                        "Pack '{}' ({}): source directory not found",
                        pack.name, pack.pack_id
                    );
                    warn!("{}", message);
                    warnings.push(message);
                    None
                }
            })
            .collect();

        let fusion_operations = self.plan_fusions(groups, target_root, &source_dirs);

        let mut claimed: HashMap<&str, Vec<&Path>> = HashMap::new();
        for fusion in &fusion_operations {
            for source in &fusion.sources {
                claimed
                    .entry(source.pack_id.as_str())
                    .or_default()
                    .push(source.source_path.as_path());
            }
        }

        let mut placements = Vec::new();
        for pack in packs {
            let Some(dir) = source_dirs.get(pack.pack_id.as_str()) else {
                continue;
            };
            let files = match list_files(dir, &self.filter) {
                Ok(files) => files,
                Err(e) => {
                    let message = format!("Pack '{}' ({}): {}", pack.name, pack.pack_id, e);
                    warn!("{}", message);
                    warnings.push(message);
                    continue;
                }
            };

            let pack_claims = claimed
                .get(pack.pack_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            for file in files {
                if is_claimed(&file, pack_claims) {
                    continue;
                }
                placements.push(Placement {
                    target: self.target_for(pack, &file.relative, target_root),
                    source: file.path,
                    size: file.size,
                });
            }
        }

        let mut folders = FolderStructureBuilder::new(target_root);
        for fusion in &fusion_operations {
            folders.reserve(&fusion.target);
        }
        for placement in &placements {
            if let Some(parent) = placement.target.parent() {
                let name = placement
                    .target
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                folders.add_file(
                    parent,
                    FileInfo {
                        name,
                        source: placement.source.clone(),
                        size: placement.size,
                    },
                );
            }
        }
        let folder_structure = folders.freeze();

        let operations = self.build_operations(&folder_structure.folder_paths(), placements);
        let checkpoints = checkpoint_ids(&operations);

        let file_size: u64 = operations.iter().map(|op| op.estimated_size).sum();
        let fused_size: u64 = fusion_operations.iter().map(|f| f.estimated_size).sum();
        let total_size = file_size + fused_size;
        let estimated_stats = EstimatedStats {
            total_operations: operations.len(),
            folders_to_create: count_kind(&operations, OperationKind::CreateFolder),
            files_to_move: count_kind(&operations, OperationKind::MoveFile),
            files_to_copy: count_kind(&operations, OperationKind::CopyFile),
            fusion_operations: fusion_operations.len(),
            fused_files: fusion_operations.iter().map(|f| f.estimated_files).sum(),
            total_size,
            estimated_duration_ms: operations
                .iter()
                .map(|op| op.estimated_duration_ms)
                .sum::<u64>()
                + self.duration_ms(fused_size),
        };

        let risks = assess_risks(&operations, &fusion_operations, total_size);

        info!(
            operations = operations.len(),
            fusions = fusion_operations.len(),
            folders = folder_structure.total_folders,
            risks = risks.len(),
            warnings = warnings.len(),
            "Planned organization"
        );

        Ok(OrganizationPlan {
            target_root: target_root.to_path_buf(),
            template: self.options.template,
            operations,
            fusion_operations,
            folder_structure,
            risks,
            estimated_stats,
            checkpoints,
            warnings,
        })
    }

    /// First existing directory of `original_pack.path`, `path`, then
    /// `<working dir>/<pack name>`.
    pub fn resolve_source_dir(&self, pack: &ClassifiedPack) -> Option<PathBuf> {
        let candidates = [
            Some(pack.original_pack.path.clone()),
            pack.path.clone(),
            Some(self.options.working_dir.join(&pack.name)),
        ];

        candidates
            .into_iter()
            .flatten()
            .filter(|p| !p.as_os_str().is_empty())
            .find(|p| p.is_dir())
    }

    fn plan_fusions(
        &self,
        groups: &[FusionGroup],
        target_root: &Path,
        source_dirs: &HashMap<&str, PathBuf>,
    ) -> Vec<FusionOperation> {
        groups
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let sources: Vec<FusionSource> = group
                    .source_files
                    .iter()
                    .enumerate()
                    .map(|(priority, source)| FusionSource {
                        pack_id: source.pack_id.clone(),
                        pack_name: source.pack_name.clone(),
                        source_path: absolute_source(
                            &source.original_path,
                            source_dirs.get(source.pack_id.as_str()),
                        ),
                        priority,
                        file_count: source.file_count,
                        estimated_size: source.estimated_size,
                    })
                    .collect();

                let estimated_files = group.statistics.total_files;
                debug!(group = %group.id, sources = sources.len(), "Planned fusion");

                FusionOperation {
                    id: format!("fuse_{:04}", i + 1),
                    group_id: group.id.clone(),
                    canonical: group.canonical.clone(),
                    target: target_root.join(logical_to_relative(&group.target_path)),
                    sources,
                    merge_strategy: MergeStrategy::MergeAll,
                    conflict_handling: ConflictHandling::RenameDuplicates,
                    estimated_files,
                    estimated_size: group.statistics.total_size,
                    estimated_duplicates: (estimated_files as f64 * DUPLICATE_RATE).round()
                        as usize,
                    estimated_rename_conflicts: (estimated_files as f64 * RENAME_RATE).round()
                        as usize,
                }
            })
            .collect()
    }

    /// Target of one standard file, relative path taken from the pack root.
    fn target_for(&self, pack: &ClassifiedPack, relative: &Path, target_root: &Path) -> PathBuf {
        let file_name = relative.file_name().unwrap_or(relative.as_os_str());
        let dir = relative.parent().unwrap_or(Path::new(""));

        if pack.quarantined {
            return target_root
                .join(QUARANTINE_DIR)
                .join(sanitize_segment(&pack.name))
                .join(dir)
                .join(file_name);
        }

        let placement = self.place(pack, dir);
        let mut target = target_root.to_path_buf();
        for level in self.options.template.levels() {
            let value = match level {
                HierarchyLevel::Family => &pack.classification.family,
                HierarchyLevel::Style => &pack.classification.style,
                HierarchyLevel::Type => &placement.type_name,
                HierarchyLevel::Function => &placement.function,
            };
            target.push(sanitize_segment(value));
        }
        for segment in &placement.preserved {
            target.push(segment);
        }
        target.join(file_name)
    }

    /// Type, function and preserved sub-folders for a directory inside a pack.
    fn place(&self, pack: &ClassifiedPack, dir: &Path) -> DirPlacement {
        let segments: Vec<String> = dir
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();

        let zone = pack.internal_structure.zone_for(dir);
        let type_name = zone
            .map(|z| z.type_name.clone())
            .or_else(|| {
                pack.classification
                    .type_hint
                    .clone()
                    .filter(|t| !t.trim().is_empty())
            })
            .unwrap_or_else(|| DEFAULT_TYPE.to_string());

        // Index just past the segment that named the type, if any.
        let type_end = match zone {
            Some(z) => z.path.components().count().min(segments.len()),
            None => {
                let key = match_key(&type_name);
                segments
                    .iter()
                    .position(|s| match_key(s) == key)
                    .map_or(0, |i| i + 1)
            }
        };

        let functions = self.taxonomy.functions_for(&type_name);
        let find_function = |from: usize| {
            segments.iter().enumerate().skip(from).find_map(|(i, s)| {
                let key = match_key(s);
                functions
                    .iter()
                    .find(|f| match_key(f) == key)
                    .map(|f| (i, f.clone()))
            })
        };
        let found = find_function(type_end).or_else(|| find_function(0));

        let (function, preserved_from) = match found {
            Some((i, function)) => (function, type_end.max(i + 1)),
            None => (DEFAULT_FUNCTION.to_string(), type_end),
        };

        DirPlacement {
            type_name,
            function,
            preserved: segments[preserved_from..].to_vec(),
        }
    }

    fn build_operations(&self, folders: &[&Path], placements: Vec<Placement>) -> Vec<Operation> {
        let mut operations = Vec::with_capacity(folders.len() + placements.len());
        let mut folder_ops: HashMap<PathBuf, String> = HashMap::new();
        let mut next = 1usize;
        let mut next_id = || {
            let id = format!("op_{:05}", next);
            next += 1;
            id
        };

        let mut ordered: Vec<&Path> = folders.to_vec();
        ordered.sort_by_key(|p| p.components().count());

        for folder in ordered {
            let id = next_id();
            let dependencies = folder
                .parent()
                .and_then(|p| folder_ops.get(p))
                .cloned()
                .into_iter()
                .collect();
            operations.push(Operation {
                id: id.clone(),
                kind: OperationKind::CreateFolder,
                priority: CREATE_PRIORITY,
                source: None,
                target: folder.to_path_buf(),
                dependencies,
                retryable: true,
                max_retries: DEFAULT_MAX_RETRIES,
                rollbackable: true,
                estimated_size: 0,
                estimated_duration_ms: 0,
            });
            folder_ops.insert(folder.to_path_buf(), id);
        }

        let kind = match self.options.operation_mode {
            OperationMode::Move => OperationKind::MoveFile,
            OperationMode::Copy => OperationKind::CopyFile,
        };

        for placement in placements {
            let dependencies = placement
                .target
                .parent()
                .and_then(|p| folder_ops.get(p))
                .cloned()
                .into_iter()
                .collect();
            operations.push(Operation {
                id: next_id(),
                kind,
                priority: FILE_PRIORITY,
                source: Some(placement.source),
                target: placement.target,
                dependencies,
                retryable: true,
                max_retries: DEFAULT_MAX_RETRIES,
                rollbackable: true,
                estimated_size: placement.size,
                estimated_duration_ms: self.duration_ms(placement.size),
            });
        }

        operations
    }

    fn duration_ms(&self, bytes: u64) -> u64 {
        let throughput = self.options.throughput_bytes_per_sec.max(1) as u128;
        u64::try_from(bytes as u128 * 1000 / throughput).unwrap_or(u64::MAX)
    }
}

struct DirPlacement {
    type_name: String,
    function: String,
    preserved: Vec<String>,
}

/// Case, separator and plural insensitive comparison key.
fn match_key(s: &str) -> String {
    normalize(s).replace(' ', "")
}

/// `/Bass_Music/BASS/...` -> `Bass_Music/BASS/...`
fn logical_to_relative(logical: &str) -> PathBuf {
    logical
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect()
}

fn absolute_source(path: &Path, pack_dir: Option<&PathBuf>) -> PathBuf {
    match pack_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

fn is_claimed(file: &WalkedFile, claims: &[&Path]) -> bool {
    claims
        .iter()
        .any(|claim| file.path.starts_with(claim) || file.relative.starts_with(claim))
}

fn count_kind(operations: &[Operation], kind: OperationKind) -> usize {
    operations.iter().filter(|op| op.kind == kind).count()
}

/// Every `ceil(n / 10)`-th operation id.
pub fn checkpoint_ids(operations: &[Operation]) -> Vec<String> {
    if operations.is_empty() {
        return Vec::new();
    }
    let step = operations.len().div_ceil(10);
    operations
        .iter()
        .skip(step - 1)
        .step_by(step)
        .map(|op| op.id.clone())
        .collect()
}
