//! Conflict detection between fusion groups and transitive merging.

use crate::model::{ConflictResolution, ConflictType, FusionGroup, Resolution};
use crate::similarity::levenshtein_similarity;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Confidence assigned to duplicate-target conflicts.
const DUPLICATE_CONFIDENCE: f64 = 0.9;
/// Pack overlap above which an overlap conflict is merged automatically.
const AUTO_MERGE_OVERLAP: f64 = 0.7;
/// Normalized canonical-name distance below which two groups are ambiguous.
const AMBIGUOUS_DISTANCE: f64 = 0.3;

/// Detect conflicts between every pair of groups.
///
/// Pairs are compared once (`i < j`), so this is quadratic in the number of
/// groups. For each pair the first matching rule wins:
///
/// 1. identical target path: `duplicate`, merged
/// 2. pack-id Jaccard above `conflict_threshold`: `overlap`, merged above 0.7
///    else manual
/// 3. canonical names within 0.3 normalized edit distance: `ambiguous`, manual
pub fn detect_conflicts(
    groups: &[FusionGroup],
    conflict_threshold: f64,
) -> Vec<ConflictResolution> {
    let pack_sets: Vec<HashSet<&str>> = groups
        .iter()
        .map(|g| g.pack_ids().into_iter().collect())
        .collect();

    let mut conflicts = Vec::new();

    for i in 0..groups.len() {
        for j in (i + 1)..groups.len() {
            let (a, b) = (&groups[i], &groups[j]);

            let found = classify_pair(a, b, &pack_sets[i], &pack_sets[j], conflict_threshold);
            if let Some(conflict) = found {
                debug!(
                    group_1 = %conflict.group_id_1,
                    group_2 = %conflict.group_id_2,
                    conflict_type = ?conflict.conflict_type,
                    resolution = ?conflict.resolution,
                    "Detected conflict"
                );
                conflicts.push(conflict);
            }
        }
    }

    conflicts
}

fn classify_pair(
    a: &FusionGroup,
    b: &FusionGroup,
    packs_a: &HashSet<&str>,
    packs_b: &HashSet<&str>,
    conflict_threshold: f64,
) -> Option<ConflictResolution> {
    let conflict = |conflict_type, resolution, confidence, reason: String| ConflictResolution {
        group_id_1: a.id.clone(),
        group_id_2: b.id.clone(),
        conflict_type,
        resolution,
        confidence,
        reason,
    };

    if a.target_path == b.target_path {
        return Some(conflict(
            ConflictType::Duplicate,
            Resolution::Merge,
            DUPLICATE_CONFIDENCE,
            format!("Both groups target {}", a.target_path),
        ));
    }

    let overlap = pack_overlap(packs_a, packs_b);
    if overlap > conflict_threshold {
        let resolution = if overlap > AUTO_MERGE_OVERLAP {
            Resolution::Merge
        } else {
            Resolution::Manual
        };
        return Some(conflict(
            ConflictType::Overlap,
            resolution,
            overlap,
            format!("{:.0}% of source packs are shared", overlap * 100.0),
        ));
    }

    let distance =
        1.0 - levenshtein_similarity(&a.canonical.to_lowercase(), &b.canonical.to_lowercase());
    if distance < AMBIGUOUS_DISTANCE {
        return Some(conflict(
            ConflictType::Ambiguous,
            Resolution::Manual,
            1.0 - distance,
            format!(
                "Canonical names '{}' and '{}' are nearly identical",
                a.canonical, b.canonical
            ),
        ));
    }

    None
}

fn pack_overlap(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Result of applying conflict resolutions.
#[derive(Debug, Clone, Default)]
pub struct AppliedConflicts {
    pub groups: Vec<FusionGroup>,
    /// Merge resolutions that were applied.
    pub applied: Vec<ConflictResolution>,
    /// Non-merge conflicts, with ids pointing at surviving groups.
    pub unresolved: Vec<ConflictResolution>,
}

/// Disjoint-set over group indices; the smallest index is always the root.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (keep, absorb) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[absorb] = keep;
        }
    }
}

/// Apply `merge` resolutions transitively.
///
/// Groups connected by merge conflicts collapse into the earliest group of
/// their component, which absorbs the others in input order. Total file
/// count is conserved. Every other resolution is returned unresolved.
pub fn apply_conflict_resolutions(
    groups: Vec<FusionGroup>,
    conflicts: Vec<ConflictResolution>,
) -> AppliedConflicts {
    let index: HashMap<String, usize> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| (g.id.clone(), i))
        .collect();

    let mut sets = UnionFind::new(groups.len());
    let mut applied = Vec::new();
    let mut pending = Vec::new();

    for conflict in conflicts {
        let pair = (
            index.get(&conflict.group_id_1).copied(),
            index.get(&conflict.group_id_2).copied(),
        );
        match (conflict.resolution, pair) {
            (Resolution::Merge, (Some(i), Some(j))) => {
                sets.union(i, j);
                applied.push(conflict);
            }
            _ => pending.push(conflict),
        }
    }

    let roots: Vec<usize> = (0..groups.len()).map(|i| sets.find(i)).collect();

    let mut survivors: Vec<Option<FusionGroup>> = Vec::with_capacity(groups.len());
    let mut absorbed: Vec<(usize, FusionGroup)> = Vec::new();
    for (i, group) in groups.into_iter().enumerate() {
        if roots[i] == i {
            survivors.push(Some(group));
        } else {
            survivors.push(None);
            absorbed.push((roots[i], group));
        }
    }

    let mut merge_counts: HashMap<usize, usize> = HashMap::new();
    for (root, group) in absorbed {
        if let Some(Some(survivor)) = survivors.get_mut(root) {
            let merged = merge_counts.entry(root).or_insert(1);
            absorb(survivor, group, *merged);
            *merged += 1;
        }
    }

    let id_of = |i: usize, survivors: &[Option<FusionGroup>]| {
        survivors[roots[i]].as_ref().map(|g| g.id.clone())
    };

    let mut unresolved = Vec::new();
    for mut conflict in pending {
        let (Some(&i), Some(&j)) = (
            index.get(&conflict.group_id_1),
            index.get(&conflict.group_id_2),
        ) else {
            unresolved.push(conflict);
            continue;
        };
        if roots[i] == roots[j] {
            continue;
        }
        if let (Some(id_1), Some(id_2)) = (id_of(i, &survivors), id_of(j, &survivors)) {
            conflict.group_id_1 = id_1;
            conflict.group_id_2 = id_2;
        }
        unresolved.push(conflict);
    }

    let groups: Vec<FusionGroup> = survivors.into_iter().flatten().collect();

    if !applied.is_empty() {
        info!(
            merges = applied.len(),
            groups = groups.len(),
            unresolved = unresolved.len(),
            "Applied conflict resolutions"
        );
    }

    AppliedConflicts {
        groups,
        applied,
        unresolved,
    }
}

/// Fold `other` into `survivor`. `merged` is how many groups `survivor`
/// already represents, for running averages.
fn absorb(survivor: &mut FusionGroup, other: FusionGroup, merged: usize) {
    let n = merged as f64;
    let stats = &mut survivor.statistics;

    stats.total_files += other.statistics.total_files;
    stats.total_size += other.statistics.total_size;
    stats.pack_count += other.statistics.pack_count;
    stats.duplicate_risk = stats.duplicate_risk.max(other.statistics.duplicate_risk);
    stats.complexity_score =
        (stats.complexity_score * n + other.statistics.complexity_score) / (n + 1.0);
    survivor.confidence = (survivor.confidence * n + other.confidence) / (n + 1.0);

    let info = &mut survivor.metadata.cluster_info;
    info.member_count += other.metadata.cluster_info.member_count;

    survivor.source_files.extend(other.source_files);
    survivor.metadata.merged_from.push(other.id);
    survivor.metadata.merged_from.extend(other.metadata.merged_from);
}
