//! Turn classified clusters into fusion groups.

use super::conflicts::{apply_conflict_resolutions, detect_conflicts};
use super::target_path::generate_target_path;
use super::{FusionOptions, IdSequence};
use crate::cluster::{ClusterClassifier, ClusterVerdict};
use crate::model::{
    ClassifiedPack, ClusterInfo, ConflictResolution, FolderCluster, FolderPath, FusionGroup,
    FusionStatistics, GroupMetadata, SourceFileMapping,
};
use crate::similarity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Groups produced by one build, plus what conflict resolution did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FusionBuildOutcome {
    pub groups: Vec<FusionGroup>,
    /// Merges applied while resolving conflicts.
    pub applied: Vec<ConflictResolution>,
    /// Conflicts that need a human decision.
    pub unresolved: Vec<ConflictResolution>,
}

impl FusionBuildOutcome {
    pub fn total_files(&self) -> usize {
        self.groups.iter().map(|g| g.statistics.total_files).sum()
    }
}

/// Duplicate risk grows with how alike the member names are.
pub fn duplicate_risk(avg_similarity: f64) -> f64 {
    if avg_similarity > 0.9 {
        0.8
    } else if avg_similarity > 0.8 {
        0.5
    } else if avg_similarity > 0.7 {
        0.3
    } else {
        0.1
    }
}

/// More packs and a looser cluster make a fusion harder to review.
pub fn complexity_score(pack_count: usize, cohesion: f64) -> f64 {
    f64::min(1.0, pack_count as f64 * 0.1 + (1.0 - cohesion) * 0.5)
}

/// Builds fusion groups from clusters, resolving conflicts between them.
pub struct FusionGroupBuilder {
    options: FusionOptions,
    ids: IdSequence,
}

impl FusionGroupBuilder {
    pub fn new(options: FusionOptions) -> Self {
        Self::with_ids(options, IdSequence::default())
    }

    pub fn with_ids(options: FusionOptions, ids: IdSequence) -> Self {
        Self { options, ids }
    }

    pub fn options(&self) -> &FusionOptions {
        &self.options
    }

    /// Classify each eligible cluster, build its group, then detect and
    /// apply conflicts.
    ///
    /// Clusters with a member count outside `[min_group_size, max_group_size]`
    /// are skipped.
    pub fn build(
        &mut self,
        clusters: &[FolderCluster],
        packs: &[ClassifiedPack],
    ) -> FusionBuildOutcome {
        let classifier = ClusterClassifier::new(packs);
        let mut groups = Vec::new();

        for cluster in clusters {
            let members = cluster.members.len();
            if members < self.options.min_group_size || members > self.options.max_group_size {
                debug!(
                    canonical = %cluster.canonical,
                    members,
                    "Skipping cluster outside group size bounds"
                );
                continue;
            }

            let verdict = classifier.classify(cluster);
            let group = self.build_group(cluster, &verdict, &classifier);
            debug!(
                id = %group.id,
                target = %group.target_path,
                sources = group.source_files.len(),
                files = group.statistics.total_files,
                "Built fusion group"
            );
            groups.push(group);
        }

        let conflicts = detect_conflicts(&groups, self.options.conflict_threshold);
        let resolved = apply_conflict_resolutions(groups, conflicts);

        info!(
            clusters = clusters.len(),
            groups = resolved.groups.len(),
            merged = resolved.applied.len(),
            unresolved = resolved.unresolved.len(),
            "Built fusion groups"
        );

        FusionBuildOutcome {
            groups: resolved.groups,
            applied: resolved.applied,
            unresolved: resolved.unresolved,
        }
    }

    fn build_group(
        &mut self,
        cluster: &FolderCluster,
        verdict: &ClusterVerdict,
        classifier: &ClusterClassifier<'_>,
    ) -> FusionGroup {
        let source_files: Vec<SourceFileMapping> = cluster
            .members
            .iter()
            .map(|member| self.source_mapping(cluster, member, classifier))
            .collect();

        let pack_count = source_files
            .iter()
            .map(|s| s.pack_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let stats = &cluster.statistics;

        let statistics = FusionStatistics {
            total_files: source_files.iter().map(|s| s.file_count).sum(),
            total_size: source_files.iter().map(|s| s.estimated_size).sum(),
            pack_count,
            duplicate_risk: duplicate_risk(stats.avg_similarity),
            complexity_score: complexity_score(pack_count, stats.cohesion),
        };

        FusionGroup {
            id: self.ids.next_id(),
            canonical: cluster.canonical.clone(),
            target_path: generate_target_path(
                &cluster.canonical,
                &verdict.classification,
                self.options.use_full_path,
            ),
            classification: verdict.classification.clone(),
            source_files,
            statistics,
            confidence: (cluster.confidence + verdict.vote_confidence) / 2.0,
            metadata: GroupMetadata {
                cluster_info: ClusterInfo {
                    avg_similarity: stats.avg_similarity,
                    cohesion: stats.cohesion,
                    member_count: cluster.members.len(),
                },
                merged_from: Vec::new(),
            },
        }
    }

    fn source_mapping(
        &self,
        cluster: &FolderCluster,
        member: &FolderPath,
        classifier: &ClusterClassifier<'_>,
    ) -> SourceFileMapping {
        let pack = classifier.pack(&member.pack_id);

        SourceFileMapping {
            pack_id: member.pack_id.clone(),
            pack_name: pack
                .map(|p| p.name.clone())
                .unwrap_or_else(|| member.pack_id.clone()),
            original_path: member.path.clone(),
            file_count: member.file_count,
            estimated_size: self.estimate_size(member, pack),
            confidence: similarity::score(&member.name(), &cluster.canonical, None, None).overall,
        }
    }

    /// The member's share of its pack's reported size, else a per-file estimate.
    fn estimate_size(&self, member: &FolderPath, pack: Option<&ClassifiedPack>) -> u64 {
        if let Some(pack) = pack
            && pack.total_size > 0
            && pack.file_count() > 0
        {
            let share =
                pack.total_size as u128 * member.file_count as u128 / pack.file_count() as u128;
            return u64::try_from(share).unwrap_or(u64::MAX);
        }
        member.file_count as u64 * self.options.estimated_bytes_per_file
    }
}
