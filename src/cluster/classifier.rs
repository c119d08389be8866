//! Resolve a single classification for a whole cluster by member vote.

use super::keywords::{detect_format, detect_type, detect_variant};
use crate::model::{ClassifiedPack, FolderCluster, FolderPath, GroupClassification};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_FAMILY: &str = "Unsorted";
pub const DEFAULT_STYLE: &str = "Misc";
pub const DEFAULT_TYPE: &str = "Misc";

/// Outcome of classifying one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterVerdict {
    pub classification: GroupClassification,
    /// Share of family votes won by the winning family (0.0 with no votes).
    pub vote_confidence: f64,
    /// Number of members whose pack cast a family/style vote.
    pub voters: usize,
}

/// Plurality tally that keeps first-seen order for ties.
#[derive(Debug, Default)]
struct Tally {
    entries: Vec<(String, usize)>,
}

impl Tally {
    fn add(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(v, _)| v == value) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((value.to_string(), 1)),
        }
    }

    fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    fn winner(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (value, count) in &self.entries {
            if best.is_none_or(|(_, c)| *count > c) {
                best = Some((value.as_str(), *count));
            }
        }
        best
    }
}

/// Classifies clusters against a fixed set of packs.
pub struct ClusterClassifier<'a> {
    packs: HashMap<&'a str, &'a ClassifiedPack>,
}

impl<'a> ClusterClassifier<'a> {
    pub fn new(packs: &'a [ClassifiedPack]) -> Self {
        Self {
            packs: packs.iter().map(|p| (p.pack_id.as_str(), p)).collect(),
        }
    }

    pub fn pack(&self, pack_id: &str) -> Option<&'a ClassifiedPack> {
        self.packs.get(pack_id).copied()
    }

    /// Plurality vote of family, style and type over the cluster's members.
    ///
    /// Packs with an unresolved classification cast no family or style vote,
    /// but their members still vote on type.
    pub fn classify(&self, cluster: &FolderCluster) -> ClusterVerdict {
        let mut families = Tally::default();
        let mut styles = Tally::default();
        let mut types = Tally::default();
        let mut voters = 0;

        for member in &cluster.members {
            let pack = self.pack(&member.pack_id);

            if let Some(pack) = pack
                && pack.classification.method.is_resolved()
            {
                families.add(&pack.classification.family);
                styles.add(&pack.classification.style);
                voters += 1;
            }

            if let Some(type_name) = member_type(member, pack) {
                types.add(&type_name.to_uppercase());
            }
        }

        let vote_confidence = match (families.winner(), families.total()) {
            (Some((_, count)), total) if total > 0 => count as f64 / total as f64,
            _ => 0.0,
        };

        let mut texts = vec![cluster.canonical.clone()];
        texts.extend(
            cluster
                .members
                .iter()
                .map(|m| m.path.to_string_lossy().to_string()),
        );
        let format = texts.iter().find_map(|t| detect_format(t)).map(String::from);
        let variant = texts.iter().find_map(|t| detect_variant(t)).map(String::from);

        let classification = GroupClassification {
            family: winner_or(&families, DEFAULT_FAMILY),
            style: winner_or(&styles, DEFAULT_STYLE),
            type_name: winner_or(&types, DEFAULT_TYPE),
            format,
            variant,
        };

        debug!(
            canonical = %cluster.canonical,
            family = %classification.family,
            style = %classification.style,
            type_name = %classification.type_name,
            vote_confidence,
            "Classified cluster"
        );

        ClusterVerdict {
            classification,
            vote_confidence,
            voters,
        }
    }
}

fn winner_or(tally: &Tally, default: &str) -> String {
    tally
        .winner()
        .map(|(v, _)| v.to_string())
        .unwrap_or_else(|| default.to_string())
}

/// `path` relative to the pack root, or `path` itself when it is not below it.
pub fn relative_to_pack(pack: &ClassifiedPack, path: &Path) -> PathBuf {
    for root in [Some(pack.original_pack.path.as_path()), pack.path.as_deref()]
        .into_iter()
        .flatten()
    {
        if !root.as_os_str().is_empty()
            && let Ok(relative) = path.strip_prefix(root)
        {
            return relative.to_path_buf();
        }
    }
    path.to_path_buf()
}

/// Content type of one member folder: the pack's type zone covering it, else
/// the pack's overall type, else a keyword hit in the folder path.
fn member_type(member: &FolderPath, pack: Option<&ClassifiedPack>) -> Option<String> {
    if let Some(pack) = pack {
        let relative = relative_to_pack(pack, &member.path);
        if let Some(zone) = pack.internal_structure.zone_for(&relative) {
            return Some(zone.type_name.clone());
        }
        if let Some(hint) = &pack.classification.type_hint
            && !hint.trim().is_empty()
        {
            return Some(hint.clone());
        }
    }
    detect_type(&member.path.to_string_lossy()).map(String::from)
}
