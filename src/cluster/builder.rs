//! Greedy clustering of folders by name similarity.

use crate::model::{ClusterStatistics, FolderCluster, FolderPath};
use crate::similarity::SimilarityScorer;
use std::collections::HashSet;
use tracing::debug;

/// Cluster folders in one greedy pass.
///
/// Each folder joins the first existing cluster whose canonical name it is
/// `similar` to, otherwise it seeds a new cluster and its own name becomes the
/// canonical. Every member therefore scores at or above the scorer's threshold
/// against its cluster's canonical.
pub fn build_clusters(folders: &[FolderPath], scorer: &SimilarityScorer) -> Vec<FolderCluster> {
    let mut seeds: Vec<(String, Vec<FolderPath>)> = Vec::new();

    for folder in folders {
        let name = folder.name();
        match seeds
            .iter_mut()
            .find(|(canonical, _)| scorer.similar(&name, canonical))
        {
            Some((_, members)) => members.push(folder.clone()),
            None => seeds.push((name, vec![folder.clone()])),
        }
    }

    let clusters: Vec<FolderCluster> = seeds
        .into_iter()
        .map(|(canonical, members)| finish_cluster(canonical, members, scorer))
        .collect();

    debug!(
        folders = folders.len(),
        clusters = clusters.len(),
        "Clustered folders"
    );

    clusters
}

fn finish_cluster(
    canonical: String,
    members: Vec<FolderPath>,
    scorer: &SimilarityScorer,
) -> FolderCluster {
    let names: Vec<String> = members.iter().map(FolderPath::name).collect();

    let avg_similarity = names
        .iter()
        .map(|name| scorer.score(name, &canonical).overall)
        .sum::<f64>()
        / names.len() as f64;

    let mut pair_total = 0.0;
    let mut pair_count = 0usize;
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            pair_total += scorer.score(&names[i], &names[j]).overall;
            pair_count += 1;
        }
    }
    let cohesion = if pair_count == 0 {
        1.0
    } else {
        pair_total / pair_count as f64
    };

    let pack_count = members
        .iter()
        .map(|m| m.pack_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    FolderCluster {
        canonical,
        members,
        confidence: avg_similarity,
        statistics: ClusterStatistics {
            avg_similarity,
            cohesion,
            pack_count,
        },
    }
}
