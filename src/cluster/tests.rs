//! Tests for clustering and cluster classification.

use super::*;
use crate::model::{
    Classification, ClassificationMethod, ClassifiedPack, ClusterStatistics, FolderCluster,
    FolderPath, TypeZone,
};
use crate::similarity::SimilarityScorer;

fn folder(pack: &str, path: &str, files: usize) -> FolderPath {
    FolderPath::new(pack, path, files)
}

fn cluster_of(canonical: &str, members: Vec<FolderPath>) -> FolderCluster {
    FolderCluster {
        canonical: canonical.to_string(),
        members,
        confidence: 0.9,
        statistics: ClusterStatistics {
            avg_similarity: 0.9,
            cohesion: 0.9,
            pack_count: 2,
        },
    }
}

fn pack(id: &str, family: &str, style: &str) -> ClassifiedPack {
    ClassifiedPack::new(
        id,
        format!("{} Pack", id),
        Classification::new(family, style),
        format!("/packs/{}", id),
    )
}

// =========================================================================
// build_clusters
// =========================================================================

#[test]
fn test_build_clusters_groups_plural_variants() {
    let folders = vec![
        folder("a", "/packs/a/Kicks", 12),
        folder("b", "/packs/b/Kick", 12),
        folder("a", "/packs/a/Snares", 8),
    ];
    let clusters = build_clusters(&folders, &SimilarityScorer::default());

    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].canonical, "Kicks");
    assert_eq!(clusters[0].members.len(), 2);
    assert_eq!(clusters[0].total_files(), 24);
    assert_eq!(clusters[0].statistics.pack_count, 2);
    assert_eq!(clusters[1].canonical, "Snares");
    assert_eq!(clusters[1].members.len(), 1);
}

#[test]
fn test_build_clusters_members_meet_threshold() {
    let folders = vec![
        folder("a", "/packs/a/Drum Loops", 4),
        folder("b", "/packs/b/Drum_Loops", 4),
        folder("c", "/packs/c/Loops Drum", 4),
        folder("c", "/packs/c/Vocal Chops", 4),
        folder("d", "/packs/d/FX Risers", 4),
        folder("d", "/packs/d/Risers", 4),
    ];
    let scorer = SimilarityScorer::default();
    let clusters = build_clusters(&folders, &scorer);

    let member_count: usize = clusters.iter().map(|c| c.members.len()).sum();
    assert_eq!(member_count, folders.len());

    for cluster in &clusters {
        for member in &cluster.members {
            assert!(
                scorer.similar(&member.name(), &cluster.canonical),
                "{:?} not similar to {:?}",
                member.name(),
                cluster.canonical
            );
        }
    }
}

#[test]
fn test_build_clusters_singleton_statistics() {
    let folders = vec![folder("a", "/packs/a/Snares", 8)];
    let clusters = build_clusters(&folders, &SimilarityScorer::default());

    assert_eq!(clusters.len(), 1);
    let stats = clusters[0].statistics;
    assert_eq!(stats.avg_similarity, 1.0);
    assert_eq!(stats.cohesion, 1.0);
    assert_eq!(stats.pack_count, 1);
    assert_eq!(clusters[0].confidence, 1.0);
}

#[test]
fn test_build_clusters_empty_input() {
    assert!(build_clusters(&[], &SimilarityScorer::default()).is_empty());
}

// =========================================================================
// ClusterClassifier
// =========================================================================

#[test]
fn test_classify_plurality_vote() {
    let packs = vec![
        pack("a", "Bass Music", "Dubstep"),
        pack("b", "Bass Music", "Dubstep"),
        pack("c", "House", "Deep House"),
    ];
    let cluster = cluster_of(
        "Kicks",
        vec![
            folder("a", "/packs/a/Kicks", 10),
            folder("b", "/packs/b/Kick", 10),
            folder("c", "/packs/c/Kicks", 10),
        ],
    );

    let verdict = ClusterClassifier::new(&packs).classify(&cluster);

    assert_eq!(verdict.classification.family, "Bass Music");
    assert_eq!(verdict.classification.style, "Dubstep");
    assert_eq!(verdict.classification.type_name, "KICK");
    assert_eq!(verdict.voters, 3);
    assert!((verdict.vote_confidence - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_classify_tie_keeps_first_seen() {
    let packs = vec![pack("a", "Techno", "Peak Time"), pack("b", "House", "Tech House")];
    let cluster = cluster_of(
        "Loops",
        vec![
            folder("a", "/packs/a/Loops", 5),
            folder("b", "/packs/b/Loops", 5),
        ],
    );

    let verdict = ClusterClassifier::new(&packs).classify(&cluster);

    assert_eq!(verdict.classification.family, "Techno");
    assert_eq!(verdict.classification.style, "Peak Time");
    assert_eq!(verdict.vote_confidence, 0.5);
}

#[test]
fn test_classify_unresolved_pack_does_not_vote() {
    let mut unresolved = pack("b", "Unknown", "Unknown");
    unresolved.classification.method = ClassificationMethod::Unresolved;
    let packs = vec![pack("a", "Techno", "Minimal"), unresolved.clone(), unresolved];

    let cluster = cluster_of(
        "Hats",
        vec![
            folder("a", "/packs/a/Hats", 5),
            folder("b", "/packs/b/Hats", 5),
            folder("b", "/packs/b/More Hats", 5),
        ],
    );

    let verdict = ClusterClassifier::new(&packs).classify(&cluster);

    assert_eq!(verdict.classification.family, "Techno");
    assert_eq!(verdict.voters, 1);
    assert_eq!(verdict.vote_confidence, 1.0);
    assert_eq!(verdict.classification.type_name, "HIHAT");
}

#[test]
fn test_classify_defaults_without_votes() {
    let cluster = cluster_of("Stuff", vec![folder("x", "/somewhere/Stuff", 3)]);

    let verdict = ClusterClassifier::new(&[]).classify(&cluster);

    assert_eq!(verdict.classification.family, DEFAULT_FAMILY);
    assert_eq!(verdict.classification.style, DEFAULT_STYLE);
    assert_eq!(verdict.classification.type_name, DEFAULT_TYPE);
    assert_eq!(verdict.vote_confidence, 0.0);
    assert_eq!(verdict.voters, 0);
}

#[test]
fn test_classify_type_zone_beats_type_hint() {
    let mut a = pack("a", "Bass Music", "Dubstep");
    a.classification.type_hint = Some("DRUMS".to_string());
    a.internal_structure.detected_types = vec![
        TypeZone {
            path: "Sounds".into(),
            type_name: "FX".to_string(),
        },
        TypeZone {
            path: "Sounds/Growls".into(),
            type_name: "BASS".to_string(),
        },
    ];
    let packs = vec![a];
    let cluster = cluster_of("Growls", vec![folder("a", "/packs/a/Sounds/Growls", 7)]);

    let verdict = ClusterClassifier::new(&packs).classify(&cluster);

    assert_eq!(verdict.classification.type_name, "BASS");
}

#[test]
fn test_classify_type_hint_beats_lexical() {
    let mut a = pack("a", "Hip Hop", "Boom Bap");
    a.classification = a.classification.with_type("drums");
    let packs = vec![a];
    let cluster = cluster_of("Kicks", vec![folder("a", "/packs/a/Kicks", 7)]);

    let verdict = ClusterClassifier::new(&packs).classify(&cluster);

    assert_eq!(verdict.classification.type_name, "DRUMS");
}

#[test]
fn test_classify_format_and_variant_keywords() {
    let cluster = cluster_of(
        "Bass Loops",
        vec![folder("a", "/packs/a/Wet/Bass Loops", 4)],
    );

    let verdict = ClusterClassifier::new(&[]).classify(&cluster);

    assert_eq!(verdict.classification.format.as_deref(), Some("Loop"));
    assert_eq!(verdict.classification.variant.as_deref(), Some("Wet"));
    assert_eq!(verdict.classification.type_name, "BASS");
}

// =========================================================================
// Keyword tables
// =========================================================================

#[test]
fn test_detect_type_keywords() {
    assert_eq!(detect_type("Kicks"), Some("KICK"));
    assert_eq!(detect_type("/x/Drums/Kicks"), Some("KICK"));
    assert_eq!(detect_type("Open_Hats"), Some("HIHAT"));
    assert_eq!(detect_type("808s"), Some("BASS"));
    assert_eq!(detect_type("Vocal Chops"), Some("VOCAL"));
    assert_eq!(detect_type("FX Risers"), Some("FX"));
    assert_eq!(detect_type("Rhodes Keys"), Some("KEYS"));
    assert_eq!(detect_type("Something Else"), None);
}

#[test]
fn test_detect_format_order() {
    assert_eq!(detect_format("MIDI Loops"), Some("MIDI"));
    assert_eq!(detect_format("Serum Presets"), Some("Preset"));
    assert_eq!(detect_format("Song Stems"), Some("Stem"));
    assert_eq!(detect_format("One Shots"), Some("OneShot"));
    assert_eq!(detect_format("Kicks"), None);
}

#[test]
fn test_detect_variant_order() {
    assert_eq!(detect_variant("Clean_Dirty"), Some("Clean"));
    assert_eq!(detect_variant("Hard Kicks"), Some("Hard"));
    assert_eq!(detect_variant("Kicks"), None);
}
