//! Tests for fusion-group construction and conflict resolution.

use super::*;
use crate::model::{
    Classification, ClassifiedPack, ClusterInfo, ClusterStatistics, ConflictResolution,
    ConflictType, FolderCluster, FolderPath, FusionGroup, FusionStatistics, GroupClassification,
    GroupMetadata, Resolution, SourceFileMapping,
};

fn bass_pack(id: &str) -> ClassifiedPack {
    ClassifiedPack::new(
        id,
        format!("Pack {}", id.to_uppercase()),
        Classification::new("Bass Music", "Dubstep").with_type("BASS"),
        format!("/packs/{}", id),
    )
}

fn cluster(canonical: &str, members: Vec<FolderPath>) -> FolderCluster {
    FolderCluster {
        canonical: canonical.to_string(),
        members,
        confidence: 0.95,
        statistics: ClusterStatistics {
            avg_similarity: 0.95,
            cohesion: 0.9,
            pack_count: 2,
        },
    }
}

fn classification(family: &str, type_name: &str, style: &str) -> GroupClassification {
    GroupClassification {
        family: family.to_string(),
        style: style.to_string(),
        type_name: type_name.to_string(),
        format: None,
        variant: None,
    }
}

fn group(id: &str, canonical: &str, target: &str, packs: &[(&str, usize)]) -> FusionGroup {
    let source_files: Vec<SourceFileMapping> = packs
        .iter()
        .map(|(pack, files)| SourceFileMapping {
            pack_id: pack.to_string(),
            pack_name: pack.to_string(),
            original_path: format!("/packs/{}/{}", pack, canonical).into(),
            file_count: *files,
            estimated_size: *files as u64 * 100,
            confidence: 1.0,
        })
        .collect();
    let total_files = source_files.iter().map(|s| s.file_count).sum();

    FusionGroup {
        id: id.to_string(),
        canonical: canonical.to_string(),
        target_path: target.to_string(),
        classification: classification("Techno", "KICK", "Peak Time"),
        statistics: FusionStatistics {
            total_files,
            total_size: total_files as u64 * 100,
            pack_count: packs.len(),
            duplicate_risk: 0.3,
            complexity_score: 0.2,
        },
        source_files,
        confidence: 0.8,
        metadata: GroupMetadata {
            cluster_info: ClusterInfo {
                avg_similarity: 0.9,
                cohesion: 0.9,
                member_count: packs.len(),
            },
            merged_from: Vec::new(),
        },
    }
}

// =========================================================================
// Target paths
// =========================================================================

#[test]
fn test_target_path_full_and_short_forms() {
    let mut c = classification("Bass Music", "BASS", "Dubstep");

    assert_eq!(
        generate_target_path("Aggressive Bass", &c, true),
        "/Bass_Music/BASS/Dubstep/Aggressive_Bass"
    );
    assert_eq!(
        generate_target_path("Aggressive Bass", &c, false),
        "/Bass_Music/BASS/Aggressive_Bass"
    );

    c.format = Some("Loop".to_string());
    c.variant = Some("Wet".to_string());
    assert_eq!(
        generate_target_path("Aggressive Bass", &c, true),
        "/Bass_Music/BASS/Dubstep/Loop/Aggressive_Bass/Wet"
    );
}

#[test]
fn test_target_path_is_idempotent() {
    let c = classification("Drum & Bass", "DRUMS", "Liquid: Rollers");

    let first = generate_target_path("  Break/Beats ", &c, true);
    let second = generate_target_path("  Break/Beats ", &c, true);
    assert_eq!(first, second);

    let resanitized = classification(
        &sanitize_segment(&c.family),
        &sanitize_segment(&c.type_name),
        &sanitize_segment(&c.style),
    );
    assert_eq!(
        generate_target_path(&sanitize_segment("  Break/Beats "), &resanitized, true),
        first
    );
}

// =========================================================================
// Builder
// =========================================================================

#[test]
fn test_kicks_and_kick_fuse_into_one_group() {
    let packs = vec![bass_pack("a"), bass_pack("b")];
    let clusters = vec![cluster(
        "Kicks",
        vec![
            FolderPath::new("a", "/packs/a/Kicks", 12),
            FolderPath::new("b", "/packs/b/Kick", 12),
        ],
    )];

    let outcome = FusionGroupBuilder::new(FusionOptions::default()).build(&clusters, &packs);

    assert_eq!(outcome.groups.len(), 1);
    let group = &outcome.groups[0];
    assert_eq!(group.id, "fusion_0001");
    assert_eq!(group.source_files.len(), 2);
    assert_eq!(group.statistics.total_files, 24);
    assert_eq!(group.statistics.pack_count, 2);
    assert_eq!(group.source_files[0].pack_name, "Pack A");
    assert_eq!(group.classification.type_name, "BASS");
    assert_eq!(group.target_path, "/Bass_Music/BASS/Dubstep/Kicks");
    assert!(outcome.unresolved.is_empty());
}

#[test]
fn test_clusters_outside_size_bounds_are_skipped() {
    let packs = vec![bass_pack("a")];
    let clusters = vec![cluster("Solo", vec![FolderPath::new("a", "/packs/a/Solo", 3)])];

    let outcome = FusionGroupBuilder::new(FusionOptions::default()).build(&clusters, &packs);
    assert!(outcome.groups.is_empty());

    let options = FusionOptions {
        min_group_size: 1,
        max_group_size: 1,
        ..FusionOptions::default()
    };
    let outcome = FusionGroupBuilder::new(options).build(&clusters, &packs);
    assert_eq!(outcome.groups.len(), 1);
}

#[test]
fn test_duplicate_target_groups_merge() {
    let packs = vec![bass_pack("a"), bass_pack("b"), bass_pack("c"), bass_pack("d")];
    let clusters = vec![
        cluster(
            "Aggressive Bass",
            vec![
                FolderPath::new("a", "/packs/a/Aggressive Bass", 10),
                FolderPath::new("b", "/packs/b/Aggressive Bass", 5),
            ],
        ),
        cluster(
            "Aggressive_Bass",
            vec![
                FolderPath::new("c", "/packs/c/Aggressive_Bass", 7),
                FolderPath::new("d", "/packs/d/Aggressive_Bass", 3),
            ],
        ),
    ];

    let outcome = FusionGroupBuilder::new(FusionOptions::default()).build(&clusters, &packs);

    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(outcome.applied.len(), 1);
    assert_eq!(outcome.applied[0].conflict_type, ConflictType::Duplicate);

    let group = &outcome.groups[0];
    assert_eq!(group.id, "fusion_0001");
    assert_eq!(group.target_path, "/Bass_Music/BASS/Dubstep/Aggressive_Bass");
    assert_eq!(group.source_files.len(), 4);
    assert_eq!(group.statistics.total_files, 25);
    assert_eq!(group.metadata.merged_from, vec!["fusion_0002"]);
}

#[test]
fn test_size_estimate_uses_pack_share_when_known() {
    let mut a = bass_pack("a");
    a.audio_files = 20;
    a.total_size = 2_000;
    let packs = vec![a, bass_pack("b")];
    let clusters = vec![cluster(
        "Kicks",
        vec![
            FolderPath::new("a", "/packs/a/Kicks", 5),
            FolderPath::new("b", "/packs/b/Kicks", 2),
        ],
    )];
    let options = FusionOptions {
        estimated_bytes_per_file: 1_000,
        ..FusionOptions::default()
    };

    let outcome = FusionGroupBuilder::new(options).build(&clusters, &packs);
    let sources = &outcome.groups[0].source_files;

    assert_eq!(sources[0].estimated_size, 500);
    assert_eq!(sources[1].estimated_size, 2_000);
    assert_eq!(outcome.groups[0].statistics.total_size, 2_500);
}

#[test]
fn test_duplicate_risk_and_complexity() {
    assert_eq!(duplicate_risk(0.95), 0.8);
    assert_eq!(duplicate_risk(0.85), 0.5);
    assert_eq!(duplicate_risk(0.75), 0.3);
    assert_eq!(duplicate_risk(0.7), 0.1);

    assert!((complexity_score(2, 0.8) - 0.3).abs() < 1e-9);
    assert_eq!(complexity_score(20, 0.0), 1.0);
}

#[test]
fn test_id_sequence_is_injected() {
    let mut ids = IdSequence::new("batch");
    assert_eq!(ids.next_id(), "batch_0001");
    assert_eq!(ids.next_id(), "batch_0002");

    let packs = vec![bass_pack("a"), bass_pack("b")];
    let clusters = vec![cluster(
        "Kicks",
        vec![
            FolderPath::new("a", "/packs/a/Kicks", 1),
            FolderPath::new("b", "/packs/b/Kicks", 1),
        ],
    )];
    let outcome =
        FusionGroupBuilder::with_ids(FusionOptions::default(), ids).build(&clusters, &packs);
    assert_eq!(outcome.groups[0].id, "batch_0003");
}

// =========================================================================
// Conflicts
// =========================================================================

#[test]
fn test_detect_overlap_conflicts() {
    let groups = vec![
        group("g1", "Kicks", "/T/KICK/Kicks", &[("a", 1), ("b", 1), ("c", 1)]),
        group("g2", "Snares", "/T/SNARE/Snares", &[("a", 1), ("b", 1), ("c", 1)]),
        group("g3", "Claps", "/T/CLAP/Claps", &[("a", 1), ("b", 1), ("d", 1)]),
    ];

    let conflicts = detect_conflicts(&groups, 0.5);

    let g1_g2 = conflicts
        .iter()
        .find(|c| c.group_id_1 == "g1" && c.group_id_2 == "g2")
        .expect("g1/g2 conflict");
    assert_eq!(g1_g2.conflict_type, ConflictType::Overlap);
    assert_eq!(g1_g2.resolution, Resolution::Merge);
    assert_eq!(g1_g2.confidence, 1.0);

    // Two of four packs shared is exactly at the threshold, not above it.
    assert!(
        !conflicts
            .iter()
            .any(|c| c.group_id_1 == "g1" && c.group_id_2 == "g3")
    );
}

#[test]
fn test_detect_manual_overlap_and_ambiguous() {
    let groups = vec![
        group("g1", "Kicks", "/T/KICK/Kicks", &[("a", 1), ("b", 1), ("c", 1)]),
        group(
            "g2",
            "Snares",
            "/T/SNARE/Snares",
            &[("a", 1), ("b", 1), ("c", 1), ("d", 1), ("e", 1)],
        ),
        group("g3", "Kickz", "/T/KICK/Kickz", &[("x", 1)]),
    ];

    let conflicts = detect_conflicts(&groups, 0.5);

    let overlap = conflicts
        .iter()
        .find(|c| c.group_id_1 == "g1" && c.group_id_2 == "g2")
        .expect("g1/g2 conflict");
    assert_eq!(overlap.conflict_type, ConflictType::Overlap);
    assert_eq!(overlap.resolution, Resolution::Manual);

    let ambiguous = conflicts
        .iter()
        .find(|c| c.group_id_1 == "g1" && c.group_id_2 == "g3")
        .expect("g1/g3 conflict");
    assert_eq!(ambiguous.conflict_type, ConflictType::Ambiguous);
    assert_eq!(ambiguous.resolution, Resolution::Manual);
    assert!((ambiguous.confidence - 0.8).abs() < 1e-9);
}

#[test]
fn test_duplicate_rule_wins_over_overlap() {
    let groups = vec![
        group("g1", "Kicks", "/Same", &[("a", 1)]),
        group("g2", "Snares", "/Same", &[("a", 1)]),
    ];

    let conflicts = detect_conflicts(&groups, 0.5);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].conflict_type, ConflictType::Duplicate);
    assert_eq!(conflicts[0].confidence, 0.9);
}

fn merge(a: &str, b: &str) -> ConflictResolution {
    ConflictResolution {
        group_id_1: a.to_string(),
        group_id_2: b.to_string(),
        conflict_type: ConflictType::Duplicate,
        resolution: Resolution::Merge,
        confidence: 0.9,
        reason: String::new(),
    }
}

fn manual(a: &str, b: &str) -> ConflictResolution {
    ConflictResolution {
        resolution: Resolution::Manual,
        conflict_type: ConflictType::Ambiguous,
        ..merge(a, b)
    }
}

#[test]
fn test_merges_apply_transitively_and_conserve_files() {
    let groups = vec![
        group("g1", "A", "/A", &[("a", 3)]),
        group("g2", "B", "/B", &[("b", 5)]),
        group("g3", "C", "/C", &[("c", 7)]),
        group("g4", "D", "/D", &[("d", 11)]),
    ];
    let before: usize = groups.iter().map(|g| g.statistics.total_files).sum();

    // g3 -> g2 -> g1 chain; g4 untouched.
    let result = apply_conflict_resolutions(groups, vec![merge("g2", "g3"), merge("g1", "g2")]);

    let after: usize = result.groups.iter().map(|g| g.statistics.total_files).sum();
    assert_eq!(before, after);
    assert_eq!(result.applied.len(), 2);
    assert_eq!(result.groups.len(), 2);

    let survivor = &result.groups[0];
    assert_eq!(survivor.id, "g1");
    assert_eq!(survivor.statistics.total_files, 15);
    assert_eq!(survivor.statistics.pack_count, 3);
    assert_eq!(survivor.source_files.len(), 3);
    assert_eq!(survivor.metadata.merged_from, vec!["g2", "g3"]);
    assert_eq!(result.groups[1].id, "g4");
}

#[test]
fn test_merge_statistics() {
    let mut a = group("g1", "A", "/A", &[("a", 2)]);
    a.statistics.duplicate_risk = 0.1;
    a.statistics.complexity_score = 0.2;
    a.confidence = 0.6;
    let mut b = group("g2", "B", "/B", &[("b", 2)]);
    b.statistics.duplicate_risk = 0.8;
    b.statistics.complexity_score = 0.4;
    b.confidence = 1.0;

    let result = apply_conflict_resolutions(vec![a, b], vec![merge("g1", "g2")]);
    let merged = &result.groups[0];

    assert_eq!(merged.statistics.duplicate_risk, 0.8);
    assert!((merged.statistics.complexity_score - 0.3).abs() < 1e-9);
    assert!((merged.confidence - 0.8).abs() < 1e-9);
    assert_eq!(merged.statistics.total_size, 400);
}

#[test]
fn test_unresolved_conflicts_are_remapped() {
    let groups = vec![
        group("g1", "A", "/A", &[("a", 1)]),
        group("g2", "B", "/B", &[("b", 1)]),
        group("g3", "C", "/C", &[("c", 1)]),
    ];

    let result = apply_conflict_resolutions(
        groups,
        vec![merge("g1", "g2"), manual("g2", "g3"), manual("g1", "g2")],
    );

    // g1/g2 collapsed into g1, so their manual conflict disappears.
    assert_eq!(result.unresolved.len(), 1);
    assert_eq!(result.unresolved[0].group_id_1, "g1");
    assert_eq!(result.unresolved[0].group_id_2, "g3");
}

#[test]
fn test_build_is_deterministic() {
    let packs = vec![bass_pack("a"), bass_pack("b")];
    let clusters = vec![
        cluster(
            "Kicks",
            vec![
                FolderPath::new("a", "/packs/a/Kicks", 4),
                FolderPath::new("b", "/packs/b/Kick", 4),
            ],
        ),
        cluster(
            "Snares",
            vec![
                FolderPath::new("a", "/packs/a/Snares", 4),
                FolderPath::new("b", "/packs/b/Snare", 4),
            ],
        ),
    ];

    let first = FusionGroupBuilder::new(FusionOptions::default()).build(&clusters, &packs);
    let second = FusionGroupBuilder::new(FusionOptions::default()).build(&clusters, &packs);

    assert_eq!(first.groups, second.groups);
    assert_eq!(first.total_files(), 16);
}
