//! Upstream inputs: folders, clusters, and classified packs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One physical folder belonging to one source pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPath {
    pub pack_id: String,
    pub path: PathBuf,
    pub file_count: usize,
}

impl FolderPath {
    pub fn new(pack_id: impl Into<String>, path: impl Into<PathBuf>, file_count: usize) -> Self {
        Self {
            pack_id: pack_id.into(),
            path: path.into(),
            file_count,
        }
    }

    /// The folder's own name (last path component).
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}

/// Aggregate similarity statistics of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterStatistics {
    /// Mean member score against the canonical name.
    pub avg_similarity: f64,
    /// Mean pairwise member score (1.0 for a single member).
    pub cohesion: f64,
    /// Number of distinct packs contributing members.
    pub pack_count: usize,
}

/// A group of folders whose names all score above the similarity threshold
/// against `canonical`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderCluster {
    pub canonical: String,
    pub members: Vec<FolderPath>,
    pub confidence: f64,
    pub statistics: ClusterStatistics,
}

impl FolderCluster {
    /// Sum of member file counts.
    pub fn total_files(&self) -> usize {
        self.members.iter().map(|m| m.file_count).sum()
    }
}

/// How the upstream classifier reached its verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// Keyword hits in pack or folder names.
    Lexical {
        #[serde(default)]
        keywords: Vec<String>,
    },
    /// Inferred from neighbouring content (BPM, tags, sibling packs).
    Contextual {
        #[serde(default)]
        signals: Vec<String>,
    },
    /// Matched a node of the genre taxonomy.
    Taxonomic { path: String },
    /// Produced by a model, possibly as a fallback after other methods failed.
    Ai {
        model: String,
        #[serde(default)]
        fallback: bool,
    },
    /// The classifier gave up; family and style are placeholders.
    #[default]
    Unresolved,
}

impl ClassificationMethod {
    /// Short label for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            ClassificationMethod::Lexical { .. } => "lexical",
            ClassificationMethod::Contextual { .. } => "contextual",
            ClassificationMethod::Taxonomic { .. } => "taxonomic",
            ClassificationMethod::Ai { fallback: false, .. } => "ai",
            ClassificationMethod::Ai { fallback: true, .. } => "ai_fallback",
            ClassificationMethod::Unresolved => "unresolved",
        }
    }

    /// Whether a classification produced this way may vote.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ClassificationMethod::Unresolved)
    }
}

/// A pack's resolved genre classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub family: String,
    pub style: String,
    /// Overall content type of the pack (e.g. `KICK`, `BASS`), when known.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub method: ClassificationMethod,
}

impl Classification {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
            type_hint: None,
            confidence: 1.0,
            method: ClassificationMethod::Taxonomic {
                path: String::new(),
            },
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_hint = Some(type_name.into());
        self
    }
}

/// A sub-folder of a pack detected as holding one content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeZone {
    /// Path relative to the pack root.
    pub path: PathBuf,
    pub type_name: String,
}

/// Structure detected inside a pack by the pack detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InternalStructure {
    #[serde(default)]
    pub detected_types: Vec<TypeZone>,
}

impl InternalStructure {
    /// Longest type zone containing `relative_dir`, compared segment-wise.
    pub fn zone_for(&self, relative_dir: &Path) -> Option<&TypeZone> {
        self.detected_types
            .iter()
            .filter(|zone| relative_dir.starts_with(&zone.path))
            .max_by_key(|zone| zone.path.components().count())
    }
}

/// Where the pack lives on disk before reorganization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OriginalPack {
    #[serde(default)]
    pub path: PathBuf,
}

/// A detected and classified pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPack {
    pub pack_id: String,
    pub name: String,
    pub classification: Classification,
    #[serde(default)]
    pub internal_structure: InternalStructure,
    #[serde(default)]
    pub audio_files: usize,
    #[serde(default)]
    pub preset_files: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_bpm: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub original_pack: OriginalPack,
    /// Alternative location reported by some detectors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Classification confidence too low to place the pack in the taxonomy.
    #[serde(default)]
    pub quarantined: bool,
    /// Total bytes of pack content, 0 when unknown.
    #[serde(default)]
    pub total_size: u64,
}

impl ClassifiedPack {
    pub fn new(
        pack_id: impl Into<String>,
        name: impl Into<String>,
        classification: Classification,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pack_id: pack_id.into(),
            name: name.into(),
            classification,
            internal_structure: InternalStructure::default(),
            audio_files: 0,
            preset_files: 0,
            avg_bpm: None,
            tags: Vec::new(),
            original_pack: OriginalPack { path: root.into() },
            path: None,
            quarantined: false,
            total_size: 0,
        }
    }

    /// Number of content files the detector counted.
    pub fn file_count(&self) -> usize {
        self.audio_files + self.preset_files
    }
}
