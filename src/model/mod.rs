//! Shared data model: upstream inputs and fusion records.

mod fusion;
mod pack;

pub use fusion::{
    ClusterInfo, ConflictResolution, ConflictType, FusionGroup, FusionStatistics,
    GroupClassification, GroupMetadata, Resolution, SourceFileMapping,
};
pub use pack::{
    Classification, ClassificationMethod, ClassifiedPack, ClusterStatistics, FolderCluster,
    FolderPath, InternalStructure, OriginalPack, TypeZone,
};

use crate::error::{PackfuseError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read a JSON input file (packs, folders, clusters, plans).
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        PackfuseError::UserError(format!("failed to read '{}': {}", path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        PackfuseError::ValidationError(format!("failed to parse '{}': {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn classified_pack_parses_with_defaults() {
        let json = r#"{
            "pack_id": "p1",
            "name": "Dubstep Essentials",
            "classification": {
                "family": "Bass Music",
                "style": "Dubstep",
                "type": "BASS",
                "confidence": 0.9,
                "method": {"kind": "lexical", "keywords": ["dubstep"]}
            },
            "original_pack": {"path": "/packs/dubstep"}
        }"#;

        let pack: ClassifiedPack = serde_json::from_str(json).unwrap();

        assert_eq!(pack.classification.type_hint.as_deref(), Some("BASS"));
        assert_eq!(pack.classification.method.label(), "lexical");
        assert!(pack.internal_structure.detected_types.is_empty());
        assert!(!pack.quarantined);
        assert_eq!(pack.original_pack.path, PathBuf::from("/packs/dubstep"));
    }

    #[test]
    fn missing_method_is_unresolved() {
        let json = r#"{"family": "Unknown", "style": "Unknown"}"#;
        let classification: Classification = serde_json::from_str(json).unwrap();

        assert_eq!(classification.method, ClassificationMethod::Unresolved);
        assert!(!classification.method.is_resolved());
    }

    #[test]
    fn ai_fallback_label() {
        let method = ClassificationMethod::Ai {
            model: "local".to_string(),
            fallback: true,
        };
        assert_eq!(method.label(), "ai_fallback");
        assert!(method.is_resolved());
    }

    #[test]
    fn zone_for_picks_longest_prefix() {
        let structure = InternalStructure {
            detected_types: vec![
                TypeZone {
                    path: PathBuf::from("Drums"),
                    type_name: "DRUMS".to_string(),
                },
                TypeZone {
                    path: PathBuf::from("Drums/Kicks"),
                    type_name: "KICK".to_string(),
                },
            ],
        };

        let zone = structure.zone_for(Path::new("Drums/Kicks/Hard")).unwrap();
        assert_eq!(zone.type_name, "KICK");

        let zone = structure.zone_for(Path::new("Drums/Snares")).unwrap();
        assert_eq!(zone.type_name, "DRUMS");

        // Segment-wise: "Drumsets" is not inside "Drums".
        assert!(structure.zone_for(Path::new("Drumsets")).is_none());
    }

    #[test]
    fn folder_name_is_last_component() {
        let folder = FolderPath::new("p1", "/packs/a/Kicks", 12);
        assert_eq!(folder.name(), "Kicks");
    }

    #[test]
    fn read_json_reports_parse_errors_as_validation() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("packs.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = read_json::<Vec<ClassifiedPack>, _>(&path).unwrap_err();
        assert!(matches!(err, PackfuseError::ValidationError(_)));
    }
}
