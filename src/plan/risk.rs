//! Advisory risk assessment for plans.

use super::types::{FusionOperation, Operation, PlanRisk, RiskSeverity, RiskType};
use std::collections::HashMap;
use std::path::Path;

/// Fusion operations with more sources than this are flagged.
pub const MAX_SAFE_FUSION_SOURCES: usize = 5;
/// Plans moving more bytes than this are flagged.
pub const LARGE_PLAN_BYTES: u64 = 10 * 1024 * 1024 * 1024;

pub fn assess_risks(
    operations: &[Operation],
    fusion_operations: &[FusionOperation],
    total_size: u64,
) -> Vec<PlanRisk> {
    let mut risks = Vec::new();

    let file_ops: Vec<&Operation> = operations
        .iter()
        .filter(|op| op.kind.needs_source())
        .collect();
    let mut targets: HashMap<&Path, usize> = HashMap::new();
    for op in &file_ops {
        *targets.entry(op.target.as_path()).or_default() += 1;
    }
    let duplicates: usize = targets.values().filter(|&&n| n > 1).map(|n| n - 1).sum();

    if duplicates > 0 {
        let probability = duplicates as f64 / file_ops.len() as f64;
        risks.push(PlanRisk {
            risk_type: RiskType::Conflict,
            severity: if probability > 0.1 {
                RiskSeverity::High
            } else {
                RiskSeverity::Medium
            },
            probability,
            impact_score: f64::min(1.0, probability * 2.0),
            description: format!("{} file operation(s) share a target path", duplicates),
            mitigation: "Colliding files are renamed with a numeric suffix".to_string(),
        });
    }

    let complex: Vec<&FusionOperation> = fusion_operations
        .iter()
        .filter(|f| f.sources.len() > MAX_SAFE_FUSION_SOURCES)
        .collect();
    if !complex.is_empty() {
        let probability = complex.len() as f64 / fusion_operations.len() as f64;
        risks.push(PlanRisk {
            risk_type: RiskType::Fusion,
            severity: RiskSeverity::Medium,
            probability,
            impact_score: 0.5,
            description: format!(
                "{} fusion operation(s) merge more than {} sources",
                complex.len(),
                MAX_SAFE_FUSION_SOURCES
            ),
            mitigation: "Review the largest fusion groups before executing".to_string(),
        });
    }

    if total_size > LARGE_PLAN_BYTES {
        risks.push(PlanRisk {
            risk_type: RiskType::Space,
            severity: RiskSeverity::High,
            probability: 0.5,
            impact_score: 0.8,
            description: format!(
                "Plan processes {:.1} GiB",
                total_size as f64 / (1024.0 * 1024.0 * 1024.0)
            ),
            mitigation: "Confirm free space on the target volume, especially in copy mode"
                .to_string(),
        });
    }

    risks
}
