//! Display and formatting utilities for plan command output.

use super::pipeline::PlanRun;
use crate::commands::make_relative;

/// Print the plan in a readable format.
pub fn print_plan_summary(run: &PlanRun) {
    let plan = &run.plan;
    let stats = &plan.estimated_stats;

    println!("Organization plan for {}:", plan.target_root.display());
    println!();
    println!("  Fusion groups:     {}", stats.fusion_operations);
    println!("  Fused files:       {}", stats.fused_files);
    println!("  Folders to create: {}", stats.folders_to_create);
    println!("  Files to move:     {}", stats.files_to_move);
    println!("  Files to copy:     {}", stats.files_to_copy);
    println!("  Total size:        {}", format_bytes(stats.total_size));
    println!(
        "  Estimated time:    {}",
        format_duration_ms(stats.estimated_duration_ms)
    );
    println!();

    if !plan.fusion_operations.is_empty() {
        println!("Fusions ({}):", plan.fusion_operations.len());
        for fusion in &plan.fusion_operations {
            println!(
                "  - {} -> {} ({} sources, {} files)",
                fusion.canonical,
                make_relative(&fusion.target, &plan.target_root),
                fusion.sources.len(),
                fusion.estimated_files
            );
        }
        println!();
    }

    if !run.fusion.applied.is_empty() {
        println!("Merged groups ({}):", run.fusion.applied.len());
        for merge in &run.fusion.applied {
            println!(
                "  - {} absorbed {} ({})",
                merge.group_id_1, merge.group_id_2, merge.reason
            );
        }
        println!();
    }

    if !plan.risks.is_empty() {
        println!("Risks ({}):", plan.risks.len());
        for risk in &plan.risks {
            println!(
                "  - [{:?}] {:?}: {}",
                risk.severity, risk.risk_type, risk.description
            );
            println!("      mitigation: {}", risk.mitigation);
        }
        println!();
    }

    if !run.fusion.unresolved.is_empty() {
        println!(
            "Unresolved conflicts ({}):",
            run.fusion.unresolved.len()
        );
        for conflict in &run.fusion.unresolved {
            println!(
                "  - {} <-> {}: {:?}, {:.2} ({})",
                conflict.group_id_1,
                conflict.group_id_2,
                conflict.conflict_type,
                conflict.confidence,
                conflict.reason
            );
        }
        println!();
    }

    if !plan.warnings.is_empty() {
        println!("Warnings ({}):", plan.warnings.len());
        for warning in &plan.warnings {
            println!("  - {}", warning);
        }
    }
}

/// Human-readable byte count (`1.5 MiB`).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// `1h 2m 3s` style duration, `<1s` for short runs.
pub fn format_duration_ms(ms: u64) -> String {
    let secs = ms / 1000;
    if secs == 0 {
        return "<1s".to_string();
    }
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(10 * 1024 * 1024 * 1024), "10.0 GiB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(999), "<1s");
        assert_eq!(format_duration_ms(42_000), "42s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
        assert_eq!(format_duration_ms(3_723_000), "1h 2m 3s");
    }
}
