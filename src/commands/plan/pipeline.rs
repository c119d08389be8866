//! The planning pipeline shared by the command and its tests.

use crate::cluster::build_clusters;
use crate::config::Config;
use crate::error::{PackfuseError, Result};
use crate::fusion::{FusionBuildOutcome, FusionGroupBuilder, FusionOptions};
use crate::model::{ClassifiedPack, FolderCluster, FolderPath, read_json};
use crate::plan::{OrganizationPlan, OrganizationPlanner, PlannerOptions};
use crate::similarity::SimilarityScorer;
use crate::taxonomy::Taxonomy;
use std::path::Path;

/// A plan together with the fusion groups it was built from.
#[derive(Debug, Clone)]
pub struct PlanRun {
    pub plan: OrganizationPlan,
    pub fusion: FusionBuildOutcome,
}

/// Read clusters from a file, or cluster the folders of a folders file.
pub fn load_clusters(
    clusters: Option<&Path>,
    folders: Option<&Path>,
    config: &Config,
) -> Result<Vec<FolderCluster>> {
    match (clusters, folders) {
        (Some(path), _) => read_json(path),
        (None, Some(path)) => {
            let folders: Vec<FolderPath> = read_json(path)?;
            Ok(build_clusters(
                &folders,
                &SimilarityScorer::from_config(config),
            ))
        }
        (None, None) => Err(PackfuseError::UserError(
            "either --clusters or --folders is required".to_string(),
        )),
    }
}

/// Build fusion groups from `clusters` and plan every pack onto `target`.
pub fn build_plan(
    config: &Config,
    packs: &[ClassifiedPack],
    clusters: &[FolderCluster],
    target: &Path,
) -> Result<PlanRun> {
    let taxonomy = Taxonomy::load_or_empty(config.taxonomy_path.as_deref());

    let fusion = FusionGroupBuilder::new(FusionOptions::from_config(config)).build(clusters, packs);
    let planner = OrganizationPlanner::new(PlannerOptions::from_config(config), taxonomy)?;
    let plan = planner.plan(packs, &fusion.groups, target)?;

    Ok(PlanRun { plan, fusion })
}
