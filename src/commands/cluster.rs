//! Implementation of the `packfuse cluster` command.

use super::write_json;
use crate::cli::ClusterArgs;
use crate::cluster::build_clusters;
use crate::config::Config;
use crate::error::Result;
use crate::model::{FolderPath, read_json};
use crate::similarity::SimilarityScorer;
use tracing::info;

/// Cluster the folders listed in `--folders` and write the clusters as JSON.
pub fn cmd_cluster(args: ClusterArgs, config: &Config) -> Result<()> {
    let folders: Vec<FolderPath> = read_json(&args.folders)?;
    let clusters = build_clusters(&folders, &SimilarityScorer::from_config(config));

    info!(
        folders = folders.len(),
        clusters = clusters.len(),
        "Clustered folders"
    );

    write_json(&clusters, args.output.as_deref())?;

    if let Some(output) = &args.output {
        println!(
            "Wrote {} cluster(s) from {} folder(s) to {}",
            clusters.len(),
            folders.len(),
            output.display()
        );
    }

    Ok(())
}
