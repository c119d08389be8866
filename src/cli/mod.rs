//! CLI argument parsing for packfuse.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::config::ConflictStrategy;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Packfuse: fuse and reorganize audio sample libraries.
///
/// Folders that name the same thing across packs ("Kicks", "Kick", "KICKS")
/// are fused into one canonical folder; everything else is placed into a
/// Family / Style / Type / Function hierarchy. Plans are inspectable JSON
/// and nothing is moved until `execute --yes`.
#[derive(Parser, Debug)]
#[command(name = "packfuse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./packfuse.yaml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for packfuse.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score how similar two folder names are.
    ///
    /// Prints the per-signal breakdown and whether the pair clears the
    /// configured thresholds.
    Similarity(SimilarityArgs),

    /// Group folder names that are spelling variants of each other.
    Patterns(PatternsArgs),

    /// Cluster folders by name similarity.
    ///
    /// Reads a JSON list of folders and writes the clusters as JSON.
    Cluster(ClusterArgs),

    /// Build an organization plan.
    ///
    /// Classifies clusters, builds fusion groups, resolves conflicts and
    /// plans every file of every pack. Nothing on disk is changed.
    Plan(PlanArgs),

    /// Execute a saved plan.
    ///
    /// Dry-run by default: prints what would happen. Pass `--yes` to apply.
    Execute(ExecuteArgs),
}

/// Arguments for the `similarity` command.
#[derive(Parser, Debug)]
pub struct SimilarityArgs {
    /// First folder name.
    pub a: String,

    /// Second folder name.
    pub b: String,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `patterns` command.
#[derive(Parser, Debug)]
pub struct PatternsArgs {
    /// Folder names to compare.
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `cluster` command.
#[derive(Parser, Debug)]
pub struct ClusterArgs {
    /// JSON file with the folders to cluster.
    #[arg(long)]
    pub folders: PathBuf,

    /// Write clusters here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `plan` command.
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["clusters", "folders"])))]
pub struct PlanArgs {
    /// JSON file with the classified packs.
    #[arg(long)]
    pub packs: PathBuf,

    /// JSON file with pre-built folder clusters.
    #[arg(long)]
    pub clusters: Option<PathBuf>,

    /// JSON file with folders to cluster first.
    #[arg(long)]
    pub folders: Option<PathBuf>,

    /// Root of the organized library.
    #[arg(long)]
    pub target: PathBuf,

    /// Write the plan here.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `execute` command.
#[derive(Parser, Debug)]
pub struct ExecuteArgs {
    /// Plan file written by `plan --output`.
    #[arg(long)]
    pub plan: PathBuf,

    /// Apply the plan (otherwise dry-run).
    #[arg(long)]
    pub yes: bool,

    /// Override the conflict strategy (overwrite, skip, rename, ask).
    #[arg(long, value_parser = parse_conflict_strategy)]
    pub conflict: Option<ConflictStrategy>,

    /// Leave completed steps in place when execution aborts.
    #[arg(long)]
    pub no_rollback: bool,

    /// Write the execution result as JSON.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

fn parse_conflict_strategy(s: &str) -> Result<ConflictStrategy, String> {
    ConflictStrategy::from_str(s).ok_or_else(|| {
        format!(
            "invalid conflict strategy '{}': expected overwrite, skip, rename or ask",
            s
        )
    })
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
