//! Packfuse: fuse and reorganize audio sample libraries.
//!
//! Sample packs scatter the same kinds of content across differently named
//! folders ("Kicks", "Kick", "KICKS", "Kick Drums"). Packfuse clusters those
//! folders by name similarity, fuses each cluster into one canonical target,
//! and plans every remaining file onto a Family / Style / Type / Function
//! hierarchy. Plans are plain data; the executor applies them in phases and
//! rolls back on abort.
//!
//! Pipeline:
//! 1. [`cluster::build_clusters`] groups folders by [`similarity`] score.
//! 2. [`fusion::FusionGroupBuilder`] classifies clusters into fusion groups
//!    and resolves conflicts between them.
//! 3. [`plan::OrganizationPlanner`] produces an [`plan::OrganizationPlan`].
//! 4. [`execute::OrganizationExecutor`] applies it.

pub mod cli;
pub mod cluster;
pub mod commands;
pub mod config;
pub mod error;
pub mod execute;
pub mod exit_codes;
pub mod fs;
pub mod fusion;
pub mod logging;
pub mod model;
pub mod plan;
pub mod similarity;
pub mod taxonomy;

#[cfg(test)]
pub(crate) mod test_support;
