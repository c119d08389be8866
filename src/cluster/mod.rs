//! Folder clustering and cluster classification.

mod builder;
mod classifier;
mod keywords;

#[cfg(test)]
mod tests;

pub use builder::build_clusters;
pub use classifier::{
    ClusterClassifier, ClusterVerdict, DEFAULT_FAMILY, DEFAULT_STYLE, DEFAULT_TYPE,
    relative_to_pack,
};
pub use keywords::{detect_format, detect_type, detect_variant};
