//! Structural path extraction: LCA path building and pair sampling.

pub mod lca;
pub mod sampler;

pub use lca::{lowest_common_ancestor, path_between};
pub use sampler::{candidate_pair_count, sample_pairs, DEFAULT_WINDOW};
