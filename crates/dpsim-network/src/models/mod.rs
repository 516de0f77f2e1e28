//! Network model implementations.

pub mod constant;
pub mod pairwise;
