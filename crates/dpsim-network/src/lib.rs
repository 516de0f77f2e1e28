#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod cluster;
pub mod model;
pub mod models;

pub use cluster::Cluster;
pub use model::{NetworkModel, NodeId};
