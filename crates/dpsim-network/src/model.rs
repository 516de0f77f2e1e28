//! Network model interface.

/// Identifier of a cluster node (its index in the worker list).
pub type NodeId = usize;

/// Network model interface.
///
/// Provides bandwidth and latency between two distinct network nodes. Self-pairs are handled by
/// [`Cluster`](crate::Cluster) and are never passed to the model.
pub trait NetworkModel {
    /// Returns the network bandwidth from node `src` to node `dst` (data units per tick).
    fn bandwidth(&self, src: NodeId, dst: NodeId) -> f64;

    /// Returns the network latency from node `src` to node `dst` (ticks).
    fn latency(&self, src: NodeId, dst: NodeId) -> f64;
}
