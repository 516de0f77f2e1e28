//! Cluster network facade.

use std::fmt::{Debug, Formatter};

use crate::model::{NetworkModel, NodeId};
use crate::models::constant::ConstantNetwork;
use crate::models::pairwise::PairwiseNetwork;

/// Network of a simulated cluster.
///
/// Wraps a [`NetworkModel`] and adds the rules common to all models: a node talking to itself has infinite
/// bandwidth and zero latency, and all bandwidths are scaled by a global multiplier. The multiplier is applied
/// in [`bandwidth`](Cluster::bandwidth) only, so every message is affected by it exactly once.
pub struct Cluster {
    model: Box<dyn NetworkModel>,
    bandwidth_multiplier: f64,
}

impl Cluster {
    /// Creates cluster network based on the given model.
    pub fn new(model: Box<dyn NetworkModel>) -> Self {
        Self {
            model,
            bandwidth_multiplier: 1.,
        }
    }

    /// Creates cluster with the same bandwidth and latency between all pairs of nodes.
    pub fn constant(bandwidth: f64, latency: f64) -> Self {
        Self::new(Box::new(ConstantNetwork::new(bandwidth, latency)))
    }

    /// Creates cluster with explicitly configured pairs of nodes.
    pub fn pairwise(network: PairwiseNetwork) -> Self {
        Self::new(Box::new(network))
    }

    /// Sets the factor applied to all bandwidth values.
    pub fn set_bandwidth_multiplier(&mut self, multiplier: f64) {
        assert!(multiplier > 0., "Bandwidth multiplier must be positive, got {}", multiplier);
        self.bandwidth_multiplier = multiplier;
    }

    /// Returns the factor applied to all bandwidth values.
    pub fn bandwidth_multiplier(&self) -> f64 {
        self.bandwidth_multiplier
    }

    /// Returns the bandwidth from `src` to `dst`, infinite if they are the same node.
    pub fn bandwidth(&self, src: NodeId, dst: NodeId) -> f64 {
        if src == dst {
            f64::INFINITY
        } else {
            self.model.bandwidth(src, dst) * self.bandwidth_multiplier
        }
    }

    /// Returns the latency from `src` to `dst`, zero if they are the same node.
    pub fn latency(&self, src: NodeId, dst: NodeId) -> f64 {
        if src == dst {
            0.
        } else {
            self.model.latency(src, dst)
        }
    }

    /// Returns the time needed to deliver `size` units of data from `src` to `dst`.
    ///
    /// Data without a source node comes from outside of the cluster and is available immediately.
    pub fn transit_time(&self, size: f64, src: Option<NodeId>, dst: Option<NodeId>) -> f64 {
        match (src, dst) {
            (Some(src), Some(dst)) => (size / self.bandwidth(src, dst)).max(self.latency(src, dst)),
            _ => 0.,
        }
    }
}

impl Default for Cluster {
    /// Unit bandwidth and zero latency between all nodes.
    fn default() -> Self {
        Self::constant(1., 0.)
    }
}

impl Debug for Cluster {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cluster")
            .field("bandwidth_multiplier", &self.bandwidth_multiplier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_pairs() {
        let cluster = Cluster::constant(2., 3.);
        assert_eq!(cluster.bandwidth(4, 4), f64::INFINITY);
        assert_eq!(cluster.latency(4, 4), 0.);
        assert_eq!(cluster.transit_time(100., Some(4), Some(4)), 0.);
    }

    #[test]
    fn transit_is_max_of_serialization_and_latency() {
        let cluster = Cluster::constant(2., 3.);
        assert_eq!(cluster.transit_time(10., Some(0), Some(1)), 5.);
        assert_eq!(cluster.transit_time(4., Some(0), Some(1)), 3.);
    }

    #[test]
    fn multiplier_applied_once() {
        let mut cluster = Cluster::constant(1000., 0.);
        cluster.set_bandwidth_multiplier(1. / 1000.);
        assert_eq!(cluster.bandwidth(0, 1), 1.);
        assert_eq!(cluster.transit_time(64., Some(0), Some(1)), 64.);
        assert_eq!(cluster.bandwidth(1, 1), f64::INFINITY);
    }

    #[test]
    fn external_data_is_local() {
        let cluster = Cluster::default();
        assert_eq!(cluster.transit_time(10., None, Some(0)), 0.);
        assert_eq!(cluster.transit_time(10., Some(0), None), 0.);
    }

    #[test]
    fn debug_shows_multiplier() {
        let mut cluster = Cluster::default();
        cluster.set_bandwidth_multiplier(0.5);
        assert_eq!(format!("{:?}", cluster), "Cluster { bandwidth_multiplier: 0.5, .. }");
    }

    #[test]
    fn pairwise_overrides() {
        let mut net = PairwiseNetwork::new(1., 0.);
        net.set_link(0, 1, 4., 1.);
        let cluster = Cluster::pairwise(net);
        assert_eq!(cluster.transit_time(8., Some(1), Some(0)), 2.);
        assert_eq!(cluster.transit_time(8., Some(0), Some(2)), 8.);
    }
}
