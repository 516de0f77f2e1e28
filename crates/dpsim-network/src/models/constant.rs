//! Constant network model.

use crate::model::*;

/// Network model with the same bandwidth and latency between all pairs of nodes.
#[derive(Clone, Debug)]
pub struct ConstantNetwork {
    bandwidth: f64,
    latency: f64,
}

impl ConstantNetwork {
    /// Creates the model with specified bandwidth and latency.
    pub fn new(bandwidth: f64, latency: f64) -> ConstantNetwork {
        ConstantNetwork { bandwidth, latency }
    }
}

impl NetworkModel for ConstantNetwork {
    fn bandwidth(&self, _src: NodeId, _dst: NodeId) -> f64 {
        self.bandwidth
    }

    fn latency(&self, _src: NodeId, _dst: NodeId) -> f64 {
        self.latency
    }
}
