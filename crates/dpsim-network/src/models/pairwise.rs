//! Network model with per-pair overrides.

use rustc_hash::FxHashMap;

use crate::model::*;

/// Network model with default bandwidth and latency that can be overridden for individual pairs of nodes.
///
/// Links added with [`set_link`](PairwiseNetwork::set_link) are symmetric, links added with
/// [`set_directed_link`](PairwiseNetwork::set_directed_link) affect only one direction. A later call overrides
/// an earlier one for the same direction.
#[derive(Clone, Debug)]
pub struct PairwiseNetwork {
    default_bandwidth: f64,
    default_latency: f64,
    bandwidth: FxHashMap<(NodeId, NodeId), f64>,
    latency: FxHashMap<(NodeId, NodeId), f64>,
}

impl PairwiseNetwork {
    /// Creates the model with default bandwidth and latency used for pairs without explicit values.
    pub fn new(default_bandwidth: f64, default_latency: f64) -> Self {
        Self {
            default_bandwidth,
            default_latency,
            bandwidth: FxHashMap::default(),
            latency: FxHashMap::default(),
        }
    }

    /// Sets bandwidth and latency between `a` and `b` in both directions.
    pub fn set_link(&mut self, a: NodeId, b: NodeId, bandwidth: f64, latency: f64) {
        self.set_directed_link(a, b, bandwidth, latency);
        self.set_directed_link(b, a, bandwidth, latency);
    }

    /// Sets bandwidth and latency from `src` to `dst` only.
    pub fn set_directed_link(&mut self, src: NodeId, dst: NodeId, bandwidth: f64, latency: f64) {
        assert!(bandwidth > 0., "Link bandwidth must be positive, got {}", bandwidth);
        assert!(latency >= 0., "Link latency must be non-negative, got {}", latency);
        self.bandwidth.insert((src, dst), bandwidth);
        self.latency.insert((src, dst), latency);
    }

    /// Returns the number of directed links with explicit values.
    pub fn link_count(&self) -> usize {
        self.bandwidth.len()
    }
}

impl NetworkModel for PairwiseNetwork {
    fn bandwidth(&self, src: NodeId, dst: NodeId) -> f64 {
        *self.bandwidth.get(&(src, dst)).unwrap_or(&self.default_bandwidth)
    }

    fn latency(&self, src: NodeId, dst: NodeId) -> f64 {
        *self.latency.get(&(src, dst)).unwrap_or(&self.default_latency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_and_directed_links() {
        let mut net = PairwiseNetwork::new(1., 0.);
        net.set_link(0, 1, 10., 2.);
        net.set_directed_link(1, 2, 5., 1.);
        assert_eq!(net.link_count(), 3);

        assert_eq!(net.bandwidth(0, 1), 10.);
        assert_eq!(net.bandwidth(1, 0), 10.);
        assert_eq!(net.latency(1, 0), 2.);

        assert_eq!(net.bandwidth(1, 2), 5.);
        assert_eq!(net.bandwidth(2, 1), 1.);
        assert_eq!(net.latency(2, 1), 0.);

        assert_eq!(net.bandwidth(3, 4), 1.);
    }

    #[test]
    #[should_panic(expected = "bandwidth must be positive")]
    fn rejects_zero_bandwidth() {
        PairwiseNetwork::new(1., 0.).set_link(0, 1, 0., 0.);
    }
}
