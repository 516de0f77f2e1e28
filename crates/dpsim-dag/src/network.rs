//! Network model tools.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use dpsim_network::models::pairwise::PairwiseNetwork;
use dpsim_network::Cluster;

use crate::worker::Worker;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NetworkModelKind {
    /// Same bandwidth and latency between all workers.
    Constant,
    /// Default bandwidth and latency with per-link overrides.
    Pairwise,
}

/// Link between two workers, identified by their names.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LinkConfig {
    pub from: String,
    pub to: String,
    pub bandwidth: f64,
    #[serde(default)]
    pub latency: f64,
    /// Only affects data sent from `from` to `to` if set.
    #[serde(default)]
    pub directed: bool,
}

/// Represents network model parameters.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NetworkConfig {
    pub model: NetworkModelKind,
    /// Bandwidth in data units per tick.
    pub bandwidth: f64,
    /// Latency in ticks.
    #[serde(default)]
    pub latency: f64,
    #[serde(default)]
    pub links: Vec<LinkConfig>,
}

impl NetworkConfig {
    /// Creates network config with the same bandwidth and latency between all workers.
    pub fn constant(bandwidth: f64, latency: f64) -> Self {
        Self {
            model: NetworkModelKind::Constant,
            bandwidth,
            latency,
            links: Vec::new(),
        }
    }

    /// Creates network config with default bandwidth and latency and no links configured yet.
    pub fn pairwise(bandwidth: f64, latency: f64) -> Self {
        Self {
            model: NetworkModelKind::Pairwise,
            bandwidth,
            latency,
            links: Vec::new(),
        }
    }

    /// Creates cluster network for the given workers.
    ///
    /// Fails if a link refers to an unknown worker, or if links are given for a constant network.
    pub fn make_cluster(&self, workers: &[Worker]) -> Result<Cluster, String> {
        match self.model {
            NetworkModelKind::Constant => {
                if !self.links.is_empty() {
                    return Err("links are not supported by constant network".to_string());
                }
                Ok(Cluster::constant(self.bandwidth, self.latency))
            }
            NetworkModelKind::Pairwise => {
                let ids: HashMap<&str, usize> = workers
                    .iter()
                    .enumerate()
                    .map(|(id, w)| (w.name.as_str(), id))
                    .collect();
                let lookup = |name: &str| ids.get(name).copied().ok_or(format!("unknown worker {}", name));
                let mut network = PairwiseNetwork::new(self.bandwidth, self.latency);
                for link in self.links.iter() {
                    let (from, to) = (lookup(&link.from)?, lookup(&link.to)?);
                    if link.directed {
                        network.set_directed_link(from, to, link.bandwidth, link.latency);
                    } else {
                        network.set_link(from, to, link.bandwidth, link.latency);
                    }
                }
                Ok(Cluster::pairwise(network))
            }
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::constant(1., 0.)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Yaml {
    network: NetworkConfig,
}

/// Reads network model configuration from the `network` section of YAML file.
pub fn read_network_config<P: AsRef<Path>>(file: P) -> NetworkConfig {
    let network: Yaml = serde_yaml::from_str(
        &std::fs::read_to_string(&file).unwrap_or_else(|_| panic!("Can't read file {}", file.as_ref().display())),
    )
    .unwrap_or_else(|e| panic!("Can't parse YAML from file {}: {}", file.as_ref().display(), e));

    network.network
}
