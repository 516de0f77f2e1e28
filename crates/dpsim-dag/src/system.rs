//! System description: workers, network and run configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::network::NetworkConfig;
use crate::worker::WorkerConfig;

/// Describes a simulated system as read from YAML file.
///
/// ```yaml
/// workers:
///   - name: node
///     count: 4
/// network:
///   model: constant
///   bandwidth: 10
///   latency: 1
/// config:
///   failure_probability: 0.001
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SystemConfig {
    pub workers: Vec<WorkerConfig>,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub config: Option<Config>,
}

fn read_yaml<T, P>(file: P) -> T
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    serde_yaml::from_str(
        &std::fs::read_to_string(&file).unwrap_or_else(|_| panic!("Can't read file {}", file.as_ref().display())),
    )
    .unwrap_or_else(|e| panic!("Can't parse YAML from file {}: {}", file.as_ref().display(), e))
}

/// Reads system description from YAML file.
pub fn read_system_config<P: AsRef<Path>>(file: P) -> SystemConfig {
    read_yaml(file)
}

#[derive(Debug, Serialize, Deserialize)]
struct WorkersYaml {
    workers: Vec<WorkerConfig>,
}

/// Reads worker descriptions from the `workers` section of YAML file.
pub fn read_worker_configs<P: AsRef<Path>>(file: P) -> Vec<WorkerConfig> {
    let yaml: WorkersYaml = read_yaml(file);
    yaml.workers
}
