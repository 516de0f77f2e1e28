//! Cluster worker.

use serde::{Deserialize, Serialize};

/// Represents a simulated machine that can host one task at a time.
///
/// Workers are identified by their index in the worker list passed to the simulation. A failed worker never
/// recovers.
#[derive(Clone, Debug, Serialize)]
pub struct Worker {
    pub name: String,
    pub compute_power: f64,
    pub memory: u64,
    /// Task currently bound to the worker.
    pub task: Option<usize>,
    pub failed: bool,
    pub failed_at: Option<u64>,
}

impl Worker {
    pub fn new(name: &str, compute_power: f64, memory: u64) -> Self {
        Self {
            name: name.to_string(),
            compute_power,
            memory,
            task: None,
            failed: false,
            failed_at: None,
        }
    }

    /// Returns true if the worker is alive and idle.
    pub fn schedulable(&self) -> bool {
        !self.failed && self.task.is_none()
    }
}

/// Worker description used in system files.
///
/// An entry with `count > 1` produces workers named `<name>-0`, `<name>-1`, ...
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub name: String,
    #[serde(default = "default_compute_power")]
    pub compute_power: f64,
    #[serde(default)]
    pub memory: u64,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_compute_power() -> f64 {
    1.
}

fn default_count() -> usize {
    1
}

/// Creates workers from their descriptions, preserving order.
pub fn make_workers(configs: &[WorkerConfig]) -> Vec<Worker> {
    let mut workers = Vec::new();
    for config in configs {
        if config.count == 1 {
            workers.push(Worker::new(&config.name, config.compute_power, config.memory));
        } else {
            for i in 0..config.count {
                workers.push(Worker::new(
                    &format!("{}-{}", config.name, i),
                    config.compute_power,
                    config.memory,
                ));
            }
        }
    }
    workers
}

/// Creates `count` identical workers named `worker-0`, `worker-1`, ...
pub fn uniform_workers(count: usize, compute_power: f64, memory: u64) -> Vec<Worker> {
    make_workers(&[WorkerConfig {
        name: "worker".to_string(),
        compute_power,
        memory,
        count,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replicated_entries() {
        let configs: Vec<WorkerConfig> = serde_yaml::from_str(
            "
- name: big
  memory: 64
- name: small
  compute_power: 0.5
  count: 3
",
        )
        .unwrap();
        let workers = make_workers(&configs);
        let names = workers.iter().map(|w| w.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["big", "small-0", "small-1", "small-2"]);
        assert_eq!(workers[0].memory, 64);
        assert_eq!(workers[0].compute_power, 1.);
        assert_eq!(workers[3].compute_power, 0.5);
        assert!(workers.iter().all(|w| w.schedulable()));
    }

    #[test]
    fn single_uniform_worker_keeps_plain_name() {
        let workers = uniform_workers(1, 1., 1);
        assert_eq!(workers[0].name, "worker");
    }
}
