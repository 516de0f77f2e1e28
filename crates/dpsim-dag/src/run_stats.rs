use std::collections::BTreeMap;

use enum_iterator::IntoEnumIterator;
use serde::{Deserialize, Serialize};

use crate::task::TaskKind;

/// Contains metrics collected from a simulation run.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RunStats {
    /// Time at which the last task completed (or the run was stopped).
    pub makespan: u64,
    /// Number of executed ticks. Smaller than makespan when the clock skips idle ticks.
    pub ticks: u64,
    /// Number of task-to-worker assignments, including reassignments after failures.
    pub assignments: usize,
    pub completed_tasks: usize,
    pub task_failures: usize,
    pub worker_failures: usize,
    /// Number of messages sent between tasks.
    pub messages: usize,
    /// Total size of data sent between different workers, including retransmissions after failures.
    pub network_traffic: f64,
    /// Total computation time of completed tasks.
    pub total_compute_time: f64,
    /// Computation time thrown away because of worker failures.
    pub lost_compute_time: f64,
    /// Maximum number of workers busy at once.
    pub max_busy_workers: usize,
    /// Computation time of completed tasks per task kind.
    pub compute_time_by_kind: BTreeMap<TaskKind, f64>,

    #[serde(skip)]
    busy_workers: usize,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            makespan: 0,
            ticks: 0,
            assignments: 0,
            completed_tasks: 0,
            task_failures: 0,
            worker_failures: 0,
            messages: 0,
            network_traffic: 0.,
            total_compute_time: 0.,
            lost_compute_time: 0.,
            max_busy_workers: 0,
            compute_time_by_kind: TaskKind::into_enum_iter().map(|kind| (kind, 0.)).collect(),
            busy_workers: 0,
        }
    }
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tick(&mut self) {
        self.ticks += 1;
    }

    pub fn set_task_assigned(&mut self) {
        self.assignments += 1;
        self.busy_workers += 1;
        self.max_busy_workers = self.max_busy_workers.max(self.busy_workers);
    }

    pub fn set_task_completed(&mut self, kind: TaskKind, compute_time: f64) {
        self.busy_workers -= 1;
        self.completed_tasks += 1;
        self.total_compute_time += compute_time;
        *self.compute_time_by_kind.entry(kind).or_default() += compute_time;
    }

    pub fn set_task_failed(&mut self, lost_compute_time: f64) {
        self.busy_workers -= 1;
        self.task_failures += 1;
        self.lost_compute_time += lost_compute_time;
    }

    pub fn add_worker_failures(&mut self, count: usize) {
        self.worker_failures += count;
    }

    pub fn add_message(&mut self) {
        self.messages += 1;
    }

    pub fn add_transfer(&mut self, size: f64) {
        self.network_traffic += size;
    }

    pub fn finalize(&mut self, time: u64) {
        self.makespan = time;
    }
}
