//! Scheduler interface.

use crate::dag::DAG;
use crate::worker::Worker;

/// Binding of a task to a worker produced by a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub task: usize,
    pub worker: usize,
}

impl Assignment {
    pub fn new(task: usize, worker: usize) -> Self {
        Self { task, worker }
    }
}

/// Task scheduling policy.
///
/// Called by the runner at the start of every tick. A scheduler only observes the state of tasks and workers
/// and returns assignments, which the runner then applies in the returned order. The returned list must not
/// contain a task or a worker twice, and must only reference tasks and workers that are schedulable at the time
/// of the call.
pub trait Scheduler {
    /// Computes new assignments.
    ///
    /// `completed` and `failed` contain the tasks that completed and failed during the previous tick, in the order
    /// in which it happened.
    fn schedule(&self, dag: &DAG, workers: &[Worker], completed: &[usize], failed: &[usize]) -> Vec<Assignment>;
}
