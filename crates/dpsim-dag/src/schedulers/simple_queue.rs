use crate::dag::DAG;
use crate::scheduler::{Assignment, Scheduler};
use crate::schedulers::common::WorkerPool;
use crate::worker::Worker;

/// Assigns schedulable tasks in id order, each to the first free worker that fits.
#[derive(Default)]
pub struct SimpleQueueScheduler {}

impl SimpleQueueScheduler {
    pub fn new() -> Self {
        SimpleQueueScheduler {}
    }
}

impl Scheduler for SimpleQueueScheduler {
    fn schedule(&self, dag: &DAG, workers: &[Worker], _completed: &[usize], _failed: &[usize]) -> Vec<Assignment> {
        let mut pool = WorkerPool::snapshot(workers);
        let mut result = Vec::new();
        for task_id in dag.schedulable_tasks() {
            if pool.is_empty() {
                break;
            }
            pool.assign_best(task_id, dag, workers, &mut result);
        }
        result
    }
}
