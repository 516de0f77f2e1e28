use std::collections::HashSet;

use crate::dag::DAG;
use crate::scheduler::{Assignment, Scheduler};
use crate::schedulers::common::{score, WorkerPool};
use crate::worker::Worker;

/// Dask-style scheduling that keeps data where it was produced.
///
/// For every task completed at the previous tick, one of its schedulable successors is placed on the worker the
/// task has just vacated, so that the data does not have to travel over the network. Completed tasks are processed
/// in the given order. The remaining schedulable tasks are then assigned to the remaining workers as
/// [`SimpleQueueScheduler`](crate::schedulers::simple_queue::SimpleQueueScheduler) does.
#[derive(Default)]
pub struct LocalityScheduler {}

impl LocalityScheduler {
    pub fn new() -> Self {
        LocalityScheduler {}
    }
}

impl Scheduler for LocalityScheduler {
    fn schedule(&self, dag: &DAG, workers: &[Worker], completed: &[usize], _failed: &[usize]) -> Vec<Assignment> {
        let mut pool = WorkerPool::snapshot(workers);
        let mut picked = HashSet::new();
        let mut result = Vec::new();

        for &task_id in completed {
            let worker_id = match dag.get_task(task_id).worker {
                Some(worker_id) if pool.contains(worker_id) => worker_id,
                _ => continue,
            };
            let successor = dag.get_task(task_id).out_edges.iter().copied().find(|succ| {
                let succ_task = dag.get_task(*succ);
                succ_task.is_schedulable() && !picked.contains(succ) && score(succ_task, &workers[worker_id]) > 0
            });
            if let Some(succ) = successor {
                pool.take(worker_id);
                picked.insert(succ);
                result.push(Assignment::new(succ, worker_id));
            }
        }

        for task_id in dag.schedulable_tasks() {
            if pool.is_empty() {
                break;
            }
            if !picked.contains(&task_id) {
                pool.assign_best(task_id, dag, workers, &mut result);
            }
        }
        result
    }
}
