use crate::dag::DAG;
use crate::scheduler::{Assignment, Scheduler};
use crate::schedulers::common::{schedulable_by_kind, WorkerPool};
use crate::worker::Worker;

/// Schedules tasks phase by phase: shuffle tasks first, then map, reduce and the rest.
///
/// Shuffle tasks go first because they can start merging data as soon as it appears.
#[derive(Default)]
pub struct MapReduceScheduler {}

impl MapReduceScheduler {
    pub fn new() -> Self {
        MapReduceScheduler {}
    }
}

impl Scheduler for MapReduceScheduler {
    fn schedule(&self, dag: &DAG, workers: &[Worker], _completed: &[usize], _failed: &[usize]) -> Vec<Assignment> {
        let mut pool = WorkerPool::snapshot(workers);
        let mut result = Vec::new();
        for phase in schedulable_by_kind(dag) {
            for task_id in phase {
                if pool.is_empty() {
                    return result;
                }
                pool.assign_best(task_id, dag, workers, &mut result);
            }
        }
        result
    }
}
