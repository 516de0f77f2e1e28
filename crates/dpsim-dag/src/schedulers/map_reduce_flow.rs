use crate::dag::DAG;
use crate::scheduler::{Assignment, Scheduler};
use crate::scheduler_resolver::SchedulerParams;
use crate::schedulers::common::{schedulable_by_kind, WorkerPool, MAP_REDUCE_PHASES};
use crate::task::TaskKind;
use crate::worker::Worker;

const DEFAULT_LIMIT: usize = 100000;

/// Phase-ordered scheduling with limits on the number of concurrently running shuffle and reduce tasks.
///
/// A task counts as running while it is bound to a worker, either waiting for inputs or computing. Map and other
/// tasks are not limited.
pub struct MapReduceFlowScheduler {
    max_shuffle: usize,
    max_reduce: usize,
}

impl MapReduceFlowScheduler {
    pub fn new(max_shuffle: usize, max_reduce: usize) -> Self {
        Self {
            max_shuffle,
            max_reduce,
        }
    }

    pub fn from_scheduler_params(params: &SchedulerParams) -> Self {
        Self::new(
            params.get("max_shuffle").unwrap_or(DEFAULT_LIMIT),
            params.get("max_reduce").unwrap_or(DEFAULT_LIMIT),
        )
    }

    fn limit(&self, kind: TaskKind) -> usize {
        match kind {
            TaskKind::Shuffle => self.max_shuffle,
            TaskKind::Reduce => self.max_reduce,
            _ => usize::MAX,
        }
    }
}

impl Default for MapReduceFlowScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_LIMIT)
    }
}

impl Scheduler for MapReduceFlowScheduler {
    fn schedule(&self, dag: &DAG, workers: &[Worker], _completed: &[usize], _failed: &[usize]) -> Vec<Assignment> {
        let mut pool = WorkerPool::snapshot(workers);
        let mut result = Vec::new();
        for (kind, phase) in MAP_REDUCE_PHASES.iter().zip(schedulable_by_kind(dag)) {
            let limit = self.limit(*kind);
            let mut running = dag
                .get_tasks()
                .iter()
                .filter(|t| t.kind == *kind && t.is_running())
                .count();
            for task_id in phase {
                if pool.is_empty() {
                    return result;
                }
                if running >= limit {
                    break;
                }
                if pool.assign_best(task_id, dag, workers, &mut result) {
                    running += 1;
                }
            }
        }
        result
    }
}
