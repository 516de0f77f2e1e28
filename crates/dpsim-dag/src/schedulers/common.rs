use indexmap::IndexSet;

use crate::dag::DAG;
use crate::scheduler::Assignment;
use crate::task::{Task, TaskKind};
use crate::worker::Worker;

/// Highest possible score, no need to look further once a worker has it.
pub const MAX_SCORE: i32 = 1;

/// Order in which MapReduce schedulers process task kinds.
pub const MAP_REDUCE_PHASES: [TaskKind; 4] = [TaskKind::Shuffle, TaskKind::Map, TaskKind::Reduce, TaskKind::Other];

/// Scores placement of a task on a worker, only positive scores are acceptable.
///
/// The only criteria for now are that the worker is free and has enough memory.
pub fn score(task: &Task, worker: &Worker) -> i32 {
    if worker.schedulable() && worker.memory >= task.memory {
        1
    } else {
        -1
    }
}

/// Returns the first candidate with the highest positive score.
pub fn best_fit<I>(task: &Task, candidates: I, workers: &[Worker]) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut best = None;
    let mut best_score = 0;
    for worker_id in candidates {
        let score = score(task, &workers[worker_id]);
        if score > best_score {
            best = Some(worker_id);
            best_score = score;
            if score >= MAX_SCORE {
                break;
            }
        }
    }
    best
}

/// Workers still available within one scheduler call, in worker list order.
///
/// Built from the schedulable workers at the start of the call; a worker leaves the pool once it is picked.
pub struct WorkerPool {
    workers: IndexSet<usize>,
}

impl WorkerPool {
    pub fn snapshot(workers: &[Worker]) -> Self {
        Self {
            workers: workers
                .iter()
                .enumerate()
                .filter(|(_, w)| w.schedulable())
                .map(|(id, _)| id)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn contains(&self, worker_id: usize) -> bool {
        self.workers.contains(&worker_id)
    }

    /// Removes the worker from the pool, returns false if it was not there.
    pub fn take(&mut self, worker_id: usize) -> bool {
        self.workers.shift_remove(&worker_id)
    }

    /// Picks the best worker for the task and records the assignment. Returns false if no worker fits.
    pub fn assign_best(&mut self, task_id: usize, dag: &DAG, workers: &[Worker], result: &mut Vec<Assignment>) -> bool {
        match best_fit(dag.get_task(task_id), self.workers.iter().copied(), workers) {
            Some(worker_id) => {
                self.take(worker_id);
                result.push(Assignment::new(task_id, worker_id));
                true
            }
            None => false,
        }
    }
}

/// Schedulable tasks grouped by kind, each group in task id order.
pub fn schedulable_by_kind(dag: &DAG) -> [Vec<usize>; 4] {
    let mut groups: [Vec<usize>; 4] = Default::default();
    for task_id in dag.schedulable_tasks() {
        let idx = MAP_REDUCE_PHASES
            .iter()
            .position(|&k| k == dag.get_task(task_id).kind)
            .unwrap_or(MAP_REDUCE_PHASES.len() - 1);
        groups[idx].push(task_id);
    }
    groups
}
