//! DAG execution log.

use std::fs::File;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::dag::DAG;
use crate::task::TaskKind;
use crate::worker;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TaskScheduled {
        time: u64,
        task_id: usize,
        task_name: String,
        worker_id: usize,
        worker_name: String,
    },
    TaskStarted {
        time: u64,
        task_id: usize,
        task_name: String,
        input_size: f64,
        end_time: f64,
    },
    TaskCompleted {
        time: u64,
        task_id: usize,
        task_name: String,
    },
    TaskFailed {
        time: u64,
        task_id: usize,
        task_name: String,
        worker_id: usize,
    },
    WorkerFailed {
        time: u64,
        worker_id: usize,
        worker_name: String,
    },
}

impl Event {
    pub fn time(&self) -> u64 {
        match self {
            Event::TaskScheduled { time, .. }
            | Event::TaskStarted { time, .. }
            | Event::TaskCompleted { time, .. }
            | Event::TaskFailed { time, .. }
            | Event::WorkerFailed { time, .. } => *time,
        }
    }

    /// Returns the task the event is about, if any.
    pub fn task_id(&self) -> Option<usize> {
        match self {
            Event::TaskScheduled { task_id, .. }
            | Event::TaskStarted { task_id, .. }
            | Event::TaskCompleted { task_id, .. }
            | Event::TaskFailed { task_id, .. } => Some(*task_id),
            Event::WorkerFailed { .. } => None,
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::TaskScheduled {
                task_name, worker_name, ..
            } => write!(f, "scheduled task {task_name} on {worker_name}"),
            Event::TaskStarted {
                task_name,
                input_size,
                end_time,
                ..
            } => write!(
                f,
                "task {task_name} received all inputs ({input_size}), computing until {end_time}"
            ),
            Event::TaskCompleted { task_name, .. } => write!(f, "completed task {task_name}"),
            Event::TaskFailed {
                task_name, worker_id, ..
            } => write!(f, "task {task_name} failed together with worker {worker_id}"),
            Event::WorkerFailed { worker_name, .. } => write!(f, "worker {worker_name} failed"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct Task {
    pub name: String,
    pub kind: TaskKind,
    pub memory: u64,
    pub inputs: Vec<usize>,
    pub outputs: Vec<usize>,
}

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct Worker {
    pub name: String,
    pub compute_power: f64,
    pub memory: u64,
}

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct Graph {
    pub tasks: Vec<Task>,
}

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct TraceLog {
    pub workers: Vec<Worker>,
    pub graph: Graph,
    pub events: Vec<Event>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn log_dag(&mut self, dag: &DAG) {
        self.graph.tasks = dag
            .get_tasks()
            .iter()
            .map(|task| Task {
                name: task.name.clone(),
                kind: task.kind,
                memory: task.memory,
                inputs: task.in_edges.clone(),
                outputs: task.out_edges.clone(),
            })
            .collect();
    }

    pub fn log_workers(&mut self, workers: &[worker::Worker]) {
        self.workers = workers
            .iter()
            .map(|w| Worker {
                name: w.name.clone(),
                compute_power: w.compute_power,
                memory: w.memory,
            })
            .collect();
    }

    /// Returns the events concerning the given task in their original order.
    pub fn task_events(&self, task_id: usize) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(move |e| e.task_id() == Some(task_id))
    }

    pub fn save_to_file(&self, filename: &str) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)?;
        File::create(filename)?.write_all(json.as_bytes())
    }
}
