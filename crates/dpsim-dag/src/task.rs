//! DAG task.

use enum_iterator::IntoEnumIterator;
use serde::{Deserialize, Serialize};

use crate::cost::{self, CompLengthFn, OutputSizeFn};
use crate::fault_model::FaultModel;
use crate::message::Message;

/// Kind of computation performed by a task.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug, Hash, IntoEnumIterator, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Reads one external input.
    Map,
    /// Merges the outputs of other tasks, may start before all of them are available.
    Shuffle,
    /// Combines the outputs of other tasks.
    Reduce,
    /// Any other computation.
    Other,
}

/// Represents a DAG task state.
#[derive(Eq, PartialEq, Copy, Clone, Debug, IntoEnumIterator, Serialize, Deserialize)]
pub enum TaskState {
    /// Never assigned to a worker.
    NotScheduled,
    /// Assigned to a worker, waiting for its inputs.
    NeedInput,
    /// All required inputs arrived, computation is in progress.
    Computing,
    /// Computation finished, outputs are sent to successors.
    Completed,
    /// The hosting worker failed. The task can be scheduled again.
    Failed,
}

impl TaskState {
    /// Returns true if a task can move from this state to `next`.
    pub fn can_become(self, next: TaskState) -> bool {
        use TaskState::*;
        matches!(
            (self, next),
            (NotScheduled, NeedInput)
                | (Failed, NeedInput)
                | (NeedInput, Computing)
                | (Computing, Completed)
                | (NeedInput, Failed)
                | (Computing, Failed)
        )
    }
}

/// Represents a DAG task.
///
/// A task receives [messages](Message) from its predecessors (or pre-seeded external inputs), computes for a
/// duration given by its computation length function of the total input size, and then sends a message of a size
/// given by its output size function to each of its successors.
///
/// `out_edges` is the authoritative list of successors, `in_edges` mirrors it and is maintained by
/// [`DAG::add_edge`](crate::dag::DAG::add_edge).
#[derive(Clone)]
pub struct Task {
    pub name: String,
    pub kind: TaskKind,
    pub state: TaskState,
    /// Memory demand. Workers with less memory are not considered for this task.
    pub memory: u64,
    pub in_edges: Vec<usize>,
    pub out_edges: Vec<usize>,
    /// Messages received so far. Never shrinks.
    pub input_queue: Vec<Message>,
    /// Worker currently hosting the task, or the last one that hosted it if the task is completed.
    pub worker: Option<usize>,
    pub schedule_time: Option<u64>,
    pub comp_start_time: Option<u64>,
    pub comp_end_time: Option<f64>,
    /// Latest arrival time among the messages in the input queue.
    pub max_input_time: f64,
    /// Sum of input sizes consumed when the computation started.
    pub input_size: f64,
    /// How many times the task was assigned to a worker.
    pub assignment_count: u32,
    pub(crate) comp_length: CompLengthFn,
    pub(crate) output_size: OutputSizeFn,
}

impl Task {
    /// Creates new task with unit computation length and output size equal to its input size.
    pub fn new(name: &str, kind: TaskKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            state: TaskState::NotScheduled,
            memory: 0,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
            input_queue: Vec::new(),
            worker: None,
            schedule_time: None,
            comp_start_time: None,
            comp_end_time: None,
            max_input_time: 0.,
            input_size: 0.,
            assignment_count: 0,
            comp_length: cost::constant(1.),
            output_size: cost::identity(),
        }
    }

    /// Sets the computation length function.
    pub fn with_comp_length(mut self, comp_length: CompLengthFn) -> Self {
        self.comp_length = comp_length;
        self
    }

    /// Sets the output size function.
    pub fn with_output_size(mut self, output_size: OutputSizeFn) -> Self {
        self.output_size = output_size;
        self
    }

    /// Sets the memory demand.
    pub fn with_memory(mut self, memory: u64) -> Self {
        self.memory = memory;
        self
    }

    /// Returns true if the task can be assigned to a worker.
    pub fn is_schedulable(&self) -> bool {
        matches!(self.state, TaskState::NotScheduled | TaskState::Failed)
    }

    /// Returns true if the task is assigned to a worker and has not completed yet.
    pub fn is_running(&self) -> bool {
        matches!(self.state, TaskState::NeedInput | TaskState::Computing)
    }

    /// Returns the worker the task is currently bound to.
    pub fn bound_worker(&self) -> Option<usize> {
        if self.is_running() {
            self.worker
        } else {
            None
        }
    }

    /// Number of messages needed before the computation can start.
    ///
    /// Map tasks read a single external input regardless of their in-edges.
    pub fn required_input_count(&self) -> usize {
        match self.kind {
            TaskKind::Map => 1,
            _ => self.in_edges.len(),
        }
    }

    /// Returns true if enough messages are in the input queue.
    ///
    /// Shuffle tasks only need one message, the rest is merged while computing.
    pub fn has_required_inputs(&self) -> bool {
        match self.kind {
            TaskKind::Shuffle => !self.input_queue.is_empty(),
            _ => self.input_queue.len() >= self.required_input_count(),
        }
    }

    /// Total size of the messages in the input queue.
    pub fn queued_input_size(&self) -> f64 {
        self.input_queue.iter().map(|m| m.size).sum()
    }

    pub(crate) fn comp_length_of(&self, input_size: f64, faults: &FaultModel) -> f64 {
        (self.comp_length)(input_size, faults)
    }

    pub(crate) fn output_size_of(&self, input_size: f64) -> f64 {
        (self.output_size)(input_size)
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("in_edges", &self.in_edges)
            .field("out_edges", &self.out_edges)
            .field("inputs", &self.input_queue.len())
            .field("worker", &self.worker)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions() {
        use TaskState::*;
        assert!(NotScheduled.can_become(NeedInput));
        assert!(Failed.can_become(NeedInput));
        assert!(Computing.can_become(Failed));
        assert!(!Completed.can_become(Failed));
        assert!(!NeedInput.can_become(Completed));
        assert!(!Computing.can_become(NotScheduled));
        assert_eq!(TaskState::into_enum_iter().filter(|s| s.can_become(Failed)).count(), 2);
    }

    #[test]
    fn input_requirements() {
        let mut map = Task::new("map", TaskKind::Map);
        map.in_edges = vec![3, 4];
        assert_eq!(map.required_input_count(), 1);

        let mut reduce = Task::new("reduce", TaskKind::Reduce);
        reduce.in_edges = vec![0, 1];
        reduce.input_queue.push(Message::external(0, 1.));
        assert!(!reduce.has_required_inputs());
        reduce.input_queue.push(Message::external(0, 2.));
        assert!(reduce.has_required_inputs());
        assert_eq!(reduce.queued_input_size(), 3.);

        let mut shuffle = Task::new("shuffle", TaskKind::Shuffle);
        shuffle.in_edges = vec![0, 1, 2];
        assert!(!shuffle.has_required_inputs());
        shuffle.input_queue.push(Message::external(0, 1.));
        assert!(shuffle.has_required_inputs());
    }
}
