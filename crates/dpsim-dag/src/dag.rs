//! DAG of tasks.

use std::collections::VecDeque;

use crate::cost::{CompLengthFn, OutputSizeFn};
use crate::message::Message;
use crate::task::*;

/// Task graph.
///
/// Tasks are stored in an arena and addressed by their index. Each edge is stored twice: in `out_edges` of its
/// source (authoritative) and in `in_edges` of its destination.
#[derive(Clone, Default)]
pub struct DAG {
    tasks: Vec<Task>,
    completed_task_count: usize,
}

impl DAG {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds task with default cost functions and returns its id.
    pub fn add_task(&mut self, name: &str, kind: TaskKind) -> usize {
        self.add(Task::new(name, kind))
    }

    /// Adds a fully configured task and returns its id.
    pub fn add(&mut self, task: Task) -> usize {
        assert!(
            task.in_edges.is_empty() && task.out_edges.is_empty(),
            "Edges must be added with DAG::add_edge"
        );
        let task_id = self.tasks.len();
        self.tasks.push(task);
        task_id
    }

    /// Adds map task with one external input of size `input_size`.
    pub fn add_map_task(&mut self, name: &str, input_size: f64) -> usize {
        let task_id = self.add_task(name, TaskKind::Map);
        self.add_input(task_id, input_size);
        task_id
    }

    pub fn add_shuffle_task(&mut self, name: &str) -> usize {
        self.add_task(name, TaskKind::Shuffle)
    }

    pub fn add_reduce_task(&mut self, name: &str) -> usize {
        self.add_task(name, TaskKind::Reduce)
    }

    /// Sets computation length function of a task that was not started yet.
    pub fn set_comp_length(&mut self, task_id: usize, comp_length: CompLengthFn) {
        let task = self.get_task_mut(task_id);
        assert_eq!(task.state, TaskState::NotScheduled, "Can't change costs of task {}", task.name);
        task.comp_length = comp_length;
    }

    /// Sets output size function of a task that was not started yet.
    pub fn set_output_size(&mut self, task_id: usize, output_size: OutputSizeFn) {
        let task = self.get_task_mut(task_id);
        assert_eq!(task.state, TaskState::NotScheduled, "Can't change costs of task {}", task.name);
        task.output_size = output_size;
    }

    /// Sets memory demand of a task that was not started yet.
    pub fn set_memory(&mut self, task_id: usize, memory: u64) {
        let task = self.get_task_mut(task_id);
        assert_eq!(task.state, TaskState::NotScheduled, "Can't change memory of task {}", task.name);
        task.memory = memory;
    }

    /// Adds edge `from -> to`: when `from` completes, `to` receives a message from it.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        assert!(from != to, "Self-loop on task {}", from);
        assert!(to < self.tasks.len(), "Task {} does not exist", to);
        self.get_task_mut(from).out_edges.push(to);
        self.tasks[to].in_edges.push(from);
    }

    /// Pre-seeds an external input available as soon as the task is placed on a worker.
    pub fn add_input(&mut self, task_id: usize, size: f64) {
        self.get_task_mut(task_id).input_queue.push(Message::external(task_id, size));
    }

    /// Pre-seeds an external input arriving at `time`.
    pub fn add_input_at(&mut self, task_id: usize, size: f64, time: f64) {
        let task = self.get_task_mut(task_id);
        let mut message = Message::external(task_id, size);
        message.arrival_time = Some(time);
        task.max_input_time = task.max_input_time.max(time);
        task.input_queue.push(message);
    }

    pub fn get_task(&self, task_id: usize) -> &Task {
        self.tasks
            .get(task_id)
            .unwrap_or_else(|| panic!("Task {} does not exist", task_id))
    }

    pub fn get_task_mut(&mut self, task_id: usize) -> &mut Task {
        self.tasks
            .get_mut(task_id)
            .unwrap_or_else(|| panic!("Task {} does not exist", task_id))
    }

    pub fn get_tasks(&self) -> &Vec<Task> {
        &self.tasks
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns ids of tasks that can be assigned to a worker, in id order.
    pub fn schedulable_tasks(&self) -> impl Iterator<Item = usize> + '_ {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.is_schedulable())
            .map(|(id, _)| id)
    }

    /// Changes task state, checking that the transition is allowed.
    pub fn update_task_state(&mut self, task_id: usize, state: TaskState) {
        let task = self.get_task_mut(task_id);
        assert!(
            task.state.can_become(state),
            "Error: task {} can't move from {:?} to {:?}",
            task.name,
            task.state,
            state
        );
        task.state = state;
        if state == TaskState::Completed {
            self.completed_task_count += 1;
        }
    }

    pub fn completed_task_count(&self) -> usize {
        self.completed_task_count
    }

    pub fn is_completed(&self) -> bool {
        self.tasks.len() == self.completed_task_count
    }

    /// Returns task ids in topological order, or `None` if the graph has a cycle.
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        let mut in_degree = self.tasks.iter().map(|t| t.in_edges.len()).collect::<Vec<_>>();
        let mut queue = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(id, _)| id)
            .collect::<VecDeque<_>>();
        let mut order = Vec::with_capacity(self.tasks.len());
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &succ in self.tasks[v].out_edges.iter() {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    queue.push_back(succ);
                }
            }
        }
        if order.len() == self.tasks.len() {
            Some(order)
        } else {
            None
        }
    }
}
