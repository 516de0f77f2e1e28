//! DAG execution runtime.

use std::rc::Rc;

use log::Level;

use dpsim_core::{log_at, log_info, log_warn, SimulationContext};
use dpsim_network::Cluster;

use crate::config::Config;
use crate::dag::DAG;
use crate::fault_model::FaultModel;
use crate::message::Message;
use crate::run_stats::RunStats;
use crate::scheduler::{Assignment, Scheduler};
use crate::task::{TaskKind, TaskState};
use crate::trace_log::{Event, TraceLog};
use crate::worker::Worker;

/// Manages the execution of a DAG on a set of workers.
///
/// Each call to [`tick`](DagRunner::tick) performs one iteration of the event loop at the current time:
///
/// 1. the scheduler is called with the tasks completed and failed during the previous tick;
/// 2. the returned assignments are applied;
/// 3. all tasks are checked for input arrival and computation end;
/// 4. the run ends if all tasks are completed;
/// 5. worker failures are sampled and the tasks on failed workers are failed.
///
/// Moving the clock is left to the owner of the simulation, see [`DagSimulation`](crate::dag_simulation::DagSimulation).
/// The runner registers wake-ups for every time at which some task may change its state.
pub struct DagRunner {
    dag: DAG,
    workers: Vec<Worker>,
    cluster: Cluster,
    scheduler: Rc<dyn Scheduler>,
    faults: FaultModel,
    config: Config,
    completed_last_tick: Vec<usize>,
    failed_last_tick: Vec<usize>,
    // ticks since the previous failure sampling
    elapsed_ticks: u64,
    trace_log: TraceLog,
    trace_log_enabled: bool,
    stats: RunStats,
    log_level: Level,
    started: bool,
    finished: bool,
    all_failed_reported: bool,
    ctx: SimulationContext,
}

impl DagRunner {
    pub fn new(
        dag: DAG,
        workers: Vec<Worker>,
        cluster: Cluster,
        scheduler: Rc<dyn Scheduler>,
        faults: FaultModel,
        config: Config,
        ctx: SimulationContext,
    ) -> Self {
        Self {
            dag,
            workers,
            cluster,
            scheduler,
            faults,
            config,
            completed_last_tick: Vec::new(),
            failed_last_tick: Vec::new(),
            elapsed_ticks: 1,
            trace_log: TraceLog::new(),
            trace_log_enabled: false,
            stats: RunStats::new(),
            log_level: Level::Debug,
            started: false,
            finished: false,
            all_failed_reported: false,
            ctx,
        }
    }

    /// Enables or disables [trace log](crate::trace_log::TraceLog).
    pub fn enable_trace_log(&mut self, flag: bool) {
        self.trace_log_enabled = flag;
    }

    /// Logs progress messages at info level instead of debug level.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.log_level = if verbose { Level::Info } else { Level::Debug };
    }

    pub fn dag(&self) -> &DAG {
        &self.dag
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn trace_log(&self) -> &TraceLog {
        &self.trace_log
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Tasks completed during the last tick, to be passed to the next scheduler call.
    pub fn completed_last_tick(&self) -> &[usize] {
        &self.completed_last_tick
    }

    /// Tasks failed during the last tick, to be passed to the next scheduler call.
    pub fn failed_last_tick(&self) -> &[usize] {
        &self.failed_last_tick
    }

    /// Returns the DAG and workers in their final state.
    pub fn into_parts(self) -> (DAG, Vec<Worker>) {
        (self.dag, self.workers)
    }

    fn start(&mut self) {
        assert!(self.dag.topological_order().is_some(), "DAG contains a cycle");
        assert!(
            self.workers.iter().all(|w| w.task.is_none()),
            "Workers must not have tasks bound before the run"
        );
        assert!(
            self.dag.get_tasks().iter().all(|t| !t.is_running()),
            "Tasks must not be bound to workers before the run"
        );
        log_info!(
            self.ctx,
            "started DAG execution: total {} workers, {} tasks",
            self.workers.len(),
            self.dag.task_count()
        );
        if self.trace_log_enabled {
            self.trace_log.log_dag(&self.dag);
            self.trace_log.log_workers(&self.workers);
        }
        self.started = true;
    }

    /// Performs one iteration of the event loop at the current time.
    ///
    /// Returns the current time if all tasks are completed.
    pub fn tick(&mut self) -> Option<u64> {
        if self.finished {
            return Some(self.stats.makespan);
        }
        if !self.started {
            self.start();
        }
        self.stats.add_tick();

        let assignments = self.scheduler.schedule(
            &self.dag,
            &self.workers,
            &self.completed_last_tick,
            &self.failed_last_tick,
        );
        for Assignment { task, worker } in assignments {
            self.assign(task, worker);
        }

        let completed = self.update_task_states();

        if self.dag.is_completed() {
            self.finished = true;
            self.stats.finalize(self.ctx.time());
            log_info!(self.ctx, "finished DAG execution");
            return Some(self.ctx.time());
        }

        let failed = self.inject_failures();
        if !completed.is_empty() || !failed.is_empty() {
            // the scheduler should see these lists at the very next tick
            self.ctx.schedule_wake(self.ctx.delta(1.));
        }
        self.completed_last_tick = completed;
        self.failed_last_tick = failed;
        None
    }

    /// Stops an unfinished run, recording the current time as its makespan.
    pub fn stop(&mut self) {
        if !self.finished {
            self.stats.finalize(self.ctx.time());
        }
    }

    /// Must be called after the clock has moved by `elapsed` ticks.
    pub fn on_clock_advanced(&mut self, elapsed: u64) {
        self.elapsed_ticks = elapsed;
    }

    /// Fails the worker immediately together with its task.
    ///
    /// The failed task is reported to the scheduler at the next tick.
    pub fn fail_worker(&mut self, worker_id: usize) {
        let worker = &mut self.workers[worker_id];
        if worker.failed {
            return;
        }
        worker.failed = true;
        worker.failed_at = Some(self.ctx.time());
        self.stats.add_worker_failures(1);
        self.on_worker_failed(worker_id);
        if let Some(task_id) = self.workers[worker_id].task.take() {
            self.fail_task(task_id);
            self.failed_last_tick.push(task_id);
        }
    }

    /// Returns true if every worker hosts at most one task and every running task is hosted by exactly one worker.
    pub fn bindings_consistent(&self) -> bool {
        let workers_ok = self.workers.iter().enumerate().all(|(worker_id, w)| match w.task {
            Some(task_id) => !w.failed && self.dag.get_task(task_id).bound_worker() == Some(worker_id),
            None => true,
        });
        let tasks_ok = self
            .dag
            .get_tasks()
            .iter()
            .enumerate()
            .all(|(task_id, t)| match t.bound_worker() {
                Some(worker_id) => self.workers[worker_id].task == Some(task_id),
                None => !t.is_running(),
            });
        workers_ok && tasks_ok
    }

    fn assign(&mut self, task_id: usize, worker_id: usize) {
        let task = self.dag.get_task(task_id);
        assert!(
            task.is_schedulable(),
            "Task {} can't be assigned in state {:?}",
            task.name,
            task.state
        );
        assert!(worker_id < self.workers.len(), "Worker {} does not exist", worker_id);
        let worker = &mut self.workers[worker_id];
        assert!(
            worker.schedulable(),
            "Worker {} is not available for task {}",
            worker.name,
            task.name
        );
        worker.task = Some(task_id);
        self.dag.update_task_state(task_id, TaskState::NeedInput);
        self.stats.set_task_assigned();

        let now = self.ctx.time();
        let task = self.dag.get_task_mut(task_id);
        task.worker = Some(worker_id);
        task.schedule_time = Some(now);
        task.assignment_count += 1;
        for message in task.input_queue.iter_mut().filter(|m| m.arrival_time.is_none()) {
            let arrival = Self::deliver(&self.cluster, &mut self.stats, now, message, worker_id);
            task.max_input_time = task.max_input_time.max(arrival);
        }
        // also covers external inputs with preset arrival times
        self.ctx.schedule_wake(task.max_input_time);

        self.on_event(Event::TaskScheduled {
            time: now,
            task_id,
            task_name: self.dag.get_task(task_id).name.clone(),
            worker_id,
            worker_name: self.workers[worker_id].name.clone(),
        });
    }

    /// Computes arrival time of the message at the worker and marks it as addressed to that worker.
    fn deliver(cluster: &Cluster, stats: &mut RunStats, now: u64, message: &mut Message, worker_id: usize) -> f64 {
        let transit = if message.is_external() {
            0.
        } else {
            cluster.transit_time(message.size, message.src_worker, Some(worker_id))
        };
        if message.src_worker.map_or(false, |src| src != worker_id) {
            stats.add_transfer(message.size);
        }
        let arrival = now as f64 + transit;
        message.arrival_time = Some(arrival);
        message.dst_worker = Some(worker_id);
        arrival
    }

    fn update_task_states(&mut self) -> Vec<usize> {
        let mut completed = Vec::new();
        for task_id in 0..self.dag.task_count() {
            let task = self.dag.get_task(task_id);
            if task.state == TaskState::NeedInput && task.has_required_inputs() && self.ctx.passed(task.max_input_time) {
                self.start_computing(task_id);
            }
            let task = self.dag.get_task(task_id);
            if task.state == TaskState::Computing && task.comp_end_time.map_or(false, |t| self.ctx.passed(t)) {
                self.complete_task(task_id);
                completed.push(task_id);
            }
        }
        completed
    }

    fn start_computing(&mut self, task_id: usize) {
        let task = self.dag.get_task(task_id);
        let input_size = task.queued_input_size();
        let mut length = task.comp_length_of(input_size, &self.faults) * self.config.comp_length_multiplier;
        if task.kind == TaskKind::Shuffle {
            // shuffle merges data while it arrives, starting from the assignment
            let schedule_time = task.schedule_time.unwrap_or_else(|| self.ctx.time());
            length = (length - self.ctx.elapsed_since(schedule_time as f64)).max(0.);
        }
        let end_time = self.ctx.delta(length);

        self.dag.update_task_state(task_id, TaskState::Computing);
        let task = self.dag.get_task_mut(task_id);
        task.input_size = input_size;
        task.comp_start_time = Some(self.ctx.time());
        task.comp_end_time = Some(end_time);
        self.ctx.schedule_wake(end_time);

        self.on_event(Event::TaskStarted {
            time: self.ctx.time(),
            task_id,
            task_name: self.dag.get_task(task_id).name.clone(),
            input_size,
            end_time,
        });
    }

    fn complete_task(&mut self, task_id: usize) {
        let now = self.ctx.time();
        let task = self.dag.get_task(task_id);
        let worker_id = match task.bound_worker() {
            Some(worker_id) => worker_id,
            None => panic!("Task {} is computing without a worker", task.name),
        };
        let output_size = task.output_size_of(task.input_size) * self.config.output_size_multiplier;
        let kind = task.kind;
        let compute_time = task.comp_end_time.unwrap_or(now as f64) - task.comp_start_time.unwrap_or(now) as f64;
        let successors = task.out_edges.clone();

        for succ in successors {
            let mut message = Message {
                size: output_size,
                arrival_time: None,
                src_task: Some(task_id),
                src_worker: Some(worker_id),
                dst_task: succ,
                dst_worker: None,
            };
            let succ_task = self.dag.get_task_mut(succ);
            if let Some(dst) = succ_task.bound_worker() {
                let arrival = Self::deliver(&self.cluster, &mut self.stats, now, &mut message, dst);
                succ_task.max_input_time = succ_task.max_input_time.max(arrival);
                self.ctx.schedule_wake(arrival);
            }
            succ_task.input_queue.push(message);
            self.stats.add_message();
        }

        self.workers[worker_id].task = None;
        self.dag.update_task_state(task_id, TaskState::Completed);
        self.stats.set_task_completed(kind, compute_time);

        self.on_event(Event::TaskCompleted {
            time: now,
            task_id,
            task_name: self.dag.get_task(task_id).name.clone(),
        });
    }

    fn inject_failures(&mut self) -> Vec<usize> {
        let failed_workers = self.faults.sample_failures(&mut self.workers, self.elapsed_ticks);
        self.elapsed_ticks = 0;
        self.stats.add_worker_failures(failed_workers.len());

        let mut failed = Vec::new();
        for worker_id in failed_workers {
            self.on_worker_failed(worker_id);
            if let Some(task_id) = self.workers[worker_id].task.take() {
                self.fail_task(task_id);
                failed.push(task_id);
            }
        }
        failed
    }

    fn on_worker_failed(&mut self, worker_id: usize) {
        self.on_event(Event::WorkerFailed {
            time: self.ctx.time(),
            worker_id,
            worker_name: self.workers[worker_id].name.clone(),
        });
        if !self.all_failed_reported && self.workers.iter().all(|w| w.failed) {
            self.all_failed_reported = true;
            log_warn!(
                self.ctx,
                "all workers have failed, {} of {} tasks will never complete",
                self.dag.task_count() - self.dag.completed_task_count(),
                self.dag.task_count()
            );
        }
    }

    /// Moves a task hosted by a failed worker to the failed state.
    ///
    /// Arrival times of the messages received from other tasks are dropped since they were computed for the failed
    /// worker. They are computed again when the task is assigned to another worker.
    fn fail_task(&mut self, task_id: usize) {
        let now = self.ctx.time();
        let task = self.dag.get_task(task_id);
        let worker_id = match task.bound_worker() {
            Some(worker_id) => worker_id,
            None => panic!("Task {} can't fail in state {:?}", task.name, task.state),
        };
        let lost_compute_time = match task.comp_start_time {
            Some(start) if task.state == TaskState::Computing => (now - start) as f64,
            _ => 0.,
        };

        self.dag.update_task_state(task_id, TaskState::Failed);
        let task = self.dag.get_task_mut(task_id);
        task.worker = None;
        task.comp_start_time = None;
        task.comp_end_time = None;
        task.max_input_time = 0.;
        for message in task.input_queue.iter_mut() {
            if message.is_external() {
                if let Some(arrival) = message.arrival_time {
                    task.max_input_time = task.max_input_time.max(arrival);
                }
            } else {
                message.arrival_time = None;
                message.dst_worker = None;
            }
        }
        self.stats.set_task_failed(lost_compute_time);

        self.on_event(Event::TaskFailed {
            time: now,
            task_id,
            task_name: self.dag.get_task(task_id).name.clone(),
            worker_id,
        });
    }

    fn on_event(&mut self, event: Event) {
        log_at!(self.log_level, self.ctx, "{}", event);
        if self.trace_log_enabled {
            self.trace_log.log_event(event);
        }
    }
}
