//! Simulation configuration and execution.

use std::mem;
use std::rc::Rc;

use dpsim_core::{log_warn, Simulation, SimulationContext};
use dpsim_network::Cluster;

use crate::config::Config;
use crate::dag::DAG;
use crate::fault_model::FaultModel;
use crate::runner::DagRunner;
use crate::scheduler::Scheduler;
use crate::system::SystemConfig;
use crate::worker::{make_workers, Worker};

/// Provides a convenient API for configuring and running simulations of DAG execution.
///
/// Owns the [`Simulation`] and moves its clock between the ticks of [`DagRunner`].
pub struct DagSimulation {
    pub sim: Simulation,
    runner: DagRunner,
    finish_time: Option<u64>,
    ctx: SimulationContext,
}

impl DagSimulation {
    /// Creates simulation of running `dag` on `workers` connected by `cluster`.
    ///
    /// Panics if the config is invalid.
    pub fn new(dag: DAG, workers: Vec<Worker>, scheduler: Rc<dyn Scheduler>, cluster: Cluster, config: Config) -> Self {
        if let Err(e) = config.validate() {
            panic!("Invalid config: {}", e);
        }
        let mut cluster = cluster;
        cluster.set_bandwidth_multiplier(config.bandwidth_multiplier);
        let mut sim = Simulation::new(config.seed);
        let faults = FaultModel::new(&config, sim.create_context("faults"));
        let runner = DagRunner::new(
            dag,
            workers,
            cluster,
            scheduler,
            faults,
            config,
            sim.create_context("runner"),
        );
        let ctx = sim.create_context("simulation");
        Self {
            sim,
            runner,
            finish_time: None,
            ctx,
        }
    }

    /// Creates simulation with workers, network and config taken from a system description.
    ///
    /// The config from the system description is used unless it is absent, in which case the default one is used.
    /// Panics if the network description refers to unknown workers.
    pub fn from_system(dag: DAG, system: &SystemConfig, scheduler: Rc<dyn Scheduler>) -> Self {
        let workers = make_workers(&system.workers);
        let cluster = system
            .network
            .make_cluster(&workers)
            .unwrap_or_else(|e| panic!("Can't create network: {}", e));
        Self::new(dag, workers, scheduler, cluster, system.config.clone().unwrap_or_default())
    }

    /// Enables or disables [trace log](crate::trace_log::TraceLog).
    pub fn enable_trace_log(&mut self, flag: bool) {
        self.runner.enable_trace_log(flag);
    }

    /// Logs progress messages at info level instead of debug level.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.runner.set_verbose(verbose);
    }

    /// Performs one tick and moves the clock to the next time at which something may happen.
    ///
    /// Returns false if all tasks are completed.
    pub fn step(&mut self) -> bool {
        if self.finish_time.is_some() {
            return false;
        }
        if let Some(time) = self.runner.tick() {
            self.finish_time = Some(time);
            return false;
        }
        let elapsed = self.sim.advance();
        self.runner.on_clock_advanced(elapsed);
        true
    }

    /// Runs the simulation until all tasks are completed, or until the time limit from the config is exceeded.
    ///
    /// Returns the completion time, or the time at which the run was stopped.
    pub fn run(&mut self) -> u64 {
        match self.runner.config().time_limit {
            Some(limit) => match self.run_until(limit) {
                Some(time) => time,
                None => {
                    log_warn!(
                        self.ctx,
                        "time limit {} exceeded with {} of {} tasks completed",
                        limit,
                        self.runner.dag().completed_task_count(),
                        self.runner.dag().task_count()
                    );
                    self.runner.stop();
                    self.sim.time()
                }
            },
            None => {
                while self.step() {}
                self.finish_time.unwrap_or_else(|| self.sim.time())
            }
        }
    }

    /// Runs ticks while the current time does not exceed `limit`.
    ///
    /// Returns the completion time if all tasks are completed.
    pub fn run_until(&mut self, limit: u64) -> Option<u64> {
        while self.finish_time.is_none() && self.sim.time() <= limit {
            self.step();
        }
        self.finish_time
    }

    /// Returns the current simulation time.
    pub fn time(&self) -> u64 {
        self.sim.time()
    }

    pub fn finish_time(&self) -> Option<u64> {
        self.finish_time
    }

    pub fn runner(&self) -> &DagRunner {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut DagRunner {
        &mut self.runner
    }

    /// Returns the DAG and workers in their final state.
    pub fn into_parts(self) -> (DAG, Vec<Worker>) {
        self.runner.into_parts()
    }
}

/// Runs `dag` on `workers` until all tasks are completed and returns the completion time.
///
/// The DAG and the workers are updated in place, so that their final state can be inspected afterwards.
/// If `config` has a time limit and it is exceeded, returns the time at which the run was stopped.
///
/// # Examples
///
/// ```rust
/// use std::rc::Rc;
///
/// use dpsim_dag::config::Config;
/// use dpsim_dag::dag::DAG;
/// use dpsim_dag::schedulers::simple_queue::SimpleQueueScheduler;
/// use dpsim_dag::worker::uniform_workers;
/// use dpsim_dag::simulate;
/// use dpsim_network::Cluster;
///
/// let mut dag = DAG::new();
/// let map = dag.add_map_task("map", 1.);
/// let reduce = dag.add_reduce_task("reduce");
/// dag.add_edge(map, reduce);
/// let mut workers = uniform_workers(1, 1., 1);
///
/// let time = simulate(
///     &mut dag,
///     &mut workers,
///     Rc::new(SimpleQueueScheduler::new()),
///     Cluster::default(),
///     &Config::default(),
///     false,
/// );
/// assert_eq!(time, 3);
/// assert!(dag.is_completed());
/// ```
pub fn simulate(
    dag: &mut DAG,
    workers: &mut Vec<Worker>,
    scheduler: Rc<dyn Scheduler>,
    cluster: Cluster,
    config: &Config,
    verbose: bool,
) -> u64 {
    let mut sim = DagSimulation::new(mem::take(dag), mem::take(workers), scheduler, cluster, config.clone());
    sim.set_verbose(verbose);
    let time = sim.run();
    let (final_dag, final_workers) = sim.into_parts();
    *dag = final_dag;
    *workers = final_workers;
    time
}
