//! Worker failures and stragglers.

use dpsim_core::{log_debug, SimulationContext};

use crate::config::Config;
use crate::worker::Worker;

/// Draws random worker failures and straggler delays from the simulation random number generator.
pub struct FaultModel {
    failure_probability: f64,
    straggler_probability: f64,
    straggler_multiplier: f64,
    ctx: SimulationContext,
}

impl FaultModel {
    pub fn new(config: &Config, ctx: SimulationContext) -> Self {
        Self {
            failure_probability: config.failure_probability,
            straggler_probability: config.straggler_probability,
            straggler_multiplier: config.straggler_multiplier,
            ctx,
        }
    }

    /// Probability that a worker fails within `ticks` consecutive ticks.
    pub fn failure_probability_over(&self, ticks: u64) -> f64 {
        let ticks = ticks.min(i32::MAX as u64) as i32;
        1. - (1. - self.failure_probability).powi(ticks)
    }

    /// Marks random alive workers as failed and returns their indices.
    ///
    /// `elapsed_ticks` is the time since the previous call, so that clock jumps over several ticks do not reduce
    /// the failure rate.
    pub fn sample_failures(&self, workers: &mut [Worker], elapsed_ticks: u64) -> Vec<usize> {
        if self.failure_probability <= 0. {
            return Vec::new();
        }
        let p = self.failure_probability_over(elapsed_ticks);
        let mut failed = Vec::new();
        for (id, worker) in workers.iter_mut().enumerate() {
            if !worker.failed && self.ctx.gen_bool(p) {
                worker.failed = true;
                worker.failed_at = Some(self.ctx.time());
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            log_debug!(self.ctx, "{} workers failed", failed.len());
        }
        failed
    }

    /// Extra computation length of a straggler, or 0 for a normal computation.
    pub fn straggler_extra(&self, size: f64) -> f64 {
        if self.ctx.gen_bool(self.straggler_probability) {
            self.straggler_multiplier * size
        } else {
            0.
        }
    }
}
