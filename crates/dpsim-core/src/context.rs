//! Accessing simulation from components.

use std::cell::RefCell;
use std::rc::Rc;

use rand::distributions::uniform::{SampleRange, SampleUniform};

use crate::state::SimulationState;

/// A facade for accessing the simulation clock and random number generator from simulation components.
#[derive(Clone)]
pub struct SimulationContext {
    name: String,
    sim_state: Rc<RefCell<SimulationState>>,
}

impl SimulationContext {
    pub(crate) fn new(name: &str, sim_state: Rc<RefCell<SimulationState>>) -> Self {
        Self {
            name: name.to_owned(),
            sim_state,
        }
    }

    /// Returns the name of component associated with this context.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current simulation time.
    pub fn time(&self) -> u64 {
        self.sim_state.borrow().time()
    }

    /// Returns the current time shifted by `delta`.
    pub fn delta(&self, delta: f64) -> f64 {
        self.sim_state.borrow().clock().delta(delta)
    }

    /// Returns true if `time` is not in the future.
    pub fn passed(&self, time: f64) -> bool {
        self.sim_state.borrow().clock().passed(time)
    }

    /// Returns the time elapsed since `time`, or 0 if `time` is in the future.
    pub fn elapsed_since(&self, time: f64) -> f64 {
        self.sim_state.borrow().clock().elapsed_since(time)
    }

    /// Asks the simulation to stop at `time` (rounded up to a whole tick).
    pub fn schedule_wake(&self, time: f64) {
        self.sim_state.borrow_mut().schedule_wake(time);
    }

    /// Returns a random float in the range _[0, 1)_
    /// using the simulation-wide random number generator.
    pub fn rand(&self) -> f64 {
        self.sim_state.borrow_mut().rand()
    }

    /// Returns true with probability `p` using the simulation-wide random number generator.
    ///
    /// Probabilities outside of _[0, 1]_ are clamped, and no random number is drawn for 0 or 1.
    pub fn gen_bool(&self, p: f64) -> bool {
        self.sim_state.borrow_mut().gen_bool(p)
    }

    /// Returns a random value in the specified range
    /// using the simulation-wide random number generator.
    pub fn gen_range<T, R>(&self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.sim_state.borrow_mut().gen_range(range)
    }
}
