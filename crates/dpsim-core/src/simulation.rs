//! Simulation setup and time control.

use std::cell::RefCell;
use std::rc::Rc;

use crate::context::SimulationContext;
use crate::log::get_colored;
use crate::state::SimulationState;

/// Represents a simulation, provides methods for its configuration and time control.
///
/// Components do not own the clock. They receive a [`SimulationContext`] through which they can read the
/// current time, register wake-ups and use the simulation-wide random number generator. Only the owner of
/// the `Simulation` moves time forward.
pub struct Simulation {
    sim_state: Rc<RefCell<SimulationState>>,
    names: Vec<String>,
}

impl Simulation {
    /// Creates a new simulation with specified random seed.
    pub fn new(seed: u64) -> Self {
        Self {
            sim_state: Rc::new(RefCell::new(SimulationState::new(seed))),
            names: Vec::new(),
        }
    }

    /// Creates a new simulation context with specified name.
    ///
    /// The name is used as a prefix in log messages produced through the context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dpsim_core::Simulation;
    ///
    /// let mut sim = Simulation::new(123);
    /// let ctx = sim.create_context("runner");
    /// assert_eq!(ctx.name(), "runner");
    /// assert_eq!(ctx.time(), 0);
    /// ```
    pub fn create_context<S>(&mut self, name: S) -> SimulationContext
    where
        S: AsRef<str>,
    {
        self.names.push(name.as_ref().to_owned());
        SimulationContext::new(name.as_ref(), self.sim_state.clone())
    }

    /// Returns the names of all contexts created so far.
    pub fn context_names(&self) -> &[String] {
        &self.names
    }

    /// Returns the current simulation time.
    pub fn time(&self) -> u64 {
        self.sim_state.borrow().time()
    }

    /// Returns the earliest pending wake-up time, if any.
    pub fn next_wake(&self) -> Option<u64> {
        self.sim_state.borrow().clock().next_wake()
    }

    /// Returns the total number of wake-ups requested by components.
    pub fn wake_count(&self) -> u64 {
        self.sim_state.borrow().wake_count()
    }

    /// Advances the clock to the next pending wake-up time, or by a single tick if there is none.
    ///
    /// Returns the number of ticks the clock has moved by.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dpsim_core::Simulation;
    ///
    /// let mut sim = Simulation::new(123);
    /// let ctx = sim.create_context("comp");
    /// assert_eq!(sim.advance(), 1);
    /// ctx.schedule_wake(10.);
    /// assert_eq!(sim.advance(), 9);
    /// assert_eq!(sim.time(), 10);
    /// ```
    pub fn advance(&mut self) -> u64 {
        let elapsed = self.sim_state.borrow_mut().advance();
        log::trace!(
            target: "simulation",
            "[{} {} simulation] clock advanced by {}",
            self.time(),
            get_colored("TRACE", colored::Color::Cyan),
            elapsed
        );
        elapsed
    }
}
