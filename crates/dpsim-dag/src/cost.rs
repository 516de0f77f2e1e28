//! Computation length and output size functions.
//!
//! Both are functions of the total size of a task's inputs. Computation length functions also get the
//! [`FaultModel`] so that they can add straggler delays; tasks that are not prone to straggling simply ignore it.

use std::rc::Rc;

use crate::fault_model::FaultModel;

/// Returns the computation length (in ticks) for the given total input size.
pub type CompLengthFn = Rc<dyn Fn(f64, &FaultModel) -> f64>;

/// Returns the size of each output message for the given total input size.
pub type OutputSizeFn = Rc<dyn Fn(f64) -> f64>;

/// Computation taking the same time regardless of the input.
pub fn constant(length: f64) -> CompLengthFn {
    Rc::new(move |_, _| length)
}

/// Computation taking `fixed + per_unit * input_size`.
pub fn linear(per_unit: f64, fixed: f64) -> CompLengthFn {
    Rc::new(move |size, _| fixed + per_unit * size)
}

/// Adds a random straggler delay on top of `inner`.
pub fn with_stragglers(inner: CompLengthFn) -> CompLengthFn {
    Rc::new(move |size, faults| inner(size, faults) + faults.straggler_extra(size))
}

/// Output of the same size as the total input.
pub fn identity() -> OutputSizeFn {
    Rc::new(|size| size)
}

/// Output of a fixed size.
pub fn fixed_output(size: f64) -> OutputSizeFn {
    Rc::new(move |_| size)
}

/// Output of `ratio * input_size`.
pub fn proportional(ratio: f64) -> OutputSizeFn {
    Rc::new(move |size| ratio * size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use dpsim_core::Simulation;

    #[test]
    fn output_sizes() {
        assert_eq!(identity()(6.), 6.);
        assert_eq!(fixed_output(2.)(6.), 2.);
        assert_eq!(fixed_output(2.)(0.), 2.);
        assert_eq!(proportional(0.25)(8.), 2.);
    }

    #[test]
    fn stragglers_disabled_by_default() {
        let mut sim = Simulation::new(1);
        let faults = FaultModel::new(&Config::default(), sim.create_context("faults"));
        assert_eq!(constant(3.)(100., &faults), 3.);
        assert_eq!(linear(0.5, 1.)(4., &faults), 3.);
        assert_eq!(with_stragglers(linear(0.5, 1.))(4., &faults), 3.);
    }
}
