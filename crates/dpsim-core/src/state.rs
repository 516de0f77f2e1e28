use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::prelude::*;
use rand_pcg::Pcg64;

use crate::clock::Clock;

pub struct SimulationState {
    clock: Clock,
    rand: Pcg64,
    wake_count: u64,
}

impl SimulationState {
    pub fn new(seed: u64) -> Self {
        Self {
            clock: Clock::new(),
            rand: Pcg64::seed_from_u64(seed),
            wake_count: 0,
        }
    }

    pub fn time(&self) -> u64 {
        self.clock.now()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn schedule_wake(&mut self, time: f64) {
        self.wake_count += 1;
        self.clock.schedule_wake(time);
    }

    pub fn wake_count(&self) -> u64 {
        self.wake_count
    }

    pub fn advance(&mut self) -> u64 {
        self.clock.advance()
    }

    pub fn rand(&mut self) -> f64 {
        self.rand.gen_range(0.0..1.0)
    }

    pub fn gen_bool(&mut self, p: f64) -> bool {
        if p <= 0. {
            false
        } else if p >= 1. {
            true
        } else {
            self.rand.gen_bool(p)
        }
    }

    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.rand.gen_range(range)
    }
}
