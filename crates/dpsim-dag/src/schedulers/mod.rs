//! Scheduler implementations.

pub mod common;
pub mod locality;
pub mod map_reduce;
pub mod map_reduce_flow;
pub mod simple_queue;
