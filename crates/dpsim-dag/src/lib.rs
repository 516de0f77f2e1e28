#![doc = include_str!("../README.md")]

pub mod config;
pub mod cost;
pub mod dag;
pub mod dag_simulation;
pub mod fault_model;
pub mod message;
pub mod network;
pub mod run_stats;
pub mod runner;
pub mod scheduler;
pub mod scheduler_resolver;
pub mod schedulers;
pub mod system;
pub mod task;
pub mod trace_log;
pub mod worker;

pub use dag_simulation::simulate;

#[cfg(test)]
mod tests;
