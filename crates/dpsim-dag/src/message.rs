//! Data sent along DAG edges.

use serde::Serialize;

/// A sized piece of data travelling from one task to another.
///
/// Messages are created when a task completes (one per out-edge) or pre-seeded as external inputs. The arrival
/// time is known only once both ends are placed on workers, and is cleared again if the receiving task loses
/// its worker.
#[derive(Clone, Debug, Serialize)]
pub struct Message {
    pub size: f64,
    pub arrival_time: Option<f64>,
    pub src_task: Option<usize>,
    pub src_worker: Option<usize>,
    pub dst_task: usize,
    pub dst_worker: Option<usize>,
}

impl Message {
    /// Creates an input coming from outside of the cluster.
    pub fn external(dst_task: usize, size: f64) -> Self {
        Self {
            size,
            arrival_time: None,
            src_task: None,
            src_worker: None,
            dst_task,
            dst_worker: None,
        }
    }

    /// Returns true if the message is not produced by another task.
    pub fn is_external(&self) -> bool {
        self.src_task.is_none()
    }
}
