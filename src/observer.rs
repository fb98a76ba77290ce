//! Run event observation
//!
//! The executor never prints anything itself. Anything that wants to follow a
//! run (progress bars, test instrumentation, reporting) implements
//! [`ExecObserver`] and is handed to
//! [`BoundedExecutor::with_observer`](crate::BoundedExecutor::with_observer).
//! All callbacks are invoked from the executor itself, between suspension
//! points, in the order the events happen.

use crate::executor::RunStats;

/// Collaborator notified of chunk and task lifecycle events
///
/// Every method has an empty default so implementors only override what they
/// care about.
pub trait ExecObserver {
    /// A chunk is about to start: tasks `first_index..first_index + len`
    ///
    /// Only called by the chunked strategy.
    fn on_chunk_start(&self, chunk: usize, first_index: usize, len: usize) {
        let _ = (chunk, first_index, len);
    }

    /// Task `index` has been invoked and its operation is now in flight
    fn on_task_start(&self, index: usize) {
        let _ = index;
    }

    /// Task `index` settled, successfully or not
    fn on_task_settled(&self, index: usize, succeeded: bool) {
        let _ = (index, succeeded);
    }

    /// Every task of `chunk` settled successfully
    fn on_chunk_settled(&self, chunk: usize, len: usize) {
        let _ = (chunk, len);
    }

    /// The whole run completed
    fn on_run_finished(&self, stats: &RunStats) {
        let _ = stats;
    }

    /// The run was aborted because of task `index`
    fn on_run_failed(&self, index: Option<usize>) {
        let _ = index;
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ExecObserver for NoopObserver {}
