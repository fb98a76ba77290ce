//! Bounded concurrent execution of deferred tasks
//!
//! This module runs an ordered list of task factories with at most `limit`
//! operations in flight, and hands back the results in input order.
//!
//! # Tasks
//!
//! A task is a zero-argument factory (`FnOnce() -> Fut`). Calling the factory
//! is what starts the operation, so the executor holds on to factories until
//! their turn comes. Passing already-created futures would defeat the limit.
//!
//! # Strategies
//!
//! - [`Strategy::Chunked`]: the task list is split into chunks of `limit`
//!   tasks with [`lazy_seq::chunk`]. Every factory of a chunk is invoked
//!   together, the chunk is awaited as a whole, and only then is the next
//!   chunk pulled from the lazy sequence.
//! - [`Strategy::Windowed`]: up to `limit` tasks run at once and a new one is
//!   started each time any of them settles.
//!
//! Both strategies keep `Result[i]` paired with `Task[i]` regardless of the
//! order in which operations complete.
//!
//! # Failure
//!
//! The first failure observed fails the whole run and no further task is
//! started. Tasks already in flight are not cancelled: each one runs as its
//! own runtime task and is left to finish, but its result is discarded.
//! Callers never see a partial result list.
//!
//! # Runtime
//!
//! Started operations are spawned on the current `compio` runtime, so the
//! executor must be awaited from inside one (`#[compio::main]`,
//! `#[compio::test]` or `compio::runtime::Runtime::block_on`).

use crate::config::{Limit, Strategy};
use crate::error::{ExecError, InvalidLimit, Result};
use crate::observer::{ExecObserver, NoopObserver};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{FutureExt, StreamExt};
use lazy_seq::SeqExt;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Summary of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Number of tasks executed (equals the number of results)
    pub tasks: usize,
    /// Number of chunks processed (always 0 for [`Strategy::Windowed`])
    pub chunks: usize,
    /// Largest number of operations that were in flight at the same time
    pub peak_in_flight: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Runs task factories with a bounded number of operations in flight
///
/// # Example
///
/// ```rust,no_run
/// use boundrun::{BoundedExecutor, Strategy};
///
/// # async fn example() -> Result<(), boundrun::ExecError<std::io::Error>> {
/// let executor = BoundedExecutor::new(3)?.with_strategy(Strategy::Chunked);
///
/// let tasks = (0..8).map(|i| move || async move { Ok::<_, std::io::Error>(i * 10) });
/// let values = executor.run(tasks).await?;
///
/// assert_eq!(values, vec![0, 10, 20, 30, 40, 50, 60, 70]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BoundedExecutor {
    limit: Limit,
    strategy: Strategy,
    observer: Arc<dyn ExecObserver>,
}

impl BoundedExecutor {
    /// Create an executor with the chunked strategy and no observer
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLimit`] if `limit` is 0.
    pub fn new(limit: usize) -> std::result::Result<Self, InvalidLimit> {
        Ok(Self::with_limit(Limit::new(limit)?))
    }

    /// Create an executor from an already validated limit
    #[must_use]
    pub fn with_limit(limit: Limit) -> Self {
        Self {
            limit,
            strategy: Strategy::default(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Choose how tasks are admitted under the limit
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Attach an observer that is notified of chunk and task events
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ExecObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The configured limit
    #[must_use]
    pub const fn limit(&self) -> Limit {
        self.limit
    }

    /// The configured strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Run every task and return their results in input order
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Task`] with the first failure observed, or
    /// [`ExecError::Panicked`] if a task panicked. No partial results are
    /// returned.
    pub async fn run<I, F, Fut, T, E>(&self, tasks: I) -> Result<Vec<T>, E>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>> + 'static,
        T: 'static,
        E: 'static,
    {
        self.run_with_stats(tasks).await.map(|(values, _)| values)
    }

    /// Like [`run`](Self::run), also reporting [`RunStats`]
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub async fn run_with_stats<I, F, Fut, T, E>(&self, tasks: I) -> Result<(Vec<T>, RunStats), E>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>> + 'static,
        T: 'static,
        E: 'static,
    {
        let started_at = Instant::now();
        debug!(
            "Starting bounded run (limit {}, strategy {})",
            self.limit, self.strategy
        );

        let outcome = match self.strategy {
            Strategy::Chunked => self.run_chunked(tasks).await,
            Strategy::Windowed => self.run_windowed(tasks).await,
        };

        match outcome {
            Ok(finished) => {
                let stats = RunStats {
                    tasks: finished.values.len(),
                    chunks: finished.chunks,
                    peak_in_flight: finished.peak_in_flight,
                    elapsed: started_at.elapsed(),
                };
                debug!(
                    "Bounded run finished: {} tasks, {} chunks, peak {} in flight, {:?}",
                    stats.tasks, stats.chunks, stats.peak_in_flight, stats.elapsed
                );
                self.observer.on_run_finished(&stats);
                Ok((finished.values, stats))
            }
            Err(err) => {
                warn!("Bounded run aborted: {}", err);
                self.observer.on_run_failed(err.task_index());
                Err(err)
            }
        }
    }

    /// Chunk-at-a-time execution
    ///
    /// Chunks come out of a lazy `chunk -> map(start)` pipeline: a chunk's
    /// factories are only invoked when the loop pulls it, which happens after
    /// the previous chunk has fully settled.
    async fn run_chunked<I, F, Fut, T, E>(&self, tasks: I) -> Result<Finished<T>, E>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>> + 'static,
        T: 'static,
        E: 'static,
    {
        let observer = &*self.observer;
        let mut next_chunk = 0;
        let batches = tasks
            .into_iter()
            .enumerate()
            .lazy()
            .chunk(self.limit.get())
            .map(|group| {
                let chunk = next_chunk;
                next_chunk += 1;
                Batch::start(chunk, group, observer)
            });

        let mut values = Vec::new();
        let mut chunks = 0;
        let mut peak_in_flight = 0;
        for batch in batches {
            peak_in_flight = peak_in_flight.max(batch.slots.len());
            values.extend(batch.settle(observer).await?);
            chunks += 1;
        }

        Ok(Finished {
            values,
            chunks,
            peak_in_flight,
        })
    }

    /// Sliding-window execution
    async fn run_windowed<I, F, Fut, T, E>(&self, tasks: I) -> Result<Finished<T>, E>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>> + 'static,
        T: 'static,
        E: 'static,
    {
        let observer = &*self.observer;
        let limit = self.limit.get();
        let (tx, mut rx) = mpsc::unbounded();
        let mut pending = tasks.into_iter().enumerate().fuse();
        let mut slots = Slots::new(0, 0);
        let mut in_flight = 0;
        let mut peak_in_flight = 0;

        loop {
            while in_flight < limit {
                let Some((index, factory)) = pending.next() else {
                    break;
                };
                slots.push_pending();
                trace!("Starting task {}", index);
                observer.on_task_start(index);
                launch(index, factory, &tx);
                in_flight += 1;
            }
            peak_in_flight = peak_in_flight.max(in_flight);

            if in_flight == 0 {
                break;
            }

            // `tx` is alive for the whole loop, so the channel cannot close here
            let Some(settled) = rx.next().await else {
                return Err(ExecError::Internal(
                    "Result channel closed while tasks were in flight".to_string(),
                ));
            };
            in_flight -= 1;
            accept(settled, &mut slots, observer)?;
        }

        Ok(Finished {
            values: slots.into_values(),
            chunks: 0,
            peak_in_flight,
        })
    }
}

impl fmt::Debug for BoundedExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedExecutor")
            .field("limit", &self.limit)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

/// Run `tasks` with at most `limit` in flight, chunk by chunk
///
/// Shorthand for `BoundedExecutor::new(limit)?.run(tasks)`.
///
/// # Errors
///
/// Returns [`ExecError::InvalidLimit`] if `limit` is 0 (no factory is
/// invoked), otherwise the errors of [`BoundedExecutor::run`].
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() -> Result<(), boundrun::ExecError<std::io::Error>> {
/// let tasks = ["a", "b", "c"].map(|key| move || async move { Ok::<_, std::io::Error>(key.len()) });
/// let sizes = boundrun::concurrent_limited(2, tasks).await?;
/// assert_eq!(sizes, vec![1, 1, 1]);
/// # Ok(())
/// # }
/// ```
pub async fn concurrent_limited<I, F, Fut, T, E>(limit: usize, tasks: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>> + 'static,
    T: 'static,
    E: 'static,
{
    BoundedExecutor::new(limit)?.run(tasks).await
}

/// Run `tasks` keeping up to `limit` in flight at all times
///
/// # Errors
///
/// Same as [`concurrent_limited`].
pub async fn concurrent_windowed<I, F, Fut, T, E>(limit: usize, tasks: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>> + 'static,
    T: 'static,
    E: 'static,
{
    BoundedExecutor::new(limit)?
        .with_strategy(Strategy::Windowed)
        .run(tasks)
        .await
}

/// Values and bookkeeping of a successful run
struct Finished<T> {
    values: Vec<T>,
    chunks: usize,
    peak_in_flight: usize,
}

/// How a spawned operation ended
enum Outcome<T, E> {
    Finished(std::result::Result<T, E>),
    Panicked,
}

/// Message sent back by a spawned operation
struct Settled<T, E> {
    index: usize,
    outcome: Outcome<T, E>,
}

/// Invoke `factory` and spawn its operation on the current runtime
///
/// The spawned task is detached: it keeps running even if the executor stops
/// listening because a sibling failed. A factory that panics is reported the
/// same way as an operation that panics.
fn launch<F, Fut, T, E>(index: usize, factory: F, tx: &UnboundedSender<Settled<T, E>>)
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>> + 'static,
    T: 'static,
    E: 'static,
{
    let Ok(operation) = std::panic::catch_unwind(AssertUnwindSafe(factory)) else {
        let _ = tx.unbounded_send(Settled {
            index,
            outcome: Outcome::Panicked,
        });
        return;
    };
    let tx = tx.clone();
    compio::runtime::spawn(async move {
        let outcome = match AssertUnwindSafe(operation).catch_unwind().await {
            Ok(result) => Outcome::Finished(result),
            Err(_) => Outcome::Panicked,
        };
        // The receiver is gone once the run has failed; nothing to report to
        let _ = tx.unbounded_send(Settled { index, outcome });
    })
    .detach();
}

/// Result slots for a contiguous range of task indices
struct Slots<T> {
    base: usize,
    values: Vec<Option<T>>,
}

impl<T> Slots<T> {
    fn new(base: usize, len: usize) -> Self {
        Self {
            base,
            values: std::iter::repeat_with(|| None).take(len).collect(),
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn push_pending(&mut self) {
        self.values.push(None);
    }

    /// Store the value of task `index`; false if the index is out of range
    fn fill(&mut self, index: usize, value: T) -> bool {
        match index
            .checked_sub(self.base)
            .and_then(|offset| self.values.get_mut(offset))
        {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    fn into_values(self) -> Vec<T> {
        self.values.into_iter().flatten().collect()
    }
}

/// Record one settled operation, turning failures into the run's error
fn accept<T, E>(
    settled: Settled<T, E>,
    slots: &mut Slots<T>,
    observer: &dyn ExecObserver,
) -> Result<(), E> {
    let Settled { index, outcome } = settled;
    match outcome {
        Outcome::Finished(Ok(value)) => {
            trace!("Task {} settled", index);
            observer.on_task_settled(index, true);
            if slots.fill(index, value) {
                Ok(())
            } else {
                Err(ExecError::Internal(format!(
                    "Result for task {index} has no slot"
                )))
            }
        }
        Outcome::Finished(Err(source)) => {
            debug!("Task {} failed", index);
            observer.on_task_settled(index, false);
            Err(ExecError::Task { index, source })
        }
        Outcome::Panicked => {
            debug!("Task {} panicked", index);
            observer.on_task_settled(index, false);
            Err(ExecError::Panicked { index })
        }
    }
}

/// One started chunk, waiting to be settled
struct Batch<T, E> {
    chunk: usize,
    slots: Slots<T>,
    rx: UnboundedReceiver<Settled<T, E>>,
}

impl<T, E> Batch<T, E>
where
    T: 'static,
    E: 'static,
{
    /// Invoke every factory of `group`, in input order
    fn start<F, Fut>(chunk: usize, group: Vec<(usize, F)>, observer: &dyn ExecObserver) -> Self
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>> + 'static,
    {
        let first_index = group.first().map_or(0, |(index, _)| *index);
        let len = group.len();
        debug!(
            "Starting chunk {}: tasks {}..{}",
            chunk,
            first_index,
            first_index + len
        );
        observer.on_chunk_start(chunk, first_index, len);

        let (tx, rx) = mpsc::unbounded();
        for (index, factory) in group {
            trace!("Starting task {}", index);
            observer.on_task_start(index);
            launch(index, factory, &tx);
        }

        Self {
            chunk,
            slots: Slots::new(first_index, len),
            rx,
        }
    }

    /// Wait for every operation of the chunk
    ///
    /// Returns as soon as one of them fails.
    async fn settle(mut self, observer: &dyn ExecObserver) -> Result<Vec<T>, E> {
        let len = self.slots.len();
        for _ in 0..len {
            // Every spawned operation holds a sender until it reports
            let Some(settled) = self.rx.next().await else {
                return Err(ExecError::Internal(format!(
                    "Chunk {} lost results before settling",
                    self.chunk
                )));
            };
            accept(settled, &mut self.slots, observer)?;
        }

        debug!("Chunk {} settled", self.chunk);
        observer.on_chunk_settled(self.chunk, len);
        Ok(self.slots.into_values())
    }
}
