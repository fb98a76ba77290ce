//! Shared helpers for executor integration tests
#![allow(dead_code)]

use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub struct TestTimeoutGuard {
    cancelled: Arc<AtomicBool>,
}

impl Drop for TestTimeoutGuard {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// Abort the test process if the guard is still alive after `duration`
pub fn test_timeout_guard(duration: Duration) -> TestTimeoutGuard {
    let cancelled = Arc::new(AtomicBool::new(false));
    let cancelled_clone = Arc::clone(&cancelled);
    std::thread::spawn(move || {
        std::thread::sleep(duration);
        if !cancelled_clone.load(Ordering::SeqCst) {
            eprintln!("Test timeout exceeded ({}s). Aborting.", duration.as_secs());
            std::process::abort();
        }
    });
    TestTimeoutGuard { cancelled }
}

/// Error returned by instrumented failing tasks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("task {0} failed on purpose")]
pub struct TaskFailed(pub usize);

/// Start/stop marker recorded by an instrumented task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Start(usize),
    Stop(usize),
}

#[derive(Default)]
struct ProbeState {
    active: usize,
    peak: usize,
    events: Vec<Event>,
}

/// Records when instrumented tasks start and stop
///
/// A task counts as active from the moment its factory is invoked until its
/// operation finishes.
#[derive(Clone, Default)]
pub struct ActivityProbe {
    state: Rc<RefCell<ProbeState>>,
}

pub type Factory<T> = Box<dyn FnOnce() -> LocalBoxFuture<'static, Result<T, TaskFailed>>>;

impl ActivityProbe {
    pub fn new() -> Self {
        Self::default()
    }

    fn start(&self, index: usize) {
        let mut state = self.state.borrow_mut();
        state.active += 1;
        state.peak = state.peak.max(state.active);
        state.events.push(Event::Start(index));
    }

    fn stop(&self, index: usize) {
        let mut state = self.state.borrow_mut();
        state.active -= 1;
        state.events.push(Event::Stop(index));
    }

    /// Task `index` resolving to `value` after `delay`
    pub fn task<T: 'static>(&self, index: usize, delay: Duration, value: T) -> Factory<T> {
        let probe = self.clone();
        Box::new(move || {
            probe.start(index);
            async move {
                compio::time::sleep(delay).await;
                probe.stop(index);
                Ok(value)
            }
            .boxed_local()
        })
    }

    /// Task `index` failing with [`TaskFailed`] after `delay`
    pub fn failing_task<T: 'static>(&self, index: usize, delay: Duration) -> Factory<T> {
        let probe = self.clone();
        Box::new(move || {
            probe.start(index);
            async move {
                compio::time::sleep(delay).await;
                probe.stop(index);
                Err(TaskFailed(index))
            }
            .boxed_local()
        })
    }

    /// Largest number of simultaneously active tasks seen
    pub fn peak(&self) -> usize {
        self.state.borrow().peak
    }

    /// Currently active tasks
    pub fn active(&self) -> usize {
        self.state.borrow().active
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn started(&self, index: usize) -> bool {
        self.events().contains(&Event::Start(index))
    }

    pub fn stopped(&self, index: usize) -> bool {
        self.events().contains(&Event::Stop(index))
    }

    /// Sizes of the runs of consecutive starts in the event log
    ///
    /// With the chunked strategy every run of starts is one chunk.
    pub fn start_waves(&self) -> Vec<usize> {
        let mut waves = Vec::new();
        let mut current = 0;
        for event in self.events() {
            match event {
                Event::Start(_) => current += 1,
                Event::Stop(_) if current > 0 => {
                    waves.push(current);
                    current = 0;
                }
                Event::Stop(_) => {}
            }
        }
        if current > 0 {
            waves.push(current);
        }
        waves
    }
}
