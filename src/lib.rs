//! boundrun: bounded concurrent execution of async tasks
//!
//! This library runs a large list of deferred asynchronous tasks with at most
//! `limit` of them in flight at any instant, and returns their results in the
//! original task order. Chunking of the task list is done with the lazy
//! combinators of the `lazy-seq` crate; execution happens on the `compio`
//! runtime with cooperative scheduling only.
//!
//! # Example
//!
//! ```rust,no_run
//! #[compio::main]
//! async fn main() -> Result<(), boundrun::ExecError<std::io::Error>> {
//!     let tasks = (1..=8).map(|n| {
//!         move || async move { Ok::<_, std::io::Error>(format!("file{n}.png")) }
//!     });
//!
//!     // At most 3 fetches at a time, results in input order
//!     let files = boundrun::concurrent_limited(3, tasks).await?;
//!     assert_eq!(files.len(), 8);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod demo;
pub mod error;
pub mod executor;
pub mod observer;
pub mod progress;

// Re-export commonly used types
pub use config::{Limit, Strategy};
pub use error::{ExecError, InvalidLimit, Result};
pub use executor::{concurrent_limited, concurrent_windowed, BoundedExecutor, RunStats};
pub use observer::{ExecObserver, NoopObserver};
pub use progress::ProgressObserver;
