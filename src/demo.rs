//! Simulated file fetches for the demo binary
//!
//! Each fetch resolves to a [`FileProps`] after a fixed delay, standing in
//! for a remote object store. A fetch can be told to fail so the failure path
//! of the executor can be exercised from the command line.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Size reported for every simulated file
pub const SIMULATED_SIZE: u64 = 123;

/// A fetched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProps {
    /// Object key
    pub key: String,
    /// File contents (placeholder)
    pub body: String,
    /// Size in bytes
    pub size: u64,
}

/// Simulated fetch failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The object store refused the request
    #[error("File unavailable: {key}")]
    Unavailable {
        /// Key that could not be fetched
        key: String,
    },
}

/// A deferred fetch of one file
#[derive(Debug, Clone)]
pub struct FetchTask {
    key: String,
    delay: Duration,
    fail: bool,
}

impl FetchTask {
    /// Fetch `key` after `delay`
    #[must_use]
    pub fn new(key: String, delay: Duration) -> Self {
        Self {
            key,
            delay,
            fail: false,
        }
    }

    /// Make this fetch fail instead of returning the file
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Key this task fetches
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Start the fetch
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Unavailable`] if the task was built with
    /// [`failing`](Self::failing).
    pub fn fetch(self) -> impl Future<Output = Result<FileProps, FetchError>> + 'static {
        async move {
            compio::time::sleep(self.delay).await;
            if self.fail {
                return Err(FetchError::Unavailable { key: self.key });
            }
            Ok(FileProps {
                key: self.key,
                body: "...".to_string(),
                size: SIMULATED_SIZE,
            })
        }
    }
}

/// Keys `file1.png` .. `file{count}.png`
#[must_use]
pub fn file_keys(count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("file{n}.png")).collect()
}

/// Build one fetch task per key, failing the one at `fail_at` if given
#[must_use]
pub fn fetch_tasks(keys: Vec<String>, delay: Duration, fail_at: Option<usize>) -> Vec<FetchTask> {
    keys.into_iter()
        .enumerate()
        .map(|(index, key)| {
            let task = FetchTask::new(key, delay);
            if fail_at == Some(index) {
                task.failing()
            } else {
                task
            }
        })
        .collect()
}
