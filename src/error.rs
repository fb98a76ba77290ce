//! Error handling and types

use thiserror::Error;

/// A concurrency limit that is not a positive integer
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid concurrency limit: must be at least 1, got {0}")]
pub struct InvalidLimit(pub usize);

/// Failures of a bounded run
///
/// `E` is the error type produced by the tasks themselves. The original task
/// error is kept as the [`source`](std::error::Error::source) of
/// [`ExecError::Task`].
#[derive(Error, Debug)]
pub enum ExecError<E> {
    /// The limit was rejected before any task was started
    #[error(transparent)]
    InvalidLimit(#[from] InvalidLimit),

    /// A task's operation failed
    #[error("Task {index} failed")]
    Task {
        /// Position of the failing task in the input list
        index: usize,
        /// The task's own error
        #[source]
        source: E,
    },

    /// A task panicked before producing a result
    #[error("Task {index} panicked before settling")]
    Panicked {
        /// Position of the panicking task in the input list
        index: usize,
    },

    /// Internal executor error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl<E> ExecError<E> {
    /// Input position of the task that caused this error, if any
    #[must_use]
    pub const fn task_index(&self) -> Option<usize> {
        match self {
            Self::Task { index, .. } | Self::Panicked { index } => Some(*index),
            Self::InvalidLimit(_) | Self::Internal(_) => None,
        }
    }

    /// Take back the task's own error, if this is a task failure
    pub fn into_task_error(self) -> Option<E> {
        match self {
            Self::Task { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T, E> = std::result::Result<T, ExecError<E>>;
