//! Executor configuration: concurrency limit and scheduling strategy

use crate::error::InvalidLimit;
use std::fmt;
use std::num::NonZeroUsize;

/// Maximum number of task operations allowed in flight at once
///
/// Always at least 1. A limit of 1 runs tasks strictly one after another; a
/// limit at or above the task count runs everything in a single chunk.
///
/// # Example
///
/// ```rust
/// use boundrun::Limit;
///
/// let limit = Limit::new(3).unwrap();
/// assert_eq!(limit.get(), 3);
///
/// assert!(Limit::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Limit(NonZeroUsize);

impl Limit {
    /// One task at a time
    pub const SEQUENTIAL: Self = Self(NonZeroUsize::MIN);

    /// Validate a raw limit
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLimit`] if `limit` is 0.
    pub const fn new(limit: usize) -> Result<Self, InvalidLimit> {
        match NonZeroUsize::new(limit) {
            Some(limit) => Ok(Self(limit)),
            None => Err(InvalidLimit(limit)),
        }
    }

    /// The limit as a plain integer
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for Limit {
    type Error = InvalidLimit;

    fn try_from(limit: usize) -> Result<Self, InvalidLimit> {
        Self::new(limit)
    }
}

impl From<NonZeroUsize> for Limit {
    fn from(limit: NonZeroUsize) -> Self {
        Self(limit)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How tasks are admitted under the limit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Start `limit` tasks together and wait for all of them before the next group
    #[default]
    Chunked,
    /// Keep up to `limit` tasks running, starting the next one as soon as any settles
    Windowed,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chunked => f.write_str("chunked"),
            Self::Windowed => f.write_str("windowed"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_limit_rejects_zero() {
        assert_eq!(Limit::new(0), Err(InvalidLimit(0)));
        assert_eq!(Limit::try_from(0), Err(InvalidLimit(0)));
    }

    #[test]
    fn test_limit_accepts_positive() {
        let limit = Limit::new(8).unwrap();
        assert_eq!(limit.get(), 8);
        assert_eq!(limit.to_string(), "8");
        assert_eq!(Limit::SEQUENTIAL.get(), 1);
    }

    #[test]
    fn test_strategy_default_is_chunked() {
        assert_eq!(Strategy::default(), Strategy::Chunked);
        assert_eq!(Strategy::Windowed.to_string(), "windowed");
    }
}
