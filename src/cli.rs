//! Command-line interface definitions

use crate::config::{Limit, Strategy};
use anyhow::Result;
use clap::Parser;
use std::time::Duration;

/// Largest accepted concurrency limit
pub const MAX_LIMIT: usize = 10_000;

/// Largest accepted number of simulated files
pub const MAX_FILES: usize = 100_000;

/// Largest accepted per-fetch delay in milliseconds
pub const MAX_DELAY_MS: u64 = 60_000;

/// Fetch many simulated files with a bounded number in flight
#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
pub struct Args {
    /// Maximum number of fetches in flight at once
    #[arg(short, long, default_value = "3")]
    pub limit: usize,

    /// Number of files to fetch
    #[arg(short, long, default_value = "8")]
    pub files: usize,

    /// Simulated latency of every fetch, in milliseconds
    #[arg(long, default_value = "1000")]
    pub delay_ms: u64,

    /// How fetches are admitted under the limit
    #[arg(long, value_enum, default_value_t = Strategy::Chunked)]
    pub strategy: Strategy,

    /// Make the fetch at this (zero-based) position fail
    #[arg(long, value_name = "INDEX")]
    pub fail_at: Option<usize>,

    /// Show progress information
    #[arg(long)]
    pub progress: bool,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except errors)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Validate command-line arguments
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The limit is outside valid bounds (1-10000)
    /// - The file count is too large (>100000)
    /// - The delay is too large (>60s)
    /// - `--fail-at` points past the last file
    /// - Both --quiet and --verbose options are used
    pub fn validate(&self) -> Result<()> {
        if self.limit < 1 || self.limit > MAX_LIMIT {
            anyhow::bail!(
                "Limit must be between 1 and {MAX_LIMIT}, got: {}",
                self.limit
            );
        }

        if self.files > MAX_FILES {
            anyhow::bail!("Too many files (max {MAX_FILES}): {}", self.files);
        }

        if self.delay_ms > MAX_DELAY_MS {
            anyhow::bail!(
                "Delay too large (max {MAX_DELAY_MS} ms): {} ms",
                self.delay_ms
            );
        }

        if let Some(index) = self.fail_at {
            if index >= self.files {
                anyhow::bail!(
                    "--fail-at {index} is out of range for {} files",
                    self.files
                );
            }
        }

        // Validate conflicting options
        if self.quiet && self.verbose > 0 {
            anyhow::bail!("Cannot use both --quiet and --verbose options");
        }

        Ok(())
    }

    /// The validated concurrency limit
    ///
    /// # Errors
    ///
    /// Returns an error if the limit is 0.
    pub fn effective_limit(&self) -> Result<Limit> {
        Ok(Limit::new(self.limit)?)
    }

    /// Per-fetch delay
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Whether a progress bar should be drawn
    #[must_use]
    pub const fn show_progress(&self) -> bool {
        self.progress && !self.quiet
    }
}

impl Args {
    /// Create a test Args instance with default values (for testing)
    #[cfg(test)]
    pub fn test_default() -> Self {
        Self {
            limit: 3,
            files: 8,
            delay_ms: 1000,
            strategy: Strategy::Chunked,
            fail_at: None,
            progress: false,
            verbose: 0,
            quiet: false,
        }
    }
}
