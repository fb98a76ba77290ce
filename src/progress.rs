//! Progress tracking and reporting

use crate::executor::RunStats;
use crate::observer::ExecObserver;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar that advances as tasks settle
pub struct ProgressObserver {
    progress_bar: ProgressBar,
}

impl ProgressObserver {
    /// Visible bar for `total` tasks
    #[must_use]
    pub fn new(total: usize) -> Self {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );

        Self { progress_bar: pb }
    }

    /// Bar that never draws (quiet mode, tests)
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            progress_bar: ProgressBar::hidden(),
        }
    }

    /// Number of settled tasks so far
    #[must_use]
    pub fn position(&self) -> u64 {
        self.progress_bar.position()
    }
}

impl ExecObserver for ProgressObserver {
    fn on_chunk_start(&self, chunk: usize, first_index: usize, len: usize) {
        self.progress_bar.set_message(format!(
            "chunk {} (tasks {}..{})",
            chunk + 1,
            first_index,
            first_index + len
        ));
    }

    fn on_task_settled(&self, _index: usize, succeeded: bool) {
        if succeeded {
            self.progress_bar.inc(1);
        }
    }

    fn on_run_finished(&self, stats: &RunStats) {
        self.progress_bar
            .finish_with_message(format!("{} tasks completed", stats.tasks));
    }

    fn on_run_failed(&self, index: Option<usize>) {
        let message = index.map_or_else(
            || "run failed".to_string(),
            |index| format!("task {index} failed"),
        );
        self.progress_bar.abandon_with_message(message);
    }
}
