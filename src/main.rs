//! boundrun: fetch simulated files with a bounded number in flight
//!
//! Demonstrates the bounded executor on a simulated object store: every fetch
//! takes the same fixed delay, so the chunk boundaries are visible in the
//! total run time and in the `-vv` log output.

use anyhow::{Context, Result};
use boundrun::cli::Args;
use boundrun::demo::{fetch_tasks, file_keys};
use boundrun::{BoundedExecutor, ExecObserver, NoopObserver, ProgressObserver};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, Level};

#[compio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging based on verbosity and quiet mode
    if args.quiet {
        // In quiet mode, only log errors
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::ERROR)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(match args.verbose {
                0 => Level::WARN,
                1 => Level::INFO,
                2 => Level::DEBUG,
                _ => Level::TRACE,
            })
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;
    }

    // Validate arguments
    args.validate().context("Invalid arguments")?;

    info!("Starting boundrun v{}", env!("CARGO_PKG_VERSION"));
    info!("Files: {}", args.files);
    info!("Limit: {}", args.limit);
    info!("Strategy: {}", args.strategy);
    info!("Delay: {:?}", args.delay());

    let observer: Arc<dyn ExecObserver> = if args.show_progress() {
        Arc::new(ProgressObserver::new(args.files))
    } else {
        Arc::new(NoopObserver)
    };
    let executor = BoundedExecutor::with_limit(args.effective_limit()?)
        .with_strategy(args.strategy)
        .with_observer(observer);

    let tasks = fetch_tasks(file_keys(args.files), args.delay(), args.fail_at);
    let (files, stats) = executor
        .run_with_stats(tasks.into_iter().map(|task| move || task.fetch()))
        .await
        .context("Fetch run failed")?;

    if !args.quiet {
        for file in &files {
            println!("{}\t{} bytes", file.key, file.size);
        }
    }

    info!("Fetch completed successfully");
    info!("Files fetched: {}", stats.tasks);
    info!("Chunks: {}", stats.chunks);
    info!("Peak in flight: {}", stats.peak_in_flight);
    info!("Duration: {:?}", stats.elapsed);

    Ok(())
}
