//! Integration tests for the bounded executor
#![allow(clippy::unwrap_used)]

mod common;

use boundrun::{
    concurrent_limited, concurrent_windowed, BoundedExecutor, ExecError, InvalidLimit, Strategy,
};
use common::{test_timeout_guard, ActivityProbe, Event, Factory, TaskFailed};
use rstest::rstest;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(20);

fn labelled_tasks(probe: &ActivityProbe, count: usize, delay: Duration) -> Vec<Factory<String>> {
    (0..count)
        .map(|i| probe.task(i, delay, format!("file{}.png", i + 1)))
        .collect()
}

#[compio::test]
async fn test_eight_files_limit_three() {
    let _guard = test_timeout_guard(Duration::from_secs(10));
    let probe = ActivityProbe::new();
    let executor = BoundedExecutor::new(3).unwrap();

    let (files, stats) = executor
        .run_with_stats(labelled_tasks(&probe, 8, TICK))
        .await
        .unwrap();

    let expected: Vec<String> = (1..=8).map(|n| format!("file{n}.png")).collect();
    assert_eq!(files, expected);
    assert_eq!(probe.peak(), 3);
    assert_eq!(probe.start_waves(), vec![3, 3, 2]);
    assert_eq!(stats.chunks, 3);
    assert_eq!(stats.peak_in_flight, 3);
    assert_eq!(probe.active(), 0);
}

#[compio::test]
async fn test_order_preserved_when_later_tasks_finish_first() {
    let _guard = test_timeout_guard(Duration::from_secs(10));
    let probe = ActivityProbe::new();

    // Earlier tasks take longer than later ones
    let tasks: Vec<Factory<usize>> = (0..6)
        .map(|i| probe.task(i, Duration::from_millis(5 * (6 - i as u64)), i * 100))
        .collect();

    let values = concurrent_limited(4, tasks).await.unwrap();

    assert_eq!(values, vec![0, 100, 200, 300, 400, 500]);
}

#[rstest]
#[compio::test]
async fn test_result_length_and_bound_across_limits(
    #[values(0, 1, 5, 9)] count: usize,
    #[values(1, 2, 3, 4, 5)] limit: usize,
) {
    let _guard = test_timeout_guard(Duration::from_secs(10));
    let probe = ActivityProbe::new();
    let tasks: Vec<Factory<usize>> = (0..count)
        .map(|i| probe.task(i, Duration::from_millis(2), i))
        .collect();

    let values = concurrent_limited(limit, tasks).await.unwrap();

    assert_eq!(values, (0..count).collect::<Vec<_>>());
    assert!(
        probe.peak() <= limit,
        "peak {} exceeded limit {limit}",
        probe.peak()
    );
    assert_eq!(probe.start_waves().len(), count.div_ceil(limit));
}

#[compio::test]
async fn test_empty_task_list() {
    let tasks: Vec<Factory<u32>> = Vec::new();

    let values = concurrent_limited(3, tasks).await.unwrap();

    assert!(values.is_empty());
}

#[compio::test]
async fn test_zero_limit_rejected_before_any_task() {
    let probe = ActivityProbe::new();

    let err = concurrent_limited(0, labelled_tasks(&probe, 3, TICK))
        .await
        .unwrap_err();

    assert!(matches!(err, ExecError::InvalidLimit(InvalidLimit(0))));
    assert!(probe.events().is_empty());
}

#[compio::test]
async fn test_limit_one_is_sequential() {
    let _guard = test_timeout_guard(Duration::from_secs(10));
    let probe = ActivityProbe::new();

    let values = concurrent_limited(1, labelled_tasks(&probe, 4, Duration::from_millis(5)))
        .await
        .unwrap();

    assert_eq!(values.len(), 4);
    assert_eq!(probe.peak(), 1);
    let expected: Vec<Event> = (0..4)
        .flat_map(|i| [Event::Start(i), Event::Stop(i)])
        .collect();
    assert_eq!(probe.events(), expected);
}

#[compio::test]
async fn test_limit_above_count_runs_one_chunk() {
    let _guard = test_timeout_guard(Duration::from_secs(10));
    let probe = ActivityProbe::new();
    let executor = BoundedExecutor::new(50).unwrap();

    let (values, stats) = executor
        .run_with_stats(labelled_tasks(&probe, 6, TICK))
        .await
        .unwrap();

    assert_eq!(values.len(), 6);
    assert_eq!(probe.start_waves(), vec![6]);
    assert_eq!(probe.peak(), 6);
    assert_eq!(stats.chunks, 1);
}

#[compio::test]
async fn test_failure_stops_later_chunks_and_keeps_siblings_running() {
    let _guard = test_timeout_guard(Duration::from_secs(10));
    let probe = ActivityProbe::new();

    let tasks: Vec<Factory<&str>> = vec![
        probe.failing_task(0, Duration::from_millis(5)),
        probe.task(1, Duration::from_millis(40), "slow sibling"),
        probe.task(2, Duration::from_millis(5), "next chunk"),
    ];

    let err = concurrent_limited(2, tasks).await.unwrap_err();

    assert_eq!(err.task_index(), Some(0));
    assert_eq!(err.into_task_error(), Some(TaskFailed(0)));

    // The failure came back before the sibling finished
    assert!(probe.started(1));
    assert!(!probe.stopped(1));
    assert!(!probe.started(2));

    // The sibling was not cancelled and runs to completion on its own
    compio::time::sleep(Duration::from_millis(100)).await;
    assert!(probe.stopped(1));
    assert!(!probe.started(2));
}

#[compio::test]
async fn test_concurrent_failures_report_one_of_them() {
    let _guard = test_timeout_guard(Duration::from_secs(10));
    let probe = ActivityProbe::new();

    let tasks: Vec<Factory<u8>> = vec![
        probe.failing_task(0, Duration::from_millis(5)),
        probe.failing_task(1, Duration::from_millis(5)),
        probe.task(2, Duration::from_millis(5), 2),
    ];

    let err = concurrent_limited(3, tasks).await.unwrap_err();

    let index = err.task_index().unwrap();
    assert!(index == 0 || index == 1);
    assert!(err.to_string().starts_with("Task "));
}

#[compio::test]
async fn test_failure_in_later_chunk_discards_earlier_results() {
    let _guard = test_timeout_guard(Duration::from_secs(10));
    let probe = ActivityProbe::new();

    let mut tasks = labelled_tasks(&probe, 4, Duration::from_millis(5));
    tasks.push(probe.failing_task(4, Duration::from_millis(5)));

    let result = concurrent_limited(2, tasks).await;

    assert!(matches!(result, Err(ExecError::Task { index: 4, .. })));
}

#[compio::test]
async fn test_windowed_starts_next_task_as_soon_as_one_settles() {
    let _guard = test_timeout_guard(Duration::from_secs(10));
    let probe = ActivityProbe::new();

    let tasks: Vec<Factory<usize>> = vec![
        probe.task(0, Duration::from_millis(10), 0),
        probe.task(1, Duration::from_millis(60), 1),
        probe.task(2, Duration::from_millis(10), 2),
    ];

    let values = concurrent_windowed(2, tasks).await.unwrap();

    assert_eq!(values, vec![0, 1, 2]);
    assert_eq!(probe.peak(), 2);
    assert_eq!(
        probe.events(),
        vec![
            Event::Start(0),
            Event::Start(1),
            Event::Stop(0),
            Event::Start(2),
            Event::Stop(2),
            Event::Stop(1),
        ]
    );
}

#[compio::test]
async fn test_windowed_respects_limit_and_order() {
    let _guard = test_timeout_guard(Duration::from_secs(10));
    let probe = ActivityProbe::new();
    let executor = BoundedExecutor::new(3)
        .unwrap()
        .with_strategy(Strategy::Windowed);

    let tasks: Vec<Factory<usize>> = (0..10)
        .map(|i| probe.task(i, Duration::from_millis(1 + (i as u64 * 7) % 13), i))
        .collect();

    let (values, stats) = executor.run_with_stats(tasks).await.unwrap();

    assert_eq!(values, (0..10).collect::<Vec<_>>());
    assert_eq!(probe.peak(), 3);
    assert_eq!(stats.peak_in_flight, 3);
    assert_eq!(stats.chunks, 0);
}

#[compio::test]
async fn test_windowed_failure_stops_admission() {
    let _guard = test_timeout_guard(Duration::from_secs(10));
    let probe = ActivityProbe::new();

    let tasks: Vec<Factory<usize>> = vec![
        probe.failing_task(0, Duration::from_millis(5)),
        probe.task(1, Duration::from_millis(30), 1),
        probe.task(2, Duration::from_millis(5), 2),
    ];

    let err = concurrent_windowed(2, tasks).await.unwrap_err();

    assert_eq!(err.task_index(), Some(0));
    assert!(!probe.started(2));
}
