//! Integration tests for the runtime abstraction layer.

use core_async::{sync, task, time, CancellationToken};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    assert_eq!(handle.await.unwrap(), 42);
}

#[tokio::test(start_paused = true)]
async fn test_instant_follows_paused_clock() {
    let start = time::Instant::now();
    time::sleep(time::Duration::from_secs(3)).await;
    assert_eq!(start.elapsed(), time::Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_failure() {
    let result = time::timeout(time::Duration::from_millis(10), async {
        time::sleep(time::Duration::from_millis(100)).await;
        42
    })
    .await;

    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_stops_interval_loop() {
    let token = CancellationToken::new();
    let ticks = Arc::new(AtomicU32::new(0));

    let loop_token = token.clone();
    let loop_ticks = Arc::clone(&ticks);
    let handle = task::spawn(async move {
        let mut ticker = time::interval(time::Duration::from_secs(1));
        loop {
            core_async::select! {
                _ = loop_token.cancelled() => break,
                _ = ticker.tick() => {
                    loop_ticks.fetch_add(1, Ordering::SeqCst);
                }
            }
        }
    });

    time::sleep(time::Duration::from_millis(2500)).await;
    token.cancel();
    handle.await.unwrap();

    let observed = ticks.load(Ordering::SeqCst);
    assert_eq!(observed, 3);

    time::sleep(time::Duration::from_secs(5)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), observed);
}

#[tokio::test]
async fn test_watch_channel_latest_value() {
    let (tx, mut rx) = sync::watch::channel(0u32);
    tx.send_replace(5);
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), 5);
}

#[test]
fn test_block_on_outside_runtime() {
    assert!(!core_async::runtime::in_runtime());
    let value = core_async::runtime::block_on(async { 9 });
    assert_eq!(value, 9);
}
