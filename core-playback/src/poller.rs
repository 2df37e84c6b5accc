//! Progress polling task.
//!
//! Audio engines in scope expose position only through a status query, so
//! while a session is playing the controller runs one of these loops. The
//! loop owns no session state: each tick calls back into the controller,
//! which decides whether to keep going.

use core_async::sync::CancellationToken;
use core_async::time::{interval, MissedTickBehavior};
use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tracing::trace;

/// Handle to a running poll loop. Cancelling is idempotent.
#[derive(Debug)]
pub(crate) struct PollerHandle {
    seq: u64,
    token: CancellationToken,
}

impl PollerHandle {
    /// Identifier distinguishing this loop from earlier ones.
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Spawn a loop calling `on_tick` every `period`, first after one period.
///
/// The loop ends when `on_tick` returns `ControlFlow::Break` or the handle is
/// cancelled or dropped. A tick already in flight when the handle is
/// cancelled still completes; `on_tick` must check `seq` against the
/// session's current poller.
pub(crate) fn spawn_poller<F, Fut>(seq: u64, period: Duration, mut on_tick: F) -> PollerHandle
where
    F: FnMut(u64) -> Fut + Send + 'static,
    Fut: Future<Output = ControlFlow<()>> + Send + 'static,
{
    let token = CancellationToken::new();
    let loop_token = token.clone();

    core_async::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            core_async::select! {
                _ = loop_token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if on_tick(seq).await.is_break() {
                break;
            }
        }
        trace!(seq, "Poller exited");
    });

    PollerHandle { seq, token }
}
