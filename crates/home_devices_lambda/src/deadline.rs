//! Bounds an invocation by the deadline the Lambda runtime hands in.
//!
//! The bound is exactly the invocation deadline, with no margin subtracted.
//! Store calls otherwise keep the client's own timeouts.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Invocation deadline carried by the Lambda context, in epoch milliseconds
pub fn deadline_from_millis(deadline_ms: u64) -> Option<SystemTime> {
    if deadline_ms == 0 {
        return None;
    }
    Some(UNIX_EPOCH + Duration::from_millis(deadline_ms))
}

/// Run `future` until it completes or `deadline` passes.
///
/// Returns `None` when the deadline was hit first. With no deadline the future
/// runs to completion.
pub async fn run_until_deadline<F>(deadline: Option<SystemTime>, future: F) -> Option<F::Output>
where
    F: Future,
{
    let Some(deadline) = deadline else {
        return Some(future.await);
    };

    tokio::time::timeout(time_remaining(deadline, SystemTime::now()), future)
        .await
        .ok()
}

fn time_remaining(deadline: SystemTime, now: SystemTime) -> Duration {
    deadline.duration_since(now).unwrap_or(Duration::ZERO)
}
