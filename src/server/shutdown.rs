// Shutdown module
// Waits for in-flight connections after the listener has closed

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// How often the active connection count is rechecked
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Wait until no connections remain or `grace` has elapsed.
///
/// Returns the number of connections still open when it gave up; those
/// keep running in their own tasks until the runtime shuts down.
pub async fn drain_connections(active: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let remaining = active.load(Ordering::SeqCst);
        if remaining == 0 {
            return 0;
        }

        tokio::select! {
            () = tokio::time::sleep(POLL_INTERVAL) => {}
            () = tokio::time::sleep_until(deadline) => {
                return active.load(Ordering::SeqCst);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_returns_immediately_when_idle() {
        let active = AtomicUsize::new(0);
        assert_eq!(drain_connections(&active, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn test_waits_for_connections_to_finish() {
        let active = Arc::new(AtomicUsize::new(2));
        let worker = Arc::clone(&active);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            worker.fetch_sub(2, Ordering::SeqCst);
        });

        assert_eq!(drain_connections(&active, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn test_gives_up_after_grace() {
        let active = AtomicUsize::new(1);
        assert_eq!(drain_connections(&active, Duration::from_millis(50)).await, 1);
    }
}
