//! Minimum-spacing rate limiter for outbound Riot API calls.

use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Spaces the *start* of scheduled tasks at least `min_spacing` apart.
///
/// Waiters are served in submission order (`tokio::sync::Mutex` is fair).
/// The task itself runs after the slot is claimed and outside the lock, so a
/// slow or failing call never holds up the next slot beyond the spacing.
pub struct RateLimiter {
    min_spacing: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            last_start: Mutex::new(None),
        }
    }

    pub fn min_spacing(&self) -> Duration {
        self.min_spacing
    }

    /// Wait for the next slot, then run `task` and return its output.
    pub async fn schedule<F, Fut, T>(&self, task: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.acquire_slot().await;
        task().await
    }

    async fn acquire_slot(&self) {
        let mut last_start = self.last_start.lock().await;

        if let Some(previous) = *last_start {
            let next = previous + self.min_spacing;
            if next > Instant::now() {
                trace!(wait_ms = (next - Instant::now()).as_millis() as u64, "Rate limiter waiting");
                sleep_until(next).await;
            }
        }

        *last_start = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_starts_are_spaced() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(100)));
        let starts = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let limiter = limiter.clone();
            let starts = starts.clone();
            handles.push(tokio::spawn(async move {
                limiter
                    .schedule(|| async move {
                        starts.lock().unwrap().push(Instant::now());
                        i
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut starts = starts.lock().unwrap().clone();
        starts.sort();
        assert_eq!(starts.len(), 8);
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(100));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_task_runs_immediately() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        let before = Instant::now();

        let value = limiter.schedule(|| async { 42 }).await;

        assert_eq!(value, 42);
        assert_eq!(Instant::now(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fifo_order() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(50)));
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..5 {
            let limiter = limiter.clone();
            let order = order.clone();
            handles.push(tokio::spawn(async move {
                limiter
                    .schedule(|| async move {
                        order.lock().unwrap().push(i);
                    })
                    .await
            }));
            // Let each task reach the lock before submitting the next one
            tokio::task::yield_now().await;
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_propagates_and_spacing_holds() {
        let limiter = RateLimiter::new(Duration::from_millis(100));

        let first: Result<(), String> = limiter
            .schedule(|| async { Err("upstream down".to_string()) })
            .await;
        assert_eq!(first, Err("upstream down".to_string()));

        let after_failure = Instant::now();
        let second: Result<u32, String> = limiter.schedule(|| async { Ok(7) }).await;

        assert_eq!(second, Ok(7));
        assert!(Instant::now() - after_failure >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_idle_period() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        limiter.schedule(|| async {}).await;

        tokio::time::advance(Duration::from_secs(1)).await;
        let before = Instant::now();
        limiter.schedule(|| async {}).await;

        assert_eq!(Instant::now(), before);
    }
}
