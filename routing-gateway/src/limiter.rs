//! Request pacing for provider APIs.
//!
//! Every provider client owns one [`RateLimiter`] and acquires a permit
//! before each HTTP request, so concurrent fan-outs (matrix assembly in
//! particular) never exceed the provider's allowed request rate.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{self, Instant};

/// An async limiter enforcing a sustained request rate.
///
/// Permits become free at fixed intervals of `1 / rps` seconds. Each caller
/// claims the next free slot and sleeps until it arrives, so `k`
/// acquisitions never complete in less than `(k - 1) / rps` seconds of wall
/// clock, regardless of how many tasks acquire concurrently.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl RateLimiter {
    /// Create a limiter allowing `rps` requests per second.
    ///
    /// # Panics
    ///
    /// Panics if `rps` is not strictly positive.
    pub fn new(rps: f64) -> Self {
        assert!(rps > 0.0, "requests per second must be positive");
        Self {
            interval: Duration::from_secs_f64(1.0 / rps),
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Wait until the next request slot is free.
    ///
    /// The lock is held only to claim a slot; the wait itself happens
    /// outside it, so waiting tasks do not serialize each other beyond the
    /// configured rate.
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = (*next).max(now);
            *next = slot + self.interval;
            slot
        };
        time::sleep_until(slot).await;
    }
}
