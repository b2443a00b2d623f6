// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window rate limiter with blocking semantics.
//!
//! Tracks the instants of the most recent admissions and suspends callers
//! until a new admission fits inside the window: at most `permit_count`
//! admissions inside any trailing `window` interval.
//!
//! Admission slots are reserved under a short-lived lock and the sleep
//! happens outside it, so concurrent callers overlap their waits instead of
//! queueing behind one sleeper. Reservation order is lock-acquisition order,
//! which keeps waits bounded by queue depth.

use crate::config::{ConfigError, RateLimitConfig};
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Error returned when an admission wait is interrupted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AcquireError {
    /// The limiter was closed while this caller was waiting (or before it
    /// called), so no admission will ever be granted to it.
    #[error("rate limiter closed while waiting for admission")]
    Closed,
}

/// Sliding-window rate limiter.
///
/// The admission log is bounded: only the most recent `permit_count`
/// instants are kept, so memory stays O(permit_count) regardless of how
/// many admissions have ever been granted.
pub struct RateLimiter {
    window: Duration,
    permits: usize,
    admissions: Mutex<VecDeque<Instant>>,
    closed: watch::Sender<bool>,
}

impl RateLimiter {
    /// Create a new limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let permits = config.permit_count as usize;
        Ok(Self {
            window: config.window_duration(),
            permits,
            admissions: Mutex::new(VecDeque::with_capacity(permits)),
            closed: watch::channel(false).0,
        })
    }

    /// Suspend the calling task until an admission is granted, then record
    /// it.
    ///
    /// Never admits more than `permit_count` callers whose recorded instants
    /// fall inside any trailing `window` interval. The first `permit_count`
    /// calls on a fresh limiter return immediately.
    ///
    /// Returns [`AcquireError::Closed`] if [`close`](Self::close) is called
    /// before or during the wait. The reserved admission slot stays recorded
    /// in that case, as it does when the returned future is dropped
    /// mid-wait.
    pub async fn acquire(&self) -> Result<(), AcquireError> {
        let mut closed = self.closed.subscribe();
        if *closed.borrow() {
            return Err(AcquireError::Closed);
        }

        let slot = self.reserve_slot().await;
        let wait = slot.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "window full, admission delayed");
            tokio::select! {
                _ = tokio::time::sleep_until(slot) => {}
                _ = closed.changed() => {
                    warn!("admission wait interrupted by close");
                    return Err(AcquireError::Closed);
                }
            }
        }
        Ok(())
    }

    /// Reserve the earliest admissible instant and record it.
    ///
    /// The lock is held only for this bookkeeping step, never across the
    /// sleep. With the log full, the front entry is exactly `permit_count`
    /// admissions back, so `front + window` is the earliest instant at which
    /// one more admission still leaves every trailing window within bounds.
    /// Clamped to `now` so a stale front entry can never produce a slot in
    /// the past.
    async fn reserve_slot(&self) -> Instant {
        let mut log = self.admissions.lock().await;
        let now = Instant::now();
        let slot = match log.front() {
            Some(&oldest) if log.len() >= self.permits => (oldest + self.window).max(now),
            _ => now,
        };
        if log.len() >= self.permits {
            log.pop_front();
        }
        log.push_back(slot);
        slot
    }

    /// Interrupt every waiting [`acquire`](Self::acquire) and make all
    /// future calls fail fast with [`AcquireError::Closed`].
    pub fn close(&self) {
        self.closed.send_replace(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio_test::assert_ok;

    fn limiter(permit_count: u32, window_ms: u64) -> RateLimiter {
        assert_ok!(RateLimiter::new(RateLimitConfig {
            permit_count,
            window_ms,
        }))
    }

    #[test]
    fn rejects_zero_permit_count() {
        let result = RateLimiter::new(RateLimitConfig {
            permit_count: 0,
            window_ms: 1000,
        });
        assert!(matches!(result, Err(ConfigError::ZeroPermitCount)));
    }

    #[test]
    fn rejects_zero_window() {
        let result = RateLimiter::new(RateLimitConfig {
            permit_count: 3,
            window_ms: 0,
        });
        assert!(matches!(result, Err(ConfigError::ZeroWindow)));
    }

    #[tokio::test(start_paused = true)]
    async fn first_permits_admit_immediately() {
        let limiter = limiter(3, 60_000);
        let start = Instant::now();

        for _ in 0..3 {
            assert_ok!(limiter.acquire().await);
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn sequential_admissions_respect_minimum_interval() {
        // permit_count = 1 degenerates to a pure minimum-interval limiter.
        let limiter = limiter(1, 100);
        let start = std::time::Instant::now();

        assert_ok!(limiter.acquire().await);
        assert_ok!(limiter.acquire().await);

        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn window_bound_holds_over_many_admissions() {
        let limiter = limiter(3, 200);
        let window = Duration::from_millis(200);

        let mut admitted = Vec::new();
        for _ in 0..10 {
            assert_ok!(limiter.acquire().await);
            admitted.push(Instant::now());
        }

        // No 4 admissions may fit inside one trailing window.
        for run in admitted.windows(4) {
            assert!(run[3] - run[0] >= window, "admissions {:?} violate the window", run);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_overlap_waits() {
        let limiter = Arc::new(limiter(3, 1000));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..5 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await.map(|()| start.elapsed())
            }));
        }

        let mut elapsed = Vec::new();
        for handle in handles {
            elapsed.push(assert_ok!(handle.await.unwrap()));
        }
        elapsed.sort();

        // 3 admitted at ~t=0, the remaining 2 together at ~t=1s.
        assert!(elapsed[2] < Duration::from_millis(50));
        assert!(elapsed[3] >= Duration::from_millis(1000));
        assert!(elapsed[4] < Duration::from_millis(1100));
    }

    #[tokio::test]
    async fn close_rejects_new_acquires() {
        let limiter = limiter(1, 1000);
        limiter.close();

        assert_eq!(limiter.acquire().await, Err(AcquireError::Closed));
    }

    #[tokio::test(start_paused = true)]
    async fn close_wakes_waiting_acquires() {
        let limiter = Arc::new(limiter(1, 60_000));
        assert_ok!(limiter.acquire().await);

        let waiter = {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move { limiter.acquire().await })
        };
        // Let the waiter park on its sleep before closing.
        tokio::task::yield_now().await;
        limiter.close();

        assert_eq!(waiter.await.unwrap(), Err(AcquireError::Closed));
    }
}
