#![forbid(unsafe_code)]

//! Single-shot idle timer.
//!
//! The timer is a deadline owned by whoever needs it (one per search
//! session). Arming it replaces any pending deadline, so at most one is ever
//! pending. Expiry is observed by polling with the current time; nothing
//! runs in the background.
//!
//! Every method that depends on the clock takes `now` explicitly, which
//! keeps tests deterministic. The `*_now` variants read [`Instant::now`].

use std::time::Duration;
use web_time::Instant;

/// Default quiet period before a type-ahead session resets.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(200);

/// A cancellable single-shot deadline.
#[derive(Debug, Clone)]
pub struct IdleTimer {
    timeout: Duration,
    deadline: Option<Instant>,
}

impl Default for IdleTimer {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl IdleTimer {
    /// A disarmed timer with the given quiet period.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: None,
        }
    }

    /// The quiet period.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Change the quiet period. A pending deadline keeps its old expiry.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Cancel any pending deadline and schedule a new one `timeout` after `now`.
    pub fn reset(&mut self, now: Instant) {
        self.deadline = Some(now + self.timeout);
    }

    /// [`reset`](Self::reset) at the current time.
    pub fn reset_now(&mut self) {
        self.reset(Instant::now());
    }

    /// Cancel the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the pending deadline has passed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    /// Fire the timer if it expired: disarms it and returns `true` once.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.is_expired(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// [`poll`](Self::poll) at the current time.
    pub fn poll_now(&mut self) -> bool {
        self.poll(Instant::now())
    }
}
