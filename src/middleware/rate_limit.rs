//! Rate limiting middleware
//!
//! Sliding-window request limiter, one per connection.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Simple rate limiter
pub struct RateLimiter {
    requests: VecDeque<Instant>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: VecDeque::new(),
            max_requests,
            window,
        }
    }

    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    pub fn is_allowed(&mut self) -> bool {
        self.is_allowed_at(Instant::now())
    }

    fn is_allowed_at(&mut self, now: Instant) -> bool {
        // Remove old requests
        while let Some(&oldest) = self.requests.front() {
            if now.duration_since(oldest) > self.window {
                self.requests.pop_front();
            } else {
                break;
            }
        }

        // Check if under limit
        if self.requests.len() < self.max_requests {
            self.requests.push_back(now);
            true
        } else {
            false
        }
    }

    /// Applies a new limit, e.g. after a runtime configuration change.
    pub fn set_max_requests(&mut self, max_requests: usize) {
        self.max_requests = max_requests;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_after_the_limit_within_the_window() {
        let mut limiter = RateLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.is_allowed_at(start));
        assert!(limiter.is_allowed_at(start));
        assert!(!limiter.is_allowed_at(start));
    }

    #[test]
    fn old_requests_leave_the_window() {
        let mut limiter = RateLimiter::new(1, Duration::from_secs(1));
        let start = Instant::now();

        assert!(limiter.is_allowed_at(start));
        assert!(limiter.is_allowed_at(start + Duration::from_secs(2)));
    }
}
