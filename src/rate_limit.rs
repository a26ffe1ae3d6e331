//! Per-identity sliding-window rate limiter
//!
//! An explicitly-owned component: constructed once at process start, carried
//! in `ServerState`, and injected into the middleware rather than living in
//! module-level state. The clock is a trait so tests can drive time manually.
//!
//! Unauthenticated requests bypass the limiter entirely (fail-open). That
//! mirrors the platform's existing behavior and is intentionally preserved
//! rather than silently fixed.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

/// Millisecond clock
pub trait Clock: Send + Sync + 'static {
    fn now_millis(&self) -> i64;
}

impl std::fmt::Debug for dyn Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Clock")
    }
}

/// Wall-clock implementation used in production
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Sliding-window limiter keyed by account id
///
/// Each key holds the timestamps of its recent hits. On every check the
/// window is trimmed first; a rejected request records nothing. Entries for
/// idle identities are only trimmed lazily on their next request, so the map
/// grows with the number of distinct identities seen.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window_ms: i64,
    hits: DashMap<String, Vec<i64>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window_ms: i64) -> Self {
        Self::with_clock(max_requests, window_ms, Arc::new(SystemClock))
    }

    pub fn with_clock(max_requests: usize, window_ms: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_requests,
            window_ms,
            hits: DashMap::new(),
            clock,
        }
    }

    /// Record a hit for `key`, or reject with 429 when the window is full.
    ///
    /// The trim-then-append sequence runs under the entry lock, so it stays a
    /// critical section on a multi-threaded runtime.
    pub fn check(&self, key: &str) -> AppResult<()> {
        let now = self.clock.now_millis();
        let mut entry = self.hits.entry(key.to_string()).or_default();
        entry.retain(|&t| t > now - self.window_ms);
        if entry.len() >= self.max_requests {
            tracing::warn!(key = %key, "Rate limit exceeded");
            return Err(crate::utils::AppError::rate_limited());
        }
        entry.push(now);
        Ok(())
    }

    /// Number of live hits for `key` (test/introspection helper)
    pub fn current_count(&self, key: &str) -> usize {
        let now = self.clock.now_millis();
        self.hits
            .get(key)
            .map(|v| v.iter().filter(|&&t| t > now - self.window_ms).count())
            .unwrap_or(0)
    }
}

/// 限流中间件
///
/// 按已认证账户限流；扩展中没有 [`CurrentUser`] 的请求直接放行。
pub async fn rate_limit(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, crate::utils::AppError> {
    if let Some(user) = req.extensions().get::<CurrentUser>() {
        state.rate_limiter.check(&user.id)?;
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Manually advanced clock
    struct ManualClock(AtomicI64);

    impl ManualClock {
        fn new(start: i64) -> Arc<Self> {
            Arc::new(Self(AtomicI64::new(start)))
        }

        fn advance(&self, ms: i64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_allows_up_to_max_then_rejects() {
        let clock = ManualClock::new(1_000_000);
        let limiter = RateLimiter::with_clock(3, 1000, clock.clone());

        for _ in 0..3 {
            assert!(limiter.check("u1").is_ok());
        }
        assert!(limiter.check("u1").is_err());
    }

    #[test]
    fn test_rejected_request_records_nothing() {
        let clock = ManualClock::new(1_000_000);
        let limiter = RateLimiter::with_clock(2, 1000, clock.clone());

        assert!(limiter.check("u1").is_ok());
        assert!(limiter.check("u1").is_ok());
        assert!(limiter.check("u1").is_err());
        // Rejection must not extend the window
        assert_eq!(limiter.current_count("u1"), 2);
    }

    #[test]
    fn test_window_slides() {
        let clock = ManualClock::new(1_000_000);
        let limiter = RateLimiter::with_clock(3, 1000, clock.clone());

        for _ in 0..3 {
            assert!(limiter.check("u1").is_ok());
        }
        assert!(limiter.check("u1").is_err());

        clock.advance(1001);
        assert!(limiter.check("u1").is_ok());
    }

    #[test]
    fn test_identities_are_independent() {
        let clock = ManualClock::new(1_000_000);
        let limiter = RateLimiter::with_clock(1, 1000, clock.clone());

        assert!(limiter.check("u1").is_ok());
        assert!(limiter.check("u2").is_ok());
        assert!(limiter.check("u1").is_err());
        assert!(limiter.check("u2").is_err());
    }
}
