//! Fixed-window rate limiting.
//!
//! A [`RateLimiter`] admits at most `max_requests` attempts per window. The
//! window opens at the first admitted attempt and a fresh one opens on the
//! first attempt after it elapses. [`RateLimiters`] is the per-process
//! registry of named limiters the dashboard actions share.
//!
//! Time comes from a [`Clock`], so tests can drive windows with a
//! [`ManualClock`] instead of sleeping.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RateLimitError;

/// Source of the current instant.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        self.origin + *offset
    }
}

/// Limits for one named action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Attempts admitted per window.
    pub max_requests: u32,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Snapshot of a limiter's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    /// Time until the current window closes; zero when no window is open.
    pub resets_in: Duration,
}

#[derive(Debug)]
struct Window {
    count: u32,
    started: Option<Instant>,
}

/// A single fixed-window limiter.
///
/// The check and the increment happen under one lock, so concurrent callers
/// can never be admitted past the limit.
#[derive(Debug)]
pub struct RateLimiter {
    name: String,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    window: Mutex<Window>,
}

impl RateLimiter {
    pub fn new(name: impl Into<String>, config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            config,
            clock,
            window: Mutex::new(Window {
                count: 0,
                started: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Returns true and records the attempt if the action is allowed now.
    pub fn can_proceed(&self) -> bool {
        let now = self.clock.now();
        let mut window = self.lock_current(now);
        if window.count >= self.config.max_requests {
            debug!(
                limiter = %self.name,
                limit = self.config.max_requests,
                "rate limit reached"
            );
            return false;
        }
        if window.started.is_none() {
            window.started = Some(now);
        }
        window.count += 1;
        true
    }

    /// Current window usage, without recording an attempt.
    pub fn status(&self) -> RateLimitStatus {
        let now = self.clock.now();
        let window = self.lock_current(now);
        let resets_in = window
            .started
            .map(|started| {
                self.config
                    .window()
                    .saturating_sub(now.saturating_duration_since(started))
            })
            .unwrap_or_default();
        RateLimitStatus {
            limit: self.config.max_requests,
            remaining: self.config.max_requests.saturating_sub(window.count),
            resets_in,
        }
    }

    /// Forgets all recorded attempts.
    pub fn reset(&self) {
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        window.count = 0;
        window.started = None;
    }

    /// Locks the window, closing it first if it has elapsed.
    fn lock_current(&self, now: Instant) -> MutexGuard<'_, Window> {
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(started) = window.started
            && now.saturating_duration_since(started) >= self.config.window()
        {
            window.count = 0;
            window.started = None;
        }
        window
    }
}

/// Registry of named limiters shared by every request handler in a process.
#[derive(Debug)]
pub struct RateLimiters {
    limiters: BTreeMap<String, RateLimiter>,
}

impl Default for RateLimiters {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl RateLimiters {
    /// Passes a teacher may issue per minute.
    pub const ISSUE_PASS: &'static str = "issue_pass";
    /// Infractions a staff member may log per minute.
    pub const LOG_INFRACTION: &'static str = "log_infraction";
    /// Broadcasts per minute.
    pub const SEND_BROADCAST: &'static str = "send_broadcast";
    /// Roster uploads per five minutes.
    pub const UPLOAD_ROSTER: &'static str = "upload_roster";

    /// The built-in limits, keyed by limiter name.
    pub fn default_configs() -> BTreeMap<String, RateLimitConfig> {
        [
            (Self::ISSUE_PASS, RateLimitConfig::new(10, 60)),
            (Self::LOG_INFRACTION, RateLimitConfig::new(20, 60)),
            (Self::SEND_BROADCAST, RateLimitConfig::new(3, 60)),
            (Self::UPLOAD_ROSTER, RateLimitConfig::new(5, 300)),
        ]
        .into_iter()
        .map(|(name, config)| (name.to_string(), config))
        .collect()
    }

    /// Registry with the built-in limits.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_configs(Self::default_configs(), clock)
    }

    /// Registry with exactly the given limiters.
    pub fn with_configs(configs: BTreeMap<String, RateLimitConfig>, clock: Arc<dyn Clock>) -> Self {
        let limiters = configs
            .into_iter()
            .map(|(name, config)| {
                let limiter = RateLimiter::new(name.clone(), config, Arc::clone(&clock));
                (name, limiter)
            })
            .collect();
        Self { limiters }
    }

    pub fn get(&self, name: &str) -> Option<&RateLimiter> {
        self.limiters.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.limiters.keys().map(String::as_str)
    }

    /// Runs [`RateLimiter::can_proceed`] on the named limiter.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError::UnknownLimiter`] if `name` is not registered.
    pub fn check(&self, name: &str) -> Result<bool, RateLimitError> {
        self.get(name)
            .map(RateLimiter::can_proceed)
            .ok_or_else(|| RateLimitError::UnknownLimiter {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32, secs: u64) -> (Arc<ManualClock>, RateLimiter) {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::new("test", RateLimitConfig::new(max, secs), clock.clone());
        (clock, limiter)
    }

    #[test]
    fn test_first_call_is_admitted() {
        let (_clock, limiter) = limiter(1, 60);
        assert!(limiter.can_proceed());
    }

    #[test]
    fn test_denies_past_limit_until_window_elapses() {
        let (clock, limiter) = limiter(2, 60);
        assert!(limiter.can_proceed());
        assert!(limiter.can_proceed());
        assert!(!limiter.can_proceed());

        clock.advance(Duration::from_secs(59));
        assert!(!limiter.can_proceed());

        clock.advance(Duration::from_secs(1));
        assert!(limiter.can_proceed());
    }

    #[test]
    fn test_denied_attempts_do_not_extend_window() {
        let (clock, limiter) = limiter(1, 10);
        assert!(limiter.can_proceed());
        for _ in 0..5 {
            clock.advance(Duration::from_secs(1));
            assert!(!limiter.can_proceed());
        }
        clock.advance(Duration::from_secs(5));
        assert!(limiter.can_proceed());
    }

    #[test]
    fn test_status_and_reset() {
        let (clock, limiter) = limiter(3, 60);
        assert_eq!(limiter.status().remaining, 3);
        assert_eq!(limiter.status().resets_in, Duration::ZERO);

        limiter.can_proceed();
        clock.advance(Duration::from_secs(20));
        let status = limiter.status();
        assert_eq!(status.remaining, 2);
        assert_eq!(status.resets_in, Duration::from_secs(40));

        limiter.reset();
        assert_eq!(limiter.status().remaining, 3);
    }

    #[test]
    fn test_zero_limit_never_admits() {
        let (_clock, limiter) = limiter(0, 60);
        assert!(!limiter.can_proceed());
    }

    #[test]
    fn test_registry_defaults_and_unknown_name() {
        let limiters = RateLimiters::new(Arc::new(ManualClock::new()));
        assert!(limiters.check(RateLimiters::ISSUE_PASS).unwrap());
        assert_eq!(limiters.names().count(), 4);
        assert!(matches!(
            limiters.check("fly"),
            Err(RateLimitError::UnknownLimiter { .. })
        ));
    }
}
