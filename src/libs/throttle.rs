//! Per-identity failed-attempt throttle.
//!
//! Each identity (a username) accumulates consecutive failures. Reaching the
//! limit locks that identity for a fixed cooldown measured against the clock;
//! nothing sleeps and other identities are unaffected. Once the cooldown has
//! passed the identity starts again from zero failures. Failures that sit idle
//! for longer than [`FAILURE_WINDOW_MINUTES`] are forgotten, so the table only
//! holds identities with recent activity.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Idle time after which unlocked failures stop counting.
pub const FAILURE_WINDOW_MINUTES: i64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttemptRecord {
    failures: u32,
    last_failure: DateTime<Utc>,
    locked_until: Option<DateTime<Utc>>,
}

impl AttemptRecord {
    fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            failures: 0,
            last_failure: now,
            locked_until: None,
        }
    }

    /// Whether the record still affects `check` or the next failure at `now`.
    fn is_live(&self, now: DateTime<Utc>, window: Duration) -> bool {
        match self.locked_until {
            Some(until) => until > now,
            None => self
                .last_failure
                .checked_add_signed(window)
                .map_or(true, |expires| expires > now),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    Open,
    /// Locked; the value is the number of whole seconds left, at least 1.
    Locked(i64),
}

#[derive(Debug)]
pub struct LoginThrottle {
    max_attempts: u32,
    lockout: Duration,
    window: Duration,
    records: Mutex<HashMap<String, AttemptRecord>>,
}

impl LoginThrottle {
    pub fn new(max_attempts: u32, lockout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            lockout,
            window: Duration::minutes(FAILURE_WINDOW_MINUTES),
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, identity: &str, now: DateTime<Utc>) -> ThrottleState {
        let mut records = self.records.lock();
        records.retain(|_, record| record.is_live(now, self.window));

        match records.get(identity).and_then(|record| record.locked_until) {
            Some(until) => {
                let remaining = (until - now).num_milliseconds();
                ThrottleState::Locked(((remaining + 999) / 1000).max(1))
            }
            None => ThrottleState::Open,
        }
    }

    /// Records a failure and returns the resulting state.
    pub fn record_failure(&self, identity: &str, now: DateTime<Utc>) -> ThrottleState {
        let mut records = self.records.lock();
        records.retain(|_, record| record.is_live(now, self.window));

        let record = records
            .entry(identity.to_string())
            .or_insert_with(|| AttemptRecord::fresh(now));
        record.failures += 1;
        record.last_failure = now;

        if record.failures >= self.max_attempts {
            let until = now.checked_add_signed(self.lockout).unwrap_or(DateTime::<Utc>::MAX_UTC);
            record.locked_until = Some(until);
            tracing::warn!(identity, failures = record.failures, "identity locked out");
            return ThrottleState::Locked(self.lockout.num_seconds().max(1));
        }
        ThrottleState::Open
    }

    pub fn record_success(&self, identity: &str) {
        self.records.lock().remove(identity);
    }

    /// Consecutive failures currently counted for `identity`.
    pub fn failures(&self, identity: &str, now: DateTime<Utc>) -> u32 {
        if self.check(identity, now) == ThrottleState::Open {
            return self.records.lock().get(identity).map_or(0, |r| r.failures);
        }
        self.max_attempts
    }

    /// Number of identities with live failure records.
    pub fn tracked(&self) -> usize {
        self.records.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locks_after_max_attempts_and_resets() {
        let throttle = LoginThrottle::new(3, Duration::seconds(10));
        let now = Utc::now();

        assert_eq!(throttle.record_failure("alice", now), ThrottleState::Open);
        assert_eq!(throttle.record_failure("alice", now), ThrottleState::Open);
        assert_eq!(throttle.failures("alice", now), 2);
        assert_eq!(throttle.record_failure("alice", now), ThrottleState::Locked(10));

        assert_eq!(throttle.check("alice", now + Duration::seconds(4)), ThrottleState::Locked(6));
        assert_eq!(throttle.check("alice", now + Duration::seconds(10)), ThrottleState::Open);
        assert_eq!(throttle.failures("alice", now + Duration::seconds(10)), 0);
    }

    #[test]
    fn identities_are_independent() {
        let throttle = LoginThrottle::new(3, Duration::seconds(10));
        let now = Utc::now();
        for _ in 0..3 {
            throttle.record_failure("alice", now);
        }

        assert!(matches!(throttle.check("alice", now), ThrottleState::Locked(_)));
        assert_eq!(throttle.check("bob", now), ThrottleState::Open);
    }

    #[test]
    fn success_clears_failures() {
        let throttle = LoginThrottle::new(3, Duration::seconds(10));
        let now = Utc::now();
        throttle.record_failure("alice", now);
        throttle.record_failure("alice", now);
        throttle.record_success("alice");

        assert_eq!(throttle.failures("alice", now), 0);
        assert_eq!(throttle.record_failure("alice", now), ThrottleState::Open);
    }

    #[test]
    fn failure_after_expired_lock_starts_fresh() {
        let throttle = LoginThrottle::new(2, Duration::seconds(5));
        let now = Utc::now();
        throttle.record_failure("alice", now);
        throttle.record_failure("alice", now);

        let later = now + Duration::seconds(6);
        assert_eq!(throttle.record_failure("alice", later), ThrottleState::Open);
        assert_eq!(throttle.failures("alice", later), 1);
    }

    #[test]
    fn idle_failures_are_dropped() {
        let throttle = LoginThrottle::new(3, Duration::seconds(10));
        let now = Utc::now();
        throttle.record_failure("typo-1", now);
        throttle.record_failure("typo-2", now);
        throttle.record_failure("alice", now);
        assert_eq!(throttle.tracked(), 3);

        let later = now + Duration::minutes(FAILURE_WINDOW_MINUTES);
        assert_eq!(throttle.check("bob", later), ThrottleState::Open);
        assert_eq!(throttle.tracked(), 0);
        assert_eq!(throttle.failures("alice", later), 0);
    }

    #[test]
    fn failures_inside_window_keep_counting() {
        let throttle = LoginThrottle::new(3, Duration::seconds(10));
        let now = Utc::now();
        throttle.record_failure("alice", now);
        throttle.record_failure("alice", now + Duration::minutes(10));

        let third = now + Duration::minutes(20);
        assert!(matches!(throttle.record_failure("alice", third), ThrottleState::Locked(_)));
    }

    #[test]
    fn huge_lockout_saturates() {
        let throttle = LoginThrottle::new(1, Duration::MAX);
        let now = Utc::now();

        assert!(matches!(throttle.record_failure("alice", now), ThrottleState::Locked(_)));
        assert!(matches!(throttle.check("alice", now), ThrottleState::Locked(_)));
    }
}
