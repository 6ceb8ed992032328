// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock state machine for cookie-fenced mutual exclusion
//!
//! A lock is a (cookie, deadline) pair under a name. The cookie is an
//! opaque caller-chosen token; matching it is the only proof of
//! ownership. An expired record is indistinguishable from an absent
//! one, which is how crashed holders are reclaimed without a reaper.

use crate::clock::Clock;
use crate::status::Status;
use std::time::{Duration, Instant};

/// The stored half of a held lock
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockRecord {
    pub cookie: String,
    pub deadline: Instant,
}

impl LockRecord {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// Lock state
#[derive(Clone, Debug, Default)]
pub enum LockState {
    /// No record, or equivalently an expired one that was reclaimed
    #[default]
    Free,
    /// Held until the deadline passes or the owner releases
    Held(LockRecord),
}

impl LockState {
    /// Current live holder, treating an expired record as absent
    pub fn holder(&self, now: Instant) -> Option<&str> {
        match self {
            LockState::Free => None,
            LockState::Held(rec) if rec.is_expired(now) => None,
            LockState::Held(rec) => Some(rec.cookie.as_str()),
        }
    }

    /// Acquire or renew: same cookie extends the deadline, an absent or
    /// expired record is claimed, a live foreign record refuses.
    pub fn acquire(&self, cookie: &str, ttl: Duration, clock: &impl Clock) -> (LockState, Status) {
        let now = clock.now();
        match self.holder(now) {
            Some(held) if held != cookie => (self.clone(), Status::Busy),
            _ => {
                let next = LockState::Held(LockRecord {
                    cookie: cookie.to_string(),
                    deadline: now + ttl,
                });
                (next, Status::Ok)
            }
        }
    }

    /// Check ownership without mutating
    pub fn assert_held(&self, cookie: &str, clock: &impl Clock) -> Status {
        match self.holder(clock.now()) {
            None => Status::NotHeld,
            Some(held) if held == cookie => Status::Ok,
            Some(_) => Status::Busy,
        }
    }

    /// Release only on a live cookie match; mismatches report without
    /// touching state.
    pub fn release(&self, cookie: &str, clock: &impl Clock) -> (LockState, Status) {
        match self.assert_held(cookie, clock) {
            Status::Ok => (LockState::Free, Status::Ok),
            status => (self.clone(), status),
        }
    }

    pub fn is_free(&self, now: Instant) -> bool {
        self.holder(now).is_none()
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
