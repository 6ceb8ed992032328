// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named atomic procedure dispatcher
//!
//! Each client operation is one named procedure applied to a [`Store`]
//! with positional keys and string arguments, mirroring the wire
//! contract. A runtime owns the store and must serialize calls; given
//! that, every procedure here is a single indivisible step and no
//! caller can observe intermediate state.
//!
//! Fenced queue procedures assert the lock stored under
//! `lock:<queue>` inside the same call as the queue access. Checking
//! in a separate round-trip would reopen the lock-expiry race the
//! fencing exists to close.

use crate::clock::Clock;
use crate::lock::LockState;
use crate::queue::{QueueState, QueueStatus};
use crate::status::Status;
use std::collections::HashMap;
use std::time::Duration;

/// Name the procedure library reports when installed
pub const LIBRARY_NAME: &str = "fenqlib";

/// Namespace prefix tying a queue to its consumer lock
pub const LOCK_PREFIX: &str = "lock:";

/// Wire-shaped reply from one procedure call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Status code or count
    Int(i64),
    /// Payload, or JSON for batch reads
    Bulk(String),
    /// Empty queue on read
    Nil,
    /// Length pair from `status`
    Ints(Vec<i64>),
}

impl Reply {
    fn status(status: Status) -> Reply {
        Reply::Int(status.code())
    }
}

/// All lock records and queue states, keyed by name
///
/// Plays the role of the backing key-value store: the lock map holds
/// what the original keeps in plain keys, the queue map what it keeps
/// in `reserve:`/`queue:` lists.
#[derive(Clone, Debug, Default)]
pub struct Store {
    locks: HashMap<String, LockState>,
    queues: HashMap<String, QueueState>,
    /// Per-list entry cap standing in for storage-layer exhaustion
    capacity_limit: Option<usize>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap each reservation/message list at `limit` entries, making
    /// the NO_CAPACITY path reachable without exhausting real memory
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            capacity_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Apply one named procedure. Malformed names or arguments come
    /// back as `-EINVAL`, never as a panic or a silent default.
    pub fn call(
        &mut self,
        procedure: &str,
        keys: &[String],
        args: &[String],
        clock: &impl Clock,
    ) -> Reply {
        let Some(name) = keys.first() else {
            return Reply::status(Status::Invalid);
        };

        match procedure {
            "lock" => self.lock(name, args, clock),
            "unlock" => self.unlock(name, args, clock),
            "assert_lock" => self.assert_lock(name, args, clock),
            "reserve" => self.reserve(name, args, clock),
            "unreserve" => self.unreserve(name),
            "commit" => self.commit(name, args),
            "read" => self.read(name),
            "locked_read" => self.locked_read(name, args, clock),
            "locked_read_multi" => self.locked_read_multi(name, args, clock),
            "ack" => self.ack(name, 1),
            "ack_multi" => match parse_count(args, 0) {
                Ok(count) => self.ack(name, count),
                Err(status) => Reply::status(status),
            },
            "locked_ack" => self.locked_ack(name, args, 1, clock),
            "locked_ack_multi" => match parse_count(args, 1) {
                Ok(count) => self.locked_ack(name, args, count, clock),
                Err(status) => Reply::status(status),
            },
            "cleanup" => self.cleanup(name, args, clock),
            "status" => self.queue_status(name),
            _ => Reply::status(Status::Invalid),
        }
    }

    // === Lock procedures ===

    fn lock(&mut self, name: &str, args: &[String], clock: &impl Clock) -> Reply {
        let Some(cookie) = args.first() else {
            return Reply::status(Status::Invalid);
        };
        let ttl = match parse_millis(args, 1) {
            Ok(ttl) => ttl,
            Err(status) => return Reply::status(status),
        };

        let state = self.locks.entry(name.to_string()).or_default();
        let (next, status) = state.acquire(cookie, ttl, clock);
        *state = next;
        Reply::status(status)
    }

    fn unlock(&mut self, name: &str, args: &[String], clock: &impl Clock) -> Reply {
        let Some(cookie) = args.first() else {
            return Reply::status(Status::Invalid);
        };

        let state = self.locks.entry(name.to_string()).or_default();
        let (next, status) = state.release(cookie, clock);
        *state = next;
        if status.is_ok() {
            self.locks.remove(name);
        }
        Reply::status(status)
    }

    fn assert_lock(&self, name: &str, args: &[String], clock: &impl Clock) -> Reply {
        let Some(cookie) = args.first() else {
            return Reply::status(Status::Invalid);
        };
        Reply::status(self.lock_status(name, cookie, clock))
    }

    fn lock_status(&self, name: &str, cookie: &str, clock: &impl Clock) -> Status {
        match self.locks.get(name) {
            None => Status::NotHeld,
            Some(state) => state.assert_held(cookie, clock),
        }
    }

    // === Queue procedures ===

    fn reserve(&mut self, name: &str, args: &[String], clock: &impl Clock) -> Reply {
        let size = match parse_u64(args, 0) {
            Ok(size) => size,
            Err(status) => return Reply::status(status),
        };

        let queue = self.queues.entry(name.to_string()).or_default();
        if at_capacity(self.capacity_limit, queue.status().reservations) {
            return Reply::status(Status::NoCapacity);
        }
        queue.reserve(size, clock);
        Reply::status(Status::Ok)
    }

    fn unreserve(&mut self, name: &str) -> Reply {
        let status = match self.queues.get_mut(name) {
            Some(queue) => {
                if queue.release_reservation().is_some() {
                    Status::Ok
                } else {
                    Status::NotHeld
                }
            }
            None => Status::NotHeld,
        };
        self.drop_if_drained(name);
        Reply::status(status)
    }

    fn commit(&mut self, name: &str, args: &[String]) -> Reply {
        let Some(payload) = args.first() else {
            return Reply::status(Status::Invalid);
        };

        let queue = self.queues.entry(name.to_string()).or_default();
        // Best effort: a missing reservation never blocks the commit
        queue.release_reservation();
        if at_capacity(self.capacity_limit, queue.status().messages) {
            return Reply::status(Status::NoCapacity);
        }
        queue.push_message(payload.clone());
        Reply::status(Status::Ok)
    }

    fn read(&self, name: &str) -> Reply {
        match self.queues.get(name).and_then(QueueState::read) {
            Some(payload) => Reply::Bulk(payload.to_string()),
            None => Reply::Nil,
        }
    }

    fn locked_read(&self, name: &str, args: &[String], clock: &impl Clock) -> Reply {
        match self.assert_consumer(name, args, clock) {
            Status::Ok => self.read(name),
            status => Reply::status(status),
        }
    }

    fn locked_read_multi(&self, name: &str, args: &[String], clock: &impl Clock) -> Reply {
        let count = match parse_count(args, 1) {
            Ok(count) => count,
            Err(status) => return Reply::status(status),
        };
        match self.assert_consumer(name, args, clock) {
            Status::Ok => {
                let batch = self
                    .queues
                    .get(name)
                    .map(|q| q.read_batch(count))
                    .unwrap_or_default();
                match serde_json::to_string(&batch) {
                    Ok(json) => Reply::Bulk(json),
                    Err(_) => Reply::status(Status::Invalid),
                }
            }
            status => Reply::status(status),
        }
    }

    fn ack(&mut self, name: &str, count: usize) -> Reply {
        if let Some(queue) = self.queues.get_mut(name) {
            queue.ack(count);
        }
        self.drop_if_drained(name);
        Reply::status(Status::Ok)
    }

    fn locked_ack(&mut self, name: &str, args: &[String], count: usize, clock: &impl Clock) -> Reply {
        match self.assert_consumer(name, args, clock) {
            Status::Ok => self.ack(name, count),
            status => Reply::status(status),
        }
    }

    fn cleanup(&mut self, name: &str, args: &[String], clock: &impl Clock) -> Reply {
        let max_age = match parse_millis(args, 0) {
            Ok(age) => age,
            Err(status) => return Reply::status(status),
        };

        let removed = match self.queues.get_mut(name) {
            Some(queue) => queue.cleanup_stale(max_age, clock),
            None => 0,
        };
        self.drop_if_drained(name);
        Reply::Int(removed as i64)
    }

    fn queue_status(&self, name: &str) -> Reply {
        let status = self
            .queues
            .get(name)
            .map(QueueState::status)
            .unwrap_or_default();
        Reply::Ints(vec![status.reservations as i64, status.messages as i64])
    }

    /// Fencing check shared by all locked_* procedures: the caller must
    /// hold the lock derived from the queue name, verified in this same
    /// atomic step.
    fn assert_consumer(&self, name: &str, args: &[String], clock: &impl Clock) -> Status {
        let Some(cookie) = args.first() else {
            return Status::Invalid;
        };
        self.lock_status(&consumer_lock_name(name), cookie, clock)
    }

    fn drop_if_drained(&mut self, name: &str) {
        if self.queues.get(name).is_some_and(QueueState::is_drained) {
            self.queues.remove(name);
        }
    }

    /// Advisory counters outside the wire path, for runtimes that want
    /// introspection without a procedure call
    pub fn status_of(&self, name: &str) -> QueueStatus {
        self.queues
            .get(name)
            .map(QueueState::status)
            .unwrap_or_default()
    }
}

/// Lock name a consumer must hold to run fenced procedures on `queue`
pub fn consumer_lock_name(queue: &str) -> String {
    format!("{}{}", LOCK_PREFIX, queue)
}

fn at_capacity(limit: Option<usize>, len: usize) -> bool {
    limit.is_some_and(|cap| len >= cap)
}

fn parse_u64(args: &[String], index: usize) -> Result<u64, Status> {
    args.get(index)
        .and_then(|raw| raw.parse().ok())
        .ok_or(Status::Invalid)
}

fn parse_millis(args: &[String], index: usize) -> Result<Duration, Status> {
    parse_u64(args, index).map(Duration::from_millis)
}

fn parse_count(args: &[String], index: usize) -> Result<usize, Status> {
    args.get(index)
        .and_then(|raw| raw.parse().ok())
        .ok_or(Status::Invalid)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
