// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reservation queue state for one queue name
//!
//! Two containers per name: an admission multiset of reservations
//! (capacity placeholders, FIFO by age for reclaim purposes) and the
//! FIFO message list itself. Reservations are a counting semaphore:
//! `commit` releases any one of them best-effort, payload size never
//! participates in the match.

use crate::clock::Clock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// An admitted-but-unwritten unit of capacity
#[derive(Clone, Debug)]
pub struct Reservation {
    /// Size hint supplied at reserve time; accounting only
    pub size: u64,
    pub reserved_at: Instant,
}

impl Reservation {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.reserved_at)
    }
}

/// Advisory counters for one queue name
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    pub reservations: usize,
    pub messages: usize,
}

/// Mutable state of one named queue
#[derive(Clone, Debug, Default)]
pub struct QueueState {
    /// Oldest reservation at the front
    reservations: VecDeque<Reservation>,
    /// Oldest committed message at the front
    messages: VecDeque<String>,
}

impl QueueState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit one unit of capacity
    pub fn reserve(&mut self, size: u64, clock: &impl Clock) {
        self.reservations.push_back(Reservation {
            size,
            reserved_at: clock.now(),
        });
    }

    /// Release the oldest reservation, if any
    pub fn release_reservation(&mut self) -> Option<Reservation> {
        self.reservations.pop_front()
    }

    /// Append a committed payload (newest last; front is consumed first)
    pub fn push_message(&mut self, payload: String) {
        self.messages.push_back(payload);
    }

    /// Oldest committed message, without removing it
    pub fn read(&self) -> Option<&str> {
        self.messages.front().map(String::as_str)
    }

    /// Up to `count` oldest messages in commit order
    pub fn read_batch(&self, count: usize) -> Vec<String> {
        self.messages.iter().take(count).cloned().collect()
    }

    /// Remove up to `count` oldest messages, returning how many went
    pub fn ack(&mut self, count: usize) -> usize {
        let n = count.min(self.messages.len());
        self.messages.drain(..n);
        n
    }

    /// Remove reservations older than `max_age`, returning how many
    pub fn cleanup_stale(&mut self, max_age: Duration, clock: &impl Clock) -> usize {
        let now = clock.now();
        let before = self.reservations.len();
        self.reservations.retain(|r| r.age(now) <= max_age);
        before - self.reservations.len()
    }

    pub fn status(&self) -> QueueStatus {
        QueueStatus {
            reservations: self.reservations.len(),
            messages: self.messages.len(),
        }
    }

    /// True once both containers are empty; the store drops such entries
    pub fn is_drained(&self) -> bool {
        self.reservations.is_empty() && self.messages.is_empty()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
