// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reservation queue client
//!
//! Producers run reserve → (prepare payload) → commit or abort;
//! consumers read, process, then ack. The `locked_*` variants fence on
//! the lock named `lock:<queue>`, so holding that lock through the
//! generic [`LockClient`](crate::LockClient) grants exclusive
//! consumption of the queue.

use crate::cookie::Cookie;
use crate::error::{reply_status, Error};
use crate::runtime::{invoke_with_timeout, ProcedureCall, ProcedureRuntime, DEFAULT_TIMEOUT};
use fenq_core::{consumer_lock_name, QueueStatus, Reply, Status};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Reservation size hint used when the producer has no better estimate
pub const DEFAULT_RESERVE_SIZE: u64 = 120;

/// Typed client for the queue procedures
#[derive(Clone)]
pub struct QueueClient {
    runtime: Arc<dyn ProcedureRuntime>,
    timeout: Duration,
}

impl QueueClient {
    pub fn new(runtime: Arc<dyn ProcedureRuntime>) -> Self {
        Self {
            runtime,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-call deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Name of the lock a consumer must hold for the fenced operations
    pub fn lock_name(queue: &str) -> String {
        consumer_lock_name(queue)
    }

    /// Admit one unit of capacity sized `size` before preparing the
    /// payload. `NoCapacity` asks the producer to back off, not to
    /// commit unreserved.
    pub async fn reserve(&self, name: &str, size: u64) -> Result<(), Error> {
        let call = ProcedureCall::new("reserve", name).arg(size.to_string());
        let status = self.call(call).await?;
        debug!(name, size, %status, "reserve");
        match status {
            Status::Ok => Ok(()),
            Status::NoCapacity => Err(Error::NoCapacity),
            status => Err(Error::Protocol(format!("unexpected status '{}'", status))),
        }
    }

    /// Publish a payload, releasing one outstanding reservation
    /// best-effort. Never fails for lack of a reservation.
    pub async fn commit(&self, name: &str, payload: &str) -> Result<(), Error> {
        let call = ProcedureCall::new("commit", name).arg(payload);
        let status = self.call(call).await?;
        debug!(name, %status, "commit");
        match status {
            Status::Ok => Ok(()),
            Status::NoCapacity => Err(Error::NoCapacity),
            status => Err(Error::Protocol(format!("unexpected status '{}'", status))),
        }
    }

    /// Give back one reservation without publishing
    pub async fn abort(&self, name: &str) -> Result<(), Error> {
        let call = ProcedureCall::new("unreserve", name);
        match self.call(call).await? {
            Status::Ok => Ok(()),
            Status::NotHeld => Err(Error::NotReserved),
            status => Err(Error::Protocol(format!("unexpected status '{}'", status))),
        }
    }

    /// Oldest committed payload without removing it; `None` when empty
    pub async fn read(&self, name: &str) -> Result<Option<String>, Error> {
        let call = ProcedureCall::new("read", name);
        self.payload_reply(call).await
    }

    /// As [`read`](Self::read), fenced on the queue's consumer lock
    pub async fn locked_read(&self, name: &str, cookie: &Cookie) -> Result<Option<String>, Error> {
        let call = ProcedureCall::new("locked_read", name).arg(cookie.as_str());
        self.payload_reply(call).await
    }

    /// Up to `count` oldest payloads in commit order, fenced
    pub async fn locked_read_batch(
        &self,
        name: &str,
        cookie: &Cookie,
        count: usize,
    ) -> Result<Vec<String>, Error> {
        let call = ProcedureCall::new("locked_read_multi", name)
            .arg(cookie.as_str())
            .arg(count.to_string());
        let reply = self.invoke(call).await?;
        match reply {
            Reply::Bulk(json) => decode_batch(name, &json),
            Reply::Int(code) => Err(Error::from_lock_status(Error::decode(code)?)),
            other => Err(Error::Protocol(format!("unexpected reply {:?}", other))),
        }
    }

    /// Remove the oldest message; OK even when the queue is empty
    pub async fn ack(&self, name: &str) -> Result<(), Error> {
        self.ok_status(ProcedureCall::new("ack", name)).await
    }

    /// Remove up to `count` oldest messages in one atomic step
    pub async fn ack_batch(&self, name: &str, count: usize) -> Result<(), Error> {
        let call = ProcedureCall::new("ack_multi", name).arg(count.to_string());
        self.ok_status(call).await
    }

    /// As [`ack`](Self::ack), fenced on the queue's consumer lock
    pub async fn locked_ack(&self, name: &str, cookie: &Cookie) -> Result<(), Error> {
        let call = ProcedureCall::new("locked_ack", name).arg(cookie.as_str());
        self.fenced_ok_status(call).await
    }

    /// Fenced batch removal of the `count` oldest messages
    pub async fn locked_ack_batch(
        &self,
        name: &str,
        cookie: &Cookie,
        count: usize,
    ) -> Result<(), Error> {
        let call = ProcedureCall::new("locked_ack_multi", name)
            .arg(cookie.as_str())
            .arg(count.to_string());
        self.fenced_ok_status(call).await
    }

    /// Reap reservations older than `max_age`; returns how many were
    /// removed. Runs independently of any lock.
    pub async fn cleanup_stale_reservations(
        &self,
        name: &str,
        max_age: Duration,
    ) -> Result<u64, Error> {
        let call = ProcedureCall::new("cleanup", name).arg(max_age.as_millis().to_string());
        match self.invoke(call).await? {
            Reply::Int(n) if n >= 0 => {
                debug!(name, removed = n, "cleanup stale reservations");
                Ok(n as u64)
            }
            Reply::Int(code) => Err(Error::Protocol(format!("unexpected status code {}", code))),
            other => Err(Error::Protocol(format!("unexpected reply {:?}", other))),
        }
    }

    /// Advisory (reservation_count, queue_length) snapshot
    pub async fn status(&self, name: &str) -> Result<QueueStatus, Error> {
        let call = ProcedureCall::new("status", name);
        match self.invoke(call).await? {
            Reply::Ints(pair) if pair.len() == 2 && pair[0] >= 0 && pair[1] >= 0 => {
                Ok(QueueStatus {
                    reservations: pair[0] as usize,
                    messages: pair[1] as usize,
                })
            }
            other => Err(Error::Protocol(format!("unexpected reply {:?}", other))),
        }
    }

    async fn invoke(&self, call: ProcedureCall) -> Result<Reply, Error> {
        Ok(invoke_with_timeout(self.runtime.as_ref(), self.timeout, call).await?)
    }

    async fn call(&self, call: ProcedureCall) -> Result<Status, Error> {
        reply_status(self.invoke(call).await?)
    }

    async fn ok_status(&self, call: ProcedureCall) -> Result<(), Error> {
        match self.call(call).await? {
            Status::Ok => Ok(()),
            status => Err(Error::Protocol(format!("unexpected status '{}'", status))),
        }
    }

    async fn fenced_ok_status(&self, call: ProcedureCall) -> Result<(), Error> {
        match self.call(call).await? {
            Status::Ok => Ok(()),
            status => Err(Error::from_lock_status(status)),
        }
    }

    async fn payload_reply(&self, call: ProcedureCall) -> Result<Option<String>, Error> {
        match self.invoke(call).await? {
            Reply::Bulk(payload) => Ok(Some(payload)),
            Reply::Nil => Ok(None),
            Reply::Int(code) => Err(Error::from_lock_status(Error::decode(code)?)),
            other => Err(Error::Protocol(format!("unexpected reply {:?}", other))),
        }
    }
}

/// Batch reads travel as a JSON array of strings; anything else is a
/// protocol error, not an empty result.
fn decode_batch(name: &str, json: &str) -> Result<Vec<String>, Error> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| Error::Protocol(format!("batch reply is not JSON: {}", e)))?;
    let Some(entries) = value.as_array() else {
        error!(name, "batch reply is not a JSON array");
        return Err(Error::Protocol("batch reply is not a JSON array".into()));
    };
    entries
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::Protocol("batch entry is not a string".into()))
        })
        .collect()
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
