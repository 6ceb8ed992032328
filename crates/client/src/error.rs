// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed operation errors
//!
//! Logical outcomes (busy, absent, full) are values the caller decides
//! how to retry; none are recovered from internally. Runtime failures
//! pass through unchanged so they can never be mistaken for a logical
//! status.

use crate::runtime::RuntimeError;
use fenq_core::{Reply, Status};
use thiserror::Error;

/// Errors surfaced by [`LockClient`](crate::LockClient) and
/// [`QueueClient`](crate::QueueClient) operations
#[derive(Debug, Error)]
pub enum Error {
    /// Another cookie holds the lock (EBUSY)
    #[error("held by another cookie")]
    Busy,
    /// Lock absent or expired (ENOENT)
    #[error("lock not held")]
    NotHeld,
    /// No live reservation to release (ENOENT)
    #[error("no outstanding reservation")]
    NotReserved,
    /// Store refused the reservation write (ENOMEM)
    #[error("queue capacity exhausted")]
    NoCapacity,
    /// Malformed or unexpected reply (EINVAL class)
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Transport or timeout; outcome of the call may be unknown
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Map a wire status from a lock-flavored procedure
    pub(crate) fn from_lock_status(status: Status) -> Error {
        match status {
            Status::Busy => Error::Busy,
            Status::NotHeld => Error::NotHeld,
            status => Error::Protocol(format!("unexpected status '{}'", status)),
        }
    }

    /// Decode a raw wire code, refusing unknown values
    pub(crate) fn decode(code: i64) -> Result<Status, Error> {
        Status::from_code(code)
            .ok_or_else(|| Error::Protocol(format!("unknown status code {}", code)))
    }
}

/// A reply that must carry a status code and nothing else
pub(crate) fn reply_status(reply: Reply) -> Result<Status, Error> {
    match reply {
        Reply::Int(code) => Error::decode(code),
        other => Err(Error::Protocol(format!(
            "expected status code, got {:?}",
            other
        ))),
    }
}
