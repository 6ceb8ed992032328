// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire status codes for atomic procedures
//!
//! Logical outcomes travel as negative POSIX errno values, success as
//! zero. Transport failures are a different axis entirely and never
//! appear here (see `fenq-client`).

use serde::{Deserialize, Serialize};

/// POSIX errno values used on the wire
pub mod errno {
    pub const ENOENT: i64 = 2;
    pub const ENOMEM: i64 = 12;
    pub const EBUSY: i64 = 16;
    pub const EINVAL: i64 = 22;
}

/// Logical outcome of an atomic procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Operation applied
    Ok,
    /// Lock or reservation absent, or present but expired (-ENOENT)
    NotHeld,
    /// Lock held by a different, unexpired cookie (-EBUSY)
    Busy,
    /// Store refused the reservation write (-ENOMEM)
    NoCapacity,
    /// Malformed arguments or reply (-EINVAL)
    Invalid,
}

impl Status {
    /// Encode as the wire integer
    pub fn code(self) -> i64 {
        match self {
            Status::Ok => 0,
            Status::NotHeld => -errno::ENOENT,
            Status::Busy => -errno::EBUSY,
            Status::NoCapacity => -errno::ENOMEM,
            Status::Invalid => -errno::EINVAL,
        }
    }

    /// Decode a wire integer; unknown codes are not swallowed
    pub fn from_code(code: i64) -> Option<Status> {
        match code {
            0 => Some(Status::Ok),
            c if c == -errno::ENOENT => Some(Status::NotHeld),
            c if c == -errno::EBUSY => Some(Status::Busy),
            c if c == -errno::ENOMEM => Some(Status::NoCapacity),
            c if c == -errno::EINVAL => Some(Status::Invalid),
            _ => None,
        }
    }

    pub fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Ok => "ok",
            Status::NotHeld => "not held",
            Status::Busy => "busy",
            Status::NoCapacity => "no capacity",
            Status::Invalid => "invalid",
        };
        write!(f, "{}", s)
    }
}
