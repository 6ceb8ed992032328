// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fenq-core: Protocol core for the fenced lock and reservation queue
//!
//! This crate provides:
//! - Pure state machines for the cookie-fenced lock and the
//!   reservation/message queue
//! - The named atomic procedure dispatcher (`Store`) that every client
//!   operation maps onto, one procedure call per indivisible step
//! - Wire status codes and the clock abstraction that makes TTL expiry
//!   and reservation staleness testable
//!
//! Nothing here performs I/O. A runtime (see `fenq-client`) owns a
//! `Store` and guarantees that procedure invocations are serialized.

pub mod clock;
pub mod lock;
pub mod queue;
pub mod status;
pub mod store;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use lock::{LockRecord, LockState};
pub use queue::{QueueState, QueueStatus, Reservation};
pub use status::Status;
pub use store::{consumer_lock_name, Reply, Store, LIBRARY_NAME, LOCK_PREFIX};
