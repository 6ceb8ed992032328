// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fenq-client: Async client library for the fenced lock and
//! reservation queue
//!
//! This crate provides:
//! - The [`ProcedureRuntime`] seam: one async call per named atomic
//!   procedure, with transport failures kept apart from logical status
//! - [`MemoryRuntime`], an in-process runtime that serializes every
//!   procedure through one store, for tests and single-process use
//! - [`LockClient`] and [`QueueClient`], the typed operation surface
//! - Explicit, idempotent procedure-library installation via
//!   [`initialize`]
//!
//! Retry policy stays with the caller: a `Busy` or `NoCapacity` result
//! is a plain value to back off on, and a timeout means the outcome is
//! unknown, not that nothing happened.

pub mod cookie;
pub mod error;
pub mod lock;
pub mod memory;
pub mod queue;
pub mod runtime;

// Re-exports
pub use cookie::{Cookie, CookieGen, SequentialCookieGen, UuidCookieGen};
pub use error::Error;
pub use lock::LockClient;
pub use memory::MemoryRuntime;
pub use queue::{QueueClient, DEFAULT_RESERVE_SIZE};
pub use runtime::{initialize, ProcedureCall, ProcedureRuntime, RuntimeError, DEFAULT_TIMEOUT};
