// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process procedure runtime
//!
//! Every invocation takes one mutex over the shared [`Store`], which
//! is exactly the serialization contract the trait requires: a call
//! either sees the store before another call or after it, never
//! between its steps. Useful for tests and single-process embedding;
//! a networked store driver would implement the same trait.

use crate::runtime::{ProcedureCall, ProcedureRuntime, RuntimeError};
use async_trait::async_trait;
use fenq_core::{Clock, Reply, Store, SystemClock, LIBRARY_NAME};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Runtime backed by an in-memory [`Store`]
pub struct MemoryRuntime<C: Clock = SystemClock> {
    store: Mutex<Store>,
    clock: C,
    installed: AtomicBool,
}

impl MemoryRuntime<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryRuntime<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryRuntime<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_store(Store::new(), clock)
    }

    /// Start from a preconfigured store (e.g. with a capacity limit)
    pub fn with_store(store: Store, clock: C) -> Self {
        Self {
            store: Mutex::new(store),
            clock,
            installed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl<C: Clock> ProcedureRuntime for MemoryRuntime<C> {
    async fn install(&self) -> Result<String, RuntimeError> {
        // Reinstalling is a no-op replace, same as FUNCTION LOAD REPLACE
        self.installed.store(true, Ordering::SeqCst);
        Ok(LIBRARY_NAME.to_string())
    }

    async fn invoke(&self, call: ProcedureCall) -> Result<Reply, RuntimeError> {
        if !self.installed.load(Ordering::SeqCst) {
            return Err(RuntimeError::NotInstalled);
        }
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        Ok(store.call(call.procedure, &call.keys, &call.args, &self.clock))
    }
}
