// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock manager client
//!
//! Renewable, cookie-fenced advisory lease: the same cookie can call
//! [`LockClient::lock`] repeatedly to extend the deadline, a different
//! cookie gets `Busy` until expiry. There is no server-side waiting;
//! a refused caller polls on its own schedule.

use crate::cookie::Cookie;
use crate::error::{reply_status, Error};
use crate::runtime::{invoke_with_timeout, ProcedureCall, ProcedureRuntime, DEFAULT_TIMEOUT};
use fenq_core::Status;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Typed client for the lock procedures
#[derive(Clone)]
pub struct LockClient {
    runtime: Arc<dyn ProcedureRuntime>,
    timeout: Duration,
}

impl LockClient {
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

    /// Acquire the named lock, or renew it when `cookie` already holds
    /// it. Retrying with the same cookie is always safe.
    pub async fn lock(&self, name: &str, cookie: &Cookie, ttl: Duration) -> Result<(), Error> {
        let call = ProcedureCall::new("lock", name)
            .arg(cookie.as_str())
            .arg(ttl.as_millis().to_string());
        let status = self.call(call).await?;
        debug!(name, %cookie, ?ttl, %status, "lock");
        match status {
            Status::Ok => Ok(()),
            status => Err(Error::from_lock_status(status)),
        }
    }

    /// Verify current ownership without mutating anything
    pub async fn assert_locked(&self, name: &str, cookie: &Cookie) -> Result<(), Error> {
        let call = ProcedureCall::new("assert_lock", name).arg(cookie.as_str());
        match self.call(call).await? {
            Status::Ok => Ok(()),
            status => Err(Error::from_lock_status(status)),
        }
    }

    /// Release the lock; only the live owner's cookie succeeds
    pub async fn unlock(&self, name: &str, cookie: &Cookie) -> Result<(), Error> {
        let call = ProcedureCall::new("unlock", name).arg(cookie.as_str());
        let status = self.call(call).await?;
        debug!(name, %cookie, %status, "unlock");
        match status {
            Status::Ok => Ok(()),
            status => Err(Error::from_lock_status(status)),
        }
    }

    async fn call(&self, call: ProcedureCall) -> Result<Status, Error> {
        let reply = invoke_with_timeout(self.runtime.as_ref(), self.timeout, call).await?;
        reply_status(reply)
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
