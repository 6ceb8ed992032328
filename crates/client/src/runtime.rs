// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The atomic procedure runtime seam
//!
//! A runtime executes one named procedure as one indivisible unit and
//! hands back the wire-shaped [`Reply`]. Implementations must
//! serialize invocations touching the same store; clients never do a
//! read-then-write across two calls.

use async_trait::async_trait;
use fenq_core::{Reply, LIBRARY_NAME};
use std::time::Duration;
use thiserror::Error;

/// Default per-call deadline imposed by the clients
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// One procedure invocation: name, resource keys, then arguments
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcedureCall {
    pub procedure: &'static str,
    pub keys: Vec<String>,
    pub args: Vec<String>,
}

impl ProcedureCall {
    pub fn new(procedure: &'static str, key: impl Into<String>) -> Self {
        Self {
            procedure,
            keys: vec![key.into()],
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Failures on the runtime axis, distinct from logical status codes
///
/// `Timeout` means the procedure may or may not have applied; callers
/// needing idempotence should re-derive state (assert the lock, read
/// queue status) rather than assume it did not run.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("procedure call timed out; outcome unknown")]
    Timeout,
    #[error("procedure library not installed")]
    NotInstalled,
}

/// Executes named atomic procedures against the backing store
#[async_trait]
pub trait ProcedureRuntime: Send + Sync {
    /// Install (or reinstall) the procedure library. Idempotent;
    /// returns the library name the store reports.
    async fn install(&self) -> Result<String, RuntimeError>;

    /// Run one procedure as a single indivisible step
    async fn invoke(&self, call: ProcedureCall) -> Result<Reply, RuntimeError>;
}

/// One-time setup: install the procedure library and verify the store
/// reports the expected name. Safe to call from every connection pool
/// member; reinstallation replaces the library in place.
pub async fn initialize(runtime: &dyn ProcedureRuntime) -> Result<(), crate::Error> {
    let name = runtime.install().await?;
    if name != LIBRARY_NAME {
        return Err(crate::Error::Protocol(format!(
            "installed library '{}', expected '{}'",
            name, LIBRARY_NAME
        )));
    }
    Ok(())
}

/// Shared call path: caller-imposed deadline around the round-trip
pub(crate) async fn invoke_with_timeout(
    runtime: &dyn ProcedureRuntime,
    timeout: Duration,
    call: ProcedureCall,
) -> Result<Reply, RuntimeError> {
    match tokio::time::timeout(timeout, runtime.invoke(call)).await {
        Ok(result) => result,
        Err(_) => Err(RuntimeError::Timeout),
    }
}
