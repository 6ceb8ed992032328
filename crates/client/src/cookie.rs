// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ownership cookies
//!
//! A cookie is the only proof of lock ownership; process or connection
//! identity never substitutes for it. Generation sits behind a seam so
//! tests can use predictable values.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque caller-chosen ownership token
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cookie(String);

impl Cookie {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Fresh random cookie for a new logical owner
    pub fn generate() -> Self {
        UuidCookieGen.next()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates ownership cookies
pub trait CookieGen: Clone + Send + Sync {
    fn next(&self) -> Cookie;
}

/// UUID-based generator for production use
#[derive(Clone, Default)]
pub struct UuidCookieGen;

impl CookieGen for UuidCookieGen {
    fn next(&self) -> Cookie {
        Cookie(uuid::Uuid::new_v4().to_string())
    }
}

/// Sequential generator for testing
#[derive(Clone)]
pub struct SequentialCookieGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialCookieGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl CookieGen for SequentialCookieGen {
    fn next(&self) -> Cookie {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Cookie(format!("{}-{}", self.prefix, n))
    }
}
