// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Granted-badge storage.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashSet;

/// Stores which badges each user holds.
#[async_trait]
pub trait BadgeLedger: Send + Sync {
    /// Names of every badge the user currently holds.
    async fn get_grants(&self, user_id: &str) -> Result<HashSet<String>>;

    /// Record that the user earned `badge_name`.
    ///
    /// Must be atomic per (user, badge) and idempotent: granting a badge the
    /// user already holds succeeds without writing anything. Returns `true`
    /// only when this call created the grant.
    async fn grant(&self, user_id: &str, badge_name: &str) -> Result<bool>;
}
