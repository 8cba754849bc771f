// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only activity history queries used by badge predicates.

use crate::error::Result;
use crate::models::ActivityDomain;
use crate::services::streak;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};

/// Answers existence, count and streak questions about one user's records in
/// one domain.
///
/// Only qualifying records are considered: soft-deleted journal and gratitude
/// entries never count, and reflection sessions count only once completed
/// (dated by completion time). A storage failure is returned as an error,
/// never as `false`.
#[async_trait]
pub trait ActivityHistory: Send + Sync {
    /// At least one qualifying record exists.
    async fn has_first_entry(&self, domain: ActivityDomain, user_id: &str) -> Result<bool>;

    /// At least `n` qualifying records exist.
    async fn has_reached_count(&self, domain: ActivityDomain, user_id: &str, n: u32)
        -> Result<bool>;

    /// Distinct UTC dates carrying at least one qualifying record.
    async fn activity_days(&self, domain: ActivityDomain, user_id: &str)
        -> Result<BTreeSet<NaiveDate>>;

    /// Distinct question categories answered in the user's completed
    /// reflection sessions.
    async fn completed_categories(&self, user_id: &str) -> Result<HashSet<String>>;

    /// Qualifying records on at least `k` consecutive UTC days.
    async fn has_consecutive_days(
        &self,
        domain: ActivityDomain,
        user_id: &str,
        k: u32,
    ) -> Result<bool> {
        let days = self.activity_days(domain, user_id).await?;
        Ok(streak::has_run_of(&days, k))
    }

    /// Completed reflection sessions cover every category in `categories`.
    async fn has_completed_all_categories(
        &self,
        user_id: &str,
        categories: &[&str],
    ) -> Result<bool> {
        let answered = self.completed_categories(user_id).await?;
        Ok(categories.iter().all(|c| answered.contains(*c)))
    }
}
