// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Badge evaluation engine.
//!
//! One pass handles one (domain, user) trigger:
//! 1. Load the user's grants once
//! 2. Keep the domain's rules whose badge is not already held
//! 3. Evaluate each remaining predicate against the activity history
//! 4. Grant every badge whose predicate holds
//!
//! The first storage error aborts the pass and is returned to the caller so
//! the trigger gets redelivered. Grants made earlier in the pass are kept;
//! the redelivered pass skips them.

use crate::error::Result;
use crate::models::ActivityDomain;
use crate::services::catalogue::{self, BadgeRule, CatalogueError, Predicate};
use crate::services::{ActivityHistory, BadgeLedger};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::Instrument;

/// Per-user pass locks. Serialises overlapping deliveries for one user inside
/// this instance. Correctness does not depend on it: the ledger write is the
/// idempotency boundary.
pub type UserLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Result of a single evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    pub domain: ActivityDomain,
    /// Badges this pass granted, in evaluation order.
    pub granted: Vec<String>,
    /// Domain rules skipped because the badge was already held.
    pub already_held: usize,
}

/// Evaluates badge rules for activity triggers.
#[derive(Clone)]
pub struct BadgeEngine {
    history: Arc<dyn ActivityHistory>,
    ledger: Arc<dyn BadgeLedger>,
    rules: &'static [BadgeRule],
    user_locks: UserLocks,
}

impl BadgeEngine {
    /// Engine over the built-in catalogue.
    pub fn new(history: Arc<dyn ActivityHistory>, ledger: Arc<dyn BadgeLedger>) -> Self {
        Self {
            history,
            ledger,
            rules: catalogue::RULES,
            user_locks: Arc::new(DashMap::new()),
        }
    }

    /// Engine over a custom catalogue, validated first.
    pub fn with_rules(
        history: Arc<dyn ActivityHistory>,
        ledger: Arc<dyn BadgeLedger>,
        rules: &'static [BadgeRule],
    ) -> std::result::Result<Self, CatalogueError> {
        catalogue::validate(rules)?;
        Ok(Self {
            history,
            ledger,
            rules,
            user_locks: Arc::new(DashMap::new()),
        })
    }

    /// Run one evaluation pass for `domain` and `user_id`.
    pub async fn evaluate(&self, domain: ActivityDomain, user_id: &str) -> Result<PassOutcome> {
        let span = tracing::info_span!("badge_pass", user_id, domain = %domain);
        self.evaluate_locked(domain, user_id).instrument(span).await
    }

    /// Run a pass for every domain, stopping at the first failure.
    ///
    /// Returns every badge newly granted across the passes.
    pub async fn evaluate_all(&self, user_id: &str) -> Result<Vec<String>> {
        let mut granted = Vec::new();
        for domain in ActivityDomain::ALL {
            let outcome = self.evaluate(domain, user_id).await?;
            granted.extend(outcome.granted);
        }
        Ok(granted)
    }

    async fn evaluate_locked(&self, domain: ActivityDomain, user_id: &str) -> Result<PassOutcome> {
        let lock = self
            .user_locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().await;
            self.run_pass(domain, user_id).await
        };

        drop(lock);
        // Only the map holds the lock now unless another pass is waiting on it.
        self.user_locks
            .remove_if(user_id, |_, l| Arc::strong_count(l) == 1);

        result
    }

    async fn run_pass(&self, domain: ActivityDomain, user_id: &str) -> Result<PassOutcome> {
        // 1. Snapshot of grants, read once for the whole pass
        let held: HashSet<String> = self.ledger.get_grants(user_id).await?;

        // 2. Rules still to be earned
        let (pending, skipped): (Vec<&BadgeRule>, Vec<&BadgeRule>) = self
            .rules
            .iter()
            .filter(|r| r.domain == domain)
            .partition(|r| !held.contains(r.badge_name));

        tracing::debug!(
            pending = pending.len(),
            already_held = skipped.len(),
            "Evaluating badge rules"
        );

        // 3 + 4. Evaluate and grant, in catalogue order
        let mut granted = Vec::new();
        for rule in pending {
            let qualifies = self.check(rule, user_id).await.inspect_err(|e| {
                tracing::warn!(rule = rule.key, error = %e, "Badge predicate failed, aborting pass");
            })?;

            if !qualifies {
                continue;
            }

            let created = self
                .ledger
                .grant(user_id, rule.badge_name)
                .await
                .inspect_err(|e| {
                    tracing::warn!(rule = rule.key, error = %e, "Badge grant failed, aborting pass");
                })?;

            if created {
                tracing::info!(rule = rule.key, badge = rule.badge_name, "Badge granted");
                granted.push(rule.badge_name.to_string());
            } else {
                // A concurrent pass got there first.
                tracing::debug!(
                    rule = rule.key,
                    badge = rule.badge_name,
                    "Badge already granted (idempotent skip)"
                );
            }
        }

        Ok(PassOutcome {
            domain,
            granted,
            already_held: skipped.len(),
        })
    }

    /// Evaluate one rule's predicate.
    async fn check(&self, rule: &BadgeRule, user_id: &str) -> Result<bool> {
        match rule.predicate {
            Predicate::FirstEntry => self.history.has_first_entry(rule.domain, user_id).await,
            Predicate::EntryCount(n) => {
                self.history
                    .has_reached_count(rule.domain, user_id, n)
                    .await
            }
            Predicate::ConsecutiveDays(k) => {
                self.history
                    .has_consecutive_days(rule.domain, user_id, k)
                    .await
            }
            Predicate::AllCategories(categories) => {
                self.history
                    .has_completed_all_categories(user_id, categories)
                    .await
            }
        }
    }
}
