// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store for tests and offline runs.
//!
//! Implements both the activity history and the badge ledger. Individual
//! query kinds can be made to fail to simulate a storage outage.

use crate::error::{AppError, Result};
use crate::models::{
    ActivityDomain, ActivityRecord, FlipFeelResponse, FlipFeelSession, GratitudeEntry,
    JournalEntry, MoodCheckIn, UserBadge,
};
use crate::services::{streak, ActivityHistory, BadgeLedger};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::{DashMap, DashSet};
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Storage operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    FirstEntry,
    Count,
    Days,
    Categories,
    GetGrants,
    Grant,
}

/// In-memory activity history and badge ledger.
#[derive(Default)]
pub struct MemoryStore {
    journal: DashMap<String, Vec<JournalEntry>>,
    moods: DashMap<String, Vec<MoodCheckIn>>,
    gratitude: DashMap<String, Vec<GratitudeEntry>>,
    sessions: DashMap<String, Vec<FlipFeelSession>>,
    responses: DashMap<String, Vec<FlipFeelResponse>>,
    /// Keyed by (user_id, badge_name)
    grants: DashMap<(String, String), UserBadge>,
    /// Number of `grant` calls, including idempotent no-ops
    grant_calls: AtomicUsize,
    failing: DashSet<QueryKind>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Seeding ─────────────────────────────────────────────────

    pub fn insert_journal_entry(&self, entry: JournalEntry) {
        self.journal
            .entry(entry.user_id.clone())
            .or_default()
            .push(entry);
    }

    pub fn insert_mood_check_in(&self, check_in: MoodCheckIn) {
        self.moods
            .entry(check_in.user_id.clone())
            .or_default()
            .push(check_in);
    }

    pub fn insert_gratitude_entry(&self, entry: GratitudeEntry) {
        self.gratitude
            .entry(entry.user_id.clone())
            .or_default()
            .push(entry);
    }

    pub fn insert_flip_feel_session(&self, session: FlipFeelSession) {
        self.sessions
            .entry(session.user_id.clone())
            .or_default()
            .push(session);
    }

    pub fn insert_flip_feel_response(&self, response: FlipFeelResponse) {
        self.responses
            .entry(response.user_id.clone())
            .or_default()
            .push(response);
    }

    // ─── Failure injection ───────────────────────────────────────

    /// Make every subsequent `kind` query fail with a database error.
    pub fn fail_on(&self, kind: QueryKind) {
        self.failing.insert(kind);
    }

    pub fn clear_failures(&self) {
        self.failing.clear();
    }

    fn check_available(&self, kind: QueryKind) -> Result<()> {
        if self.failing.contains(&kind) {
            return Err(AppError::Database(format!(
                "simulated storage outage ({:?})",
                kind
            )));
        }
        Ok(())
    }

    // ─── Inspection ──────────────────────────────────────────────

    /// Number of grant records stored for the user.
    pub fn grant_count(&self, user_id: &str) -> usize {
        self.grants.iter().filter(|e| e.key().0 == user_id).count()
    }

    /// Total `grant` calls made against this store.
    pub fn grant_calls(&self) -> usize {
        self.grant_calls.load(Ordering::SeqCst)
    }

    /// Timestamps of the user's qualifying records in `domain`.
    fn qualifying_timestamps(&self, domain: ActivityDomain, user_id: &str) -> Vec<DateTime<Utc>> {
        match domain {
            ActivityDomain::Journal => record_times(&self.journal, user_id),
            ActivityDomain::Gratitude => record_times(&self.gratitude, user_id),
            ActivityDomain::MoodCheckIn => record_times(&self.moods, user_id),
            ActivityDomain::Reflection => record_times(&self.sessions, user_id),
        }
    }
}

fn record_times<T: ActivityRecord>(
    records: &DashMap<String, Vec<T>>,
    user_id: &str,
) -> Vec<DateTime<Utc>> {
    records
        .get(user_id)
        .map(|v| v.iter().filter_map(T::qualifying_at).collect())
        .unwrap_or_default()
}

#[async_trait]
impl ActivityHistory for MemoryStore {
    async fn has_first_entry(&self, domain: ActivityDomain, user_id: &str) -> Result<bool> {
        self.check_available(QueryKind::FirstEntry)?;
        Ok(!self.qualifying_timestamps(domain, user_id).is_empty())
    }

    async fn has_reached_count(
        &self,
        domain: ActivityDomain,
        user_id: &str,
        n: u32,
    ) -> Result<bool> {
        self.check_available(QueryKind::Count)?;
        Ok(self.qualifying_timestamps(domain, user_id).len() >= n as usize)
    }

    async fn activity_days(
        &self,
        domain: ActivityDomain,
        user_id: &str,
    ) -> Result<BTreeSet<NaiveDate>> {
        self.check_available(QueryKind::Days)?;
        Ok(streak::distinct_days(
            self.qualifying_timestamps(domain, user_id),
        ))
    }

    async fn completed_categories(&self, user_id: &str) -> Result<HashSet<String>> {
        self.check_available(QueryKind::Categories)?;

        let completed: HashSet<String> = self
            .sessions
            .get(user_id)
            .map(|v| {
                v.iter()
                    .filter(|s| s.is_completed())
                    .map(|s| s.session_id.clone())
                    .collect()
            })
            .unwrap_or_default();

        Ok(self
            .responses
            .get(user_id)
            .map(|v| {
                v.iter()
                    .filter(|r| completed.contains(&r.session_id))
                    .map(|r| r.question_category.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl BadgeLedger for MemoryStore {
    async fn get_grants(&self, user_id: &str) -> Result<HashSet<String>> {
        self.check_available(QueryKind::GetGrants)?;
        Ok(self
            .grants
            .iter()
            .filter(|e| e.key().0 == user_id)
            .map(|e| e.key().1.clone())
            .collect())
    }

    async fn grant(&self, user_id: &str, badge_name: &str) -> Result<bool> {
        self.check_available(QueryKind::Grant)?;
        self.grant_calls.fetch_add(1, Ordering::SeqCst);

        // The entry API holds the shard lock, so check-and-insert is atomic.
        let key = (user_id.to_string(), badge_name.to_string());
        let mut created = false;
        self.grants.entry(key).or_insert_with(|| {
            created = true;
            UserBadge::new(user_id, badge_name)
        });
        Ok(created)
    }
}
