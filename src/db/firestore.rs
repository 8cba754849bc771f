// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper implementing the activity history and the badge
//! ledger.
//!
//! Activity collections are written by the recording services; this client
//! only reads them. The only document it writes is a badge grant.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    ActivityDomain, ActivityRecord, FlipFeelResponse, FlipFeelSession, GratitudeEntry,
    JournalEntry, MoodCheckIn, UserBadge,
};
use crate::services::{streak, ActivityHistory, BadgeLedger};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use firestore::errors::FirestoreError;
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, HashSet};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Get the raw client or return an error if offline.
    ///
    /// Exposed for integration tests that seed activity documents.
    pub fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Activity Queries ────────────────────────────────────────

    /// Fetch a user's documents from an activity collection.
    async fn user_docs<T>(
        &self,
        collection: &str,
        user_id: &str,
        query: ActivityQuery,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        let user_id = user_id.to_string();
        let completed_only = query.completed_only;
        let select = self
            .get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    completed_only
                        .then(|| q.field("completed_at").is_not_null())
                        .flatten(),
                ])
            });

        let select = if let Some(n) = query.limit {
            select.limit(n)
        } else {
            select
        };

        select
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Qualifying times of a user's records of type `T`, at most `limit`.
    async fn record_times<T>(
        &self,
        domain: ActivityDomain,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<DateTime<Utc>>, AppError>
    where
        T: ActivityRecord + DeserializeOwned + Send,
    {
        let docs: Vec<T> = self
            .user_docs(
                domain_collection(domain),
                user_id,
                ActivityQuery::for_domain(domain, limit),
            )
            .await?;

        let mut stamps: Vec<DateTime<Utc>> = docs.iter().filter_map(T::qualifying_at).collect();
        if let Some(n) = limit {
            stamps.truncate(n as usize);
        }
        Ok(stamps)
    }

    /// Timestamps of a user's qualifying records in `domain`, up to `limit`.
    async fn qualifying_timestamps(
        &self,
        domain: ActivityDomain,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<DateTime<Utc>>, AppError> {
        match domain {
            ActivityDomain::Journal => {
                self.record_times::<JournalEntry>(domain, user_id, limit)
                    .await
            }
            ActivityDomain::Gratitude => {
                self.record_times::<GratitudeEntry>(domain, user_id, limit)
                    .await
            }
            ActivityDomain::MoodCheckIn => {
                self.record_times::<MoodCheckIn>(domain, user_id, limit)
                    .await
            }
            ActivityDomain::Reflection => {
                self.record_times::<FlipFeelSession>(domain, user_id, limit)
                    .await
            }
        }
    }
}

/// Collection holding the records of `domain`.
fn domain_collection(domain: ActivityDomain) -> &'static str {
    match domain {
        ActivityDomain::Journal => collections::JOURNAL_ENTRIES,
        ActivityDomain::Reflection => collections::FLIP_FEEL_SESSIONS,
        ActivityDomain::MoodCheckIn => collections::MOOD_CHECK_INS,
        ActivityDomain::Gratitude => collections::GRATITUDE_ENTRIES,
    }
}

/// Server-side shape of an activity query.
#[derive(Debug, Clone, Copy, Default)]
struct ActivityQuery {
    completed_only: bool,
    limit: Option<u32>,
}

impl ActivityQuery {
    fn for_domain(domain: ActivityDomain, limit: Option<u32>) -> Self {
        Self {
            completed_only: domain.requires_completion(),
            // Soft-deleted documents are dropped after decoding, since
            // documents written without `is_deleted` are live and an equality
            // filter would skip them. A server-side limit would then undercount.
            limit: if domain.supports_soft_delete() {
                None
            } else {
                limit
            },
        }
    }
}

#[async_trait]
impl ActivityHistory for FirestoreDb {
    async fn has_first_entry(&self, domain: ActivityDomain, user_id: &str) -> Result<bool, AppError> {
        let found = self.qualifying_timestamps(domain, user_id, Some(1)).await?;
        Ok(!found.is_empty())
    }

    async fn has_reached_count(
        &self,
        domain: ActivityDomain,
        user_id: &str,
        n: u32,
    ) -> Result<bool, AppError> {
        // Reading `n` documents is enough to answer the question.
        let found = self.qualifying_timestamps(domain, user_id, Some(n)).await?;
        Ok(found.len() >= n as usize)
    }

    async fn activity_days(
        &self,
        domain: ActivityDomain,
        user_id: &str,
    ) -> Result<BTreeSet<NaiveDate>, AppError> {
        let stamps = self.qualifying_timestamps(domain, user_id, None).await?;
        Ok(streak::distinct_days(stamps))
    }

    async fn completed_categories(&self, user_id: &str) -> Result<HashSet<String>, AppError> {
        let (sessions, responses) = futures_util::future::try_join(
            self.user_docs::<FlipFeelSession>(
                collections::FLIP_FEEL_SESSIONS,
                user_id,
                ActivityQuery::for_domain(ActivityDomain::Reflection, None),
            ),
            self.user_docs::<FlipFeelResponse>(
                collections::FLIP_FEEL_RESPONSES,
                user_id,
                ActivityQuery::default(),
            ),
        )
        .await?;

        let completed: HashSet<String> = sessions
            .into_iter()
            .filter(|s| s.is_completed())
            .map(|s| s.session_id)
            .collect();

        Ok(responses
            .into_iter()
            .filter(|r| completed.contains(&r.session_id))
            .map(|r| r.question_category)
            .collect())
    }
}

#[async_trait]
impl BadgeLedger for FirestoreDb {
    async fn get_grants(&self, user_id: &str) -> Result<HashSet<String>, AppError> {
        let user_id = user_id.to_string();
        let badges: Vec<UserBadge> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USER_BADGES)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(badges.into_iter().map(|b| b.badge_name).collect())
    }

    /// Create-only insert at a deterministic document ID. Firestore rejects
    /// the insert with a conflict when the document exists, which makes the
    /// write atomic per (user, badge).
    async fn grant(&self, user_id: &str, badge_name: &str) -> Result<bool, AppError> {
        let badge = UserBadge::new(user_id, badge_name);
        let doc_id = UserBadge::document_id(user_id, badge_name);

        let result: Result<UserBadge, FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USER_BADGES)
            .document_id(&doc_id)
            .object(&badge)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(FirestoreError::DataConflictError(_)) => {
                tracing::debug!(user_id, badge = badge_name, "Grant already exists");
                Ok(false)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }
}
