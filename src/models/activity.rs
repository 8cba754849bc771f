// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity records written by the recording services.
//!
//! This crate only reads these documents. Field names match what the
//! recording services store in Firestore.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored activity record as badge queries see it.
pub trait ActivityRecord {
    /// When the record counts toward badges, or `None` if it does not count
    /// (soft-deleted entries, unfinished reflection sessions).
    fn qualifying_at(&self) -> Option<DateTime<Utc>>;
}

/// A journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub user_id: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Soft-deleted entries are ignored by every badge query. A missing
    /// field means the entry is live.
    #[serde(default)]
    pub is_deleted: bool,
}

impl ActivityRecord for JournalEntry {
    fn qualifying_at(&self) -> Option<DateTime<Utc>> {
        (!self.is_deleted).then_some(self.created_at)
    }
}

/// A mood check-in. Check-ins are never soft-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodCheckIn {
    pub user_id: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord for MoodCheckIn {
    fn qualifying_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

/// A gratitude entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GratitudeEntry {
    pub user_id: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl ActivityRecord for GratitudeEntry {
    fn qualifying_at(&self) -> Option<DateTime<Utc>> {
        (!self.is_deleted).then_some(self.created_at)
    }
}

/// A Flip & Feel reflection session.
///
/// Only sessions with `completed_at` set count toward badges, and their
/// streak days are taken from the completion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipFeelSession {
    /// Document ID of the session
    pub session_id: String,
    pub user_id: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl FlipFeelSession {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

impl ActivityRecord for FlipFeelSession {
    fn qualifying_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

/// One answered question inside a reflection session.
///
/// `question_category` is denormalized from the question catalogue when the
/// response is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipFeelResponse {
    pub session_id: String,
    pub user_id: String,
    pub question_category: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
}
