// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Granted badge record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A badge granted to a user. At most one exists per (user_id, badge_name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBadge {
    pub user_id: String,
    /// Human-readable badge name (e.g. "Mindful Momentum")
    pub badge_name: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub granted_at: DateTime<Utc>,
}

impl UserBadge {
    pub fn new(user_id: &str, badge_name: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            badge_name: badge_name.to_string(),
            granted_at: Utc::now(),
        }
    }

    /// Firestore document ID. Deterministic so a repeated grant hits the
    /// same document.
    pub fn document_id(user_id: &str, badge_name: &str) -> String {
        format!("{}:{}", urlencoding::encode(user_id), urlencoding::encode(badge_name))
    }
}
