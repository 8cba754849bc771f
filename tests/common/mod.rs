// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use badge_worker::config::Config;
use badge_worker::db::{FirestoreDb, MemoryStore};
use badge_worker::models::{
    FlipFeelResponse, FlipFeelSession, GratitudeEntry, JournalEntry, MoodCheckIn,
};
use badge_worker::routes::create_router;
use badge_worker::services::BadgeEngine;
use badge_worker::AppState;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Build an engine whose history and ledger are both `store`.
#[allow(dead_code)]
pub fn engine_over(store: &Arc<MemoryStore>) -> BadgeEngine {
    BadgeEngine::new(store.clone(), store.clone())
}

/// Create a test app over an in-memory store.
/// Returns the router, the shared state and the store for seeding.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState {
        config: Config::default(),
        engine: engine_over(&store),
    });
    (create_router(state.clone()), state, store)
}

/// Create a test app whose storage is offline; every query fails.
#[allow(dead_code)]
pub fn create_offline_test_app() -> axum::Router {
    let db = Arc::new(FirestoreDb::new_mock());
    let state = Arc::new(AppState {
        config: Config::default(),
        engine: BadgeEngine::new(db.clone(), db),
    });
    create_router(state)
}

/// Day `offset` after a fixed base date, at 09:00 UTC.
#[allow(dead_code)]
pub fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap() + Duration::days(offset)
}

#[allow(dead_code)]
pub fn journal(user_id: &str, at: DateTime<Utc>) -> JournalEntry {
    JournalEntry {
        user_id: user_id.to_string(),
        created_at: at,
        is_deleted: false,
    }
}

#[allow(dead_code)]
pub fn deleted_journal(user_id: &str, at: DateTime<Utc>) -> JournalEntry {
    JournalEntry {
        is_deleted: true,
        ..journal(user_id, at)
    }
}

#[allow(dead_code)]
pub fn gratitude(user_id: &str, at: DateTime<Utc>) -> GratitudeEntry {
    GratitudeEntry {
        user_id: user_id.to_string(),
        created_at: at,
        is_deleted: false,
    }
}

#[allow(dead_code)]
pub fn mood(user_id: &str, at: DateTime<Utc>) -> MoodCheckIn {
    MoodCheckIn {
        user_id: user_id.to_string(),
        created_at: at,
    }
}

/// A reflection session; `completed` sets `completed_at` one hour after start.
#[allow(dead_code)]
pub fn session(user_id: &str, session_id: &str, at: DateTime<Utc>, completed: bool) -> FlipFeelSession {
    FlipFeelSession {
        session_id: session_id.to_string(),
        user_id: user_id.to_string(),
        created_at: at,
        completed_at: completed.then(|| at + Duration::hours(1)),
    }
}

#[allow(dead_code)]
pub fn response(user_id: &str, session_id: &str, category: &str) -> FlipFeelResponse {
    FlipFeelResponse {
        session_id: session_id.to_string(),
        user_id: user_id.to_string(),
        question_category: category.to_string(),
        created_at: day(0),
    }
}
