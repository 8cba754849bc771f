//! Storage layer (Firestore, plus an in-memory store for tests).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::{MemoryStore, QueryKind};

/// Collection names as constants.
pub mod collections {
    pub const JOURNAL_ENTRIES: &str = "journal_entries";
    pub const MOOD_CHECK_INS: &str = "mood_check_ins";
    pub const GRATITUDE_ENTRIES: &str = "gratitude_entries";
    pub const FLIP_FEEL_SESSIONS: &str = "flip_feel_sessions";
    /// Answers within reflection sessions, carrying the question category
    pub const FLIP_FEEL_RESPONSES: &str = "flip_feel_responses";
    /// Badge grants (document ID: `{user_id}:{badge_name}`, URL-encoded)
    pub const USER_BADGES: &str = "user_badges";
}
