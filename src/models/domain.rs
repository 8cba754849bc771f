// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity domains that feed badge rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four activity categories whose history feeds badge predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityDomain {
    Journal,
    /// Flip & Feel reflection sessions.
    Reflection,
    MoodCheckIn,
    Gratitude,
}

impl ActivityDomain {
    /// Every domain, in the order `evaluate_all` walks them.
    pub const ALL: [ActivityDomain; 4] = [
        ActivityDomain::Journal,
        ActivityDomain::Reflection,
        ActivityDomain::MoodCheckIn,
        ActivityDomain::Gratitude,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityDomain::Journal => "journal",
            ActivityDomain::Reflection => "reflection",
            ActivityDomain::MoodCheckIn => "mood_check_in",
            ActivityDomain::Gratitude => "gratitude",
        }
    }

    /// Whether records in this domain carry a soft-delete flag.
    pub fn supports_soft_delete(&self) -> bool {
        matches!(self, ActivityDomain::Journal | ActivityDomain::Gratitude)
    }

    /// Whether only finished records count (reflection sessions with a
    /// completion time).
    pub fn requires_completion(&self) -> bool {
        matches!(self, ActivityDomain::Reflection)
    }
}

impl fmt::Display for ActivityDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
