// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static badge rule catalogue.
//!
//! Each rule is data: a key, the domain it watches, the badge it grants and
//! a predicate variant. Adding a badge means adding a row here.

use crate::models::ActivityDomain;
use std::collections::HashSet;

/// Question categories a user must cover for the "all categories" badge.
pub const REFLECTION_CATEGORIES: [&str; 7] = [
    "self_awareness",
    "relationships",
    "emotions",
    "growth",
    "gratitude",
    "purpose",
    "resilience",
];

/// What a rule checks against the activity history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// At least one qualifying record.
    FirstEntry,
    /// At least `n` qualifying records.
    EntryCount(u32),
    /// Qualifying records on at least `n` consecutive UTC days.
    ConsecutiveDays(u32),
    /// Completed reflection sessions answered every listed category.
    AllCategories(&'static [&'static str]),
}

/// One row of the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeRule {
    pub key: &'static str,
    pub domain: ActivityDomain,
    pub badge_name: &'static str,
    pub predicate: Predicate,
}

const fn rule(
    key: &'static str,
    domain: ActivityDomain,
    badge_name: &'static str,
    predicate: Predicate,
) -> BadgeRule {
    BadgeRule {
        key,
        domain,
        badge_name,
        predicate,
    }
}

use ActivityDomain::{Gratitude, Journal, MoodCheckIn, Reflection};
use Predicate::{AllCategories, ConsecutiveDays, EntryCount, FirstEntry};

/// Every badge rule. Order within a domain is the evaluation order.
pub static RULES: &[BadgeRule] = &[
    // ─── Journal ────────────────────────────────────────────────
    rule("JOURNAL_FIRST_ENTRY", Journal, "First Page", FirstEntry),
    rule("JOURNAL_3_STREAK", Journal, "Mindful Momentum", ConsecutiveDays(3)),
    rule("JOURNAL_7_STREAK", Journal, "Week of Words", ConsecutiveDays(7)),
    rule("JOURNAL_10_ENTRIES", Journal, "Storyteller", EntryCount(10)),
    rule("JOURNAL_20_ENTRIES", Journal, "Chronicler", EntryCount(20)),
    rule("JOURNAL_30_ENTRIES", Journal, "Journal Keeper", EntryCount(30)),
    // ─── Flip & Feel ────────────────────────────────────────────
    rule("FLIP_FEEL_FIRST", Reflection, "First Flip", FirstEntry),
    rule(
        "FLIP_FEEL_ALL_CATEGORIES",
        Reflection,
        "Full Spectrum",
        AllCategories(&REFLECTION_CATEGORIES),
    ),
    rule("FLIP_FEEL_7_STREAK", Reflection, "Reflective Week", ConsecutiveDays(7)),
    // ─── Mood Check-in ──────────────────────────────────────────
    rule("MOOD_7_STREAK", MoodCheckIn, "Mood Tracker", ConsecutiveDays(7)),
    rule("MOOD_14_STREAK", MoodCheckIn, "Emotional Explorer", ConsecutiveDays(14)),
    // ─── Gratitude ──────────────────────────────────────────────
    rule("GRATITUDE_FIRST_ENTRY", Gratitude, "Grateful Heart", FirstEntry),
    rule("GRATITUDE_10_ENTRIES", Gratitude, "Thankful Ten", EntryCount(10)),
    rule("GRATITUDE_25_ENTRIES", Gratitude, "Appreciation Pro", EntryCount(25)),
    rule("GRATITUDE_50_ENTRIES", Gratitude, "Gratitude Guru", EntryCount(50)),
    rule("GRATITUDE_100_ENTRIES", Gratitude, "Century of Thanks", EntryCount(100)),
    rule("GRATITUDE_3_STREAK", Gratitude, "Gratitude Habit", ConsecutiveDays(3)),
    rule("GRATITUDE_7_STREAK", Gratitude, "Week of Thanks", ConsecutiveDays(7)),
];

/// Rules that belong to `domain`, in evaluation order.
pub fn rules_for(domain: ActivityDomain) -> impl Iterator<Item = &'static BadgeRule> {
    RULES.iter().filter(move |r| r.domain == domain)
}

/// Look up a rule by key.
pub fn find(key: &str) -> Option<&'static BadgeRule> {
    RULES.iter().find(|r| r.key == key)
}

/// Check a catalogue for mistakes that would make evaluation ambiguous.
///
/// Run once at startup; a failure here is a programming error.
pub fn validate(rules: &[BadgeRule]) -> Result<(), CatalogueError> {
    for domain in ActivityDomain::ALL {
        if !rules.iter().any(|r| r.domain == domain) {
            return Err(CatalogueError::EmptyDomain(domain));
        }
    }

    let mut keys = HashSet::new();
    let mut names = HashSet::new();
    for rule in rules {
        if !keys.insert(rule.key) {
            return Err(CatalogueError::DuplicateKey(rule.key));
        }
        if !names.insert(rule.badge_name) {
            return Err(CatalogueError::DuplicateBadgeName(rule.badge_name));
        }
        match rule.predicate {
            Predicate::EntryCount(0) | Predicate::ConsecutiveDays(0) => {
                return Err(CatalogueError::ZeroThreshold(rule.key));
            }
            Predicate::AllCategories(categories) => {
                if rule.domain != ActivityDomain::Reflection {
                    return Err(CatalogueError::CategoriesOutsideReflection(rule.key));
                }
                if categories.is_empty() {
                    return Err(CatalogueError::EmptyCategorySet(rule.key));
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Catalogue validation errors.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueError {
    #[error("No badge rules for domain {0}")]
    EmptyDomain(ActivityDomain),

    #[error("Duplicate rule key: {0}")]
    DuplicateKey(&'static str),

    #[error("Duplicate badge name: {0}")]
    DuplicateBadgeName(&'static str),

    #[error("Rule {0} has a zero threshold")]
    ZeroThreshold(&'static str),

    #[error("Rule {0} checks categories outside the reflection domain")]
    CategoriesOutsideReflection(&'static str),

    #[error("Rule {0} has an empty category set")]
    EmptyCategorySet(&'static str),
}
