// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - badge evaluation logic.

pub mod catalogue;
pub mod engine;
pub mod history;
pub mod ledger;
pub mod streak;

pub use catalogue::{BadgeRule, CatalogueError, Predicate};
pub use engine::{BadgeEngine, PassOutcome};
pub use history::ActivityHistory;
pub use ledger::BadgeLedger;
