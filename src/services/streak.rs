// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consecutive-day run detection.
//!
//! Every domain answers streak questions the same way: reduce the user's
//! records to distinct UTC calendar dates, then find the longest run of
//! day-adjacent dates.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::collections::{BTreeSet, HashMap};

/// Collapse timestamps into their distinct UTC calendar dates.
pub fn distinct_days<I>(timestamps: I) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    timestamps.into_iter().map(|t| t.date_naive()).collect()
}

/// Length of the longest run of consecutive days in `days`.
///
/// Numbering the sorted dates 0, 1, 2, ... and subtracting that rank from
/// each date maps every date in an unbroken run to the same anchor date, so
/// the largest group of equal anchors is the longest run.
pub fn longest_run(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut groups: HashMap<i64, u32> = HashMap::new();
    for (rank, day) in days.iter().enumerate() {
        let anchor = day.num_days_from_ce() as i64 - rank as i64;
        *groups.entry(anchor).or_insert(0) += 1;
    }
    groups.into_values().max().unwrap_or(0)
}

/// Whether `days` contains a run of at least `k` consecutive dates.
pub fn has_run_of(days: &BTreeSet<NaiveDate>, k: u32) -> bool {
    if k == 0 {
        return true;
    }
    // A run can never be longer than the number of distinct days.
    if (days.len() as u64) < k as u64 {
        return false;
    }
    longest_run(days) >= k
}
