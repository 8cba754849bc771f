// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod badge;
pub mod domain;
pub mod event;

pub use activity::{
    ActivityRecord, FlipFeelResponse, FlipFeelSession, GratitudeEntry, JournalEntry, MoodCheckIn,
};
pub use badge::UserBadge;
pub use domain::ActivityDomain;
pub use event::{ActivityEvent, EventType, PushEnvelope};
