// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Badge worker: grants achievement badges from user activity events.
//!
//! Activity events arrive through a Pub/Sub push subscription. Each event
//! triggers one evaluation pass over the badge rules of its domain, reading
//! the user's stored activity history and granting every newly earned badge
//! exactly once.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::BadgeEngine;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub engine: BadgeEngine,
}
