// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Push subscription authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Query parameters appended to the push endpoint URL by the subscription.
#[derive(Deserialize)]
pub struct PushAuthParams {
    #[serde(default)]
    token: Option<String>,
}

/// Require a valid `?token=` on `/events/*` routes.
pub async fn require_push_token(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PushAuthParams>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let expected = state.config.push_verify_token.as_bytes();
    let is_valid = params
        .token
        .as_deref()
        .is_some_and(|t| bool::from(t.as_bytes().ct_eq(expected)));

    if !is_valid {
        tracing::warn!(
            path = %request.uri().path(),
            token_present = params.token.is_some(),
            "Blocked push request with invalid token"
        );
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
