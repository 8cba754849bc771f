// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event push routes.
//!
//! The push subscription redelivers any message whose request does not get a
//! 2xx. Malformed or unknown events are answered with 400 and never reach the
//! engine; a failed evaluation pass is answered with 500 so the event comes
//! back later.

use crate::error::{AppError, Result};
use crate::models::event::validate_user_id;
use crate::models::PushEnvelope;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Event routes (called by the push subscription).
/// The token middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events/push", post(handle_push))
        .route("/events/reevaluate", post(reevaluate))
}

/// Handle one pushed activity event.
async fn handle_push(State(state): State<Arc<AppState>>, body: Bytes) -> Result<StatusCode> {
    let envelope: PushEnvelope = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected malformed push envelope");
        AppError::BadRequest(format!("Malformed push envelope: {}", e))
    })?;

    let event = envelope.decode_event().map_err(|e| {
        tracing::warn!(
            message_id = ?envelope.message.message_id,
            error = %e,
            "Rejected activity event"
        );
        AppError::from(e)
    })?;

    tracing::info!(
        message_id = ?envelope.message.message_id,
        correlation_id = ?event.correlation_id,
        event_type = event.event_type.as_str(),
        user_id = %event.user_id,
        "Processing activity event"
    );

    match state.engine.evaluate(event.domain(), &event.user_id).await {
        Ok(outcome) => {
            tracing::info!(
                correlation_id = ?event.correlation_id,
                user_id = %event.user_id,
                domain = %outcome.domain,
                granted = ?outcome.granted,
                already_held = outcome.already_held,
                "Badge pass complete"
            );
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            tracing::error!(
                correlation_id = ?event.correlation_id,
                user_id = %event.user_id,
                error = %e,
                "Badge pass failed, event will be redelivered"
            );
            Err(e)
        }
    }
}

/// Re-evaluation request body.
#[derive(Deserialize)]
struct ReevaluateRequest {
    user_id: String,
}

/// Re-evaluation response.
#[derive(Serialize)]
pub struct ReevaluateResponse {
    pub user_id: String,
    pub granted: Vec<String>,
}

/// Run every domain's pass for one user (backfill or repair).
async fn reevaluate(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ReevaluateResponse>> {
    let request: ReevaluateRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed request: {}", e)))?;

    let user_id = validate_user_id(&request.user_id)?;

    tracing::info!(user_id, "Re-evaluating all badge domains");
    let granted = state.engine.evaluate_all(user_id).await?;
    tracing::info!(user_id, granted = ?granted, "Re-evaluation complete");

    Ok(Json(ReevaluateResponse {
        user_id: user_id.to_string(),
        granted,
    }))
}
