// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity event notifications and the Pub/Sub push envelope they arrive in.

use crate::models::ActivityDomain;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Longest user ID we accept from a payload.
const MAX_USER_ID_LEN: usize = 128;

/// Event type tag published by the recording services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "journal.entry.created")]
    JournalEntryCreated,
    #[serde(rename = "flipfeel.session.completed")]
    FlipFeelSessionCompleted,
    #[serde(rename = "mood.checkin.created")]
    MoodCheckInCreated,
    #[serde(rename = "gratitude.entry.created")]
    GratitudeEntryCreated,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::JournalEntryCreated => "journal.entry.created",
            EventType::FlipFeelSessionCompleted => "flipfeel.session.completed",
            EventType::MoodCheckInCreated => "mood.checkin.created",
            EventType::GratitudeEntryCreated => "gratitude.entry.created",
        }
    }

    /// The activity domain whose badges this event can unlock.
    pub fn domain(&self) -> ActivityDomain {
        match self {
            EventType::JournalEntryCreated => ActivityDomain::Journal,
            EventType::FlipFeelSessionCompleted => ActivityDomain::Reflection,
            EventType::MoodCheckInCreated => ActivityDomain::MoodCheckIn,
            EventType::GratitudeEntryCreated => ActivityDomain::Gratitude,
        }
    }
}

impl FromStr for EventType {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "journal.entry.created" => Ok(EventType::JournalEntryCreated),
            "flipfeel.session.completed" => Ok(EventType::FlipFeelSessionCompleted),
            "mood.checkin.created" => Ok(EventType::MoodCheckInCreated),
            "gratitude.entry.created" => Ok(EventType::GratitudeEntryCreated),
            other => Err(EventError::UnknownEventType(other.to_string())),
        }
    }
}

/// Decoded activity event.
///
/// `correlation_id` and `timestamp` are logged but play no part in
/// evaluation. `timestamp` is kept as sent; a value that does not parse as
/// RFC 3339 must not cost the user their badge pass.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEvent {
    pub event_type: EventType,
    pub user_id: String,
    pub correlation_id: Option<String>,
    pub timestamp: Option<String>,
}

/// Wire shape of the event before the type tag is checked.
#[derive(Deserialize)]
struct RawActivityEvent {
    event_type: String,
    user_id: String,
    #[serde(default)]
    correlation_id: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

/// Trim a user ID from a payload and check it is usable as a lookup key.
pub fn validate_user_id(raw: &str) -> Result<&str, EventError> {
    let user_id = raw.trim();
    if user_id.is_empty() {
        return Err(EventError::MissingUserId);
    }
    if user_id.len() > MAX_USER_ID_LEN {
        return Err(EventError::Malformed("user_id too long".to_string()));
    }
    Ok(user_id)
}

impl ActivityEvent {
    /// Parse an event from its JSON encoding.
    pub fn from_json(bytes: &[u8]) -> Result<Self, EventError> {
        let raw: RawActivityEvent =
            serde_json::from_slice(bytes).map_err(|e| EventError::Malformed(e.to_string()))?;

        let event_type = raw.event_type.parse::<EventType>()?;

        let user_id = validate_user_id(&raw.user_id)?;

        Ok(Self {
            event_type,
            user_id: user_id.to_string(),
            correlation_id: raw.correlation_id,
            timestamp: raw.timestamp,
        })
    }

    pub fn domain(&self) -> ActivityDomain {
        self.event_type.domain()
    }
}

/// Pub/Sub push request body.
#[derive(Debug, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

/// The message inside a push envelope. `data` is base64-encoded JSON.
#[derive(Debug, Deserialize)]
pub struct PushMessage {
    #[serde(default)]
    pub data: String,
    #[serde(rename = "messageId", default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl PushEnvelope {
    /// Decode the activity event carried by this envelope.
    pub fn decode_event(&self) -> Result<ActivityEvent, EventError> {
        if self.message.data.is_empty() {
            return Err(EventError::Malformed("empty message data".to_string()));
        }
        let bytes = BASE64
            .decode(self.message.data.as_bytes())
            .map_err(|e| EventError::InvalidBase64(e.to_string()))?;
        ActivityEvent::from_json(&bytes)
    }
}

/// Errors from decoding an inbound event. All of them are permanent: the
/// message is rejected and never reaches the engine.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Message data is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("Malformed event payload: {0}")]
    Malformed(String),

    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    #[error("Event has no user_id")]
    MissingUserId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope_for(payload: serde_json::Value) -> PushEnvelope {
        PushEnvelope {
            message: PushMessage {
                data: BASE64.encode(payload.to_string()),
                message_id: Some("1".to_string()),
                attributes: HashMap::new(),
            },
            subscription: None,
        }
    }

    #[test]
    fn test_decode_journal_event() {
        let envelope = envelope_for(json!({
            "event_type": "journal.entry.created",
            "user_id": "user-42",
            "correlation_id": "abc",
            "timestamp": "2026-03-01T08:00:00Z"
        }));

        let event = envelope.decode_event().unwrap();
        assert_eq!(event.event_type, EventType::JournalEntryCreated);
        assert_eq!(event.domain(), ActivityDomain::Journal);
        assert_eq!(event.user_id, "user-42");
        assert_eq!(event.correlation_id.as_deref(), Some("abc"));
        assert!(event.timestamp.is_some());
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let event = ActivityEvent::from_json(
            br#"{"event_type":"mood.checkin.created","user_id":"u"}"#,
        )
        .unwrap();
        assert_eq!(event.domain(), ActivityDomain::MoodCheckIn);
        assert!(event.correlation_id.is_none());
    }

    #[test]
    fn test_unknown_event_type_rejected() {
        let err = ActivityEvent::from_json(br#"{"event_type":"sleep.logged","user_id":"u"}"#)
            .unwrap_err();
        assert!(matches!(err, EventError::UnknownEventType(t) if t == "sleep.logged"));
    }

    #[test]
    fn test_blank_user_id_rejected() {
        let err = ActivityEvent::from_json(
            br#"{"event_type":"journal.entry.created","user_id":"   "}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EventError::MissingUserId));
    }

    #[test]
    fn test_timestamp_without_offset_accepted() {
        for timestamp in ["2026-03-01T09:00:00", "2026-03-01", "yesterday"] {
            let payload = json!({
                "event_type": "journal.entry.created",
                "user_id": "u",
                "timestamp": timestamp
            });
            let event = ActivityEvent::from_json(payload.to_string().as_bytes()).unwrap();
            assert_eq!(event.domain(), ActivityDomain::Journal);
            assert_eq!(event.timestamp.as_deref(), Some(timestamp));
        }
    }

    #[test]
    fn test_overlong_user_id_rejected() {
        let long = "x".repeat(MAX_USER_ID_LEN + 1);
        assert!(matches!(
            validate_user_id(&long),
            Err(EventError::Malformed(_))
        ));
        assert_eq!(validate_user_id("  u-1 ").unwrap(), "u-1");
    }

    #[test]
    fn test_bad_base64_rejected() {
        let envelope = PushEnvelope {
            message: PushMessage {
                data: "!!not base64!!".to_string(),
                message_id: None,
                attributes: HashMap::new(),
            },
            subscription: None,
        };
        assert!(matches!(
            envelope.decode_event(),
            Err(EventError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_event_type_domain_mapping() {
        for (tag, domain) in [
            ("journal.entry.created", ActivityDomain::Journal),
            ("flipfeel.session.completed", ActivityDomain::Reflection),
            ("mood.checkin.created", ActivityDomain::MoodCheckIn),
            ("gratitude.entry.created", ActivityDomain::Gratitude),
        ] {
            let event_type: EventType = tag.parse().unwrap();
            assert_eq!(event_type.as_str(), tag);
            assert_eq!(event_type.domain(), domain);
        }
    }
}
