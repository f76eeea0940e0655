//! Analysis Stream Events
//!
//! The backend sends `{event_type, message}` JSON in every SSE data payload,
//! with a `message` whose shape depends on `event_type`. Payloads are decoded
//! into [`StreamEvent`] as soon as they arrive; a payload that cannot be
//! decoded becomes [`StreamEvent::Malformed`] instead of an error.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::constants::stream as wire;
use crate::types::{Overview, ReadmeStatus, RepoIdentity, RepoWikiError, Result, SectionAnalysis};

/// Decoded analysis stream event.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Start(RepoIdentity),
    Overview(Overview),
    Readme(ReadmeStatus),
    AuthAnalysis(SectionAnalysis),
    DataModelAnalysis(SectionAnalysis),
    EntryPoints(SectionAnalysis),
    Completed(Option<String>),
    Error(String),
    /// Unrecognized `event_type`, kept for logging only.
    Unknown(String),
    /// Payload that failed to decode.
    Malformed {
        event_type: Option<String>,
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct ReadmePayload {
    has_readme: bool,
    #[serde(default)]
    readme: Option<String>,
}

impl StreamEvent {
    /// Decode one SSE data payload.
    pub fn decode(data: &str) -> Self {
        let envelope: Value = match serde_json::from_str(data) {
            Ok(value) => value,
            Err(e) => {
                return StreamEvent::Malformed {
                    event_type: None,
                    reason: format!("invalid JSON envelope: {}", e),
                };
            }
        };

        let Some(event_type) = envelope.get("event_type").and_then(Value::as_str) else {
            return StreamEvent::Malformed {
                event_type: None,
                reason: "missing event_type".to_string(),
            };
        };
        let event_type = event_type.to_string();

        match Self::decode_typed(&event_type, &envelope) {
            Ok(event) => event,
            Err(e) => StreamEvent::Malformed {
                event_type: Some(event_type),
                reason: e.to_string(),
            },
        }
    }

    fn decode_typed(event_type: &str, envelope: &Value) -> Result<Self> {
        let message = envelope.get("message").cloned().unwrap_or(Value::Null);

        let event = match event_type {
            wire::EVENT_START => {
                // Identity normally rides on the envelope itself.
                let source = if message.is_object() {
                    message
                } else {
                    envelope.clone()
                };
                let identity: RepoIdentity = serde_json::from_value(source)
                    .map_err(|e| RepoWikiError::decode(event_type, e))?;
                StreamEvent::Start(identity)
            }
            wire::EVENT_OVERVIEW => StreamEvent::Overview(decode_structured(event_type, message)?),
            wire::EVENT_README => {
                let payload: ReadmePayload = decode_structured(event_type, message)?;
                StreamEvent::Readme(readme_status(payload)?)
            }
            wire::EVENT_AUTH_ANALYSIS => {
                StreamEvent::AuthAnalysis(decode_structured(event_type, message)?)
            }
            wire::EVENT_DATA_MODEL_ANALYSIS => {
                StreamEvent::DataModelAnalysis(decode_structured(event_type, message)?)
            }
            wire::EVENT_ENTRY_POINTS => {
                StreamEvent::EntryPoints(decode_structured(event_type, message)?)
            }
            wire::EVENT_COMPLETED => StreamEvent::Completed(message_text(&message)),
            wire::EVENT_ERROR => StreamEvent::Error(message_text(&message).unwrap_or_default()),
            other => StreamEvent::Unknown(other.to_string()),
        };

        Ok(event)
    }

    /// Wire name of the event.
    pub fn event_type(&self) -> &str {
        match self {
            StreamEvent::Start(_) => wire::EVENT_START,
            StreamEvent::Overview(_) => wire::EVENT_OVERVIEW,
            StreamEvent::Readme(_) => wire::EVENT_README,
            StreamEvent::AuthAnalysis(_) => wire::EVENT_AUTH_ANALYSIS,
            StreamEvent::DataModelAnalysis(_) => wire::EVENT_DATA_MODEL_ANALYSIS,
            StreamEvent::EntryPoints(_) => wire::EVENT_ENTRY_POINTS,
            StreamEvent::Completed(_) => wire::EVENT_COMPLETED,
            StreamEvent::Error(_) => wire::EVENT_ERROR,
            StreamEvent::Unknown(name) => name,
            StreamEvent::Malformed { event_type, .. } => {
                event_type.as_deref().unwrap_or("<malformed>")
            }
        }
    }

    /// `completed` and `error` end the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed(_) | StreamEvent::Error(_))
    }
}

/// Data payload of an application-level `error` event.
pub fn error_payload(message: &str) -> String {
    json!({ "event_type": wire::EVENT_ERROR, "message": message }).to_string()
}

/// Messages arrive as JSON text that needs a second decode; already
/// structured objects are accepted as-is.
fn decode_structured<T: DeserializeOwned>(event_type: &str, message: Value) -> Result<T> {
    match message {
        Value::String(text) => {
            serde_json::from_str(&text).map_err(|e| RepoWikiError::decode(event_type, e))
        }
        object @ Value::Object(_) => {
            serde_json::from_value(object).map_err(|e| RepoWikiError::decode(event_type, e))
        }
        Value::Null => Err(RepoWikiError::decode(event_type, "missing message")),
        other => Err(RepoWikiError::decode(
            event_type,
            format!("unexpected message: {}", other),
        )),
    }
}

fn readme_status(payload: ReadmePayload) -> Result<ReadmeStatus> {
    if !payload.has_readme {
        return Ok(ReadmeStatus::Missing);
    }
    match payload.readme {
        Some(path) if !path.is_empty() => Ok(ReadmeStatus::Present { path }),
        _ => Err(RepoWikiError::decode(
            wire::EVENT_README,
            "has_readme is true but no readme path was sent",
        )),
    }
}

fn message_text(message: &Value) -> Option<String> {
    match message {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
