//! Server-issued CLI session events and their human-readable labels.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub const TEST_EVENT: &str = "OneGraphNetlifyCliSessionTestEvent";
pub const GENERATE_HANDLER_EVENT: &str = "OneGraphNetlifyCliSessionGenerateHandlerEvent";
pub const PERSISTED_LIBRARY_UPDATED_EVENT: &str =
    "OneGraphNetlifyCliSessionPersistedLibraryUpdatedEvent";
pub const OPEN_FILE_EVENT: &str = "OneGraphNetlifyCliSessionOpenFileEvent";

/// Upper bound on test-wrapper nesting followed by [`describe_event`].
pub const MAX_DESCRIBE_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateHandlerPayload {
    #[serde(default)]
    pub cli_session_id: Option<String>,
    #[serde(default)]
    pub operation_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLibraryPayload {
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub schema_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenFilePayload {
    #[serde(default)]
    pub file_path: Option<String>,
}

/// Event discriminant with its kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Test wrapper; `payload` is itself an event (`__typename` + `payload`).
    Test { payload: Value },
    GenerateHandler(GenerateHandlerPayload),
    PersistedLibraryUpdated(PersistedLibraryPayload),
    OpenFile(OpenFilePayload),
    Unrecognized { typename: String, payload: Value },
}

impl EventKind {
    /// Resolve a discriminant and payload. Known kinds with a payload of the
    /// wrong shape are kept as [`EventKind::Unrecognized`].
    pub fn from_parts(typename: &str, payload: Value) -> Self {
        let unrecognized = |payload: Value| Self::Unrecognized {
            typename: typename.to_owned(),
            payload,
        };
        match typename {
            TEST_EVENT => Self::Test { payload },
            GENERATE_HANDLER_EVENT => parse_payload(&payload)
                .map(Self::GenerateHandler)
                .unwrap_or_else(|| unrecognized(payload)),
            PERSISTED_LIBRARY_UPDATED_EVENT => parse_payload(&payload)
                .map(Self::PersistedLibraryUpdated)
                .unwrap_or_else(|| unrecognized(payload)),
            OPEN_FILE_EVENT => parse_payload(&payload)
                .map(Self::OpenFile)
                .unwrap_or_else(|| unrecognized(payload)),
            _ => unrecognized(payload),
        }
    }

    /// Resolve an event-shaped value: `{"__typename": .., "payload": ..}`.
    pub fn from_value(value: &Value) -> Self {
        let typename = value
            .get("__typename")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let payload = value.get("payload").cloned().unwrap_or(Value::Null);
        Self::from_parts(typename, payload)
    }

    pub fn typename(&self) -> &str {
        match self {
            Self::Test { .. } => TEST_EVENT,
            Self::GenerateHandler(_) => GENERATE_HANDLER_EVENT,
            Self::PersistedLibraryUpdated(_) => PERSISTED_LIBRARY_UPDATED_EVENT,
            Self::OpenFile(_) => OPEN_FILE_EVENT,
            Self::Unrecognized { typename, .. } => typename,
        }
    }

    /// The wrapped event of a test wrapper, one level deep.
    pub fn unwrap_test(&self) -> Option<EventKind> {
        match self {
            Self::Test { payload } => Some(Self::from_value(payload)),
            _ => None,
        }
    }
}

fn parse_payload<T: DeserializeOwned>(payload: &Value) -> Option<T> {
    if payload.is_null() {
        return serde_json::from_value(Value::Object(serde_json::Map::new())).ok();
    }
    T::deserialize(payload).ok()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    #[serde(rename = "__typename", default)]
    typename: String,
    id: String,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    payload: Value,
}

/// One event delivered to a CLI session. Immutable once delivered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "WireEvent")]
pub struct CliEvent {
    pub id: String,
    pub session_id: Option<String>,
    pub created_at: Option<String>,
    pub kind: EventKind,
}

impl From<WireEvent> for CliEvent {
    fn from(wire: WireEvent) -> Self {
        Self {
            kind: EventKind::from_parts(&wire.typename, wire.payload),
            id: wire.id,
            session_id: wire.session_id,
            created_at: wire.created_at,
        }
    }
}

/// Human-readable label for an event. Never fails.
pub fn describe_event(event: &CliEvent) -> String {
    describe_kind(&event.kind)
}

/// Label for an event kind, following test wrappers up to [`MAX_DESCRIBE_DEPTH`].
pub fn describe_kind(kind: &EventKind) -> String {
    let mut current = kind.clone();
    for _ in 0..=MAX_DESCRIBE_DEPTH {
        match current {
            EventKind::Test { payload } => current = EventKind::from_value(&payload),
            EventKind::GenerateHandler(_) => return "Generate handler as Netlify function".to_owned(),
            EventKind::PersistedLibraryUpdated(_) => {
                return "Sync Netlify Graph operations library".to_owned()
            }
            EventKind::OpenFile(_) => return "Open file in editor".to_owned(),
            EventKind::Unrecognized { typename, .. } => {
                return format!("Unrecognized event ({typename})")
            }
        }
    }
    "Unrecognized event (nested too deeply)".to_owned()
}
