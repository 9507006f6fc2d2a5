use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// `extensions.code` for failures before a response arrived.
pub const CODE_TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
/// `extensions.code` for non-success HTTP statuses without GraphQL errors.
pub const CODE_HTTP_STATUS: &str = "HTTP_STATUS";
/// `extensions.code` for requests that exceeded the configured timeout.
pub const CODE_TIMEOUT: &str = "TIMEOUT";
/// `extensions.code` for bodies that are not a usable GraphQL response.
pub const CODE_BAD_RESPONSE: &str = "BAD_RESPONSE";

/// Construction-time failures. Request-time failures never use this type;
/// they travel inline as [`GraphqlError`] entries.
#[derive(Debug, Error)]
pub enum OneGraphError {
    #[error("invalid OneGraph host: {0}")]
    InvalidHost(String),

    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// GraphQL error location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// GraphQL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphqlPathSegment {
    Key(String),
    Index(i64),
}

/// One entry of a GraphQL `errors` array.
///
/// Transport failures are folded into the same shape with a
/// machine-readable `extensions.code`, so callers check a single list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, deserialize_with = "nullable_list")]
    pub locations: Vec<GraphqlErrorLocation>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub path: Vec<GraphqlPathSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphqlError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
            extensions: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: &str) -> Self {
        let mut extensions = match self.extensions.take() {
            Some(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        extensions.insert("code".to_owned(), Value::String(code.to_owned()));
        self.extensions = Some(Value::Object(extensions));
        self
    }

    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(message).with_code(CODE_TRANSPORT_ERROR)
    }

    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(message).with_code(CODE_TIMEOUT)
    }

    #[must_use]
    pub fn bad_response(message: impl Into<String>) -> Self {
        Self::new(message).with_code(CODE_BAD_RESPONSE)
    }

    #[must_use]
    pub fn http_status(status: StatusCode, body: &str) -> Self {
        let mut error = Self::new(format!("HTTP {status} {}", parse_error_message(status, body)))
            .with_code(CODE_HTTP_STATUS);
        if let Some(Value::Object(map)) = error.extensions.as_mut() {
            map.insert("status".to_owned(), json!(status.as_u16()));
        }
        error
    }

    /// Returns `extensions.code` when present.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|extensions| extensions.get("code"))
            .and_then(Value::as_str)
    }

    /// Returns true for errors produced locally by the transport rather than the server.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self.code(),
            Some(CODE_TRANSPORT_ERROR | CODE_HTTP_STATUS | CODE_TIMEOUT | CODE_BAD_RESPONSE)
        )
    }
}

impl std::fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code() {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Servers may send `null` where a list is expected; treat it as empty.
pub(crate) fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    errors: Vec<ErrorPayloadFields>,
    #[serde(default)]
    error: Option<ErrorPayloadFields>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayloadFields {
    message: Option<String>,
}

/// Extract a readable message from a failed HTTP response body.
///
/// Accepts `{"errors":[{"message":..}]}`, `{"error":{"message":..}}` and
/// `{"message":..}`, falling back to the raw body or the status reason.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorPayload>(body) {
        let explicit = parsed
            .errors
            .iter()
            .chain(parsed.error.iter())
            .filter_map(|fields| fields.message.as_deref())
            .map(str::trim)
            .find(|message| !message.is_empty())
            .map(str::to_owned)
            .or_else(|| parsed.message.filter(|message| !message.trim().is_empty()));
        if let Some(message) = explicit {
            return message;
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.trim().to_string()
    }
}
