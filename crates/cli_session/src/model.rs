use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// App id and token every session call is made with.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub app_id: String,
    pub auth_token: String,
}

impl SessionCredentials {
    #[must_use]
    pub fn new(app_id: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            auth_token: auth_token.into(),
        }
    }
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("app_id", &self.app_id)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// Server-reported session state. Transition legality is decided server-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Active,
    Inactive,
    /// Status string this client does not know; kept verbatim.
    Unknown(String),
}

impl SessionStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "ACTIVE" => Self::Active,
            "INACTIVE" => Self::Inactive,
            other => Self::Unknown(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Unknown(value) => value,
        }
    }
}

impl Serialize for SessionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SessionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// One CLI session as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub status: SessionStatus,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl Session {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Parsed `updated_at`; `None` when the server sent a non-RFC 3339 value.
    #[must_use]
    pub fn updated_at_time(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.updated_at, &Rfc3339).ok()
    }

    #[must_use]
    pub fn created_at_time(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.created_at, &Rfc3339).ok()
    }
}

/// Ids the server confirmed as removed from the session queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AckResult {
    pub acknowledged_ids: Vec<String>,
}

impl AckResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.acknowledged_ids.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AckedEvent {
    pub id: String,
}

/// Stored GraphQL operations document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedQuery {
    pub id: String,
    pub query: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub allowed_operation_names: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub tags: Vec<String>,
}

/// Input for creating a [`PersistedQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPersistedQuery {
    pub query: String,
    pub description: Option<String>,
    pub allowed_operation_names: Vec<String>,
    pub tags: Vec<String>,
}

impl NewPersistedQuery {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_allowed_operation_names(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.allowed_operation_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// OneGraph app backing a Netlify site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub netlify_site_id: Option<String>,
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
