//! Request and response shapes for one GraphQL operation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{nullable_list, GraphqlError};

/// Site routing for a request. The site id doubles as the OneGraph app id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingContext {
    pub site_id: String,
}

impl RoutingContext {
    #[must_use]
    pub fn site(site_id: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
        }
    }
}

/// One named GraphQL operation ready for execution.
#[derive(Clone, PartialEq)]
pub struct GraphqlRequest {
    pub operation_name: String,
    pub query: String,
    pub variables: Value,
    pub auth_token: Option<String>,
    pub routing: Option<RoutingContext>,
}

impl GraphqlRequest {
    #[must_use]
    pub fn new(operation_name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            query: query.into(),
            variables: Value::Object(serde_json::Map::new()),
            auth_token: None,
            routing: None,
        }
    }

    #[must_use]
    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }

    #[must_use]
    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    #[must_use]
    pub fn with_site_id(mut self, site_id: impl Into<String>) -> Self {
        self.routing = Some(RoutingContext::site(site_id));
        self
    }

    /// JSON body sent over the wire.
    #[must_use]
    pub fn wire_body(&self) -> WireRequest<'_> {
        WireRequest {
            query: &self.query,
            variables: &self.variables,
            operation_name: &self.operation_name,
        }
    }
}

impl fmt::Debug for GraphqlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphqlRequest")
            .field("operation_name", &self.operation_name)
            .field("variables", &self.variables)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("routing", &self.routing)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRequest<'a> {
    pub query: &'a str,
    pub variables: &'a Value,
    pub operation_name: &'a str,
}

/// GraphQL response container: `{data, errors}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub errors: Vec<GraphqlError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphqlResponse {
    #[must_use]
    pub fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_errors(errors: Vec<GraphqlError>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    /// Returns `true` if no GraphQL errors were returned.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Walk `data` along `path`; `None` when any segment is missing or null.
    #[must_use]
    pub fn data_at(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self.data.as_ref()?;
        for segment in path {
            current = current.get(segment)?;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }
}
