//! In-memory OneGraph backend implementing [`GraphqlTransport`].
//!
//! Speaks the same wire JSON as the real service for the CLI session,
//! persisted document and app operations. Intended for contract-level tests
//! and local runs; it holds no network or protocol logic.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use onegraph_api::{GraphqlError, GraphqlRequest, GraphqlResponse, GraphqlTransport};
use serde_json::{json, Map, Value};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

const STATUS_ACTIVE: &str = "ACTIVE";
const STATUS_INACTIVE: &str = "INACTIVE";

#[derive(Debug, Clone)]
struct SessionRecord {
    id: String,
    name: String,
    app_id: String,
    status: String,
    metadata: Value,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl SessionRecord {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "appId": self.app_id,
            "status": self.status,
            "metadata": self.metadata,
            "createdAt": format_timestamp(self.created_at),
            "updatedAt": format_timestamp(self.updated_at),
        })
    }
}

#[derive(Debug, Default)]
struct MockState {
    sessions: BTreeMap<String, SessionRecord>,
    queues: HashMap<String, Vec<Value>>,
    persisted: HashMap<String, Value>,
    apps: Vec<Value>,
    services: HashMap<String, Vec<String>>,
    injected: HashMap<String, VecDeque<GraphqlError>>,
    requests: Vec<GraphqlRequest>,
    last_timestamp: Option<OffsetDateTime>,
}

impl MockState {
    /// Wall clock, bumped so successive writes never share or reverse a timestamp.
    fn next_timestamp(&mut self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }
}

/// Deterministic in-memory stand-in for the OneGraph GraphQL service.
#[derive(Debug, Default)]
pub struct MockOneGraph {
    accepted_token: Option<String>,
    state: Mutex<MockState>,
}

impl MockOneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every request whose auth token differs from `token`.
    #[must_use]
    pub fn with_accepted_token(mut self, token: impl Into<String>) -> Self {
        self.accepted_token = Some(token.into());
        self
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register an existing session so tests can skip the create call.
    pub fn insert_session(&self, session_id: &str, app_id: &str) {
        let mut state = self.state();
        let now = state.next_timestamp();
        state.sessions.insert(
            session_id.to_owned(),
            SessionRecord {
                id: session_id.to_owned(),
                name: session_id.to_owned(),
                app_id: app_id.to_owned(),
                status: STATUS_ACTIVE.to_owned(),
                metadata: Value::Null,
                created_at: now,
                updated_at: now,
            },
        );
        state.queues.entry(session_id.to_owned()).or_default();
    }

    /// Queue one event for `session_id` and return its generated id.
    pub fn push_event(&self, session_id: &str, typename: &str, payload: Value) -> String {
        let id = Uuid::new_v4().to_string();
        let mut state = self.state();
        let created_at = format_timestamp(state.next_timestamp());
        state.queues.entry(session_id.to_owned()).or_default().push(json!({
            "__typename": typename,
            "id": id,
            "sessionId": session_id,
            "createdAt": created_at,
            "payload": payload,
        }));
        id
    }

    /// Queue a raw event object verbatim, for malformed-shape scenarios.
    pub fn push_raw_event(&self, session_id: &str, event: Value) {
        self.state()
            .queues
            .entry(session_id.to_owned())
            .or_default()
            .push(event);
    }

    pub fn queued_event_ids(&self, session_id: &str) -> Vec<String> {
        self.state()
            .queues
            .get(session_id)
            .map(|queue| {
                queue
                    .iter()
                    .filter_map(|event| event.get("id").and_then(Value::as_str))
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn session_status(&self, session_id: &str) -> Option<String> {
        self.state()
            .sessions
            .get(session_id)
            .map(|session| session.status.clone())
    }

    pub fn insert_app(&self, app_id: &str, site_id: &str) {
        self.state().apps.push(json!({
            "id": app_id,
            "name": site_id,
            "netlifySiteId": site_id,
        }));
    }

    pub fn enable_services(&self, app_id: &str, services: &[&str]) {
        self.state().services.insert(
            app_id.to_owned(),
            services.iter().map(|service| (*service).to_owned()).collect(),
        );
    }

    /// Fail the next call of `operation_name` with `error`. Queued per operation.
    pub fn fail_next(&self, operation_name: &str, error: GraphqlError) {
        self.state()
            .injected
            .entry(operation_name.to_owned())
            .or_default()
            .push_back(error);
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<GraphqlRequest> {
        self.state().requests.clone()
    }

    pub fn requests_named(&self, operation_name: &str) -> Vec<GraphqlRequest> {
        self.state()
            .requests
            .iter()
            .filter(|request| request.operation_name == operation_name)
            .cloned()
            .collect()
    }

    fn dispatch(&self, request: &GraphqlRequest) -> Result<Value, GraphqlError> {
        let mut state = self.state();
        state.requests.push(request.clone());

        if let Some(error) = state
            .injected
            .get_mut(&request.operation_name)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }

        if let Some(accepted) = &self.accepted_token {
            if request.auth_token.as_deref() != Some(accepted.as_str()) {
                return Err(GraphqlError::new("Unauthorized: invalid Netlify token"));
            }
        }

        let vars = &request.variables;
        match request.operation_name.as_str() {
            "CLISessionEventsQuery" => {
                let session_id = string_var(vars, "sessionId")?;
                let first = vars.get("first").and_then(Value::as_u64).unwrap_or(1) as usize;
                let queue = state
                    .queues
                    .get(session_id)
                    .ok_or_else(|| session_not_found(session_id))?;
                let events: Vec<Value> = queue.iter().take(first).cloned().collect();
                Ok(json!({"oneGraph": {"netlifyCliEvents": events}}))
            }
            "AckCLISessionEventMutation" => {
                let session_id = string_var(vars, "sessionId")?;
                let ids: Vec<String> = vars
                    .get("eventIds")
                    .and_then(Value::as_array)
                    .map(|ids| {
                        ids.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_owned)
                            .collect()
                    })
                    .unwrap_or_default();
                let queue = state.queues.entry(session_id.to_owned()).or_default();
                let mut removed = Vec::new();
                queue.retain(|event| {
                    let id = event.get("id").and_then(Value::as_str).unwrap_or_default();
                    if ids.iter().any(|wanted| wanted == id) {
                        removed.push(json!({"id": id}));
                        false
                    } else {
                        true
                    }
                });
                Ok(json!({"oneGraph": {"ackNetlifyCliEvents": {"events": removed}}}))
            }
            "CreateCLISessionMutation" => {
                let app_id = string_var(vars, "appId")?.to_owned();
                let name = string_var(vars, "name")?.to_owned();
                let now = state.next_timestamp();
                let record = SessionRecord {
                    id: Uuid::new_v4().to_string(),
                    name,
                    app_id,
                    status: STATUS_ACTIVE.to_owned(),
                    metadata: vars.get("metadata").cloned().unwrap_or(Value::Null),
                    created_at: now,
                    updated_at: now,
                };
                let session = record.to_json();
                state.queues.entry(record.id.clone()).or_default();
                state.sessions.insert(record.id.clone(), record);
                Ok(json!({"oneGraph": {"createNetlifyCliSession": {"session": session}}}))
            }
            "CLISessionQuery" => {
                let session_id = string_var(vars, "sessionId")?;
                let session = state
                    .sessions
                    .get(session_id)
                    .map_or(Value::Null, SessionRecord::to_json);
                Ok(json!({"oneGraph": {"netlifyCliSession": session}}))
            }
            "MarkCLISessionActiveHeartbeat" => {
                let session_id = string_var(vars, "id")?;
                update_session(&mut state, session_id, |record| {
                    record.status = STATUS_ACTIVE.to_owned();
                })
            }
            "MarkCLISessionInactive" => {
                let session_id = string_var(vars, "id")?;
                update_session(&mut state, session_id, |record| {
                    record.status = STATUS_INACTIVE.to_owned();
                })
            }
            "UpdateCLISessionMetadataMutation" => {
                let session_id = string_var(vars, "sessionId")?;
                let metadata = vars.get("metadata").cloned().unwrap_or(Value::Null);
                update_session(&mut state, session_id, |record| record.metadata = metadata)
            }
            "CreatePersistedQueryMutation" => {
                let id = Uuid::new_v4().to_string();
                let doc = json!({
                    "id": id,
                    "query": string_var(vars, "query")?,
                    "description": vars.get("description").cloned().unwrap_or(Value::Null),
                    "allowedOperationNames": list_var(vars, "allowedOperationNames"),
                    "tags": list_var(vars, "tags"),
                });
                state.persisted.insert(id, doc.clone());
                Ok(json!({"oneGraph": {"createPersistedQuery": {"persistedQuery": doc}}}))
            }
            "PersistedQueryQuery" => {
                let id = string_var(vars, "id")?;
                let doc = state.persisted.get(id).cloned().unwrap_or(Value::Null);
                Ok(json!({"oneGraph": {"persistedQuery": doc}}))
            }
            "AppForSiteQuery" => {
                let site_id = string_var(vars, "siteId")?;
                let app = state
                    .apps
                    .iter()
                    .find(|app| app.get("netlifySiteId").and_then(Value::as_str) == Some(site_id))
                    .cloned()
                    .unwrap_or(Value::Null);
                Ok(json!({"oneGraph": {"app": app}}))
            }
            "CreateNewAppMutation" => {
                let app = json!({
                    "id": Uuid::new_v4().to_string(),
                    "name": string_var(vars, "name")?,
                    "netlifySiteId": string_var(vars, "netlifySiteId")?,
                });
                state.apps.push(app.clone());
                Ok(json!({"oneGraph": {"createApp": {"app": app}}}))
            }
            "AppEnabledServicesQuery" => {
                let app_id = string_var(vars, "appId")?;
                let services: Vec<Value> = state
                    .services
                    .get(app_id)
                    .map(|services| {
                        services
                            .iter()
                            .map(|service| json!({"service": service}))
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(json!({"oneGraph": {"app": {"graphQLSchema": {"services": services}}}}))
            }
            other => Err(GraphqlError::new(format!("Unknown operation named \"{other}\""))),
        }
    }
}

#[async_trait]
impl GraphqlTransport for MockOneGraph {
    async fn execute(&self, request: GraphqlRequest) -> GraphqlResponse {
        match self.dispatch(&request) {
            Ok(data) => GraphqlResponse::from_data(data),
            Err(error) => GraphqlResponse {
                data: Some(Value::Object(Map::new())),
                errors: vec![error],
                extensions: None,
            },
        }
    }
}

fn update_session(
    state: &mut MockState,
    session_id: &str,
    apply: impl FnOnce(&mut SessionRecord),
) -> Result<Value, GraphqlError> {
    let now = state.next_timestamp();
    let record = state
        .sessions
        .get_mut(session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    apply(record);
    record.updated_at = now.max(record.updated_at);
    Ok(json!({"oneGraph": {"updateNetlifyCliSession": {"session": record.to_json()}}}))
}

fn string_var<'a>(variables: &'a Value, name: &str) -> Result<&'a str, GraphqlError> {
    variables
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            GraphqlError::new(format!(
                "Variable \"${name}\" of required type was not provided."
            ))
        })
}

fn list_var(variables: &Value, name: &str) -> Value {
    variables.get(name).cloned().unwrap_or_else(|| json!([]))
}

fn session_not_found(session_id: &str) -> GraphqlError {
    GraphqlError::new(format!("CLI session {session_id} not found"))
}

fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(&Rfc3339)
        .unwrap_or_else(|_| timestamp.unix_timestamp().to_string())
}
