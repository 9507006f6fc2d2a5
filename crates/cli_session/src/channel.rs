use std::fmt;
use std::sync::Arc;

use onegraph_api::{GraphqlError, GraphqlRequest, GraphqlTransport};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::event::CliEvent;
use crate::model::{AckResult, AckedEvent, Session, SessionCredentials};
use crate::operations::{
    mark_cli_session_active_heartbeat_doc, mark_cli_session_inactive_doc, ACK_CLI_SESSION_EVENTS,
    ACK_CLI_SESSION_EVENTS_DOC, FETCH_CLI_SESSION_EVENTS, FETCH_CLI_SESSION_EVENTS_DOC,
    MARK_CLI_SESSION_ACTIVE_HEARTBEAT, MARK_CLI_SESSION_INACTIVE, UPDATED_SESSION_PATH,
};
use crate::result::{EventBatch, OperationResult};

/// Batch size used when the caller asks for zero events.
pub const DEFAULT_BATCH_SIZE: u32 = 1000;

/// `0` means "use the default"; any other count is passed through.
#[must_use]
pub fn normalize_batch_size(desired_count: u32) -> u32 {
    if desired_count == 0 {
        DEFAULT_BATCH_SIZE
    } else {
        desired_count
    }
}

/// Poll/acknowledge client for the server-held event queue of CLI sessions.
///
/// Delivery is at-least-once: an event stays queued until an acknowledge
/// call for its id succeeds, so handlers must tolerate seeing it again.
#[derive(Clone)]
pub struct SessionEventChannel {
    pub(crate) transport: Arc<dyn GraphqlTransport>,
    pub(crate) credentials: SessionCredentials,
}

impl fmt::Debug for SessionEventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEventChannel")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// What [`SessionEventChannel::process_batch`] did with one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutcome {
    /// Ids whose handler succeeded, in delivery order.
    pub processed: Vec<String>,
    /// Ids whose handler failed, with the handler's message. Left queued.
    pub failed: Vec<(String, String)>,
    /// Errors from the fetch. A failed request yields no events; malformed
    /// elements are reported here while the well-formed ones are handled.
    pub fetch_errors: Vec<GraphqlError>,
    /// Acknowledge outcome; `None` when nothing needed acknowledging.
    pub ack: Option<OperationResult<AckResult>>,
}

impl ProcessOutcome {
    /// True when every fetched event was handled and acknowledged.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.fetch_errors.is_empty()
            && self.failed.is_empty()
            && self.ack.as_ref().map_or(true, OperationResult::is_success)
    }
}

impl SessionEventChannel {
    pub fn new(transport: Arc<dyn GraphqlTransport>, credentials: SessionCredentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub fn credentials(&self) -> &SessionCredentials {
        &self.credentials
    }

    pub(crate) fn request(
        &self,
        operation_name: &str,
        query: impl Into<String>,
        variables: Value,
    ) -> GraphqlRequest {
        GraphqlRequest::new(operation_name, query)
            .with_variables(variables)
            .with_auth_token(&self.credentials.auth_token)
            .with_site_id(&self.credentials.app_id)
    }

    /// Fetch up to `desired_count` queued events without removing them.
    ///
    /// `0` is normalized to [`DEFAULT_BATCH_SIZE`]. The server may return
    /// fewer events; their order is the server's.
    pub async fn fetch_batch(&self, session_id: &str, desired_count: u32) -> EventBatch {
        let first = normalize_batch_size(desired_count);
        let request = self.request(
            FETCH_CLI_SESSION_EVENTS,
            FETCH_CLI_SESSION_EVENTS_DOC,
            json!({
                "nfToken": self.credentials.auth_token,
                "sessionId": session_id,
                "first": first,
            }),
        );

        let response = self.transport.execute(request).await;
        let batch = EventBatch::from(OperationResult::<Vec<Value>>::from_response(
            response,
            &["oneGraph", "netlifyCliEvents"],
        ));
        for error in &batch.errors {
            warn!(session_id, "event fetch error: {error}");
        }
        debug!(
            session_id,
            first,
            events = batch.events.len(),
            errors = batch.errors.len(),
            "fetched CLI session events"
        );
        batch
    }

    pub async fn fetch_default_batch(&self, session_id: &str) -> EventBatch {
        self.fetch_batch(session_id, DEFAULT_BATCH_SIZE).await
    }

    /// Remove `event_ids` from the session queue.
    ///
    /// An empty list still round-trips. A `Failure` means the queue state is
    /// unknown; re-fetch to learn which events remain.
    pub async fn acknowledge(
        &self,
        session_id: &str,
        event_ids: &[String],
    ) -> OperationResult<AckResult> {
        let request = self.request(
            ACK_CLI_SESSION_EVENTS,
            ACK_CLI_SESSION_EVENTS_DOC,
            json!({
                "nfToken": self.credentials.auth_token,
                "sessionId": session_id,
                "eventIds": event_ids,
            }),
        );

        let response = self.transport.execute(request).await;
        let result = OperationResult::<Vec<AckedEvent>>::from_response(
            response,
            &["oneGraph", "ackNetlifyCliEvents", "events"],
        )
        .map(|events| AckResult {
            acknowledged_ids: events.into_iter().map(|event| event.id).collect(),
        });

        if let OperationResult::Failure(errors) = &result {
            warn!(
                session_id,
                requested = event_ids.len(),
                error = %errors.first().map(ToString::to_string).unwrap_or_default(),
                "acknowledge failed; queue state unknown"
            );
        }
        result
    }

    /// Mark the session `ACTIVE` and refresh its `updatedAt`.
    pub async fn heartbeat(&self, session_id: &str) -> OperationResult<Session> {
        let request = self.request(
            MARK_CLI_SESSION_ACTIVE_HEARTBEAT,
            mark_cli_session_active_heartbeat_doc(),
            json!({"nfToken": self.credentials.auth_token, "id": session_id}),
        );
        OperationResult::from_response(
            self.transport.execute(request).await,
            &UPDATED_SESSION_PATH,
        )
    }

    /// Mark the session `INACTIVE`.
    pub async fn deactivate(&self, session_id: &str) -> OperationResult<Session> {
        let request = self.request(
            MARK_CLI_SESSION_INACTIVE,
            mark_cli_session_inactive_doc(),
            json!({"nfToken": self.credentials.auth_token, "id": session_id}),
        );
        OperationResult::from_response(
            self.transport.execute(request).await,
            &UPDATED_SESSION_PATH,
        )
    }

    /// Fetch one batch, hand each event to `handler` in delivery order and
    /// acknowledge the ones it accepted.
    ///
    /// Events whose handler fails stay queued and will be redelivered.
    /// Fetch errors are recorded without stopping the well-formed events.
    pub async fn process_batch<F, E>(
        &self,
        session_id: &str,
        desired_count: u32,
        mut handler: F,
    ) -> ProcessOutcome
    where
        F: FnMut(&CliEvent) -> Result<(), E>,
        E: fmt::Display,
    {
        let batch = self.fetch_batch(session_id, desired_count).await;
        let mut outcome = ProcessOutcome {
            fetch_errors: batch.errors,
            ..ProcessOutcome::default()
        };
        for event in &batch.events {
            match handler(event) {
                Ok(()) => outcome.processed.push(event.id.clone()),
                Err(error) => {
                    warn!(session_id, event_id = %event.id, "event handler failed: {error}");
                    outcome.failed.push((event.id.clone(), error.to_string()));
                }
            }
        }

        if !outcome.processed.is_empty() {
            outcome.ack = Some(self.acknowledge(session_id, &outcome.processed).await);
        }
        outcome
    }
}
