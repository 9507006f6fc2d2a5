#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use cli_session::{SessionCredentials, SessionEventChannel};
use onegraph_api::{GraphqlRequest, GraphqlResponse, GraphqlTransport};
use onegraph_mock::MockOneGraph;

pub const APP_ID: &str = "app-1";
pub const TOKEN: &str = "nf-token";
pub const SESSION_ID: &str = "s1";

pub fn credentials() -> SessionCredentials {
    SessionCredentials::new(APP_ID, TOKEN)
}

/// Mock backend with session [`SESSION_ID`] already registered.
pub fn mock_with_session() -> Arc<MockOneGraph> {
    let mock = Arc::new(MockOneGraph::new().with_accepted_token(TOKEN));
    mock.insert_session(SESSION_ID, APP_ID);
    mock
}

pub fn channel_for(mock: &Arc<MockOneGraph>) -> SessionEventChannel {
    SessionEventChannel::new(mock.clone(), credentials())
}

/// Transport that records every request and answers with a fixed response.
pub struct RecordingTransport {
    response: GraphqlResponse,
    requests: Mutex<Vec<GraphqlRequest>>,
}

impl RecordingTransport {
    pub fn new(response: GraphqlResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<GraphqlRequest> {
        lock_unpoisoned(&self.requests).clone()
    }

    pub fn last_request(&self) -> GraphqlRequest {
        self.requests()
            .pop()
            .expect("transport should have received a request")
    }
}

#[async_trait]
impl GraphqlTransport for RecordingTransport {
    async fn execute(&self, request: GraphqlRequest) -> GraphqlResponse {
        lock_unpoisoned(&self.requests).push(request);
        self.response.clone()
    }
}

pub fn recording_channel(transport: &Arc<RecordingTransport>) -> SessionEventChannel {
    SessionEventChannel::new(transport.clone(), credentials())
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
