use std::sync::Arc;

use onegraph_api::{GraphqlRequest, GraphqlTransport};
use serde_json::{json, Value};
use tracing::info;

use crate::channel::SessionEventChannel;
use crate::model::{NewPersistedQuery, PersistedQuery, SessionCredentials};
use crate::operations::{
    CREATE_PERSISTED_QUERY, CREATE_PERSISTED_QUERY_DOC, FETCH_PERSISTED_QUERY,
    FETCH_PERSISTED_QUERY_DOC,
};
use crate::result::OperationResult;

/// Stored operation documents of one app.
#[derive(Clone)]
pub struct PersistedQueries {
    transport: Arc<dyn GraphqlTransport>,
    credentials: SessionCredentials,
}

impl PersistedQueries {
    pub fn new(transport: Arc<dyn GraphqlTransport>, credentials: SessionCredentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    fn request(&self, operation_name: &str, query: &str, variables: Value) -> GraphqlRequest {
        GraphqlRequest::new(operation_name, query)
            .with_variables(variables)
            .with_auth_token(&self.credentials.auth_token)
            .with_site_id(&self.credentials.app_id)
    }

    pub async fn create_persisted_query(
        &self,
        document: NewPersistedQuery,
    ) -> OperationResult<PersistedQuery> {
        let request = self.request(
            CREATE_PERSISTED_QUERY,
            CREATE_PERSISTED_QUERY_DOC,
            json!({
                "nfToken": self.credentials.auth_token,
                "appId": self.credentials.app_id,
                "query": document.query,
                "tags": document.tags,
                "description": document.description,
                "allowedOperationNames": document.allowed_operation_names,
            }),
        );
        let result = OperationResult::<PersistedQuery>::from_response(
            self.transport.execute(request).await,
            &["oneGraph", "createPersistedQuery", "persistedQuery"],
        );
        if let Some(doc) = result.as_success() {
            info!(doc_id = %doc.id, app_id = %self.credentials.app_id, "persisted operations document");
        }
        result
    }

    /// `Empty` when no document has `doc_id`.
    pub async fn fetch_persisted_query(&self, doc_id: &str) -> OperationResult<PersistedQuery> {
        let request = self.request(
            FETCH_PERSISTED_QUERY,
            FETCH_PERSISTED_QUERY_DOC,
            json!({
                "nfToken": self.credentials.auth_token,
                "appId": self.credentials.app_id,
                "id": doc_id,
            }),
        );
        OperationResult::from_response(
            self.transport.execute(request).await,
            &["oneGraph", "persistedQuery"],
        )
    }
}

impl From<&SessionEventChannel> for PersistedQueries {
    fn from(channel: &SessionEventChannel) -> Self {
        Self::new(Arc::clone(&channel.transport), channel.credentials.clone())
    }
}
