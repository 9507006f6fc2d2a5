//! Session lifecycle calls beyond heartbeat/deactivate.

use serde_json::{json, Value};
use tracing::info;

use crate::channel::SessionEventChannel;
use crate::model::Session;
use crate::operations::{
    create_cli_session_doc, fetch_cli_session_doc, update_cli_session_metadata_doc,
    CREATE_CLI_SESSION, FETCH_CLI_SESSION, UPDATED_SESSION_PATH, UPDATE_CLI_SESSION_METADATA,
};
use crate::result::OperationResult;

impl SessionEventChannel {
    /// Open a new session under the channel's app. `metadata` may be `Null`.
    pub async fn create_session(&self, name: &str, metadata: Value) -> OperationResult<Session> {
        let request = self.request(
            CREATE_CLI_SESSION,
            create_cli_session_doc(),
            json!({
                "nfToken": self.credentials.auth_token,
                "appId": self.credentials.app_id,
                "name": name,
                "metadata": metadata,
            }),
        );
        let result = OperationResult::<Session>::from_response(
            self.transport.execute(request).await,
            &["oneGraph", "createNetlifyCliSession", "session"],
        );
        if let Some(session) = result.as_success() {
            info!(session_id = %session.id, name, "created CLI session");
        }
        result
    }

    /// Current server view of a session; `Empty` when it does not exist.
    pub async fn fetch_session(&self, session_id: &str) -> OperationResult<Session> {
        let request = self.request(
            FETCH_CLI_SESSION,
            fetch_cli_session_doc(),
            json!({"nfToken": self.credentials.auth_token, "sessionId": session_id}),
        );
        OperationResult::from_response(
            self.transport.execute(request).await,
            &["oneGraph", "netlifyCliSession"],
        )
    }

    /// Replace the session's metadata document.
    pub async fn update_session_metadata(
        &self,
        session_id: &str,
        metadata: Value,
    ) -> OperationResult<Session> {
        let request = self.request(
            UPDATE_CLI_SESSION_METADATA,
            update_cli_session_metadata_doc(),
            json!({
                "nfToken": self.credentials.auth_token,
                "sessionId": session_id,
                "metadata": metadata,
            }),
        );
        OperationResult::from_response(self.transport.execute(request).await, &UPDATED_SESSION_PATH)
    }
}
