//! OneGraph client for Netlify CLI sessions.
//!
//! [`OneGraphCli`] wires an [`HttpTransport`] configured from the
//! environment into the session, persisted-document and app operations of
//! [`cli_session`]. Library crates log through `tracing`; call
//! [`logging::init_logging`] once at startup to see their output.

pub mod config;
pub mod logging;

use std::sync::Arc;

use cli_session::{Apps, PersistedQueries, SessionCredentials, SessionEventChannel};
use onegraph_api::{GraphqlTransport, HttpTransport, OneGraphConfig, OneGraphError};
use serde_json::Value;
use tracing::debug;

pub use crate::config::EnvConfig;
pub use cli_session;
pub use onegraph_api;

/// Entry point holding one shared transport for every operation.
#[derive(Clone)]
pub struct OneGraphCli {
    http: Arc<HttpTransport>,
    transport: Arc<dyn GraphqlTransport>,
}

impl OneGraphCli {
    pub fn new(config: OneGraphConfig) -> Result<Self, OneGraphError> {
        let http = Arc::new(HttpTransport::new(config)?);
        debug!(
            host = %http.config().host,
            dashboard_app_id = %http.config().dashboard_app_id,
            "configured OneGraph client"
        );
        Ok(Self {
            transport: http.clone(),
            http,
        })
    }

    pub fn from_env() -> Result<Self, OneGraphError> {
        Self::new(EnvConfig::from_env().to_onegraph_config())
    }

    /// Route GraphQL operations through `transport`. Schema downloads keep
    /// using HTTP.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn GraphqlTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn config(&self) -> &OneGraphConfig {
        self.http.config()
    }

    pub fn channel(&self, credentials: SessionCredentials) -> SessionEventChannel {
        SessionEventChannel::new(Arc::clone(&self.transport), credentials)
    }

    pub fn persisted_queries(&self, credentials: SessionCredentials) -> PersistedQueries {
        PersistedQueries::new(Arc::clone(&self.transport), credentials)
    }

    pub fn apps(&self, auth_token: impl Into<String>) -> Apps {
        Apps::new(Arc::clone(&self.transport), auth_token)
    }

    /// Introspection schema for `app_id`; `None` means "unavailable".
    pub async fn fetch_schema(&self, app_id: &str, services: &[String]) -> Option<Value> {
        self.http.fetch_schema_json(app_id, services).await
    }
}
