use std::sync::Arc;

use onegraph_api::{GraphqlRequest, GraphqlTransport};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::model::App;
use crate::operations::{
    CREATE_APP, CREATE_APP_DOC, FETCH_APP_FOR_SITE, FETCH_APP_FOR_SITE_DOC,
    FETCH_ENABLED_SERVICES, FETCH_ENABLED_SERVICES_DOC,
};
use crate::result::OperationResult;

#[derive(Debug, Deserialize)]
struct EnabledService {
    service: String,
}

/// App lookup and provisioning. Site-level calls go to the dashboard app
/// because the site's own app may not exist yet.
#[derive(Clone)]
pub struct Apps {
    transport: Arc<dyn GraphqlTransport>,
    auth_token: String,
}

impl Apps {
    pub fn new(transport: Arc<dyn GraphqlTransport>, auth_token: impl Into<String>) -> Self {
        Self {
            transport,
            auth_token: auth_token.into(),
        }
    }

    fn request(&self, operation_name: &str, query: &str, variables: Value) -> GraphqlRequest {
        GraphqlRequest::new(operation_name, query)
            .with_variables(variables)
            .with_auth_token(&self.auth_token)
    }

    /// `Empty` when the site has no app.
    pub async fn fetch_app_for_site(&self, site_id: &str) -> OperationResult<App> {
        let request = self.request(
            FETCH_APP_FOR_SITE,
            FETCH_APP_FOR_SITE_DOC,
            json!({"nfToken": self.auth_token, "siteId": site_id}),
        );
        OperationResult::from_response(self.transport.execute(request).await, &["oneGraph", "app"])
    }

    pub async fn create_app_for_site(&self, site_id: &str) -> OperationResult<App> {
        let request = self.request(
            CREATE_APP,
            CREATE_APP_DOC,
            json!({"nfToken": self.auth_token, "name": site_id, "netlifySiteId": site_id}),
        );
        let result = OperationResult::<App>::from_response(
            self.transport.execute(request).await,
            &["oneGraph", "createApp", "app"],
        );
        if let Some(app) = result.as_success() {
            info!(app_id = %app.id, site_id, "created OneGraph app");
        }
        result
    }

    /// Existing app for `site_id`, creating one when the lookup is `Empty`.
    /// A failed lookup is returned as-is without attempting creation.
    pub async fn ensure_app_for_site(&self, site_id: &str) -> OperationResult<App> {
        match self.fetch_app_for_site(site_id).await {
            OperationResult::Empty => self.create_app_for_site(site_id).await,
            found => found,
        }
    }

    /// Service slugs enabled in the app's schema. Routed through `app_id`.
    pub async fn fetch_enabled_services(&self, app_id: &str) -> OperationResult<Vec<String>> {
        let request = self
            .request(
                FETCH_ENABLED_SERVICES,
                FETCH_ENABLED_SERVICES_DOC,
                json!({"nfToken": self.auth_token, "appId": app_id}),
            )
            .with_site_id(app_id);
        OperationResult::<Vec<EnabledService>>::from_response(
            self.transport.execute(request).await,
            &["oneGraph", "app", "graphQLSchema", "services"],
        )
        .map(|services| services.into_iter().map(|entry| entry.service).collect())
    }
}
