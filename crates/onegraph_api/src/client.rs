use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::config::OneGraphConfig;
use crate::error::{GraphqlError, OneGraphError};
use crate::headers::build_headers;
use crate::operation::{GraphqlRequest, GraphqlResponse, RoutingContext};
use crate::retry::is_retryable_http_error;
use crate::transport::GraphqlTransport;
use crate::url::graphql_endpoint;

/// HTTP implementation of [`GraphqlTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    pub(crate) http: Client,
    pub(crate) config: OneGraphConfig,
}

enum Attempt {
    Done(GraphqlResponse),
    Retry(GraphqlError),
}

impl HttpTransport {
    pub fn new(config: OneGraphConfig) -> Result<Self, OneGraphError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(OneGraphError::ClientBuild)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &OneGraphConfig {
        &self.config
    }

    /// Endpoint for a request: the site id when routed, the dashboard app otherwise.
    pub fn endpoint_for(&self, routing: Option<&RoutingContext>) -> Result<Url, OneGraphError> {
        let app_id = routing
            .map(|routing| routing.site_id.trim())
            .filter(|site_id| !site_id.is_empty())
            .unwrap_or(self.config.dashboard_app_id.as_str());
        graphql_endpoint(&self.config.host, app_id)
    }

    pub fn build_headers(&self, auth_token: Option<&str>) -> Result<HeaderMap, OneGraphError> {
        let mut out = HeaderMap::new();
        for (key, value) in build_headers(&self.config, auth_token) {
            out.insert(
                HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                    OneGraphError::InvalidHeader {
                        name: key.clone(),
                        reason: error.to_string(),
                    }
                })?,
                HeaderValue::from_str(&value).map_err(|error| OneGraphError::InvalidHeader {
                    name: key.clone(),
                    reason: error.to_string(),
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_request(
        &self,
        request: &GraphqlRequest,
    ) -> Result<reqwest::RequestBuilder, OneGraphError> {
        let endpoint = self.endpoint_for(request.routing.as_ref())?;
        let headers = self.build_headers(request.auth_token.as_deref())?;
        Ok(self
            .http
            .post(endpoint)
            .headers(headers)
            .json(&request.wire_body()))
    }

    async fn attempt(&self, request: &GraphqlRequest) -> Attempt {
        let builder = match self.build_request(request) {
            Ok(builder) => builder,
            Err(error) => {
                return Attempt::Done(GraphqlResponse::from_errors(vec![GraphqlError::transport(
                    error.to_string(),
                )]))
            }
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) if error.is_timeout() => {
                return Attempt::Retry(GraphqlError::timeout(format!(
                    "{} timed out: {error}",
                    request.operation_name
                )))
            }
            Err(error) => return Attempt::Retry(GraphqlError::transport(error.to_string())),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) if error.is_timeout() => {
                return Attempt::Retry(GraphqlError::timeout(error.to_string()))
            }
            Err(error) => return Attempt::Retry(GraphqlError::transport(error.to_string())),
        };

        decode_response(status, &body)
    }
}

fn decode_response(status: StatusCode, body: &str) -> Attempt {
    let parsed = serde_json::from_str::<GraphqlResponse>(body);

    if status.is_success() {
        return Attempt::Done(match parsed {
            Ok(response) => response,
            Err(error) => GraphqlResponse::from_errors(vec![GraphqlError::bad_response(format!(
                "response is not a GraphQL document: {error}"
            ))]),
        });
    }

    // GraphQL servers may attach a regular errors array to a non-2xx status.
    if let Ok(response) = parsed {
        if !response.errors.is_empty() && !is_retryable_http_error(status.as_u16(), "") {
            return Attempt::Done(response);
        }
    }

    let error = GraphqlError::http_status(status, body);
    if is_retryable_http_error(status.as_u16(), body) {
        Attempt::Retry(error)
    } else {
        Attempt::Done(GraphqlResponse::from_errors(vec![error]))
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, request: GraphqlRequest) -> GraphqlResponse {
        let policy = self.config.retry;
        let mut attempt = 0;

        loop {
            debug!(
                operation = %request.operation_name,
                attempt,
                "executing OneGraph operation"
            );

            match self.attempt(&request).await {
                Attempt::Done(response) => return response,
                Attempt::Retry(error) if attempt < policy.max_retries => {
                    debug!(
                        operation = %request.operation_name,
                        attempt,
                        error = %error,
                        "retrying OneGraph operation"
                    );
                    tokio::time::sleep(policy.delay(attempt)).await;
                    attempt += 1;
                }
                Attempt::Retry(error) => return GraphqlResponse::from_errors(vec![error]),
            }
        }
    }
}
