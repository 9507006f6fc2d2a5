use serde_json::Value;
use tracing::{debug, error};

use crate::client::HttpTransport;
use crate::error::parse_error_message;
use crate::url::schema_endpoint;

impl HttpTransport {
    /// Fetch the introspection schema for `app_id` limited to `services`.
    ///
    /// Returns the document's `data` member. Any failure (network, status,
    /// decoding, missing `data`) is logged once at `error` level and reported
    /// as `None`: the schema is simply unavailable.
    pub async fn fetch_schema_json(&self, app_id: &str, services: &[String]) -> Option<Value> {
        match self.try_fetch_schema_json(app_id, services).await {
            Ok(schema) => Some(schema),
            Err(message) => {
                error!(app_id, services = %services.join(","), "failed to fetch OneGraph schema: {message}");
                None
            }
        }
    }

    async fn try_fetch_schema_json(&self, app_id: &str, services: &[String]) -> Result<Value, String> {
        let url = schema_endpoint(&self.config.host, app_id, services)
            .map_err(|error| error.to_string())?;
        debug!(%url, "fetching OneGraph schema");

        let response = self
            .http
            .get(url)
            .headers(self.build_headers(None).map_err(|error| error.to_string())?)
            .send()
            .await
            .map_err(|error| error.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|error| error.to_string())?;
        if !status.is_success() {
            return Err(format!("HTTP {status} {}", parse_error_message(status, &body)));
        }

        let mut document: Value = serde_json::from_str(&body)
            .map_err(|error| format!("schema response is not JSON: {error}"))?;
        match document.get_mut("data").map(Value::take) {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err("schema response has no data".to_owned()),
        }
    }
}
