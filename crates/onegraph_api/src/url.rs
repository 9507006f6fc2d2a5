use url::Url;

use crate::error::OneGraphError;

/// Default OneGraph serving host.
pub const DEFAULT_ONEGRAPH_HOST: &str = "serve.onegraph.com";

/// OneGraph app used to route calls that are not bound to a site.
pub const DEFAULT_DASHBOARD_APP_ID: &str = "0b066ba6-ed39-4db8-a497-ba0be34d5b2a";

/// Normalize a host (bare or with scheme) to a base URL without trailing slash.
///
/// Normalization rules:
/// 1) blank input falls back to [`DEFAULT_ONEGRAPH_HOST`]
/// 2) bare hosts get an `https://` scheme
/// 3) explicit `http://`/`https://` schemes are kept as-is
pub fn normalize_base_url(host: &str) -> String {
    let host = if host.trim().is_empty() {
        DEFAULT_ONEGRAPH_HOST
    } else {
        host.trim()
    };

    let trimmed = host.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return trimmed.to_string();
    }
    format!("https://{trimmed}")
}

/// GraphQL execution endpoint for one app: `<base>/graphql?app_id=<id>&show_metrics=false`.
pub fn graphql_endpoint(host: &str, app_id: &str) -> Result<Url, OneGraphError> {
    let mut url = parse_base(host, "graphql")?;
    url.query_pairs_mut()
        .append_pair("app_id", app_id)
        .append_pair("show_metrics", "false");
    Ok(url)
}

/// Schema document endpoint: `<base>/schema?app_id=<id>&services=<csv>`.
pub fn schema_endpoint(host: &str, app_id: &str, services: &[String]) -> Result<Url, OneGraphError> {
    let mut url = parse_base(host, "schema")?;
    url.query_pairs_mut()
        .append_pair("app_id", app_id)
        .append_pair("services", &services.join(","));
    Ok(url)
}

fn parse_base(host: &str, path: &str) -> Result<Url, OneGraphError> {
    let base = normalize_base_url(host);
    Url::parse(&format!("{base}/{path}"))
        .map_err(|error| OneGraphError::InvalidHost(format!("{base}: {error}")))
}
