use std::collections::BTreeMap;
use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::url::{DEFAULT_DASHBOARD_APP_ID, DEFAULT_ONEGRAPH_HOST};

/// Request timeout applied when none is configured explicitly.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport configuration for OneGraph requests.
#[derive(Debug, Clone)]
pub struct OneGraphConfig {
    /// Serving host, bare (`serve.onegraph.com`) or with scheme.
    pub host: String,
    /// App id used when a request carries no site routing context.
    pub dashboard_app_id: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl Default for OneGraphConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_ONEGRAPH_HOST.to_string(),
            dashboard_app_id: DEFAULT_DASHBOARD_APP_ID.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: Some(DEFAULT_TIMEOUT),
            retry: RetryPolicy::default(),
        }
    }
}

impl OneGraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_dashboard_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.dashboard_app_id = app_id.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.extra_headers.extend(headers);
        self
    }
}
