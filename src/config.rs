//! Environment configuration.

use std::env;
use std::time::Duration;

use onegraph_api::OneGraphConfig;

pub const ENV_HOST: &str = "ONEGRAPH_HOST";
pub const ENV_DASHBOARD_APP_ID: &str = "ONEGRAPH_DASHBOARD_APP_ID";
pub const ENV_TIMEOUT_SECS: &str = "ONEGRAPH_TIMEOUT_SECS";
pub const ENV_LOG: &str = "ONEGRAPH_LOG";
pub const ENV_LOG_FILE: &str = "ONEGRAPH_LOG_FILE";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub host: Option<String>,
    pub dashboard_app_id: Option<String>,
    /// `Some(0)` disables the request timeout.
    pub timeout_secs: Option<u64>,
    pub log_filter: Option<String>,
    pub log_file: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_string_opt(ENV_HOST),
            dashboard_app_id: env_string_opt(ENV_DASHBOARD_APP_ID),
            timeout_secs: env_string_opt(ENV_TIMEOUT_SECS)
                .and_then(|value| value.trim().parse().ok()),
            log_filter: env_string_opt(ENV_LOG),
            log_file: env_string_opt(ENV_LOG_FILE),
        }
    }

    /// Client configuration with every unset value left at its default.
    pub fn to_onegraph_config(&self) -> OneGraphConfig {
        let mut config = OneGraphConfig::new();
        if let Some(host) = &self.host {
            config = config.with_host(host);
        }
        if let Some(app_id) = &self.dashboard_app_id {
            config = config.with_dashboard_app_id(app_id);
        }
        match self.timeout_secs {
            Some(0) => config.without_timeout(),
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
