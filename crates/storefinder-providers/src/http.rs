//! Shared `reqwest` client construction.

use std::time::Duration;

use reqwest::{Client, Url};
use storefinder_core::AppConfig;

use crate::error::ProviderError;

/// Timeout and identification applied to every provider client.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl HttpSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.http_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "storefinder/0.1".to_string(),
        }
    }
}

pub(crate) fn build_client(settings: &HttpSettings) -> Result<Client, ProviderError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(settings.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// Parses `base_url` joined with `path`, tolerating a trailing slash on the base.
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> Result<Url, ProviderError> {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    let joined = format!("{base}/{path}");
    Url::parse(&joined).map_err(|e| ProviderError::InvalidBaseUrl {
        base_url: base_url.to_string(),
        reason: e.to_string(),
    })
}
