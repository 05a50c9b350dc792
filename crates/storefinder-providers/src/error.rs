use thiserror::Error;

/// Failures while constructing provider adapters.
///
/// Request-time failures use the taxonomy in `storefinder_core::error`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error(transparent)]
    Config(#[from] storefinder_core::ConfigError),
}
