use std::time::Duration;

/// Errors raised while talking to an OpenAI-compatible embedding/completion API.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport-level failure (connection, TLS, timeout at the HTTP layer).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded as JSON.
    #[error("response decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API responded with a well-formed but unusable payload.
    #[error("{0}")]
    Api(String),

    /// The API rejected the request with HTTP 429.
    #[error("rate limit exceeded{}", retry_after.map(|d| format!(" (retry after {}s)", d.as_secs())).unwrap_or_default())]
    RateLimit {
        /// Suggested retry delay from the `Retry-After` header, if present.
        retry_after: Option<Duration>,
    },

    /// The API responded with a 5xx status.
    #[error("server error {status}: {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, if any.
        message: String,
    },
}
