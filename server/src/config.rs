//! Server configuration, loaded from environment variables with sane defaults.

use std::env;

/// Runtime configuration for the HTTP API server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Directory PDF uploads are read from.
    pub upload_dir: String,
    /// Redis connection URL for the snapshot store.
    pub redis_url: String,
    /// Base URL of the OpenAI-compatible completion/embedding API.
    pub provider_base_url: String,
    /// API key for the completion/embedding provider.
    pub provider_api_key: String,
    /// Log level passed to the tracing subscriber's env filter.
    pub log_level: String,
    /// Comma-separated list of allowed CORS origins. `None` allows any origin.
    pub cors_origins: Option<String>,
    /// Default snapshot TTL in seconds. `None` means snapshots never expire.
    pub snapshot_ttl_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            upload_dir: "./uploads".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            provider_base_url: "https://api.openai.com/v1".to_string(),
            provider_api_key: String::new(),
            log_level: "info".to_string(),
            cors_origins: None,
            snapshot_ttl_seconds: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("POLICYRAG_HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("POLICYRAG_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                config.port = p;
            }
        }
        if let Ok(dir) = env::var("POLICYRAG_UPLOAD_DIR") {
            config.upload_dir = dir;
        }
        if let Ok(url) = env::var("POLICYRAG_REDIS_URL").or_else(|_| env::var("REDIS_URL")) {
            config.redis_url = url;
        }
        if let Ok(url) = env::var("POLICYRAG_PROVIDER_BASE_URL") {
            config.provider_base_url = url;
        }
        if let Ok(key) = env::var("POLICYRAG_PROVIDER_API_KEY").or_else(|_| env::var("OPENAI_API_KEY")) {
            config.provider_api_key = key;
        }
        if let Ok(level) = env::var("POLICYRAG_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Ok(origins) = env::var("POLICYRAG_CORS_ORIGINS") {
            config.cors_origins = Some(origins);
        }
        if let Ok(ttl) = env::var("POLICYRAG_SNAPSHOT_TTL_SECONDS") {
            config.snapshot_ttl_seconds = ttl.parse().ok();
        }

        config
    }

    /// Returns the `host:port` string to bind a TCP listener to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_to_loopback_8080() {
        assert_eq!(Config::default().bind_addr(), "127.0.0.1:8080");
    }
}
