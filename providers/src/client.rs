use std::sync::Arc;

use reqwest::Client as HttpClient;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_EMBEDDING_DIM: usize = 1536;
const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";

/// Static configuration for talking to an OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) embedding_model: String,
    pub(crate) embedding_dim: usize,
    pub(crate) completion_model: String,
}

impl Config {
    pub(crate) fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }

    pub(crate) fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// A client implementing [`policyrag_core::EmbeddingModel`] and
/// [`policyrag_core::Generator`] over an OpenAI-compatible HTTP API.
///
/// `Provider` is the default provider for this workspace: both the embedding
/// and completion endpoints the rest of the system depends on are reachable
/// through whichever deployment (OpenAI itself, or a self-hosted/compatible
/// gateway) `base_url` points at.
#[derive(Debug, Clone)]
pub struct Provider {
    pub(crate) http: HttpClient,
    pub(crate) config: Arc<Config>,
}

impl Provider {
    /// Creates a provider pointed at the public OpenAI API with the given key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            config: Arc::new(Config {
                base_url: DEFAULT_BASE_URL.to_string(),
                api_key: api_key.into(),
                embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
                embedding_dim: DEFAULT_EMBEDDING_DIM,
                completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            }),
        }
    }

    /// Overrides the API base URL (for self-hosted or compatible gateways).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).base_url = base_url.into();
        self
    }

    /// Overrides the embedding model name and its output dimension.
    #[must_use]
    pub fn with_embedding_model(mut self, model: impl Into<String>, dim: usize) -> Self {
        let config = Arc::make_mut(&mut self.config);
        config.embedding_model = model.into();
        config.embedding_dim = dim;
        self
    }

    /// Overrides the chat/completion model name.
    #[must_use]
    pub fn with_completion_model(mut self, model: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).completion_model = model.into();
        self
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.config.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let provider = Provider::new("sk-test")
            .with_base_url("https://gateway.internal/v1")
            .with_embedding_model("custom-embed", 768)
            .with_completion_model("custom-chat");

        assert_eq!(provider.config().embedding_dim, 768);
        assert_eq!(provider.config().embedding_model, "custom-embed");
        assert_eq!(provider.config().completion_model, "custom-chat");
        assert_eq!(
            provider.config().embeddings_url(),
            "https://gateway.internal/v1/embeddings"
        );
    }
}
