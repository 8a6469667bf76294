//! Shared application state handed to every route handler.

use policyrag_pdf::PdfLoader;
use policyrag_providers::Provider;
use policyrag_store::RedisStore;

use crate::config::Config;

/// State shared across all handlers: the completion/embedding provider, the
/// snapshot store, the PDF loader, and the resolved configuration.
pub struct AppState {
    /// OpenAI-compatible provider used for both embeddings and completions.
    pub provider: Provider,
    /// Redis-backed snapshot store.
    pub store: RedisStore,
    /// Loads PDFs from the configured upload directory.
    pub pdf_loader: PdfLoader,
    /// The configuration this state was built from.
    pub config: Config,
}

impl AppState {
    /// Connects to Redis and builds application state from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`policyrag_store::StoreError`] if the Redis connection fails.
    pub async fn new(config: Config) -> policyrag_store::Result<Self> {
        let store = RedisStore::connect(&config.redis_url).await?;
        let provider = Provider::new(config.provider_api_key.clone())
            .with_base_url(config.provider_base_url.clone());
        let pdf_loader = PdfLoader::new(config.upload_dir.clone());

        Ok(Self {
            provider,
            store,
            pdf_loader,
            config,
        })
    }
}
