use policyrag_core::{EmbeddingModel, Result as CoreResult};
use serde::{Deserialize, Serialize};

use crate::{client::Provider, error::ProviderError};

impl EmbeddingModel for Provider {
    fn dim(&self) -> usize {
        self.config().embedding_dim
    }

    fn embed(&self, text: &str) -> impl core::future::Future<Output = CoreResult<Vec<f32>>> + Send {
        let provider = self.clone();
        let input = text.to_owned();
        async move { Ok(embed_once(&provider, &input).await?) }
    }
}

async fn embed_once(provider: &Provider, input: &str) -> Result<Vec<f32>, ProviderError> {
    let request = EmbeddingRequest {
        model: &provider.config().embedding_model,
        input,
    };

    let response = provider
        .http
        .post(provider.config().embeddings_url())
        .header(reqwest::header::AUTHORIZATION, provider.bearer())
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(crate::generator::map_error_status(response).await);
    }

    let body: EmbeddingResponse = response.json().await?;
    body.data
        .into_iter()
        .next()
        .map(|item| item.embedding)
        .ok_or_else(|| ProviderError::Api("embedding response missing vector data".into()))
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}
