//! Text embedding
//!
//! The coverage engine only consumes vectors; producing them is delegated to
//! an [`Embedder`] so the engine stays network-free and testable.

use async_trait::async_trait;
use rig::client::EmbeddingsClient;
use rig::embeddings::EmbeddingModel;
use rig::providers::openai;

use crate::service::coverage::{AnalysisError, Embedding};
use crate::service::llm::LlmClient;

/// Environment variable for the embedding model
const ENV_EMBEDDING_MODEL: &str = "EMBEDDING_MODEL";

const DEFAULT_EMBEDDING_MODEL: &str = openai::TEXT_EMBEDDING_3_SMALL;

/// Turns texts into vectors of a single, fixed dimension
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed `texts`, returning one vector per text in the same order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, AnalysisError>;
}

/// Embedder backed by the OpenAI embeddings API
pub struct OpenAiEmbedder {
    llm_client: LlmClient,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(llm_client: LlmClient) -> Self {
        let model = std::env::var(ENV_EMBEDDING_MODEL)
            .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string());

        tracing::info!(model = %model, "Embedding service initialized");

        Self { llm_client, model }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, AnalysisError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let start_time = std::time::Instant::now();
        let model = self.llm_client.openai_client().embedding_model(&self.model);

        let embeddings = model.embed_texts(texts.to_vec()).await.map_err(|e| {
            tracing::error!(
                model = %self.model,
                texts = texts.len(),
                error = %e,
                "OpenAI embeddings call failed"
            );
            AnalysisError::Embedding(e.to_string())
        })?;

        tracing::debug!(
            model = %self.model,
            texts = texts.len(),
            elapsed_ms = start_time.elapsed().as_millis(),
            "OpenAI embeddings call completed"
        );

        Ok(embeddings.into_iter().map(|e| e.vec).collect())
    }
}
