//! Shared LLM client
//!
//! Wraps the OpenAI provider used for requirement extraction, test
//! generation and embeddings.

use rig::providers::openai;

/// Environment variable holding the OpenAI API key
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str) -> Result<Self, String> {
        let client = openai::Client::new(api_key)
            .map_err(|e| format!("Failed to create OpenAI client: {}", e))?;

        Ok(Self { client })
    }

    /// Underlying OpenAI client, for building extractors and embedding models
    pub fn openai_client(&self) -> &openai::Client {
        &self.client
    }
}
