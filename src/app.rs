//! Application state and service initialization
//!
//! Centralizes service construction so handlers only see the finished
//! dependency graph.

use std::sync::Arc;

use crate::model::Config;
use crate::service::llm::ENV_OPENAI_API_KEY;
use crate::service::{
    GapAnalysisService, LlmClient, LlmRequirementExtractor, LlmTestCaseGenerator, OpenAiEmbedder,
};

/// Application state containing all services and shared resources
pub struct AppState {
    pub gap_analysis_service: GapAnalysisService,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// Requires OPENAI_API_KEY; extraction, generation and embeddings share
    /// one client.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let api_key = std::env::var(ENV_OPENAI_API_KEY)
            .map_err(|_| AppError::MissingConfig(ENV_OPENAI_API_KEY))?;

        let llm_client = LlmClient::new(&api_key)
            .map_err(|_| AppError::InvalidConfig("Invalid OPENAI_API_KEY"))?;

        config
            .thresholds
            .validate()
            .map_err(|_| AppError::InvalidConfig("Invalid coverage thresholds"))?;

        let gap_analysis_service = GapAnalysisService::new(
            Arc::new(OpenAiEmbedder::new(llm_client.clone())),
            Arc::new(LlmRequirementExtractor::new(llm_client.clone())),
            Arc::new(LlmTestCaseGenerator::new(llm_client)),
            config.thresholds,
        );

        Ok(Self {
            gap_analysis_service,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
