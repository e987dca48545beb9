//! Requirement extraction service using LLM
//!
//! Turns product documents into structured [`Requirement`]s using rig-core.

use std::collections::HashSet;

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::providers::openai;

use crate::model::extraction::ExtractedRequirements;
use crate::model::{Requirement, SourceDocument};
use crate::service::llm::LlmClient;
use crate::service::requirements::converters::convert_requirements;
use crate::service::requirements::prompts::{
    EXTRACTION_SYSTEM_PROMPT, MAX_DOCUMENT_CHARS, build_extraction_prompt,
};

pub mod converters;
pub mod error;
pub mod prompts;

pub use error::ExtractionError;

/// Environment variable for requirement extraction model (defaults to gpt-4o-mini if not set)
const ENV_REQUIREMENT_EXTRACTION_MODEL: &str = "REQUIREMENT_EXTRACTION_MODEL";

const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

/// Source of requirements for a single document
#[async_trait]
pub trait RequirementExtractor: Send + Sync {
    /// Extract the testable requirements stated in `document`, in document order
    async fn extract(&self, document: &SourceDocument) -> Result<Vec<Requirement>, ExtractionError>;
}

/// Extractor backed by an OpenAI structured-output call
pub struct LlmRequirementExtractor {
    llm_client: LlmClient,
    model: String,
}

impl LlmRequirementExtractor {
    /// Uses REQUIREMENT_EXTRACTION_MODEL env var (defaults to gpt-4o-mini).
    pub fn new(llm_client: LlmClient) -> Self {
        let model = std::env::var(ENV_REQUIREMENT_EXTRACTION_MODEL)
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        tracing::info!(model = %model, "Requirement extraction service initialized");
        Self { llm_client, model }
    }
}

#[async_trait]
impl RequirementExtractor for LlmRequirementExtractor {
    async fn extract(&self, document: &SourceDocument) -> Result<Vec<Requirement>, ExtractionError> {
        if document.content.trim().is_empty() {
            tracing::debug!(document = %document.filename, "Skipping empty document");
            return Ok(vec![]);
        }

        let prompt = build_extraction_prompt(document);
        let prompt_length = prompt.len();

        tracing::debug!(
            document = %document.filename,
            model = %self.model,
            prompt_length = prompt_length,
            truncated = document.content.chars().count() > MAX_DOCUMENT_CHARS,
            "Initiating OpenAI API call for requirement extraction"
        );

        let start_time = std::time::Instant::now();

        let extractor = self
            .llm_client
            .openai_client()
            .extractor::<ExtractedRequirements>(&self.model)
            .preamble(EXTRACTION_SYSTEM_PROMPT)
            .additional_params(serde_json::json!({
                "temperature": 0.3
            }))
            .build();

        let extracted = match extractor.extract(&prompt).await {
            Ok(result) => {
                tracing::info!(
                    document = %document.filename,
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    requirements_extracted = result.requirements.len(),
                    "OpenAI API call completed successfully"
                );
                result
            }
            Err(e) => {
                tracing::error!(
                    document = %document.filename,
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    error = %e,
                    "OpenAI API call failed"
                );
                return Err(ExtractionError::ExtractionFailed(e.to_string()));
            }
        };

        Ok(convert_requirements(extracted.requirements, document))
    }
}

/// Extract requirements from every document, concatenated in document order.
///
/// Documents are extracted concurrently. A failing document is logged and
/// skipped. Ids repeated across documents get a numeric suffix so ids stay
/// unique within the run.
pub async fn extract_requirements_from_documents(
    extractor: &dyn RequirementExtractor,
    documents: &[SourceDocument],
) -> Vec<Requirement> {
    let results =
        futures::future::join_all(documents.iter().map(|document| extractor.extract(document)))
            .await;

    let mut all_requirements = Vec::new();
    let mut failed = 0;

    for (document, result) in documents.iter().zip(results) {
        match result {
            Ok(requirements) => {
                tracing::debug!(
                    document = %document.filename,
                    requirements = requirements.len(),
                    "Requirements extracted from document"
                );
                all_requirements.extend(requirements);
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(
                    document = %document.filename,
                    error = %e,
                    "Failed to extract requirements from document"
                );
            }
        }
    }

    let requirements = disambiguate_ids(all_requirements);

    tracing::info!(
        documents_total = documents.len(),
        documents_failed = failed,
        requirements = requirements.len(),
        "Requirement extraction complete"
    );

    requirements
}

/// Suffix repeated ids with `-2`, `-3`, ... keeping the first occurrence as is
fn disambiguate_ids(requirements: Vec<Requirement>) -> Vec<Requirement> {
    let mut taken: HashSet<String> = HashSet::new();
    requirements
        .into_iter()
        .map(|mut requirement| {
            if !taken.insert(requirement.id.clone()) {
                let renamed = (2..)
                    .map(|n| format!("{}-{}", requirement.id, n))
                    .find(|candidate| !taken.contains(candidate))
                    .unwrap_or_default();
                tracing::debug!(
                    original = %requirement.id,
                    renamed = %renamed,
                    "Duplicate requirement id renamed"
                );
                taken.insert(renamed.clone());
                requirement.id = renamed;
            }
            requirement
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    /// Returns one requirement per line of content; fails on "boom"
    struct LineExtractor;

    #[async_trait]
    impl RequirementExtractor for LineExtractor {
        async fn extract(
            &self,
            document: &SourceDocument,
        ) -> Result<Vec<Requirement>, ExtractionError> {
            if document.content == "boom" {
                return Err(ExtractionError::ExtractionFailed("boom".to_string()));
            }
            Ok(document
                .content
                .lines()
                .map(|line| Requirement {
                    id: line.to_string(),
                    title: line.to_string(),
                    description: String::new(),
                    source_document: document.filename.clone(),
                    priority: Default::default(),
                    category: Default::default(),
                    acceptance_criteria: vec![],
                    compliance_standards: Default::default(),
                    extracted_at: Utc::now(),
                })
                .collect())
        }
    }

    fn document(filename: &str, content: &str) -> SourceDocument {
        SourceDocument {
            filename: filename.to_string(),
            content: content.to_string(),
            doc_type: "prd".to_string(),
        }
    }

    #[tokio::test]
    async fn test_failing_document_is_skipped() {
        let documents = vec![
            document("a.md", "REQ-001\nREQ-002"),
            document("broken.md", "boom"),
            document("b.md", "REQ-003"),
        ];

        let requirements = extract_requirements_from_documents(&LineExtractor, &documents).await;

        let ids: Vec<&str> = requirements.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["REQ-001", "REQ-002", "REQ-003"]);
        assert_eq!(requirements[2].source_document, "b.md");
    }

    #[tokio::test]
    async fn test_ids_unique_across_documents() {
        let documents = vec![
            document("a.md", "REQ-001\nREQ-001-2"),
            document("b.md", "REQ-001"),
        ];

        let requirements = extract_requirements_from_documents(&LineExtractor, &documents).await;

        let ids: Vec<&str> = requirements.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["REQ-001", "REQ-001-2", "REQ-001-3"]);
    }

    #[tokio::test]
    async fn test_no_documents() {
        assert!(
            extract_requirements_from_documents(&LineExtractor, &[])
                .await
                .is_empty()
        );
    }
}
