pub mod coverage;
pub mod embedding;
pub mod gap_analysis;
pub mod generation;
pub mod llm;
pub mod requirements;

pub use embedding::OpenAiEmbedder;
pub use gap_analysis::GapAnalysisService;
pub use generation::LlmTestCaseGenerator;
pub use llm::LlmClient;
pub use requirements::LlmRequirementExtractor;
