use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Business priority assigned to a requirement (or test) by its author.
///
/// Parsing is total: unrecognised labels fall back to `Medium`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(from = "String")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Priority::Critical,
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            other => {
                tracing::debug!(priority = %other, "Unknown priority, defaulting to Medium");
                Priority::Medium
            }
        }
    }

    /// Weight used when ranking gaps.
    pub fn weight(self) -> u32 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::from_label(&value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requirement category. `Other` absorbs any label outside the known set.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(from = "String")]
pub enum Category {
    #[default]
    Functional,
    Security,
    Integration,
    Performance,
    Compliance,
    Usability,
    Other,
}

impl Category {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "functional" => Category::Functional,
            "security" => Category::Security,
            "integration" => Category::Integration,
            "performance" => Category::Performance,
            "compliance" => Category::Compliance,
            "usability" => Category::Usability,
            other => {
                tracing::debug!(category = %other, "Unknown category, using default test types");
                Category::Other
            }
        }
    }

    /// Kinds of tests that best exercise a requirement of this category.
    pub fn suggested_test_types(self) -> &'static [&'static str] {
        match self {
            Category::Functional => &["unit", "integration", "e2e"],
            Category::Security => &["security", "penetration", "compliance"],
            Category::Integration => &["integration", "api", "e2e"],
            Category::Performance => &["performance", "load", "stress"],
            Category::Compliance => &["compliance", "audit", "security"],
            Category::Usability => &["usability", "e2e", "acceptance"],
            Category::Other => &["integration"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Functional => "Functional",
            Category::Security => "Security",
            Category::Integration => "Integration",
            Category::Performance => "Performance",
            Category::Compliance => "Compliance",
            Category::Usability => "Usability",
            Category::Other => "Other",
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from_label(&value)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// A testable statement extracted from a source document.
// Owned by the extractor; the coverage engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Requirement {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source_document: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub compliance_standards: BTreeSet<String>,
    #[serde(default = "Utc::now")]
    pub extracted_at: DateTime<Utc>,
}

impl Requirement {
    /// Text handed to the embedder.
    pub fn embedding_text(&self) -> String {
        format!("{}. {}", self.title, self.description)
    }
}

/// Uploaded document that requirements are extracted from
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SourceDocument {
    pub filename: String,
    pub content: String,
    /// prd, user_story, api_spec, ...
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
}

fn default_doc_type() -> String {
    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parsing_is_case_insensitive() {
        assert_eq!(Priority::from_label("critical"), Priority::Critical);
        assert_eq!(Priority::from_label(" HIGH "), Priority::High);
        assert_eq!(Priority::from_label("Low"), Priority::Low);
    }

    #[test]
    fn test_unknown_priority_defaults_to_medium() {
        assert_eq!(Priority::from_label("urgent"), Priority::Medium);
        assert_eq!(Priority::from_label(""), Priority::Medium);
    }

    #[test]
    fn test_unknown_category_maps_to_other() {
        assert_eq!(Category::from_label("Reliability"), Category::Other);
        assert_eq!(Category::Other.suggested_test_types(), &["integration"]);
    }

    #[test]
    fn test_requirement_deserializes_with_defaults() {
        let json = r#"{
            "id": "REQ-001",
            "title": "User Authentication",
            "priority": "bogus",
            "category": "security",
            "compliance_standards": ["HIPAA", "HIPAA", "GDPR"]
        }"#;
        let req: Requirement = serde_json::from_str(json).unwrap();

        assert_eq!(req.priority, Priority::Medium);
        assert_eq!(req.category, Category::Security);
        assert_eq!(req.compliance_standards.len(), 2);
        assert!(req.acceptance_criteria.is_empty());
        assert_eq!(req.embedding_text(), "User Authentication. ");
    }

    #[test]
    fn test_priority_serializes_as_label() {
        let value = serde_json::to_value(Priority::High).unwrap();
        assert_eq!(value, serde_json::json!("High"));
    }
}
