//! Map extracted requirements onto the domain model

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::model::extraction::ExtractedRequirement;
use crate::model::{Category, Priority, Requirement, SourceDocument};

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

const UNTITLED: &str = "Untitled Requirement";

/// Convert one extracted requirement, filling defaults for missing fields.
///
/// `position` is the 1-based index of the requirement within its document and
/// drives the generated `REQ_nnn` id.
pub fn convert_requirement(
    extracted: ExtractedRequirement,
    position: usize,
    document: &SourceDocument,
    extracted_at: DateTime<Utc>,
) -> Requirement {
    let id = extracted
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("REQ_{:03}", position));

    let title = extracted
        .title
        .map(|t| collapse_whitespace(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let description = extracted
        .description
        .map(|d| collapse_whitespace(&d))
        .unwrap_or_default();

    let priority = extracted
        .priority
        .as_deref()
        .map(Priority::from_label)
        .unwrap_or_default();

    let category = extracted
        .category
        .as_deref()
        .map(Category::from_label)
        .unwrap_or_default();

    let acceptance_criteria = extracted
        .acceptance_criteria
        .iter()
        .map(|c| collapse_whitespace(c))
        .filter(|c| !c.is_empty())
        .collect();

    let compliance_standards = extracted
        .compliance_standards
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    Requirement {
        id,
        title,
        description,
        source_document: document.filename.clone(),
        priority,
        category,
        acceptance_criteria,
        compliance_standards,
        extracted_at,
    }
}

/// Convert every requirement extracted from `document`, in order
pub fn convert_requirements(
    extracted: Vec<ExtractedRequirement>,
    document: &SourceDocument,
) -> Vec<Requirement> {
    let extracted_at = Utc::now();
    extracted
        .into_iter()
        .enumerate()
        .map(|(i, r)| convert_requirement(r, i + 1, document, extracted_at))
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
