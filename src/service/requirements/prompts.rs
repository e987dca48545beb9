//! Prompts for requirement extraction

use crate::model::SourceDocument;

/// Characters of document content sent to the model
pub const MAX_DOCUMENT_CHARS: usize = 4000;

/// System prompt for requirement extraction
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are a requirements analyst for healthcare software. Your task is to extract testable requirements from product documentation.

## Rules

1. **Only extract TESTABLE requirements.**
   - A requirement states behaviour that a test can pass or fail.
   - Background, marketing copy and open questions are NOT requirements.

2. **Be specific and detailed.**
   - The title names the capability ("User Authentication"), not the document section.
   - The description states what the system must do.

3. **Include every acceptance criterion** as its own short, checkable condition.

4. **Identify applicable compliance standards** (HIPAA, GDPR, FDA 21 CFR Part 11, ISO 27001, IEC 62304, ...).
   Leave the list empty when none apply.

## Fields

- id: REQ-001, REQ-002, ... in document order
- priority: Critical | High | Medium | Low
- category: Functional | Security | Integration | Performance | Compliance | Usability

Return an empty requirements array if the document contains no testable requirements.
"#;

/// Build extraction prompt from document
pub fn build_extraction_prompt(document: &SourceDocument) -> String {
    format!(
        r#"Extract all testable requirements from the following document.

## Document Information
- Name: {}
- Type: {}

## Document Content

{}

---

For each requirement return: id, title, description, priority, category,
acceptance_criteria (list) and compliance_standards (list)."#,
        document.filename,
        document.doc_type,
        truncate_chars(&document.content, MAX_DOCUMENT_CHARS)
    )
}

/// Longest prefix of `text` holding at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_prompt_truncates_content() {
        let document = SourceDocument {
            filename: "prd.md".to_string(),
            content: "x".repeat(MAX_DOCUMENT_CHARS + 500),
            doc_type: "prd".to_string(),
        };
        let prompt = build_extraction_prompt(&document);

        assert!(prompt.contains("- Name: prd.md"));
        assert!(prompt.contains(&"x".repeat(MAX_DOCUMENT_CHARS)));
        assert!(!prompt.contains(&"x".repeat(MAX_DOCUMENT_CHARS + 1)));
    }
}
