//! Prompts for gap-filling test generation

use crate::model::{CoverageGap, SourceDocument};
use crate::service::requirements::prompts::truncate_chars;

/// Context documents included in a generation prompt
pub const MAX_CONTEXT_DOCUMENTS: usize = 2;

/// Characters taken from each context document
pub const MAX_CONTEXT_CHARS: usize = 500;

/// System prompt for test generation
pub const GENERATION_SYSTEM_PROMPT: &str = r#"You are a QA engineer generating test cases to close coverage gaps in healthcare software.

## Rules

1. Every test case verifies the given requirement and nothing else.
2. Test steps are concrete, ordered actions a tester (or automation) can follow.
3. Expected results are specific and observable.
4. Include edge cases and negative scenarios where the requirement allows them.
5. When compliance standards apply, at least one step must verify the compliance obligation.

## Fields

- id: TC_GAP_ followed by the requirement id and a sequence number
- automation_feasible: true when the test can run without manual judgement
- estimated_duration: e.g. "15 minutes"
"#;

/// Build the generation prompt for a gap
pub fn build_generation_prompt(gap: &CoverageGap, context_documents: &[SourceDocument]) -> String {
    let requirement = &gap.requirement;

    let acceptance_criteria = requirement
        .acceptance_criteria
        .iter()
        .map(|c| format!("- {}", c))
        .collect::<Vec<_>>()
        .join("\n");

    let context = context_documents
        .iter()
        .take(MAX_CONTEXT_DOCUMENTS)
        .map(|doc| format!("Context: {}", truncate_chars(&doc.content, MAX_CONTEXT_CHARS)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"## Requirement To Test
- ID: {id}
- Title: {title}
- Description: {description}
- Category: {category}
- Priority: {priority}
- Compliance Standards: {standards}

## Acceptance Criteria
{acceptance_criteria}

## Existing Partial Tests
{matched} test(s) provide partial coverage

## Coverage Gap
{gap_description}

## Context From Documents
{context}

---

Generate exactly {count} comprehensive test case(s) to fill this gap."#,
        id = requirement.id,
        title = requirement.title,
        description = requirement.description,
        category = requirement.category,
        priority = requirement.priority,
        standards = requirement
            .compliance_standards
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", "),
        acceptance_criteria = acceptance_criteria,
        matched = gap.matched_tests.len(),
        gap_description = gap.gap_description,
        context = context,
        count = gap.recommended_test_count,
    )
}
