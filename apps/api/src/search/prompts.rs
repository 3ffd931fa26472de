// Prompt templates for the Search Orchestrator.

use crate::llm_client::prompts::fill_template;

/// Only the most recent names are listed in the exclusion hint. This bounds
/// prompt length; it is not deduplication.
pub const MAX_EXCLUDED_NAMES: usize = 20;

/// Exclusion line. Replace `{names}` with a comma-separated list.
pub const EXCLUSION_TEMPLATE: &str =
    "IMPORTANT: Exclude the following businesses which I already have: {names}.";

/// Search prompt. Replace `{count}`, `{service}`, `{city}` and `{exclusion}`.
pub const SEARCH_PROMPT_TEMPLATE: &str = r#"Find exactly {count} unique businesses that provide "{service}" in "{city}".
{exclusion}
Provide the information in a Markdown table with exactly these columns:
| Name | Phone Number | Review Count | Address |

Rules:
- EXACTLY {count} rows (no more, no less).
- If phone is missing, write "N/A" (do not invent).
- If review count is missing, write "0".
- Do NOT add extra text outside the table."#;

/// Builds the search prompt. `excluded_names` is ordered oldest-first; the
/// last `MAX_EXCLUDED_NAMES` entries are kept.
pub fn build_search_prompt(service: &str, city: &str, count: u32, excluded_names: &[String]) -> String {
    let exclusion = if excluded_names.is_empty() {
        String::new()
    } else {
        let start = excluded_names.len().saturating_sub(MAX_EXCLUDED_NAMES);
        let names = excluded_names[start..].join(", ");
        fill_template(EXCLUSION_TEMPLATE, &[("names", names.as_str())])
    };

    let count = count.to_string();
    fill_template(
        SEARCH_PROMPT_TEMPLATE,
        &[
            ("count", count.as_str()),
            ("service", service),
            ("city", city),
            ("exclusion", exclusion.as_str()),
        ],
    )
}
