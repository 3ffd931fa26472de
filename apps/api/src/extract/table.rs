//! Table Extractor — turns LLM-generated markdown tables into business records.
//!
//! The input is untrusted text. Rows that do not fit the expected shape are
//! skipped; extraction never fails as a whole.
//!
//! Columns map positionally: `| Name | Phone Number | Review Count | Address |`.

use crate::leads::models::{BusinessRecord, DEFAULT_PHONE, DEFAULT_REVIEWS};

/// Minimum number of cells (between the boundary pipes) a row needs.
const MIN_CELLS: usize = 3;

/// Extracts business records from a markdown table, preserving row order.
///
/// Header rows (anything mentioning "name") and `---` separator rows are
/// dropped. No deduplication happens here.
pub fn extract_businesses(markdown: &str) -> Vec<BusinessRecord> {
    markdown
        .split('\n')
        .filter(|line| is_data_row(line))
        .filter_map(parse_row)
        .filter(|record| !record.name.is_empty())
        .collect()
}

fn is_data_row(line: &str) -> bool {
    line.contains('|') && !line.to_lowercase().contains("name") && !line.contains("---")
}

fn parse_row(line: &str) -> Option<BusinessRecord> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    // Boundary pipes leave empty cells at either end; interior empties are
    // real (missing) values and keep their column position.
    if cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    if cells.first().is_some_and(|cell| cell.is_empty()) {
        cells.remove(0);
    }

    if cells.len() < MIN_CELLS {
        return None;
    }

    let cell = |i: usize| cells.get(i).copied().unwrap_or_default();
    let or_default = |value: &str, fallback: &str| {
        if value.is_empty() {
            fallback.to_string()
        } else {
            value.to_string()
        }
    };

    Some(BusinessRecord {
        name: cell(0).to_string(),
        phone: or_default(cell(1), DEFAULT_PHONE),
        review_count: or_default(cell(2), DEFAULT_REVIEWS),
        address: cell(3).to_string(),
    })
}
