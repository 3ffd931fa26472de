// Extraction of structured results from untrusted LLM output.
// Both extractors are pure and never fail; callers decide what an empty result means.

pub mod sources;
pub mod table;

pub use sources::{extract_markdown, extract_sources};
pub use table::extract_businesses;
