// Search Orchestrator: prompt synthesis + single grounded generation call.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
