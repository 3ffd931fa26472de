// Script Orchestrator: cold-call script generation for a single lead.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
