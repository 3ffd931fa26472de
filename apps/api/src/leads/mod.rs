// CRM domain: lead types, reconciliation, filtering, export and the durable slot.
// Nothing outside `session` mutates a lead collection except through `reconciler`.

pub mod export;
pub mod filters;
pub mod models;
pub mod reconciler;
pub mod store;
