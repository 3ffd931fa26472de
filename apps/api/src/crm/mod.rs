// Finder and CRM routes: session-backed search, lead management, export.

pub mod handlers;
pub mod views;
