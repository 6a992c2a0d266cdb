// ============================================================================
// Draft Orders - create draft orders and attach line items to them
// ============================================================================

pub mod config;
pub mod domain;
pub mod http;
pub mod metrics;
pub mod store;
