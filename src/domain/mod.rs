// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Domain types and rules, kept apart from storage and transport.
//
// ============================================================================

pub mod order;
