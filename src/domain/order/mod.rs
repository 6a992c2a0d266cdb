// ============================================================================
// Order Domain - Draft orders and their line items
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (OrderId, OrderStatus, Order, OrderItem, ...)
// - Commands (AddItemToDraftOrder)
// - Errors (ServiceError enum)
// - Service (OrderService: create draft order, add item to draft order)
//
// Persistence is reached only through the `OrderStore` trait.
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod service;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use service::*;
