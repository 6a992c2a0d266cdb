// ============================================================================
// Order Store - Narrow access layer over the relational store
// ============================================================================
//
// The schema and the database itself are owned elsewhere. Everything the
// order service needs from persistence goes through this trait, so the
// service can run against PostgreSQL or the in-memory store unchanged.
//
// ============================================================================

mod memory;
mod postgres;

pub use memory::{InMemoryOrderStore, StoreCallCounts};
pub use postgres::PgOrderStore;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::order::{NewOrder, NewOrderItem, Order, OrderId, OrderItem, Product, ProductId};

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_order_by_id(&self, id: &OrderId) -> Result<Option<Order>>;

    async fn find_product_by_id(&self, id: &ProductId) -> Result<Option<Product>>;

    /// Insert an order and return it with store-assigned id and timestamps
    async fn insert_order(&self, order: NewOrder) -> Result<Order>;

    async fn insert_order_item(&self, item: NewOrderItem) -> Result<OrderItem>;
}
