use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::OrderStore;
use crate::domain::order::{
    BuyerOrganizationId, NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderStatus, Product,
    ProductId,
};

// ============================================================================
// PostgreSQL Order Store
// ============================================================================
//
// Works against existing `orders`, `products` and `order_items` tables. Ids
// are generated here; timestamps come from the database via RETURNING.
//
// ============================================================================

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;

        tracing::info!(max_connections, "Connected to PostgreSQL");
        Ok(Self::new(pool))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    status: String,
    buyer_organization_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Order {
        Order {
            id: OrderId(self.id),
            status: OrderStatus::from(self.status),
            buyer_organization_id: BuyerOrganizationId(self.buyer_organization_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    order_id: String,
    product_id: String,
    quantity: i64,
    created_at: DateTime<Utc>,
}

impl OrderItemRow {
    fn into_order_item(self) -> OrderItem {
        OrderItem {
            id: self.id,
            order_id: OrderId(self.order_id),
            product_id: ProductId(self.product_id),
            quantity: self.quantity,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn find_order_by_id(&self, id: &OrderId) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, status, buyer_organization_id, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to load order {}", id))?;

        Ok(row.map(OrderRow::into_order))
    }

    async fn find_product_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to load product {}", id))?;

        Ok(row.map(|(id,)| Product { id: ProductId(id) }))
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order> {
        let id = Uuid::new_v4().to_string();

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (id, status, buyer_organization_id, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, status, buyer_organization_id, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(order.status.as_str())
        .bind(order.buyer_organization_id.as_str())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert order")?;

        tracing::debug!(order_id = %row.id, "Inserted order row");
        Ok(row.into_order())
    }

    async fn insert_order_item(&self, item: NewOrderItem) -> Result<OrderItem> {
        let id = Uuid::new_v4().to_string();

        let row = sqlx::query_as::<_, OrderItemRow>(
            r#"
            INSERT INTO order_items (id, order_id, product_id, quantity, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, order_id, product_id, quantity, created_at
            "#,
        )
        .bind(&id)
        .bind(item.order_id.as_str())
        .bind(item.product_id.as_str())
        .bind(item.quantity)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to insert item into order {}", item.order_id))?;

        tracing::debug!(order_id = %row.order_id, item_id = %row.id, "Inserted order item row");
        Ok(row.into_order_item())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
//
// Queries need a live PostgreSQL instance; only row mapping is covered here.
//
