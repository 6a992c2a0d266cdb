use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::OrderStore;
use crate::domain::order::{
    NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderStatus, Product, ProductId,
};

/// Number of calls made against the store, per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCallCounts {
    pub order_reads: usize,
    pub product_reads: usize,
    pub order_inserts: usize,
    pub item_inserts: usize,
}

/// Process-local store used when no database is configured, and by tests.
#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
    products: RwLock<HashMap<ProductId, Product>>,
    items: RwLock<Vec<OrderItem>>,
    unavailable: AtomicBool,
    /// Calls left before the store starts failing
    calls_before_failure: Mutex<Option<usize>>,
    order_reads: AtomicUsize,
    product_reads: AtomicUsize,
    order_inserts: AtomicUsize,
    item_inserts: AtomicUsize,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_product(&self, id: impl Into<String>) -> Product {
        let product = Product {
            id: ProductId::new(id),
        };
        self.products
            .write()
            .await
            .insert(product.id.clone(), product.clone());
        product
    }

    /// Move an order to another status, the way the rest of the system would
    pub async fn set_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<()> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(id) {
            Some(order) => {
                order.status = status;
                order.updated_at = Utc::now();
                Ok(())
            }
            None => bail!("Order does not exist: {}", id),
        }
    }

    pub async fn items_for_order(&self, id: &OrderId) -> Vec<OrderItem> {
        self.items
            .read()
            .await
            .iter()
            .filter(|item| &item.order_id == id)
            .cloned()
            .collect()
    }

    /// Make every subsequent call fail, simulating a lost connection
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Let the next `calls` calls succeed and fail every one after them
    pub fn fail_after_calls(&self, calls: usize) -> Result<()> {
        *self
            .calls_before_failure
            .lock()
            .map_err(|_| anyhow!("call budget lock poisoned"))? = Some(calls);
        Ok(())
    }

    pub fn call_counts(&self) -> StoreCallCounts {
        StoreCallCounts {
            order_reads: self.order_reads.load(Ordering::SeqCst),
            product_reads: self.product_reads.load(Ordering::SeqCst),
            order_inserts: self.order_inserts.load(Ordering::SeqCst),
            item_inserts: self.item_inserts.load(Ordering::SeqCst),
        }
    }

    fn ensure_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            bail!("in-memory store is unavailable");
        }

        let mut budget = self
            .calls_before_failure
            .lock()
            .map_err(|_| anyhow!("call budget lock poisoned"))?;
        if let Some(remaining) = budget.as_mut() {
            if *remaining == 0 {
                bail!("in-memory store is unavailable");
            }
            *remaining -= 1;
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_order_by_id(&self, id: &OrderId) -> Result<Option<Order>> {
        self.order_reads.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;
        Ok(self.orders.read().await.get(id).cloned())
    }

    async fn find_product_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        self.product_reads.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order> {
        self.order_inserts.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;

        let now = Utc::now();
        let order = Order {
            id: OrderId::new(Uuid::new_v4().to_string()),
            status: order.status,
            buyer_organization_id: order.buyer_organization_id,
            created_at: now,
            updated_at: now,
        };

        self.orders
            .write()
            .await
            .insert(order.id.clone(), order.clone());

        tracing::debug!(order_id = %order.id, "Stored order in memory");
        Ok(order)
    }

    async fn insert_order_item(&self, item: NewOrderItem) -> Result<OrderItem> {
        self.item_inserts.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;

        let item = OrderItem {
            id: Uuid::new_v4().to_string(),
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            created_at: Utc::now(),
        };

        self.items.write().await.push(item.clone());

        tracing::debug!(order_id = %item.order_id, item_id = %item.id, "Stored order item in memory");
        Ok(item)
    }
}
