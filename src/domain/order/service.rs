use std::sync::Arc;

use crate::store::OrderStore;

use super::commands::AddItemToDraftOrder;
use super::errors::ServiceError;
use super::value_objects::{
    BuyerOrganizationId, NewOrder, NewOrderItem, Order, OrderId, OrderItem, ProductId,
};

// ============================================================================
// Order Service
// ============================================================================
//
// Orchestrates: Request → Validate → Store reads → Store write
//
// The order status is read and the item inserted in separate store calls
// with nothing held in between. Two concurrent attachments can both see
// DRAFT while the order is moved on elsewhere.
//
// ============================================================================

/// Settings the order service needs, injected at construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderServiceConfig {
    /// Buyer used when the caller does not supply one (`SEED_BUYER_ORG_ID`)
    pub default_buyer_organization_id: Option<String>,
}

pub struct OrderService {
    store: Arc<dyn OrderStore>,
    config: OrderServiceConfig,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, config: OrderServiceConfig) -> Self {
        Self { store, config }
    }

    /// Pick the buyer: explicit argument, then configuration, then placeholder.
    /// Empty strings count as absent.
    // TODO: replace with the caller's organization once requests are authenticated
    pub fn resolve_buyer_organization_id(&self, requested: Option<&str>) -> BuyerOrganizationId {
        let configured = self.config.default_buyer_organization_id.as_deref();

        match requested.filter(|id| !id.is_empty()) {
            Some(id) => BuyerOrganizationId::new(id),
            None => match configured.filter(|id| !id.is_empty()) {
                Some(id) => {
                    tracing::debug!(buyer_organization_id = %id, "Using configured buyer organization");
                    BuyerOrganizationId::new(id)
                }
                None => {
                    tracing::debug!("No buyer organization supplied, using placeholder");
                    BuyerOrganizationId::placeholder()
                }
            },
        }
    }

    /// Create a new order in DRAFT status
    pub async fn create_draft_order(
        &self,
        buyer_organization_id: Option<&str>,
    ) -> Result<Order, ServiceError> {
        let buyer = self.resolve_buyer_organization_id(buyer_organization_id);

        let order = self.store.insert_order(NewOrder::draft(buyer)).await?;

        tracing::info!(
            order_id = %order.id,
            buyer_organization_id = %order.buyer_organization_id,
            "Created draft order"
        );

        Ok(order)
    }

    /// Attach a line item to an existing DRAFT order.
    ///
    /// Checks run in a fixed order and stop at the first failure: product id,
    /// quantity, order existence, order status, product existence. Nothing is
    /// written unless all of them pass. No pricing or stock checks.
    pub async fn add_item_to_draft_order(
        &self,
        command: AddItemToDraftOrder,
    ) -> Result<OrderItem, ServiceError> {
        let product_id = match command.product_id {
            Some(id) if !id.is_empty() => ProductId::new(id),
            _ => {
                return Err(ServiceError::bad_request(
                    "productId is required and must be a string",
                ))
            }
        };

        let quantity = match command.quantity {
            Some(quantity) if quantity > 0 => quantity,
            _ => {
                return Err(ServiceError::bad_request(
                    "quantity must be a number greater than 0",
                ))
            }
        };

        let order_id = OrderId::new(command.order_id);

        let order = self
            .store
            .find_order_by_id(&order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order not found"))?;

        if !order.status.is_draft() {
            tracing::warn!(
                order_id = %order.id,
                status = %order.status,
                "Rejected item for order that is not a draft"
            );
            return Err(ServiceError::conflict(
                "Items can only be added to orders with status DRAFT",
            ));
        }

        if self.store.find_product_by_id(&product_id).await?.is_none() {
            return Err(ServiceError::bad_request("Product not found"));
        }

        let item = self
            .store
            .insert_order_item(NewOrderItem {
                order_id: order.id,
                product_id,
                quantity,
            })
            .await?;

        tracing::info!(
            order_id = %item.order_id,
            item_id = %item.id,
            product_id = %item.product_id,
            quantity = item.quantity,
            "Added item to draft order"
        );

        Ok(item)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderStatus, PLACEHOLDER_BUYER_ORGANIZATION_ID};
    use crate::store::{InMemoryOrderStore, StoreCallCounts};

    fn service_with(
        store: Arc<InMemoryOrderStore>,
        default_buyer: Option<&str>,
    ) -> OrderService {
        OrderService::new(
            store,
            OrderServiceConfig {
                default_buyer_organization_id: default_buyer.map(str::to_string),
            },
        )
    }

    async fn draft_order_with_product() -> (Arc<InMemoryOrderStore>, OrderService, Order) {
        let store = Arc::new(InMemoryOrderStore::new());
        store.insert_product("prod-1").await;
        let service = service_with(store.clone(), None);
        let order = service.create_draft_order(None).await.unwrap();
        (store, service, order)
    }

    // ------------------------------------------------------------------------
    // Order creation
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_draft_order_defaults_to_placeholder() {
        let store = Arc::new(InMemoryOrderStore::new());
        let service = service_with(store.clone(), None);

        let order = service.create_draft_order(None).await.unwrap();

        assert_eq!(order.status, OrderStatus::Draft);
        assert_eq!(
            order.buyer_organization_id.as_str(),
            PLACEHOLDER_BUYER_ORGANIZATION_ID
        );
        assert_eq!(store.call_counts().order_inserts, 1);
    }

    #[tokio::test]
    async fn test_create_draft_order_uses_configured_buyer() {
        let service = service_with(Arc::new(InMemoryOrderStore::new()), Some("org-123"));

        let order = service.create_draft_order(None).await.unwrap();

        assert_eq!(order.buyer_organization_id.as_str(), "org-123");
    }

    #[tokio::test]
    async fn test_explicit_buyer_takes_precedence() {
        let configured = service_with(Arc::new(InMemoryOrderStore::new()), Some("org-123"));
        let unconfigured = service_with(Arc::new(InMemoryOrderStore::new()), None);

        for service in [configured, unconfigured] {
            let order = service.create_draft_order(Some("org-xyz")).await.unwrap();
            assert_eq!(order.buyer_organization_id.as_str(), "org-xyz");
            assert_eq!(order.status, OrderStatus::Draft);
        }
    }

    #[tokio::test]
    async fn test_empty_buyer_values_fall_through() {
        let service = service_with(Arc::new(InMemoryOrderStore::new()), Some(""));

        let order = service.create_draft_order(Some("")).await.unwrap();

        assert_eq!(
            order.buyer_organization_id.as_str(),
            PLACEHOLDER_BUYER_ORGANIZATION_ID
        );
    }

    #[tokio::test]
    async fn test_create_draft_order_propagates_store_failure() {
        let store = Arc::new(InMemoryOrderStore::new());
        store.set_unavailable(true);
        let service = service_with(store, None);

        let err = service.create_draft_order(None).await.unwrap_err();

        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(err.status_code(), 500);
    }

    // ------------------------------------------------------------------------
    // Item attachment
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_add_item_succeeds_for_draft_order() {
        let (store, service, order) = draft_order_with_product().await;

        let item = service
            .add_item_to_draft_order(AddItemToDraftOrder::new(order.id.as_str(), "prod-1", 3))
            .await
            .unwrap();

        assert_eq!(item.order_id, order.id);
        assert_eq!(item.product_id.as_str(), "prod-1");
        assert_eq!(item.quantity, 3);

        let persisted = store.items_for_order(&order.id).await;
        assert_eq!(persisted, vec![item]);
    }

    #[tokio::test]
    async fn test_add_item_touches_store_once_per_step() {
        let (store, service, order) = draft_order_with_product().await;
        let before = store.call_counts();

        service
            .add_item_to_draft_order(AddItemToDraftOrder::new(order.id.as_str(), "prod-1", 1))
            .await
            .unwrap();

        let after = store.call_counts();
        assert_eq!(
            after,
            StoreCallCounts {
                order_reads: before.order_reads + 1,
                product_reads: before.product_reads + 1,
                order_inserts: before.order_inserts,
                item_inserts: before.item_inserts + 1,
            }
        );
    }

    #[tokio::test]
    async fn test_empty_product_id_is_rejected() {
        let (store, service, order) = draft_order_with_product().await;

        let err = service
            .add_item_to_draft_order(AddItemToDraftOrder::new(order.id.as_str(), "", 5))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::BadRequest(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "productId is required and must be a string");
        assert_eq!(store.call_counts().item_inserts, 0);
    }

    #[tokio::test]
    async fn test_missing_product_id_is_rejected() {
        let (_, service, order) = draft_order_with_product().await;

        let err = service
            .add_item_to_draft_order(AddItemToDraftOrder {
                order_id: order.id.0.clone(),
                product_id: None,
                quantity: Some(1),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_is_rejected() {
        let (store, service, order) = draft_order_with_product().await;

        for quantity in [0, -3] {
            let err = service
                .add_item_to_draft_order(AddItemToDraftOrder::new(
                    order.id.as_str(),
                    "prod-1",
                    quantity,
                ))
                .await
                .unwrap_err();

            assert!(matches!(err, ServiceError::BadRequest(_)));
            assert_eq!(err.message(), "quantity must be a number greater than 0");
        }

        let missing = service
            .add_item_to_draft_order(AddItemToDraftOrder {
                order_id: order.id.0.clone(),
                product_id: Some("prod-1".to_string()),
                quantity: None,
            })
            .await
            .unwrap_err();
        assert_eq!(missing.status_code(), 400);

        assert!(store.items_for_order(&order.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_input_is_checked_before_the_store() {
        let store = Arc::new(InMemoryOrderStore::new());
        let service = service_with(store.clone(), None);

        service
            .add_item_to_draft_order(AddItemToDraftOrder::new("nonexistent-order", "prod-1", 0))
            .await
            .unwrap_err();

        assert_eq!(store.call_counts(), StoreCallCounts::default());
    }

    #[tokio::test]
    async fn test_product_id_error_reported_before_quantity_error() {
        let (_, service, order) = draft_order_with_product().await;

        let err = service
            .add_item_to_draft_order(AddItemToDraftOrder::new(order.id.as_str(), "", -1))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "productId is required and must be a string");
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let (_, service, _) = draft_order_with_product().await;

        let err = service
            .add_item_to_draft_order(AddItemToDraftOrder::new("nonexistent-order", "prod-1", 2))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Order not found");
    }

    #[tokio::test]
    async fn test_non_draft_order_is_rejected() {
        let (store, service, order) = draft_order_with_product().await;
        store
            .set_order_status(&order.id, OrderStatus::Confirmed)
            .await
            .unwrap();

        let err = service
            .add_item_to_draft_order(AddItemToDraftOrder::new(order.id.as_str(), "prod-1", 2))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.message(),
            "Items can only be added to orders with status DRAFT"
        );
        assert_eq!(store.call_counts().product_reads, 0);
        assert!(store.items_for_order(&order.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_is_bad_request() {
        let (store, service, order) = draft_order_with_product().await;

        let err = service
            .add_item_to_draft_order(AddItemToDraftOrder::new(order.id.as_str(), "prod-404", 2))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::BadRequest(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Product not found");
        assert!(store.items_for_order(&order.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_add_item_propagates_store_failure() {
        let (store, service, order) = draft_order_with_product().await;
        store.set_unavailable(true);

        let err = service
            .add_item_to_draft_order(AddItemToDraftOrder::new(order.id.as_str(), "prod-1", 2))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Store(_)));
    }

    #[tokio::test]
    async fn test_product_read_failure_propagates() {
        let (store, service, order) = draft_order_with_product().await;
        // Order read succeeds, product read fails
        store.fail_after_calls(1).unwrap();

        let err = service
            .add_item_to_draft_order(AddItemToDraftOrder::new(order.id.as_str(), "prod-1", 2))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(store.call_counts().item_inserts, 0);
        assert!(store.items_for_order(&order.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_item_insert_failure_propagates() {
        let (store, service, order) = draft_order_with_product().await;
        // Both reads succeed, the insert fails
        store.fail_after_calls(2).unwrap();

        let err = service
            .add_item_to_draft_order(AddItemToDraftOrder::new(order.id.as_str(), "prod-1", 2))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Store(_)));
        let counts = store.call_counts();
        assert_eq!(counts.product_reads, 1);
        assert_eq!(counts.item_inserts, 1);
        assert!(store.items_for_order(&order.id).await.is_empty());
    }
}
