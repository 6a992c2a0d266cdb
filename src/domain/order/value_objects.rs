use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Buyer used when neither the caller nor configuration supplies one.
pub const PLACEHOLDER_BUYER_ORGANIZATION_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Order identity (opaque, assigned by the store)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the organization placing the order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuyerOrganizationId(pub String);

impl BuyerOrganizationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn placeholder() -> Self {
        Self(PLACEHOLDER_BUYER_ORGANIZATION_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuyerOrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order lifecycle status.
///
/// Only `Draft` matters here; later transitions are owned elsewhere. Status
/// strings this service does not know are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Draft,
    Submitted,
    Confirmed,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Draft => "DRAFT",
            OrderStatus::Submitted => "SUBMITTED",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Other(status) => status,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, OrderStatus::Draft)
    }
}

impl From<String> for OrderStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "DRAFT" => OrderStatus::Draft,
            "SUBMITTED" => OrderStatus::Submitted,
            "CONFIRMED" => OrderStatus::Confirmed,
            "CANCELLED" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(status),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(status: &str) -> Self {
        OrderStatus::from(status.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Persisted Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub buyer_organization_id: BuyerOrganizationId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
}

/// Line item linking a quantity of one product to one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields for an order insert; id and timestamps come from the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub status: OrderStatus,
    pub buyer_organization_id: BuyerOrganizationId,
}

impl NewOrder {
    pub fn draft(buyer_organization_id: BuyerOrganizationId) -> Self {
        Self {
            status: OrderStatus::Draft,
            buyer_organization_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
}

// ============================================================================
// Unit Tests
// ============================================================================
