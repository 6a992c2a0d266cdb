// ============================================================================
// Order Commands - Represent caller intent
// ============================================================================

/// Request to attach a line item to a draft order.
///
/// `product_id` and `quantity` are optional because the boundary hands over
/// whatever the caller sent; absent or wrongly typed fields arrive as `None`
/// and are rejected during validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AddItemToDraftOrder {
    pub order_id: String,
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

impl AddItemToDraftOrder {
    pub fn new(order_id: impl Into<String>, product_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            order_id: order_id.into(),
            product_id: Some(product_id.into()),
            quantity: Some(quantity),
        }
    }
}
