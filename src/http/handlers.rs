use actix_web::{web, HttpResponse, Responder};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::order::{AddItemToDraftOrder, OrderService, ServiceError};
use crate::metrics::{Metrics, ADD_ITEM_TO_DRAFT_ORDER, CREATE_DRAFT_ORDER};

pub struct AppState {
    pub service: Arc<OrderService>,
    pub metrics: Arc<Metrics>,
}

// ============================================================================
// Request Parsing
// ============================================================================

/// Empty bodies read as `null`; anything else must be JSON.
fn parse_body(body: &[u8]) -> Result<Value, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|_| ServiceError::bad_request("Request body must be valid JSON"))
}

fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Integers, or floats with no fractional part, in i64 range
fn integer_field(body: &Value, key: &str) -> Option<i64> {
    let value = body.get(key)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|q| q.fract() == 0.0 && *q >= i64::MIN as f64 && *q < i64::MAX as f64)
            .map(|q| q as i64)
    })
}

/// Log a failed request and return its error kind for metrics
fn rejection_kind<T>(operation: &str, result: &Result<T, ServiceError>) -> Option<&'static str> {
    match result {
        Ok(_) => None,
        Err(ServiceError::Store(e)) => {
            tracing::error!(operation, error = %e, "Store failure while handling request");
            Some("store")
        }
        Err(e) => {
            tracing::warn!(operation, kind = e.kind(), message = %e, "Request rejected");
            Some(e.kind())
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /orders
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let started = Instant::now();

    let result = match parse_body(&body) {
        Ok(body) => {
            let buyer = string_field(&body, "buyerOrganizationId");
            state.service.create_draft_order(buyer.as_deref()).await
        }
        Err(e) => Err(e),
    };

    let elapsed = started.elapsed().as_secs_f64();
    match rejection_kind(CREATE_DRAFT_ORDER, &result) {
        None => state.metrics.record_order_created(elapsed),
        Some(kind) => state.metrics.record_rejection(CREATE_DRAFT_ORDER, kind, elapsed),
    }
    Ok(HttpResponse::Created().json(result?))
}

/// POST /orders/{order_id}/items
pub async fn add_item(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let started = Instant::now();
    let order_id = path.into_inner();

    let result = match parse_body(&body) {
        Ok(body) => {
            let command = AddItemToDraftOrder {
                order_id,
                product_id: string_field(&body, "productId"),
                quantity: integer_field(&body, "quantity"),
            };
            state.service.add_item_to_draft_order(command).await
        }
        Err(e) => Err(e),
    };

    let elapsed = started.elapsed().as_secs_f64();
    match rejection_kind(ADD_ITEM_TO_DRAFT_ORDER, &result) {
        None => state.metrics.record_item_added(elapsed),
        Some(kind) => state.metrics.record_rejection(ADD_ITEM_TO_DRAFT_ORDER, kind, elapsed),
    }
    Ok(HttpResponse::Created().json(result?))
}

/// GET /metrics
pub async fn metrics(state: web::Data<AppState>) -> actix_web::Result<HttpResponse> {
    let buffer = state
        .metrics
        .encode()
        .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer))
}

/// GET /health
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "draft-orders"
    }))
}

// ============================================================================
// Unit Tests
// ============================================================================
