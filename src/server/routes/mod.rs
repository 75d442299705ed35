//! Route handlers, grouped per resource.

pub mod auth;
pub mod payments;
pub mod products;

use axum::Json;
use serde_json::{Value, json};

/// Health check endpoint handler.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "till"
    }))
}
