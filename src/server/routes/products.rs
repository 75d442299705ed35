//! Product CRUD, all ownership-scoped.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{ProductError, ServiceError};
use crate::core::product::{NewProduct, Product, ProductUpdate};
use crate::server::AppState;
use crate::server::extract::Requester;

#[derive(Debug, Deserialize, Validate)]
pub struct ProductBody {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProductPatch {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub product: Product,
}

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
    Requester(identity): Requester,
) -> Result<Json<ProductListResponse>, ServiceError> {
    let products = state.store.list_products(identity.id).await?;
    let count = products.len();
    Ok(Json(ProductListResponse { products, count }))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Requester(identity): Requester,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ServiceError> {
    let product = state
        .store
        .get_product(id)
        .await?
        .ok_or(ProductError::NotFound)?;
    if product.owner_id != identity.id {
        return Err(ProductError::AccessDenied.into());
    }
    Ok(Json(ProductResponse {
        message: None,
        product,
    }))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    Requester(identity): Requester,
    Json(body): Json<ProductBody>,
) -> Result<(StatusCode, Json<ProductResponse>), ServiceError> {
    body.validate()?;
    let product = state
        .store
        .create_product(NewProduct {
            name: body.name,
            quantity: body.quantity,
            owner_id: identity.id,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            message: Some("Product created successfully"),
            product,
        }),
    ))
}

/// PUT /products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Requester(identity): Requester,
    Path(id): Path<Uuid>,
    Json(body): Json<ProductPatch>,
) -> Result<Json<ProductResponse>, ServiceError> {
    body.validate()?;
    let product = state
        .store
        .update_product(
            id,
            identity.id,
            ProductUpdate {
                name: body.name,
                quantity: body.quantity,
            },
        )
        .await?
        .ok_or(ProductError::NotOwned)?;
    Ok(Json(ProductResponse {
        message: Some("Product updated successfully"),
        product,
    }))
}

/// DELETE /products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Requester(identity): Requester,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let deleted = state.store.delete_product(id, identity.id).await?;
    if !deleted {
        return Err(ProductError::NotOwned.into());
    }
    Ok(Json(serde_json::json!({
        "message": "Product deleted successfully"
    })))
}
