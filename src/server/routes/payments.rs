//! Payment initiation and history.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::amount::Amount;
use crate::core::error::ServiceError;
use crate::core::payment::{Payment, PaymentRecord};
use crate::payments::PaymentRequest;
use crate::server::AppState;
use crate::server::extract::Requester;

#[derive(Debug, Deserialize, Validate)]
pub struct PaymentBody {
    pub product_id: Uuid,
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub payment_method: String,
    #[validate(range(min = 0.01, message = "Amount must be a positive number"))]
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub message: &'static str,
    pub payment: Payment,
}

#[derive(Debug, Serialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentRecord>,
    pub count: usize,
}

/// POST /payments
pub async fn create_payment(
    State(state): State<AppState>,
    Requester(identity): Requester,
    Json(body): Json<PaymentBody>,
) -> Result<(StatusCode, Json<PaymentResponse>), ServiceError> {
    body.validate()?;
    let request = PaymentRequest {
        product_id: body.product_id,
        payment_method: body.payment_method,
        amount: Amount::from_float(body.amount),
    };
    let payment = state
        .orchestrator
        .process_payment(&request, &identity)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PaymentResponse {
            message: "Payment processed successfully",
            payment,
        }),
    ))
}

/// GET /payments
pub async fn list_payments(
    State(state): State<AppState>,
    Requester(identity): Requester,
) -> Result<Json<PaymentListResponse>, ServiceError> {
    let payments = state.orchestrator.list_payments(&identity).await?;
    let count = payments.len();
    Ok(Json(PaymentListResponse { payments, count }))
}
