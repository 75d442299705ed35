//! Typed error handling for the till service.
//!
//! Every failure a request can hit maps to one variant here, and every
//! variant maps to exactly one HTTP status and user-facing message. The
//! orchestrator recovers all payment failures at its boundary; only
//! [`StorageError`] is treated as a potentially fatal infrastructure
//! failure and surfaces as a generic server error.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Infrastructure failures from the storage backend.
///
/// The only error class surfaced to callers as a 500.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("data integrity error: {0}")]
    Integrity(String),
}

/// Failures of the payment workflow.
///
/// All variants except `Storage` are expected, recoverable outcomes that
/// terminate the attempt with a rollback and a specific response.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The product does not exist.
    #[error("Product not found")]
    NotFound,

    /// The product exists but has no stock left.
    #[error("Product is out of stock")]
    OutOfStock,

    /// The requester does not own the product.
    #[error("Access denied")]
    AccessDenied,

    /// The method name is unknown or has no registered handler.
    #[error("Unsupported payment method")]
    UnsupportedMethod,

    /// The handler failed, reported no success, or timed out.
    #[error("Payment processing failed")]
    ProcessingFailed,

    /// Stock ran out between the availability check and the decrement.
    /// This is the conflict-resolution point for racing payments.
    #[error("Product is out of stock")]
    InsufficientStock,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PaymentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PaymentError::NotFound => StatusCode::NOT_FOUND,
            PaymentError::OutOfStock => StatusCode::BAD_REQUEST,
            PaymentError::AccessDenied => StatusCode::FORBIDDEN,
            PaymentError::UnsupportedMethod => StatusCode::BAD_REQUEST,
            PaymentError::ProcessingFailed => StatusCode::BAD_REQUEST,
            PaymentError::InsufficientStock => StatusCode::CONFLICT,
            PaymentError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failures of product CRUD operations.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found")]
    NotFound,

    #[error("Access denied")]
    AccessDenied,

    /// Ownership-scoped mutation matched no row. The combined message keeps
    /// non-owners from distinguishing foreign products from missing ones.
    #[error("Product not found or access denied")]
    NotOwned,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProductError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProductError::NotFound => StatusCode::NOT_FOUND,
            ProductError::AccessDenied => StatusCode::FORBIDDEN,
            ProductError::NotOwned => StatusCode::NOT_FOUND,
            ProductError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failures of registration, login, and bearer-token authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Access token required")]
    MissingToken,

    /// The token decoded but the user it names no longer exists.
    #[error("Invalid token")]
    InvalidToken,

    /// The token is malformed, mis-signed, or expired.
    #[error("Invalid or expired token")]
    TokenRejected,

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::TokenRejected => StatusCode::FORBIDDEN,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Extractor rejections must render on their own.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ServiceError::from(self).into_response()
    }
}

/// The top-level error type returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Validation Error")]
    Validation(#[from] validator::ValidationErrors),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Payment(e) => e.status_code(),
            ServiceError::Product(e) => e.status_code(),
            ServiceError::Auth(e) => e.status_code(),
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            // Never leak backend details to the caller.
            let body = Json(json!({ "error": "Internal server error" }));
            return (status, body).into_response();
        }

        let body = match &self {
            ServiceError::Validation(errors) => json!({
                "error": "Validation Error",
                "details": errors,
            }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
