//! Payment domain model.
//!
//! A payment row exists if and only if the matching stock decrement was
//! committed; the two mutations are created and destroyed together inside
//! one store transaction. Rows are never updated after insertion in the
//! current scope and disappear only when the referenced product is deleted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::amount::Amount;

/// The closed set of supported payment methods.
///
/// Adding a method is a typed extension: a new variant plus a handler
/// registration, not a string-keyed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    Stripe,
    BankTransfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::Paypal,
        PaymentMethod::Stripe,
        PaymentMethod::BankTransfer,
    ];

    /// Wire name used in request/response bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Stripe => "stripe",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    /// Short tag embedded in synthesized transaction ids.
    pub fn tag(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "cc",
            PaymentMethod::Paypal => "pp",
            PaymentMethod::Stripe => "st",
            PaymentMethod::BankTransfer => "bt",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown payment method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown payment method: {}", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for PaymentMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "paypal" => Ok(PaymentMethod::Paypal),
            "stripe" => Ok(PaymentMethod::Stripe),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

/// Settlement status of a payment row. Fixed at insert time in current scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// A committed ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,

    pub product_id: Uuid,

    #[serde(rename = "user_id")]
    pub owner_id: Uuid,

    #[serde(rename = "payment_method")]
    pub method: PaymentMethod,

    pub amount: Amount,

    pub status: PaymentStatus,

    /// Opaque settlement reference reported by the payment handler.
    pub transaction_id: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Fields required to append a ledger row.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub product_id: Uuid,
    pub owner_id: Uuid,
    pub method: PaymentMethod,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub transaction_id: String,
}

/// A ledger row joined with the name of the product it paid for,
/// as returned by the payment-history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(flatten)]
    pub payment: Payment,

    pub product_name: String,
}
