//! Payment-method handler capability.
//!
//! A handler settles one payment attempt and reports a success flag plus an
//! opaque transaction id. The bundled handlers simulate settlement; real
//! gateway integrations implement the same trait and slot into the registry
//! unchanged.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::amount::Amount;
use crate::core::payment::PaymentMethod;

/// Everything a handler is told about the attempt it settles.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub product_id: Uuid,
    pub owner_id: Uuid,
    pub method: PaymentMethod,
    pub amount: Amount,
}

/// What a handler reports back.
#[derive(Debug, Clone)]
pub struct HandlerOutcome {
    pub success: bool,
    /// Opaque settlement reference, recorded on the ledger row.
    pub transaction_id: String,
}

/// Settlement capability for one payment method.
///
/// Handlers may suspend (a real gateway call); the orchestrator bounds the
/// invocation with a timeout because the store transaction stays open for
/// its duration.
#[async_trait]
pub trait PaymentHandler: Send + Sync {
    async fn invoke(&self, context: &HandlerContext) -> Result<HandlerOutcome>;
}

fn simulated_transaction_id(tag: &str) -> String {
    format!("{}_{}", tag, Utc::now().timestamp_millis())
}

/// Simulated credit card settlement. Always succeeds.
pub struct CreditCardHandler;

#[async_trait]
impl PaymentHandler for CreditCardHandler {
    async fn invoke(&self, context: &HandlerContext) -> Result<HandlerOutcome> {
        tracing::info!(product_id = %context.product_id, amount = %context.amount, "processing credit card payment");
        Ok(HandlerOutcome {
            success: true,
            transaction_id: simulated_transaction_id(PaymentMethod::CreditCard.tag()),
        })
    }
}

/// Simulated PayPal settlement. Always succeeds.
pub struct PaypalHandler;

#[async_trait]
impl PaymentHandler for PaypalHandler {
    async fn invoke(&self, context: &HandlerContext) -> Result<HandlerOutcome> {
        tracing::info!(product_id = %context.product_id, amount = %context.amount, "processing PayPal payment");
        Ok(HandlerOutcome {
            success: true,
            transaction_id: simulated_transaction_id(PaymentMethod::Paypal.tag()),
        })
    }
}

/// Simulated Stripe settlement. Always succeeds.
pub struct StripeHandler;

#[async_trait]
impl PaymentHandler for StripeHandler {
    async fn invoke(&self, context: &HandlerContext) -> Result<HandlerOutcome> {
        tracing::info!(product_id = %context.product_id, amount = %context.amount, "processing Stripe payment");
        Ok(HandlerOutcome {
            success: true,
            transaction_id: simulated_transaction_id(PaymentMethod::Stripe.tag()),
        })
    }
}

/// Simulated bank transfer settlement. Always succeeds.
pub struct BankTransferHandler;

#[async_trait]
impl PaymentHandler for BankTransferHandler {
    async fn invoke(&self, context: &HandlerContext) -> Result<HandlerOutcome> {
        tracing::info!(product_id = %context.product_id, amount = %context.amount, "processing bank transfer");
        Ok(HandlerOutcome {
            success: true,
            transaction_id: simulated_transaction_id(PaymentMethod::BankTransfer.tag()),
        })
    }
}
