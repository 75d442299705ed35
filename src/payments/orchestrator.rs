//! The transactional payment workflow.
//!
//! [`PaymentOrchestrator::process_payment`] runs the whole attempt inside a
//! single store transaction: load product, check stock and ownership,
//! resolve and invoke the method handler, decrement stock, append the ledger
//! row, commit. Any failure at any step rolls the unit back, so no caller
//! ever observes a stock decrement without its ledger row or vice versa.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use uuid::Uuid;

use crate::core::amount::Amount;
use crate::core::error::PaymentError;
use crate::core::identity::Identity;
use crate::core::payment::{NewPayment, Payment, PaymentMethod, PaymentRecord, PaymentStatus};
use crate::payments::handler::HandlerContext;
use crate::payments::registry::HandlerRegistry;
use crate::storage::{StockDecrement, Store, StoreTransaction};

/// A payment attempt as received from the boundary.
///
/// The method arrives as its wire name so that an unknown name surfaces as
/// [`PaymentError::UnsupportedMethod`] here, independently of any validation
/// layer in front.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub product_id: Uuid,
    pub payment_method: String,
    pub amount: Amount,
}

/// Coordinates the atomic payment-and-stock-decrement workflow.
pub struct PaymentOrchestrator {
    store: Arc<dyn Store>,
    registry: HandlerRegistry,
    handler_timeout: Duration,
}

impl PaymentOrchestrator {
    pub fn new(store: Arc<dyn Store>, registry: HandlerRegistry, handler_timeout: Duration) -> Self {
        Self {
            store,
            registry,
            handler_timeout,
        }
    }

    /// Process one payment attempt as a single atomic unit.
    ///
    /// Commit and rollback are the only terminal states; every error path
    /// rolls back before returning, and an attempt abandoned mid-flight
    /// rolls back when the transaction drops.
    pub async fn process_payment(
        &self,
        request: &PaymentRequest,
        identity: &Identity,
    ) -> Result<Payment, PaymentError> {
        let mut tx = self.store.begin().await?;

        match self.run_workflow(tx.as_mut(), request, identity).await {
            Ok(payment) => {
                tx.commit().await?;
                tracing::info!(
                    payment_id = %payment.id,
                    product_id = %payment.product_id,
                    method = %payment.method,
                    transaction_id = %payment.transaction_id,
                    "payment committed"
                );
                Ok(payment)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                tracing::debug!(error = %err, product_id = %request.product_id, "payment rolled back");
                Err(err)
            }
        }
    }

    async fn run_workflow(
        &self,
        tx: &mut dyn StoreTransaction,
        request: &PaymentRequest,
        identity: &Identity,
    ) -> Result<Payment, PaymentError> {
        let product = tx
            .product(request.product_id)
            .await?
            .ok_or(PaymentError::NotFound)?;

        if product.quantity == 0 {
            return Err(PaymentError::OutOfStock);
        }

        // Ownership is checked after existence and stock; a non-owner sees
        // 404 for missing ids and 403 for foreign ones (see DESIGN.md).
        if product.owner_id != identity.id {
            return Err(PaymentError::AccessDenied);
        }

        let method = PaymentMethod::from_str(&request.payment_method)
            .map_err(|_| PaymentError::UnsupportedMethod)?;
        let handler = self
            .registry
            .resolve(method)
            .ok_or(PaymentError::UnsupportedMethod)?;

        let context = HandlerContext {
            product_id: product.id,
            owner_id: identity.id,
            method,
            amount: request.amount,
        };

        // The transaction stays open across the handler call, so the call is
        // bounded: a handler that hangs must not pin the unit forever.
        let outcome = match timeout(self.handler_timeout, handler.invoke(&context)).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, method = %method, "payment handler failed");
                return Err(PaymentError::ProcessingFailed);
            }
            Err(_) => {
                tracing::warn!(method = %method, "payment handler timed out");
                return Err(PaymentError::ProcessingFailed);
            }
        };
        if !outcome.success {
            return Err(PaymentError::ProcessingFailed);
        }

        // One unit per payment, independent of the monetary amount.
        match tx.decrement_stock(product.id, 1).await? {
            StockDecrement::Applied(_) => {}
            StockDecrement::Insufficient => return Err(PaymentError::InsufficientStock),
            StockDecrement::NotFound => return Err(PaymentError::NotFound),
        }

        let payment = tx
            .insert_payment(NewPayment {
                product_id: product.id,
                owner_id: identity.id,
                method,
                amount: request.amount,
                status: PaymentStatus::Completed,
                transaction_id: outcome.transaction_id,
            })
            .await?;

        Ok(payment)
    }

    /// Payment history for the requester: own rows only, joined with product
    /// names, newest first.
    pub async fn list_payments(
        &self,
        identity: &Identity,
    ) -> Result<Vec<PaymentRecord>, PaymentError> {
        Ok(self.store.list_payments(identity.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::product::NewProduct;
    use crate::payments::handler::{HandlerOutcome, PaymentHandler, StripeHandler};
    use crate::storage::InMemoryStore;
    use anyhow::anyhow;
    use async_trait::async_trait;

    struct FailingHandler;

    #[async_trait]
    impl PaymentHandler for FailingHandler {
        async fn invoke(&self, _context: &HandlerContext) -> anyhow::Result<HandlerOutcome> {
            Err(anyhow!("gateway unreachable"))
        }
    }

    struct DecliningHandler;

    #[async_trait]
    impl PaymentHandler for DecliningHandler {
        async fn invoke(&self, _context: &HandlerContext) -> anyhow::Result<HandlerOutcome> {
            Ok(HandlerOutcome {
                success: false,
                transaction_id: "st_declined".to_string(),
            })
        }
    }

    struct HangingHandler;

    #[async_trait]
    impl PaymentHandler for HangingHandler {
        async fn invoke(&self, _context: &HandlerContext) -> anyhow::Result<HandlerOutcome> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            unreachable!("the orchestrator must time out first")
        }
    }

    struct Fixture {
        store: Arc<InMemoryStore>,
        orchestrator: PaymentOrchestrator,
        identity: Identity,
        product_id: Uuid,
    }

    async fn fixture_with(registry: HandlerRegistry, quantity: u32) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let identity = Identity {
            id: Uuid::new_v4(),
            email: "john@example.com".to_string(),
        };
        let product = store
            .create_product(NewProduct {
                name: "Laptop".to_string(),
                quantity,
                owner_id: identity.id,
            })
            .await
            .unwrap();
        let orchestrator = PaymentOrchestrator::new(
            store.clone() as Arc<dyn Store>,
            registry,
            Duration::from_secs(5),
        );
        Fixture {
            store,
            orchestrator,
            identity,
            product_id: product.id,
        }
    }

    async fn fixture(quantity: u32) -> Fixture {
        fixture_with(HandlerRegistry::with_simulated_handlers(), quantity).await
    }

    fn request(product_id: Uuid, method: &str) -> PaymentRequest {
        PaymentRequest {
            product_id,
            payment_method: method.to_string(),
            amount: Amount::from_float(9.99),
        }
    }

    #[tokio::test]
    async fn successful_payment_decrements_stock_and_writes_ledger() {
        let f = fixture(1).await;
        let payment = f
            .orchestrator
            .process_payment(&request(f.product_id, "stripe"), &f.identity)
            .await
            .unwrap();

        assert_eq!(payment.product_id, f.product_id);
        assert_eq!(payment.owner_id, f.identity.id);
        assert_eq!(payment.method, PaymentMethod::Stripe);
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.transaction_id.starts_with("st_"));

        let product = f.store.get_product(f.product_id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 0);
        let records = f.orchestrator.list_payments(&f.identity).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product_name, "Laptop");
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let f = fixture(1).await;
        let err = f
            .orchestrator
            .process_payment(&request(Uuid::new_v4(), "stripe"), &f.identity)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::NotFound));
    }

    #[tokio::test]
    async fn depleted_product_is_out_of_stock() {
        let f = fixture(0).await;
        let err = f
            .orchestrator
            .process_payment(&request(f.product_id, "stripe"), &f.identity)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::OutOfStock));
        assert!(f.orchestrator.list_payments(&f.identity).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn foreign_product_is_access_denied() {
        let f = fixture(1).await;
        let stranger = Identity {
            id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
        };
        let err = f
            .orchestrator
            .process_payment(&request(f.product_id, "stripe"), &stranger)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::AccessDenied));

        let product = f.store.get_product(f.product_id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 1);
    }

    #[tokio::test]
    async fn unknown_method_name_is_unsupported() {
        let f = fixture(1).await;
        let err = f
            .orchestrator
            .process_payment(&request(f.product_id, "bitcoin"), &f.identity)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::UnsupportedMethod));
    }

    #[tokio::test]
    async fn unregistered_method_is_unsupported() {
        // Known name, but the registry carries no handler for it.
        let mut registry = HandlerRegistry::new();
        registry.register(PaymentMethod::Stripe, Arc::new(StripeHandler));
        let f = fixture_with(registry, 1).await;

        let err = f
            .orchestrator
            .process_payment(&request(f.product_id, "paypal"), &f.identity)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::UnsupportedMethod));
    }

    #[tokio::test]
    async fn handler_error_rolls_back_everything() {
        let mut registry = HandlerRegistry::new();
        registry.register(PaymentMethod::Stripe, Arc::new(FailingHandler));
        let f = fixture_with(registry, 1).await;

        let err = f
            .orchestrator
            .process_payment(&request(f.product_id, "stripe"), &f.identity)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::ProcessingFailed));

        let product = f.store.get_product(f.product_id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 1);
        assert!(f.orchestrator.list_payments(&f.identity).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn declined_settlement_rolls_back_everything() {
        let mut registry = HandlerRegistry::new();
        registry.register(PaymentMethod::Stripe, Arc::new(DecliningHandler));
        let f = fixture_with(registry, 1).await;

        let err = f
            .orchestrator
            .process_payment(&request(f.product_id, "stripe"), &f.identity)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::ProcessingFailed));
        assert!(f.orchestrator.list_payments(&f.identity).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn hanging_handler_times_out_and_rolls_back() {
        let mut registry = HandlerRegistry::new();
        registry.register(PaymentMethod::Stripe, Arc::new(HangingHandler));
        let store = Arc::new(InMemoryStore::new());
        let identity = Identity {
            id: Uuid::new_v4(),
            email: "john@example.com".to_string(),
        };
        let product = store
            .create_product(NewProduct {
                name: "Laptop".to_string(),
                quantity: 1,
                owner_id: identity.id,
            })
            .await
            .unwrap();
        let orchestrator = PaymentOrchestrator::new(
            store.clone() as Arc<dyn Store>,
            registry,
            Duration::from_millis(50),
        );

        let err = orchestrator
            .process_payment(&request(product.id, "stripe"), &identity)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::ProcessingFailed));

        // The unit reached a terminal state: the store is unlocked and unchanged.
        let product = store.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 1);
    }

    #[tokio::test]
    async fn two_sequential_payments_drain_stock_then_fail() {
        let f = fixture(1).await;
        f.orchestrator
            .process_payment(&request(f.product_id, "stripe"), &f.identity)
            .await
            .unwrap();
        let err = f
            .orchestrator
            .process_payment(&request(f.product_id, "stripe"), &f.identity)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::OutOfStock));
        assert_eq!(f.orchestrator.list_payments(&f.identity).await.unwrap().len(), 1);
    }
}
