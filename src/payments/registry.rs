//! Registry mapping payment methods to their handlers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::payment::PaymentMethod;
use crate::payments::handler::{
    BankTransferHandler, CreditCardHandler, PaymentHandler, PaypalHandler, StripeHandler,
};

/// Maps each supported [`PaymentMethod`] to a settlement handler.
///
/// Resolution can miss: a registry built without an entry for a method makes
/// the orchestrator treat that method as unsupported, never as a crash. The
/// method set is a closed enum, so extending it means a new variant plus a
/// registration here.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<PaymentMethod, Arc<dyn PaymentHandler>>,
}

impl HandlerRegistry {
    /// An empty registry. Useful for tests that inject their own handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// The production wiring: all four simulated handlers.
    pub fn with_simulated_handlers() -> Self {
        let mut registry = Self::new();
        registry.register(PaymentMethod::CreditCard, Arc::new(CreditCardHandler));
        registry.register(PaymentMethod::Paypal, Arc::new(PaypalHandler));
        registry.register(PaymentMethod::Stripe, Arc::new(StripeHandler));
        registry.register(PaymentMethod::BankTransfer, Arc::new(BankTransferHandler));
        registry
    }

    pub fn register(&mut self, method: PaymentMethod, handler: Arc<dyn PaymentHandler>) {
        self.handlers.insert(method, handler);
    }

    pub fn resolve(&self, method: PaymentMethod) -> Option<Arc<dyn PaymentHandler>> {
        self.handlers.get(&method).cloned()
    }
}
