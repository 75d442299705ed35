//! HTTP exposure: shared application state, the bearer-token extractor, the
//! route handlers, and the router that ties them together.

pub mod extract;
pub mod router;
pub mod routes;

pub use router::build_router;

use std::sync::Arc;

use crate::core::identity::IdentityProvider;
use crate::payments::PaymentOrchestrator;
use crate::storage::Store;

/// State shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub identity: Arc<dyn IdentityProvider>,
    pub orchestrator: Arc<PaymentOrchestrator>,
}
