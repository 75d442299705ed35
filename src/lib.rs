//! # till
//!
//! A multi-tenant inventory and payments service. Each user owns a set of
//! products; a payment against a product atomically settles through a
//! per-method handler, decrements stock by one unit, and appends a ledger
//! row, all inside a single store transaction.
//!
//! The crate splits into:
//! - [`core`] - domain types, money, identity, and typed errors
//! - [`storage`] - the [`storage::Store`] seam and the in-memory backend
//! - [`payments`] - settlement handlers, their registry, and the orchestrator
//! - [`server`] - the axum HTTP exposure
//! - [`config`] - environment-driven runtime configuration

pub mod config;
pub mod core;
pub mod payments;
pub mod server;
pub mod storage;

pub mod prelude {
    //! Convenient re-exports for embedding the service.

    pub use crate::config::ServiceConfig;
    pub use crate::core::amount::Amount;
    pub use crate::core::error::{PaymentError, ServiceError, StorageError};
    pub use crate::core::identity::{Identity, IdentityProvider, TokenIdentityProvider};
    pub use crate::core::payment::{Payment, PaymentMethod, PaymentStatus};
    pub use crate::core::product::Product;
    pub use crate::payments::{HandlerRegistry, PaymentHandler, PaymentOrchestrator, PaymentRequest};
    pub use crate::server::{AppState, build_router};
    pub use crate::storage::{InMemoryStore, Store, StoreTransaction};
}
