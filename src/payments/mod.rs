//! Payment settlement: handlers, their registry, and the orchestrator that
//! drives the atomic payment workflow.

pub mod handler;
pub mod orchestrator;
pub mod registry;

pub use handler::{HandlerContext, HandlerOutcome, PaymentHandler};
pub use orchestrator::{PaymentOrchestrator, PaymentRequest};
pub use registry::HandlerRegistry;
