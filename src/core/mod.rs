//! Domain types and the typed error hierarchy.

pub mod amount;
pub mod error;
pub mod identity;
pub mod payment;
pub mod product;

pub use amount::Amount;
pub use error::{AuthError, PaymentError, ProductError, ServiceError, StorageError};
pub use identity::{Identity, IdentityProvider, Session, TokenIdentityProvider, User};
pub use payment::{NewPayment, Payment, PaymentMethod, PaymentRecord, PaymentStatus};
pub use product::{NewProduct, Product, ProductUpdate};
