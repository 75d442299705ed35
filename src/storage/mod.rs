//! Storage traits and backends.
//!
//! [`Store`] is the durable-state seam: user, product, and payment rows plus
//! the ability to open an atomic unit ([`StoreTransaction`]). The default
//! backend is [`InMemoryStore`]; other backends implement the same traits.

pub mod in_memory;

pub use in_memory::InMemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::StorageError;
use crate::core::identity::User;
use crate::core::payment::{NewPayment, Payment, PaymentRecord};
use crate::core::product::{NewProduct, Product, ProductUpdate};

/// Outcome of a conditional stock decrement.
///
/// Failure is a value, not an error: callers must be able to tell a missing
/// row from an insufficient one without exception-driven control flow.
#[derive(Debug, Clone)]
pub enum StockDecrement {
    /// The decrement applied; carries the updated product.
    Applied(Product),

    /// Current quantity was below the requested units. Nothing changed.
    Insufficient,

    /// No such product. Nothing changed.
    NotFound,
}

/// Durable state behind the service.
///
/// Single mutations are atomic on their own; multi-step workflows open a
/// [`StoreTransaction`] via [`Store::begin`] so that all of their mutations
/// commit or roll back together.
#[async_trait]
pub trait Store: Send + Sync {
    // --- users ---

    /// Insert a user. Returns `None` when the email is already taken.
    async fn create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, StorageError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError>;

    // --- products ---

    async fn create_product(&self, product: NewProduct) -> Result<Product, StorageError>;

    /// Single-row lookup; the returned product carries its owner id for
    /// authorization checks.
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StorageError>;

    async fn list_products(&self, owner_id: Uuid) -> Result<Vec<Product>, StorageError>;

    /// Ownership-scoped update. Returns `None` when the product does not
    /// exist or belongs to someone else.
    async fn update_product(
        &self,
        id: Uuid,
        owner_id: Uuid,
        update: ProductUpdate,
    ) -> Result<Option<Product>, StorageError>;

    /// Ownership-scoped delete; cascades to dependent payment rows.
    /// Returns `false` when the product does not exist or belongs to
    /// someone else.
    async fn delete_product(&self, id: Uuid, owner_id: Uuid) -> Result<bool, StorageError>;

    // --- payments ---

    /// Payment history scoped to one owner, joined with product names,
    /// newest first.
    async fn list_payments(&self, owner_id: Uuid) -> Result<Vec<PaymentRecord>, StorageError>;

    // --- transactions ---

    /// Open an atomic unit over the store.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StorageError>;
}

/// A scoped atomic unit over the store.
///
/// Acquired on entry, released on every exit path: committing publishes all
/// staged mutations at once, rolling back discards them, and dropping an
/// uncommitted transaction is equivalent to rollback. No observer ever sees
/// a partially applied unit.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Read a product inside the unit.
    async fn product(&mut self, id: Uuid) -> Result<Option<Product>, StorageError>;

    /// Conditionally decrement stock by `units`, only if the current
    /// quantity covers it. A single atomic step: no concurrent caller can
    /// observe the read and the write separately.
    async fn decrement_stock(
        &mut self,
        id: Uuid,
        units: u32,
    ) -> Result<StockDecrement, StorageError>;

    /// Stage a ledger row.
    async fn insert_payment(&mut self, payment: NewPayment) -> Result<Payment, StorageError>;

    /// Publish all staged mutations.
    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    /// Discard all staged mutations.
    async fn rollback(self: Box<Self>) -> Result<(), StorageError>;
}
