//! In-memory implementation of the store for testing and development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::core::error::StorageError;
use crate::core::identity::User;
use crate::core::payment::{NewPayment, Payment, PaymentRecord};
use crate::core::product::{NewProduct, Product, ProductUpdate};
use crate::storage::{StockDecrement, Store, StoreTransaction};

#[derive(Debug, Default, Clone)]
struct State {
    users: HashMap<Uuid, User>,
    products: HashMap<Uuid, Product>,
    payments: HashMap<Uuid, Payment>,
}

/// In-memory store.
///
/// Single mutations lock the state for their duration. Transactions take the
/// lock for their whole lifetime and mutate a staged copy, so conflicting
/// workflows serialize on the state mutex and a commit publishes everything
/// at once: concurrent payments against the same product can never both win
/// the last unit of stock.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, StorageError> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.email == email) {
            return Ok(None);
        }
        let user = User::new(email, password);
        state.users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, StorageError> {
        let mut state = self.state.lock().await;
        let product = Product::new(product.name, product.quantity, product.owner_id);
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StorageError> {
        let state = self.state.lock().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn list_products(&self, owner_id: Uuid) -> Result<Vec<Product>, StorageError> {
        let state = self.state.lock().await;
        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn update_product(
        &self,
        id: Uuid,
        owner_id: Uuid,
        update: ProductUpdate,
    ) -> Result<Option<Product>, StorageError> {
        let mut state = self.state.lock().await;
        let Some(product) = state.products.get_mut(&id) else {
            return Ok(None);
        };
        if product.owner_id != owner_id {
            return Ok(None);
        }
        if let Some(name) = update.name {
            product.name = name;
        }
        if let Some(quantity) = update.quantity {
            product.quantity = quantity;
        }
        product.touch();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: Uuid, owner_id: Uuid) -> Result<bool, StorageError> {
        let mut state = self.state.lock().await;
        match state.products.get(&id) {
            Some(product) if product.owner_id == owner_id => {}
            _ => return Ok(false),
        }
        state.products.remove(&id);
        // Cascade: payment rows reference the product.
        state.payments.retain(|_, p| p.product_id != id);
        Ok(true)
    }

    async fn list_payments(&self, owner_id: Uuid) -> Result<Vec<PaymentRecord>, StorageError> {
        let state = self.state.lock().await;
        let mut records: Vec<PaymentRecord> = state
            .payments
            .values()
            .filter(|p| p.owner_id == owner_id)
            .map(|payment| {
                let product_name = state
                    .products
                    .get(&payment.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                PaymentRecord {
                    payment: payment.clone(),
                    product_name,
                }
            })
            .collect();
        records.sort_by(|a, b| {
            b.payment
                .created_at
                .cmp(&a.payment.created_at)
                .then(b.payment.id.cmp(&a.payment.id))
        });
        Ok(records)
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StorageError> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryTransaction { guard, staged }))
    }
}

/// An open atomic unit over an [`InMemoryStore`].
///
/// Holds the state lock for its lifetime and mutates a staged copy. Commit
/// swaps the staged state in; rollback (or drop) releases the lock with the
/// shared state untouched.
struct InMemoryTransaction {
    guard: OwnedMutexGuard<State>,
    staged: State,
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn product(&mut self, id: Uuid) -> Result<Option<Product>, StorageError> {
        Ok(self.staged.products.get(&id).cloned())
    }

    async fn decrement_stock(
        &mut self,
        id: Uuid,
        units: u32,
    ) -> Result<StockDecrement, StorageError> {
        let Some(product) = self.staged.products.get_mut(&id) else {
            return Ok(StockDecrement::NotFound);
        };
        if product.quantity < units {
            return Ok(StockDecrement::Insufficient);
        }
        product.quantity -= units;
        product.touch();
        Ok(StockDecrement::Applied(product.clone()))
    }

    async fn insert_payment(&mut self, payment: NewPayment) -> Result<Payment, StorageError> {
        let now = Utc::now();
        let payment = Payment {
            id: Uuid::new_v4(),
            product_id: payment.product_id,
            owner_id: payment.owner_id,
            method: payment.method,
            amount: payment.amount,
            status: payment.status,
            transaction_id: payment.transaction_id,
            created_at: now,
            updated_at: now,
        };
        self.staged.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let this = *self;
        let mut guard = this.guard;
        *guard = this.staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        // Dropping the guard releases the lock; the staged copy is discarded.
        Ok(())
    }
}
