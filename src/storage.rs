use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{Customer, CustomerId};

/// Persistence contract the customer service depends on.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Get all customers, ordered by id.
    async fn find_all(&self) -> Result<Vec<Customer>, StorageError>;

    /// Get a customer by ID.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StorageError>;

    /// Get the subset of `ids` that exist. Missing ids are not an error.
    async fn find_all_by_id(&self, ids: &HashSet<CustomerId>)
        -> Result<Vec<Customer>, StorageError>;

    /// Insert (no id) or overwrite (id set) a customer, returning the stored value.
    async fn save(&self, customer: Customer) -> Result<Customer, StorageError>;

    /// Save a batch of customers.
    async fn save_all(&self, customers: Vec<Customer>) -> Result<Vec<Customer>, StorageError>;

    /// Delete a customer. Returns false if the id did not exist.
    async fn delete_by_id(&self, id: CustomerId) -> Result<bool, StorageError>;
}

pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::RwLock;

    #[derive(Default)]
    struct Inner {
        customers: BTreeMap<CustomerId, Customer>,
        last_id: CustomerId,
    }

    impl Inner {
        fn save(&mut self, customer: Customer) -> Customer {
            let id = match customer.customer_id {
                Some(id) => {
                    self.last_id = self.last_id.max(id);
                    id
                }
                None => {
                    self.last_id += 1;
                    self.last_id
                }
            };
            let stored = customer.with_id(id);
            self.customers.insert(id, stored.clone());
            stored
        }
    }

    /// In-memory customer store, used by tests and for running without a database.
    #[derive(Default)]
    pub struct InMemoryCustomerStore {
        inner: RwLock<Inner>,
    }

    impl InMemoryCustomerStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl CustomerStore for InMemoryCustomerStore {
        async fn find_all(&self) -> Result<Vec<Customer>, StorageError> {
            let inner = self.inner.read().map_err(|_| StorageError::LockPoisoned)?;
            Ok(inner.customers.values().cloned().collect())
        }

        async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StorageError> {
            let inner = self.inner.read().map_err(|_| StorageError::LockPoisoned)?;
            Ok(inner.customers.get(&id).cloned())
        }

        async fn find_all_by_id(
            &self,
            ids: &HashSet<CustomerId>,
        ) -> Result<Vec<Customer>, StorageError> {
            let inner = self.inner.read().map_err(|_| StorageError::LockPoisoned)?;
            Ok(inner
                .customers
                .values()
                .filter(|c| c.customer_id.is_some_and(|id| ids.contains(&id)))
                .cloned()
                .collect())
        }

        async fn save(&self, customer: Customer) -> Result<Customer, StorageError> {
            let mut inner = self.inner.write().map_err(|_| StorageError::LockPoisoned)?;
            Ok(inner.save(customer))
        }

        async fn save_all(
            &self,
            customers: Vec<Customer>,
        ) -> Result<Vec<Customer>, StorageError> {
            let mut inner = self.inner.write().map_err(|_| StorageError::LockPoisoned)?;
            Ok(customers.into_iter().map(|c| inner.save(c)).collect())
        }

        async fn delete_by_id(&self, id: CustomerId) -> Result<bool, StorageError> {
            let mut inner = self.inner.write().map_err(|_| StorageError::LockPoisoned)?;
            Ok(inner.customers.remove(&id).is_some())
        }
    }

}

pub use memory::InMemoryCustomerStore;
