//! Customer business logic on top of a [`CustomerStore`].
//!
//! Every storage failure is logged with the failing operation and wrapped in
//! [`ServiceError::Failure`]. Absence of a record is never an error: lookups
//! return `Option`, deletes return `bool`.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult, StorageError};
use crate::models::{Customer, CustomerId};
use crate::storage::CustomerStore;
use crate::validation::Validator;

#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
}

fn failure(operation: &'static str, context: String, source: StorageError) -> ServiceError {
    tracing::error!("Error occurred while {} ({}): {}", operation, context, source);
    ServiceError::Failure {
        operation,
        context,
        source,
    }
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    pub async fn get_all_customers(&self) -> ServiceResult<Vec<Customer>> {
        self.store
            .find_all()
            .await
            .map_err(|e| failure("retrieving all customers", "all".to_string(), e))
    }

    pub async fn get_customer_by_id(&self, id: CustomerId) -> ServiceResult<Option<Customer>> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| failure("retrieving customer", format!("id {}", id), e))
    }

    /// Validate and persist a new customer. Any id on the candidate is dropped
    /// so the store assigns a fresh one.
    pub async fn create_customer(&self, mut candidate: Customer) -> ServiceResult<Customer> {
        Validator::validate_customer(&candidate)?;
        candidate.customer_id = None;

        let created = self
            .store
            .save(candidate)
            .await
            .map_err(|e| failure("creating a new customer", "new".to_string(), e))?;

        tracing::info!("Created customer {:?}", created.customer_id);
        Ok(created)
    }

    /// Replace the whole record stored under `id`.
    /// Returns `Ok(None)` without writing anything if `id` is unknown.
    pub async fn update_customer(
        &self,
        id: CustomerId,
        replacement: Customer,
    ) -> ServiceResult<Option<Customer>> {
        Validator::validate_customer(&replacement)?;
        let context = || format!("id {}", id);

        let existing = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| failure("updating customer", context(), e))?;
        if existing.is_none() {
            tracing::debug!("Update skipped, customer {} not found", id);
            return Ok(None);
        }

        let updated = self
            .store
            .save(replacement.with_id(id))
            .await
            .map_err(|e| failure("updating customer", context(), e))?;

        tracing::info!("Updated customer {}", id);
        Ok(Some(updated))
    }

    /// Returns `Ok(false)` if there was nothing to delete.
    pub async fn delete_customer(&self, id: CustomerId) -> ServiceResult<bool> {
        let deleted = self
            .store
            .delete_by_id(id)
            .await
            .map_err(|e| failure("deleting customer", format!("id {}", id), e))?;

        if deleted {
            tracing::info!("Deleted customer {}", id);
        } else {
            tracing::debug!("Delete skipped, customer {} not found", id);
        }
        Ok(deleted)
    }

    /// Persist a batch of new customers with a single `save_all`.
    ///
    /// The whole batch is validated first. A storage failure fails the whole
    /// call; whether earlier rows survive is up to the store.
    pub async fn bulk_load_customers(
        &self,
        candidates: Vec<Customer>,
    ) -> ServiceResult<Vec<Customer>> {
        Validator::validate_batch(&candidates)?;
        let count = candidates.len();

        let candidates = candidates
            .into_iter()
            .map(|mut c| {
                c.customer_id = None;
                c
            })
            .collect();

        let saved = self.store.save_all(candidates).await.map_err(|e| {
            failure(
                "bulk loading customers",
                format!("{} records", count),
                e,
            )
        })?;

        tracing::info!("Bulk loaded {} customers", saved.len());
        Ok(saved)
    }

    /// Merge each update into the stored record with the same id.
    ///
    /// Entries whose id is missing or unknown are skipped without being
    /// validated. Matched entries are all validated before the first write.
    /// Matched records are then written one `save` at a time after a single
    /// read, with no transaction around them, so concurrent writers to the
    /// same ids are neither detected nor blocked.
    ///
    /// The returned vector is `updates` exactly as passed in, not the
    /// persisted state.
    pub async fn bulk_update_customers(
        &self,
        updates: Vec<Customer>,
    ) -> ServiceResult<Vec<Customer>> {
        let ids: HashSet<CustomerId> = updates.iter().filter_map(|u| u.customer_id).collect();
        let existing = self.store.find_all_by_id(&ids).await.map_err(|e| {
            failure(
                "bulk updating customers",
                format!("{} ids", ids.len()),
                e,
            )
        })?;

        let matched: Vec<(usize, CustomerId, &Customer, &Customer)> = updates
            .iter()
            .enumerate()
            .filter_map(|(i, update)| {
                let id = update.customer_id?;
                match existing.iter().find(|c| c.customer_id == Some(id)) {
                    Some(found) => Some((i, id, update, found)),
                    None => {
                        tracing::debug!("Bulk update skipped unknown customer {}", id);
                        None
                    }
                }
            })
            .collect();

        Validator::validate_entries(matched.iter().map(|(i, _, update, _)| (*i, *update)))?;

        for (_, id, update, found) in &matched {
            let mut merged = (*found).clone();
            merged.merge_from(update);
            self.store
                .save(merged)
                .await
                .map_err(|e| failure("bulk updating customers", format!("id {}", id), e))?;
        }

        tracing::info!(
            "Bulk update wrote {} of {} customers",
            matched.len(),
            updates.len()
        );
        Ok(updates)
    }
}
