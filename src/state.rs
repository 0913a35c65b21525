use std::sync::Arc;

use sqlx::SqlitePool;

use crate::db::SqliteCustomerStore;
use crate::service::CustomerService;
use crate::storage::CustomerStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub customers: CustomerService,
}

impl AppState {
    /// Wire the service to a SQLite-backed store.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_store(Arc::new(SqliteCustomerStore::new(pool)))
    }

    pub fn with_store(store: Arc<dyn CustomerStore>) -> Self {
        Self {
            customers: CustomerService::new(store),
        }
    }
}
