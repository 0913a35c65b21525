pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod service;
pub mod state;
pub mod storage;
pub mod validation;

pub use config::Config;
pub use db::{init_pool, run_migrations, SqliteCustomerStore};
pub use error::{FieldViolation, ServiceError, StorageError, ValidationError};
pub use models::{Customer, CustomerId};
pub use routes::{create_router, ApiError};
pub use service::CustomerService;
pub use state::AppState;
pub use storage::{CustomerStore, InMemoryCustomerStore};
pub use validation::Validator;
