use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, SqlitePool};

use crate::error::StorageError;
use crate::models::{Customer, CustomerId};
use crate::storage::CustomerStore;

/// Ids bound per `IN (...)` lookup, well under SQLite's bind-variable limit.
const MAX_IDS_PER_QUERY: usize = 1000;

const CUSTOMER_COLUMNS: &str = "customer_id, name, email, phone, address, company_name, \
     industry_type, customer_status, account_manager, audit";

/// Initialize database connection pool with recommended pragmas.
///
/// In-memory databases are per-connection in SQLite, so they get a single
/// connection that is never recycled.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(5))
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(10)
    };

    pool_options.connect_with(options).await
}

/// Run database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(include_str!("../migrations/001_create_customers.sql"))
        .execute(pool)
        .await?;
    Ok(())
}

/// SQLite implementation of CustomerStore.
#[derive(Clone)]
pub struct SqliteCustomerStore {
    pool: SqlitePool,
}

impl SqliteCustomerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Insert or overwrite a single row on any executor (pool or transaction).
async fn save_with<'e, E>(executor: E, customer: &Customer) -> Result<Customer, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        r#"
        INSERT INTO customers ({CUSTOMER_COLUMNS})
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(customer_id) DO UPDATE SET
            name = excluded.name,
            email = excluded.email,
            phone = excluded.phone,
            address = excluded.address,
            company_name = excluded.company_name,
            industry_type = excluded.industry_type,
            customer_status = excluded.customer_status,
            account_manager = excluded.account_manager,
            audit = excluded.audit
        RETURNING {CUSTOMER_COLUMNS}
        "#
    );

    sqlx::query_as::<Sqlite, Customer>(&sql)
        .bind(customer.customer_id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.company_name)
        .bind(&customer.industry_type)
        .bind(&customer.customer_status)
        .bind(&customer.account_manager)
        .bind(customer.audit)
        .fetch_one(executor)
        .await
}

#[async_trait]
impl CustomerStore for SqliteCustomerStore {
    async fn find_all(&self) -> Result<Vec<Customer>, StorageError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY customer_id ASC");
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(customers)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StorageError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE customer_id = ?");
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    async fn find_all_by_id(
        &self,
        ids: &HashSet<CustomerId>,
    ) -> Result<Vec<Customer>, StorageError> {
        let mut ids: Vec<CustomerId> = ids.iter().copied().collect();
        ids.sort_unstable();

        let mut customers = Vec::new();
        for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
                "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE customer_id IN ("
            ));
            let mut separated = builder.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            separated.push_unseparated(") ORDER BY customer_id ASC");

            customers.extend(
                builder
                    .build_query_as::<Customer>()
                    .fetch_all(&self.pool)
                    .await?,
            );
        }
        Ok(customers)
    }

    async fn save(&self, customer: Customer) -> Result<Customer, StorageError> {
        Ok(save_with(&self.pool, &customer).await?)
    }

    /// All rows go through one transaction; any failure rolls back the batch.
    async fn save_all(&self, customers: Vec<Customer>) -> Result<Vec<Customer>, StorageError> {
        let mut tx = self.pool.begin().await?;

        let mut saved = Vec::with_capacity(customers.len());
        for customer in &customers {
            saved.push(save_with(&mut *tx, customer).await?);
        }

        tx.commit().await?;
        Ok(saved)
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
