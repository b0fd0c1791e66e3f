//! PostgreSQL customer store.
//!
//! One table, `customers`, keyed by a UUID the store generates. Filters are
//! turned into `col = $n` conditions with bound parameters; values are never
//! spliced into SQL text.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};
use uuid::Uuid;

use super::{CustomerStore, StoreError};
use crate::customer::{Customer, CustomerFilter, NewCustomer};

const COLUMNS: &str = "id, first_name, last_name, address, suspended, created_at, updated_at";

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS customers (
    id          UUID PRIMARY KEY,
    first_name  TEXT NOT NULL CHECK (btrim(first_name) <> ''),
    last_name   TEXT NOT NULL CHECK (btrim(last_name) <> ''),
    address     TEXT NOT NULL CHECK (btrim(address) <> ''),
    suspended   BOOLEAN NOT NULL DEFAULT FALSE,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
)";

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    address: String,
    suspended: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: Some(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            address: row.address,
            suspended: row.suspended,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

/// Customer store over a `sqlx` connection pool.
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        info!(max_connections, "postgres pool ready");
        Ok(Self::new(pool))
    }

    /// Waits for checked-out connections to return, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// `SELECT` for `filter`, with one `$n` placeholder per set field in
/// first_name, last_name, address order.
fn select_sql(filter: &CustomerFilter) -> String {
    let mut conditions = Vec::new();
    let columns = [
        ("first_name", filter.first_name.is_some()),
        ("last_name", filter.last_name.is_some()),
        ("address", filter.address.is_some()),
    ];
    for (column, set) in columns {
        if set {
            conditions.push(format!("{column} = ${}", conditions.len() + 1));
        }
    }

    let mut sql = format!("SELECT {COLUMNS} FROM customers");
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at, id");
    sql
}

#[async_trait]
impl CustomerStore for PostgresStore {
    async fn insert(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        let sql = format!(
            "INSERT INTO customers (id, first_name, last_name, address, suspended, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, now(), now()) RETURNING {COLUMNS}"
        );
        let row: CustomerRow = sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(customer.first_name)
            .bind(customer.last_name)
            .bind(customer.address)
            .bind(customer.suspended)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update(&self, customer: Customer) -> Result<Option<Customer>, StoreError> {
        let Some(id) = customer.id else {
            return Ok(None);
        };
        let sql = format!(
            "UPDATE customers SET first_name = $2, last_name = $3, address = $4, \
             suspended = $5, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row: Option<CustomerRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(customer.first_name)
            .bind(customer.last_name)
            .bind(customer.address)
            .bind(customer.suspended)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Customer::from))
    }

    async fn set_suspended(&self, id: Uuid, suspended: bool) -> Result<Option<Customer>, StoreError> {
        let sql = format!(
            "UPDATE customers SET suspended = $2, updated_at = now() WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row: Option<CustomerRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(suspended)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Customer::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        let row: Option<CustomerRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Customer::from))
    }

    async fn select(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, StoreError> {
        let sql = select_sql(filter);
        debug!(%sql, "select customers");

        let mut query = sqlx::query_as::<_, CustomerRow>(&sql);
        for value in [&filter.first_name, &filter.last_name, &filter.address]
            .into_iter()
            .flatten()
        {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!("customers table ready");
        Ok(())
    }
}
