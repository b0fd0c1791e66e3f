//! Persistence Gateway: the storage seam under the Customer entity.
//!
//! [`CustomerStore`] is the whole contract. Every operation touches at most
//! one row (reads may return a filtered set). Failures come back as
//! [`StoreError`] and are never retried here.
//!
//! Two implementations:
//!
//! | Store | Backing | Used for |
//! |---|---|---|
//! | [`PostgresStore`] | `sqlx::PgPool` | production (`STORAGE_MODE=postgres`) |
//! | [`MemoryStore`] | `RwLock<Vec<Customer>>` | tests, local runs (`STORAGE_MODE=memory`) |

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::customer::{Customer, CustomerFilter, NewCustomer};

/// A storage backend failure: connectivity, constraint violation, bad row.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("storage error: {0}")]
pub struct StoreError(pub String);

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self(e.to_string())
    }
}

/// Storage operations for customer rows.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Stores a new row, assigning `id`, `created_at` and `updated_at`.
    async fn insert(&self, customer: NewCustomer) -> Result<Customer, StoreError>;

    /// Replaces the mutable fields of the row with `customer.id` and bumps
    /// `updated_at`. `None` if no such row (or `customer.id` is unset).
    async fn update(&self, customer: Customer) -> Result<Option<Customer>, StoreError>;

    /// Sets only the `suspended` column. `None` if no such row.
    async fn set_suspended(&self, id: Uuid, suspended: bool) -> Result<Option<Customer>, StoreError>;

    /// Removes a row. `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Customer>, StoreError>;

    /// Rows matching `filter`; an empty filter returns every row.
    async fn select(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, StoreError>;

    /// Cheap round trip proving the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Creates the customers table if it does not exist.
    async fn init_schema(&self) -> Result<(), StoreError>;
}
