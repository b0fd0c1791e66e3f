//! Process-local customer store.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CustomerStore, StoreError};
use crate::customer::{Customer, CustomerFilter, NewCustomer};

/// Keeps customers in insertion order behind one lock.
///
/// Ids are random v4 UUIDs, so a deleted id is never handed out again.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Customer>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn insert(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        let mut rows = self.rows.write().await;
        let mut id = Uuid::new_v4();
        while rows.iter().any(|c| c.id == Some(id)) {
            id = Uuid::new_v4();
        }
        let now = Utc::now();
        let stored = Customer {
            id: Some(id),
            first_name: customer.first_name,
            last_name: customer.last_name,
            address: customer.address,
            suspended: customer.suspended,
            created_at: Some(now),
            updated_at: Some(now),
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, customer: Customer) -> Result<Option<Customer>, StoreError> {
        let Some(id) = customer.id else {
            return Ok(None);
        };
        let mut rows = self.rows.write().await;
        let Some(row) = rows.iter_mut().find(|c| c.id == Some(id)) else {
            return Ok(None);
        };
        row.first_name = customer.first_name;
        row.last_name = customer.last_name;
        row.address = customer.address;
        row.suspended = customer.suspended;
        row.updated_at = Some(Utc::now());
        Ok(Some(row.clone()))
    }

    async fn set_suspended(&self, id: Uuid, suspended: bool) -> Result<Option<Customer>, StoreError> {
        let mut rows = self.rows.write().await;
        Ok(rows.iter_mut().find(|c| c.id == Some(id)).map(|row| {
            row.suspended = suspended;
            row.updated_at = Some(Utc::now());
            row.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|c| c.id != Some(id));
        Ok(rows.len() != before)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|c| c.id == Some(id)).cloned())
    }

    async fn select(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|c| filter.matches(c)).cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
