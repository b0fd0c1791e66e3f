//! The Customer entity: record shape, validation, and persistence operations.
//!
//! Every operation takes the store handle explicitly. Mutations go straight
//! to the [`CustomerStore`]; nothing is batched or cached here.
//!
//! ```rust
//! # async fn demo() -> Result<(), customers::customer::CustomerError> {
//! use customers::customer::{Customer, CustomerFilter};
//! use customers::gateway::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let mut jane = Customer::new("Jane", "Doe", "1 New Ave");
//! jane.create(&store).await?;
//!
//! let found = Customer::find_by_filters(&store, &CustomerFilter::new().last_name("Doe")).await?;
//! assert_eq!(found, vec![jane]);
//! # Ok(())
//! # }
//! ```

mod error;
mod filter;

pub use error::CustomerError;
pub use filter::CustomerFilter;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::gateway::CustomerStore;

/// A customer record.
///
/// `id`, `created_at` and `updated_at` are `None` until the record has been
/// persisted; the store assigns all three.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Customer {
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub suspended: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// The fields a store needs to insert a customer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub suspended: bool,
}

/// Client-supplied body for create and update.
///
/// Every field is optional at the type level so that a missing field is a
/// validation failure with a clear message rather than a decode error.
/// Unknown keys (including `id`) are ignored. `suspended` may be omitted,
/// but when present it must be a boolean; `null` is rejected.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct CustomerPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "present_bool")]
    pub suspended: Option<bool>,
}

fn present_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    bool::deserialize(deserializer).map(Some)
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Customer {} {} id=[{id}]>", self.first_name, self.last_name),
            None => write!(f, "<Customer {} {} id=[None]>", self.first_name, self.last_name),
        }
    }
}

impl Customer {
    /// An unsaved, active customer.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            suspended: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Builds an unsaved customer from a request body. `suspended` defaults to `false`.
    pub fn from_payload(payload: CustomerPayload) -> Result<Self, CustomerError> {
        let mut customer = Self::new(String::new(), String::new(), String::new());
        customer.apply(payload)?;
        Ok(customer)
    }

    /// Replaces the mutable fields from a request body.
    ///
    /// Nothing changes unless the whole payload validates. An omitted
    /// `suspended` keeps the current value.
    pub fn apply(&mut self, payload: CustomerPayload) -> Result<(), CustomerError> {
        let first_name = required("first_name", payload.first_name)?;
        let last_name = required("last_name", payload.last_name)?;
        let address = required("address", payload.address)?;

        self.first_name = first_name;
        self.last_name = last_name;
        self.address = address;
        if let Some(suspended) = payload.suspended {
            self.suspended = suspended;
        }
        Ok(())
    }

    /// Checks the field contracts: names and address non-blank.
    pub fn validate(&self) -> Result<(), CustomerError> {
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("address", &self.address),
        ] {
            if value.trim().is_empty() {
                return Err(CustomerError::missing_field(field));
            }
        }
        Ok(())
    }

    /// Persists a new customer and fills in `id` and the timestamps.
    pub async fn create(&mut self, store: &dyn CustomerStore) -> Result<(), CustomerError> {
        if let Some(id) = self.id {
            return Err(CustomerError::Validation(format!(
                "Customer already has id '{id}'; use update instead"
            )));
        }
        self.validate()?;

        let stored = store.insert(self.to_new()).await?;
        info!(id = ?stored.id, "customer created");
        *self = stored;
        Ok(())
    }

    /// Overwrites the stored record with this instance's fields.
    pub async fn update(&mut self, store: &dyn CustomerStore) -> Result<(), CustomerError> {
        let Some(id) = self.id else {
            return Err(CustomerError::Validation("Update called with empty id field".into()));
        };
        self.validate()?;

        let stored = store
            .update(self.clone())
            .await?
            .ok_or_else(|| CustomerError::not_found(id))?;
        info!(%id, "customer updated");
        *self = stored;
        Ok(())
    }

    /// Removes the stored record. Absent records (or an unsaved instance) are not an error.
    pub async fn delete(&self, store: &dyn CustomerStore) -> Result<(), CustomerError> {
        let Some(id) = self.id else {
            return Ok(());
        };
        Self::delete_by_id(store, id).await
    }

    /// Removes the record with `id`, if any.
    pub async fn delete_by_id(store: &dyn CustomerStore, id: Uuid) -> Result<(), CustomerError> {
        if store.delete(id).await? {
            info!(%id, "customer deleted");
        } else {
            debug!(%id, "delete of absent customer");
        }
        Ok(())
    }

    pub async fn find_by_id(store: &dyn CustomerStore, id: Uuid) -> Result<Self, CustomerError> {
        store.get(id).await?.ok_or_else(|| CustomerError::not_found(id))
    }

    /// Every stored customer, in the store's stable order.
    pub async fn all(store: &dyn CustomerStore) -> Result<Vec<Self>, CustomerError> {
        Ok(store.select(&CustomerFilter::new()).await?)
    }

    /// Customers matching every set field of `filter` exactly.
    pub async fn find_by_filters(
        store: &dyn CustomerStore,
        filter: &CustomerFilter,
    ) -> Result<Vec<Self>, CustomerError> {
        Ok(store.select(filter).await?)
    }

    /// Customers whose first and last names match a full name exactly.
    ///
    /// See [`CustomerFilter::from_name`] for how the name is split. A blank
    /// name matches nobody.
    pub async fn find_by_name(
        store: &dyn CustomerStore,
        name: &str,
    ) -> Result<Vec<Self>, CustomerError> {
        match CustomerFilter::from_name(name) {
            Some(filter) => Self::find_by_filters(store, &filter).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn suspend(store: &dyn CustomerStore, id: Uuid) -> Result<Self, CustomerError> {
        Self::set_suspended(store, id, true).await
    }

    pub async fn unsuspend(store: &dyn CustomerStore, id: Uuid) -> Result<Self, CustomerError> {
        Self::set_suspended(store, id, false).await
    }

    async fn set_suspended(
        store: &dyn CustomerStore,
        id: Uuid,
        suspended: bool,
    ) -> Result<Self, CustomerError> {
        let stored = store
            .set_suspended(id, suspended)
            .await?
            .ok_or_else(|| CustomerError::not_found(id))?;
        info!(%id, suspended, "customer suspension changed");
        Ok(stored)
    }

    fn to_new(&self) -> NewCustomer {
        NewCustomer {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address.clone(),
            suspended: self.suspended,
        }
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, CustomerError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CustomerError::missing_field(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryStore;
    use rstest::rstest;

    fn payload(first: Option<&str>, last: Option<&str>, address: Option<&str>) -> CustomerPayload {
        CustomerPayload {
            first_name: first.map(str::to_owned),
            last_name: last.map(str::to_owned),
            address: address.map(str::to_owned),
            suspended: None,
        }
    }

    async fn saved(store: &MemoryStore, first: &str, last: &str, address: &str) -> Customer {
        let mut c = Customer::new(first, last, address);
        c.create(store).await.unwrap();
        c
    }

    #[test]
    fn new_customer_is_unsaved_and_active() {
        let c = Customer::new("Jane", "Doe", "1 New Ave");
        assert!(c.id.is_none());
        assert!(!c.suspended);
        assert!(c.created_at.is_none());
        assert!(c.to_string().contains("Customer Jane Doe"));
    }

    #[rstest]
    #[case(payload(None, Some("Doe"), Some("X")), "first_name")]
    #[case(payload(Some(""), Some("Doe"), Some("X")), "first_name")]
    #[case(payload(Some("Jane"), Some("   "), Some("X")), "last_name")]
    #[case(payload(Some("Jane"), Some("Doe"), None), "address")]
    #[case(payload(None, None, None), "first_name")]
    fn payload_validation(#[case] p: CustomerPayload, #[case] field: &str) {
        assert_eq!(Customer::from_payload(p), Err(CustomerError::missing_field(field)));
    }

    #[rstest]
    #[case(r#"{"suspended": null}"#)]
    #[case(r#"{"suspended": "yes"}"#)]
    #[case(r#"{"suspended": 1}"#)]
    fn suspended_must_be_a_boolean_when_present(#[case] body: &str) {
        assert!(serde_json::from_str::<CustomerPayload>(body).is_err());
    }

    #[test]
    fn omitted_suspended_decodes_as_none() {
        let p: CustomerPayload = serde_json::from_str(r#"{"first_name": "Jane"}"#).unwrap();
        assert_eq!(p.suspended, None);
        let p: CustomerPayload = serde_json::from_str(r#"{"suspended": true}"#).unwrap();
        assert_eq!(p.suspended, Some(true));
    }

    #[test]
    fn payload_defaults_suspended_to_false() {
        let c = Customer::from_payload(payload(Some("Jane"), Some("Doe"), Some("1 Ave"))).unwrap();
        assert!(!c.suspended);
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let mut c = Customer::new("Jane", "Doe", "1 Ave");
        let err = c.apply(payload(Some("Janet"), Some(""), Some("2 Ave")));
        assert!(err.is_err());
        assert_eq!(c.first_name, "Jane");
        assert_eq!(c.address, "1 Ave");
    }

    #[test]
    fn apply_keeps_suspension_unless_given() {
        let mut c = Customer::new("Jane", "Doe", "1 Ave");
        c.suspended = true;
        c.apply(payload(Some("Jane"), Some("Doe"), Some("2 Ave"))).unwrap();
        assert!(c.suspended);

        let mut p = payload(Some("Jane"), Some("Doe"), Some("2 Ave"));
        p.suspended = Some(false);
        c.apply(p).unwrap();
        assert!(!c.suspended);
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let store = MemoryStore::new();
        let a = saved(&store, "Jane", "Doe", "1 Ave").await;
        let b = saved(&store, "Jane", "Doe", "1 Ave").await;
        assert!(a.id.is_some());
        assert!(a.created_at.is_some() && a.updated_at.is_some());
        assert_ne!(a.id, b.id);
        assert_eq!(Customer::all(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_rejects_blank_fields_before_touching_storage() {
        let store = MemoryStore::new();
        let mut c = Customer::new("Jane", "Doe", "   ");
        assert_eq!(c.create(&store).await, Err(CustomerError::missing_field("address")));
        assert!(Customer::all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_twice_is_rejected() {
        let store = MemoryStore::new();
        let mut c = saved(&store, "Jane", "Doe", "1 Ave").await;
        assert!(matches!(c.create(&store).await, Err(CustomerError::Validation(_))));
    }

    #[tokio::test]
    async fn round_trip_through_find_by_id() {
        let store = MemoryStore::new();
        let c = saved(&store, "Jane", "Doe", "1 Ave").await;
        let found = Customer::find_by_id(&store, c.id.unwrap()).await.unwrap();
        assert_eq!(found, c);
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_bumps_updated_at() {
        let store = MemoryStore::new();
        let mut c = saved(&store, "Jane", "Doe", "1 Ave").await;
        let created_at = c.created_at;
        let before = c.updated_at;

        c.address = "99 Updated Road".into();
        c.update(&store).await.unwrap();

        let found = Customer::find_by_id(&store, c.id.unwrap()).await.unwrap();
        assert_eq!(found.address, "99 Updated Road");
        assert_eq!(found.created_at, created_at);
        assert!(found.updated_at >= before);
    }

    #[tokio::test]
    async fn update_without_id_is_a_validation_error() {
        let store = MemoryStore::new();
        let mut c = Customer::new("A", "B", "1 Ave");
        assert!(matches!(c.update(&store).await, Err(CustomerError::Validation(_))));
    }

    #[tokio::test]
    async fn absent_ids() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        assert_eq!(Customer::find_by_id(&store, id).await, Err(CustomerError::not_found(id)));

        let mut ghost = Customer::new("A", "B", "1 Ave");
        ghost.id = Some(id);
        assert_eq!(ghost.update(&store).await, Err(CustomerError::not_found(id)));
        assert_eq!(ghost.delete(&store).await, Ok(()));
        assert_eq!(Customer::suspend(&store, id).await, Err(CustomerError::not_found(id)));
        assert_eq!(Customer::unsuspend(&store, id).await, Err(CustomerError::not_found(id)));
    }

    #[tokio::test]
    async fn delete_removes_the_record_and_is_idempotent() {
        let store = MemoryStore::new();
        let c = saved(&store, "Jane", "Doe", "1 Ave").await;
        c.delete(&store).await.unwrap();
        c.delete(&store).await.unwrap();
        assert!(Customer::all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn filters_combine_with_and() {
        let store = MemoryStore::new();
        let john_doe = saved(&store, "John", "Doe", "1 Ave").await;
        saved(&store, "John", "Smith", "2 Ave").await;

        let filter = CustomerFilter::new().first_name("John").last_name("Doe");
        assert_eq!(Customer::find_by_filters(&store, &filter).await.unwrap(), vec![john_doe]);

        let johns_filter = CustomerFilter::new().first_name("John");
        let johns = Customer::find_by_filters(&store, &johns_filter);
        assert_eq!(johns.await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn no_filters_equals_all() {
        let store = MemoryStore::new();
        for i in 0..5 {
            saved(&store, "First", &format!("Last{i}"), "1 Ave").await;
        }
        let all = Customer::all(&store).await.unwrap();
        let unfiltered = Customer::find_by_filters(&store, &CustomerFilter::new()).await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all, unfiltered);
    }

    #[tokio::test]
    async fn find_by_name_uses_first_and_last_tokens() {
        let store = MemoryStore::new();
        saved(&store, "Alice", "Jones", "1 Ave").await;
        saved(&store, "Alice", "Smith", "2 Ave").await;
        saved(&store, "Bob", "Jones", "3 Ave").await;

        let rows = Customer::find_by_name(&store, "Alice Middle Jones").await.unwrap();
        let names: Vec<_> = rows.iter().map(|c| (c.first_name.as_str(), c.last_name.as_str())).collect();
        assert_eq!(names, vec![("Alice", "Jones")]);

        assert!(Customer::find_by_name(&store, "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn suspend_and_unsuspend_are_idempotent() {
        let store = MemoryStore::new();
        let c = saved(&store, "Jane", "Doe", "1 Ave").await;
        let id = c.id.unwrap();

        let s1 = Customer::suspend(&store, id).await.unwrap();
        let s2 = Customer::suspend(&store, id).await.unwrap();
        assert!(s1.suspended && s2.suspended);
        assert_eq!((&s2.first_name, &s2.last_name, &s2.address), (&c.first_name, &c.last_name, &c.address));

        let u1 = Customer::unsuspend(&store, id).await.unwrap();
        let u2 = Customer::unsuspend(&store, id).await.unwrap();
        assert!(!u1.suspended && !u2.suspended);
    }
}
