//! Shared helpers for the integration tests.
//!
//! Requests go straight into [`Router::call`]; no sockets are opened.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Value, json};
use uuid::Uuid;

use customers::customer::{Customer, CustomerFilter, NewCustomer};
use customers::gateway::{CustomerStore, MemoryStore, StoreError};
use customers::routes::{self, AppState};
use customers::{Response, Router};

pub const BASE_URL: &str = "/customers";

pub struct TestApp {
    pub router: Router<AppState>,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let router = routes::router(store.clone());
        Self { router, store }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(http::Method::GET, uri, None, Bytes::new()).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.send(http::Method::DELETE, uri, None, Bytes::new()).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Response {
        self.send_json(http::Method::POST, uri, body).await
    }

    pub async fn put_json(&self, uri: &str, body: &Value) -> Response {
        self.send_json(http::Method::PUT, uri, body).await
    }

    /// `PUT` with no body and no content type, as suspend/unsuspend are called.
    pub async fn put_empty(&self, uri: &str) -> Response {
        self.send(http::Method::PUT, uri, None, Bytes::new()).await
    }

    pub async fn send_json(&self, method: http::Method, uri: &str, body: &Value) -> Response {
        let bytes = Bytes::from(serde_json::to_vec(body).unwrap());
        self.send(method, uri, Some("application/json"), bytes).await
    }

    pub async fn send(
        &self,
        method: http::Method,
        uri: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Response {
        let mut builder = http::Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        self.router.call(builder.body(body).unwrap()).await
    }

    /// Inserts `count` customers directly through the model.
    pub async fn seed(&self, count: usize) -> Vec<Customer> {
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let mut c = fake_customer(i);
            c.create(self.store.as_ref()).await.unwrap();
            out.push(c);
        }
        out
    }
}

const FIRST_NAMES: [&str; 4] = ["John", "Jane", "Alice", "Bob"];
const LAST_NAMES: [&str; 3] = ["Doe", "Smith", "Jones"];
const STREETS: [&str; 5] = ["Main Street", "Broadway", "Elm Road", "Oak Avenue", "Pine Lane"];

/// Deterministic fake customer; names repeat so filters have overlap to work with.
pub fn fake_customer(i: usize) -> Customer {
    Customer::new(
        FIRST_NAMES[i % FIRST_NAMES.len()],
        LAST_NAMES[i % LAST_NAMES.len()],
        format!("{} {}", 100 + i, STREETS[i % STREETS.len()]),
    )
}

pub fn payload(first: &str, last: &str, address: &str) -> Value {
    json!({ "first_name": first, "last_name": last, "address": address })
}

pub fn path(id: impl std::fmt::Display) -> String {
    format!("{BASE_URL}/{id}")
}

pub fn message(res: &Response) -> String {
    let body: Value = res.json_body().unwrap();
    body["message"].as_str().unwrap_or_default().to_owned()
}

/// Store whose every operation fails, for exercising the 500 path.
pub struct FailingStore;

#[async_trait]
impl CustomerStore for FailingStore {
    async fn insert(&self, _: NewCustomer) -> Result<Customer, StoreError> {
        Err(StoreError("insert refused".into()))
    }
    async fn update(&self, _: Customer) -> Result<Option<Customer>, StoreError> {
        Err(StoreError("update refused".into()))
    }
    async fn set_suspended(&self, _: Uuid, _: bool) -> Result<Option<Customer>, StoreError> {
        Err(StoreError("update refused".into()))
    }
    async fn delete(&self, _: Uuid) -> Result<bool, StoreError> {
        Err(StoreError("delete refused".into()))
    }
    async fn get(&self, _: Uuid) -> Result<Option<Customer>, StoreError> {
        Err(StoreError("connection lost".into()))
    }
    async fn select(&self, _: &CustomerFilter) -> Result<Vec<Customer>, StoreError> {
        Err(StoreError("connection lost".into()))
    }
    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError("connection lost".into()))
    }
    async fn init_schema(&self) -> Result<(), StoreError> {
        Err(StoreError("connection lost".into()))
    }
}

pub fn failing_router() -> Router<AppState> {
    routes::router(Arc::new(FailingStore))
}
