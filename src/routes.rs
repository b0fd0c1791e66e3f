//! HTTP resource handlers for `/customers`.
//!
//! Handlers parse the request, call the Customer entity, and serialize the
//! result. Status codes are decided here and only here:
//!
//! | Error | Status |
//! |---|---|
//! | `CustomerError::Validation`, malformed JSON | 400 |
//! | `CustomerError::NotFound` | 404 |
//! | wrong `Content-Type` | 415 |
//! | `CustomerError::Data` | 500 |
//!
//! A path id that is not a UUID is answered with 404 on every route,
//! including DELETE. A well-formed id that is simply absent still deletes
//! with 204.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::customer::{Customer, CustomerError, CustomerFilter, CustomerPayload};
use crate::gateway::CustomerStore;
use crate::health;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

pub const BASE_URL: &str = "/customers";

/// Handler outcome; both arms are complete responses.
pub type HandlerResult = Result<Response, Response>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn CustomerStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn CustomerStore {
        self.store.as_ref()
    }
}

/// Query parameters accepted by `GET /customers`.
///
/// Blank values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    /// Full name: first token is the first name, last token the last name.
    pub name: Option<String>,
}

impl CustomerQuery {
    /// The equality filter this query asks for, or `None` if its parts
    /// contradict each other and nothing can match.
    pub fn filter(&self) -> Option<CustomerFilter> {
        let present = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();
        let filter = CustomerFilter {
            first_name: present(&self.first_name),
            last_name: present(&self.last_name),
            address: present(&self.address),
        };
        match present(&self.name) {
            Some(name) => filter.and(CustomerFilter::from_name(&name)?),
            None => Some(filter),
        }
    }
}

/// Builds the service router over `store`.
pub fn router(store: Arc<dyn CustomerStore>) -> Router<AppState> {
    Router::new(AppState::new(store))
        .on(Method::Get,    "/",                                index)
        .on(Method::Get,    "/healthz",                         health::liveness)
        .on(Method::Get,    "/readyz",                          health::readiness)
        .on(Method::Get,    "/customers",                       list_customers)
        .on(Method::Post,   "/customers",                       create_customer)
        .on(Method::Get,    "/customers/{customer_id}",         get_customer)
        .on(Method::Put,    "/customers/{customer_id}",         update_customer)
        .on(Method::Delete, "/customers/{customer_id}",         delete_customer)
        .on(Method::Put,    "/customers/{customer_id}/suspend", suspend_customer)
        .on(Method::Put,    "/customers/{customer_id}/unsuspend", unsuspend_customer)
}

// GET /
async fn index(_req: Request, _state: AppState) -> Response {
    Response::json(&json!({
        "name": "Customers REST API Service",
        "version": "2.0",
        "status": "OK",
        "paths": {
            "List/Create Customers": BASE_URL,
            "Read/Update/Delete Customer": format!("{BASE_URL}/<customer_id>"),
            "Suspend Customer": format!("{BASE_URL}/<customer_id>/suspend"),
            "Unsuspend Customer": format!("{BASE_URL}/<customer_id>/unsuspend"),
        },
    }))
}

// GET /customers[?first_name=&last_name=&address=&name=]
async fn list_customers(req: Request, state: AppState) -> HandlerResult {
    info!("Request for customer list");
    let query: CustomerQuery = req.query()
        .map_err(|e| Response::error(Status::BadRequest, format!("Invalid query string: {e}")))?;

    let customers = match query.filter() {
        None => Vec::new(),
        Some(filter) if filter.is_empty() => {
            info!("Find all customers");
            Customer::all(state.store()).await?
        }
        Some(filter) => {
            info!(?filter, "Find with filters");
            Customer::find_by_filters(state.store(), &filter).await?
        }
    };

    info!(count = customers.len(), "Returning customers");
    Ok(Response::json(&customers))
}

// POST /customers
async fn create_customer(req: Request, state: AppState) -> HandlerResult {
    info!("Request to create a customer");
    let payload: CustomerPayload = req.json()?;
    let mut customer = Customer::from_payload(payload)?;
    customer.create(state.store()).await?;

    let location = match customer.id {
        Some(id) => format!("{BASE_URL}/{id}"),
        None => BASE_URL.to_owned(),
    };
    info!(%location, "Customer created");
    Ok(Response::builder()
        .status(Status::Created)
        .header("location", &location)
        .json(&customer))
}

// GET /customers/{customer_id}
async fn get_customer(req: Request, state: AppState) -> HandlerResult {
    let id = customer_id(&req)?;
    info!(%id, "Request for customer");
    let customer = Customer::find_by_id(state.store(), id).await?;
    Ok(Response::json(&customer))
}

// PUT /customers/{customer_id}
async fn update_customer(req: Request, state: AppState) -> HandlerResult {
    let id = customer_id(&req)?;
    info!(%id, "Request to update customer");
    let payload: CustomerPayload = req.json()?;

    let mut customer = Customer::find_by_id(state.store(), id).await?;
    customer.apply(payload)?;
    customer.update(state.store()).await?;
    Ok(Response::json(&customer))
}

// DELETE /customers/{customer_id}
async fn delete_customer(req: Request, state: AppState) -> HandlerResult {
    let id = customer_id(&req)?;
    info!(%id, "Request to delete customer");
    Customer::delete_by_id(state.store(), id).await?;
    Ok(Response::status(Status::NoContent))
}

// PUT /customers/{customer_id}/suspend
async fn suspend_customer(req: Request, state: AppState) -> HandlerResult {
    let id = customer_id(&req)?;
    info!(%id, "Request to suspend customer");
    Ok(Response::json(&Customer::suspend(state.store(), id).await?))
}

// PUT /customers/{customer_id}/unsuspend
async fn unsuspend_customer(req: Request, state: AppState) -> HandlerResult {
    let id = customer_id(&req)?;
    info!(%id, "Request to unsuspend customer");
    Ok(Response::json(&Customer::unsuspend(state.store(), id).await?))
}

fn customer_id(req: &Request) -> Result<Uuid, CustomerError> {
    let raw = req.param("customer_id").unwrap_or_default();
    Uuid::parse_str(raw).map_err(|_| CustomerError::not_found(raw))
}
