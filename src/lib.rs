//! # customers
//!
//! A CRUD and search service for customer records, served as JSON over HTTP.
//!
//! ## Layers
//!
//! - [`customer`]: the entity. Record shape, field validation, and the
//!   create / update / delete / find / search operations.
//! - [`gateway`]: the storage seam. [`gateway::CustomerStore`] with a
//!   PostgreSQL implementation and an in-memory one.
//! - [`routes`]: HTTP resource handlers and the error-to-status mapping.
//! - The HTTP plumbing underneath: a radix-tree [`Router`] (one tree per
//!   method, 405 for known paths), type-erased async handlers, and a hyper
//!   [`Server`] that drains in-flight requests on SIGTERM.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use customers::{Server, gateway::MemoryStore, routes};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = routes::router(Arc::new(MemoryStore::new()));
//!     Server::bind("0.0.0.0:8080".parse().unwrap()).serve(app).await.unwrap();
//! }
//! ```
//!
//! ## Routes
//!
//! | Verb | Path | Success |
//! |---|---|---|
//! | `POST` | `/customers` | 201 + `Location` |
//! | `GET` | `/customers[?first_name=&last_name=&address=&name=]` | 200 |
//! | `GET` | `/customers/{id}` | 200 |
//! | `PUT` | `/customers/{id}` | 200 |
//! | `DELETE` | `/customers/{id}` | 204 |
//! | `PUT` | `/customers/{id}/suspend` | 200 |
//! | `PUT` | `/customers/{id}/unsuspend` | 200 |
//! | `GET` | `/`, `/healthz`, `/readyz` | 200 |

mod error;
mod handler;
mod middleware;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod customer;
pub mod gateway;
pub mod health;
pub mod routes;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::{BodyError, Request};
pub use response::{ContentType, ErrorBody, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
