//! Error types for customer operations.

use thiserror::Error;
use tracing::error;

use crate::gateway::StoreError;
use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// Errors that can occur during customer operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    /// The customer data violates a field contract.
    #[error("{0}")]
    Validation(String),

    /// No customer exists with the requested id.
    #[error("{0}")]
    NotFound(String),

    /// The storage backend failed or rejected the write.
    #[error("Data error: {0}")]
    Data(String),
}

impl CustomerError {
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("Missing or empty field: {field}"))
    }

    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Customer with id '{id}' was not found."))
    }
}

impl From<StoreError> for CustomerError {
    fn from(e: StoreError) -> Self {
        Self::Data(e.to_string())
    }
}

impl IntoResponse for CustomerError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(msg) => Response::error(Status::BadRequest, msg),
            Self::NotFound(msg) => Response::error(Status::NotFound, msg),
            // Storage details stay in the logs.
            Self::Data(msg) => {
                error!(error = %msg, "storage failure");
                Response::error(
                    Status::InternalServerError,
                    "The customer store could not complete the request",
                )
            }
        }
    }
}

impl From<CustomerError> for Response {
    fn from(e: CustomerError) -> Self {
        e.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ErrorBody;
    use rstest::rstest;

    #[rstest]
    #[case(CustomerError::missing_field("address"), Status::BadRequest)]
    #[case(CustomerError::not_found("abc"), Status::NotFound)]
    #[case(CustomerError::Data("connection reset".into()), Status::InternalServerError)]
    fn maps_to_status(#[case] err: CustomerError, #[case] expected: Status) {
        assert_eq!(err.into_response().status_code(), expected);
    }

    #[test]
    fn not_found_message_names_the_id() {
        let body: ErrorBody = CustomerError::not_found("abc").into_response().json_body().unwrap();
        assert_eq!(body.message, "Customer with id 'abc' was not found.");
    }

    #[test]
    fn data_errors_do_not_leak_details() {
        let res = CustomerError::Data("password authentication failed".into()).into_response();
        let body: ErrorBody = res.json_body().unwrap();
        assert!(!body.message.contains("password"));
    }
}
