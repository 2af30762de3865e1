//! Consistent error responses.
//!
//! Every failure renders as `{timestamp, status, error, message}`; validation
//! failures add `errors: [{field, message}]` and stock shortages add
//! `beerId, requested, available`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::{json, Map, Value};
use thiserror::Error;

use taproom_core::DomainError;
use taproom_infra::ServiceError;

/// Message returned for any failure whose details must stay in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request could not be decoded (bad JSON, wrong types, bad path parameter).
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("no route for {0}")]
    RouteNotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => ApiError::Domain(e),
            ServiceError::Storage(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => match e {
                DomainError::Validation(_) | DomainError::InvalidId(_) => StatusCode::BAD_REQUEST,
                DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                DomainError::Conflict(_) | DomainError::InsufficientStock { .. } => StatusCode::CONFLICT,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Map<String, Value> {
        let status = self.status();
        match self {
            ApiError::Domain(DomainError::Validation(violations)) => {
                let mut body = error_body(status, "Validation failed");
                body.insert("errors".to_string(), json!(violations));
                body
            }
            ApiError::Domain(DomainError::InvalidId(msg)) => error_body(status, msg.clone()),
            ApiError::Domain(DomainError::NotFound(msg)) => error_body(status, msg.clone()),
            ApiError::Domain(DomainError::Conflict(msg)) => error_body(status, msg.clone()),
            ApiError::Domain(DomainError::InsufficientStock {
                beer_id,
                requested,
                available,
            }) => {
                let mut body = error_body(status, self.to_string());
                body.insert("beerId".to_string(), json!(beer_id));
                body.insert("requested".to_string(), json!(requested));
                body.insert("available".to_string(), json!(available));
                body
            }
            ApiError::BadRequest(msg) => error_body(status, msg.clone()),
            ApiError::RouteNotFound(path) => error_body(status, format!("No route for {path}")),
            ApiError::Internal(_) => error_body(status, INTERNAL_ERROR_MESSAGE),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, axum::Json(Value::Object(self.body()))).into_response()
    }
}

/// Base error body shared by every failure.
pub fn error_body(status: StatusCode, message: impl Into<String>) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("timestamp".to_string(), json!(Utc::now()));
    body.insert("status".to_string(), json!(status.as_u16()));
    body.insert(
        "error".to_string(),
        json!(status.canonical_reason().unwrap_or("Unknown")),
    );
    body.insert("message".to_string(), json!(message.into()));
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use taproom_core::Violations;
    use uuid::Uuid;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_keeps_the_domain_message() {
        let (status, body) =
            render(DomainError::not_found("Beer not found with id: abc").into()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["message"], "Beer not found with id: abc");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn validation_lists_every_field() {
        let mut v = Violations::new();
        v.push("beerName", "Beer name is required");
        v.push("price", "Price must be greater than 0");

        let (status, body) = render(DomainError::Validation(v).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation failed");
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "beerName");
        assert_eq!(errors[1]["message"], "Price must be greater than 0");
    }

    #[tokio::test]
    async fn insufficient_stock_is_a_conflict_with_details() {
        let beer_id = Uuid::now_v7();
        let (status, body) = render(
            DomainError::InsufficientStock {
                beer_id,
                requested: 8,
                available: 5,
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["beerId"], beer_id.to_string());
        assert_eq!(body["requested"], 8);
        assert_eq!(body["available"], 5);
    }

    #[tokio::test]
    async fn storage_failures_hide_their_details() {
        let err: ApiError = ServiceError::Storage("password authentication failed".to_string()).into();
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn conflicts_map_to_409() {
        let err: ApiError = DomainError::conflict("Beer with UPC 123456789 already exists").into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
