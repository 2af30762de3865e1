use axum::{http::{StatusCode, Uri}, Json};
use serde_json::{json, Value};

use crate::app::errors::ApiError;

pub async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "UP" })))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}
