use axum::{extract::Path, routing::get, Json, Router};

use taproom_core::DomainError;
use taproom_sales::{can_transition, OrderStatus};

use crate::app::dto::{TransitionCheckResponse, TransitionsResponse};
use crate::app::errors::ApiError;

/// Read-only view of the order status machine.
pub fn router() -> Router {
    Router::new()
        .route("/:status/transitions", get(list_transitions))
        .route("/:status/transitions/:target", get(check_transition))
}

fn parse_status(field: &str, raw: &str) -> Result<OrderStatus, ApiError> {
    raw.parse::<OrderStatus>()
        .map_err(|e| DomainError::validation(field, e.to_string()).into())
}

pub async fn list_transitions(Path(status): Path<String>) -> Result<Json<TransitionsResponse>, ApiError> {
    let from = parse_status("status", &status)?;
    Ok(Json(TransitionsResponse {
        from: from.to_string(),
        allowed: from
            .allowed_transitions()
            .into_iter()
            .map(|s| s.to_string())
            .collect(),
    }))
}

pub async fn check_transition(
    Path((status, target)): Path<(String, String)>,
) -> Result<Json<TransitionCheckResponse>, ApiError> {
    let from = parse_status("status", &status)?;
    let to = parse_status("target", &target)?;
    Ok(Json(TransitionCheckResponse {
        from: from.to_string(),
        to: to.to_string(),
        allowed: can_transition(from, to),
    }))
}
