use axum::Router;

pub mod beers;
pub mod orders;
pub mod system;

/// Router for all catalog and order-status endpoints.
///
/// The beer routes are served under both the versioned and the earlier
/// unversioned prefix.
pub fn router() -> Router {
    Router::new()
        .nest("/api/v1/beers", beers::router())
        .nest("/api/beers", beers::router())
        .nest("/api/v1/order-statuses", orders::router())
}
