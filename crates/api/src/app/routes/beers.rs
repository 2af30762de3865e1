use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use taproom_core::{BeerId, ExpectedVersion};
use taproom_inventory::BeerInput;

use crate::app::dto::BeerDto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::RequestContext;

/// Beer catalog routes, relative to the mount point.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_beers).post(create_beer))
        .route("/upc/:upc", get(get_beer_by_upc))
        .route("/:id", get(get_beer).put(update_beer).delete(delete_beer))
}

fn parse_id(raw: &str) -> Result<BeerId, ApiError> {
    Ok(raw.parse::<BeerId>()?)
}

pub async fn list_beers(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<BeerDto>>, ApiError> {
    let beers = services.beers.list().await?;
    Ok(Json(beers.iter().map(BeerDto::from).collect()))
}

pub async fn get_beer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<BeerDto>, ApiError> {
    let id = parse_id(&id)?;
    let beer = services.beers.get(id).await?;
    Ok(Json(beer.into()))
}

pub async fn get_beer_by_upc(
    Extension(services): Extension<Arc<AppServices>>,
    Path(upc): Path<String>,
) -> Result<Json<BeerDto>, ApiError> {
    let beer = services.beers.get_by_upc(&upc).await?;
    Ok(Json(beer.into()))
}

pub async fn create_beer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    body: Result<Json<BeerDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;

    let beer = services
        .beers
        .create(BeerInput::from(body), ctx.audit())
        .await?;
    tracing::info!(request_id = %ctx.request_id(), beer_id = %beer.id, "beer created");

    let location = format!("/api/v1/beers/{}", beer.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(BeerDto::from(beer)),
    )
        .into_response())
}

pub async fn update_beer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: Result<Json<BeerDto>, JsonRejection>,
) -> Result<Json<BeerDto>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let expected = ExpectedVersion::from_option(body.version);

    let beer = services
        .beers
        .update(id, BeerInput::from(body), expected, ctx.audit())
        .await?;
    tracing::info!(request_id = %ctx.request_id(), beer_id = %id, version = beer.version, "beer updated");
    Ok(Json(beer.into()))
}

pub async fn delete_beer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    services.beers.delete(id).await?;
    tracing::info!(request_id = %ctx.request_id(), beer_id = %id, "beer deleted");
    Ok(StatusCode::NO_CONTENT)
}
