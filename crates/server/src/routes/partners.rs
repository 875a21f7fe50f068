use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    Json,
};
use serde::Deserialize;
use service::partner::{CreatePartnerInput, Partner};
use tracing::info;

use crate::{errors::JsonApiError, routes::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Latitude in degrees, [-90, 90]
    pub lat: f64,
    /// Longitude in degrees, [-180, 180]
    pub long: f64,
}

#[utoipa::path(
    post, path = "/partners", tag = "partners",
    request_body = crate::openapi::CreatePartnerRequest,
    responses(
        (status = 200, description = "Created", body = crate::openapi::PartnerDoc),
        (status = 400, description = "Invalid geometry, empty field or duplicate document", body = crate::openapi::ErrorBody)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreatePartnerInput>, JsonRejection>,
) -> Result<Json<Partner>, JsonApiError> {
    let Json(input) = payload.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    info!(document = %input.document, trading_name = %input.trading_name, "partner_create_request");
    let created = state.partners.create(input).await?;
    info!(id = %created.id, document = %created.document, "created partner");
    Ok(Json(created))
}

#[utoipa::path(
    get, path = "/partners/{id}", tag = "partners",
    params(("id" = String, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::PartnerDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Partner>, JsonApiError> {
    Ok(Json(state.partners.get(&id).await?))
}

#[utoipa::path(
    get, path = "/partners/search", tag = "partners",
    params(SearchQuery),
    responses(
        (status = 200, description = "Nearest partner covering the location", body = crate::openapi::PartnerDoc),
        (status = 400, description = "Missing or out-of-range coordinates", body = crate::openapi::ErrorBody),
        (status = 404, description = "No partner covers the location", body = crate::openapi::ErrorBody)
    )
)]
pub async fn search(
    State(state): State<ServerState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Partner>, JsonApiError> {
    let Query(q) = query.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    let found = state.partners.find_by_location(q.lat, q.long).await?;
    info!(lat = q.lat, long = q.long, id = %found.id, "partner search hit");
    Ok(Json(found))
}
