use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::partner::{PartnerRepository, PartnerService};

use crate::openapi::ApiDoc;

pub mod partners;

/// Shared handler state; the repository is injected, never global.
#[derive(Clone)]
pub struct ServerState {
    pub partners: Arc<PartnerService<dyn PartnerRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn PartnerRepository>) -> Self {
        Self { partners: Arc::new(PartnerService::new(repo)) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: health, partner routes, and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // `/partners/search` is a static segment and wins over `/partners/:id`
    let partner_routes = Router::new()
        .route("/partners", post(partners::create))
        .route("/partners/search", get(partners::search))
        .route("/partners/:id", get(partners::get_by_id));

    Router::new()
        .route("/health", get(health))
        .merge(partner_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
