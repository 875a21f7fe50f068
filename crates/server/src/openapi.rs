use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartnerRequest {
    pub trading_name: String,
    pub owner_name: String,
    pub document: String,
    /// GeoJSON MultiPolygon, EPSG:4326
    #[schema(value_type = Object)]
    pub coverage_area: serde_json::Value,
    /// GeoJSON Point, EPSG:4326
    #[schema(value_type = Object)]
    pub address: serde_json::Value,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDoc {
    pub id: Uuid,
    pub trading_name: String,
    pub owner_name: String,
    pub document: String,
    #[schema(value_type = Object)]
    pub coverage_area: serde_json::Value,
    #[schema(value_type = Object)]
    pub address: serde_json::Value,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBody { pub error: String, pub message: Option<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::partners::create,
        crate::routes::partners::get_by_id,
        crate::routes::partners::search,
    ),
    components(
        schemas(
            HealthResponse,
            CreatePartnerRequest,
            PartnerDoc,
            ErrorBody,
        )
    ),
    tags(
        (name = "health"),
        (name = "partners")
    )
)]
pub struct ApiDoc;
