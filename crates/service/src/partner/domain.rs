use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored partner record; re-exported so callers need not depend on `models`.
pub use models::partner::Model as Partner;
pub use models::geometry::{MultiPolygon, Point};

/// Creation payload. Geometries stay raw JSON until the service validates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartnerInput {
    #[serde(default)]
    pub trading_name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub document: String,
    #[serde(default)]
    pub coverage_area: Value,
    #[serde(default)]
    pub address: Value,
}
