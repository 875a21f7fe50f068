use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult, SqlErr, Statement,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::geometry::{MultiPolygon, Point, SRID};

/// A delivery partner as exposed over the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: Uuid,
    pub trading_name: String,
    pub owner_name: String,
    pub document: String,
    pub coverage_area: MultiPolygon,
    pub address: Point,
}

/// Row shape returned by the select statements; geometries come back as GeoJSON text.
#[derive(Debug, FromQueryResult)]
struct Row {
    id: Uuid,
    trading_name: String,
    owner_name: String,
    document: String,
    coverage_area: String,
    address: String,
}

impl TryFrom<Row> for Model {
    type Error = ModelError;

    fn try_from(row: Row) -> Result<Self, Self::Error> {
        let id = row.id;
        let stored = move |e: ModelError| ModelError::Db(format!("partner {id} has invalid stored geometry: {e}"));
        Ok(Model {
            coverage_area: MultiPolygon::from_geojson_str(&row.coverage_area).map_err(stored)?,
            address: Point::from_geojson_str(&row.address).map_err(stored)?,
            id,
            trading_name: row.trading_name,
            owner_name: row.owner_name,
            document: row.document,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, trading_name, owner_name, document, \
     ST_AsGeoJSON(coverage_area, 15) AS coverage_area, \
     ST_AsGeoJSON(address, 15) AS address \
     FROM partners";

/// Column widths of `trading_name` / `owner_name` in the partners table.
pub const MAX_NAME_LEN: usize = 255;
/// Column width of `document`.
pub const MAX_DOCUMENT_LEN: usize = 50;

/// Non-blank and at most `max_len` characters (varchar counts characters, not bytes).
pub fn validate_text(field: &str, value: &str, max_len: usize) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(ModelError::Validation(format!("{field} must be at most {max_len} characters")));
    }
    Ok(())
}

/// Text checks applied to every partner before it is stored.
pub fn validate_fields(trading_name: &str, owner_name: &str, document: &str) -> Result<(), ModelError> {
    validate_text("tradingName", trading_name, MAX_NAME_LEN)?;
    validate_text("ownerName", owner_name, MAX_NAME_LEN)?;
    validate_text("document", document, MAX_DOCUMENT_LEN)
}

/// Insert one partner. The unique index on `document` is the only duplicate check.
pub async fn insert(db: &DatabaseConnection, partner: &Model) -> Result<(), ModelError> {
    validate_fields(&partner.trading_name, &partner.owner_name, &partner.document)?;

    // PostGIS re-checks validity; shapes GEOS rejects are never stored
    let sql = format!(
        "INSERT INTO partners (id, trading_name, owner_name, document, coverage_area, address) \
         SELECT $1, $2, $3, $4, g.area, ST_SetSRID(ST_GeomFromGeoJSON($6), {SRID}) \
         FROM (SELECT ST_SetSRID(ST_GeomFromGeoJSON($5), {SRID}) AS area) g \
         WHERE ST_IsValid(g.area)"
    );
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        sql,
        [
            partner.id.into(),
            partner.trading_name.clone().into(),
            partner.owner_name.clone().into(),
            partner.document.clone().into(),
            partner.coverage_area.to_geojson_string()?.into(),
            partner.address.to_geojson_string()?.into(),
        ],
    );
    let res = db.execute(stmt).await.map_err(map_insert_err)?;
    if res.rows_affected() == 0 {
        return Err(ModelError::Validation("coverageArea is not a valid multi-polygon".into()));
    }
    Ok(())
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        format!("{SELECT_COLUMNS} WHERE id = $1"),
        [id.into()],
    );
    let row = Row::find_by_statement(stmt)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    row.map(Model::try_from).transpose()
}

/// Among partners whose coverage area contains `location`, the one whose address is
/// nearest by spherical distance; ties go to the lowest id.
pub async fn find_nearest_covering(
    db: &DatabaseConnection,
    location: &Point,
) -> Result<Option<Model>, ModelError> {
    let sql = format!(
        "{SELECT_COLUMNS} \
         WHERE ST_Contains(coverage_area, ST_SetSRID(ST_MakePoint($1, $2), {SRID})) \
         ORDER BY ST_DistanceSphere(address, ST_SetSRID(ST_MakePoint($1, $2), {SRID})), id \
         LIMIT 1"
    );
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        sql,
        [location.longitude().into(), location.latitude().into()],
    );
    let row = Row::find_by_statement(stmt)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    row.map(Model::try_from).transpose()
}

fn map_insert_err(e: DbErr) -> ModelError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ModelError::Conflict("document already exists".into()),
        _ => ModelError::Db(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_keys() {
        let m = Model {
            id: Uuid::nil(),
            trading_name: "Adega da Cerveja".into(),
            owner_name: "Zé da Silva".into(),
            document: "1432132123891/0001".into(),
            coverage_area: MultiPolygon::new(vec![vec![vec![
                [0.0, 0.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [0.0, 0.0],
            ]]])
            .unwrap(),
            address: Point::new(0.5, 0.25).unwrap(),
        };
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["id"], json!("00000000-0000-0000-0000-000000000000"));
        assert_eq!(v["tradingName"], json!("Adega da Cerveja"));
        assert_eq!(v["ownerName"], json!("Zé da Silva"));
        assert_eq!(v["coverageArea"]["type"], json!("MultiPolygon"));
        assert_eq!(v["address"], json!({"type": "Point", "coordinates": [0.5, 0.25]}));

        let back: Model = serde_json::from_value(v).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(validate_text("document", "   ", MAX_DOCUMENT_LEN).is_err());
        assert!(validate_text("document", "123", MAX_DOCUMENT_LEN).is_ok());
    }

    #[test]
    fn text_longer_than_its_column_is_rejected() {
        let doc = "9".repeat(MAX_DOCUMENT_LEN);
        let name = "é".repeat(MAX_NAME_LEN);
        assert!(validate_fields(&name, &name, &doc).is_ok());

        let err = validate_fields("Bar", "Zé", &format!("{doc}0")).unwrap_err();
        assert!(matches!(err, ModelError::Validation(ref m) if m == "document must be at most 50 characters"));
        let err = validate_fields(&format!("{name}x"), "Zé", "1").unwrap_err();
        assert!(matches!(err, ModelError::Validation(ref m) if m.starts_with("tradingName")));
        let err = validate_fields("Bar", &format!("{name}x"), "1").unwrap_err();
        assert!(matches!(err, ModelError::Validation(ref m) if m.starts_with("ownerName")));
    }

    #[test]
    fn stored_geometry_of_wrong_kind_is_a_db_error() {
        let row = Row {
            id: Uuid::new_v4(),
            trading_name: "t".into(),
            owner_name: "o".into(),
            document: "d".into(),
            coverage_area: r#"{"type":"Point","coordinates":[0,0]}"#.into(),
            address: r#"{"type":"Point","coordinates":[0,0]}"#.into(),
        };
        assert!(matches!(Model::try_from(row), Err(ModelError::Db(_))));
    }
}
