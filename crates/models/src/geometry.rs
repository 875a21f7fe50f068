//! GeoJSON geometry values accepted by the partner directory.
//!
//! Only two shapes exist here: a [`Point`] (a partner address) and a
//! [`MultiPolygon`] (a coverage area). Both are validated on construction and
//! serialize as plain GeoJSON objects through the tagged [`Geometry`] enum.
//! Coordinates are `[longitude, latitude]` in EPSG:4326.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, Contains, HaversineDistance, InteriorPoint};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ModelError;

/// Spatial reference of every stored geometry.
pub const SRID: i32 = 4326;

/// `[longitude, latitude]`
pub type Position = [f64; 2];
/// Closed ring; first and last positions are equal.
pub type Ring = Vec<Position>;
/// Exterior ring followed by zero or more holes.
pub type PolygonCoordinates = Vec<Ring>;

/// Wire form of a geometry, tagged by the GeoJSON `type` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPolygon { coordinates: Vec<PolygonCoordinates> },
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
        }
    }
}

/// A validated point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "Geometry", try_from = "Geometry")]
pub struct Point(Position);

/// A validated multi-polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Geometry", try_from = "Geometry")]
pub struct MultiPolygon(Vec<PolygonCoordinates>);

impl Point {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, ModelError> {
        let position = [longitude, latitude];
        check_position(&position).map_err(ModelError::Validation)?;
        Ok(Self(position))
    }

    pub fn longitude(&self) -> f64 {
        self.0[0]
    }

    pub fn latitude(&self) -> f64 {
        self.0[1]
    }

    pub fn coordinates(&self) -> Position {
        self.0
    }

    /// Parse the GeoJSON object submitted for `field`.
    pub fn from_geojson_value(field: &str, value: Value) -> Result<Self, ModelError> {
        from_field(field, "Point", value)
    }

    /// Great-circle distance in metres.
    pub fn haversine_distance(&self, other: &Point) -> f64 {
        geo::Point::from(self).haversine_distance(&geo::Point::from(other))
    }
}

impl MultiPolygon {
    pub fn new(polygons: Vec<PolygonCoordinates>) -> Result<Self, ModelError> {
        check_polygons(&polygons).map_err(ModelError::Validation)?;
        Ok(Self(polygons))
    }

    pub fn polygons(&self) -> &[PolygonCoordinates] {
        &self.0
    }

    /// Parse the GeoJSON object submitted for `field`.
    pub fn from_geojson_value(field: &str, value: Value) -> Result<Self, ModelError> {
        from_field(field, "MultiPolygon", value)
    }

    /// Interior containment; points on a ring are not contained.
    pub fn contains(&self, point: &Point) -> bool {
        geo::MultiPolygon::from(self).contains(&geo::Point::from(point))
    }
}

macro_rules! geojson_text {
    ($ty:ty) => {
        impl $ty {
            pub fn to_geojson_string(&self) -> Result<String, ModelError> {
                serde_json::to_string(self).map_err(|e| ModelError::Validation(e.to_string()))
            }

            pub fn from_geojson_str(text: &str) -> Result<Self, ModelError> {
                serde_json::from_str(text).map_err(|e| ModelError::Validation(e.to_string()))
            }
        }
    };
}

geojson_text!(Point);
geojson_text!(MultiPolygon);

impl From<Point> for Geometry {
    fn from(p: Point) -> Self {
        Geometry::Point { coordinates: p.0 }
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(mp: MultiPolygon) -> Self {
        Geometry::MultiPolygon { coordinates: mp.0 }
    }
}

impl TryFrom<Geometry> for Point {
    type Error = ModelError;

    fn try_from(g: Geometry) -> Result<Self, Self::Error> {
        match g {
            Geometry::Point { coordinates } => {
                check_position(&coordinates).map_err(ModelError::Validation)?;
                Ok(Self(coordinates))
            }
            other => Err(ModelError::Validation(format!("expected Point, found {}", other.kind()))),
        }
    }
}

impl TryFrom<Geometry> for MultiPolygon {
    type Error = ModelError;

    fn try_from(g: Geometry) -> Result<Self, Self::Error> {
        match g {
            Geometry::MultiPolygon { coordinates } => Self::new(coordinates),
            other => Err(ModelError::Validation(format!(
                "expected MultiPolygon, found {}",
                other.kind()
            ))),
        }
    }
}

impl From<&Point> for geo::Point<f64> {
    fn from(p: &Point) -> Self {
        geo::Point::new(p.longitude(), p.latitude())
    }
}

impl From<&MultiPolygon> for geo::MultiPolygon<f64> {
    fn from(mp: &MultiPolygon) -> Self {
        let polygons = mp
            .0
            .iter()
            .filter_map(|rings| {
                let (exterior, holes) = rings.split_first()?;
                Some(geo::Polygon::new(
                    geo::LineString::from(exterior.clone()),
                    holes.iter().map(|h| geo::LineString::from(h.clone())).collect(),
                ))
            })
            .collect();
        geo::MultiPolygon::new(polygons)
    }
}

fn from_field<T>(field: &str, expected: &str, value: Value) -> Result<T, ModelError>
where
    T: TryFrom<Geometry, Error = ModelError>,
{
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ModelError::Validation(format!("{field} must be a GeoJSON object with a \"type\"")))?;
    if kind != expected {
        return Err(ModelError::Validation(format!("{field} must be a {expected}, got {kind}")));
    }
    let geometry: Geometry = serde_json::from_value(value)
        .map_err(|e| ModelError::Validation(format!("{field} is not valid GeoJSON: {e}")))?;
    T::try_from(geometry).map_err(|e| match e {
        ModelError::Validation(msg) => ModelError::Validation(format!("{field}: {msg}")),
        other => other,
    })
}

fn check_position(p: &Position) -> Result<(), String> {
    let [lon, lat] = *p;
    if !lon.is_finite() || !lat.is_finite() {
        return Err("coordinates must be finite numbers".into());
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} out of range [-180, 180]"));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} out of range [-90, 90]"));
    }
    Ok(())
}

fn check_polygons(polygons: &[PolygonCoordinates]) -> Result<(), String> {
    if polygons.is_empty() {
        return Err("multi-polygon needs at least one polygon".into());
    }
    for (i, rings) in polygons.iter().enumerate() {
        if rings.is_empty() {
            return Err(format!("polygon {i} has no rings"));
        }
        for ring in rings {
            if ring.len() < 4 {
                return Err(format!("polygon {i} has a ring with fewer than 4 positions"));
            }
            if ring.first() != ring.last() {
                return Err(format!("polygon {i} has a ring that is not closed"));
            }
            ring.iter().try_for_each(check_position)?;
        }
        check_simple(i, rings)?;
    }
    let shells: Vec<geo::Polygon<f64>> = polygons.iter().map(|rings| ring_polygon(&rings[0])).collect();
    for (a, b) in pairs(&shells) {
        if interiors_overlap(&shells[a], &shells[b]) {
            return Err(format!("polygons {a} and {b} overlap"));
        }
    }
    Ok(())
}

/// OGC simple-polygon rules for one polygon: rings enclose area, do not cross
/// themselves, holes sit inside the exterior ring and do not overlap each other.
fn check_simple(i: usize, rings: &[Ring]) -> Result<(), String> {
    let areas: Vec<geo::Polygon<f64>> = rings.iter().map(|r| ring_polygon(r)).collect();
    for (ring, area) in rings.iter().zip(&areas) {
        if area.unsigned_area() == 0.0 {
            return Err(format!("polygon {i} has a ring with zero area"));
        }
        if self_intersects(ring) {
            return Err(format!("polygon {i} has a self-intersecting ring"));
        }
    }
    let Some((shell, holes)) = areas.split_first() else { return Ok(()) };
    if holes.iter().any(|h| !shell.contains(h.exterior())) {
        return Err(format!("polygon {i} has a hole outside its exterior ring"));
    }
    for (a, b) in pairs(holes) {
        if interiors_overlap(&holes[a], &holes[b]) {
            return Err(format!("polygon {i} has overlapping holes"));
        }
    }
    Ok(())
}

fn ring_polygon(ring: &Ring) -> geo::Polygon<f64> {
    geo::Polygon::new(geo::LineString::from(ring.clone()), vec![])
}

fn pairs<T>(items: &[T]) -> impl Iterator<Item = (usize, usize)> + '_ {
    (0..items.len()).flat_map(move |a| (a + 1..items.len()).map(move |b| (a, b)))
}

fn segments(ring: &Ring) -> Vec<geo::Line<f64>> {
    ring.windows(2)
        .filter(|w| w[0] != w[1]) // repeated positions are allowed
        .map(|w| geo::Line::new(w[0], w[1]))
        .collect()
}

fn self_intersects(ring: &Ring) -> bool {
    let segs = segments(ring);
    let n = segs.len();
    let hit = pairs(&segs).any(|(a, b)| {
        let adjacent = b == a + 1 || (a == 0 && b == n - 1);
        match line_intersection(segs[a], segs[b]) {
            None => false,
            // adjacent edges only share their common vertex
            Some(LineIntersection::SinglePoint { .. }) => !adjacent,
            Some(LineIntersection::Collinear { intersection }) => {
                !adjacent || intersection.start != intersection.end
            }
        }
    });
    hit
}

/// Two simple rings whose interiors share area; touching boundaries do not count.
fn interiors_overlap(a: &geo::Polygon<f64>, b: &geo::Polygon<f64>) -> bool {
    let crossing = a.exterior().lines().any(|la| {
        b.exterior().lines().any(|lb| {
            matches!(line_intersection(la, lb), Some(LineIntersection::SinglePoint { is_proper: true, .. }))
        })
    });
    crossing
        || a.exterior().points().any(|p| b.contains(&p))
        || b.exterior().points().any(|p| a.contains(&p))
        || a.interior_point().is_some_and(|p| b.contains(&p))
        || b.interior_point().is_some_and(|p| a.contains(&p))
}
