//! Area-of-interest parsing from GeoJSON
//!
//! Requests carry a GeoJSON FeatureCollection; the geometry of its first
//! feature is the area sampled. Bare Features and Geometries are accepted
//! too. Polygons are lifted into a single-member MultiPolygon so the rest of
//! the crate deals with one geometry type.

use anyhow::Context;
use geo::{Geometry, MultiPolygon};
use geojson::GeoJson;

/// Parse a GeoJSON document held in a string
pub fn area_from_geojson_str(text: &str) -> anyhow::Result<MultiPolygon<f64>> {
    let geojson: GeoJson = text.parse().context("Failed to parse GeoJSON feature")?;
    area_from_geojson(geojson)
}

/// Parse a GeoJSON document already decoded as JSON; strings are parsed again
pub fn area_from_json_value(value: serde_json::Value) -> anyhow::Result<MultiPolygon<f64>> {
    match value {
        serde_json::Value::String(text) => area_from_geojson_str(&text),
        other => {
            let geojson =
                GeoJson::from_json_value(other).context("Failed to parse GeoJSON feature")?;
            area_from_geojson(geojson)
        }
    }
}

pub fn area_from_geojson(geojson: GeoJson) -> anyhow::Result<MultiPolygon<f64>> {
    let geometry = match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .next()
            .context("Feature collection is empty")?
            .geometry,
        GeoJson::Feature(feature) => feature.geometry,
        GeoJson::Geometry(geometry) => Some(geometry),
    }
    .context("Feature has no geometry")?;

    let geometry = Geometry::<f64>::try_from(geometry).context("Unsupported GeoJSON geometry")?;
    match geometry {
        Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon])),
        Geometry::MultiPolygon(multi) => Ok(multi),
        Geometry::Rect(rect) => Ok(MultiPolygon::new(vec![rect.to_polygon()])),
        other => anyhow::bail!(
            "Expected a Polygon or MultiPolygon geometry, got {}",
            geometry_name(&other)
        ),
    }
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
            }
        }]
    }"#;

    #[test]
    fn test_feature_collection_polygon() {
        let area = area_from_geojson_str(SQUARE).unwrap();
        assert_eq!(area.0.len(), 1);
        assert_eq!(area.unsigned_area(), 100.0);
    }

    #[test]
    fn test_json_value_and_embedded_string() {
        let value: serde_json::Value = serde_json::from_str(SQUARE).unwrap();
        assert_eq!(area_from_json_value(value).unwrap().unsigned_area(), 100.0);
        let embedded = serde_json::Value::String(SQUARE.to_string());
        assert_eq!(area_from_json_value(embedded).unwrap().unsigned_area(), 100.0);
    }

    #[test]
    fn test_rejects_point_and_empty_collection() {
        let point = r#"{"type": "Point", "coordinates": [1, 2]}"#;
        let err = area_from_geojson_str(point).unwrap_err();
        assert!(format!("{:#}", err).contains("Point"));

        let empty = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(area_from_geojson_str(empty).is_err());
    }
}
