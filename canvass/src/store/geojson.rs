//! Caches vectoriels en GeoJSON (limite et table détaillée des segments)
//!
//! Écriture en streaming avec geozero, lecture typée avec le crate `geojson`.

use std::io::Write;
use std::path::Path;

use geo::{Geometry, MultiLineString, Polygon};
use geojson::{Feature, GeoJson, JsonObject, JsonValue};
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;
use serde_json::json;

use crate::boundary::Boundary;
use crate::road::{Road, RoadClass, Status};
use crate::store::write_atomic;
use crate::NetworkError;

/// Écrit la limite : une FeatureCollection à un seul polygone
pub fn write_boundary(boundary: &Boundary, path: &Path) -> Result<(), NetworkError> {
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), json!(boundary.name));
    let geometry = Geometry::Polygon(boundary.polygon.clone());

    write_atomic(path, |writer| {
        write_collection_header(writer)?;
        write_feature(writer, &geometry, &properties)?;
        write!(writer, "]}}")?;
        Ok(())
    })
}

/// Relit la limite mise en cache
pub fn read_boundary(path: &Path) -> Result<Boundary, NetworkError> {
    let features = read_features(path)?;
    let [feature] = <[Feature; 1]>::try_from(features).map_err(|features| {
        NetworkError::corrupt_cache(
            path,
            format!("expected exactly one feature, found {}", features.len()),
        )
    })?;

    let name = feature
        .property("name")
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string();

    let polygon = match feature_geometry(path, feature)? {
        Geometry::Polygon(polygon) => polygon,
        Geometry::MultiPolygon(mut multi) if multi.0.len() == 1 => multi.0.remove(0),
        _ => return Err(NetworkError::corrupt_cache(path, "boundary is not a polygon")),
    };

    // Seul l'anneau extérieur compte
    let polygon = Polygon::new(polygon.exterior().clone(), vec![]);
    Boundary::new(name, polygon).map_err(|e| NetworkError::corrupt_cache(path, e.to_string()))
}

/// Écrit la table détaillée des segments
pub fn write_roads(roads: &[Road], path: &Path) -> Result<(), NetworkError> {
    write_atomic(path, |writer| {
        write_collection_header(writer)?;
        for (i, road) in roads.iter().enumerate() {
            if i > 0 {
                write!(writer, ",")?;
            }
            write_feature(writer, &road_geometry(road), &road_properties(road))?;
        }
        write!(writer, "]}}")?;
        Ok(())
    })
}

/// Relit la table détaillée ; couleur et épaisseur sont recalculées
pub fn read_roads(path: &Path) -> Result<Vec<Road>, NetworkError> {
    read_features(path)?
        .into_iter()
        .map(|feature| road_from_feature(path, feature))
        .collect()
}

/// Géométrie d'un segment : LineString si une seule partie
pub(crate) fn road_geometry(road: &Road) -> Geometry<f64> {
    match road.geometry.0.as_slice() {
        [single] => Geometry::LineString(single.clone()),
        _ => Geometry::MultiLineString(road.geometry.clone()),
    }
}

fn road_properties(road: &Road) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("index".to_string(), json!(road.index));
    properties.insert("name".to_string(), json!(road.name));
    properties.insert("fclass".to_string(), json!(road.class.as_str()));
    properties.insert("status".to_string(), json!(road.status.label()));
    properties.insert("colour".to_string(), json!(road.color));
    properties.insert("linewidth".to_string(), json!(road.line_width));
    properties
}

fn road_from_feature(path: &Path, feature: Feature) -> Result<Road, NetworkError> {
    let index = feature
        .property("index")
        .and_then(JsonValue::as_u64)
        .ok_or_else(|| NetworkError::corrupt_cache(path, "road without integer 'index'"))?
        as usize;

    let name = feature
        .property("name")
        .and_then(JsonValue::as_str)
        .map(str::to_string);
    let class = RoadClass::parse(
        feature
            .property("fclass")
            .and_then(JsonValue::as_str)
            .unwrap_or_default(),
    );
    let status = match feature.property("status").and_then(JsonValue::as_str) {
        Some(label) => label.parse::<Status>()?,
        None => Status::Undelivered,
    };

    let geometry = match feature_geometry(path, feature)? {
        Geometry::LineString(line) => MultiLineString::new(vec![line]),
        Geometry::MultiLineString(multi) => multi,
        _ => {
            return Err(NetworkError::corrupt_cache(
                path,
                format!("road {index} is not a line geometry"),
            ))
        }
    };

    Ok(Road::with_status(index, name, class, geometry, status))
}

/// Lit toutes les features d'un fichier GeoJSON
pub(crate) fn read_features(path: &Path) -> Result<Vec<Feature>, NetworkError> {
    let content = std::fs::read_to_string(path)?;
    match content.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection.features),
        GeoJson::Feature(feature) => Ok(vec![feature]),
        GeoJson::Geometry(_) => Err(NetworkError::corrupt_cache(
            path,
            "bare geometry, expected a FeatureCollection",
        )),
    }
}

/// Convertit la géométrie GeoJSON d'une feature en géométrie `geo`
pub(crate) fn feature_geometry(path: &Path, feature: Feature) -> Result<Geometry<f64>, NetworkError> {
    let geometry = feature
        .geometry
        .ok_or_else(|| NetworkError::corrupt_cache(path, "feature without geometry"))?;
    Ok(Geometry::<f64>::try_from(geometry.value)?)
}

/// Ouvre une FeatureCollection en WGS84
fn write_collection_header<W: Write>(writer: &mut W) -> Result<(), NetworkError> {
    write!(
        writer,
        r#"{{"type":"FeatureCollection","crs":{{"type":"name","properties":{{"name":"urn:ogc:def:crs:EPSG::4326"}}}},"features":["#
    )?;
    Ok(())
}

/// Écrit une feature : géométrie via geozero, propriétés via serde_json
fn write_feature<W: Write>(
    writer: &mut W,
    geometry: &Geometry<f64>,
    properties: &JsonObject,
) -> Result<(), NetworkError> {
    write!(writer, r#"{{"type":"Feature","geometry":"#)?;
    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    geometry.process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;

    write!(writer, r#","properties":"#)?;
    serde_json::to_writer(&mut *writer, properties)?;
    write!(writer, "}}")?;
    Ok(())
}
