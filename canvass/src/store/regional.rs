//! Lecture du jeu de données régional des rues
//!
//! Deux formats : shapefile Geofabrik (`gis_osm_roads_free_1.shp`) ou
//! GeoJSON portant les mêmes attributs. Seules les géométries linéaires sont
//! retenues.

use std::path::{Path, PathBuf};

use geo::{Coord, Geometry, LineString, MultiLineString};
use geojson::JsonValue;
use shapefile::dbase::{FieldValue, Record};
use shapefile::{Reader, Shape};
use tracing::{debug, info, warn};

use crate::road::RegionalRoad;
use crate::store::geojson::{feature_geometry, read_features};
use crate::NetworkError;

/// Résout la source régionale : un répertoire désigne son premier
/// `*roads*.shp` (ordre alphabétique)
pub fn resolve_source(path: &Path) -> Result<PathBuf, NetworkError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        return Err(NetworkError::missing_regional(path, "no such file or directory"));
    }

    let mut candidates: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            name.contains("roads") && name.ends_with(".shp")
        })
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| NetworkError::missing_regional(path, "no *roads*.shp file in directory"))
}

/// Charge toutes les rues régionales, dans l'ordre du fichier
pub fn read_regional(path: &Path) -> Result<Vec<RegionalRoad>, NetworkError> {
    let path = resolve_source(path)?;
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    info!(path = %path.display(), "Loading regional roads");
    let roads = match extension.as_str() {
        "shp" => read_shapefile(&path)?,
        "geojson" | "json" => read_geojson(&path)?,
        other => {
            return Err(NetworkError::UnsupportedFormat(format!(
                "regional roads must be .shp or .geojson, got '.{other}'"
            )))
        }
    };
    info!(count = roads.len(), "Regional roads loaded");
    Ok(roads)
}

fn read_shapefile(path: &Path) -> Result<Vec<RegionalRoad>, NetworkError> {
    let mut reader =
        Reader::from_path(path).map_err(|e| NetworkError::missing_regional(path, e.to_string()))?;

    let mut roads = Vec::new();
    let mut skipped = 0usize;
    for result in reader.iter_shapes_and_records() {
        let (shape, record) =
            result.map_err(|e| NetworkError::missing_regional(path, e.to_string()))?;

        let Some(geometry) = shape_to_lines(shape) else {
            skipped += 1;
            continue;
        };
        let name = character_field(&record, "name");
        let fclass = character_field(&record, "fclass").unwrap_or_default();
        roads.push(RegionalRoad::new(name.as_deref(), &fclass, geometry));
    }

    if skipped > 0 {
        warn!(skipped, "Non-linear shapes ignored");
    }
    Ok(roads)
}

/// Polyligne shapefile (2D, M ou Z) → MultiLineString ; `None` sinon
fn shape_to_lines(shape: Shape) -> Option<MultiLineString<f64>> {
    let parts: Vec<LineString<f64>> = match shape {
        Shape::Polyline(line) => line
            .parts()
            .iter()
            .map(|part| part.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
            .collect(),
        Shape::PolylineM(line) => line
            .parts()
            .iter()
            .map(|part| part.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
            .collect(),
        Shape::PolylineZ(line) => line
            .parts()
            .iter()
            .map(|part| part.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
            .collect(),
        _ => return None,
    };
    let parts: Vec<LineString<f64>> = parts.into_iter().filter(|l| l.0.len() >= 2).collect();
    (!parts.is_empty()).then(|| MultiLineString::new(parts))
}

fn character_field(record: &Record, field: &str) -> Option<String> {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) => Some(s.trim().to_string()),
        _ => None,
    }
}

fn read_geojson(path: &Path) -> Result<Vec<RegionalRoad>, NetworkError> {
    let features = read_features(path).map_err(|e| match e {
        NetworkError::Io(_) | NetworkError::GeoJson(_) => {
            NetworkError::missing_regional(path, e.to_string())
        }
        other => other,
    })?;

    let mut roads = Vec::with_capacity(features.len());
    let mut skipped = 0usize;
    for feature in features {
        let name = feature
            .property("name")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        let fclass = feature
            .property("fclass")
            .or_else(|| feature.property("highway"))
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();

        let geometry = match feature.geometry {
            Some(_) => feature_geometry(path, feature)?,
            None => {
                skipped += 1;
                continue;
            }
        };
        let lines = match geometry {
            Geometry::LineString(line) => MultiLineString::new(vec![line]),
            Geometry::MultiLineString(multi) => multi,
            _ => {
                skipped += 1;
                continue;
            }
        };
        roads.push(RegionalRoad::new(name.as_deref(), &fclass, lines));
    }

    if skipped > 0 {
        debug!(skipped, "Non-linear features ignored");
    }
    Ok(roads)
}
