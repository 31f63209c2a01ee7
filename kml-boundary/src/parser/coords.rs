//! Parser pour le contenu des éléments `<coordinates>`
//!
//! Tuples `lon,lat[,altitude]` séparés par des espaces ou des retours à la
//! ligne. L'altitude est validée puis ignorée.

use geo::Coord;

use crate::KmlError;

/// Parse une liste de coordonnées KML en points (lon, lat)
pub fn parse(raw: &str) -> Result<Vec<Coord<f64>>, KmlError> {
    raw.split_ascii_whitespace()
        .enumerate()
        .map(|(position, tuple)| {
            parse_tuple(tuple).ok_or_else(|| KmlError::InvalidCoordinate {
                position,
                value: tuple.to_string(),
            })
        })
        .collect()
}

/// Parse un tuple `lon,lat[,alt]` ; `None` si illisible ou hors domaine WGS84
fn parse_tuple(tuple: &str) -> Option<Coord<f64>> {
    let mut parts = tuple.split(',');
    let lon = parse_f64(parts.next()?)?;
    let lat = parse_f64(parts.next()?)?;
    if let Some(alt) = parts.next() {
        parse_f64(alt)?;
    }
    if parts.next().is_some() {
        return None;
    }

    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return None;
    }

    Some(Coord { x: lon, y: lat })
}

fn parse_f64(value: &str) -> Option<f64> {
    fast_float::parse::<f64, _>(value)
        .ok()
        .filter(|v| v.is_finite())
}
