//! Validation et construction du polygone de limite

pub mod ring;

use geo::{Area, Coord, LineString, Polygon};

use crate::KmlError;

/// Construit le polygone à partir de l'anneau extérieur brut
///
/// L'anneau est ouvert (point de fermeture retiré) puis refermé par
/// `Polygon::new`. Un anneau d'aire nulle (points alignés) est rejeté.
pub fn build_polygon(coords: Vec<Coord<f64>>) -> Result<Polygon<f64>, KmlError> {
    let open = ring::open_ring(coords)?;
    let polygon = Polygon::new(LineString::new(open), vec![]);

    if polygon.unsigned_area() == 0.0 {
        return Err(KmlError::malformed("polygon ring has zero area"));
    }

    Ok(polygon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_polygon_closes_ring() {
        let coords = vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 0.0, y: 0.0 },
        ];
        let polygon = build_polygon(coords).unwrap();
        assert_eq!(polygon.exterior().0.len(), 4);
        assert!(polygon.exterior().is_closed());
    }

    #[test]
    fn test_build_polygon_collinear() {
        let coords = vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 2.0, y: 2.0 },
        ];
        assert!(matches!(
            build_polygon(coords),
            Err(KmlError::Malformed { .. })
        ));
    }
}
