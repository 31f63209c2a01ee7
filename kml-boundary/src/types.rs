//! Types de données pour le crate kml-boundary

use std::path::Path;

use geo::Polygon;

/// Polygone extrait d'un export KML (un seul placemark)
#[derive(Debug, Clone)]
pub struct KmlPolygon {
    /// Nom affiché du placemark (peut être vide)
    pub name: String,

    /// Polygone en WGS84 (lon, lat), anneau extérieur uniquement
    pub polygon: Polygon<f64>,

    /// Nombre d'anneaux intérieurs ignorés
    pub dropped_interiors: usize,
}

/// Format du fichier source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Document KML en clair
    Kml,

    /// Archive zip contenant un document KML
    Kmz,
}

impl SourceFormat {
    /// Détecte le format depuis l'extension (insensible à la casse)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("kml") {
            Some(Self::Kml)
        } else if ext.eq_ignore_ascii_case("kmz") {
            Some(Self::Kmz)
        } else {
            None
        }
    }
}

/// Placemark brut repéré dans le document, avant validation
#[derive(Debug)]
pub struct RawPlacemark<'a> {
    /// Contenu texte de `<name>`, déjà décodé
    pub name: Option<String>,

    /// Contenu brut des `<coordinates>` de chaque anneau extérieur
    pub outer_rings: Vec<&'a str>,

    /// Nombre d'anneaux intérieurs rencontrés
    pub inner_rings: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_from_path() {
        assert_eq!(
            SourceFormat::from_path(Path::new("Ladygrove.kml")),
            Some(SourceFormat::Kml)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("export/Area.KMZ")),
            Some(SourceFormat::Kmz)
        );
        assert_eq!(SourceFormat::from_path(Path::new("area.geojson")), None);
        assert_eq!(SourceFormat::from_path(Path::new("kml")), None);
    }
}
