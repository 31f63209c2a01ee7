//! Limite d'un réseau (polygone de la zone de distribution)

use std::path::Path;

use geo::{Area, Polygon};
use kml_boundary::KmlError;
use tracing::{debug, info};

use crate::store::geojson::{read_boundary, write_boundary};
use crate::store::NetworkPaths;
use crate::NetworkError;

/// Zone de distribution : un nom et un polygone WGS84 sans trou
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub name: String,
    pub polygon: Polygon<f64>,
}

impl Boundary {
    /// Valide l'anneau : au moins 3 sommets distincts et une aire non nulle
    pub fn new(name: String, polygon: Polygon<f64>) -> Result<Self, NetworkError> {
        // L'anneau est fermé par geo, d'où le sommet supplémentaire
        let vertices = polygon.exterior().0.len();
        if vertices < 4 {
            return Err(NetworkError::MalformedSource {
                path: format!("boundary '{name}'"),
                reason: format!("ring has {} distinct vertices, need 3", vertices.saturating_sub(1)),
            });
        }
        if polygon.unsigned_area() == 0.0 {
            return Err(NetworkError::MalformedSource {
                path: format!("boundary '{name}'"),
                reason: "ring has zero area".to_string(),
            });
        }
        Ok(Self { name, polygon })
    }

    /// Nombre de sommets, point de fermeture exclu
    pub fn vertex_count(&self) -> usize {
        self.polygon.exterior().0.len().saturating_sub(1)
    }
}

/// Charge la limite d'un réseau
///
/// Le cache `<nom>_exterior.geojson` est prioritaire ; sinon la source KML/KMZ
/// est lue puis mise en cache. Crée le répertoire du réseau au besoin.
pub fn load(paths: &NetworkPaths, source: &Path) -> Result<Boundary, NetworkError> {
    paths.ensure_dir()?;

    let cache = paths.exterior();
    if cache.is_file() {
        debug!(path = %cache.display(), "Loading cached boundary");
        return read_boundary(&cache);
    }

    let boundary = parse_source(source)?;
    info!(
        network = paths.name(),
        name = %boundary.name,
        vertices = boundary.vertex_count(),
        "Boundary parsed"
    );
    write_boundary(&boundary, &cache)?;
    Ok(boundary)
}

/// Lit une source KML/KMZ sans passer par le cache
pub fn parse_source(source: &Path) -> Result<Boundary, NetworkError> {
    let parsed = kml_boundary::parse(source).map_err(|e| match e {
        KmlError::UnsupportedFormat(ext) => NetworkError::UnsupportedFormat(ext),
        KmlError::Io(io) => NetworkError::Io(io),
        other => NetworkError::MalformedSource {
            path: source.display().to_string(),
            reason: other.to_string(),
        },
    })?;

    Boundary::new(parsed.name, parsed.polygon).map_err(|e| match e {
        NetworkError::MalformedSource { reason, .. } => NetworkError::MalformedSource {
            path: source.display().to_string(),
            reason,
        },
        other => other,
    })
}
