//! Lecture du fichier source (.kml en clair ou archive .kmz)

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::types::SourceFormat;
use crate::KmlError;

/// Lit le document KML brut depuis un fichier `.kml` ou `.kmz`
///
/// # Errors
///
/// `UnsupportedFormat` si l'extension n'est pas reconnue, `InvalidArchive` /
/// `MissingFile` pour une archive KMZ inutilisable.
pub fn read_source(path: &Path) -> Result<Vec<u8>, KmlError> {
    let format = SourceFormat::from_path(path)
        .ok_or_else(|| KmlError::UnsupportedFormat(path.display().to_string()))?;

    match format {
        SourceFormat::Kml => Ok(std::fs::read(path)?),
        SourceFormat::Kmz => extract_kmz(path),
    }
}

/// Extrait le document principal d'une archive KMZ en mémoire
///
/// `doc.kml` est prioritaire, sinon la première entrée `.kml`.
fn extract_kmz(path: &Path) -> Result<Vec<u8>, KmlError> {
    let file = File::open(path)?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| KmlError::InvalidArchive(e.to_string()))?;

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let entry = names
        .iter()
        .find(|n| n.eq_ignore_ascii_case("doc.kml"))
        .or_else(|| {
            names
                .iter()
                .find(|n| n.to_ascii_lowercase().ends_with(".kml"))
        })
        .cloned()
        .ok_or_else(|| KmlError::MissingFile("*.kml".to_string()))?;

    debug!(archive = %path.display(), entry = %entry, "Reading KMZ entry");

    let mut file = archive
        .by_name(&entry)
        .map_err(|e| KmlError::InvalidArchive(e.to_string()))?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;

    Ok(content)
}
