//! Types d'erreurs pour le crate kml-boundary

use thiserror::Error;

/// Erreurs pouvant survenir lors de la lecture d'un export KML/KMZ
#[derive(Debug, Error)]
pub enum KmlError {
    /// Erreur d'I/O lors de la lecture du fichier source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Extension non reconnue (ni .kml ni .kmz)
    #[error("Unsupported boundary source format: {0}")]
    UnsupportedFormat(String),

    /// Archive KMZ corrompue
    #[error("Invalid KMZ archive: {0}")]
    InvalidArchive(String),

    /// Fichier manquant dans l'archive KMZ
    #[error("Missing required file in archive: {0}")]
    MissingFile(String),

    /// Document sans le polygone unique attendu
    #[error("Malformed KML document: {reason}")]
    Malformed { reason: String },

    /// Tuple de coordonnées illisible
    #[error("Invalid coordinate #{position}: '{value}'")]
    InvalidCoordinate { position: usize, value: String },
}

impl KmlError {
    /// Crée une erreur de structure avec contexte
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}
