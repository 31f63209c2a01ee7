//! Types d'erreurs pour le crate canvass

use thiserror::Error;

/// Erreurs du réseau de rues (chargement, mise à jour, persistance)
///
/// Les erreurs des bibliothèques (I/O, CSV, GeoJSON) remontent telles quelles.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Source de limite dans un format non reconnu
    #[error("Unsupported boundary source format: {0}")]
    UnsupportedFormat(String),

    /// Source de limite sans le polygone unique attendu
    #[error("Malformed boundary source {path}: {reason}")]
    MalformedSource { path: String, reason: String },

    /// Aucun segment ne porte ce nom
    #[error("Road not found: {0}")]
    RoadNotFound(String),

    /// Fichier des rues régionales absent ou illisible
    #[error("Regional roads data unavailable at {path}: {reason}")]
    MissingRegionalData { path: String, reason: String },

    /// Index de segment absent du réseau
    #[error("No road segment with index {0} in this network")]
    StaleIndex(usize),

    /// Nom de réseau inutilisable comme nom de répertoire
    #[error("Invalid network name: '{0}'")]
    InvalidNetworkName(String),

    /// Fichier de cache illisible ou incomplet
    #[error("Corrupt cache file {path}: {reason}")]
    CorruptCache { path: String, reason: String },

    /// Statut de distribution inconnu
    #[error("Invalid status '{0}', expected Yes, No or Arranged")]
    InvalidStatus(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    GeoJson(#[from] geojson::Error),

    #[error(transparent)]
    Geozero(#[from] geozero::error::GeozeroError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    /// Crée une erreur de cache corrompu avec contexte
    pub fn corrupt_cache(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::CorruptCache {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de données régionales manquantes avec contexte
    pub fn missing_regional(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::MissingRegionalData {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}
