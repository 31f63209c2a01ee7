//! Configuration du système
//!
//! Valeurs par défaut, puis fichier JSON (`--config` ou `CANVASS_CONFIG`),
//! puis variables d'environnement `CANVASS_DATA_DIR` et `CANVASS_ROADS`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::MatchPolicy;
use crate::render::MapStyle;
use crate::road::RoadClass;

/// Fichier régional par défaut (extrait Geofabrik)
pub const DEFAULT_ROADS_FILE: &str = "gis_osm_roads_free_1.shp";

pub const ENV_CONFIG: &str = "CANVASS_CONFIG";
pub const ENV_DATA_DIR: &str = "CANVASS_DATA_DIR";
pub const ENV_ROADS: &str = "CANVASS_ROADS";

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Répertoire contenant un sous-répertoire par réseau
    pub data_dir: PathBuf,

    /// Jeu régional des rues (`.shp`, `.geojson` ou répertoire d'extrait)
    pub roads_file: Option<PathBuf>,

    /// Classes retenues pour les rues sans nom
    pub relevance_classes: Vec<RoadClass>,

    /// Normalisation des noms saisis
    pub matching: MatchPolicy,

    /// Dimensions de la carte
    pub map: MapStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            roads_file: None,
            relevance_classes: RoadClass::default_relevant(),
            matching: MatchPolicy::default(),
            map: MapStyle::default(),
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Résout la configuration effective : fichier explicite, sinon
    /// `CANVASS_CONFIG`, sinon valeurs par défaut ; puis surcharges d'environnement
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        Self::resolve_with(path, |key| std::env::var(key).ok())
    }

    /// Comme [`Config::resolve`], avec une source de variables injectable
    pub fn resolve_with(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let from_env = env(ENV_CONFIG).filter(|v| !v.is_empty()).map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(file) => {
                debug!(path = %file.display(), "Loading configuration file");
                Self::load(&file)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(env);
        Ok(config)
    }

    /// Applique `CANVASS_DATA_DIR` et `CANVASS_ROADS`
    pub fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = env(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(roads) = env(ENV_ROADS).filter(|v| !v.is_empty()) {
            self.roads_file = Some(PathBuf::from(roads));
        }
    }

    /// Source régionale effective
    pub fn roads_source(&self) -> PathBuf {
        self.roads_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROADS_FILE))
    }

    /// Source de limite par défaut d'un réseau : `<nom>.kml`
    pub fn default_exterior(name: &str) -> PathBuf {
        PathBuf::from(format!("{name}.kml"))
    }
}
