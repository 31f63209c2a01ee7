//! Persistance des réseaux sur disque
//!
//! Un répertoire par réseau, contenant tous ses fichiers :
//!
//! | Fichier                   | Contenu                                   |
//! |---------------------------|-------------------------------------------|
//! | `<nom>_exterior.geojson`  | limite (un polygone + `name`)             |
//! | `<nom>_roads.geojson`     | table détaillée des segments              |
//! | `<nom>_roads.csv`         | miroir tabulaire (géométrie en WKT)       |
//! | `<nom>_status.csv`        | résumé `road,status`, éditable à la main  |
//! | `<nom>_manifest.json`     | empreintes des sources                    |
//! | `<nom>_map.html`          | carte interactive                         |

pub mod csv;
pub mod geojson;
pub mod manifest;
pub mod regional;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::NetworkError;

/// Caractères autorisés dans un nom de réseau
const NETWORK_NAME_PATTERN: &str = r"^[\w .-]+$";

fn network_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NETWORK_NAME_PATTERN).expect("valid network name pattern"))
}

/// Vérifie qu'un nom de réseau est utilisable comme nom de répertoire
pub fn validate_network_name(name: &str) -> Result<(), NetworkError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || !network_name_regex().is_match(name)
    {
        return Err(NetworkError::InvalidNetworkName(name.to_string()));
    }
    Ok(())
}

/// Chemins des fichiers d'un réseau
#[derive(Debug, Clone)]
pub struct NetworkPaths {
    name: String,
    dir: PathBuf,
}

impl NetworkPaths {
    /// Chemins du réseau `name` sous `data_dir` (rien n'est créé)
    pub fn new(data_dir: &Path, name: &str) -> Result<Self, NetworkError> {
        validate_network_name(name)?;
        Ok(Self {
            name: name.to_string(),
            dir: data_dir.join(name),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Crée le répertoire du réseau s'il n'existe pas (idempotent)
    pub fn ensure_dir(&self) -> Result<(), NetworkError> {
        if !self.dir.is_dir() {
            debug!(dir = %self.dir.display(), "Creating network directory");
            std::fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    fn file(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}_{}", self.name, suffix))
    }

    pub fn exterior(&self) -> PathBuf {
        self.file("exterior.geojson")
    }

    pub fn roads(&self) -> PathBuf {
        self.file("roads.geojson")
    }

    pub fn roads_table(&self) -> PathBuf {
        self.file("roads.csv")
    }

    pub fn status(&self) -> PathBuf {
        self.file("status.csv")
    }

    pub fn manifest(&self) -> PathBuf {
        self.file("manifest.json")
    }

    pub fn map(&self) -> PathBuf {
        self.file("map.html")
    }
}

/// Écrit un fichier via un fichier temporaire voisin puis un renommage
///
/// Un arrêt en cours d'écriture laisse l'ancien fichier intact.
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> Result<(), NetworkError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), NetworkError>,
{
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        if let Err(e) = write(&mut writer).and_then(|_| writer.flush().map_err(NetworkError::from))
        {
            drop(writer);
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }
    }

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
