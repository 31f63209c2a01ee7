//! Manifeste des sources d'un réseau
//!
//! Enregistre l'empreinte BLAKE3 de la limite et du jeu régional ayant servi
//! à construire le cache. Une divergence ne fait qu'avertir : le cache n'est
//! jamais invalidé automatiquement (voir `reset`).

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::write_atomic;
use crate::NetworkError;

/// Empreinte d'un fichier source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFingerprint {
    pub path: PathBuf,
    /// BLAKE3 en hexadécimal
    pub blake3: String,
    pub size: u64,
}

impl SourceFingerprint {
    /// Calcule l'empreinte d'un fichier par blocs de 64 Ko
    pub fn compute(path: &Path) -> Result<Self, NetworkError> {
        let mut file = File::open(path)?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = [0u8; 65536];
        let mut size = 0u64;

        loop {
            let bytes_read = file.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            size += bytes_read as u64;
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(Self {
            path: path.to_path_buf(),
            blake3: hex::encode(hasher.finalize().as_bytes()),
            size,
        })
    }
}

/// Contenu de `<nom>_manifest.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub network: String,
    pub tool_version: String,
    pub exterior: SourceFingerprint,
    pub roads: SourceFingerprint,
}

impl Manifest {
    pub fn new(network: &str, exterior: SourceFingerprint, roads: SourceFingerprint) -> Self {
        Self {
            network: network.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            exterior,
            roads,
        }
    }

    pub fn read(path: &Path) -> Result<Self, NetworkError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| NetworkError::corrupt_cache(path, e.to_string()))
    }

    pub fn write(&self, path: &Path) -> Result<(), NetworkError> {
        write_atomic(path, |writer| {
            serde_json::to_writer_pretty(&mut *writer, self)?;
            Ok(())
        })
    }

    /// Compare les sources actuelles aux empreintes enregistrées
    ///
    /// Retourne le nombre de sources divergentes ; une source absente ou
    /// illisible est simplement ignorée.
    pub fn check_sources(&self, exterior: &Path, roads: &Path) -> usize {
        let mut stale = 0;
        for (label, recorded, current) in [
            ("exterior", &self.exterior, exterior),
            ("roads", &self.roads, roads),
        ] {
            match SourceFingerprint::compute(current) {
                Ok(fingerprint) if fingerprint.blake3 == recorded.blake3 => {
                    debug!(source = label, "Source unchanged since cache was built");
                }
                Ok(_) => {
                    warn!(
                        source = label,
                        path = %current.display(),
                        "Source changed since the cache was built; run `reset` to rebuild"
                    );
                    stale += 1;
                }
                Err(e) => {
                    debug!(source = label, path = %current.display(), error = %e, "Source not checked");
                }
            }
        }
        stale
    }
}
