//! Orchestrateur d'un réseau de distribution
//!
//! Cycle de vie : `open` (cache ou construction depuis les sources), mises à
//! jour de statut (chacune suivie d'une réécriture complète des fichiers),
//! `reset` (reconstruction depuis le jeu régional en conservant les statuts
//! connus).

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::boundary::{self, Boundary};
use crate::config::Config;
use crate::filter::filter_roads;
use crate::matching::MatchPolicy;
use crate::prompt::{prompt_batch, Batch};
use crate::render::{render_html, MapStyle, PlotColumns, RingColumns};
use crate::report::UpdateReport;
use crate::road::{Road, RoadClass, Status};
use crate::status::{self, StatusChange, StatusRecord};
use crate::store::manifest::{Manifest, SourceFingerprint};
use crate::store::{csv as csv_store, geojson as geojson_store, regional, NetworkPaths};
use crate::NetworkError;

/// Fichiers sources d'un réseau
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSources {
    /// Export KML/KMZ de la limite
    pub exterior: PathBuf,
    /// Jeu régional des rues
    pub roads: PathBuf,
}

impl NetworkSources {
    /// Sources par défaut : `<nom>.kml` et le jeu régional de la configuration
    pub fn from_config(config: &Config, name: &str) -> Self {
        Self {
            exterior: Config::default_exterior(name),
            roads: config.roads_source(),
        }
    }
}

/// Comptages d'un réseau
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub network: String,
    pub segments: usize,
    pub unnamed: usize,
    pub distinct_names: usize,
    pub delivered: usize,
    pub arranged: usize,
    pub undelivered: usize,
}

/// Réseau chargé : limite, segments et paramètres de traitement
#[derive(Debug)]
pub struct Network {
    paths: NetworkPaths,
    boundary: Boundary,
    roads: Vec<Road>,
    sources: NetworkSources,
    relevance: Vec<RoadClass>,
    policy: MatchPolicy,
    style: MapStyle,
}

impl Network {
    /// Charge le réseau `name`, ou le construit s'il n'existe pas encore
    ///
    /// # Errors
    ///
    /// - `InvalidNetworkName` avant toute création de répertoire
    /// - `UnsupportedFormat` / `MalformedSource` pour la limite
    /// - `MissingRegionalData` si le jeu régional est requis et illisible
    /// - `CorruptCache` si un fichier en cache est illisible
    pub fn open(config: &Config, name: &str, sources: NetworkSources) -> Result<Self, NetworkError> {
        let paths = NetworkPaths::new(&config.data_dir, name)?;
        let boundary = boundary::load(&paths, &sources.exterior)?;

        let mut network = Self {
            paths,
            boundary,
            roads: Vec::new(),
            sources,
            relevance: config.relevance_classes.clone(),
            policy: config.matching.clone(),
            style: config.map.clone(),
        };

        let cache = network.paths.roads();
        if cache.is_file() {
            network.roads = geojson_store::read_roads(&cache)?;
            status::recompute_derived(&mut network.roads);
            network.check_manifest();
            info!(
                network = network.name(),
                segments = network.roads.len(),
                "Network loaded from cache"
            );
        } else {
            network.roads = network.build_roads()?;
            network.persist()?;
            network.write_manifest();
            info!(
                network = network.name(),
                segments = network.roads.len(),
                "Network created"
            );
        }

        Ok(network)
    }

    pub fn name(&self) -> &str {
        self.paths.name()
    }

    pub fn paths(&self) -> &NetworkPaths {
        &self.paths
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Met à jour un nom de rue puis persiste
    pub fn update_status(&mut self, name: &str, status: Status) -> Result<StatusChange, NetworkError> {
        let change = status::update_status(&mut self.roads, name, status)?;
        self.persist()?;
        Ok(change)
    }

    /// Applique une suite de mises à jour ; une seule écriture en fin de lot
    ///
    /// Les noms introuvables sont consignés dans le rapport sans interrompre
    /// le lot.
    pub fn apply<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a str, Status)>,
        source: &str,
    ) -> Result<UpdateReport, NetworkError> {
        let mut report = UpdateReport::new(self.name(), source);
        for (name, status) in entries {
            match status::update_status(&mut self.roads, name, status) {
                Ok(change) => report.record_applied(name, status, change.matched, change.changed),
                Err(NetworkError::RoadNotFound(missing)) => {
                    warn!(road = %missing, "Road not found");
                    report.record_not_found(&missing);
                }
                Err(e) => return Err(e),
            }
        }
        report.finalize();

        self.persist()?;
        info!("{}", report.summary());
        Ok(report)
    }

    /// Applique un lot saisi (distribuées puis arrangées)
    pub fn apply_batch(&mut self, batch: &Batch) -> Result<UpdateReport, NetworkError> {
        self.apply(batch.entries(), "interactive")
    }

    /// Pose les questions interactives puis applique le lot
    pub fn prompt_and_apply<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<UpdateReport, NetworkError> {
        let batch = prompt_batch(input, output, &self.policy)?;
        if batch.is_empty() {
            debug!(network = self.name(), "Empty batch, nothing to apply");
        }
        self.apply_batch(&batch)
    }

    /// Applique un résumé `road,status` (par défaut le fichier du réseau,
    /// après édition à la main)
    pub fn import_status_file(&mut self, path: Option<&Path>) -> Result<UpdateReport, NetworkError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(|| self.paths.status());
        let records = csv_store::read_summary(&path)?;
        info!(path = %path.display(), entries = records.len(), "Importing status summary");

        let mut report = UpdateReport::new(self.name(), &path.display().to_string());
        status::import_summary(&mut self.roads, &records, &mut report);
        self.persist()?;
        Ok(report)
    }

    /// Renomme un segment et réaligne son statut sur le dernier résumé connu
    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<UpdateReport, NetworkError> {
        let summary = self.last_summary()?;
        let mut report = UpdateReport::new(self.name(), "rename");
        status::rename_road(&mut self.roads, index, new_name, &summary, &mut report)?;
        info!(network = self.name(), index, to = new_name.trim(), "Road segment renamed");
        self.persist()?;
        Ok(report)
    }

    /// Reconstruit les segments depuis le jeu régional et réapplique les
    /// statuts du dernier résumé connu
    pub fn reset(&mut self) -> Result<UpdateReport, NetworkError> {
        let summary = self.last_summary()?;
        self.roads = self.build_roads()?;

        let mut report = UpdateReport::new(self.name(), "reset");
        status::import_summary(&mut self.roads, &summary, &mut report);
        self.persist()?;
        self.write_manifest();
        info!(
            network = self.name(),
            segments = self.roads.len(),
            restored = report.applied.len(),
            "Network rebuilt"
        );
        Ok(report)
    }

    /// Résumé par nom de l'état courant
    pub fn summary(&self) -> Vec<StatusRecord> {
        status::export_summary(&self.roads)
    }

    pub fn stats(&self) -> NetworkStats {
        let count = |status: Status| self.roads.iter().filter(|r| r.status == status).count();
        NetworkStats {
            network: self.name().to_string(),
            segments: self.roads.len(),
            unnamed: self.roads.iter().filter(|r| r.name.is_none()).count(),
            distinct_names: self.summary().len(),
            delivered: count(Status::Delivered),
            arranged: count(Status::Arranged),
            undelivered: count(Status::Undelivered),
        }
    }

    /// Écrit la carte HTML ; retourne son chemin
    pub fn render(&self, output: Option<&Path>) -> Result<PathBuf, NetworkError> {
        let path = output.map(Path::to_path_buf).unwrap_or_else(|| self.paths.map());
        render_html(
            self.name(),
            &RingColumns::from_boundary(&self.boundary),
            &PlotColumns::from_roads(&self.roads),
            &self.style,
            &path,
        )?;
        Ok(path)
    }

    /// Réécrit la table détaillée (GeoJSON + CSV) et le résumé
    pub fn persist(&self) -> Result<(), NetworkError> {
        self.paths.ensure_dir()?;
        geojson_store::write_roads(&self.roads, &self.paths.roads())?;
        csv_store::write_roads_table(&self.roads, &self.paths.roads_table())?;
        csv_store::write_summary(&self.summary(), &self.paths.status())?;
        debug!(network = self.name(), segments = self.roads.len(), "Network persisted");
        Ok(())
    }

    fn build_roads(&self) -> Result<Vec<Road>, NetworkError> {
        let regional = regional::read_regional(&self.sources.roads)?;
        Ok(filter_roads(&regional, &self.boundary, &self.relevance))
    }

    /// Résumé persisté s'il existe, sinon celui de l'état courant
    fn last_summary(&self) -> Result<Vec<StatusRecord>, NetworkError> {
        let path = self.paths.status();
        if path.is_file() {
            csv_store::read_summary(&path)
        } else {
            Ok(self.summary())
        }
    }

    fn write_manifest(&self) {
        let fingerprints = regional::resolve_source(&self.sources.roads).and_then(|roads| {
            Ok((
                SourceFingerprint::compute(&self.sources.exterior)?,
                SourceFingerprint::compute(&roads)?,
            ))
        });

        let result = fingerprints.and_then(|(exterior, roads)| {
            Manifest::new(self.name(), exterior, roads).write(&self.paths.manifest())
        });
        if let Err(e) = result {
            warn!(network = self.name(), error = %e, "Manifest not written");
        }
    }

    fn check_manifest(&self) {
        let path = self.paths.manifest();
        if !path.is_file() {
            debug!(network = self.name(), "No manifest, source check skipped");
            return;
        }
        match Manifest::read(&path) {
            Ok(manifest) => {
                let roads = regional::resolve_source(&self.sources.roads)
                    .unwrap_or_else(|_| self.sources.roads.clone());
                manifest.check_sources(&self.sources.exterior, &roads);
            }
            Err(e) => warn!(network = self.name(), error = %e, "Manifest unreadable"),
        }
    }
}
