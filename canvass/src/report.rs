//! Rapport de mise à jour des statuts avec graceful degradation
//!
//! Un nom introuvable n'interrompt jamais un lot : il est consigné ici et le
//! traitement continue avec les noms suivants.

use std::path::Path;

use serde::Serialize;

use crate::road::Status;
use crate::NetworkError;

/// Statut global du lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateStatus {
    /// Tous les noms ont été trouvés
    Success,
    /// Certains noms introuvables, les autres appliqués
    PartialSuccess,
    /// Aucun nom trouvé
    Failed,
}

/// Mise à jour appliquée à un nom de rue
#[derive(Debug, Clone, Serialize)]
pub struct AppliedUpdate {
    /// Nom de rue
    pub road: String,
    /// Nouveau statut
    pub status: Status,
    /// Nombre de segments portant ce nom
    pub segments: usize,
    /// Nombre de segments dont le statut a réellement changé
    pub changed: usize,
}

/// Rapport complet d'un lot de mises à jour
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    /// Nom du réseau
    pub network: String,
    /// Origine du lot (saisie interactive, fichier CSV, renommage...)
    pub source: String,
    /// Statut global
    pub status: UpdateStatus,
    /// Noms appliqués
    pub applied: Vec<AppliedUpdate>,
    /// Noms introuvables
    pub not_found: Vec<String>,
}

impl UpdateReport {
    /// Crée un rapport vide pour un réseau et une origine
    pub fn new(network: &str, source: &str) -> Self {
        Self {
            network: network.to_string(),
            source: source.to_string(),
            status: UpdateStatus::Success,
            applied: Vec::new(),
            not_found: Vec::new(),
        }
    }

    /// Enregistre un nom appliqué
    pub fn record_applied(&mut self, road: &str, status: Status, segments: usize, changed: usize) {
        self.applied.push(AppliedUpdate {
            road: road.to_string(),
            status,
            segments,
            changed,
        });
    }

    /// Enregistre un nom introuvable
    pub fn record_not_found(&mut self, road: &str) {
        self.not_found.push(road.to_string());
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        self.status = if self.not_found.is_empty() {
            UpdateStatus::Success
        } else if self.applied.is_empty() {
            UpdateStatus::Failed
        } else {
            UpdateStatus::PartialSuccess
        };
    }

    /// Nombre de segments modifiés
    pub fn segments_changed(&self) -> usize {
        self.applied.iter().map(|a| a.changed).sum()
    }

    /// Noms trouvés mais déjà au statut demandé
    pub fn unchanged(&self) -> impl Iterator<Item = &AppliedUpdate> {
        self.applied.iter().filter(|a| a.changed == 0)
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("UPDATE REPORT - {} ({})", self.network, self.source);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!(
            "Roads: {} applied, {} unchanged, {} not found ({} segments changed)",
            self.applied.len() - self.unchanged().count(),
            self.unchanged().count(),
            self.not_found.len(),
            self.segments_changed()
        );

        if !self.applied.is_empty() {
            println!("\n--- APPLIED ---");
            for a in self.applied.iter().take(30) {
                println!(
                    "  {} -> {} ({} of {} segments changed)",
                    a.road, a.status, a.changed, a.segments
                );
            }
            if self.applied.len() > 30 {
                println!("  ... and {} more", self.applied.len() - 30);
            }
        }

        if !self.not_found.is_empty() {
            println!("\n--- NOT FOUND ({}) ---", self.not_found.len());
            for road in &self.not_found {
                println!("  {}", road);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<(), NetworkError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} applied, {} not found, {} segments changed",
            self.network,
            self.applied.len(),
            self.not_found.len(),
            self.segments_changed()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_default_success() {
        let mut report = UpdateReport::new("Ladygrove", "interactive");
        report.finalize();
        assert_eq!(report.status, UpdateStatus::Success);
        assert_eq!(report.segments_changed(), 0);
    }

    #[test]
    fn test_finalize_partial_success() {
        let mut report = UpdateReport::new("Ladygrove", "interactive");
        report.record_applied("Elm Street", Status::Delivered, 2, 2);
        report.record_not_found("Nonexistent Rd");
        report.finalize();
        assert_eq!(report.status, UpdateStatus::PartialSuccess);
    }

    #[test]
    fn test_finalize_failed() {
        let mut report = UpdateReport::new("Ladygrove", "status.csv");
        report.record_not_found("Nonexistent Rd");
        report.finalize();
        assert_eq!(report.status, UpdateStatus::Failed);
    }

    #[test]
    fn test_unchanged_counted_as_applied() {
        let mut report = UpdateReport::new("Ladygrove", "status.csv");
        report.record_applied("Elm Street", Status::Arranged, 2, 0);
        report.record_applied("High Street", Status::Delivered, 1, 1);
        report.finalize();
        assert_eq!(report.status, UpdateStatus::Success);
        assert_eq!(report.unchanged().count(), 1);
        assert_eq!(report.segments_changed(), 1);
    }

    #[test]
    fn test_summary() {
        let mut report = UpdateReport::new("Ladygrove", "interactive");
        report.record_applied("Elm Street", Status::Delivered, 2, 2);
        let summary = report.summary();
        assert!(summary.contains("Ladygrove"));
        assert!(summary.contains("1 applied"));
        assert!(summary.contains("2 segments changed"));
    }
}
