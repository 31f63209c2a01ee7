//! Gestion des statuts de distribution
//!
//! Deux représentations coexistent : la table détaillée par segment (index
//! stable, autoritaire) et le résumé par nom de rue, éditable à la main. Le
//! passage de l'une à l'autre se fait uniquement par [`export_summary`] et
//! [`import_summary`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::report::UpdateReport;
use crate::road::{Road, Status};
use crate::NetworkError;

/// Ligne du résumé par nom (`road,status`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub road: String,
    pub status: Status,
}

/// Résultat d'une mise à jour par nom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Segments portant le nom
    pub matched: usize,
    /// Segments dont le statut a changé
    pub changed: usize,
}

/// Recolore chaque segment selon son statut
pub fn recompute_derived(roads: &mut [Road]) {
    for road in roads.iter_mut() {
        road.refresh_derived();
    }
}

/// Applique `status` à tous les segments nommés exactement `name`
///
/// # Errors
///
/// `RoadNotFound` si aucun segment ne porte ce nom ; la table est alors
/// inchangée.
pub fn update_status(
    roads: &mut [Road],
    name: &str,
    status: Status,
) -> Result<StatusChange, NetworkError> {
    let mut matched = 0;
    let mut changed = 0;

    for road in roads.iter_mut().filter(|r| r.has_name(name)) {
        matched += 1;
        if road.status != status {
            road.status = status;
            road.refresh_derived();
            changed += 1;
        }
    }

    if matched == 0 {
        return Err(NetworkError::RoadNotFound(name.to_string()));
    }

    debug!(road = name, status = %status, matched, changed, "Updated road status");
    Ok(StatusChange { matched, changed })
}

/// Projette la table détaillée en résumé par nom
///
/// Ordre : première apparition du nom. Si des segments de même nom
/// divergent, le statut le plus avancé l'emporte (`Yes` > `Arranged` > `No`).
/// Les segments sans nom n'apparaissent pas.
pub fn export_summary(roads: &[Road]) -> Vec<StatusRecord> {
    let mut records: Vec<StatusRecord> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for road in roads {
        let Some(name) = road.name.as_deref() else {
            continue;
        };

        match positions.get(name) {
            Some(&pos) => {
                let record = &mut records[pos];
                if road.status > record.status {
                    record.status = road.status;
                }
            }
            None => {
                positions.insert(name, records.len());
                records.push(StatusRecord {
                    road: name.to_string(),
                    status: road.status,
                });
            }
        }
    }

    records
}

/// Applique un résumé par nom à la table détaillée
///
/// Les noms inconnus sont consignés dans le rapport sans interrompre le lot ;
/// une entrée qui ne change rien compte comme un succès.
pub fn import_summary(roads: &mut [Road], summary: &[StatusRecord], report: &mut UpdateReport) {
    for record in summary {
        match update_status(roads, &record.road, record.status) {
            Ok(change) => {
                report.record_applied(&record.road, record.status, change.matched, change.changed)
            }
            Err(NetworkError::RoadNotFound(name)) => {
                warn!(road = %name, "Road not found");
                report.record_not_found(&name);
            }
            // update_status ne renvoie pas d'autre erreur
            Err(_) => {}
        }
    }
    report.finalize();
}

/// Renomme le segment d'index `index` puis réaligne les statuts sur `summary`
///
/// # Errors
///
/// `StaleIndex` si aucun segment ne porte cet index.
pub fn rename_road(
    roads: &mut [Road],
    index: usize,
    new_name: &str,
    summary: &[StatusRecord],
    report: &mut UpdateReport,
) -> Result<(), NetworkError> {
    let road = roads
        .iter_mut()
        .find(|r| r.index == index)
        .ok_or(NetworkError::StaleIndex(index))?;

    let new_name = new_name.trim();
    debug!(
        index,
        from = road.name.as_deref().unwrap_or(""),
        to = new_name,
        "Renaming road segment"
    );
    road.name = (!new_name.is_empty()).then(|| new_name.to_string());

    import_summary(roads, summary, report);
    Ok(())
}
