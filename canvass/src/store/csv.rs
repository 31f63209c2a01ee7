//! Tables CSV : table détaillée (géométrie en WKT) et résumé par nom

use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use geozero::ToWkt;
use serde::Serialize;
use tracing::warn;

use crate::road::Road;
use crate::status::StatusRecord;
use crate::store::geojson::road_geometry;
use crate::store::write_atomic;
use crate::NetworkError;

/// Ligne de la table détaillée
#[derive(Serialize)]
struct RoadRow<'a> {
    index: usize,
    name: &'a str,
    fclass: &'a str,
    status: &'static str,
    colour: &'static str,
    linewidth: u8,
    geometry: String,
}

/// Écrit la table détaillée, une ligne par segment
pub fn write_roads_table(roads: &[Road], path: &Path) -> Result<(), NetworkError> {
    write_atomic(path, |out| {
        let mut writer = WriterBuilder::new().from_writer(out);
        for road in roads {
            writer.serialize(RoadRow {
                index: road.index,
                name: road.name.as_deref().unwrap_or_default(),
                fclass: road.class.as_str(),
                status: road.status.label(),
                colour: road.color,
                linewidth: road.line_width,
                geometry: road_geometry(road).to_wkt()?,
            })?;
        }
        writer.flush()?;
        Ok(())
    })
}

/// Écrit le résumé `road,status`
pub fn write_summary(records: &[StatusRecord], path: &Path) -> Result<(), NetworkError> {
    write_atomic(path, |out| {
        let mut writer = WriterBuilder::new().from_writer(out);
        for record in records {
            writer.serialize(record)?;
        }
        // En-tête présent même sans ligne
        if records.is_empty() {
            writer.write_record(["road", "status"])?;
        }
        writer.flush()?;
        Ok(())
    })
}

/// Lit un résumé `road,status` (export précédent ou fichier saisi à la main)
///
/// Les lignes sans nom de rue sont ignorées ; un statut inconnu est une erreur.
pub fn read_summary(path: &Path) -> Result<Vec<StatusRecord>, NetworkError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<StatusRecord>().enumerate() {
        let record = row?;
        if record.road.is_empty() {
            warn!(line = line + 2, "Status row without road name skipped");
            continue;
        }
        records.push(record);
    }
    Ok(records)
}
