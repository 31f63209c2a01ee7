//! Normalisation de l'anneau extérieur

use geo::Coord;

use crate::KmlError;

/// Ouvre un anneau : doublons consécutifs supprimés, point de fermeture retiré
///
/// # Errors
///
/// `Malformed` si l'anneau compte moins de 3 sommets distincts.
pub fn open_ring(mut coords: Vec<Coord<f64>>) -> Result<Vec<Coord<f64>>, KmlError> {
    coords.dedup();

    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }

    let distinct = distinct_vertices(&coords);
    if distinct < 3 {
        return Err(KmlError::malformed(format!(
            "polygon ring needs at least 3 distinct vertices, found {distinct}"
        )));
    }

    Ok(coords)
}

/// Compte les sommets distincts (comparaison exacte des bits)
fn distinct_vertices(coords: &[Coord<f64>]) -> usize {
    let mut keys: Vec<(u64, u64)> = coords
        .iter()
        .map(|c| (c.x.to_bits(), c.y.to_bits()))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}
