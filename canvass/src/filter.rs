//! Sélection des rues d'un réseau dans le jeu de données régional

use geo::{BoundingRect, Rect, Within};
use tracing::debug;

use crate::boundary::Boundary;
use crate::road::{RegionalRoad, Road, RoadClass};

/// Filtre les rues régionales contenues dans la limite
///
/// Une rue est retenue si chacune de ses polylignes est entièrement à
/// l'intérieur du polygone (une rue qui traverse ou longe la limite est
/// exclue), puis si elle porte un nom ou que sa classe fait partie de
/// `relevance`. Les index sont attribués dans l'ordre du jeu régional.
pub fn filter_roads(all: &[RegionalRoad], boundary: &Boundary, relevance: &[RoadClass]) -> Vec<Road> {
    let bounds = boundary.polygon.bounding_rect();

    let mut outside = 0usize;
    let mut irrelevant = 0usize;
    let mut roads = Vec::new();
    for regional in all {
        if !is_within(regional, boundary, bounds) {
            outside += 1;
            continue;
        }
        if regional.name.is_none() && !relevance.contains(&regional.class) {
            irrelevant += 1;
            continue;
        }
        roads.push(Road::new(roads.len(), regional.clone()));
    }

    debug!(
        kept = roads.len(),
        outside,
        irrelevant,
        "Regional roads filtered"
    );
    roads
}

fn is_within(road: &RegionalRoad, boundary: &Boundary, bounds: Option<Rect<f64>>) -> bool {
    if road.geometry.0.is_empty() {
        return false;
    }
    // Rejet rapide sur les emprises
    if let (Some(outer), Some(inner)) = (bounds, road.geometry.bounding_rect()) {
        if inner.min().x < outer.min().x
            || inner.min().y < outer.min().y
            || inner.max().x > outer.max().x
            || inner.max().y > outer.max().y
        {
            return false;
        }
    }
    road.geometry
        .0
        .iter()
        .all(|line| line.is_within(&boundary.polygon))
}
