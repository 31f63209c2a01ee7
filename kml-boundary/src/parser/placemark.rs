//! Repérage des placemarks et de leurs polygones

use crate::parser::{element, text};
use crate::types::RawPlacemark;

/// Liste les placemarks du document avec leurs anneaux de polygone
///
/// Un placemark sans `<Polygon>` (point, ligne) est renvoyé avec
/// `outer_rings` vide. Un `<MultiGeometry>` contenant plusieurs polygones
/// produit plusieurs anneaux extérieurs.
pub fn scan(document: &str) -> Vec<RawPlacemark<'_>> {
    element::find_all(document, "Placemark")
        .map(|placemark| parse_placemark(placemark.inner))
        .collect()
}

fn parse_placemark(inner: &str) -> RawPlacemark<'_> {
    let name = element::find(inner, "name", 0).map(|el| text::content(el.inner));

    let mut outer_rings = Vec::new();
    let mut inner_rings = 0;

    for polygon in element::find_all(inner, "Polygon") {
        let outer = element::find(polygon.inner, "outerBoundaryIs", 0)
            .map(|el| el.inner)
            .unwrap_or(polygon.inner);

        if let Some(coordinates) = element::find(outer, "coordinates", 0) {
            outer_rings.push(coordinates.inner);
        }

        inner_rings += element::find_all(polygon.inner, "innerBoundaryIs").count();
    }

    RawPlacemark {
        name,
        outer_rings,
        inner_rings,
    }
}
