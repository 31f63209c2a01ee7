//! Préparation des données cartographiques et rendu HTML
//!
//! Chaque polyligne (ou anneau) est éclatée en deux colonnes parallèles `xs`
//! et `ys`, accompagnées des attributs du segment. Un segment en plusieurs
//! parties occupe donc plusieurs lignes partageant le même index.

pub mod html;

pub use html::render_html;

use geo::{BoundingRect, CoordsIter, Rect};
use serde::{Deserialize, Serialize};

use crate::boundary::Boundary;
use crate::road::{Road, Status};

/// Dimensions de la carte (pixels SVG)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            margin: 20.0,
        }
    }
}

/// Colonnes d'anneaux (limite du réseau)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingColumns {
    pub xs: Vec<Vec<f64>>,
    pub ys: Vec<Vec<f64>>,
    pub name: Vec<String>,
}

impl RingColumns {
    pub fn from_boundary(boundary: &Boundary) -> Self {
        let ring = boundary.polygon.exterior();
        Self {
            xs: vec![ring.coords_iter().map(|c| c.x).collect()],
            ys: vec![ring.coords_iter().map(|c| c.y).collect()],
            name: vec![boundary.name.clone()],
        }
    }

    /// Emprise de tous les anneaux
    pub fn bounds(&self) -> Option<Rect<f64>> {
        bounds_of(&self.xs, &self.ys)
    }
}

/// Colonnes de polylignes (segments de rue)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotColumns {
    pub xs: Vec<Vec<f64>>,
    pub ys: Vec<Vec<f64>>,
    pub name: Vec<String>,
    pub status: Vec<Status>,
    pub color: Vec<&'static str>,
    pub class: Vec<String>,
    pub index: Vec<usize>,
    pub line_width: Vec<u8>,
}

impl PlotColumns {
    pub fn from_roads(roads: &[Road]) -> Self {
        let mut columns = Self::default();
        for road in roads {
            for line in &road.geometry.0 {
                columns.xs.push(line.coords_iter().map(|c| c.x).collect());
                columns.ys.push(line.coords_iter().map(|c| c.y).collect());
                columns.name.push(road.name.clone().unwrap_or_default());
                columns.status.push(road.status);
                columns.color.push(road.color);
                columns.class.push(road.class.as_str().to_string());
                columns.index.push(road.index);
                columns.line_width.push(road.line_width);
            }
        }
        columns
    }

    /// Nombre de lignes (polylignes)
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        bounds_of(&self.xs, &self.ys)
    }

    /// Nombre de segments distincts par statut, dans l'ordre de [`Status::ALL`]
    pub fn status_counts(&self) -> [usize; 3] {
        let mut counts = [0usize; 3];
        let mut previous = None;
        for (index, status) in self.index.iter().zip(&self.status) {
            // Les parties d'un même segment sont contiguës
            if previous != Some(*index) {
                counts[*status as usize] += 1;
                previous = Some(*index);
            }
        }
        counts
    }
}

fn bounds_of(xs: &[Vec<f64>], ys: &[Vec<f64>]) -> Option<Rect<f64>> {
    let points: geo::MultiPoint<f64> = xs
        .iter()
        .flatten()
        .zip(ys.iter().flatten())
        .map(|(&x, &y)| (x, y))
        .collect();
    points.bounding_rect()
}

/// Projection équirectangulaire lon/lat → pixels SVG
///
/// Les longitudes sont comprimées par cos(latitude moyenne) ; l'emprise est
/// centrée dans le cadre en conservant les proportions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    bounds: Rect<f64>,
    kx: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    height: f64,
}

impl Projection {
    pub fn fit(bounds: Rect<f64>, style: &MapStyle) -> Self {
        let mean_lat = (bounds.min().y + bounds.max().y) / 2.0;
        let kx = mean_lat.to_radians().cos();

        let span_x = (bounds.width() * kx).max(f64::EPSILON);
        let span_y = bounds.height().max(f64::EPSILON);
        let avail_w = (style.width - 2.0 * style.margin).max(1.0);
        let avail_h = (style.height - 2.0 * style.margin).max(1.0);
        let scale = (avail_w / span_x).min(avail_h / span_y);

        Self {
            bounds,
            kx,
            scale,
            offset_x: style.margin + (avail_w - span_x * scale) / 2.0,
            offset_y: style.margin + (avail_h - span_y * scale) / 2.0,
            height: style.height,
        }
    }

    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = self.offset_x + (lon - self.bounds.min().x) * self.kx * self.scale;
        // Axe y SVG vers le bas
        let y = self.height - self.offset_y - (lat - self.bounds.min().y) * self.scale;
        (x, y)
    }

    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}
