//! Segments de rue, classes OSM et statut de distribution

use std::fmt;
use std::str::FromStr;

use geo::MultiLineString;
use serde::{Deserialize, Serialize};

use crate::NetworkError;

/// Statut de distribution d'une rue
///
/// L'ordre des variantes suit la progression (`Undelivered < Arranged <
/// Delivered`), ce qui sert au départage lors de l'export par nom.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Status {
    #[default]
    Undelivered,
    Arranged,
    Delivered,
}

impl Status {
    /// Tous les statuts, dans l'ordre de progression
    pub const ALL: [Status; 3] = [Status::Undelivered, Status::Arranged, Status::Delivered];

    /// Libellé persisté dans les fichiers (`No`, `Arranged`, `Yes`)
    pub fn label(self) -> &'static str {
        match self {
            Status::Undelivered => "No",
            Status::Arranged => "Arranged",
            Status::Delivered => "Yes",
        }
    }

    /// Couleur d'affichage (nom de couleur CSS)
    pub fn color(self) -> &'static str {
        match self {
            Status::Undelivered => "Red",
            Status::Arranged => "Gold",
            Status::Delivered => "SpringGreen",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no" | "undelivered" => Ok(Status::Undelivered),
            "arranged" => Ok(Status::Arranged),
            "yes" | "delivered" => Ok(Status::Delivered),
            _ => Err(NetworkError::InvalidStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for Status {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Status> for &'static str {
    fn from(status: Status) -> Self {
        status.label()
    }
}

/// Classe de voie (`fclass` des extraits OSM Geofabrik)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoadClass {
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Unknown,
    Unclassified,
    /// Toute autre valeur (`track`, `service`, `footway`...), conservée telle quelle
    Other(String),
}

impl RoadClass {
    /// Classes retenues par défaut pour les rues sans nom
    pub fn default_relevant() -> Vec<RoadClass> {
        vec![
            RoadClass::Primary,
            RoadClass::Secondary,
            RoadClass::Tertiary,
            RoadClass::Residential,
            RoadClass::Unknown,
            RoadClass::Unclassified,
        ]
    }

    pub fn parse(fclass: &str) -> Self {
        match fclass.trim() {
            "primary" => RoadClass::Primary,
            "secondary" => RoadClass::Secondary,
            "tertiary" => RoadClass::Tertiary,
            "residential" => RoadClass::Residential,
            "unknown" => RoadClass::Unknown,
            "unclassified" => RoadClass::Unclassified,
            other => RoadClass::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RoadClass::Primary => "primary",
            RoadClass::Secondary => "secondary",
            RoadClass::Tertiary => "tertiary",
            RoadClass::Residential => "residential",
            RoadClass::Unknown => "unknown",
            RoadClass::Unclassified => "unclassified",
            RoadClass::Other(other) => other,
        }
    }

    /// Épaisseur du trait : 3 pour `primary`, 2 pour `secondary`, 1 sinon
    pub fn line_width(&self) -> u8 {
        match self {
            RoadClass::Primary => 3,
            RoadClass::Secondary => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for RoadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RoadClass {
    fn from(value: String) -> Self {
        RoadClass::parse(&value)
    }
}

impl From<RoadClass> for String {
    fn from(class: RoadClass) -> Self {
        class.as_str().to_string()
    }
}

/// Rue du jeu de données régional, avant filtrage
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalRoad {
    pub name: Option<String>,
    pub class: RoadClass,
    pub geometry: MultiLineString<f64>,
}

impl RegionalRoad {
    /// Construit une rue régionale ; un nom vide ou blanc devient `None`
    pub fn new(name: Option<&str>, fclass: &str, geometry: MultiLineString<f64>) -> Self {
        Self {
            name: normalize_name(name),
            class: RoadClass::parse(fclass),
            geometry,
        }
    }
}

/// Segment de rue retenu dans un réseau
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    /// Index stable, attribué une seule fois à la création du réseau
    pub index: usize,

    /// Nom (plusieurs segments peuvent partager un nom)
    pub name: Option<String>,

    pub class: RoadClass,

    /// Une ou plusieurs polylignes (lon, lat)
    pub geometry: MultiLineString<f64>,

    pub status: Status,

    /// Dérivé du statut
    pub color: &'static str,

    /// Dérivé de la classe
    pub line_width: u8,
}

impl Road {
    /// Crée un segment au statut initial (non distribué)
    pub fn new(index: usize, source: RegionalRoad) -> Self {
        Self::with_status(index, source.name, source.class, source.geometry, Status::Undelivered)
    }

    /// Crée un segment avec un statut donné ; attributs dérivés calculés
    pub fn with_status(
        index: usize,
        name: Option<String>,
        class: RoadClass,
        geometry: MultiLineString<f64>,
        status: Status,
    ) -> Self {
        let line_width = class.line_width();
        Self {
            index,
            name: normalize_name(name.as_deref()),
            class,
            geometry,
            status,
            color: status.color(),
            line_width,
        }
    }

    /// Recalcule couleur et épaisseur depuis le statut et la classe
    pub fn refresh_derived(&mut self) {
        self.color = self.status.color();
        self.line_width = self.class.line_width();
    }

    /// Comparaison exacte (sensible à la casse) avec le nom stocké
    pub fn has_name(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

fn normalize_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}
