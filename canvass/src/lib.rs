//! # canvass
//!
//! Suivi de la distribution de tracts rue par rue dans une zone dessinée à
//! la main.
//!
//! ## Features
//!
//! - Limite lue depuis un export KML/KMZ (crate `kml-boundary`)
//! - Rues filtrées depuis un extrait OSM régional (shapefile ou GeoJSON)
//! - Statuts `No` / `Arranged` / `Yes` par segment, résumé par nom éditable
//! - Carte HTML autonome colorée par statut
//!
//! ## Usage CLI
//!
//! ```bash
//! # Créer le réseau depuis Ladygrove.kml et l'extrait Geofabrik
//! canvass init --name Ladygrove --roads ./oxfordshire-latest-free/
//!
//! # Saisie interactive des rues distribuées, puis carte
//! canvass update --name Ladygrove
//!
//! # Réappliquer Ladygrove/Ladygrove_status.csv après édition
//! canvass import --name Ladygrove
//! ```

pub mod boundary;
pub mod config;
pub mod error;
pub mod filter;
pub mod matching;
pub mod network;
pub mod prompt;
pub mod render;
pub mod report;
pub mod road;
pub mod status;
pub mod store;

pub use boundary::Boundary;
pub use config::Config;
pub use error::NetworkError;
pub use matching::{MatchPolicy, TrimMode};
pub use network::{Network, NetworkSources, NetworkStats};
pub use report::{UpdateReport, UpdateStatus};
pub use road::{RegionalRoad, Road, RoadClass, Status};
