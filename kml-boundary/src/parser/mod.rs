//! Parsers pour les documents KML
//!
//! Les documents exportés par les outils de cartographie en ligne sont petits
//! et réguliers : un balayage des balises avec `memchr` suffit, sans arbre DOM.

pub mod coords;
pub mod element;
pub mod placemark;
pub mod text;
