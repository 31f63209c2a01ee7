//! # kml-boundary
//!
//! Lecture d'un polygone unique dessiné à la main dans un outil de
//! cartographie en ligne et exporté en KML (ou KMZ).
//!
//! ## Features
//!
//! - Balayage des balises avec `memchr`, sans arbre DOM
//! - Décodage UTF-8 validé par `simdutf8`, BOM et déclaration XML honorés
//! - Archives KMZ (`doc.kml` ou première entrée `.kml`)
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! let boundary = kml_boundary::parse(Path::new("Ladygrove.kml"))?;
//! println!("{}: {} vertices", boundary.name, boundary.polygon.exterior().0.len());
//! ```

pub mod archive;
pub mod error;
pub mod parser;
pub mod repair;
pub mod types;

pub use error::KmlError;
pub use types::{KmlPolygon, SourceFormat};

use std::borrow::Cow;
use std::path::Path;

use memchr::memmem;
use tracing::{debug, warn};

/// Parse un export `.kml` / `.kmz` contenant exactement un polygone.
///
/// # Errors
///
/// - `UnsupportedFormat` si l'extension n'est ni `.kml` ni `.kmz`
/// - `Malformed` si le document ne contient pas exactement un polygone
///   exploitable
/// - `Io`, `InvalidArchive`, `MissingFile` pour les erreurs de lecture
pub fn parse(path: &Path) -> Result<KmlPolygon, KmlError> {
    let data = archive::read_source(path)?;
    debug!(path = %path.display(), bytes = data.len(), "Read boundary source");
    parse_document(&data)
}

/// Parse un document KML déjà chargé en mémoire
pub fn parse_document(data: &[u8]) -> Result<KmlPolygon, KmlError> {
    let document = decode(data);
    let placemarks = parser::placemark::scan(&document);

    let polygon_count: usize = placemarks.iter().map(|p| p.outer_rings.len()).sum();
    if polygon_count != 1 {
        return Err(KmlError::malformed(format!(
            "expected exactly one polygon, found {polygon_count} in {} placemark(s)",
            placemarks.len()
        )));
    }

    // Unique par construction (polygon_count == 1)
    let Some(placemark) = placemarks.into_iter().find(|p| !p.outer_rings.is_empty()) else {
        return Err(KmlError::malformed("polygon placemark vanished"));
    };

    let name = match placemark.name {
        Some(name) => name,
        None => {
            warn!("Polygon placemark has no <name>, using an empty name");
            String::new()
        }
    };

    if placemark.inner_rings > 0 {
        warn!(
            name = %name,
            inner_rings = placemark.inner_rings,
            "Ignoring interior rings of boundary polygon"
        );
    }

    let coords = parser::coords::parse(placemark.outer_rings[0])?;
    let polygon = repair::build_polygon(coords)?;

    Ok(KmlPolygon {
        name,
        polygon,
        dropped_interiors: placemark.inner_rings,
    })
}

/// Décode le document : BOM, puis déclaration XML, puis UTF-8 validé
fn decode(data: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, _)) = encoding_rs::Encoding::for_bom(data) {
        let (decoded, _, had_errors) = encoding.decode(data);
        if had_errors {
            warn!(encoding = encoding.name(), "Malformed sequences replaced while decoding");
        }
        return decoded;
    }

    if let Some(encoding) = declared_encoding(data) {
        if encoding != encoding_rs::UTF_8 {
            let (decoded, had_errors) = encoding.decode_without_bom_handling(data);
            if had_errors {
                warn!(encoding = encoding.name(), "Malformed sequences replaced while decoding");
            }
            return decoded;
        }
    }

    match simdutf8::basic::from_utf8(data) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            warn!("Document is not valid UTF-8, falling back to windows-1252");
            encoding_rs::WINDOWS_1252.decode_without_bom_handling(data).0
        }
    }
}

/// Lit le label `encoding="..."` de la déclaration XML
fn declared_encoding(data: &[u8]) -> Option<&'static encoding_rs::Encoding> {
    let head = &data[..data.len().min(256)];
    if !head.starts_with(b"<?xml") {
        return None;
    }
    let decl_end = memmem::find(head, b"?>")?;
    let decl = &head[..decl_end];

    let pos = memmem::find(decl, b"encoding=")?;
    let value = &decl[pos + 9..];
    let quote = *value.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = memchr::memchr(quote, &value[1..])?;
    encoding_rs::Encoding::for_label(&value[1..1 + len])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><kml xmlns="http://www.opengis.net/kml/2.2"><Document>{body}</Document></kml>"#
        )
    }

    const SQUARE: &str = r#"<Placemark><name>Square</name><Polygon><outerBoundaryIs><LinearRing><coordinates>
        0,0,0 1,0,0 1,1,0 0,1,0 0,0,0
    </coordinates></LinearRing></outerBoundaryIs></Polygon></Placemark>"#;

    #[test]
    fn test_parse_document_single_polygon() {
        let result = parse_document(doc(SQUARE).as_bytes()).unwrap();
        assert_eq!(result.name, "Square");
        // 4 sommets + point de fermeture reconstruit
        assert_eq!(result.polygon.exterior().0.len(), 5);
        assert_eq!(result.dropped_interiors, 0);
    }

    #[test]
    fn test_parse_document_no_polygon() {
        let body = "<Placemark><name>P</name><Point><coordinates>0,0</coordinates></Point></Placemark>";
        let err = parse_document(doc(body).as_bytes()).unwrap_err();
        assert!(err.to_string().contains("found 0"));
    }

    #[test]
    fn test_parse_document_two_polygons() {
        let body = format!("{SQUARE}{SQUARE}");
        let err = parse_document(doc(&body).as_bytes()).unwrap_err();
        assert!(matches!(err, KmlError::Malformed { .. }));
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn test_parse_document_commented_out_polygon() {
        let body = format!("<!-- previous boundary {SQUARE} -->{SQUARE}");
        let result = parse_document(doc(&body).as_bytes()).unwrap();
        assert_eq!(result.name, "Square");
        assert_eq!(result.polygon.exterior().0.len(), 5);
    }

    #[test]
    fn test_parse_document_missing_name() {
        let body = "<Placemark><Polygon><outerBoundaryIs><LinearRing><coordinates>0,0 1,0 1,1 0,0</coordinates></LinearRing></outerBoundaryIs></Polygon></Placemark>";
        let result = parse_document(doc(body).as_bytes()).unwrap();
        assert_eq!(result.name, "");
    }

    #[test]
    fn test_declared_encoding_latin1() {
        let mut data = br#"<?xml version="1.0" encoding="ISO-8859-1"?><kml><Placemark><name>Caf"#.to_vec();
        data.push(0xE9);
        data.extend_from_slice(
            b"</name><Polygon><coordinates>0,0 1,0 1,1 0,0</coordinates></Polygon></Placemark></kml>",
        );
        let result = parse_document(&data).unwrap();
        assert_eq!(result.name, "Café");
    }

    #[test]
    fn test_decode_utf8_bom() {
        let mut data = vec![0xEF, 0xBB, 0xBF];
        data.extend_from_slice(doc(SQUARE).as_bytes());
        assert_eq!(parse_document(&data).unwrap().name, "Square");
    }

    #[test]
    fn test_declared_encoding_absent() {
        assert!(declared_encoding(b"<kml></kml>").is_none());
        assert_eq!(
            declared_encoding(br#"<?xml version="1.0" encoding='utf-8'?>"#),
            Some(encoding_rs::UTF_8)
        );
    }
}
