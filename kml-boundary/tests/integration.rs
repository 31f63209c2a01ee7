//! Tests d'intégration sur des exports KML/KMZ écrits à la volée

use std::io::Write;
use std::path::Path;

use geo::Coord;
use kml_boundary::KmlError;

const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Delivery round</name>
    <Folder>
      <name>Untitled layer</name>
      <Placemark>
        <name>Ladygrove</name>
        <styleUrl>#poly-000000-1200-77-nodesc</styleUrl>
        <Polygon>
          <outerBoundaryIs>
            <LinearRing>
              <tessellate>1</tessellate>
              <coordinates>
                -1.2530,51.6010,0
                -1.2400,51.6010,0
                -1.2400,51.6100,0
                -1.2530,51.6100,0
                -1.2530,51.6010,0
              </coordinates>
            </LinearRing>
          </outerBoundaryIs>
        </Polygon>
      </Placemark>
    </Folder>
  </Document>
</kml>
"#;

fn write_file(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_parse_kml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "Ladygrove.kml", EXPORT.as_bytes());

    let result = kml_boundary::parse(&path).unwrap();
    assert_eq!(result.name, "Ladygrove");

    let exterior = result.polygon.exterior();
    assert!(exterior.is_closed());
    assert_eq!(exterior.0.len(), 5);
    assert_eq!(exterior.0[0], Coord { x: -1.2530, y: 51.6010 });
    assert_eq!(exterior.0[2], Coord { x: -1.2400, y: 51.6100 });
}

#[test]
fn test_parse_kmz_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Ladygrove.kmz");

    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("images/icon.png", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"not an image").unwrap();
    zip.start_file("doc.kml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(EXPORT.as_bytes()).unwrap();
    zip.finish().unwrap();

    let result = kml_boundary::parse(&path).unwrap();
    assert_eq!(result.name, "Ladygrove");
    assert_eq!(result.polygon.exterior().0.len(), 5);
}

#[test]
fn test_parse_kmz_without_kml_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.kmz");

    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("readme.txt", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"nothing here").unwrap();
    zip.finish().unwrap();

    let err = kml_boundary::parse(&path).unwrap_err();
    assert!(matches!(err, KmlError::MissingFile(_)));
}

#[test]
fn test_parse_corrupt_kmz() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "broken.kmz", b"PK but not really a zip");

    let err = kml_boundary::parse(&path).unwrap_err();
    assert!(matches!(err, KmlError::InvalidArchive(_)));
}

#[test]
fn test_parse_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "Ladygrove.gpx", EXPORT.as_bytes());

    let err = kml_boundary::parse(&path).unwrap_err();
    assert!(matches!(err, KmlError::UnsupportedFormat(_)));
}

#[test]
fn test_parse_invalid_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let broken = EXPORT.replace("-1.2400,51.6100,0", "-1.2400;51.6100");
    let path = write_file(dir.path(), "broken.kml", broken.as_bytes());

    let err = kml_boundary::parse(&path).unwrap_err();
    assert!(matches!(err, KmlError::InvalidCoordinate { position: 2, .. }));
}
