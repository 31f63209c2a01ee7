//! Tests d'intégration du cycle de vie d'un réseau

use std::io::Cursor;
use std::path::{Path, PathBuf};

use canvass::{Config, Network, NetworkError, NetworkSources, Status, UpdateStatus};
use tempfile::TempDir;

const KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Ladygrove</name>
    <Placemark>
      <name><![CDATA[Ladygrove East]]></name>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>
              -1.2600,51.6000,0
              -1.2400,51.6000,0
              -1.2400,51.6100,0
              -1.2600,51.6100,0
              -1.2600,51.6000,0
            </coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>"#;

fn line(name: Option<&str>, fclass: &str, coords: &str) -> String {
    let name = match name {
        Some(n) => format!("\"{n}\""),
        None => "null".to_string(),
    };
    format!(
        r#"{{"type":"Feature","properties":{{"osm_id":"1","name":{name},"fclass":"{fclass}"}},"geometry":{{"type":"LineString","coordinates":{coords}}}}}"#
    )
}

fn regional(features: &[String]) -> String {
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

fn default_features() -> Vec<String> {
    vec![
        line(Some("Elm Street"), "residential", "[[-1.258,51.602],[-1.255,51.603]]"),
        line(Some("High Street"), "primary", "[[-1.250,51.601],[-1.250,51.609]]"),
        line(Some("Elm Street"), "residential", "[[-1.255,51.603],[-1.252,51.604]]"),
        line(None, "unclassified", "[[-1.245,51.605],[-1.243,51.606]]"),
        line(None, "track", "[[-1.247,51.602],[-1.246,51.603]]"),
        line(Some("Far Lane"), "residential", "[[-1.300,51.602],[-1.290,51.603]]"),
    ]
}

struct Fixture {
    dir: TempDir,
    config: Config,
    sources: NetworkSources,
}

impl Fixture {
    fn new() -> Self {
        Self::with_features(&default_features())
    }

    fn with_features(features: &[String]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let exterior = dir.path().join("Ladygrove.kml");
        let roads = dir.path().join("roads.geojson");
        std::fs::write(&exterior, KML).unwrap();
        std::fs::write(&roads, regional(features)).unwrap();

        let config = Config {
            data_dir: dir.path().join("networks"),
            roads_file: Some(roads.clone()),
            ..Config::default()
        };
        Self {
            dir,
            config,
            sources: NetworkSources { exterior, roads },
        }
    }

    fn open(&self) -> Network {
        Network::open(&self.config, "Ladygrove", self.sources.clone()).unwrap()
    }

    fn network_file(&self, suffix: &str) -> PathBuf {
        self.config
            .data_dir
            .join("Ladygrove")
            .join(format!("Ladygrove_{suffix}"))
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn statuses(network: &Network) -> Vec<Status> {
    network.roads().iter().map(|r| r.status).collect()
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_open_builds_network_files() {
    let fx = Fixture::new();
    let network = fx.open();

    assert_eq!(network.boundary().name, "Ladygrove East");
    assert_eq!(network.roads().len(), 4);
    assert_eq!(
        network.roads().iter().map(|r| r.index).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
    assert_eq!(network.roads()[3].name, None);
    assert!(network.roads().iter().all(|r| r.color == "Red"));

    for suffix in [
        "exterior.geojson",
        "roads.geojson",
        "roads.csv",
        "status.csv",
        "manifest.json",
    ] {
        assert!(fx.network_file(suffix).is_file(), "missing {suffix}");
    }
    assert_eq!(
        read(&fx.network_file("status.csv")),
        "road,status\nElm Street,No\nHigh Street,No\n"
    );

    let stats = network.stats();
    assert_eq!(stats.segments, 4);
    assert_eq!(stats.unnamed, 1);
    assert_eq!(stats.distinct_names, 2);
    assert_eq!(stats.undelivered, 4);
}

#[test]
fn test_update_then_reopen_preserves_statuses() {
    let fx = Fixture::new();
    let mut network = fx.open();

    let change = network.update_status("Elm Street", Status::Arranged).unwrap();
    assert_eq!(change.matched, 2);
    assert_eq!(change.changed, 2);

    let err = network.update_status("Nonexistent Rd", Status::Delivered).unwrap_err();
    assert!(matches!(err, NetworkError::RoadNotFound(_)));

    let reopened = fx.open();
    assert_eq!(
        statuses(&reopened),
        vec![Status::Arranged, Status::Undelivered, Status::Arranged, Status::Undelivered]
    );
    assert_eq!(reopened.roads()[0].color, "Gold");
    assert_eq!(reopened.roads()[1].line_width, 3);
}

#[test]
fn test_cached_network_ignores_missing_sources() {
    let fx = Fixture::new();
    fx.open();

    std::fs::remove_file(&fx.sources.exterior).unwrap();
    std::fs::remove_file(&fx.sources.roads).unwrap();

    let reopened = fx.open();
    assert_eq!(reopened.roads().len(), 4);
}

#[test]
fn test_interactive_batch() {
    let fx = Fixture::new();
    let mut network = fx.open();

    let mut input = Cursor::new(" elm street, nonexistent rd\nhigh street\n");
    let mut output = Vec::new();
    let report = network.prompt_and_apply(&mut input, &mut output).unwrap();

    assert_eq!(report.status, UpdateStatus::PartialSuccess);
    assert_eq!(report.not_found, vec!["Nonexistent Rd".to_string()]);
    assert_eq!(report.applied.len(), 2);
    assert_eq!(report.segments_changed(), 3);
    assert_eq!(
        statuses(&network),
        vec![Status::Delivered, Status::Arranged, Status::Delivered, Status::Undelivered]
    );
    assert_eq!(
        read(&fx.network_file("status.csv")),
        "road,status\nElm Street,Yes\nHigh Street,Arranged\n"
    );
}

#[test]
fn test_interactive_batch_apostrophe_names() {
    let fx = Fixture::with_features(&[
        line(Some("King's Road"), "residential", "[[-1.258,51.602],[-1.255,51.603]]"),
        line(Some("St John's Road"), "residential", "[[-1.250,51.601],[-1.250,51.609]]"),
    ]);
    let mut network = fx.open();

    let mut input = Cursor::new("king's road, ST JOHN'S ROAD\n\n");
    let mut output = Vec::new();
    let report = network.prompt_and_apply(&mut input, &mut output).unwrap();

    assert_eq!(report.status, UpdateStatus::Success);
    assert!(report.not_found.is_empty());
    assert_eq!(report.applied.len(), 2);
    assert_eq!(statuses(&network), vec![Status::Delivered, Status::Delivered]);
}

#[test]
fn test_import_hand_edited_status_file() {
    let fx = Fixture::new();
    let mut network = fx.open();

    std::fs::write(
        fx.network_file("status.csv"),
        "road,status\nElm Street,Yes\nHigh Street,Arranged\nMissing Way,Yes\n",
    )
    .unwrap();
    let report = network.import_status_file(None).unwrap();

    assert_eq!(report.status, UpdateStatus::PartialSuccess);
    assert_eq!(report.not_found, vec!["Missing Way".to_string()]);
    assert_eq!(network.stats().delivered, 2);
    assert_eq!(network.stats().arranged, 1);

    // Réimporter l'export ne change rien
    let export = fx.path("export.csv");
    std::fs::copy(fx.network_file("status.csv"), &export).unwrap();
    let before = statuses(&network);
    let report = network.import_status_file(Some(&export)).unwrap();
    assert_eq!(report.status, UpdateStatus::Success);
    assert_eq!(report.segments_changed(), 0);
    assert_eq!(statuses(&network), before);
}

#[test]
fn test_rename_realigns_status() {
    let fx = Fixture::new();
    let mut network = fx.open();
    network.update_status("High Street", Status::Delivered).unwrap();

    network.rename(3, "High Street").unwrap();
    assert_eq!(network.roads()[3].name.as_deref(), Some("High Street"));
    assert_eq!(network.roads()[3].status, Status::Delivered);
    assert_eq!(network.roads()[3].color, "SpringGreen");

    let err = network.rename(99, "Nowhere").unwrap_err();
    assert!(matches!(err, NetworkError::StaleIndex(99)));
}

#[test]
fn test_reset_reapplies_statuses() {
    let fx = Fixture::new();
    let mut network = fx.open();
    network.update_status("Elm Street", Status::Delivered).unwrap();

    // Le jeu régional perd une rue
    let mut features = default_features();
    features.remove(1);
    std::fs::write(&fx.sources.roads, regional(&features)).unwrap();

    let report = network.reset().unwrap();
    assert_eq!(report.status, UpdateStatus::PartialSuccess);
    assert_eq!(report.not_found, vec!["High Street".to_string()]);
    assert_eq!(network.roads().len(), 3);
    assert_eq!(
        statuses(&network),
        vec![Status::Delivered, Status::Delivered, Status::Undelivered]
    );
    assert_eq!(
        network.roads().iter().map(|r| r.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn test_render_map() {
    let fx = Fixture::new();
    let network = fx.open();

    let path = network.render(None).unwrap();
    assert_eq!(path, fx.network_file("map.html"));
    let html = read(&path);
    assert_eq!(html.matches("<polyline").count(), 4);
    assert!(html.contains("<title>Ladygrove</title>"));
}

#[test]
fn test_invalid_network_name_creates_nothing() {
    let fx = Fixture::new();
    let err = Network::open(&fx.config, "../escape", fx.sources.clone()).unwrap_err();

    assert!(matches!(err, NetworkError::InvalidNetworkName(_)));
    assert!(!fx.config.data_dir.exists());
}

#[test]
fn test_missing_regional_data() {
    let fx = Fixture::new();
    let sources = NetworkSources {
        exterior: fx.sources.exterior.clone(),
        roads: fx.path("absent.shp"),
    };

    let err = Network::open(&fx.config, "Ladygrove", sources).unwrap_err();
    assert!(matches!(err, NetworkError::MissingRegionalData { .. }));
    assert!(!fx.network_file("roads.geojson").exists());
}

#[test]
fn test_unsupported_boundary_format() {
    let fx = Fixture::new();
    let gpx = fx.path("Ladygrove.gpx");
    std::fs::write(&gpx, KML).unwrap();
    let sources = NetworkSources {
        exterior: gpx,
        roads: fx.sources.roads.clone(),
    };

    let err = Network::open(&fx.config, "Ladygrove", sources).unwrap_err();
    assert!(matches!(err, NetworkError::UnsupportedFormat(_)));
}
