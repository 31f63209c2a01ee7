//! Benchmarks pour le parsing KML

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Génère un export avec un polygone de `vertices` sommets sur un cercle
fn synthetic_export(vertices: usize) -> String {
    let mut coords = String::with_capacity(vertices * 32);
    for i in 0..=vertices {
        let angle = (i % vertices) as f64 / vertices as f64 * std::f64::consts::TAU;
        let lon = -1.25 + 0.01 * angle.cos();
        let lat = 51.60 + 0.01 * angle.sin();
        coords.push_str(&format!("{lon:.7},{lat:.7},0\n"));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2"><Document><Placemark><name>Bench</name>
<Polygon><outerBoundaryIs><LinearRing><coordinates>
{coords}</coordinates></LinearRing></outerBoundaryIs></Polygon></Placemark></Document></kml>"#
    )
}

fn bench_parse_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_document");

    for vertices in [64usize, 1_024, 16_384] {
        let document = synthetic_export(vertices);
        group.throughput(Throughput::Bytes(document.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(vertices),
            &document,
            |b, doc| {
                b.iter(|| {
                    let result = kml_boundary::parse_document(black_box(doc.as_bytes())).unwrap();
                    black_box(result)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse_document);
criterion_main!(benches);
