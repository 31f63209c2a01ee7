//! Carte HTML autonome : SVG en ligne, infobulles, légende, zoom et déplacement

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use geo::Rect;
use tracing::info;

use super::{MapStyle, PlotColumns, Projection, RingColumns};
use crate::road::Status;
use crate::store::write_atomic;
use crate::NetworkError;

/// Zoom à la molette, déplacement par glisser, double-clic pour réinitialiser
const PAN_ZOOM_SCRIPT: &str = r#"<script>
(function () {
  const svg = document.getElementById("map");
  const initial = svg.getAttribute("viewBox").split(" ").map(Number);
  let view = initial.slice();
  let drag = null;
  const apply = () => svg.setAttribute("viewBox", view.join(" "));
  const toMap = (e) => {
    const r = svg.getBoundingClientRect();
    return [view[0] + (e.clientX - r.left) / r.width * view[2],
            view[1] + (e.clientY - r.top) / r.height * view[3]];
  };
  svg.addEventListener("wheel", (e) => {
    e.preventDefault();
    const [mx, my] = toMap(e);
    const k = e.deltaY < 0 ? 0.8 : 1.25;
    view = [mx - (mx - view[0]) * k, my - (my - view[1]) * k, view[2] * k, view[3] * k];
    apply();
  }, { passive: false });
  svg.addEventListener("mousedown", (e) => { drag = toMap(e); });
  svg.addEventListener("mousemove", (e) => {
    if (!drag) return;
    const [mx, my] = toMap(e);
    view[0] -= mx - drag[0];
    view[1] -= my - drag[1];
    apply();
  });
  window.addEventListener("mouseup", () => { drag = null; });
  svg.addEventListener("dblclick", () => { view = initial.slice(); apply(); });
})();
</script>"#;

/// Écrit la carte `<nom>_map.html`
///
/// Le cadrage suit l'emprise de la limite (à défaut, celle des rues).
pub fn render_html(
    network: &str,
    boundary: &RingColumns,
    roads: &PlotColumns,
    style: &MapStyle,
    path: &Path,
) -> Result<(), NetworkError> {
    let bounds = boundary
        .bounds()
        .or_else(|| roads.bounds())
        .unwrap_or_else(|| Rect::new((0.0, 0.0), (1.0, 1.0)));
    let projection = Projection::fit(bounds, style);

    write_atomic(path, |out| {
        write_header(out, network, style, &projection)?;
        write_boundary(out, boundary, &projection)?;
        write_roads(out, roads, &projection)?;
        writeln!(out, "</svg>")?;
        write_legend(out, roads)?;
        writeln!(out, "{PAN_ZOOM_SCRIPT}")?;
        writeln!(out, "</body>\n</html>")?;
        Ok(())
    })?;

    info!(network, path = %path.display(), roads = roads.len(), "Map written");
    Ok(())
}

fn write_header<W: Write>(
    out: &mut W,
    network: &str,
    style: &MapStyle,
    projection: &Projection,
) -> std::io::Result<()> {
    let title = escape(network);
    let bounds = projection.bounds();
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, r#"<html lang="en">"#)?;
    writeln!(out, "<head>")?;
    writeln!(out, r#"<meta charset="utf-8">"#)?;
    writeln!(out, "<title>{title}</title>")?;
    writeln!(
        out,
        r##"<style>
    body {{ font-family: sans-serif; margin: 1em; }}
    #map {{ border: 1px solid #ccc; cursor: grab; background: #ffffff; }}
    .exterior {{ fill: none; stroke: black; stroke-width: 1.5; vector-effect: non-scaling-stroke; }}
    .road {{ fill: none; stroke-linecap: round; stroke-linejoin: round; vector-effect: non-scaling-stroke; }}
    .road:hover {{ stroke-opacity: 0.6; }}
    .legend span {{ display: inline-block; width: 1.5em; height: 0.6em; margin: 0 0.4em 0 1em; }}
</style>"##
    )?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>{title}</h1>")?;
    writeln!(
        out,
        r#"<svg id="map" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" data-lon-min="{lon_min}" data-lon-max="{lon_max}" data-lat-min="{lat_min}" data-lat-max="{lat_max}" data-scale="{scale}">"#,
        w = style.width,
        h = style.height,
        lon_min = bounds.min().x,
        lon_max = bounds.max().x,
        lat_min = bounds.min().y,
        lat_max = bounds.max().y,
        scale = projection.scale(),
    )
}

fn write_boundary<W: Write>(
    out: &mut W,
    boundary: &RingColumns,
    projection: &Projection,
) -> std::io::Result<()> {
    for ((xs, ys), name) in boundary.xs.iter().zip(&boundary.ys).zip(&boundary.name) {
        writeln!(
            out,
            r#"<polygon class="exterior" points="{}"><title>{}</title></polygon>"#,
            points(xs, ys, projection),
            escape(name)
        )?;
    }
    Ok(())
}

fn write_roads<W: Write>(out: &mut W, roads: &PlotColumns, projection: &Projection) -> std::io::Result<()> {
    for i in 0..roads.len() {
        let name = if roads.name[i].is_empty() {
            "(unnamed)".to_string()
        } else {
            escape(&roads.name[i])
        };
        writeln!(
            out,
            r#"<polyline class="road" points="{points}" stroke="{color}" stroke-width="{width}" data-index="{index}"><title>Name: {name}&#10;Status: {status}&#10;Index: {index}</title></polyline>"#,
            points = points(&roads.xs[i], &roads.ys[i], projection),
            color = roads.color[i],
            width = roads.line_width[i],
            index = roads.index[i],
            status = roads.status[i],
        )?;
    }
    Ok(())
}

fn write_legend<W: Write>(out: &mut W, roads: &PlotColumns) -> std::io::Result<()> {
    let counts = roads.status_counts();
    write!(out, r#"<p class="legend">"#)?;
    for status in Status::ALL {
        write!(
            out,
            r#"<span style="background:{}"></span>{} ({})"#,
            status.color(),
            status,
            counts[status as usize]
        )?;
    }
    writeln!(out, "</p>")
}

/// Attribut SVG `points` : « x,y x,y ... »
fn points(xs: &[f64], ys: &[f64], projection: &Projection) -> String {
    let mut out = String::with_capacity(xs.len() * 16);
    for (i, (&lon, &lat)) in xs.iter().zip(ys).enumerate() {
        let (x, y) = projection.project(lon, lat);
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{x:.2},{y:.2}");
    }
    out
}

/// Échappe le texte inséré dans le HTML
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Boundary;
    use crate::road::{RegionalRoad, Road};
    use geo::{line_string, polygon, MultiLineString};

    #[test]
    fn test_escape() {
        assert_eq!(escape("Tom & Jerry's <Lane>"), "Tom &amp; Jerry&#39;s &lt;Lane&gt;");
    }

    #[test]
    fn test_render_html() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("area_map.html");

        let boundary = Boundary::new(
            "Area".to_string(),
            polygon![(x: 0.0, y: 50.0), (x: 1.0, y: 50.0), (x: 1.0, y: 51.0), (x: 0.0, y: 51.0)],
        )
        .unwrap();
        let mut roads = vec![
            Road::new(
                0,
                RegionalRoad::new(
                    Some("Mill & Co Lane"),
                    "secondary",
                    MultiLineString::new(vec![line_string![(x: 0.2, y: 50.2), (x: 0.8, y: 50.8)]]),
                ),
            ),
            Road::new(
                1,
                RegionalRoad::new(
                    None,
                    "residential",
                    MultiLineString::new(vec![line_string![(x: 0.3, y: 50.5), (x: 0.4, y: 50.5)]]),
                ),
            ),
        ];
        roads[0].status = Status::Arranged;
        roads[0].refresh_derived();

        render_html(
            "Area",
            &RingColumns::from_boundary(&boundary),
            &PlotColumns::from_roads(&roads),
            &MapStyle::default(),
            &path,
        )
        .unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"class="exterior""#));
        assert_eq!(html.matches("<polyline").count(), 2);
        assert!(html.contains(r#"stroke="Gold" stroke-width="2""#));
        assert!(html.contains("Name: Mill &amp; Co Lane&#10;Status: Arranged&#10;Index: 0"));
        assert!(html.contains("Name: (unnamed)"));
        assert!(html.contains("Yes (0)"));
        assert!(html.contains("Arranged (1)"));
        assert!(html.contains("No (1)"));
        assert!(html.contains("addEventListener(\"wheel\""));
    }
}
