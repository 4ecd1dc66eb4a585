pub mod report;

use serde::Serialize;
use serde_json::json;

use crate::markers::MarkerDescriptor;

pub use report::ReportContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    GeoJson,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "geojson" | "geo" => Some(Self::GeoJson),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::GeoJson => "geojson",
            OutputFormat::Html => "html",
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".geojson") {
        return Some(OutputFormat::GeoJson);
    }
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

pub fn render_text(markers: &[MarkerDescriptor]) -> Vec<u8> {
    let mut out = String::new();
    for m in markers {
        out.push_str(&format!(
            "{}\t{},{}\t{}\n",
            m.tooltip, m.position.lat, m.position.lon, m.radius
        ));
    }
    out.into_bytes()
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = serde_json::to_vec_pretty(value)?;
    out.push(b'\n');
    Ok(out)
}

pub fn geojson_value(markers: &[MarkerDescriptor]) -> serde_json::Value {
    let features: Vec<serde_json::Value> = markers
        .iter()
        .map(|m| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [m.position.lon, m.position.lat],
                },
                "properties": {
                    "radius": m.radius,
                    "stroke_color": m.stroke_color,
                    "fill": m.fill,
                    "fill_color": m.fill_color,
                    "fill_opacity": m.fill_opacity,
                    "tooltip": m.tooltip,
                    "popup": m.popup,
                },
            })
        })
        .collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

pub fn render_geojson(markers: &[MarkerDescriptor]) -> serde_json::Result<Vec<u8>> {
    render_json(&geojson_value(markers))
}

pub fn render_html(markers: &[MarkerDescriptor], ctx: &ReportContext) -> serde_json::Result<Vec<u8>> {
    report::render_html(markers, ctx)
}

pub fn render(
    format: OutputFormat,
    markers: &[MarkerDescriptor],
    ctx: &ReportContext,
) -> serde_json::Result<Vec<u8>> {
    match format {
        OutputFormat::Text => Ok(render_text(markers)),
        OutputFormat::Json => render_json(markers),
        OutputFormat::GeoJson => render_geojson(markers),
        OutputFormat::Html => render_html(markers, ctx),
    }
}
