use serde::Serialize;

use crate::markers::{LatLon, MarkerDescriptor};

pub const DEFAULT_TITLE: &str = "Mass graves from the Spanish Civil War";

pub const DEFAULT_CENTER: LatLon = LatLon {
    lat: 40.4168,
    lon: -3.7038,
};
pub const DEFAULT_ZOOM: u8 = 6;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportContext {
    pub title: String,
    pub selection: Vec<(String, String)>,
    pub total_records: usize,
    pub center: LatLon,
    pub zoom: u8,
}

impl Default for ReportContext {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            selection: Vec::new(),
            total_records: 0,
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn selection_items(ctx: &ReportContext) -> String {
    if ctx.selection.is_empty() {
        return r#"<li class="text-slate-400 italic">No filters (all records)</li>"#.to_string();
    }
    let mut out = String::new();
    for (label, value) in ctx.selection.iter() {
        out.push_str(&format!(
            r#"<li><span class="font-bold">{}</span> {}</li>"#,
            escape_html(label),
            escape_html(value)
        ));
    }
    out
}

pub fn render_html(markers: &[MarkerDescriptor], ctx: &ReportContext) -> serde_json::Result<Vec<u8>> {
    let json = serde_json::to_string(markers)?;
    let json = json_for_script_tag(&json);
    let title = escape_html(&ctx.title);
    let selection = selection_items(ctx);
    let shown = markers.len();
    let total = ctx.total_records;
    let lat = ctx.center.lat;
    let lon = ctx.center.lon;
    let zoom = ctx.zoom;

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title}</title>
  <script src="https://cdn.tailwindcss.com"></script>
  <link href="https://fonts.googleapis.com/css2?family=Roboto:wght@400;700&amp;display=swap" rel="stylesheet"/>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <style>
    body {{
      font-family: 'Roboto', sans-serif;
    }}
    .popup-body {{
      max-height: 150px;
      overflow-y: auto;
      margin-top: 10px;
    }}
  </style>
</head>
<body class="bg-slate-50 text-slate-900 min-h-screen">
  <script type="application/json" id="markers-data">{json}</script>
  <h1 class="text-3xl font-bold text-center py-6">{title}</h1>
  <div class="flex justify-between gap-5 px-6">
    <div class="flex-[5]">
      <div id="map" class="w-full rounded-xl border border-slate-200" style="height: 400px;"></div>
    </div>
    <div class="flex-[3] bg-white rounded-xl border border-slate-200 p-5">
      <h2 class="text-lg font-bold mb-3">Selection</h2>
      <ul class="text-sm flex flex-col gap-2 mb-5">{selection}</ul>
      <p class="text-sm text-slate-500 font-bold">{shown} of {total} records shown</p>
    </div>
  </div>

  <noscript>
    <p class="px-6 py-4 text-amber-800 font-bold">This map requires JavaScript to draw the markers.</p>
  </noscript>

  <script>
    (function() {{
      function escapeHtml(value) {{
        return String(value)
          .replaceAll('&', '&amp;')
          .replaceAll('<', '&lt;')
          .replaceAll('>', '&gt;')
          .replaceAll('"', '&quot;')
          .replaceAll("'", '&#39;');
      }}

      const raw = document.getElementById('markers-data').textContent || '[]';
      const markers = JSON.parse(raw);

      const map = L.map('map').setView([{lat}, {lon}], {zoom});
      L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
        attribution: '&copy; OpenStreetMap contributors'
      }}).addTo(map);

      const group = L.featureGroup().addTo(map);
      for (const m of markers) {{
        const circle = L.circleMarker([m.position.lat, m.position.lon], {{
          radius: m.radius,
          color: m.stroke_color,
          fill: m.fill,
          fillColor: m.fill_color,
          fillOpacity: m.fill_opacity
        }});
        circle.bindTooltip(escapeHtml(m.tooltip));
        circle.bindPopup(
          `<h4>${{escapeHtml(m.popup.heading)}}</h4>` +
          `<a href="${{escapeHtml(m.popup.url)}}" target="_blank" rel="noreferrer">${{escapeHtml(m.popup.link_text)}}</a>` +
          `<div class="popup-body"><p>${{escapeHtml(m.popup.body)}}</p></div>`
        );
        circle.addTo(group);
      }}
    }})();
  </script>
</body>
</html>
"####,
    );

    Ok(html.into_bytes())
}
