use serde::Deserialize;
use serde::Serialize;

use crate::dataset::GraveRecord;

pub const RADIUS_DIVISOR: f64 = 100.0;
pub const MAX_RADIUS: f64 = 150.0;

pub const POPUP_HEADING: &str = "More Information";
pub const POPUP_LINK_TEXT: &str = "15mpedia link";
pub const NO_OBSERVATIONS: &str = "No observations available.";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub stroke_color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#E66100".to_string(),
            fill_color: "#5D3A9B".to_string(),
            fill_opacity: 0.6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Popup {
    pub heading: String,
    pub link_text: String,
    pub url: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkerDescriptor {
    pub position: LatLon,
    pub radius: f64,
    pub stroke_color: String,
    pub fill: bool,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub tooltip: String,
    pub popup: Popup,
}

// no minimum radius
pub fn radius_for(person_count: f64) -> f64 {
    (person_count / RADIUS_DIVISOR).min(MAX_RADIUS)
}

pub fn popup_body(record: &GraveRecord) -> String {
    match record.observations.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NO_OBSERVATIONS.to_string(),
    }
}

pub fn build_marker(record: &GraveRecord, style: &MarkerStyle) -> MarkerDescriptor {
    MarkerDescriptor {
        position: LatLon {
            lat: record.latitude,
            lon: record.longitude,
        },
        radius: radius_for(record.person_count),
        stroke_color: style.stroke_color.clone(),
        fill: true,
        fill_color: style.fill_color.clone(),
        fill_opacity: style.fill_opacity,
        tooltip: record.registration.clone(),
        popup: Popup {
            heading: POPUP_HEADING.to_string(),
            link_text: POPUP_LINK_TEXT.to_string(),
            url: record.url.clone(),
            body: popup_body(record),
        },
    }
}

pub fn build_markers(subset: &[&GraveRecord], style: &MarkerStyle) -> Vec<MarkerDescriptor> {
    subset.iter().map(|r| build_marker(r, style)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RangeLabel;

    fn record(registration: &str, count: f64, observations: Option<&str>) -> GraveRecord {
        GraveRecord {
            province: "León".to_string(),
            community: Some("Castilla y León".to_string()),
            municipality: "Ponferrada".to_string(),
            grave_type: "Fosa común".to_string(),
            person_count: count,
            latitude: 42.54,
            longitude: -6.59,
            url: format!("https://15mpedia.org/wiki/{registration}"),
            registration: registration.to_string(),
            observations: observations.map(str::to_string),
            status: String::new(),
            person_range: RangeLabel::from_count(count).unwrap(),
        }
    }

    #[test]
    fn radius_scales_linearly_and_caps() {
        assert_eq!(radius_for(0.0), 0.0);
        assert!((radius_for(10.0) - 0.1).abs() < 1e-12);
        assert!((radius_for(50.0) - 0.5).abs() < 1e-12);
        assert_eq!(radius_for(15_000.0), MAX_RADIUS);
        assert_eq!(radius_for(1_000_000.0), MAX_RADIUS);

        let mut last = 0.0;
        for count in (0..40_000).step_by(250) {
            let r = radius_for(count as f64);
            assert!(r >= last);
            last = r;
        }
    }

    #[test]
    fn popup_falls_back_to_placeholder() {
        let style = MarkerStyle::default();
        let with = build_marker(&record("LE-1", 3.0, Some("Exhumada en 2006")), &style);
        let without = build_marker(&record("LE-2", 3.0, None), &style);
        assert_eq!(with.popup.body, "Exhumada en 2006");
        assert_eq!(without.popup.body, NO_OBSERVATIONS);
        assert_eq!(without.popup.url, "https://15mpedia.org/wiki/LE-2");
        assert_eq!(without.tooltip, "LE-2");
    }

    #[test]
    fn markers_keep_input_order_and_style() {
        let records = vec![record("a", 1.0, None), record("b", 2.0, None), record("c", 3.0, None)];
        let subset: Vec<&GraveRecord> = records.iter().rev().collect();
        let style = MarkerStyle {
            stroke_color: "#000000".to_string(),
            ..MarkerStyle::default()
        };
        let markers = build_markers(&subset, &style);
        assert_eq!(markers.len(), 3);
        let tooltips: Vec<_> = markers.iter().map(|m| m.tooltip.as_str()).collect();
        assert_eq!(tooltips, vec!["c", "b", "a"]);
        assert!(markers.iter().all(|m| m.stroke_color == "#000000" && m.fill));
        assert_eq!(markers[0].fill_color, "#5D3A9B");
        assert_eq!(markers[0].fill_opacity, 0.6);
    }
}
