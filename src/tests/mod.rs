use std::sync::Arc;

use crate::dashboard::{self, Dashboard, InputEvent, InputId};
use crate::dataset::{self, Dataset, LoadError, RangeLabel, SkipReason};
use crate::filter::{self, FilterCriteria};
use crate::markers::{self, MarkerStyle, NO_OBSERVATIONS};

const HEADER: &str = "Provincia,ComAutonom,Municipio,TIPO_FOSA,NUMERO_PERSONAS_FOSA,Latitude,Longitude,URL,NUMERO_REGISTRO,OBSERVACIONES,ESTADO_ACTUAL";

fn csv(rows: &[&str]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

fn load(rows: &[&str]) -> Dataset {
    dataset::load_from_reader(csv(rows).as_bytes(), "test.csv").unwrap()
}

fn sample() -> Dataset {
    load(&[
        "Huesca,Aragón,Jaca,Fosa común,4,42.57,-0.55,https://15mpedia.org/a,HU-1,,EXHUMADA",
        "Sevilla,Andalucía,Sevilla,Fosa común,50,37.38,-5.98,https://15mpedia.org/b,SE-1,\"Cementerio de San Fernando, zona norte\",EXHUMADA",
        "Córdoba,Andalucía,Cabra,Fosa individual,200,37.47,-4.44,https://15mpedia.org/c,CO-1,,EXHUMADA",
    ])
}

#[test]
fn three_record_scenario_without_filters() {
    let data = sample();
    assert_eq!(data.len(), 4);

    let labels: Vec<&str> = data
        .records()
        .iter()
        .map(|r| r.person_range.as_str())
        .collect();
    assert_eq!(labels, vec!["0-5", "30-60", "+100", "0-5"]);

    let subset = filter::filter(data.records(), &FilterCriteria::default());
    let markers = markers::build_markers(&subset, &MarkerStyle::default());
    assert_eq!(markers.len(), 4);
    let radii: Vec<f64> = markers.iter().map(|m| m.radius).collect();
    let expected = [0.04, 0.5, 2.0, 0.0];
    for (got, want) in radii.iter().zip(expected.iter()) {
        assert!((got - want).abs() < 1e-9, "{got} != {want}");
    }

    let tooltips: Vec<&str> = markers.iter().map(|m| m.tooltip.as_str()).collect();
    assert_eq!(tooltips, vec!["HU-1", "SE-1", "CO-1", "Valle de los Caídos"]);
    assert_eq!(markers[0].popup.body, NO_OBSERVATIONS);
    assert_eq!(markers[1].popup.body, "Cementerio de San Fernando, zona norte");

    let text = String::from_utf8(crate::output::render_text(&markers[3..])).unwrap();
    assert_eq!(text, "Valle de los Caídos\t40.521035,-15.857079\t0\n");
}

#[test]
fn unmatched_province_yields_no_markers() {
    let data = sample();
    let criteria = FilterCriteria {
        region: Some("Madrid".to_string()),
        ..Default::default()
    };
    let markers = dashboard::update_map(data.records(), &criteria, &MarkerStyle::default());
    assert!(markers.is_empty());
}

#[test]
fn aggregate_record_sums_transferred_graves() {
    let data = load(&[
        "Valladolid,Castilla y León,Valladolid,Fosa común,120,41.65,-4.72,,VA-1,,TRASLADADA AL VALLE DE LOS CAÍDOS",
        "Valladolid,Castilla y León,Medina,Fosa común,,41.31,-4.91,,VA-2,,TRASLADADA AL VALLE DE LOS CAÍDOS",
        "Teruel,Aragón,Calamocha,Fosa común,81,40.92,-1.30,,TE-1,,TRASLADADA AL VALLE DE LOS CAÍDOS",
        "Teruel,Aragón,Teruel,Fosa común,500,40.34,-1.10,,TE-2,,TRASLADADA AL VALLE DE LOS CAIDOS",
        "Teruel,Aragón,Alcañiz,Fosa común,33,41.05,-0.13,,TE-3,,EXHUMADA",
    ]);

    let agg = data.aggregate().unwrap();
    assert_eq!(agg.registration, "Valle de los Caídos");
    assert_eq!(agg.person_count, 201.0);
    assert_eq!(agg.observations.as_deref(), Some("201"));
    assert_eq!(agg.person_range, RangeLabel::Over100);
    assert_eq!((agg.latitude, agg.longitude), (40.521035, -15.857079));
    assert_eq!(agg.grave_type, "Reference");
    assert_eq!(agg.community, None);

    assert_eq!(data.report().transferred_rows, 3);
    assert_eq!(data.report().aggregate_count, 201.0);

    let synthetic = data
        .records()
        .iter()
        .filter(|r| r.grave_type == "Reference")
        .count();
    assert_eq!(synthetic, 1);
}

#[test]
fn missing_counts_render_as_default_size() {
    let data = load(&["Lugo,Galicia,Lugo,Fosa común,,43.01,-7.55,,LU-1,,"]);
    let record = &data.records()[0];
    assert_eq!(record.person_count, dataset::DEFAULT_PERSON_COUNT);
    assert_eq!(record.person_range, RangeLabel::From10To30);
    assert_eq!(data.report().defaulted_counts, 1);

    let marker = markers::build_marker(record, &MarkerStyle::default());
    assert!((marker.radius - 0.1).abs() < 1e-12);
}

#[test]
fn non_numeric_counts_are_treated_as_missing() {
    let data = load(&["Lugo,Galicia,Lugo,Fosa común,desconocido,43.01,-7.55,,LU-1,,"]);
    assert_eq!(data.records()[0].person_count, dataset::DEFAULT_PERSON_COUNT);
}

#[test]
fn rows_without_usable_coordinates_are_skipped() {
    let data = load(&[
        "Lugo,Galicia,Lugo,Fosa común,3,,-7.55,,LU-1,,",
        "Lugo,Galicia,Sarria,Fosa común,3,norte,-7.41,,LU-2,,",
        "Lugo,Galicia,Monforte,Fosa común,3,142.0,-7.51,,LU-3,,",
        "Lugo,Galicia,Viveiro,Fosa común,3,43.66,-7.59,,LU-4,,",
    ]);
    assert_eq!(data.report().rows_read, 4);
    assert_eq!(data.len(), 2);
    assert_eq!(data.records()[0].registration, "LU-4");

    let skipped = &data.report().skipped;
    assert_eq!(skipped.len(), 3);
    assert_eq!(skipped[0].reason, SkipReason::MissingCoordinates);
    assert_eq!(skipped[0].line, 2);
    assert_eq!(skipped[1].reason, SkipReason::MissingCoordinates);
    assert_eq!(skipped[2].reason, SkipReason::CoordinatesOutOfRange);
    assert_eq!(skipped[2].registration, "LU-3");
}

#[test]
fn missing_required_columns_fail_the_load() {
    let source = "Provincia,Municipio,Latitude\nLugo,Lugo,43.0\n";
    let err = dataset::load_from_reader(source.as_bytes(), "broken.csv").unwrap_err();
    match err {
        LoadError::MissingColumns { missing, .. } => {
            assert_eq!(missing, vec!["TIPO_FOSA", "Longitude"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn optional_columns_may_be_absent() {
    let source = "\u{feff}Provincia,Municipio,TIPO_FOSA,Latitude,Longitude\nLugo,Lugo,Fosa común,43.0,-7.5\n";
    let data = dataset::load_from_reader(source.as_bytes(), "minimal.csv").unwrap();
    assert_eq!(data.len(), 2);
    let record = &data.records()[0];
    assert_eq!(record.community, None);
    assert_eq!(record.observations, None);
    assert_eq!(record.registration, "");
    assert_eq!(record.person_count, dataset::DEFAULT_PERSON_COUNT);
}

#[test]
fn negative_counts_surface_as_invalid_range() {
    let source = csv(&["Lugo,Galicia,Lugo,Fosa común,-4,43.0,-7.5,,LU-1,,"]);
    let err = dataset::load_from_reader(source.as_bytes(), "neg.csv").unwrap_err();
    assert!(matches!(err, LoadError::InvalidRange { ref registration, .. } if registration == "LU-1"));
}

#[test]
fn dashboard_events_recompute_the_selection() {
    let data = Arc::new(sample());
    let mut board = Dashboard::new(data.clone(), dashboard::Options::default());

    assert_eq!(board.render().len(), 4);
    assert_eq!(board.options().region, vec!["Andalucía", "Aragón"]);
    assert_eq!(board.options().municipality, vec!["Cabra", "Jaca", "Sevilla", "Valle de los Caídos"]);

    let markers = board.handle(InputEvent::set(InputId::Region, "Andalucía"));
    let tooltips: Vec<&str> = markers.iter().map(|m| m.tooltip.as_str()).collect();
    assert_eq!(tooltips, vec!["SE-1", "CO-1"]);

    let markers = board.handle(InputEvent::parse("range=+100").unwrap());
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].tooltip, "CO-1");

    let markers = board.handle(InputEvent::clear(InputId::Region));
    assert_eq!(markers.len(), 1);

    let markers = board.reset();
    assert_eq!(markers.len(), 4);
    assert!(board.criteria().is_empty());

    assert_eq!(data.len(), 4);
}

#[test]
fn dashboard_starts_from_initial_selection() {
    let data = Arc::new(sample());
    let board = Dashboard::new(
        data,
        dashboard::Options {
            initial: FilterCriteria {
                grave_type: Some("Fosa individual".to_string()),
                ..Default::default()
            },
            ..Default::default()
        },
    );
    let markers = board.render();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].tooltip, "CO-1");
}

#[tokio::test]
async fn load_reads_csv_from_disk() {
    let path = std::env::temp_dir().join(format!("fosamap-load-{}.csv", std::process::id()));
    tokio::fs::write(&path, csv(&["Lugo,Galicia,Lugo,Fosa común,7,43.01,-7.55,,LU-1,,"]))
        .await
        .unwrap();
    let data = dataset::load(&path).await.unwrap();
    let _ = tokio::fs::remove_file(&path).await;

    assert_eq!(data.len(), 2);
    assert_eq!(data.records()[0].person_range, RangeLabel::From5To10);
    assert!(data.report().source_name.ends_with(".csv"));
}

#[tokio::test]
async fn load_reports_unreadable_files() {
    let path = std::env::temp_dir().join("fosamap-this-file-does-not-exist.csv");
    let err = dataset::load(&path).await.unwrap_err();
    assert!(matches!(err, LoadError::Open { .. }));
}
