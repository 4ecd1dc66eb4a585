pub mod range;

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub use range::{InvalidRangeError, RangeLabel};

pub const REQUIRED_COLUMNS: [&str; 5] = ["Provincia", "Municipio", "TIPO_FOSA", "Latitude", "Longitude"];

pub const DEFAULT_PERSON_COUNT: f64 = 10.0;

pub const TRANSFER_STATUS: &str = "TRASLADADA AL VALLE DE LOS CAÍDOS";

pub const AGGREGATE_LABEL: &str = "Valle de los Caídos";
pub const AGGREGATE_PROVINCE: &str = "General Reference";
pub const AGGREGATE_TYPE: &str = "Reference";
pub const AGGREGATE_STATUS: &str = "TRASLADADA AL VALLE DE LOS CAIDOS";
pub const AGGREGATE_URL: &str = "https://es.wikipedia.org/wiki/Valle_de_los_Ca%C3%ADdos";
pub const AGGREGATE_LATITUDE: f64 = 40.521035;
pub const AGGREGATE_LONGITUDE: f64 = -15.857079;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open dataset: {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset: {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("dataset {source_name} is missing required columns: {}", .missing.join(", "))]
    MissingColumns {
        source_name: String,
        missing: Vec<String>,
    },

    #[error("record '{registration}' has an unusable person count: {source}")]
    InvalidRange {
        registration: String,
        #[source]
        source: InvalidRangeError,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    pub province: String,
    pub community: Option<String>,
    pub municipality: String,
    pub grave_type: String,
    pub person_count: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub url: String,
    pub registration: String,
    pub observations: Option<String>,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraveRecord {
    pub province: String,
    pub community: Option<String>,
    pub municipality: String,
    pub grave_type: String,
    pub person_count: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub url: String,
    pub registration: String,
    pub observations: Option<String>,
    pub status: String,
    pub person_range: RangeLabel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    MissingCoordinates,
    CoordinatesOutOfRange,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingCoordinates => f.write_str("missing or non-numeric coordinates"),
            SkipReason::CoordinatesOutOfRange => f.write_str("coordinates out of range"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub registration: String,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    pub source_name: String,
    pub rows_read: usize,
    pub skipped: Vec<SkippedRow>,
    pub transferred_rows: usize,
    pub aggregate_count: f64,
    pub defaulted_counts: usize,
}

#[derive(Clone, Debug)]
pub struct Dataset {
    records: Vec<GraveRecord>,
    report: LoadReport,
}

impl Dataset {
    pub fn from_raw(mut rows: Vec<RawRecord>, mut report: LoadReport) -> Result<Self, LoadError> {
        let aggregate = compute_aggregate(&rows);
        report.transferred_rows = rows.iter().filter(|r| is_transferred(r)).count();
        report.aggregate_count = aggregate.person_count.unwrap_or_default();
        rows.push(aggregate);

        report.defaulted_counts = fill_defaults(&mut rows);

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let person_range = derive_range(&row).map_err(|source| LoadError::InvalidRange {
                registration: row.registration.clone(),
                source,
            })?;
            records.push(GraveRecord {
                province: row.province,
                community: row.community,
                municipality: row.municipality,
                grave_type: row.grave_type,
                person_count: row.person_count.unwrap_or(DEFAULT_PERSON_COUNT),
                latitude: row.latitude,
                longitude: row.longitude,
                url: row.url,
                registration: row.registration,
                observations: row.observations,
                status: row.status,
                person_range,
            });
        }

        Ok(Self { records, report })
    }

    pub fn records(&self) -> &[GraveRecord] {
        &self.records
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn aggregate(&self) -> Option<&GraveRecord> {
        self.records.last()
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Provincia", default)]
    province: String,
    #[serde(rename = "ComAutonom", default)]
    community: Option<String>,
    #[serde(rename = "Municipio", default)]
    municipality: String,
    #[serde(rename = "TIPO_FOSA", default)]
    grave_type: String,
    #[serde(rename = "NUMERO_PERSONAS_FOSA", default, deserialize_with = "csv::invalid_option")]
    person_count: Option<f64>,
    #[serde(rename = "Latitude", default, deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
    #[serde(rename = "URL", default)]
    url: Option<String>,
    #[serde(rename = "NUMERO_REGISTRO", default)]
    registration: Option<String>,
    #[serde(rename = "OBSERVACIONES", default)]
    observations: Option<String>,
    #[serde(rename = "ESTADO_ACTUAL", default)]
    status: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn coordinates_in_range(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

pub async fn load(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    load_from_reader(bytes.as_slice(), &path.display().to_string())
}

pub fn load_from_reader<R: Read>(reader: R, source_name: &str) -> Result<Dataset, LoadError> {
    let csv_err = |source: csv::Error| LoadError::Csv {
        source_name: source_name.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: csv::StringRecord = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            source_name: source_name.to_string(),
            missing,
        });
    }
    reader.set_headers(headers.clone());

    let mut report = LoadReport {
        source_name: source_name.to_string(),
        ..LoadReport::default()
    };
    let mut rows: Vec<RawRecord> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: CsvRow = record.deserialize(Some(&headers)).map_err(csv_err)?;
        report.rows_read += 1;

        let registration = row.registration.unwrap_or_default();
        let (latitude, longitude) = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                report.skipped.push(SkippedRow {
                    line,
                    registration,
                    reason: SkipReason::MissingCoordinates,
                });
                continue;
            }
        };
        if !coordinates_in_range(latitude, longitude) {
            report.skipped.push(SkippedRow {
                line,
                registration,
                reason: SkipReason::CoordinatesOutOfRange,
            });
            continue;
        }

        rows.push(RawRecord {
            province: row.province,
            community: non_empty(row.community),
            municipality: row.municipality,
            grave_type: row.grave_type,
            person_count: row.person_count.filter(|c| !c.is_nan()),
            latitude,
            longitude,
            url: row.url.unwrap_or_default(),
            registration,
            observations: non_empty(row.observations),
            status: row.status.unwrap_or_default(),
        });
    }

    Dataset::from_raw(rows, report)
}

fn is_transferred(record: &RawRecord) -> bool {
    record.status == TRANSFER_STATUS
}

/// Builds the synthetic Valle de los Caídos record from the transferred graves.
pub fn compute_aggregate(records: &[RawRecord]) -> RawRecord {
    let total: f64 = records
        .iter()
        .filter(|r| is_transferred(r))
        .filter_map(|r| r.person_count)
        .fold(0.0, |acc, count| acc + count);
    RawRecord {
        province: AGGREGATE_PROVINCE.to_string(),
        community: None,
        municipality: AGGREGATE_LABEL.to_string(),
        grave_type: AGGREGATE_TYPE.to_string(),
        person_count: Some(total),
        latitude: AGGREGATE_LATITUDE,
        longitude: AGGREGATE_LONGITUDE,
        url: AGGREGATE_URL.to_string(),
        registration: AGGREGATE_LABEL.to_string(),
        observations: Some(format_count(total)),
        status: AGGREGATE_STATUS.to_string(),
    }
}

pub fn fill_defaults(records: &mut [RawRecord]) -> usize {
    let mut filled = 0;
    for record in records.iter_mut().filter(|r| r.person_count.is_none()) {
        record.person_count = Some(DEFAULT_PERSON_COUNT);
        filled += 1;
    }
    filled
}

pub fn derive_range(record: &RawRecord) -> Result<RangeLabel, InvalidRangeError> {
    RangeLabel::from_count(record.person_count.unwrap_or(f64::NAN))
}

pub fn format_count(count: f64) -> String {
    if count.fract() == 0.0 && count.abs() < 1e15 {
        format!("{}", count as i64)
    } else {
        format!("{count}")
    }
}
