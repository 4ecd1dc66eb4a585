pub mod options;

use serde::Deserialize;
use serde::Serialize;

use crate::dataset::GraveRecord;

pub use options::SelectorOptions;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionField {
    #[default]
    Community,
    Province,
}

impl RegionField {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "community" | "comautonom" | "autonomous-community" => Some(Self::Community),
            "province" | "provincia" => Some(Self::Province),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionField::Community => "community",
            RegionField::Province => "province",
        }
    }

    pub fn value_of<'a>(&self, record: &'a GraveRecord) -> Option<&'a str> {
        match self {
            RegionField::Community => record.community.as_deref(),
            RegionField::Province => Some(record.province.as_str()),
        }
    }
}

// `None` and `""` both mean any
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub region: Option<String>,
    pub municipality: Option<String>,
    pub grave_type: Option<String>,
    pub person_range: Option<String>,
    #[serde(skip)]
    pub region_field: RegionField,
}

fn selected(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        selected(&self.region).is_none()
            && selected(&self.municipality).is_none()
            && selected(&self.grave_type).is_none()
            && selected(&self.person_range).is_none()
    }

    pub fn matches(&self, record: &GraveRecord) -> bool {
        if let Some(region) = selected(&self.region) {
            if self.region_field.value_of(record) != Some(region) {
                return false;
            }
        }
        if let Some(municipality) = selected(&self.municipality) {
            if record.municipality != municipality {
                return false;
            }
        }
        if let Some(grave_type) = selected(&self.grave_type) {
            if record.grave_type != grave_type {
                return false;
            }
        }
        if let Some(range) = selected(&self.person_range) {
            if record.person_range.as_str() != range {
                return false;
            }
        }
        true
    }

    pub fn summary(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(v) = selected(&self.region) {
            parts.push(format!("{}={}", self.region_field.as_str(), v));
        }
        if let Some(v) = selected(&self.municipality) {
            parts.push(format!("municipality={v}"));
        }
        if let Some(v) = selected(&self.grave_type) {
            parts.push(format!("type={v}"));
        }
        if let Some(v) = selected(&self.person_range) {
            parts.push(format!("range={v}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

pub fn filter<'a>(records: &'a [GraveRecord], criteria: &FilterCriteria) -> Vec<&'a GraveRecord> {
    if criteria.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|r| criteria.matches(r)).collect()
}
