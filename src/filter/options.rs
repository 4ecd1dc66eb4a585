use itertools::Itertools;
use serde::Serialize;

use super::RegionField;
use crate::dataset::{GraveRecord, RangeLabel};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SelectorOptions {
    pub region: Vec<String>,
    pub municipality: Vec<String>,
    pub grave_type: Vec<String>,
    pub person_range: Vec<String>,
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .unique()
        .sorted()
        .map(str::to_string)
        .collect()
}

impl SelectorOptions {
    pub fn from_records(records: &[GraveRecord], region_field: RegionField) -> Self {
        Self {
            region: sorted_distinct(records.iter().filter_map(|r| region_field.value_of(r))),
            municipality: sorted_distinct(records.iter().map(|r| r.municipality.as_str())),
            grave_type: sorted_distinct(records.iter().map(|r| r.grave_type.as_str())),
            person_range: RangeLabel::labels().into_iter().map(str::to_string).collect(),
        }
    }
}
