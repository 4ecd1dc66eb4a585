use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::dataset::{Dataset, GraveRecord};
use crate::filter::{self, FilterCriteria, RegionField, SelectorOptions};
use crate::markers::{self, MarkerDescriptor, MarkerStyle};

#[derive(Clone, Debug, Default)]
pub struct Options {
    pub region_field: RegionField,
    pub style: MarkerStyle,
    pub initial: FilterCriteria,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error("unknown input '{name}', expected one of: region, municipality, type, range")]
    UnknownInput { name: String },

    #[error("malformed input event '{line}', expected <input>=<value>")]
    MalformedEvent { line: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputId {
    Region,
    Municipality,
    GraveType,
    PersonRange,
}

impl InputId {
    pub const ALL: [InputId; 4] = [
        InputId::Region,
        InputId::Municipality,
        InputId::GraveType,
        InputId::PersonRange,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InputId::Region => "region",
            InputId::Municipality => "municipality",
            InputId::GraveType => "type",
            InputId::PersonRange => "range",
        }
    }

    pub fn element_id(&self) -> &'static str {
        match self {
            InputId::Region => "province-dropdown",
            InputId::Municipality => "municipality-dropdown",
            InputId::GraveType => "type-dropdown",
            InputId::PersonRange => "people-dropdown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputId::Region => "Filter by Autonomous Community:",
            InputId::Municipality => "Filter by Municipality:",
            InputId::GraveType => "Filter by mass grave type:",
            InputId::PersonRange => "Filter by Number of People:",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            InputId::Region => "Select a province",
            InputId::Municipality => "Select a municipality",
            InputId::GraveType => "Select a mass grave type",
            InputId::PersonRange => "Select a range",
        }
    }

    fn slot<'a>(&self, criteria: &'a mut FilterCriteria) -> &'a mut Option<String> {
        match self {
            InputId::Region => &mut criteria.region,
            InputId::Municipality => &mut criteria.municipality,
            InputId::GraveType => &mut criteria.grave_type,
            InputId::PersonRange => &mut criteria.person_range,
        }
    }

    pub fn value<'a>(&self, criteria: &'a FilterCriteria) -> Option<&'a str> {
        let value = match self {
            InputId::Region => &criteria.region,
            InputId::Municipality => &criteria.municipality,
            InputId::GraveType => &criteria.grave_type,
            InputId::PersonRange => &criteria.person_range,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn options<'a>(&self, options: &'a SelectorOptions) -> &'a [String] {
        match self {
            InputId::Region => &options.region,
            InputId::Municipality => &options.municipality,
            InputId::GraveType => &options.grave_type,
            InputId::PersonRange => &options.person_range,
        }
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputId {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "region" | "province" | "community" | "province-dropdown" => Ok(InputId::Region),
            "municipality" | "municipality-dropdown" => Ok(InputId::Municipality),
            "type" | "grave-type" | "type-dropdown" => Ok(InputId::GraveType),
            "range" | "people" | "people-dropdown" => Ok(InputId::PersonRange),
            _ => Err(DashboardError::UnknownInput {
                name: value.trim().to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub input: InputId,
    pub value: Option<String>,
}

impl InputEvent {
    pub fn set(input: InputId, value: impl Into<String>) -> Self {
        Self {
            input,
            value: Some(value.into()),
        }
    }

    pub fn clear(input: InputId) -> Self {
        Self { input, value: None }
    }

    // `<input>=<value>`, empty value clears
    pub fn parse(line: &str) -> Result<Self, DashboardError> {
        let (name, value) = line.split_once('=').ok_or_else(|| DashboardError::MalformedEvent {
            line: line.to_string(),
        })?;
        let input: InputId = name.parse()?;
        let value = value.trim();
        if value.is_empty() {
            Ok(Self::clear(input))
        } else {
            Ok(Self::set(input, value))
        }
    }
}

pub fn update_map(
    records: &[GraveRecord],
    criteria: &FilterCriteria,
    style: &MarkerStyle,
) -> Vec<MarkerDescriptor> {
    let subset = filter::filter(records, criteria);
    markers::build_markers(&subset, style)
}

#[derive(Clone, Debug)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    options: SelectorOptions,
    criteria: FilterCriteria,
    style: MarkerStyle,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>, options: Options) -> Self {
        let selector_options = SelectorOptions::from_records(dataset.records(), options.region_field);
        let mut criteria = options.initial;
        criteria.region_field = options.region_field;
        Self {
            dataset,
            options: selector_options,
            criteria,
            style: options.style,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    pub fn handle(&mut self, event: InputEvent) -> Vec<MarkerDescriptor> {
        *event.input.slot(&mut self.criteria) = event.value;
        self.render()
    }

    pub fn reset(&mut self) -> Vec<MarkerDescriptor> {
        for input in InputId::ALL {
            *input.slot(&mut self.criteria) = None;
        }
        self.render()
    }

    pub fn render(&self) -> Vec<MarkerDescriptor> {
        update_map(self.dataset.records(), &self.criteria, &self.style)
    }
}
