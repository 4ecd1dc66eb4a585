use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

// [0,5) [5,10) [10,30) [30,60) [60,100) [100,inf)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RangeLabel {
    UpTo5,
    From5To10,
    From10To30,
    From30To60,
    From60To100,
    Over100,
}

#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[error("cannot bucket person count {count}: expected a non-negative number")]
pub struct InvalidRangeError {
    pub count: f64,
}

impl RangeLabel {
    pub const ALL: [RangeLabel; 6] = [
        RangeLabel::UpTo5,
        RangeLabel::From5To10,
        RangeLabel::From10To30,
        RangeLabel::From30To60,
        RangeLabel::From60To100,
        RangeLabel::Over100,
    ];

    pub fn from_count(count: f64) -> Result<Self, InvalidRangeError> {
        if count.is_nan() || count < 0.0 {
            return Err(InvalidRangeError { count });
        }
        let label = if count < 5.0 {
            RangeLabel::UpTo5
        } else if count < 10.0 {
            RangeLabel::From5To10
        } else if count < 30.0 {
            RangeLabel::From10To30
        } else if count < 60.0 {
            RangeLabel::From30To60
        } else if count < 100.0 {
            RangeLabel::From60To100
        } else {
            RangeLabel::Over100
        };
        Ok(label)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeLabel::UpTo5 => "0-5",
            RangeLabel::From5To10 => "5-10",
            RangeLabel::From10To30 => "10-30",
            RangeLabel::From30To60 => "30-60",
            RangeLabel::From60To100 => "60-100",
            RangeLabel::Over100 => "+100",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|label| label.as_str() == value)
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|l| l.as_str()).collect()
    }
}

impl fmt::Display for RangeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RangeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
