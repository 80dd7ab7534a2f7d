use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reporting interval of a financial period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Fiscal year.
    Annual,
    /// Fiscal quarter.
    Quarter,
}

/// A period type string outside `{annual, quarter}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown period type {0:?} (expected \"annual\" or \"quarter\")")]
pub struct UnknownPeriodType(pub String);

impl PeriodType {
    /// Both variants, annual first.
    pub const ALL: [PeriodType; 2] = [PeriodType::Annual, PeriodType::Quarter];

    /// Database / wire code.
    pub const fn as_str(self) -> &'static str {
        match self {
            PeriodType::Annual => "annual",
            PeriodType::Quarter => "quarter",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = UnknownPeriodType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" => Ok(PeriodType::Annual),
            "quarter" => Ok(PeriodType::Quarter),
            _ => Err(UnknownPeriodType(s.to_string())),
        }
    }
}
